#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Returned when the lower bound is greater than the upper bound.
    #[error("invalid bounds for '{name}': low ({low}) must be less than or equal to high ({high})")]
    InvalidBounds {
        /// The name of the offending parameter.
        name: String,
        /// The lower bound value.
        low: f64,
        /// The upper bound value.
        high: f64,
    },

    /// Returned when log scale is used with non-positive bounds.
    #[error("invalid log bounds for '{0}': low must be positive for log scale")]
    InvalidLogBounds(String),

    /// Returned when a Choice or Ordinal parameter declares no values.
    #[error("parameter '{0}' must declare at least one value")]
    EmptyChoices(String),

    /// Returned when an acquisition function other than `"ei"` is requested.
    #[error("acquisition function '{0}' is not implemented (only \"ei\" is supported)")]
    UnsupportedAcquisitionFunction(String),

    /// Returned when grid search is given a parameter that is not Choice-typed.
    #[error("grid search only accepts Choice parameters, '{0}' is not one")]
    NonChoiceGridParameter(String),

    /// Returned when population-based training is configured with an empty population.
    #[error("population size must be at least 1")]
    InvalidPopulationSize,

    /// Returned when population-based training is given no perturbation factors.
    #[error("perturbation factors cannot be empty")]
    EmptyPerturbationFactors,

    /// Returned when the mutation rate is outside `[0.0, 1.0]`.
    #[error("invalid mutation rate: {0} must be in [0.0, 1.0]")]
    InvalidMutationRate(f64),

    /// Returned when a result row or configuration lacks a declared parameter.
    #[error("missing value for parameter '{0}'")]
    MissingParameter(String),

    /// Returned when a numeric parameter holds a non-numeric value.
    #[error("parameter '{0}' holds a non-numeric value")]
    NonNumericValue(String),

    /// Returned when an Ordinal value is not part of its ordered value list.
    #[error("value of parameter '{0}' is not in its declared range")]
    ValueNotInRange(String),

    /// Returned when an internal invariant is violated.
    #[error("internal error: {0}")]
    Internal(&'static str),
}

pub type Result<T> = core::result::Result<T, Error>;
