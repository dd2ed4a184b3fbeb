//! Algorithm trait and implementations for suggesting configurations.

pub mod bayes;
pub(crate) mod common;
pub mod genetic;
pub mod grid;
pub mod local;
pub mod pbt;
pub mod random;

use crate::error::Result;
use crate::parameter::Parameter;
use crate::results::ResultsTable;
use crate::suggestion::Suggestion;
use crate::types::Direction;

/// Trait for pluggable suggestion strategies.
///
/// Each call proposes the next configuration to evaluate given the declared
/// parameters and a snapshot of all observations so far. Algorithms keep
/// private per-instance state (counters, caches, fitted models), so calls on
/// one instance must be serialized by the caller.
///
/// # Implementing a custom algorithm
///
/// ```
/// use tuner::algorithm::Algorithm;
/// use tuner::parameter::Parameter;
/// use tuner::results::ResultsTable;
/// use tuner::suggestion::Suggestion;
/// use tuner::{Direction, Result};
///
/// struct FirstValues;
///
/// impl Algorithm for FirstValues {
///     fn get_suggestion(
///         &mut self,
///         parameters: &[Parameter],
///         _results: &ResultsTable,
///         _direction: Direction,
///     ) -> Result<Option<Suggestion>> {
///         let mut rng = fastrand::Rng::with_seed(0);
///         let params = parameters
///             .iter()
///             .map(|p| Ok((p.name().to_owned(), p.sample(&mut rng)?)))
///             .collect::<Result<_>>()?;
///         Ok(Some(Suggestion::new(params)))
///     }
/// }
/// ```
pub trait Algorithm {
    /// Proposes the next configuration.
    ///
    /// Returns `Ok(None)` once the algorithm's budget or search space is
    /// exhausted. An empty `results` table is never an error; algorithms fall
    /// back to random sampling when there is not enough data.
    ///
    /// # Errors
    ///
    /// Returns an error on configuration mistakes (e.g. grid search over a
    /// non-Choice parameter) or when `results` violates the table contract
    /// (e.g. a row lacks a declared parameter).
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        direction: Direction,
    ) -> Result<Option<Suggestion>>;

    /// Reinitializes internal counters from an externally tracked trial count.
    ///
    /// Used when resuming a study. The default implementation does nothing.
    fn load(&mut self, num_trials: usize) {
        let _ = num_trials;
    }
}

impl<A: Algorithm + ?Sized> Algorithm for Box<A> {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        direction: Direction,
    ) -> Result<Option<Suggestion>> {
        (**self).get_suggestion(parameters, results, direction)
    }

    fn load(&mut self, num_trials: usize) {
        (**self).load(num_trials);
    }
}
