//! Parameter declarations.
//!
//! A [`Parameter`] pairs a unique name with one of four distribution kinds:
//! Choice (unordered values), Continuous (`f64` bounds), Discrete (`i64`
//! bounds) and Ordinal (ordered values). Parameters are immutable once built
//! and are passed by reference into every algorithm call.
//!
//! # Example
//!
//! ```
//! use tuner::parameter::Parameter;
//!
//! let parameters = vec![
//!     Parameter::choice("activation", vec!["relu", "tanh"]),
//!     Parameter::continuous("lr", 1e-4, 1e-1).log_scale(),
//!     Parameter::discrete("layers", 1, 8),
//!     Parameter::ordinal("batch", vec![16, 32, 64]),
//! ];
//!
//! let mut rng = fastrand::Rng::with_seed(7);
//! for p in &parameters {
//!     p.validate().unwrap();
//!     let _value = p.sample(&mut rng).unwrap();
//! }
//! ```

use crate::distribution::{
    ChoiceDistribution, ContinuousDistribution, DiscreteDistribution, Distribution,
    OrdinalDistribution, Scale,
};
use crate::error::{Error, Result};
pub use crate::param::ParamValue;

/// A named, typed search dimension.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameter {
    name: String,
    distribution: Distribution,
}

impl Parameter {
    /// Creates an unordered categorical parameter.
    #[must_use]
    pub fn choice<V: Into<ParamValue>>(name: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            name: name.into(),
            distribution: Distribution::Choice(ChoiceDistribution {
                values: values.into_iter().map(Into::into).collect(),
            }),
        }
    }

    /// Creates a floating-point parameter on `[low, high]`.
    #[must_use]
    pub fn continuous(name: impl Into<String>, low: f64, high: f64) -> Self {
        Self {
            name: name.into(),
            distribution: Distribution::Continuous(ContinuousDistribution {
                low,
                high,
                scale: Scale::Linear,
            }),
        }
    }

    /// Creates an integer parameter on `[low, high]`.
    #[must_use]
    pub fn discrete(name: impl Into<String>, low: i64, high: i64) -> Self {
        Self {
            name: name.into(),
            distribution: Distribution::Discrete(DiscreteDistribution {
                low,
                high,
                scale: Scale::Linear,
            }),
        }
    }

    /// Creates an ordered categorical parameter. Values are listed lowest rank first.
    #[must_use]
    pub fn ordinal<V: Into<ParamValue>>(name: impl Into<String>, values: Vec<V>) -> Self {
        Self {
            name: name.into(),
            distribution: Distribution::Ordinal(OrdinalDistribution {
                values: values.into_iter().map(Into::into).collect(),
            }),
        }
    }

    /// Builds one Choice parameter per `(name, values)` entry, in order.
    ///
    /// ```
    /// use tuner::parameter::Parameter;
    ///
    /// let grid = Parameter::grid(vec![("a", vec![1, 2]), ("b", vec![3, 4, 5])]);
    /// assert_eq!(grid.len(), 2);
    /// assert_eq!(grid[1].name(), "b");
    /// ```
    #[must_use]
    pub fn grid<N, V>(table: Vec<(N, Vec<V>)>) -> Vec<Self>
    where
        N: Into<String>,
        V: Into<ParamValue>,
    {
        table
            .into_iter()
            .map(|(name, values)| Self::choice(name, values))
            .collect()
    }

    /// Switches a Continuous or Discrete parameter to log-scale sampling.
    ///
    /// Has no effect on Choice and Ordinal parameters.
    #[must_use]
    pub fn log_scale(mut self) -> Self {
        match &mut self.distribution {
            Distribution::Continuous(d) => d.scale = Scale::Log,
            Distribution::Discrete(d) => d.scale = Scale::Log,
            Distribution::Choice(_) | Distribution::Ordinal(_) => {}
        }
        self
    }

    /// Returns the unique name of this parameter.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the distribution this parameter samples from.
    #[must_use]
    pub fn distribution(&self) -> &Distribution {
        &self.distribution
    }

    /// Returns the sampling scale (`Linear` for Choice and Ordinal).
    #[must_use]
    pub fn scale(&self) -> Scale {
        self.distribution.scale()
    }

    /// Returns `true` for Choice parameters.
    #[must_use]
    pub fn is_choice(&self) -> bool {
        matches!(self.distribution, Distribution::Choice(_))
    }

    /// Validates the declaration.
    ///
    /// # Errors
    ///
    /// Returns an error if bounds are inverted, if a log-scaled parameter has a
    /// non-positive lower bound, or if a Choice/Ordinal parameter declares no values.
    #[allow(clippy::cast_precision_loss)]
    pub fn validate(&self) -> Result<()> {
        match &self.distribution {
            Distribution::Continuous(d) => check_bounds(&self.name, d.low, d.high, d.scale),
            Distribution::Discrete(d) => {
                check_bounds(&self.name, d.low as f64, d.high as f64, d.scale)
            }
            Distribution::Choice(ChoiceDistribution { values })
            | Distribution::Ordinal(OrdinalDistribution { values }) => {
                if values.is_empty() {
                    Err(Error::EmptyChoices(self.name.clone()))
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Draws one value uniformly (log-uniformly for log scale) from the range.
    ///
    /// # Errors
    ///
    /// Returns an error if the declaration is invalid (see [`Parameter::validate`]).
    pub fn sample(&self, rng: &mut fastrand::Rng) -> Result<ParamValue> {
        self.validate()?;
        self.distribution
            .sample(rng)
            .ok_or(Error::Internal("validated distribution produced no sample"))
    }
}

fn check_bounds(name: &str, low: f64, high: f64, scale: Scale) -> Result<()> {
    if low.is_nan() || high.is_nan() || low > high {
        return Err(Error::InvalidBounds {
            name: name.to_owned(),
            low,
            high,
        });
    }
    if scale == Scale::Log && low <= 0.0 {
        return Err(Error::InvalidLogBounds(name.to_owned()));
    }
    Ok(())
}
