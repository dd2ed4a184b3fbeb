//! Parameter distribution types.

use crate::param::ParamValue;
use crate::rng_util;

/// Scale on which a numeric parameter is sampled and encoded.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Scale {
    /// Uniform in natural units.
    #[default]
    Linear,
    /// Uniform in base-10 logarithm.
    Log,
}

/// Distribution for unordered categorical parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ChoiceDistribution {
    /// The enumerated values, in declaration order.
    pub values: Vec<ParamValue>,
}

/// Distribution for floating-point parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ContinuousDistribution {
    /// Lower bound (inclusive).
    pub low: f64,
    /// Upper bound (inclusive).
    pub high: f64,
    /// Sampling scale.
    pub scale: Scale,
}

/// Distribution for integer parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DiscreteDistribution {
    /// Lower bound (inclusive).
    pub low: i64,
    /// Upper bound (inclusive).
    pub high: i64,
    /// Sampling scale.
    pub scale: Scale,
}

/// Distribution for ordered categorical parameters.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct OrdinalDistribution {
    /// The values, from lowest to highest rank.
    pub values: Vec<ParamValue>,
}

/// Enum wrapping all parameter distribution types.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Distribution {
    /// An unordered categorical distribution.
    Choice(ChoiceDistribution),
    /// A floating-point distribution.
    Continuous(ContinuousDistribution),
    /// An integer distribution.
    Discrete(DiscreteDistribution),
    /// An ordered categorical distribution.
    Ordinal(OrdinalDistribution),
}

impl Distribution {
    /// Returns the scale for numeric distributions, `Linear` otherwise.
    #[must_use]
    pub fn scale(&self) -> Scale {
        match self {
            Self::Continuous(d) => d.scale,
            Self::Discrete(d) => d.scale,
            Self::Choice(_) | Self::Ordinal(_) => Scale::Linear,
        }
    }

    /// Returns the enumerated values of a Choice or Ordinal distribution.
    #[must_use]
    pub fn values(&self) -> Option<&[ParamValue]> {
        match self {
            Self::Choice(d) => Some(&d.values),
            Self::Ordinal(d) => Some(&d.values),
            Self::Continuous(_) | Self::Discrete(_) => None,
        }
    }

    /// Returns the `[low, high]` bounds of a numeric distribution.
    #[allow(clippy::cast_precision_loss)]
    #[must_use]
    pub fn bounds(&self) -> Option<(f64, f64)> {
        match self {
            Self::Continuous(d) => Some((d.low, d.high)),
            Self::Discrete(d) => Some((d.low as f64, d.high as f64)),
            Self::Choice(_) | Self::Ordinal(_) => None,
        }
    }
}

impl Distribution {
    /// Draws one value uniformly (or log-uniformly) from the distribution.
    ///
    /// Choice and Ordinal distributions with no values yield `None`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_precision_loss)]
    pub(crate) fn sample(&self, rng: &mut fastrand::Rng) -> Option<ParamValue> {
        match self {
            Self::Continuous(d) => {
                let value = match d.scale {
                    Scale::Log => {
                        let log_value = rng_util::f64_range(rng, d.low.log10(), d.high.log10());
                        10f64.powf(log_value).clamp(d.low, d.high)
                    }
                    Scale::Linear => rng_util::f64_range(rng, d.low, d.high),
                };
                Some(ParamValue::Float(value))
            }
            Self::Discrete(d) => {
                let value = match d.scale {
                    Scale::Log => {
                        let log_low = (d.low as f64).log10();
                        let log_high = (d.high as f64).log10();
                        let log_value = rng_util::f64_range(rng, log_low, log_high);
                        // Rounding might push outside the bounds
                        (10f64.powf(log_value).round() as i64).clamp(d.low, d.high)
                    }
                    Scale::Linear => rng.i64(d.low..=d.high),
                };
                Some(ParamValue::Int(value))
            }
            Self::Choice(ChoiceDistribution { values })
            | Self::Ordinal(OrdinalDistribution { values }) => rng_util::choose(rng, values).cloned(),
        }
    }
}
