//! Numeric encoding of mixed-type configurations into a design matrix.
//!
//! Each Choice parameter with `k > 1` values expands to `k` one-hot indicator
//! columns named `<name>_<index>` in declaration order; single-valued Choice
//! parameters carry no information and are dropped. Continuous and Discrete
//! parameters occupy one column each, holding `log10(value)` when log-scaled.
//! Ordinal parameters occupy one column holding the rank of the value.
//!
//! The [`Encoder`] records, for every column, its kind, scale, source
//! parameter and (for continuous columns) its bounds in feature space, so that
//! any encoded row can be mapped back to a [`Configuration`].
//!
//! ```
//! use tuner::design::Encoder;
//! use tuner::parameter::Parameter;
//! use tuner::suggestion::Configuration;
//!
//! let parameters = vec![
//!     Parameter::choice("opt", vec!["sgd", "adam", "rmsprop"]),
//!     Parameter::continuous("lr", 1e-4, 1.0).log_scale(),
//! ];
//! let encoder = Encoder::new(&parameters);
//! assert_eq!(encoder.n_features(), 4);
//!
//! let mut config = Configuration::new();
//! config.insert("opt".into(), "adam".into());
//! config.insert("lr".into(), 0.01.into());
//! let row = encoder.encode(&config).unwrap();
//! assert_eq!(&row[..3], &[0.0, 1.0, 0.0]);
//! assert!((row[3] + 2.0).abs() < 1e-12);
//! ```

use core::ops::Range;

use crate::distribution::{Distribution, Scale};
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::parameter::Parameter;
use crate::suggestion::Configuration;

/// Semantic type of a design-matrix column.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FeatureKind {
    /// A real-valued column that numeric refinement may move.
    Continuous,
    /// An integer, rank or indicator column held fixed during refinement.
    Discrete,
}

#[derive(Clone, Debug, PartialEq)]
enum Encoding {
    Indicator(ParamValue),
    Numeric,
    Rank,
}

/// Metadata for one design-matrix column.
#[derive(Clone, Debug, PartialEq)]
pub struct FeatureColumn {
    /// Column name: the parameter name, or `<name>_<index>` for indicators.
    pub name: String,
    /// Name of the parameter the column was derived from.
    pub parameter: String,
    /// Semantic type.
    pub kind: FeatureKind,
    /// Scale of the source parameter.
    pub scale: Scale,
    /// Bounds in feature space (log10 units for log scale); continuous columns only.
    pub bounds: Option<(f64, f64)>,
    encoding: Encoding,
}

/// Maps configurations to and from numeric feature rows.
#[derive(Clone, Debug)]
pub struct Encoder {
    columns: Vec<FeatureColumn>,
    layout: Vec<(Parameter, Range<usize>)>,
}

impl Encoder {
    /// Derives the column layout for `parameters`.
    #[must_use]
    pub fn new(parameters: &[Parameter]) -> Self {
        let mut columns = Vec::new();
        let mut layout = Vec::with_capacity(parameters.len());

        for p in parameters {
            let start = columns.len();
            let name = p.name().to_owned();
            match p.distribution() {
                Distribution::Choice(d) => {
                    if d.values.len() > 1 {
                        for (i, value) in d.values.iter().enumerate() {
                            columns.push(FeatureColumn {
                                name: format!("{name}_{i}"),
                                parameter: name.clone(),
                                kind: FeatureKind::Discrete,
                                scale: Scale::Linear,
                                bounds: None,
                                encoding: Encoding::Indicator(value.clone()),
                            });
                        }
                    }
                }
                Distribution::Continuous(d) => {
                    let bounds = match d.scale {
                        Scale::Log => (d.low.log10(), d.high.log10()),
                        Scale::Linear => (d.low, d.high),
                    };
                    columns.push(FeatureColumn {
                        name: name.clone(),
                        parameter: name,
                        kind: FeatureKind::Continuous,
                        scale: d.scale,
                        bounds: Some(bounds),
                        encoding: Encoding::Numeric,
                    });
                }
                Distribution::Discrete(d) => columns.push(FeatureColumn {
                    name: name.clone(),
                    parameter: name,
                    kind: FeatureKind::Discrete,
                    scale: d.scale,
                    bounds: None,
                    encoding: Encoding::Numeric,
                }),
                Distribution::Ordinal(_) => columns.push(FeatureColumn {
                    name: name.clone(),
                    parameter: name,
                    kind: FeatureKind::Discrete,
                    scale: Scale::Linear,
                    bounds: None,
                    encoding: Encoding::Rank,
                }),
            }
            layout.push((p.clone(), start..columns.len()));
        }

        Self { columns, layout }
    }

    /// Returns the column metadata in matrix order.
    #[must_use]
    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    /// Returns the number of feature columns.
    #[must_use]
    pub fn n_features(&self) -> usize {
        self.columns.len()
    }

    /// Returns the indices of continuous columns.
    #[must_use]
    pub fn continuous_columns(&self) -> Vec<usize> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.kind == FeatureKind::Continuous)
            .map(|(i, _)| i)
            .collect()
    }

    /// Encodes one configuration into a feature row.
    ///
    /// # Errors
    ///
    /// Returns an error if a declared parameter is missing from `config`, if a
    /// numeric parameter holds a non-numeric value, or if an Ordinal value is
    /// not part of its declared values.
    pub fn encode(&self, config: &Configuration) -> Result<Vec<f64>> {
        let mut row = vec![0.0; self.columns.len()];
        for (parameter, span) in &self.layout {
            if span.is_empty() {
                continue;
            }
            let value = config
                .get(parameter.name())
                .ok_or_else(|| Error::MissingParameter(parameter.name().to_owned()))?;
            for col in span.clone() {
                row[col] = encode_value(&self.columns[col], parameter, value)?;
            }
        }
        Ok(row)
    }

    /// Encodes a sequence of configurations into a design matrix (one row each).
    ///
    /// # Errors
    ///
    /// Propagates the first error from [`Encoder::encode`].
    pub fn encode_all<'a, I>(&self, configs: I) -> Result<Vec<Vec<f64>>>
    where
        I: IntoIterator<Item = &'a Configuration>,
    {
        configs.into_iter().map(|c| self.encode(c)).collect()
    }

    /// Maps a feature row back to a configuration.
    ///
    /// Indicator blocks decode to their largest entry, numeric columns are
    /// inverse-transformed from log10 where needed and clamped into bounds.
    ///
    /// # Errors
    ///
    /// Returns an error if `row` is shorter than the encoding or a declared
    /// value list is empty.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn decode(&self, row: &[f64]) -> Result<Configuration> {
        if row.len() < self.columns.len() {
            return Err(Error::Internal("feature row shorter than encoding"));
        }
        let mut config = Configuration::with_capacity(self.layout.len());
        for (parameter, span) in &self.layout {
            let name = parameter.name();
            let value = match parameter.distribution() {
                Distribution::Choice(d) => {
                    let index = row[span.clone()]
                        .iter()
                        .enumerate()
                        .fold((0, f64::NEG_INFINITY), |best, (i, &x)| {
                            if x > best.1 { (i, x) } else { best }
                        })
                        .0;
                    d.values
                        .get(index)
                        .cloned()
                        .ok_or_else(|| Error::EmptyChoices(name.to_owned()))?
                }
                Distribution::Continuous(d) => {
                    let x = from_feature(row[span.start], d.scale);
                    ParamValue::Float(x.clamp(d.low.min(d.high), d.high.max(d.low)))
                }
                Distribution::Discrete(d) => {
                    let x = from_feature(row[span.start], d.scale).round() as i64;
                    ParamValue::Int(x.clamp(d.low.min(d.high), d.high.max(d.low)))
                }
                Distribution::Ordinal(d) => {
                    let last = d
                        .values
                        .len()
                        .checked_sub(1)
                        .ok_or_else(|| Error::EmptyChoices(name.to_owned()))?;
                    let rank = (row[span.start].round().max(0.0) as usize).min(last);
                    d.values[rank].clone()
                }
            };
            config.insert(name.to_owned(), value);
        }
        Ok(config)
    }
}

fn encode_value(column: &FeatureColumn, parameter: &Parameter, value: &ParamValue) -> Result<f64> {
    match &column.encoding {
        Encoding::Indicator(v) => Ok(if v == value { 1.0 } else { 0.0 }),
        Encoding::Numeric => {
            let x = value
                .as_f64()
                .ok_or_else(|| Error::NonNumericValue(parameter.name().to_owned()))?;
            Ok(match column.scale {
                Scale::Log => x.log10(),
                Scale::Linear => x,
            })
        }
        Encoding::Rank => rank_of(parameter, value),
    }
}

#[allow(clippy::cast_precision_loss)]
fn rank_of(parameter: &Parameter, value: &ParamValue) -> Result<f64> {
    parameter
        .distribution()
        .values()
        .and_then(|values| values.iter().position(|v| v == value))
        .map(|i| i as f64)
        .ok_or_else(|| Error::ValueNotInRange(parameter.name().to_owned()))
}

fn from_feature(x: f64, scale: Scale) -> f64 {
    match scale {
        Scale::Log => 10f64.powf(x),
        Scale::Linear => x,
    }
}
