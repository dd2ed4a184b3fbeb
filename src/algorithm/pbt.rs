//! Population-based training.
//!
//! Suggestions are grouped into generations of `population_size`
//! consecutive trials. Generation 1 is sampled at random. Every later
//! suggestion exploits a member drawn from the top third of the previous
//! generation (completed rows only, best first) and explores by perturbing
//! its numeric parameters:
//!
//! - Continuous: multiplied by a factor from `perturbation_factors`, then
//!   clamped into the parameter's range.
//! - Discrete: multiplied by a factor, truncated to an integer, then clamped.
//! - Ordinal: moved one step down, kept, or moved one step up in the value
//!   list with equal probability, clamped to the ends of the list.
//! - Choice: unchanged.
//!
//! The range of any parameter can be overridden with
//! [`PopulationBasedTrainingBuilder::parameter_range`].
//!
//! Each suggestion carries a [`Lineage`]: the trial restores the checkpoint
//! `load_from`, writes `save_to` (its own position in the suggestion sequence,
//! which the orchestrator uses as trial ID), and `lineage` accumulates every
//! checkpoint the trial descends from as a comma-terminated list.
//!
//! # Examples
//!
//! ```
//! use tuner::algorithm::Algorithm;
//! use tuner::algorithm::pbt::PopulationBasedTraining;
//! use tuner::parameter::Parameter;
//! use tuner::results::ResultsTable;
//! use tuner::Direction;
//!
//! let parameters = vec![Parameter::continuous("lr", 1e-4, 1e-1).log_scale()];
//! let mut pbt = PopulationBasedTraining::builder()
//!     .population_size(4)
//!     .seed(3)
//!     .build()
//!     .unwrap();
//!
//! let s = pbt
//!     .get_suggestion(&parameters, &ResultsTable::new(), Direction::Minimize)
//!     .unwrap()
//!     .unwrap();
//! let lineage = s.lineage.unwrap();
//! assert_eq!(lineage.save_to, "1");
//! assert!(lineage.load_from.is_empty());
//! ```

use std::collections::HashMap;

use crate::algorithm::Algorithm;
use crate::algorithm::common::{pick_from_top, sample_configuration};
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::parameter::Parameter;
use crate::results::{ResultRow, ResultsTable};
use crate::rng_util;
use crate::suggestion::{Configuration, Lineage, Suggestion};
use crate::types::Direction;

const DEFAULT_POPULATION_SIZE: usize = 20;
const DEFAULT_PERTURBATION_FACTORS: [f64; 3] = [0.8, 1.0, 1.2];

/// Generation-indexed exploit-and-explore search.
pub struct PopulationBasedTraining {
    population_size: usize,
    parameter_range: HashMap<String, Vec<ParamValue>>,
    perturbation_factors: Vec<f64>,
    rng: fastrand::Rng,
    count: usize,
    generation: usize,
}

impl PopulationBasedTraining {
    /// Creates a builder for configuring a `PopulationBasedTraining`.
    #[must_use]
    pub fn builder() -> PopulationBasedTrainingBuilder {
        PopulationBasedTrainingBuilder::new()
    }

    /// Returns the current generation (1-based, 0 before the first suggestion).
    #[must_use]
    pub fn generation(&self) -> usize {
        self.generation
    }

    fn fresh(&mut self, parameters: &[Parameter]) -> Result<Suggestion> {
        let params = sample_configuration(parameters, &mut self.rng)?;
        Ok(Suggestion {
            params,
            lineage: Some(Lineage {
                lineage: String::new(),
                load_from: String::new(),
                save_to: self.count.to_string(),
            }),
        })
    }

    /// Draw a member of the previous generation's top third.
    fn candidate<'a>(
        &mut self,
        results: &'a ResultsTable,
        direction: Direction,
    ) -> Option<&'a ResultRow> {
        let pop = self.population_size as u64;
        let generation = self.generation as u64;
        let first = (generation - 2) * pop + 1;
        let last = (generation - 1) * pop;
        let population: Vec<&ResultRow> = results
            .completed()
            .filter(|r| (first..=last).contains(&r.trial_id))
            .collect();
        pick_from_top(population, self.population_size / 3, direction, &mut self.rng)
    }

    fn bounds_of(&self, parameter: &Parameter) -> Option<(f64, f64)> {
        match self.parameter_range.get(parameter.name()) {
            Some(values) => values
                .iter()
                .filter_map(ParamValue::as_f64)
                .fold(None, |acc, v| match acc {
                    None => Some((v, v)),
                    Some((lo, hi)) => Some((f64::min(lo, v), f64::max(hi, v))),
                }),
            None => parameter.distribution().bounds(),
        }
    }

    #[allow(clippy::cast_possible_truncation)]
    fn perturb(&mut self, parameters: &[Parameter], config: &mut Configuration) -> Result<()> {
        for p in parameters {
            let name = p.name();
            let current = config
                .get(name)
                .ok_or_else(|| Error::MissingParameter(name.to_owned()))?;
            let next = match p.distribution() {
                Distribution::Continuous(_) | Distribution::Discrete(_) => {
                    let x = current
                        .as_f64()
                        .ok_or_else(|| Error::NonNumericValue(name.to_owned()))?;
                    let factor = rng_util::choose(&mut self.rng, &self.perturbation_factors)
                        .copied()
                        .unwrap_or(1.0);
                    let (lo, hi) = self.bounds_of(p).unwrap_or((f64::MIN, f64::MAX));
                    if matches!(p.distribution(), Distribution::Discrete(_)) {
                        let v = (x * factor).trunc().max(lo.ceil()).min(hi.floor());
                        ParamValue::Int(v as i64)
                    } else {
                        ParamValue::Float((x * factor).max(lo).min(hi))
                    }
                }
                Distribution::Ordinal(_) => {
                    let values = self
                        .parameter_range
                        .get(name)
                        .map(Vec::as_slice)
                        .or_else(|| p.distribution().values())
                        .ok_or_else(|| Error::EmptyChoices(name.to_owned()))?;
                    let index = values
                        .iter()
                        .position(|v| v == current)
                        .ok_or_else(|| Error::ValueNotInRange(name.to_owned()))?;
                    let index = match self.rng.u8(0..3) {
                        0 => index.saturating_sub(1),
                        1 => index,
                        _ => (index + 1).min(values.len() - 1),
                    };
                    values[index].clone()
                }
                Distribution::Choice(_) => continue,
            };
            config.insert(name.to_owned(), next);
        }
        Ok(())
    }
}

impl Algorithm for PopulationBasedTraining {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        direction: Direction,
    ) -> Result<Option<Suggestion>> {
        self.count += 1;
        let generation = (self.count - 1) / self.population_size + 1;
        if generation != self.generation {
            trace_info!(generation, "population-based training: new generation");
            self.generation = generation;
        }

        if self.generation == 1 {
            return self.fresh(parameters).map(Some);
        }

        let Some(parent) = self.candidate(results, direction) else {
            trace_debug!(
                generation = self.generation,
                "previous generation has no completed trials, sampling randomly"
            );
            return self.fresh(parameters).map(Some);
        };

        let mut params = parent.configuration(parameters)?;
        let inherited = parent.lineage.clone().unwrap_or_else(|| Lineage {
            save_to: parent.trial_id.to_string(),
            ..Lineage::default()
        });
        self.perturb(parameters, &mut params)?;

        let mut lineage = inherited.lineage;
        lineage.push_str(&inherited.save_to);
        lineage.push(',');
        Ok(Some(Suggestion {
            params,
            lineage: Some(Lineage {
                lineage,
                load_from: inherited.save_to,
                save_to: self.count.to_string(),
            }),
        }))
    }

    fn load(&mut self, num_trials: usize) {
        self.count = num_trials;
        self.generation = num_trials / self.population_size + 1;
    }
}

/// Builder for configuring a [`PopulationBasedTraining`].
///
/// Defaults: `population_size` 20, `perturbation_factors` `[0.8, 1.0, 1.2]`,
/// no range overrides, random seed.
#[derive(Debug, Clone, Default)]
pub struct PopulationBasedTrainingBuilder {
    population_size: Option<usize>,
    parameter_range: HashMap<String, Vec<ParamValue>>,
    perturbation_factors: Option<Vec<f64>>,
    seed: Option<u64>,
}

impl PopulationBasedTrainingBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of trials per generation.
    #[must_use]
    pub fn population_size(mut self, n: usize) -> Self {
        self.population_size = Some(n);
        self
    }

    /// Overrides the perturbation range of one parameter.
    ///
    /// For Continuous and Discrete parameters the minimum and maximum of
    /// `values` bound the perturbed value; for Ordinal parameters `values` is
    /// the ordered list to step through.
    #[must_use]
    pub fn parameter_range<V: Into<ParamValue>>(
        mut self,
        name: impl Into<String>,
        values: Vec<V>,
    ) -> Self {
        self.parameter_range
            .insert(name.into(), values.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the multiplicative factors drawn when perturbing numeric parameters.
    #[must_use]
    pub fn perturbation_factors(mut self, factors: Vec<f64>) -> Self {
        self.perturbation_factors = Some(factors);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`PopulationBasedTraining`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidPopulationSize`] for a population size of zero
    /// and [`Error::EmptyPerturbationFactors`] for an empty factor list.
    pub fn build(self) -> Result<PopulationBasedTraining> {
        let population_size = self.population_size.unwrap_or(DEFAULT_POPULATION_SIZE);
        if population_size == 0 {
            return Err(Error::InvalidPopulationSize);
        }
        let perturbation_factors = self
            .perturbation_factors
            .unwrap_or_else(|| DEFAULT_PERTURBATION_FACTORS.to_vec());
        if perturbation_factors.is_empty() {
            return Err(Error::EmptyPerturbationFactors);
        }
        Ok(PopulationBasedTraining {
            population_size,
            parameter_range: self.parameter_range,
            perturbation_factors,
            rng: rng_util::from_seed(self.seed),
            count: 0,
            generation: 0,
        })
    }
}
