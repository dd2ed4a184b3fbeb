//! Genetic crossover sampler.
//!
//! Two parents are drawn independently from the top third of completed
//! trials. Every parameter of the child is resampled from its distribution
//! with probability `mutation_rate`, and otherwise inherited from either
//! parent with equal probability. While fewer than `min_elite` completed
//! trials exist, each parent is a fresh random configuration.

use crate::algorithm::Algorithm;
use crate::algorithm::common::{pick_from_top, sample_configuration};
use crate::error::{Error, Result};
use crate::parameter::Parameter;
use crate::results::{ResultRow, ResultsTable};
use crate::rng_util;
use crate::suggestion::{Configuration, Suggestion};
use crate::types::Direction;

const DEFAULT_MUTATION_RATE: f64 = 0.1;
const DEFAULT_MIN_ELITE: usize = 10;

/// Crossover of two elite configurations with per-parameter mutation.
///
/// # Examples
///
/// ```
/// use tuner::algorithm::genetic::Genetic;
///
/// let genetic = Genetic::builder()
///     .mutation_rate(0.2)
///     .max_num_trials(100)
///     .seed(42)
///     .build()
///     .unwrap();
/// ```
pub struct Genetic {
    mutation_rate: f64,
    max_num_trials: Option<usize>,
    min_elite: usize,
    rng: fastrand::Rng,
    count: usize,
}

impl Genetic {
    /// Creates a genetic sampler with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self {
            mutation_rate: DEFAULT_MUTATION_RATE,
            max_num_trials: None,
            min_elite: DEFAULT_MIN_ELITE,
            rng: fastrand::Rng::new(),
            count: 0,
        }
    }

    /// Creates a builder for configuring a `Genetic` sampler.
    #[must_use]
    pub fn builder() -> GeneticBuilder {
        GeneticBuilder::default()
    }

    fn parent(
        &mut self,
        parameters: &[Parameter],
        completed: &[&ResultRow],
        direction: Direction,
    ) -> Result<Configuration> {
        if completed.len() < self.min_elite {
            return sample_configuration(parameters, &mut self.rng);
        }
        let top = completed.len() / 3;
        match pick_from_top(completed.to_vec(), top, direction, &mut self.rng) {
            Some(row) => row.configuration(parameters),
            None => sample_configuration(parameters, &mut self.rng),
        }
    }
}

impl Default for Genetic {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for Genetic {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        direction: Direction,
    ) -> Result<Option<Suggestion>> {
        if self.max_num_trials.is_some_and(|max| self.count >= max) {
            return Ok(None);
        }

        let completed: Vec<&ResultRow> = results.completed().collect();
        let mut first = self.parent(parameters, &completed, direction)?;
        let mut second = self.parent(parameters, &completed, direction)?;

        let inherit = (1.0 - self.mutation_rate) / 2.0;
        let mut child = Configuration::with_capacity(parameters.len());
        for p in parameters {
            let name = p.name();
            let origin = self.rng.f64();
            let value = if origin < self.mutation_rate {
                Some(p.sample(&mut self.rng)?)
            } else if origin < self.mutation_rate + inherit {
                first.remove(name)
            } else {
                second.remove(name)
            };
            let value = value.ok_or_else(|| Error::MissingParameter(name.to_owned()))?;
            child.insert(name.to_owned(), value);
        }

        self.count += 1;
        Ok(Some(Suggestion::new(child)))
    }

    fn load(&mut self, num_trials: usize) {
        self.count = num_trials;
    }
}

/// Builder for configuring a [`Genetic`] sampler.
///
/// Defaults: `mutation_rate` 0.1, no trial budget, `min_elite` 10, random seed.
#[derive(Debug, Clone, Default)]
pub struct GeneticBuilder {
    mutation_rate: Option<f64>,
    max_num_trials: Option<usize>,
    min_elite: Option<usize>,
    seed: Option<u64>,
}

impl GeneticBuilder {
    /// Sets the per-parameter probability of resampling instead of inheriting.
    #[must_use]
    pub fn mutation_rate(mut self, rate: f64) -> Self {
        self.mutation_rate = Some(rate);
        self
    }

    /// Stop after `n` suggestions.
    #[must_use]
    pub fn max_num_trials(mut self, n: usize) -> Self {
        self.max_num_trials = Some(n);
        self
    }

    /// Sets the number of completed trials required before parents are
    /// drawn from the results.
    #[must_use]
    pub fn min_elite(mut self, n: usize) -> Self {
        self.min_elite = Some(n);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`Genetic`] sampler.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMutationRate`] if the rate is outside `[0, 1]`.
    pub fn build(self) -> Result<Genetic> {
        let mutation_rate = self.mutation_rate.unwrap_or(DEFAULT_MUTATION_RATE);
        if !(0.0..=1.0).contains(&mutation_rate) {
            return Err(Error::InvalidMutationRate(mutation_rate));
        }
        Ok(Genetic {
            mutation_rate,
            max_num_trials: self.max_num_trials,
            min_elite: self.min_elite.unwrap_or(DEFAULT_MIN_ELITE),
            rng: rng_util::from_seed(self.seed),
            count: 0,
        })
    }
}
