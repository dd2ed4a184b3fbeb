//! Local search (hill climbing) around the best observed configuration.
//!
//! The sampler runs in three stages:
//!
//! 1. **Explicit seeds**: every configured seed configuration, verbatim and
//!    in order.
//! 2. **Random seeds**: `num_random_seeds` independent random samples.
//! 3. **Hill climbing**: take the best completed configuration, resample one
//!    randomly chosen parameter, and repeat until the result differs from
//!    every configuration tried so far (rows of the results table plus every
//!    suggestion this instance already returned).
//!
//! Whenever no completed, non-NaN result exists yet the sampler falls back to
//! pure random sampling.

use crate::algorithm::Algorithm;
use crate::algorithm::common::{compare_objectives, same_configuration};
use crate::algorithm::random::RandomSearch;
use crate::error::Result;
use crate::parameter::Parameter;
use crate::results::ResultsTable;
use crate::rng_util;
use crate::suggestion::{Configuration, Suggestion};
use crate::types::Direction;

/// Default number of random samples after the explicit seeds.
const DEFAULT_NUM_RANDOM_SEEDS: usize = 10;

/// Upper bound on single-parameter perturbations tried before giving up
/// on finding an untried neighbour.
const MAX_PERTURBATION_ATTEMPTS: usize = 1000;

/// Seeded hill climber that perturbs one parameter of the incumbent at a time.
///
/// # Examples
///
/// ```
/// use tuner::algorithm::local::LocalSearch;
/// use tuner::suggestion::Configuration;
///
/// let mut seed = Configuration::new();
/// seed.insert("x".into(), 0.5.into());
///
/// let search = LocalSearch::with_seed(42)
///     .num_random_seeds(3)
///     .seed_configurations(vec![seed]);
/// ```
pub struct LocalSearch {
    num_random_seeds: usize,
    seed_configurations: Vec<Configuration>,
    count: usize,
    random: RandomSearch,
    rng: fastrand::Rng,
    returned: Vec<Configuration>,
}

impl LocalSearch {
    /// Creates a local search with a random seed, 10 random seeds and no explicit seeds.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    /// Creates a local search with a fixed RNG seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(mut rng: fastrand::Rng) -> Self {
        let random = RandomSearch::with_seed(rng.u64(..));
        Self {
            num_random_seeds: DEFAULT_NUM_RANDOM_SEEDS,
            seed_configurations: Vec::new(),
            count: 0,
            random,
            rng,
            returned: Vec::new(),
        }
    }

    /// Sets the number of random samples emitted after the explicit seeds.
    #[must_use]
    pub fn num_random_seeds(mut self, n: usize) -> Self {
        self.num_random_seeds = n;
        self
    }

    /// Sets configurations to emit verbatim before anything else.
    #[must_use]
    pub fn seed_configurations(mut self, seeds: Vec<Configuration>) -> Self {
        self.seed_configurations = seeds;
        self
    }

    fn emit(&mut self, config: Configuration) -> Option<Suggestion> {
        self.returned.push(config.clone());
        Some(Suggestion::new(config))
    }

    fn is_tried(
        &self,
        parameters: &[Parameter],
        results: &ResultsTable,
        config: &Configuration,
    ) -> bool {
        results
            .rows()
            .iter()
            .any(|r| same_configuration(parameters, config, &r.params))
            || self
                .returned
                .iter()
                .any(|c| same_configuration(parameters, config, c))
    }

    /// Resample one parameter of `best` at a time until an untried configuration appears.
    fn perturb(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        best: &Configuration,
    ) -> Result<Option<Configuration>> {
        let mut candidate = best.clone();
        for _ in 0..MAX_PERTURBATION_ATTEMPTS {
            if !self.is_tried(parameters, results, &candidate) {
                return Ok(Some(candidate));
            }
            let Some(p) = rng_util::choose(&mut self.rng, parameters) else {
                return Ok(None);
            };
            candidate = best.clone();
            candidate.insert(p.name().to_owned(), p.sample(&mut self.rng)?);
        }
        Ok(None)
    }
}

impl Default for LocalSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for LocalSearch {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        direction: Direction,
    ) -> Result<Option<Suggestion>> {
        self.count += 1;
        let n_seeds = self.seed_configurations.len();

        if self.count <= n_seeds {
            let seed = self.seed_configurations[self.count - 1].clone();
            return Ok(self.emit(seed));
        }
        if self.count <= n_seeds + self.num_random_seeds {
            let config = self.random.sample(parameters)?;
            return Ok(self.emit(config));
        }

        let best = results
            .completed()
            .filter(|r| !r.objective.is_nan())
            .min_by(|a, b| compare_objectives(a.objective, b.objective, direction));
        let Some(best) = best else {
            trace_debug!("local search: no completed results, sampling randomly");
            let config = self.random.sample(parameters)?;
            return Ok(self.emit(config));
        };

        let best = best.configuration(parameters)?;
        let config = if let Some(config) = self.perturb(parameters, results, &best)? {
            config
        } else {
            trace_debug!("local search: neighbourhood exhausted, sampling randomly");
            self.random.sample(parameters)?
        };
        Ok(self.emit(config))
    }

    fn load(&mut self, num_trials: usize) {
        self.count = num_trials;
    }
}
