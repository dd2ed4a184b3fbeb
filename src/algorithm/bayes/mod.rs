//! Sequential model-based (Bayesian) optimization.
//!
//! The engine moves through three phases:
//!
//! 1. **Seeding**: on the first call a seed set is built from the full grid
//!    over Choice parameters, each grid point completed with one random draw
//!    of the remaining parameters, padded with pure random draws up to
//!    `num_random_seeds`. Seeds are returned verbatim, one per call.
//! 2. **Random fallback**: while no completed observation exists, suggestions
//!    are drawn at random.
//! 3. **Model-based**: completed rows are encoded into a design matrix
//!    ([`Encoder`]) and a Gaussian process with a Matérn 5/2 kernel is fitted
//!    to their objectives. A pool of random candidates is scored by expected
//!    improvement. With `fine_tune` enabled, the continuous coordinates of
//!    the top candidates are refined by a bounded Nelder–Mead search on the
//!    same acquisition surface, and the best refined point wins.
//!
//! A candidate with non-finite expected improvement is never selected. If
//! every candidate is non-finite, or the surrogate cannot be fitted, the
//! engine samples at random for that call.
//!
//! # Configuration
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `num_random_seeds` | 10 | Minimum size of the seed set |
//! | `max_num_trials` | unlimited | Suggestions before returning `None` |
//! | `fine_tune` | `true` | Refine the top candidates with Nelder–Mead |
//! | `acquisition_function` | `"ei"` | Only expected improvement is available |
//! | `n_candidates` | 10 000 | Random candidates scored per call |
//! | `n_refine` | 50 | Top candidates refined when `fine_tune` is on |
//! | `refine_max_iter` | `200 * d` | Nelder–Mead iterations per refined candidate (`d` continuous columns) |
//! | `epsilon` | 1e-5 | Exploration margin subtracted from the improvement |
//! | `noise_variance` | 1e-6 | Observation noise on the standardized objective |
//! | `seed` | random | RNG seed for reproducibility |
//!
//! # Examples
//!
//! ```
//! use tuner::algorithm::Algorithm;
//! use tuner::algorithm::bayes::BayesianOptimization;
//! use tuner::parameter::Parameter;
//! use tuner::results::{ResultRow, ResultsTable};
//! use tuner::{Direction, TrialStatus};
//!
//! let parameters = vec![Parameter::continuous("x", -2.0, 2.0)];
//! let mut bo = BayesianOptimization::builder()
//!     .num_random_seeds(3)
//!     .n_candidates(200)
//!     .seed(7)
//!     .build()
//!     .unwrap();
//!
//! let mut results = ResultsTable::new();
//! for trial_id in 1..=6 {
//!     let s = bo
//!         .get_suggestion(&parameters, &results, Direction::Minimize)
//!         .unwrap()
//!         .unwrap();
//!     let x = s.params["x"].as_f64().unwrap();
//!     results.push(
//!         ResultRow::new(trial_id, TrialStatus::Completed, 0, x * x).params(s.params),
//!     );
//! }
//! ```

mod acquisition;
mod gp;
mod nelder_mead;

use core::str::FromStr;

use crate::algorithm::Algorithm;
use crate::algorithm::common::{compare_objectives, sample_configuration};
use crate::algorithm::grid::cartesian_grid;
use crate::design::Encoder;
use crate::error::{Error, Result};
use crate::parameter::Parameter;
use crate::results::{ResultRow, ResultsTable};
use crate::rng_util;
use crate::suggestion::{Configuration, Suggestion};
use crate::types::Direction;

use self::acquisition::expected_improvement;
use self::gp::GaussianProcess;

const DEFAULT_NUM_RANDOM_SEEDS: usize = 10;
const DEFAULT_N_CANDIDATES: usize = 10_000;
const DEFAULT_N_REFINE: usize = 50;
const DEFAULT_EPSILON: f64 = 1e-5;
const DEFAULT_NOISE_VAR: f64 = 1e-6;

/// Most recent completed observations used to fit the surrogate.
const MAX_TRAIN_POINTS: usize = 200;

/// Acquisition functions understood by [`BayesianOptimization`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum AcquisitionFunction {
    /// Expected improvement (`"ei"`).
    #[default]
    ExpectedImprovement,
}

impl FromStr for AcquisitionFunction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "ei" => Ok(Self::ExpectedImprovement),
            other => Err(Error::UnsupportedAcquisitionFunction(other.to_owned())),
        }
    }
}

/// Gaussian-process Bayesian optimization with expected improvement.
///
/// Construct via [`BayesianOptimization::builder`], or [`BayesianOptimization::new`]
/// for the defaults.
pub struct BayesianOptimization {
    num_random_seeds: usize,
    max_num_trials: Option<usize>,
    fine_tune: bool,
    acquisition: AcquisitionFunction,
    n_candidates: usize,
    n_refine: usize,
    refine_max_iter: Option<usize>,
    epsilon: f64,
    noise_variance: f64,
    rng: fastrand::Rng,
    count: usize,
    seeds: Option<Vec<Configuration>>,
    encoder: Option<Encoder>,
}

impl BayesianOptimization {
    /// Creates an optimizer with default settings and a random seed.
    #[must_use]
    pub fn new() -> Self {
        Self::from_builder(BayesianOptimizationBuilder::new(), AcquisitionFunction::default())
    }

    /// Creates a builder for configuring a `BayesianOptimization`.
    #[must_use]
    pub fn builder() -> BayesianOptimizationBuilder {
        BayesianOptimizationBuilder::new()
    }

    /// Returns the configured acquisition function.
    #[must_use]
    pub fn acquisition_function(&self) -> AcquisitionFunction {
        self.acquisition
    }

    fn from_builder(b: BayesianOptimizationBuilder, acquisition: AcquisitionFunction) -> Self {
        Self {
            num_random_seeds: b.num_random_seeds.unwrap_or(DEFAULT_NUM_RANDOM_SEEDS),
            max_num_trials: b.max_num_trials,
            fine_tune: b.fine_tune.unwrap_or(true),
            acquisition,
            n_candidates: b.n_candidates.unwrap_or(DEFAULT_N_CANDIDATES),
            n_refine: b.n_refine.unwrap_or(DEFAULT_N_REFINE),
            refine_max_iter: b.refine_max_iter,
            epsilon: b.epsilon.unwrap_or(DEFAULT_EPSILON),
            noise_variance: b.noise_variance.unwrap_or(DEFAULT_NOISE_VAR),
            rng: rng_util::from_seed(b.seed),
            count: 0,
            seeds: None,
            encoder: None,
        }
    }

    /// Choice grid crossed with one random draw of everything else, padded
    /// with random configurations up to `num_random_seeds`.
    fn build_seeds(&mut self, parameters: &[Parameter]) -> Result<Vec<Configuration>> {
        let (choices, others): (Vec<&Parameter>, Vec<&Parameter>) =
            parameters.iter().partition(|p| p.is_choice());

        let mut seeds = if choices.is_empty() {
            Vec::new()
        } else {
            cartesian_grid(&choices)
        };
        for config in &mut seeds {
            for p in &others {
                config.insert(p.name().to_owned(), p.sample(&mut self.rng)?);
            }
        }
        while seeds.len() < self.num_random_seeds {
            seeds.push(sample_configuration(parameters, &mut self.rng)?);
        }
        Ok(seeds)
    }

    /// Runs the model-based phase.
    ///
    /// Returns `None` when the surrogate cannot be fitted or no candidate has a
    /// finite expected improvement.
    fn suggest_from_model(
        &mut self,
        parameters: &[Parameter],
        completed: &[&ResultRow],
        direction: Direction,
    ) -> Result<Option<Configuration>> {
        let encoder = self
            .encoder
            .get_or_insert_with(|| Encoder::new(parameters))
            .clone();

        let Some(best) = completed
            .iter()
            .map(|r| r.objective)
            .min_by(|a, b| compare_objectives(*a, *b, direction))
        else {
            return Ok(None);
        };

        let recent = &completed[completed.len().saturating_sub(MAX_TRAIN_POINTS)..];
        let configs = recent
            .iter()
            .map(|r| r.configuration(parameters))
            .collect::<Result<Vec<_>>>()?;
        let x_train = encoder.encode_all(&configs)?;
        let y_train: Vec<f64> = recent.iter().map(|r| r.objective).collect();

        let Some(model) = GaussianProcess::fit(&x_train, &y_train, self.noise_variance) else {
            trace_debug!(n = y_train.len(), "surrogate fit failed");
            return Ok(None);
        };

        let epsilon = self.epsilon;
        let score = |x: &[f64]| {
            let (mean, std) = model.predict(x);
            expected_improvement(mean, std, best, epsilon, direction)
        };

        let candidates = (0..self.n_candidates)
            .map(|_| sample_configuration(parameters, &mut self.rng))
            .collect::<Result<Vec<_>>>()?;
        let features = encoder.encode_all(&candidates)?;
        let scores: Vec<f64> = features.iter().map(|x| score(x)).collect();

        let Some(order) = rank_candidates(&scores) else {
            trace_debug!("no candidate with finite expected improvement");
            return Ok(None);
        };
        let top = order[0];

        if !self.fine_tune {
            return Ok(Some(candidates[top].clone()));
        }

        let continuous = encoder.continuous_columns();
        let bounds: Vec<(f64, f64)> = continuous
            .iter()
            .map(|&c| encoder.columns()[c].bounds.unwrap_or((f64::MIN, f64::MAX)))
            .collect();

        let options = nelder_mead::Options {
            max_iter: self.refine_max_iter,
            ..nelder_mead::Options::default()
        };
        let refined = order.iter().take(self.n_refine).map(|&i| {
            let base = &features[i];
            let start: Vec<f64> = continuous.iter().map(|&c| base[c]).collect();
            let objective = |sub: &[f64]| {
                let mut x = base.clone();
                for (&c, &v) in continuous.iter().zip(sub) {
                    x[c] = v;
                }
                -score(&x)
            };
            let (sub, neg_ei) = nelder_mead::minimize(objective, &start, &bounds, options);
            let mut x = base.clone();
            for (&c, &v) in continuous.iter().zip(&sub) {
                x[c] = v;
            }
            (x, -neg_ei)
        });

        match first_best(refined) {
            Some(x) => Ok(Some(encoder.decode(&x)?)),
            None => Ok(Some(candidates[top].clone())),
        }
    }
}

/// Indices of the finite scores, best first.
///
/// The sort is stable, so equal scores keep pool order. Returns `None` when no
/// score is finite.
fn rank_candidates(scores: &[f64]) -> Option<Vec<usize>> {
    let mut order: Vec<usize> = (0..scores.len())
        .filter(|&i| scores[i].is_finite())
        .collect();
    if order.is_empty() {
        return None;
    }
    order.sort_by(|&a, &b| scores[b].total_cmp(&scores[a]));
    Some(order)
}

/// The point with the highest finite score; the earliest one wins ties.
fn first_best<I>(points: I) -> Option<Vec<f64>>
where
    I: IntoIterator<Item = (Vec<f64>, f64)>,
{
    let mut best: Option<(Vec<f64>, f64)> = None;
    for (x, score) in points {
        if score.is_finite() && best.as_ref().is_none_or(|(_, b)| score > *b) {
            best = Some((x, score));
        }
    }
    best.map(|(x, _)| x)
}

impl Default for BayesianOptimization {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for BayesianOptimization {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        results: &ResultsTable,
        direction: Direction,
    ) -> Result<Option<Suggestion>> {
        if self.max_num_trials.is_some_and(|max| self.count >= max) {
            return Ok(None);
        }
        self.count += 1;

        if self.seeds.is_none() {
            let seeds = self.build_seeds(parameters)?;
            trace_info!(n_seeds = seeds.len(), "bayesian optimization seeded");
            self.seeds = Some(seeds);
        }
        if let Some(seed) = self
            .seeds
            .as_ref()
            .and_then(|seeds| seeds.get(self.count - 1))
        {
            return Ok(Some(Suggestion::new(seed.clone())));
        }

        let completed: Vec<&ResultRow> = results
            .completed()
            .filter(|r| r.objective.is_finite())
            .collect();
        if completed.is_empty() {
            trace_debug!("no completed observations, sampling randomly");
            let config = sample_configuration(parameters, &mut self.rng)?;
            return Ok(Some(Suggestion::new(config)));
        }

        let config = match self.suggest_from_model(parameters, &completed, direction)? {
            Some(config) => config,
            None => sample_configuration(parameters, &mut self.rng)?,
        };
        Ok(Some(Suggestion::new(config)))
    }

    fn load(&mut self, num_trials: usize) {
        self.count = num_trials;
    }
}

/// Builder for configuring a [`BayesianOptimization`].
///
/// # Examples
///
/// ```
/// use tuner::algorithm::bayes::BayesianOptimization;
///
/// let bo = BayesianOptimization::builder()
///     .num_random_seeds(5)
///     .max_num_trials(50)
///     .fine_tune(false)
///     .acquisition_function("ei")
///     .seed(42)
///     .build()
///     .unwrap();
///
/// assert!(
///     BayesianOptimization::builder()
///         .acquisition_function("pi")
///         .build()
///         .is_err()
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct BayesianOptimizationBuilder {
    num_random_seeds: Option<usize>,
    max_num_trials: Option<usize>,
    fine_tune: Option<bool>,
    acquisition_function: Option<String>,
    n_candidates: Option<usize>,
    n_refine: Option<usize>,
    refine_max_iter: Option<usize>,
    epsilon: Option<f64>,
    noise_variance: Option<f64>,
    seed: Option<u64>,
}

impl BayesianOptimizationBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum number of seed configurations.
    ///
    /// Default: 10.
    #[must_use]
    pub fn num_random_seeds(mut self, n: usize) -> Self {
        self.num_random_seeds = Some(n);
        self
    }

    /// Stop after `n` suggestions.
    #[must_use]
    pub fn max_num_trials(mut self, n: usize) -> Self {
        self.max_num_trials = Some(n);
        self
    }

    /// Enables or disables Nelder–Mead refinement of the top candidates.
    ///
    /// Default: `true`.
    #[must_use]
    pub fn fine_tune(mut self, enabled: bool) -> Self {
        self.fine_tune = Some(enabled);
        self
    }

    /// Sets the acquisition function by name. Only `"ei"` is supported;
    /// anything else makes [`build`](Self::build) fail.
    #[must_use]
    pub fn acquisition_function(mut self, name: impl Into<String>) -> Self {
        self.acquisition_function = Some(name.into());
        self
    }

    /// Sets the number of random candidates scored per suggestion.
    ///
    /// Default: 10 000.
    #[must_use]
    pub fn n_candidates(mut self, n: usize) -> Self {
        self.n_candidates = Some(n);
        self
    }

    /// Sets how many of the best candidates are refined.
    ///
    /// Default: 50.
    #[must_use]
    pub fn n_refine(mut self, n: usize) -> Self {
        self.n_refine = Some(n);
        self
    }

    /// Caps the Nelder–Mead iterations spent refining each candidate.
    ///
    /// Default: 200 times the number of continuous columns. A cap of 0 keeps
    /// the candidates as sampled.
    #[must_use]
    pub fn refine_max_iter(mut self, n: usize) -> Self {
        self.refine_max_iter = Some(n);
        self
    }

    /// Sets the exploration margin of expected improvement.
    ///
    /// Default: 1e-5.
    #[must_use]
    pub fn epsilon(mut self, epsilon: f64) -> Self {
        self.epsilon = Some(epsilon);
        self
    }

    /// Sets the observation noise variance added to the kernel diagonal.
    ///
    /// Default: 1e-6.
    #[must_use]
    pub fn noise_variance(mut self, v: f64) -> Self {
        self.noise_variance = Some(v);
        self
    }

    /// Sets the random seed for reproducibility.
    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Builds the configured [`BayesianOptimization`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnsupportedAcquisitionFunction`] for any acquisition
    /// function other than `"ei"`.
    pub fn build(self) -> Result<BayesianOptimization> {
        let acquisition = match self.acquisition_function.as_deref() {
            Some(name) => name.parse()?,
            None => AcquisitionFunction::default(),
        };
        Ok(BayesianOptimization::from_builder(self, acquisition))
    }
}
