#![forbid(unsafe_code)]
#![deny(clippy::all)]
#![deny(unreachable_pub)]
#![deny(clippy::correctness)]
#![deny(clippy::suspicious)]
#![deny(clippy::style)]
#![deny(clippy::complexity)]
#![deny(clippy::perf)]
#![deny(clippy::pedantic)]
#![deny(clippy::std_instead_of_core)]

//! Black-box hyperparameter optimization engine: given a declared parameter
//! space and a growing table of trial observations, it proposes the next
//! configuration to evaluate and decides whether a running trial should be
//! stopped early.
//!
//! The crate is the algorithm layer only. Running evaluations, persisting the
//! results table and assigning trial IDs are left to the caller, which feeds
//! a fresh [`ResultsTable`](results::ResultsTable) snapshot into every call.
//!
//! # Getting Started
//!
//! ```
//! use tuner::prelude::*;
//!
//! let parameters = vec![
//!     Parameter::continuous("x", -5.0, 5.0),
//!     Parameter::choice("kind", vec!["a", "b"]),
//! ];
//! let mut algorithm = RandomSearch::with_seed(42).max_num_trials(20);
//! let mut results = ResultsTable::new();
//!
//! let mut trial_id = 0;
//! while let Some(s) = algorithm
//!     .get_suggestion(&parameters, &results, Direction::Minimize)
//!     .unwrap()
//! {
//!     trial_id += 1;
//!     let x = s.params["x"].as_f64().unwrap();
//!     results.push(ResultRow::new(trial_id, TrialStatus::Completed, 0, x * x).params(s.params));
//! }
//! assert_eq!(results.len(), 20);
//! ```
//!
//! # Core Concepts
//!
//! | Type | Role |
//! |------|------|
//! | [`Parameter`](parameter::Parameter) | A named search dimension: Choice, Continuous, Discrete or Ordinal. |
//! | [`ResultsTable`](results::ResultsTable) | Row-per-observation snapshot of every trial so far. |
//! | [`Suggestion`](suggestion::Suggestion) | The next configuration, plus lineage for population-based training. |
//! | [`Algorithm`](algorithm::Algorithm) | Strategy proposing the next configuration. |
//! | [`StoppingRule`](stopping::StoppingRule) | Decides whether a running trial should stop. |
//! | [`Direction`] | Whether lower (`Minimize`) or higher (`Maximize`) objectives are better. |
//!
//! # Algorithm Guide
//!
//! | Algorithm | Strategy | Best for |
//! |-----------|----------|----------|
//! | [`RandomSearch`](algorithm::random::RandomSearch) | Uniform random | Baselines, high-dimensional spaces |
//! | [`GridSearch`](algorithm::grid::GridSearch) | Exhaustive Choice grid | Small, discrete spaces |
//! | [`LocalSearch`](algorithm::local::LocalSearch) | Hill climbing around the incumbent | Refining a known good configuration |
//! | [`BayesianOptimization`](algorithm::bayes::BayesianOptimization) | Gaussian process + expected improvement | Expensive objectives, few trials |
//! | [`PopulationBasedTraining`](algorithm::pbt::PopulationBasedTraining) | Exploit and perturb by generation | Schedules for long training runs |
//! | [`Genetic`](algorithm::genetic::Genetic) | Crossover of elite trials with mutation | Mixed spaces with many cheap trials |
//!
//! # Feature Flags
//!
//! | Flag | What it enables | Default |
//! |------|----------------|---------|
//! | `serde` | `Serialize`/`Deserialize` on parameters, results and suggestions | off |
//! | `tracing` | Structured log events via [`tracing`](https://docs.rs/tracing) at phase changes and fallbacks | off |

/// Emit a `tracing::info!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_info {
    ($($arg:tt)*) => { tracing::info!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_info {
    ($($arg:tt)*) => {};
}

/// Emit a `tracing::debug!` event when the `tracing` feature is enabled.
/// No-op otherwise.
#[cfg(feature = "tracing")]
macro_rules! trace_debug {
    ($($arg:tt)*) => { tracing::debug!($($arg)*) };
}

#[cfg(not(feature = "tracing"))]
macro_rules! trace_debug {
    ($($arg:tt)*) => {};
}

pub mod algorithm;
pub mod design;
pub mod distribution;
mod error;
mod param;
pub mod parameter;
pub mod results;
mod rng_util;
pub mod stopping;
pub mod suggestion;
mod types;

pub use error::{Error, Result};
pub use param::ParamValue;
pub use types::{Direction, TrialStatus};

/// Convenient wildcard import for the most common types.
///
/// ```
/// use tuner::prelude::*;
/// ```
pub mod prelude {
    pub use crate::algorithm::Algorithm;
    pub use crate::algorithm::bayes::{
        AcquisitionFunction, BayesianOptimization, BayesianOptimizationBuilder,
    };
    pub use crate::algorithm::genetic::{Genetic, GeneticBuilder};
    pub use crate::algorithm::grid::GridSearch;
    pub use crate::algorithm::local::LocalSearch;
    pub use crate::algorithm::pbt::{PopulationBasedTraining, PopulationBasedTrainingBuilder};
    pub use crate::algorithm::random::RandomSearch;
    pub use crate::design::{Encoder, FeatureColumn, FeatureKind};
    pub use crate::distribution::{Distribution, Scale};
    pub use crate::error::{Error, Result};
    pub use crate::parameter::{ParamValue, Parameter};
    pub use crate::results::{ResultRow, ResultsTable};
    pub use crate::stopping::{MedianStoppingRule, StoppingRule};
    pub use crate::suggestion::{Configuration, Lineage, Suggestion};
    pub use crate::types::{Direction, TrialStatus};
}
