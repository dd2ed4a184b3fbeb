//! Stopping-rule trait and implementations for early termination of trials.
//!
//! A stopping rule looks at the results table and decides whether one
//! in-progress trial should be stopped, typically because it is doing
//! worse than its peers. Rules are pure decision functions over the snapshot
//! they are given.

mod median;

pub use median::MedianStoppingRule;

use crate::results::ResultsTable;
use crate::types::Direction;

/// Trait for pluggable early-stopping decisions.
///
/// # Implementing a custom rule
///
/// ```
/// use tuner::Direction;
/// use tuner::results::ResultsTable;
/// use tuner::stopping::StoppingRule;
///
/// struct Threshold(f64);
///
/// impl StoppingRule for Threshold {
///     fn should_trial_stop(
///         &self,
///         trial_id: u64,
///         results: &ResultsTable,
///         direction: Direction,
///     ) -> bool {
///         results
///             .trial_rows(trial_id)
///             .last()
///             .is_some_and(|r| direction.is_better(self.0, r.objective))
///     }
/// }
/// ```
pub trait StoppingRule {
    /// Decide whether `trial_id` should be stopped given all results so far.
    fn should_trial_stop(
        &self,
        trial_id: u64,
        results: &ResultsTable,
        direction: Direction,
    ) -> bool;
}

impl<R: StoppingRule + ?Sized> StoppingRule for Box<R> {
    fn should_trial_stop(
        &self,
        trial_id: u64,
        results: &ResultsTable,
        direction: Direction,
    ) -> bool {
        (**self).should_trial_stop(trial_id, results, direction)
    }
}
