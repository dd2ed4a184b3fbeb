use super::StoppingRule;
use crate::results::{ResultRow, ResultsTable};
use crate::types::Direction;

/// Stop a trial whose best objective is worse than the median of its peers'.
///
/// For the target trial and every other trial that has reached
/// `min_iterations`, the best objective over all of its rows is computed
/// (NaN rows are skipped). The target is stopped if its best value is
/// strictly worse than the median of the peers' best values. A target whose
/// rows are all NaN is stopped immediately.
///
/// Nothing is stopped while the target is below `min_iterations` or fewer
/// than `min_trials` peers qualify.
///
/// # Examples
///
/// ```
/// use tuner::stopping::MedianStoppingRule;
///
/// // Compare only after iteration 5 and once three peers are available
/// let rule = MedianStoppingRule::new()
///     .min_iterations(5)
///     .min_trials(3);
/// ```
#[derive(Clone, Debug)]
pub struct MedianStoppingRule {
    /// Don't compare trials whose highest iteration is below this.
    min_iterations: u64,
    /// Require at least this many qualifying peers.
    min_trials: usize,
}

impl MedianStoppingRule {
    /// Create a rule with `min_iterations` 0 and `min_trials` 1.
    #[must_use]
    pub fn new() -> Self {
        Self {
            min_iterations: 0,
            min_trials: 1,
        }
    }

    /// Set the minimum iteration a trial must reach before it is compared.
    #[must_use]
    pub fn min_iterations(mut self, n: u64) -> Self {
        self.min_iterations = n;
        self
    }

    /// Set the minimum number of qualifying peer trials.
    #[must_use]
    pub fn min_trials(mut self, n: usize) -> Self {
        self.min_trials = n;
        self
    }

    /// Best objective of `rows` if they reach `min_iterations`.
    ///
    /// `None` means the trial has no rows or is below the gate; `Some(NaN)`
    /// means every objective is NaN.
    fn qualifying_best<'a, I>(&self, rows: I, direction: Direction) -> Option<f64>
    where
        I: IntoIterator<Item = &'a ResultRow>,
    {
        let mut max_iteration = None;
        let mut best = f64::NAN;
        for row in rows {
            max_iteration = max_iteration.max(Some(row.iteration));
            let v = row.objective;
            if !v.is_nan() && (best.is_nan() || direction.is_better(v, best)) {
                best = v;
            }
        }
        max_iteration.filter(|&m| m >= self.min_iterations)?;
        Some(best)
    }
}

impl Default for MedianStoppingRule {
    fn default() -> Self {
        Self::new()
    }
}

impl StoppingRule for MedianStoppingRule {
    fn should_trial_stop(
        &self,
        trial_id: u64,
        results: &ResultsTable,
        direction: Direction,
    ) -> bool {
        if results.is_empty() {
            return false;
        }

        let Some(target) = self.qualifying_best(results.trial_rows(trial_id), direction) else {
            return false;
        };
        if target.is_nan() {
            trace_debug!(trial_id, "stopping trial with only NaN objectives");
            return true;
        }

        let peers: Vec<f64> = results
            .trial_ids()
            .into_iter()
            .filter(|&id| id != trial_id)
            .filter_map(|id| self.qualifying_best(results.trial_rows(id), direction))
            .collect();
        if peers.len() < self.min_trials {
            return false;
        }

        let mut finite: Vec<f64> = peers.into_iter().filter(|v| !v.is_nan()).collect();
        if finite.is_empty() {
            return false;
        }
        let median = compute_median(&mut finite);

        let stop = direction.is_better(median, target);
        if stop {
            trace_debug!(trial_id, target, median, "median rule stops trial");
        }
        stop
    }
}

/// Compute the median of a non-empty slice. Sorts the slice in place.
fn compute_median(values: &mut [f64]) -> f64 {
    values.sort_unstable_by(f64::total_cmp);
    let len = values.len();
    if len % 2 == 1 {
        values[len / 2]
    } else {
        f64::midpoint(values[len / 2 - 1], values[len / 2])
    }
}
