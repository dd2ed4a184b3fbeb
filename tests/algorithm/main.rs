#![allow(
    clippy::cast_sign_loss,
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation
)]

mod bayes;
mod genetic;
mod grid;
mod local;
mod pbt;
mod random;

use tuner::parameter::Parameter;
use tuner::results::{ResultRow, ResultsTable};
use tuner::suggestion::Configuration;
use tuner::{Direction, TrialStatus};

/// Two-parameter space with a synthetic training history.
///
/// `param_a` is a Choice over `[1, 2, 3]`, `param_b` is Continuous on
/// `[0, 1]`. Each of the 30 trials reports iterations 0 to 2 as
/// intermediate rows and a completed row at iteration 3, with
/// `loss = param_a / (iteration + 1) * param_b`.
pub(crate) fn sample_results_and_params() -> (Vec<Parameter>, ResultsTable, Direction) {
    let parameters = vec![
        Parameter::choice("param_a", vec![1, 2, 3]),
        Parameter::continuous("param_b", 0.0, 1.0),
    ];

    let mut rng = fastrand::Rng::with_seed(2024);
    let mut results = ResultsTable::new();
    for trial_id in 1..=30u64 {
        let a = rng.i64(1..=3);
        let b = rng.f64();
        for iteration in 0..=3u64 {
            let status = if iteration == 3 {
                TrialStatus::Completed
            } else {
                TrialStatus::Intermediate
            };
            let loss = a as f64 / (iteration as f64 + 1.0) * b;
            results.push(
                ResultRow::new(trial_id, status, iteration, loss)
                    .param("param_a", a)
                    .param("param_b", b),
            );
        }
    }
    (parameters, results, Direction::Minimize)
}

/// Configuration of the completed row with the lowest objective.
pub(crate) fn best_configuration(parameters: &[Parameter], results: &ResultsTable) -> Configuration {
    results
        .completed()
        .min_by(|a, b| a.objective.total_cmp(&b.objective))
        .unwrap()
        .configuration(parameters)
        .unwrap()
}

/// Every configuration present in the table, one per row.
pub(crate) fn previous_configurations(
    parameters: &[Parameter],
    results: &ResultsTable,
) -> Vec<Configuration> {
    results
        .rows()
        .iter()
        .map(|r| r.configuration(parameters).unwrap())
        .collect()
}
