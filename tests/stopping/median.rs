use tuner::results::{ResultRow, ResultsTable};
use tuner::stopping::{MedianStoppingRule, StoppingRule};
use tuner::{Direction, TrialStatus};

/// Three trials reporting iterations 0 to 3; trial `k` reports `k / 10` at
/// every iteration.
fn three_trials() -> ResultsTable {
    (1..=3u32)
        .flat_map(|trial| {
            (0..=3).map(move |iteration| {
                ResultRow::new(
                    u64::from(trial),
                    TrialStatus::Intermediate,
                    iteration,
                    f64::from(trial) / 10.0,
                )
            })
        })
        .collect()
}

// --- Minimize direction ---

#[test]
fn stops_trial_worse_than_median_minimize() {
    let rule = MedianStoppingRule::new().min_iterations(2);
    // Peers of trial 3 have best values [0.1, 0.2] => median 0.15 < 0.3
    assert!(rule.should_trial_stop(3, &three_trials(), Direction::Minimize));
}

#[test]
fn keeps_trial_better_than_median_minimize() {
    let rule = MedianStoppingRule::new().min_iterations(2);
    // Peers of trial 1: [0.2, 0.3] => median 0.25 > 0.1
    assert!(!rule.should_trial_stop(1, &three_trials(), Direction::Minimize));
}

#[test]
fn keeps_trial_equal_to_median() {
    let results: ResultsTable = [
        ResultRow::new(1, TrialStatus::Intermediate, 0, 0.1),
        ResultRow::new(2, TrialStatus::Intermediate, 0, 0.2),
        ResultRow::new(3, TrialStatus::Intermediate, 0, 0.3),
        ResultRow::new(4, TrialStatus::Intermediate, 0, 0.2),
    ]
    .into_iter()
    .collect();
    // Peers of trial 4: [0.1, 0.2, 0.3] => median 0.2, equal is not worse
    let rule = MedianStoppingRule::new();
    assert!(!rule.should_trial_stop(4, &results, Direction::Minimize));
}

// --- Maximize direction ---

#[test]
fn stops_trial_worse_than_median_maximize() {
    let rule = MedianStoppingRule::new().min_iterations(2);
    assert!(rule.should_trial_stop(1, &three_trials(), Direction::Maximize));
    assert!(!rule.should_trial_stop(3, &three_trials(), Direction::Maximize));
}

// --- Gates ---

#[test]
fn min_iterations_not_reached() {
    let rule = MedianStoppingRule::new().min_iterations(4);
    assert!(!rule.should_trial_stop(3, &three_trials(), Direction::Minimize));
}

#[test]
fn too_few_peers() {
    let rule = MedianStoppingRule::new().min_iterations(2).min_trials(4);
    assert!(!rule.should_trial_stop(3, &three_trials(), Direction::Minimize));
}

#[test]
fn peers_below_min_iterations_are_ignored() {
    let mut results = three_trials();
    // A fast peer that never reached iteration 2
    results.push(ResultRow::new(4, TrialStatus::Intermediate, 0, 0.0));
    let rule = MedianStoppingRule::new().min_iterations(2).min_trials(3);
    assert!(!rule.should_trial_stop(3, &results, Direction::Minimize));
}

#[test]
fn empty_results_never_stop() {
    let rule = MedianStoppingRule::default();
    assert!(!rule.should_trial_stop(1, &ResultsTable::new(), Direction::Minimize));
}

#[test]
fn best_value_over_all_rows_is_compared() {
    let results: ResultsTable = [
        // Trial 1 was once very good
        ResultRow::new(1, TrialStatus::Intermediate, 0, 0.05),
        ResultRow::new(1, TrialStatus::Intermediate, 1, 0.9),
        ResultRow::new(2, TrialStatus::Intermediate, 0, 0.2),
        ResultRow::new(2, TrialStatus::Intermediate, 1, 0.3),
        ResultRow::new(3, TrialStatus::Completed, 1, 0.4),
    ]
    .into_iter()
    .collect();
    let rule = MedianStoppingRule::new().min_iterations(1);
    assert!(!rule.should_trial_stop(1, &results, Direction::Minimize));
    assert!(rule.should_trial_stop(3, &results, Direction::Minimize));
}

#[test]
fn boxed_rule_delegates() {
    let rule: Box<dyn StoppingRule> = Box::new(MedianStoppingRule::new().min_iterations(2));
    assert!(rule.should_trial_stop(3, &three_trials(), Direction::Minimize));
}
