use tuner::algorithm::Algorithm;
use tuner::algorithm::genetic::Genetic;
use tuner::results::ResultsTable;

use crate::sample_results_and_params;

#[test]
fn children_stay_in_the_search_space() {
    let (parameters, results, direction) = sample_results_and_params();
    let mut genetic = Genetic::builder().mutation_rate(0.3).seed(1).build().unwrap();
    for _ in 0..50 {
        let s = genetic
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
            .unwrap();
        assert!(matches!(s.params["param_a"].as_i64(), Some(1..=3)));
        let b = s.params["param_b"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&b));
    }
}

#[test]
fn samples_randomly_without_an_elite() {
    let (parameters, _, direction) = sample_results_and_params();
    let mut genetic = Genetic::builder().seed(2).build().unwrap();
    let empty = ResultsTable::new();
    let suggestions: Vec<_> = (0..5)
        .map(|_| {
            genetic
                .get_suggestion(&parameters, &empty, direction)
                .unwrap()
                .unwrap()
        })
        .collect();
    assert!(suggestions.iter().all(|s| s.params.len() == 2));
    assert!(suggestions.windows(2).any(|w| w[0].params != w[1].params));
}

#[test]
fn budget_limits_suggestions() {
    let (parameters, results, direction) = sample_results_and_params();
    let mut genetic = Genetic::builder().max_num_trials(3).seed(3).build().unwrap();
    let produced = std::iter::from_fn(|| {
        genetic
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
    })
    .take(10)
    .count();
    assert_eq!(produced, 3);

    genetic.load(1);
    assert!(
        genetic
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
            .is_some()
    );
}
