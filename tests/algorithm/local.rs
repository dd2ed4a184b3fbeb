use tuner::algorithm::Algorithm;
use tuner::algorithm::local::LocalSearch;
use tuner::algorithm::random::RandomSearch;
use tuner::suggestion::Configuration;

use crate::{best_configuration, previous_configurations, sample_results_and_params};

#[test]
fn seeds_then_random_then_hill_climb() {
    let (parameters, results, direction) = sample_results_and_params();
    let previous = previous_configurations(&parameters, &results);
    let best = best_configuration(&parameters, &results);

    let num_random_seeds = 3;
    let mut rs = RandomSearch::with_seed(11);
    let seeds: Vec<Configuration> = (0..5)
        .map(|_| {
            rs.get_suggestion(&parameters, &results, direction)
                .unwrap()
                .unwrap()
                .params
        })
        .collect();

    let mut search = LocalSearch::with_seed(12)
        .num_random_seeds(num_random_seeds)
        .seed_configurations(seeds.clone());
    let mut returned: Vec<Configuration> = Vec::new();

    for seed in &seeds {
        let s = search
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
            .unwrap();
        assert_eq!(&s.params, seed);
        returned.push(s.params);
    }

    for _ in 0..num_random_seeds {
        let s = search
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
            .unwrap();
        assert!(!seeds.contains(&s.params));
        assert!(!previous.contains(&s.params));
        returned.push(s.params);
    }

    for _ in 0..10 {
        let s = search
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
            .unwrap();
        assert!(
            s.params["param_a"] == best["param_a"] || s.params["param_b"] == best["param_b"],
            "{:?} is not a neighbour of {best:?}",
            s.params
        );
        assert!(!returned.contains(&s.params), "configuration repeated");
        assert!(!previous.contains(&s.params));
        returned.push(s.params);
    }
}

#[test]
fn climbs_from_random_when_table_is_empty() {
    let (parameters, _, direction) = sample_results_and_params();
    let mut search = LocalSearch::with_seed(1).num_random_seeds(0);
    let s = search
        .get_suggestion(&parameters, &tuner::results::ResultsTable::new(), direction)
        .unwrap()
        .unwrap();
    assert_eq!(s.params.len(), 2);
}
