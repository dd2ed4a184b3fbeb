use std::collections::HashSet;

use tuner::algorithm::Algorithm;
use tuner::algorithm::grid::GridSearch;
use tuner::parameter::Parameter;
use tuner::results::ResultsTable;
use tuner::{Direction, Error};

#[test]
fn enumerates_every_combination_once() {
    let parameters = Parameter::grid(vec![
        ("a", vec![tuner::ParamValue::from(1), 2.into()]),
        ("b", vec!["a".into(), "b".into()]),
    ]);
    let results = ResultsTable::new();
    let mut grid = GridSearch::new();

    let mut seen = HashSet::new();
    while let Some(s) = grid
        .get_suggestion(&parameters, &results, Direction::Minimize)
        .unwrap()
    {
        let pair = (
            s.params["a"].as_i64().unwrap(),
            s.params["b"].as_str().unwrap().to_owned(),
        );
        assert!(seen.insert(pair), "grid point returned twice");
    }

    let expected: HashSet<(i64, String)> = [(1, "a"), (1, "b"), (2, "a"), (2, "b")]
        .into_iter()
        .map(|(a, b)| (a, b.to_owned()))
        .collect();
    assert_eq!(seen, expected);
    assert_eq!(grid.grid_size(), Some(4));
}

#[test]
fn stays_exhausted() {
    let parameters = Parameter::grid(vec![("a", vec![1])]);
    let results = ResultsTable::new();
    let mut grid = GridSearch::new();
    assert!(
        grid.get_suggestion(&parameters, &results, Direction::Maximize)
            .unwrap()
            .is_some()
    );
    for _ in 0..3 {
        assert!(
            grid.get_suggestion(&parameters, &results, Direction::Maximize)
                .unwrap()
                .is_none()
        );
    }
}

#[test]
fn rejects_continuous_parameter() {
    let parameters = vec![Parameter::continuous("lr", 0.0, 1.0)];
    let err = GridSearch::new()
        .get_suggestion(&parameters, &ResultsTable::new(), Direction::Minimize)
        .unwrap_err();
    assert!(matches!(err, Error::NonChoiceGridParameter(_)));
}
