use std::collections::HashSet;

use tuner::algorithm::Algorithm;
use tuner::algorithm::random::RandomSearch;
use tuner::parameter::Parameter;
use tuner::results::ResultsTable;
use tuner::{Direction, ParamValue};

#[test]
fn without_repetition_covers_choice_grid() {
    let parameters = Parameter::grid(vec![
        ("a", vec![ParamValue::from(1), 2.into(), 3.into()]),
        ("b", vec!["a".into(), "b".into(), "c".into()]),
    ]);
    let results = ResultsTable::new();
    let mut search = RandomSearch::with_seed(5)
        .max_num_trials(9)
        .without_repetition();

    let mut seen = HashSet::new();
    let mut n = 0;
    while let Some(s) = search
        .get_suggestion(&parameters, &results, Direction::Minimize)
        .unwrap()
    {
        n += 1;
        seen.insert((
            s.params["a"].as_i64().unwrap(),
            s.params["b"].as_str().unwrap().to_owned(),
        ));
    }
    assert_eq!(n, 9);
    assert_eq!(seen.len(), 9);
}

#[test]
fn without_repetition_with_continuous_parameter() {
    let parameters = vec![
        Parameter::continuous("a", 0.0, 1.0),
        Parameter::choice("b", vec![0, 1, 2]),
    ];
    let results = ResultsTable::new();
    let mut search = RandomSearch::with_seed(6)
        .max_num_trials(9)
        .without_repetition();

    let mut seen = Vec::new();
    while let Some(s) = search
        .get_suggestion(&parameters, &results, Direction::Minimize)
        .unwrap()
    {
        seen.push((
            s.params["a"].as_f64().unwrap().to_bits(),
            s.params["b"].as_i64().unwrap(),
        ));
    }
    assert_eq!(seen.len(), 9);
    let unique: HashSet<_> = seen.iter().collect();
    assert_eq!(unique.len(), 9);

    // Every Choice value appears once per pass over the grid
    for pass in seen.chunks(3) {
        let values: HashSet<i64> = pass.iter().map(|(_, b)| *b).collect();
        assert_eq!(values.len(), 3);
    }
}

#[test]
fn budget_yields_exactly_n() {
    let parameters = vec![Parameter::discrete("n", 0, 100)];
    let results = ResultsTable::new();
    let mut search = RandomSearch::with_seed(1).max_num_trials(4);
    let mut n = 0;
    while search
        .get_suggestion(&parameters, &results, Direction::Minimize)
        .unwrap()
        .is_some()
    {
        n += 1;
    }
    assert_eq!(n, 4);
}

#[test]
fn log_scale_samples_stay_in_range() {
    let parameters = vec![Parameter::continuous("lr", 1e-5, 1e-1).log_scale()];
    let results = ResultsTable::new();
    let mut search = RandomSearch::with_seed(9);
    let mut below_1e3 = 0;
    for _ in 0..400 {
        let s = search
            .get_suggestion(&parameters, &results, Direction::Minimize)
            .unwrap()
            .unwrap();
        let lr = s.params["lr"].as_f64().unwrap();
        assert!((1e-5..=1e-1).contains(&lr), "lr {lr} out of range");
        if lr < 1e-3 {
            below_1e3 += 1;
        }
    }
    // Half the decades lie below 1e-3
    assert!((150..=250).contains(&below_1e3), "{below_1e3} samples below 1e-3");
}
