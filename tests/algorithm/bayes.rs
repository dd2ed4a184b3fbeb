use tuner::algorithm::Algorithm;
use tuner::algorithm::bayes::{AcquisitionFunction, BayesianOptimization};
use tuner::design::{Encoder, FeatureKind};
use tuner::parameter::Parameter;
use tuner::results::{ResultRow, ResultsTable};
use tuner::suggestion::Configuration;
use tuner::{Direction, Error, ParamValue, TrialStatus};

use crate::sample_results_and_params;

#[test]
fn design_matrix_one_hot_encodes_choices() {
    let parameters = vec![
        Parameter::choice("c", vec!["x", "y", "z"]),
        Parameter::choice("fixed", vec![7]),
        Parameter::continuous("lr", 1e-3, 1.0).log_scale(),
    ];
    let encoder = Encoder::new(&parameters);
    let names: Vec<&str> = encoder.columns().iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, ["c_0", "c_1", "c_2", "lr"]);

    let lr = &encoder.columns()[3];
    assert_eq!(lr.kind, FeatureKind::Continuous);
    let (lo, hi) = lr.bounds.unwrap();
    assert!((lo + 3.0).abs() < 1e-12 && hi.abs() < 1e-12);

    for value in ["x", "y", "z"] {
        let config: Configuration = [
            ("c".to_owned(), ParamValue::from(value)),
            ("fixed".to_owned(), ParamValue::from(7)),
            ("lr".to_owned(), ParamValue::from(0.1)),
        ]
        .into_iter()
        .collect();
        let row = encoder.encode(&config).unwrap();
        assert!((row[..3].iter().sum::<f64>() - 1.0).abs() < f64::EPSILON);
        assert!((row[3] + 1.0).abs() < 1e-12);
    }
}

#[test]
fn returns_seeds_before_modelling() {
    let parameters = Parameter::grid(vec![("a", vec![1, 2, 3])]);
    let mut bo = BayesianOptimization::builder()
        .num_random_seeds(2)
        .seed(1)
        .build()
        .unwrap();
    let results = ResultsTable::new();
    let seen: Vec<i64> = (0..3)
        .map(|_| {
            bo.get_suggestion(&parameters, &results, Direction::Minimize)
                .unwrap()
                .unwrap()
                .params["a"]
                .as_i64()
                .unwrap()
        })
        .collect();
    assert_eq!(seen, [1, 2, 3]);
}

#[test]
fn falls_back_to_random_without_completed_rows() {
    let parameters = vec![Parameter::continuous("x", 0.0, 1.0)];
    let results: ResultsTable = [ResultRow::new(1, TrialStatus::Intermediate, 0, 0.5).param("x", 0.5)]
        .into_iter()
        .collect();
    let mut bo = BayesianOptimization::builder()
        .num_random_seeds(0)
        .seed(2)
        .build()
        .unwrap();
    let s = bo
        .get_suggestion(&parameters, &results, Direction::Minimize)
        .unwrap();
    assert!(s.is_some());
}

#[test]
fn model_based_suggestions_on_sample_results() {
    let (parameters, results, direction) = sample_results_and_params();
    let mut bo = BayesianOptimization::builder()
        .num_random_seeds(0)
        .max_num_trials(3)
        .n_candidates(500)
        .n_refine(10)
        .seed(3)
        .build()
        .unwrap();
    for _ in 0..3 {
        let s = bo
            .get_suggestion(&parameters, &results, direction)
            .unwrap()
            .unwrap();
        assert!(matches!(s.params["param_a"].as_i64(), Some(1..=3)));
        let b = s.params["param_b"].as_f64().unwrap();
        assert!((0.0..=1.0).contains(&b));
    }
    assert!(
        bo.get_suggestion(&parameters, &results, direction)
            .unwrap()
            .is_none()
    );
}

#[test]
fn moves_towards_the_optimum() {
    let parameters = vec![Parameter::continuous("x", 0.0, 1.0)];
    let results: ResultsTable = [0.0, 0.2, 0.45, 0.55, 0.8, 1.0]
        .into_iter()
        .enumerate()
        .map(|(i, x)| {
            ResultRow::new(i as u64 + 1, TrialStatus::Completed, 0, (x - 0.5_f64).powi(2))
                .param("x", x)
        })
        .collect();
    let mut bo = BayesianOptimization::builder()
        .num_random_seeds(0)
        .n_candidates(2000)
        .seed(4)
        .build()
        .unwrap();
    let x = bo
        .get_suggestion(&parameters, &results, Direction::Minimize)
        .unwrap()
        .unwrap()
        .params["x"]
        .as_f64()
        .unwrap();
    assert!((0.2..=0.8).contains(&x), "suggested x = {x}");
}

#[test]
fn only_expected_improvement_is_accepted() {
    let bo = BayesianOptimization::builder()
        .acquisition_function("ei")
        .build()
        .unwrap();
    assert_eq!(bo.acquisition_function(), AcquisitionFunction::ExpectedImprovement);
    assert!(matches!(
        BayesianOptimization::builder()
            .acquisition_function("lcb")
            .build(),
        Err(Error::UnsupportedAcquisitionFunction(_))
    ));
}

#[test]
fn load_skips_consumed_seeds() {
    let parameters = Parameter::grid(vec![("a", vec![1, 2, 3])]);
    let mut bo = BayesianOptimization::builder()
        .num_random_seeds(0)
        .seed(5)
        .build()
        .unwrap();
    bo.load(2);
    let s = bo
        .get_suggestion(&parameters, &ResultsTable::new(), Direction::Minimize)
        .unwrap()
        .unwrap();
    assert_eq!(s.params["a"].as_i64(), Some(3));
}

#[test]
fn refinement_maps_log_scaled_values_back_into_bounds() {
    let parameters = vec![
        Parameter::continuous("lr", 1e-4, 1e-1).log_scale(),
        Parameter::discrete("units", 1, 1024).log_scale(),
        Parameter::ordinal("depth", vec![2, 4, 8]),
    ];
    let mut rng = fastrand::Rng::with_seed(21);
    let results: ResultsTable = (1..=12)
        .map(|id| {
            let lr = 10f64.powf(-4.0 + 3.0 * rng.f64());
            let units = rng.i64(1..=1024);
            let depth = [2, 4, 8][rng.usize(0..3)];
            let loss = (lr.log10() + 2.0).powi(2) + (units as f64).log2() / 100.0;
            ResultRow::new(id, TrialStatus::Completed, 0, loss)
                .param("lr", lr)
                .param("units", units)
                .param("depth", depth)
        })
        .collect();

    for direction in [Direction::Minimize, Direction::Maximize] {
        let mut bo = BayesianOptimization::builder()
            .num_random_seeds(0)
            .fine_tune(true)
            .n_candidates(500)
            .n_refine(5)
            .seed(22)
            .build()
            .unwrap();
        for _ in 0..3 {
            let s = bo
                .get_suggestion(&parameters, &results, direction)
                .unwrap()
                .unwrap();
            let lr = s.params["lr"].as_f64().unwrap();
            assert!((1e-4..=1e-1).contains(&lr), "{direction:?}: lr = {lr}");
            let units = s.params["units"].as_i64().unwrap();
            assert!((1..=1024).contains(&units), "{direction:?}: units = {units}");
            assert!(matches!(s.params["depth"].as_i64(), Some(2 | 4 | 8)));
        }
    }
}
