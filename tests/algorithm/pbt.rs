use tuner::algorithm::Algorithm;
use tuner::algorithm::pbt::PopulationBasedTraining;
use tuner::parameter::Parameter;
use tuner::results::{ResultRow, ResultsTable};
use tuner::{Direction, TrialStatus};

fn parameters() -> Vec<Parameter> {
    vec![
        Parameter::continuous("lr", 1e-4, 1e-1).log_scale(),
        Parameter::discrete("batch", 8, 256),
        Parameter::ordinal("depth", vec![2, 4, 8, 16]),
        Parameter::choice("optimizer", vec!["sgd", "adam"]),
    ]
}

/// Run `generations` full generations, feeding every suggestion back as a
/// completed trial whose loss is its learning rate.
fn run(pbt: &mut PopulationBasedTraining, population: usize, generations: usize) -> ResultsTable {
    let parameters = parameters();
    let mut results = ResultsTable::new();
    let mut trial_id = 0;
    for _ in 0..generations {
        let batch: Vec<_> = (0..population)
            .map(|_| {
                pbt.get_suggestion(&parameters, &results, Direction::Minimize)
                    .unwrap()
                    .unwrap()
            })
            .collect();
        for s in batch {
            trial_id += 1;
            let lr = s.params["lr"].as_f64().unwrap();
            let mut row = ResultRow::new(trial_id, TrialStatus::Completed, 1, lr)
                .params(s.params.clone());
            if let Some(lineage) = s.lineage {
                assert_eq!(lineage.save_to, trial_id.to_string());
                row = row.with_lineage(lineage);
            }
            results.push(row);
        }
    }
    results
}

#[test]
fn perturbed_values_respect_bounds() {
    let mut pbt = PopulationBasedTraining::builder()
        .population_size(6)
        .perturbation_factors(vec![0.5, 2.0])
        .seed(10)
        .build()
        .unwrap();
    let results = run(&mut pbt, 6, 5);
    assert_eq!(pbt.generation(), 5);

    for row in results.rows() {
        let lr = row.params["lr"].as_f64().unwrap();
        assert!((1e-4..=1e-1).contains(&lr), "lr = {lr}");
        let batch = row.params["batch"].as_i64().unwrap();
        assert!((8..=256).contains(&batch), "batch = {batch}");
        let depth = row.params["depth"].as_i64().unwrap();
        assert!([2, 4, 8, 16].contains(&depth));
    }
}

#[test]
fn lineage_grows_with_each_generation() {
    let population = 6;
    let mut pbt = PopulationBasedTraining::builder()
        .population_size(population)
        .seed(11)
        .build()
        .unwrap();
    let results = run(&mut pbt, population, 4);

    let depth = |row: &ResultRow| {
        row.lineage
            .as_ref()
            .map_or(0, |l| l.lineage.matches(',').count())
    };
    for (generation, rows) in results.rows().chunks(population).enumerate() {
        for row in rows {
            assert_eq!(depth(row), generation, "trial {}", row.trial_id);
        }
    }
}

#[test]
fn exploited_members_come_from_the_previous_generation() {
    let population = 6;
    let mut pbt = PopulationBasedTraining::builder()
        .population_size(population)
        .seed(12)
        .build()
        .unwrap();
    let results = run(&mut pbt, population, 3);

    for row in &results.rows()[population..] {
        let lineage = row.lineage.as_ref().unwrap();
        let parent: u64 = lineage.load_from.parse().unwrap();
        let generation = (row.trial_id - 1) / population as u64;
        let previous = (generation - 1) * population as u64 + 1..=generation * population as u64;
        assert!(previous.contains(&parent), "parent {parent} of {}", row.trial_id);
    }
}

#[test]
fn resumes_after_load_without_results() {
    let mut pbt = PopulationBasedTraining::builder()
        .population_size(4)
        .seed(13)
        .build()
        .unwrap();
    pbt.load(8);
    assert_eq!(pbt.generation(), 3);

    let s = pbt
        .get_suggestion(&parameters(), &ResultsTable::new(), Direction::Minimize)
        .unwrap()
        .unwrap();
    let lineage = s.lineage.unwrap();
    assert_eq!(lineage.save_to, "9");
    assert!(lineage.load_from.is_empty());
}
