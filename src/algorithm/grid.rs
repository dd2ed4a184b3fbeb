//! Grid search implementation.
//!
//! `GridSearch` enumerates the full Cartesian product of Choice parameter
//! values exactly once each. The grid is computed on the first call in a
//! stable order: parameters in declaration order, the last parameter varying
//! fastest.

use crate::algorithm::Algorithm;
use crate::distribution::Distribution;
use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::parameter::Parameter;
use crate::results::ResultsTable;
use crate::suggestion::{Configuration, Suggestion};
use crate::types::Direction;

/// Exhaustive search over Choice parameters.
///
/// # Examples
///
/// ```
/// use tuner::algorithm::Algorithm;
/// use tuner::algorithm::grid::GridSearch;
/// use tuner::parameter::Parameter;
/// use tuner::results::ResultsTable;
/// use tuner::Direction;
///
/// let parameters = Parameter::grid(vec![("a", vec![1, 2]), ("b", vec![10, 20])]);
/// let mut grid = GridSearch::new();
/// let results = ResultsTable::new();
///
/// let mut n = 0;
/// while grid
///     .get_suggestion(&parameters, &results, Direction::Minimize)
///     .unwrap()
///     .is_some()
/// {
///     n += 1;
/// }
/// assert_eq!(n, 4);
/// ```
#[derive(Debug, Default)]
pub struct GridSearch {
    count: usize,
    grid: Option<Vec<Configuration>>,
}

impl GridSearch {
    /// Creates a new grid search.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of grid points, once the grid has been built.
    #[must_use]
    pub fn grid_size(&self) -> Option<usize> {
        self.grid.as_ref().map(Vec::len)
    }
}

impl Algorithm for GridSearch {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        _results: &ResultsTable,
        _direction: Direction,
    ) -> Result<Option<Suggestion>> {
        if let Some(p) = parameters.iter().find(|p| !p.is_choice()) {
            return Err(Error::NonChoiceGridParameter(p.name().to_owned()));
        }

        let grid = self.grid.get_or_insert_with(|| {
            let refs: Vec<&Parameter> = parameters.iter().collect();
            cartesian_grid(&refs)
        });

        let Some(config) = grid.get(self.count) else {
            return Ok(None);
        };
        self.count += 1;
        Ok(Some(Suggestion::new(config.clone())))
    }

    fn load(&mut self, num_trials: usize) {
        self.count = num_trials;
    }
}

/// Enumerate every combination of the declared values of `parameters`.
///
/// Only Choice and Ordinal parameters contribute values; others are skipped.
/// An empty parameter list yields a single empty configuration.
pub(crate) fn cartesian_grid(parameters: &[&Parameter]) -> Vec<Configuration> {
    let axes: Vec<(&str, &[ParamValue])> = parameters
        .iter()
        .filter_map(|p| match p.distribution() {
            Distribution::Choice(d) => Some((p.name(), d.values.as_slice())),
            Distribution::Ordinal(d) => Some((p.name(), d.values.as_slice())),
            Distribution::Continuous(_) | Distribution::Discrete(_) => None,
        })
        .collect();

    let mut grid = vec![Configuration::new()];
    for (name, values) in axes {
        let mut next = Vec::with_capacity(grid.len() * values.len());
        for partial in &grid {
            for value in values {
                let mut config = partial.clone();
                config.insert(name.to_owned(), value.clone());
                next.push(config);
            }
        }
        grid = next;
    }
    grid
}
