//! Random search implementation.

use crate::algorithm::Algorithm;
use crate::algorithm::common::sample_configuration;
use crate::algorithm::grid::cartesian_grid;
use crate::error::Result;
use crate::parameter::Parameter;
use crate::results::ResultsTable;
use crate::suggestion::{Configuration, Suggestion};
use crate::types::Direction;

/// Independent uniform sampling of every parameter.
///
/// Ignores the results table. With [`RandomSearch::max_num_trials`] it stops
/// (returns `None`) once the budget is used up.
///
/// In non-repeating mode ([`RandomSearch::without_repetition`]) the Choice
/// grid is walked in shuffled passes, each grid point completed with fresh
/// draws of the remaining parameters. A Choice-only space is exhausted after
/// one pass.
///
/// # Examples
///
/// ```
/// use tuner::algorithm::Algorithm;
/// use tuner::algorithm::random::RandomSearch;
/// use tuner::parameter::Parameter;
/// use tuner::results::ResultsTable;
/// use tuner::Direction;
///
/// let parameters = vec![Parameter::continuous("x", -1.0, 1.0)];
/// let mut search = RandomSearch::with_seed(42).max_num_trials(2);
/// let results = ResultsTable::new();
///
/// assert!(search.get_suggestion(&parameters, &results, Direction::Minimize).unwrap().is_some());
/// assert!(search.get_suggestion(&parameters, &results, Direction::Minimize).unwrap().is_some());
/// assert!(search.get_suggestion(&parameters, &results, Direction::Minimize).unwrap().is_none());
/// ```
pub struct RandomSearch {
    rng: fastrand::Rng,
    max_num_trials: Option<usize>,
    repeat_suggestions: bool,
    count: usize,
    pending: Vec<Configuration>,
    passes: usize,
}

impl RandomSearch {
    /// Creates a new random search with a random seed and no budget.
    #[must_use]
    pub fn new() -> Self {
        Self::from_rng(fastrand::Rng::new())
    }

    /// Creates a new random search with a fixed seed for reproducibility.
    #[must_use]
    pub fn with_seed(seed: u64) -> Self {
        Self::from_rng(fastrand::Rng::with_seed(seed))
    }

    fn from_rng(rng: fastrand::Rng) -> Self {
        Self {
            rng,
            max_num_trials: None,
            repeat_suggestions: true,
            count: 0,
            pending: Vec::new(),
            passes: 0,
        }
    }

    /// Stop after `n` suggestions.
    #[must_use]
    pub fn max_num_trials(mut self, n: usize) -> Self {
        self.max_num_trials = Some(n);
        self
    }

    /// Never repeat a combination of Choice values within a pass.
    ///
    /// Callers must not request more unique trials than the space holds;
    /// a Choice-only space yields `None` once every combination was returned.
    #[must_use]
    pub fn without_repetition(mut self) -> Self {
        self.repeat_suggestions = false;
        self
    }

    /// Draws one configuration directly, bypassing the budget.
    pub(crate) fn sample(&mut self, parameters: &[Parameter]) -> Result<Configuration> {
        sample_configuration(parameters, &mut self.rng)
    }

    fn sample_without_repetition(
        &mut self,
        parameters: &[Parameter],
    ) -> Result<Option<Configuration>> {
        let (choices, others): (Vec<&Parameter>, Vec<&Parameter>) =
            parameters.iter().partition(|p| p.is_choice());

        if self.pending.is_empty() {
            if self.passes > 0 && others.is_empty() {
                return Ok(None);
            }
            let mut grid = cartesian_grid(&choices);
            self.rng.shuffle(&mut grid);
            self.pending = grid;
            self.passes += 1;
        }

        let Some(mut config) = self.pending.pop() else {
            return Ok(None);
        };
        for p in others {
            config.insert(p.name().to_owned(), p.sample(&mut self.rng)?);
        }
        Ok(Some(config))
    }
}

impl Default for RandomSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl Algorithm for RandomSearch {
    fn get_suggestion(
        &mut self,
        parameters: &[Parameter],
        _results: &ResultsTable,
        _direction: Direction,
    ) -> Result<Option<Suggestion>> {
        if self.max_num_trials.is_some_and(|max| self.count >= max) {
            return Ok(None);
        }

        let config = if self.repeat_suggestions {
            Some(self.sample(parameters)?)
        } else {
            self.sample_without_repetition(parameters)?
        };

        if config.is_some() {
            self.count += 1;
        }
        Ok(config.map(Suggestion::new))
    }

    fn load(&mut self, num_trials: usize) {
        self.count = num_trials;
    }
}
