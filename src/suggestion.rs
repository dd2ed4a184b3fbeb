//! Suggestions returned by algorithms.

use std::collections::HashMap;

use crate::param::ParamValue;

/// A mapping from parameter name to a concrete value.
pub type Configuration = HashMap<String, ParamValue>;

/// Checkpoint bookkeeping carried by population-based training.
///
/// `load_from` names the checkpoint a trial should restore before training,
/// `save_to` the checkpoint it should write, and `lineage` the comma-terminated
/// trail of every checkpoint the trial descends from.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Lineage {
    /// Accumulated ancestry, e.g. `"3,17,"`.
    pub lineage: String,
    /// Checkpoint to restore from; empty for a fresh start.
    pub load_from: String,
    /// Checkpoint to write.
    pub save_to: String,
}

/// The next configuration to evaluate.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Suggestion {
    /// Parameter values keyed by parameter name.
    pub params: Configuration,
    /// Population-based training bookkeeping, if any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lineage: Option<Lineage>,
}

impl Suggestion {
    /// Wraps a plain configuration.
    #[must_use]
    pub fn new(params: Configuration) -> Self {
        Self {
            params,
            lineage: None,
        }
    }

    /// Returns the value suggested for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ParamValue> {
        self.params.get(name)
    }
}

impl From<Configuration> for Suggestion {
    fn from(params: Configuration) -> Self {
        Self::new(params)
    }
}
