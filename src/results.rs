//! The results table: one row per observation.
//!
//! The table is owned and appended to by the orchestrator. Algorithms only
//! ever receive a shared reference to a snapshot, and derive every view they
//! need (by trial, by status, by trial-ID range) afresh on each call.

use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::param::ParamValue;
use crate::parameter::Parameter;
use crate::suggestion::{Configuration, Lineage};
use crate::types::TrialStatus;

/// A single observation of a trial.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultRow {
    /// The trial this observation belongs to. Not unique per row.
    pub trial_id: u64,
    /// Whether the trial was still running when the row was written.
    pub status: TrialStatus,
    /// Iteration within the trial.
    pub iteration: u64,
    /// Realized parameter values, keyed by parameter name.
    pub params: Configuration,
    /// The observed objective; may be NaN.
    pub objective: f64,
    /// Population-based training bookkeeping, if the trial carried any.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lineage: Option<Lineage>,
}

impl ResultRow {
    /// Creates a row with no parameter values.
    #[must_use]
    pub fn new(trial_id: u64, status: TrialStatus, iteration: u64, objective: f64) -> Self {
        Self {
            trial_id,
            status,
            iteration,
            params: Configuration::new(),
            objective,
            lineage: None,
        }
    }

    /// Adds a parameter value.
    #[must_use]
    pub fn param(mut self, name: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Replaces all parameter values.
    #[must_use]
    pub fn params(mut self, params: Configuration) -> Self {
        self.params = params;
        self
    }

    /// Attaches population-based training bookkeeping.
    #[must_use]
    pub fn with_lineage(mut self, lineage: Lineage) -> Self {
        self.lineage = Some(lineage);
        self
    }

    /// Returns `true` unless the row is an intermediate observation.
    #[must_use]
    pub fn is_completed(&self) -> bool {
        self.status.is_terminal()
    }

    /// Projects the row onto the declared parameters.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingParameter`] if the row lacks a declared parameter.
    pub fn configuration(&self, parameters: &[Parameter]) -> Result<Configuration> {
        parameters
            .iter()
            .map(|p| {
                self.params
                    .get(p.name())
                    .map(|v| (p.name().to_owned(), v.clone()))
                    .ok_or_else(|| Error::MissingParameter(p.name().to_owned()))
            })
            .collect()
    }
}

/// An append-only snapshot of all observations so far.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ResultsTable {
    rows: Vec<ResultRow>,
}

impl ResultsTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row.
    pub fn push(&mut self, row: ResultRow) {
        self.rows.push(row);
    }

    /// Returns all rows in insertion order.
    #[must_use]
    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }

    /// Returns the number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns `true` if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates over the rows of one trial.
    pub fn trial_rows(&self, trial_id: u64) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter(move |r| r.trial_id == trial_id)
    }

    /// Iterates over rows whose status is not intermediate.
    pub fn completed(&self) -> impl Iterator<Item = &ResultRow> {
        self.rows.iter().filter(|r| r.is_completed())
    }

    /// Returns the distinct trial IDs, ascending.
    #[must_use]
    pub fn trial_ids(&self) -> BTreeSet<u64> {
        self.rows.iter().map(|r| r.trial_id).collect()
    }
}

impl FromIterator<ResultRow> for ResultsTable {
    fn from_iter<I: IntoIterator<Item = ResultRow>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

impl Extend<ResultRow> for ResultsTable {
    fn extend<I: IntoIterator<Item = ResultRow>>(&mut self, iter: I) {
        self.rows.extend(iter);
    }
}
