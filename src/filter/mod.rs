//! Equality-only filter specifications
//!
//! A `FilterSpec` maps column names to expected scalar values. Keys keep the
//! order in which the backend emitted them. Keys naming unknown columns are
//! accepted here and skipped when the filter is applied.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::dataset::Dataset;

pub mod engine;
pub mod parser;

pub use engine::apply_filter;
pub use parser::parse_filter_spec;

/// Column to expected value mapping, equality only
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSpec(serde_json::Map<String, serde_json::Value>);

impl FilterSpec {
    /// An empty spec: show all rows
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an equality constraint
    pub fn with(mut self, column: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.0.insert(column.into(), value.into());
        self
    }

    /// Remove a constraint, returning its value
    pub fn remove(&mut self, column: &str) -> Option<serde_json::Value> {
        self.0.shift_remove(column)
    }

    /// True when no constraints are present
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of constraints, known or not
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// All constraints in order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Constraints that name a column of `dataset`, resolved to its index
    pub fn clauses_for<'a>(&'a self, dataset: &Dataset) -> Vec<Clause<'a>> {
        self.iter()
            .filter_map(|(column, expected)| {
                dataset.column_index(column).map(|index| Clause {
                    column,
                    index,
                    expected,
                })
            })
            .collect()
    }

    /// Keys that name no column of `dataset`
    pub fn unknown_columns<'a>(&'a self, dataset: &Dataset) -> Vec<&'a str> {
        self.iter()
            .map(|(column, _)| column)
            .filter(|column| !dataset.has_column(column))
            .collect()
    }
}

impl From<serde_json::Map<String, serde_json::Value>> for FilterSpec {
    fn from(map: serde_json::Map<String, serde_json::Value>) -> Self {
        Self(map)
    }
}

/// A constraint bound to a dataset column
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Clause<'a> {
    /// Column name
    pub column: &'a str,
    /// Column index in the dataset
    pub index: usize,
    /// Expected value
    pub expected: &'a serde_json::Value,
}

impl fmt::Display for Clause<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.expected {
            serde_json::Value::String(s) => write!(f, "{}='{}'", self.column, s),
            other => write!(f, "{}='{}'", self.column, other),
        }
    }
}
