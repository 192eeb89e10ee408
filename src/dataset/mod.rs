//! Typed tabular datasets
//!
//! A `Dataset` is an ordered set of named, typed columns plus an ordered
//! sequence of rows. The base table is loaded once and shared behind an
//! `Arc`; filtering always produces a new dataset and never touches it.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{DatasetError, DatasetResult};

pub mod loader;
pub mod schema;

pub use schema::{ColumnSpec, TableSchema};

/// Storage kind of a column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    /// Categorical text
    Text,
    /// Whole numbers
    Integer,
    /// Floating point numbers
    Float,
}

/// A named, typed column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Column {
    /// Column name, as it appears in filters
    pub name: String,
    /// Storage kind
    pub kind: ColumnKind,
}

impl Column {
    /// Create a column
    pub fn new(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
        }
    }
}

/// A single cell value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Text value
    Text(String),
    /// Integer value
    Integer(i64),
    /// Float value
    Float(f64),
    /// Missing value
    Null,
}

impl Value {
    /// Exact equality against a decoded filter value.
    ///
    /// Text only equals JSON strings and numbers only equal JSON numbers.
    /// Null, arrays and objects never match.
    pub fn matches(&self, expected: &serde_json::Value) -> bool {
        match (self, expected) {
            (Value::Text(actual), serde_json::Value::String(wanted)) => actual == wanted,
            (Value::Integer(actual), serde_json::Value::Number(wanted)) => {
                if let Some(wanted) = wanted.as_i64() {
                    *actual == wanted
                } else {
                    wanted.is_f64() && wanted.as_f64() == Some(*actual as f64)
                }
            }
            (Value::Float(actual), serde_json::Value::Number(wanted)) => {
                wanted.as_f64() == Some(*actual)
            }
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Text(s) => f.write_str(s),
            Value::Integer(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Null => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::Text(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::Text(s)
    }
}

impl From<i64> for Value {
    fn from(i: i64) -> Self {
        Value::Integer(i)
    }
}

impl From<f64> for Value {
    fn from(x: f64) -> Self {
        Value::Float(x)
    }
}

/// One row: a value per column, in column order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Row(Vec<Value>);

impl Row {
    /// Create a row from its values
    pub fn new(values: Vec<Value>) -> Self {
        Self(values)
    }

    /// Value at a column index
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.0.get(index)
    }

    /// All values in column order
    pub fn values(&self) -> &[Value] {
        &self.0
    }

    /// Number of values
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True if the row holds no values
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// An immutable table of typed columns and rows
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    columns: Vec<Column>,
    rows: Vec<Row>,
}

impl Dataset {
    /// Build a dataset, checking that every row has one value per column
    pub fn new(columns: Vec<Column>, rows: Vec<Row>) -> DatasetResult<Self> {
        let expected = columns.len();
        for (row, values) in rows.iter().enumerate() {
            if values.len() != expected {
                return Err(DatasetError::RowWidth {
                    row,
                    found: values.len(),
                    expected,
                });
            }
        }
        Ok(Self { columns, rows })
    }

    /// A dataset with the same columns and a subset of rows
    pub(crate) fn with_rows(&self, rows: Vec<Row>) -> Self {
        Self {
            columns: self.columns.clone(),
            rows,
        }
    }

    /// Column definitions
    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names, in order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Index of the column with the given name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    /// True if a column with this name exists
    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// All rows
    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Value at a row for a named column
    pub fn value(&self, row: usize, column: &str) -> Option<&Value> {
        let index = self.column_index(column)?;
        self.rows.get(row)?.get(index)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// True if there are no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
