//! Fixed schema descriptions
//!
//! A `TableSchema` names the columns a loader enforces and, for categorical
//! columns, the values the prompt advertises to the translation backend.

use serde::{Deserialize, Serialize};

use super::{Column, ColumnKind};

/// One column of a fixed schema
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSpec {
    /// Column name
    pub name: String,
    /// Storage kind
    pub kind: ColumnKind,
    /// Allowed categorical values (empty for numeric columns)
    #[serde(default)]
    pub allowed: Vec<String>,
}

impl ColumnSpec {
    /// Categorical column with its allowed values
    pub fn categorical(name: impl Into<String>, allowed: &[&str]) -> Self {
        Self {
            name: name.into(),
            kind: ColumnKind::Text,
            allowed: allowed.iter().map(|v| v.to_string()).collect(),
        }
    }

    /// Numeric column
    pub fn numeric(name: impl Into<String>, kind: ColumnKind) -> Self {
        Self {
            name: name.into(),
            kind,
            allowed: Vec::new(),
        }
    }
}

/// Ordered set of column specs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    /// Columns in source order
    pub columns: Vec<ColumnSpec>,
}

impl TableSchema {
    /// Create a schema from column specs
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self { columns }
    }

    /// The property schedule schema: location, construction type and
    /// flood-risk tier as categories, sum insured and year built as numbers.
    pub fn property_schedule() -> Self {
        Self::new(vec![
            ColumnSpec::categorical(
                "Location",
                &["London", "Manchester", "Birmingham", "Leeds", "Glasgow", "Bristol"],
            ),
            ColumnSpec::categorical(
                "Construction",
                &["Masonry", "Timber Frame", "Steel Frame", "Reinforced Concrete"],
            ),
            ColumnSpec::categorical("FloodRisk", &["Low", "Medium", "High", "Very High"]),
            ColumnSpec::numeric("SumInsured", ColumnKind::Integer),
            ColumnSpec::numeric("YearBuilt", ColumnKind::Integer),
        ])
    }

    /// Dataset column definitions for this schema
    pub fn dataset_columns(&self) -> Vec<Column> {
        self.columns
            .iter()
            .map(|spec| Column::new(spec.name.clone(), spec.kind))
            .collect()
    }
}
