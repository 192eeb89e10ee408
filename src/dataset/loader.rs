//! CSV ingestion for the base dataset
//!
//! Columns are selected by header name in schema order; extra source columns
//! are dropped. Empty cells load as `Value::Null`.

use std::fs::File;
use std::io::Read;
use std::path::Path;

use super::{ColumnKind, Dataset, Row, TableSchema, Value};
use crate::error::{DatasetError, DatasetResult};

/// Load a CSV file against a fixed schema
pub fn load_csv(path: &Path, schema: &TableSchema) -> DatasetResult<Dataset> {
    let file = File::open(path).map_err(|source| DatasetError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let dataset = read_csv(file, schema)?;
    tracing::info!(
        path = %path.display(),
        rows = dataset.len(),
        columns = dataset.columns().len(),
        "Loaded base dataset"
    );
    Ok(dataset)
}

/// Read CSV data with a header row from any reader
pub fn read_csv<R: Read>(reader: R, schema: &TableSchema) -> DatasetResult<Dataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers()?.clone();
    let positions = schema
        .columns
        .iter()
        .map(|spec| {
            headers
                .iter()
                .position(|h| h == spec.name)
                .ok_or_else(|| DatasetError::MissingColumn(spec.name.clone()))
        })
        .collect::<DatasetResult<Vec<_>>>()?;

    let mut rows = Vec::new();
    for (row_index, record) in csv_reader.records().enumerate() {
        let record = record?;
        let mut values = Vec::with_capacity(positions.len());
        for (spec, &position) in schema.columns.iter().zip(&positions) {
            let raw = record.get(position).unwrap_or("");
            values.push(parse_cell(raw, spec.kind).ok_or_else(|| {
                DatasetError::InvalidValue {
                    row: row_index,
                    column: spec.name.clone(),
                    value: raw.to_string(),
                }
            })?);
        }
        rows.push(Row::new(values));
    }

    Dataset::new(schema.dataset_columns(), rows)
}

fn parse_cell(raw: &str, kind: ColumnKind) -> Option<Value> {
    if raw.is_empty() {
        return Some(Value::Null);
    }
    match kind {
        ColumnKind::Text => Some(Value::Text(raw.to_string())),
        ColumnKind::Integer => raw.parse().ok().map(Value::Integer),
        ColumnKind::Float => raw.parse().ok().map(Value::Float),
    }
}
