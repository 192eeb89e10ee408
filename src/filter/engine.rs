//! Applying filter specifications to the base dataset

use super::FilterSpec;
use crate::dataset::Dataset;

/// Rows of `base` equal to every known-column constraint in `spec`.
///
/// Unknown columns have no effect. An empty spec yields a copy of `base`.
/// `base` is only read.
pub fn apply_filter(base: &Dataset, spec: &FilterSpec) -> Dataset {
    let clauses = spec.clauses_for(base);
    let rows = base
        .rows()
        .iter()
        .filter(|row| {
            clauses.iter().all(|clause| {
                row.get(clause.index)
                    .is_some_and(|value| value.matches(clause.expected))
            })
        })
        .cloned()
        .collect();

    base.with_rows(rows)
}
