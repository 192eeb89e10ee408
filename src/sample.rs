//! Slow sample query used to exercise memoized cells
//!
//! Stands in for a database round trip: sleeps for the configured latency,
//! then returns `n` rows of `x` (0..n) and `y` (standard normal noise).

use rand::Rng;
use std::f64::consts::TAU;
use std::thread;
use std::time::Duration;

use crate::dataset::{Column, ColumnKind, Dataset, Row, Value};
use crate::error::DatasetResult;
use crate::reactive::{CellReader, MemoCell, Trigger};

/// Expensive row generator
#[derive(Debug, Clone, Copy)]
pub struct SampleQuery {
    latency: Duration,
}

impl SampleQuery {
    /// A query that takes `latency` per run
    pub fn new(latency: Duration) -> Self {
        Self { latency }
    }

    /// Run the query for `n` rows
    pub fn run(&self, n: usize) -> DatasetResult<Dataset> {
        tracing::info!(rows = n, "Querying sample data");
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }

        let mut rng = rand::thread_rng();
        let rows = (0..n)
            .map(|x| {
                Row::new(vec![
                    Value::Integer(x as i64),
                    Value::Float(standard_normal(&mut rng)),
                ])
            })
            .collect();
        Dataset::new(
            vec![
                Column::new("x", ColumnKind::Integer),
                Column::new("y", ColumnKind::Float),
            ],
            rows,
        )
    }

    /// Cache this query behind `trigger`, reading `size` untracked
    pub fn memoized(
        self,
        trigger: &Trigger,
        size: CellReader<usize>,
    ) -> MemoCell<DatasetResult<Dataset>> {
        MemoCell::new(trigger, move |ctx| {
            let n = *ctx.untracked_read(&size);
            self.run(n)
        })
    }
}

// Box-Muller transform
fn standard_normal<R: Rng>(rng: &mut R) -> f64 {
    let u1: f64 = rng.gen_range(f64::EPSILON..1.0);
    let u2: f64 = rng.gen_range(0.0..1.0);
    (-2.0 * u1.ln()).sqrt() * (TAU * u2).cos()
}
