//! Column-oriented step traces.
//!
//! Agents emit one map per step; records store one column per key, which is
//! what tabular consumers want. Keys missing from a step simply contribute no
//! entry to that column.
use std::collections::BTreeMap;

use serde_json::Value;

use super::types::StepData;

/// Column added by the runner to every step, counting from 1.
pub const STEP_NUMBER: &str = "step_number";

pub type StepTrace = BTreeMap<String, Vec<Value>>;

pub fn transpose_rows_to_columns<I>(rows: I) -> StepTrace
where
    I: IntoIterator<Item = StepData>,
{
    let mut columns = StepTrace::new();
    for row in rows {
        for (key, value) in row {
            columns.entry(key).or_default().push(value);
        }
    }
    columns
}

/// Inverse of [`transpose_rows_to_columns`]. Rows are cut at the shortest
/// column.
pub fn transpose_columns_to_rows(columns: &StepTrace) -> Vec<StepData> {
    let len = columns.values().map(Vec::len).min().unwrap_or(0);
    (0..len)
        .map(|i| {
            columns
                .iter()
                .map(|(key, values)| (key.clone(), values[i].clone()))
                .collect()
        })
        .collect()
}
