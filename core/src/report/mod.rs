//! Per-template rollups of episode records and their text/JSON rendering.

pub mod aggregate;
pub mod format;

pub use aggregate::{aggregate, AggregateStats, AverageRow, TemplateStats};
pub use format::{format_table, to_json, AVERAGE_LABEL};
