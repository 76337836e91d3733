use serde_json::Value;

use super::aggregate::AggregateStats;

pub const AVERAGE_LABEL: &str = "========= Average =========";

const HEADERS: [&str; 7] = [
    "task_num",
    "task",
    "num_complete_trials",
    "mean_success_rate",
    "mean_episode_length",
    "total_runtime_s",
    "num_fail_trials",
];

/// Fixed-width text table: one row per template, then the average row.
/// Success rates are shown to 2 decimals and runtimes to 1; absent values
/// print as `-`.
pub fn format_table(stats: &AggregateStats) -> String {
    let mut rows: Vec<[String; 7]> = stats
        .templates
        .iter()
        .enumerate()
        .map(|(i, t)| {
            [
                i.to_string(),
                t.task_template.clone(),
                t.num_complete_trials.to_string(),
                opt(t.mean_success_rate, 2),
                opt(t.mean_episode_length, 1),
                format!("{:.1}", t.total_runtime_s),
                t.num_fail_trials.to_string(),
            ]
        })
        .collect();

    if let Some(avg) = &stats.average {
        rows.push([
            "0".to_string(),
            AVERAGE_LABEL.to_string(),
            format!("{:.1}", avg.num_complete_trials),
            opt(avg.mean_success_rate, 2),
            opt(avg.mean_episode_length, 1),
            format!("{:.1}", avg.total_runtime_s),
            format!("{:.1}", avg.num_fail_trials),
        ]);
    }

    let mut widths = HEADERS.map(str::len);
    for row in &rows {
        for (w, cell) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(cell.len());
        }
    }

    let mut out = String::new();
    push_row(&mut out, &HEADERS.map(str::to_string), &widths);
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    out.push_str(&rule.join("-+-"));
    out.push('\n');
    for row in &rows {
        push_row(&mut out, row, &widths);
    }
    out
}

fn push_row(out: &mut String, cells: &[String; 7], widths: &[usize; 7]) {
    let line: Vec<String> = cells
        .iter()
        .zip(widths.iter())
        .enumerate()
        .map(|(col, (cell, &w))| {
            if col == 1 {
                format!("{cell:<w$}")
            } else {
                format!("{cell:>w$}")
            }
        })
        .collect();
    out.push_str(line.join(" | ").trim_end());
    out.push('\n');
}

fn opt(value: Option<f64>, decimals: usize) -> String {
    match value {
        Some(v) => format!("{v:.decimals$}"),
        None => "-".to_string(),
    }
}

pub fn to_json(stats: &AggregateStats) -> Result<Value, serde_json::Error> {
    serde_json::to_value(stats)
}
