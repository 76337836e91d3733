use std::collections::BTreeMap;

use serde::Serialize;

use crate::episode::EpisodeRecord;

/// One row per template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TemplateStats {
    pub task_template: String,
    /// Records carrying a success signal.
    pub num_complete_trials: usize,
    pub mean_success_rate: Option<f64>,
    pub mean_episode_length: Option<f64>,
    pub total_runtime_s: f64,
    /// Records carrying a failure description.
    pub num_fail_trials: usize,
}

/// Column means over the template rows. Reporting only; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AverageRow {
    pub num_complete_trials: f64,
    pub mean_success_rate: Option<f64>,
    pub mean_episode_length: Option<f64>,
    pub total_runtime_s: f64,
    pub num_fail_trials: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateStats {
    pub templates: Vec<TemplateStats>,
    pub average: Option<AverageRow>,
}

impl AggregateStats {
    pub fn get(&self, template: &str) -> Option<&TemplateStats> {
        self.templates.iter().find(|t| t.task_template == template)
    }

    pub fn total_complete_trials(&self) -> usize {
        self.templates.iter().map(|t| t.num_complete_trials).sum()
    }

    pub fn total_fail_trials(&self) -> usize {
        self.templates.iter().map(|t| t.num_fail_trials).sum()
    }
}

#[derive(Default)]
struct Accumulator {
    successes: Vec<f64>,
    lengths: Vec<f64>,
    runtime: f64,
    failures: usize,
}

/// Group `records` by template (sorted by name) and reduce each group.
/// Missing optional fields contribute nothing.
pub fn aggregate(records: &[EpisodeRecord]) -> AggregateStats {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for record in records {
        let acc = groups.entry(record.task_template.as_str()).or_default();
        if let Some(success) = record.is_successful {
            acc.successes.push(success);
        }
        if let Some(length) = record.episode_length {
            acc.lengths.push(length as f64);
        }
        acc.runtime += record.run_time;
        if record.is_failure() {
            acc.failures += 1;
        }
    }

    let templates: Vec<TemplateStats> = groups
        .into_iter()
        .map(|(name, acc)| TemplateStats {
            task_template: name.to_string(),
            num_complete_trials: acc.successes.len(),
            mean_success_rate: mean(acc.successes.iter().copied()),
            mean_episode_length: mean(acc.lengths.iter().copied()),
            total_runtime_s: acc.runtime,
            num_fail_trials: acc.failures,
        })
        .collect();

    let average = average_row(&templates);
    AggregateStats { templates, average }
}

fn average_row(rows: &[TemplateStats]) -> Option<AverageRow> {
    if rows.is_empty() {
        return None;
    }
    let n = rows.len() as f64;
    Some(AverageRow {
        num_complete_trials: rows.iter().map(|r| r.num_complete_trials as f64).sum::<f64>() / n,
        mean_success_rate: mean(rows.iter().filter_map(|r| r.mean_success_rate)),
        mean_episode_length: mean(rows.iter().filter_map(|r| r.mean_episode_length)),
        total_runtime_s: rows.iter().map(|r| r.total_runtime_s).sum::<f64>() / n,
        num_fail_trials: rows.iter().map(|r| r.num_fail_trials as f64).sum::<f64>() / n,
    })
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(template: &str, success: Option<f64>, length: Option<usize>, exc: Option<&str>) -> EpisodeRecord {
        serde_json::from_value(json!({
            "task_template": template,
            "instance_id": 0,
            "is_successful": success,
            "episode_length": length,
            "run_time": 2.0,
            "exception_info": exc,
        }))
        .unwrap()
    }

    #[test]
    fn failed_records_count_only_as_failures() {
        let stats = aggregate(&[
            record("T", Some(1.0), Some(4), None),
            record("T", None, None, Some("episode failed: boom")),
        ]);
        let t = stats.get("T").unwrap();
        assert_eq!(t.num_complete_trials, 1);
        assert_eq!(t.num_fail_trials, 1);
        assert_eq!(t.mean_success_rate, Some(1.0));
        assert_eq!(t.mean_episode_length, Some(4.0));
        assert_eq!(t.total_runtime_s, 4.0);
    }

    #[test]
    fn template_with_only_failures_has_no_means() {
        let stats = aggregate(&[record("T", None, None, Some("x"))]);
        let t = stats.get("T").unwrap();
        assert_eq!(t.num_complete_trials, 0);
        assert_eq!(t.mean_success_rate, None);
        assert_eq!(t.mean_episode_length, None);
    }

    #[test]
    fn empty_input_has_no_average_row() {
        let stats = aggregate(&[]);
        assert!(stats.templates.is_empty());
        assert!(stats.average.is_none());
    }
}
