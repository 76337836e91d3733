use suitekit_core::api::{format_table, SuiteEvent, SuiteObserver};

/// Human-readable run log on stdout. Prints the summary table only once the
/// run ends, unless `live_summary` is set.
pub struct TextObserver {
    ascii_only: bool,
    live_summary: bool,
}

impl TextObserver {
    pub fn new(ascii_only: bool) -> Self {
        Self {
            ascii_only,
            live_summary: false,
        }
    }

    pub fn with_live_summary(mut self, enabled: bool) -> Self {
        self.live_summary = enabled;
        self
    }

    fn format_event(&self, event: &SuiteEvent) -> Option<String> {
        let line = match event {
            SuiteEvent::RunStart {
                run_id,
                total_templates,
                total_instances,
                prior_records,
                completed_instances,
                failed_instances,
            } => format!(
                "RUN START {} (templates: {}, instances: {}, prior records: {}, done: {}, retry: {})",
                run_id,
                total_templates,
                total_instances,
                prior_records,
                completed_instances,
                failed_instances
            ),
            SuiteEvent::TemplateStart {
                template, instances, ..
            } => format!("Running task: {} ({} instances)", template, instances),
            SuiteEvent::InstanceSkipped { identity, .. } => {
                format!("Skipping already processed task {}", identity)
            }
            SuiteEvent::InstanceStart { identity, goal, .. } => {
                format!("INSTANCE START {}: {}", identity, goal)
            }
            SuiteEvent::InstanceComplete {
                identity,
                record,
                tally,
                ..
            } => {
                let status = match (&record.exception_info, record.is_successful) {
                    (Some(_), _) => {
                        if self.ascii_only {
                            "ERR"
                        } else {
                            "FAILED"
                        }
                    }
                    (None, Some(s)) if s > 0.0 => {
                        if self.ascii_only {
                            "OK"
                        } else {
                            "SUCCESS"
                        }
                    }
                    (None, _) => {
                        if self.ascii_only {
                            "MISS"
                        } else {
                            "UNSUCCESSFUL"
                        }
                    }
                };
                let mut line = format!(
                    "INSTANCE END {} (status {}, steps {}, {:.1}s) {:.1}/{}",
                    identity,
                    status,
                    record
                        .episode_length
                        .map_or_else(|| "-".to_string(), |n| n.to_string()),
                    record.run_time,
                    tally.correct,
                    tally.total
                );
                if let Some(info) = &record.exception_info {
                    line.push_str(&format!("\n  {}", info));
                }
                line
            }
            SuiteEvent::Summary { stats, .. } => {
                if !self.live_summary {
                    return None;
                }
                format_table(stats)
            }
            SuiteEvent::RunEnd { run_id, counts } => format!(
                "RUN END {} (executed {}, skipped {}, failed {}, correct {:.1}/{}, duration {}ms)",
                run_id,
                counts.executed,
                counts.skipped,
                counts.failed,
                counts.tally.correct,
                counts.tally.total,
                counts.duration_ms
            ),
        };
        Some(line)
    }
}

impl SuiteObserver for TextObserver {
    fn name(&self) -> &str {
        "text-observer"
    }

    fn format(&self) -> &str {
        "text"
    }

    fn on_event(&self, event: &SuiteEvent) {
        if let Some(line) = self.format_event(event) {
            println!("{}", line);
        }
    }
}
