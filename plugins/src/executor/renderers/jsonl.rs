use chrono::Local;
use serde_json::{json, Value};
use suitekit_core::api::{to_json, SuiteEvent, SuiteObserver};

/// One JSON object per engine event on stdout, `v: 1` envelope.
pub struct JsonlObserver {
    pretty_print: bool,
}

impl JsonlObserver {
    pub fn new(pretty_print: bool) -> Self {
        Self { pretty_print }
    }

    fn event_to_json(&self, event: &SuiteEvent) -> Value {
        let ts = Local::now().to_rfc3339();
        match event {
            SuiteEvent::RunStart {
                run_id,
                total_templates,
                total_instances,
                prior_records,
                completed_instances,
                failed_instances,
            } => json!({
                "v": 1,
                "event_type": "run.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "total_templates": total_templates,
                    "total_instances": total_instances,
                    "prior_records": prior_records,
                    "completed_instances": completed_instances,
                    "failed_instances": failed_instances,
                }
            }),
            SuiteEvent::TemplateStart {
                run_id,
                template,
                instances,
            } => json!({
                "v": 1,
                "event_type": "template.start",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "template": template,
                    "instances": instances,
                }
            }),
            SuiteEvent::InstanceSkipped {
                run_id,
                identity,
                prior_records,
            } => json!({
                "v": 1,
                "event_type": "instance.skipped",
                "ts": ts,
                "run_id": run_id,
                "instance": identity.to_string(),
                "metadata": {
                    "prior_records": prior_records,
                }
            }),
            SuiteEvent::InstanceStart {
                run_id,
                identity,
                goal,
            } => json!({
                "v": 1,
                "event_type": "instance.start",
                "ts": ts,
                "run_id": run_id,
                "instance": identity.to_string(),
                "metadata": {
                    "goal": goal,
                }
            }),
            SuiteEvent::InstanceComplete {
                run_id,
                identity,
                record,
                tally,
            } => json!({
                "v": 1,
                "event_type": "instance.end",
                "ts": ts,
                "run_id": run_id,
                "instance": identity.to_string(),
                "record": record,
                "metadata": {
                    "correct": tally.correct,
                    "total": tally.total,
                }
            }),
            SuiteEvent::Summary { run_id, stats } => json!({
                "v": 1,
                "event_type": "run.summary",
                "ts": ts,
                "run_id": run_id,
                "metadata": to_json(stats).unwrap_or(Value::Null),
            }),
            SuiteEvent::RunEnd { run_id, counts } => json!({
                "v": 1,
                "event_type": "run.end",
                "ts": ts,
                "run_id": run_id,
                "metadata": {
                    "total_instances": counts.total_instances,
                    "executed": counts.executed,
                    "skipped": counts.skipped,
                    "failed": counts.failed,
                    "correct": counts.tally.correct,
                    "total": counts.tally.total,
                    "duration_ms": counts.duration_ms,
                }
            }),
        }
    }
}

impl SuiteObserver for JsonlObserver {
    fn name(&self) -> &str {
        "jsonl-observer"
    }

    fn format(&self) -> &str {
        "jsonl"
    }

    fn on_event(&self, event: &SuiteEvent) {
        let value = self.event_to_json(event);
        if self.pretty_print {
            println!("{}", serde_json::to_string_pretty(&value).unwrap_or_else(|_| "{}".into()));
        } else {
            println!("{}", serde_json::to_string(&value).unwrap_or_else(|_| "{}".into()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use suitekit_core::api::{InstanceIdentity, RunTally};
    use suitekit_core::executor::RunCounts;

    #[test]
    fn run_start_reports_resume_state() {
        let observer = JsonlObserver::new(false);
        let event = SuiteEvent::RunStart {
            run_id: "run".to_string(),
            total_templates: 2,
            total_instances: 6,
            prior_records: 4,
            completed_instances: 3,
            failed_instances: 1,
        };

        let value = observer.event_to_json(&event);
        assert_eq!(value["event_type"], "run.start");
        assert_eq!(value["metadata"]["completed_instances"], 3);
        assert_eq!(value["metadata"]["failed_instances"], 1);
    }

    #[test]
    fn skipped_instance_carries_identity() {
        let observer = JsonlObserver::new(false);
        let event = SuiteEvent::InstanceSkipped {
            run_id: "run".to_string(),
            identity: InstanceIdentity::new("Alpha", 1),
            prior_records: 2,
        };

        let value = observer.event_to_json(&event);
        assert_eq!(value["event_type"], "instance.skipped");
        assert_eq!(value["instance"], "Alpha_1");
        assert_eq!(value["metadata"]["prior_records"], 2);
    }

    #[test]
    fn run_end_reports_counts() {
        let observer = JsonlObserver::new(false);
        let event = SuiteEvent::RunEnd {
            run_id: "run".to_string(),
            counts: RunCounts {
                total_instances: 3,
                executed: 2,
                skipped: 1,
                failed: 1,
                duration_ms: 40,
                tally: RunTally {
                    correct: 1.0,
                    total: 1,
                },
            },
        };

        let value = observer.event_to_json(&event);
        assert_eq!(value["event_type"], "run.end");
        assert_eq!(value["metadata"]["skipped"], 1);
        assert_eq!(value["metadata"]["correct"], 1.0);
    }
}
