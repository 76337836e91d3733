//! Fallback presentation when no observer is attached: every engine event is
//! written to the tracing subscriber.
use crate::report::format_table;

use super::traits::SuiteEvent;

pub fn log_event(event: &SuiteEvent) {
    match event {
        SuiteEvent::RunStart {
            run_id,
            total_templates,
            total_instances,
            prior_records,
            completed_instances,
            failed_instances,
        } => {
            tracing::info!(
                run_id = %run_id,
                templates = total_templates,
                instances = total_instances,
                prior_records,
                completed = completed_instances,
                failed = failed_instances,
                "starting suite run"
            );
        }
        SuiteEvent::TemplateStart {
            template, instances, ..
        } => {
            tracing::info!(template = %template, instances, "Running task: {template}");
        }
        SuiteEvent::InstanceSkipped {
            identity,
            prior_records,
            ..
        } => {
            tracing::info!(instance = %identity, prior_records, "Skipping already processed task {identity}");
        }
        SuiteEvent::InstanceStart { identity, goal, .. } => {
            tracing::info!(instance = %identity, goal = %goal, "running instance");
        }
        SuiteEvent::InstanceComplete {
            identity,
            record,
            tally,
            ..
        } => match &record.exception_info {
            Some(info) => {
                tracing::warn!(instance = %identity, run_time = record.run_time, "instance failed: {info}");
            }
            None => {
                tracing::info!(
                    instance = %identity,
                    success = ?record.is_successful,
                    steps = ?record.episode_length,
                    run_time = record.run_time,
                    correct = tally.correct,
                    total = tally.total,
                    "instance finished"
                );
            }
        },
        SuiteEvent::Summary { stats, .. } => {
            tracing::debug!("running summary\n{}", format_table(stats));
        }
        SuiteEvent::RunEnd { run_id, counts } => {
            tracing::info!(
                run_id = %run_id,
                executed = counts.executed,
                skipped = counts.skipped,
                failed = counts.failed,
                correct = counts.tally.correct,
                total = counts.tally.total,
                duration_ms = counts.duration_ms,
                "suite run finished"
            );
        }
    }
}
