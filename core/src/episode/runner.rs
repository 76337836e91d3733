use serde_json::Value;

use crate::error::SuiteError;
use crate::task::{TaskInstance, TerminationFn};

use super::trace::{transpose_rows_to_columns, STEP_NUMBER};
use super::traits::{Agent, Environment};
use super::types::{EpisodeOutcome, EpisodeResult, RunContext};

pub const STEPS_PER_COMPLEXITY: f64 = 10.0;

/// Step budget for a task of the given complexity: `round(10 * complexity)`.
pub fn allocate_step_budget(template: &str, complexity: f64) -> Result<usize, SuiteError> {
    if !complexity.is_finite() || complexity <= 0.0 {
        return Err(SuiteError::InvalidComplexity {
            template: template.to_string(),
            value: complexity,
        });
    }
    Ok((STEPS_PER_COMPLEXITY * complexity).round() as usize)
}

/// Drive `agent` on `instance` until it signals completion, the termination
/// predicate fires, or `ctx.step_budget` steps have been taken.
///
/// The predicate is polled before the agent's own done flag, so a step on
/// which both fire is reported as `EnvironmentTerminated`.
pub async fn run_episode(
    agent: &mut dyn Agent,
    env: &mut dyn Environment,
    instance: &TaskInstance,
    ctx: &mut RunContext,
    termination: Option<&TerminationFn>,
) -> anyhow::Result<EpisodeResult> {
    if ctx.step_budget == 0 {
        return Ok(EpisodeResult::not_started());
    }

    agent.reset(env, instance.start_on_home_screen).await?;

    let mut rows = Vec::new();
    let mut outcome = EpisodeOutcome::BudgetExhausted;
    while ctx.steps_taken < ctx.step_budget {
        let step = agent.step(env, instance, ctx).await?;
        ctx.steps_taken += 1;

        let mut data = step.data;
        data.insert(STEP_NUMBER.to_string(), Value::from(ctx.steps_taken));
        rows.push(data);

        if termination.is_some_and(|terminated| terminated(&*env)) {
            tracing::info!(instance = %ctx.identity, steps = ctx.steps_taken, "environment ends episode");
            outcome = EpisodeOutcome::EnvironmentTerminated;
            break;
        }
        if step.done {
            tracing::info!(instance = %ctx.identity, steps = ctx.steps_taken, "agent indicates task is done");
            outcome = EpisodeOutcome::AgentCompleted;
            break;
        }
    }

    if outcome == EpisodeOutcome::BudgetExhausted {
        tracing::warn!(
            instance = %ctx.identity,
            budget = ctx.step_budget,
            "agent did not indicate task is done; reached max number of steps"
        );
    }

    Ok(EpisodeResult::finished(
        outcome,
        transpose_rows_to_columns(rows),
        ctx.steps_taken,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn budget_is_rounded_ten_times_complexity() {
        assert_eq!(allocate_step_budget("T", 1.0).unwrap(), 10);
        assert_eq!(allocate_step_budget("T", 2.5).unwrap(), 25);
        assert_eq!(allocate_step_budget("T", 1.26).unwrap(), 13);
        assert_eq!(allocate_step_budget("T", 0.04).unwrap(), 0);
    }

    #[test]
    fn non_positive_or_non_finite_complexity_is_rejected() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = allocate_step_budget("T", bad).unwrap_err();
            assert!(matches!(err, SuiteError::InvalidComplexity { .. }));
        }
    }
}
