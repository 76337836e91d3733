use std::collections::VecDeque;

use anyhow::{bail, Result};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::Value;

use suitekit_core::api::{Agent, AgentStep, Environment, RunContext, StepData, TaskInstance};

use super::device::{device_mut, SimAction, MAX_BRIGHTNESS};
use super::tasks::{
    param_str, param_u32, BLUETOOTH_OFF, BLUETOOTH_ON, BRIGHTNESS_MAX, BRIGHTNESS_MIN,
    CLOCK_TIMER_ENTRY, COPY_TO_CLIPBOARD, OPEN_APP, WIFI_OFF, WIFI_OFF_BLUETOOTH_ON, WIFI_ON,
};

/// The action script that solves `instance` on a simulated device.
pub fn solve(instance: &TaskInstance) -> Result<Vec<SimAction>> {
    let params = &instance.params;
    let plan = match instance.template_name.as_str() {
        WIFI_ON => vec![SimAction::SetWifi { on: true }],
        WIFI_OFF => vec![SimAction::SetWifi { on: false }],
        BLUETOOTH_ON => vec![SimAction::SetBluetooth { on: true }],
        BLUETOOTH_OFF => vec![SimAction::SetBluetooth { on: false }],
        BRIGHTNESS_MAX => vec![SimAction::SetBrightness {
            level: MAX_BRIGHTNESS,
        }],
        BRIGHTNESS_MIN => vec![SimAction::SetBrightness { level: 0 }],
        COPY_TO_CLIPBOARD => vec![SimAction::CopyText {
            text: param_str(params, "clipboard_content")?.to_string(),
        }],
        WIFI_OFF_BLUETOOTH_ON => vec![
            SimAction::SetWifi { on: false },
            SimAction::SetBluetooth { on: true },
        ],
        CLOCK_TIMER_ENTRY => vec![
            SimAction::OpenApp {
                name: "Clock".into(),
            },
            SimAction::SetTimer {
                hours: param_u32(params, "hours")?,
                minutes: param_u32(params, "minutes")?,
                seconds: param_u32(params, "seconds")?,
            },
            SimAction::NavigateHome,
        ],
        OPEN_APP => vec![SimAction::OpenApp {
            name: param_str(params, "app_name")?.to_string(),
        }],
        other => bail!("no scripted solution for template {other}"),
    };
    Ok(plan)
}

/// Agent that replays the known solution for each simulated task.
///
/// With probability `miss_rate` an episode is fumbled: the agent only waits
/// and never signals completion, so the episode runs out of steps.
pub struct OracleAgent {
    name: String,
    miss_rate: f64,
    rng: StdRng,
    plan: Option<VecDeque<SimAction>>,
    fumble: bool,
}

impl OracleAgent {
    /// `miss_rate` is clamped to `[0, 1]`; a non-finite rate never fumbles.
    pub fn new(miss_rate: f64, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Self {
            name: "oracle".to_string(),
            miss_rate: if miss_rate.is_finite() {
                miss_rate.clamp(0.0, 1.0)
            } else {
                0.0
            },
            rng,
            plan: None,
            fumble: false,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }
}

#[async_trait]
impl Agent for OracleAgent {
    fn name(&self) -> &str {
        &self.name
    }

    fn family(&self) -> &str {
        "scripted"
    }

    async fn reset(&mut self, env: &mut dyn Environment, go_home: bool) -> Result<()> {
        self.plan = None;
        self.fumble = self.rng.gen_bool(self.miss_rate);
        if go_home {
            device_mut(env)?.apply(&SimAction::NavigateHome)?;
        }
        Ok(())
    }

    async fn step(
        &mut self,
        env: &mut dyn Environment,
        instance: &TaskInstance,
        ctx: &RunContext,
    ) -> Result<AgentStep> {
        if self.plan.is_none() {
            let script = if self.fumble {
                Vec::new()
            } else {
                solve(instance)?
            };
            tracing::debug!(
                instance = %ctx.identity,
                actions = script.len(),
                fumble = self.fumble,
                "oracle planned episode"
            );
            self.plan = Some(VecDeque::from(script));
        }
        let plan = self.plan.get_or_insert_with(VecDeque::new);

        let action = plan.pop_front().unwrap_or(SimAction::Wait);
        let done = !self.fumble && plan.is_empty();
        device_mut(env)?.apply(&action)?;

        let mut data = StepData::new();
        data.insert("action".to_string(), serde_json::to_value(&action)?);
        data.insert(
            "remaining_steps".to_string(),
            Value::from(ctx.remaining_steps().saturating_sub(1)),
        );
        Ok(if done {
            AgentStep::finished(data)
        } else {
            AgentStep::running(data)
        })
    }
}
