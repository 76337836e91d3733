#![allow(dead_code)]

use std::any::Any;
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::Rng;
use serde_json::{json, Value};

use suitekit_core::checkpoint::CheckpointStore;
use suitekit_core::episode::{Agent, AgentStep, Environment, EpisodeRecord, RunContext};
use suitekit_core::error::CheckpointError;
use suitekit_core::executor::{SuiteEvent, SuiteObserver};
use suitekit_core::task::{
    InstanceIdentity, Params, TaskInstance, TaskRegistry, TaskTemplate, TerminationFn,
};

/// Stand-in device: counts agent steps and remembers teardowns.
#[derive(Debug, Default)]
pub struct FakeEnv {
    pub steps_seen: usize,
    pub torn_down: Vec<String>,
}

impl Environment for FakeEnv {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

pub struct FakeTemplate {
    pub name: String,
    pub complexity: f64,
    pub success: f64,
    /// 1-based initialize call that fails.
    pub fail_init_on_call: Option<usize>,
    /// 1-based success check that fails.
    pub fail_check_on_call: Option<usize>,
    pub fail_teardown: bool,
    pub panic_teardown: bool,
    pub terminate_after_first_step: bool,
    pub generate_calls: AtomicUsize,
    pub init_calls: AtomicUsize,
    pub check_calls: AtomicUsize,
    pub teardown_calls: AtomicUsize,
}

impl FakeTemplate {
    pub fn new(name: &str, complexity: f64) -> Self {
        Self {
            name: name.to_string(),
            complexity,
            success: 1.0,
            fail_init_on_call: None,
            fail_check_on_call: None,
            fail_teardown: false,
            panic_teardown: false,
            terminate_after_first_step: false,
            generate_calls: AtomicUsize::new(0),
            init_calls: AtomicUsize::new(0),
            check_calls: AtomicUsize::new(0),
            teardown_calls: AtomicUsize::new(0),
        }
    }

    pub fn with_success(mut self, success: f64) -> Self {
        self.success = success;
        self
    }

    pub fn failing_init_on(mut self, call: usize) -> Self {
        self.fail_init_on_call = Some(call);
        self
    }

    pub fn failing_check_on(mut self, call: usize) -> Self {
        self.fail_check_on_call = Some(call);
        self
    }

    pub fn panicking_teardown(mut self) -> Self {
        self.panic_teardown = true;
        self
    }

    pub fn failing_teardown(mut self) -> Self {
        self.fail_teardown = true;
        self
    }

    pub fn terminating(mut self) -> Self {
        self.terminate_after_first_step = true;
        self
    }

    pub fn count(counter: &AtomicUsize) -> usize {
        counter.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TaskTemplate for FakeTemplate {
    fn name(&self) -> &str {
        &self.name
    }

    fn complexity(&self) -> f64 {
        self.complexity
    }

    fn generate_params(&self, rng: &mut StdRng) -> anyhow::Result<Params> {
        self.generate_calls.fetch_add(1, Ordering::SeqCst);
        let mut params = Params::new();
        params.insert("value".to_string(), json!(rng.gen_range(0..1_000_000u32)));
        Ok(params)
    }

    fn goal(&self, params: &Params) -> String {
        format!("{} {}", self.name, params.get("value").unwrap_or(&Value::Null))
    }

    async fn initialize(
        &self,
        _instance: &TaskInstance,
        _env: &mut dyn Environment,
    ) -> anyhow::Result<()> {
        let call = self.init_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_init_on_call == Some(call) {
            anyhow::bail!("init exploded");
        }
        Ok(())
    }

    async fn is_successful(
        &self,
        _instance: &TaskInstance,
        _env: &mut dyn Environment,
    ) -> anyhow::Result<f64> {
        let call = self.check_calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_check_on_call == Some(call) {
            anyhow::bail!("success check exploded");
        }
        Ok(self.success)
    }

    async fn tear_down(
        &self,
        _instance: &TaskInstance,
        env: &mut dyn Environment,
    ) -> anyhow::Result<()> {
        self.teardown_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(fake) = env.downcast_mut::<FakeEnv>() {
            fake.torn_down.push(self.name.clone());
        }
        if self.panic_teardown {
            panic!("teardown blew up");
        }
        if self.fail_teardown {
            anyhow::bail!("teardown exploded");
        }
        Ok(())
    }

    fn termination_fn(&self) -> Option<TerminationFn> {
        if !self.terminate_after_first_step {
            return None;
        }
        Some(Arc::new(|env: &dyn Environment| {
            env.downcast_ref::<FakeEnv>()
                .map(|fake| fake.steps_seen >= 1)
                .unwrap_or(false)
        }))
    }
}

pub fn registry(templates: &[Arc<FakeTemplate>]) -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    for template in templates {
        registry
            .register(template.clone() as Arc<dyn TaskTemplate>)
            .unwrap();
    }
    registry
}

/// Agent that finishes after `done_after` steps (never when `None`) and can
/// be told to fail or panic on a given global step.
#[derive(Debug, Default)]
pub struct ScriptedAgent {
    pub done_after: Option<usize>,
    pub panic_on_step: Option<usize>,
    pub error_on_step: Option<usize>,
    pub resets: usize,
    pub steps: usize,
}

impl ScriptedAgent {
    pub fn done_after(steps: usize) -> Self {
        Self {
            done_after: Some(steps),
            ..Self::default()
        }
    }

    pub fn never_done() -> Self {
        Self::default()
    }
}

#[async_trait]
impl Agent for ScriptedAgent {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn reset(&mut self, _env: &mut dyn Environment, _go_home: bool) -> anyhow::Result<()> {
        self.resets += 1;
        Ok(())
    }

    async fn step(
        &mut self,
        env: &mut dyn Environment,
        _instance: &TaskInstance,
        ctx: &RunContext,
    ) -> anyhow::Result<AgentStep> {
        self.steps += 1;
        if let Some(fake) = env.downcast_mut::<FakeEnv>() {
            fake.steps_seen += 1;
        }
        if self.panic_on_step == Some(self.steps) {
            panic!("agent blew up");
        }
        if self.error_on_step == Some(self.steps) {
            anyhow::bail!("agent step failed");
        }

        let mut data = BTreeMap::new();
        data.insert("action".to_string(), json!("tap"));
        let done = self
            .done_after
            .map(|n| ctx.steps_taken + 1 >= n)
            .unwrap_or(false);
        Ok(AgentStep { done, data })
    }
}

/// Store whose saves always fail.
pub struct FailingStore;

impl CheckpointStore for FailingStore {
    fn name(&self) -> &str {
        "failing"
    }

    fn load(&self, _fields: &[&str]) -> Result<Vec<EpisodeRecord>, CheckpointError> {
        Ok(Vec::new())
    }

    fn save_episodes(
        &self,
        _records: &[EpisodeRecord],
        _identity: &InstanceIdentity,
    ) -> Result<(), CheckpointError> {
        Err(CheckpointError::Unavailable("disk full".to_string()))
    }
}

/// Observer that keeps a compact trace of event kinds.
#[derive(Default)]
pub struct RecordingObserver {
    pub events: Mutex<Vec<String>>,
}

impl RecordingObserver {
    pub fn kinds(&self) -> Vec<String> {
        self.events.lock().unwrap().clone()
    }
}

impl SuiteObserver for RecordingObserver {
    fn name(&self) -> &str {
        "recording"
    }

    fn format(&self) -> &str {
        "test"
    }

    fn on_event(&self, event: &SuiteEvent) {
        let kind = match event {
            SuiteEvent::RunStart {
                completed_instances,
                failed_instances,
                ..
            } => format!("run_start:{completed_instances}/{failed_instances}"),
            SuiteEvent::TemplateStart { template, .. } => format!("template:{template}"),
            SuiteEvent::InstanceSkipped { identity, .. } => format!("skip:{identity}"),
            SuiteEvent::InstanceStart { identity, .. } => format!("start:{identity}"),
            SuiteEvent::InstanceComplete { identity, .. } => format!("done:{identity}"),
            SuiteEvent::Summary { .. } => "summary".to_string(),
            SuiteEvent::RunEnd { .. } => "run_end".to_string(),
        };
        self.events.lock().unwrap().push(kind);
    }
}

pub fn failed_record(template: &str, index: usize) -> EpisodeRecord {
    serde_json::from_value(json!({
        "goal": "g",
        "task_template": template,
        "instance_id": index,
        "run_time": 0.1,
        "exception_info": "episode failed: earlier crash",
    }))
    .unwrap()
}
