use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use futures::FutureExt;
use uuid::Uuid;

use crate::checkpoint::{
    project, CheckpointState, CheckpointStore, NullCheckpointStore, METADATA_FIELDS,
};
use crate::config::RunnerConfig;
use crate::episode::{
    allocate_step_budget, run_episode, Agent, EpisodeRecord, EpisodeResult, Environment,
    RunContext,
};
use crate::error::{FailureStage, InstanceError, RunError};
use crate::report::aggregate;
use crate::suite::Suite;
use crate::task::{InstanceIdentity, TaskInstance};

use super::output::log_event;
use super::progress::ProgressMonitor;
use super::traits::{SuiteEvent, SuiteObserver};
use super::types::RunCounts;

/// Sequential, resumable suite execution.
///
/// Instances run one at a time against the single shared environment. Every
/// attempt ends in exactly one record, saved to the checkpoint store before
/// the next instance starts; a fault inside an attempt (error or panic) is
/// converted into a failure record and never aborts the batch. Only
/// checkpoint failures stop a run.
pub struct SuiteRunner<'a> {
    config: &'a RunnerConfig,
    store: Arc<dyn CheckpointStore>,
    observers: Vec<Arc<dyn SuiteObserver>>,
    progress_bar: bool,
}

pub struct SuiteRunnerBuilder<'a> {
    config: &'a RunnerConfig,
    store: Arc<dyn CheckpointStore>,
    observers: Vec<Arc<dyn SuiteObserver>>,
    progress_bar: bool,
}

impl<'a> SuiteRunner<'a> {
    pub fn new(config: &'a RunnerConfig) -> Self {
        SuiteRunnerBuilder::new(config).build()
    }

    pub fn builder(config: &'a RunnerConfig) -> SuiteRunnerBuilder<'a> {
        SuiteRunnerBuilder::new(config)
    }

    /// Run every instance of `suite` that has no completed record yet.
    ///
    /// Returns, in suite order, all prior records for each instance
    /// (completed first, then failed) followed by the record of any new
    /// attempt. Records are reduced to [`METADATA_FIELDS`], so running a
    /// finished suite again returns the same list without executing anything.
    pub async fn run(
        &self,
        suite: &Suite,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
    ) -> Result<Vec<EpisodeRecord>, RunError> {
        let run_id = Uuid::new_v4().to_string();
        let start = Instant::now();

        let prior = self.store.load(METADATA_FIELDS)?;
        let prior_records = prior.len();
        let state = CheckpointState::from_records(prior);

        let mut counts = RunCounts {
            total_instances: suite.total_instances(),
            ..RunCounts::default()
        };
        self.emit(&SuiteEvent::RunStart {
            run_id: run_id.clone(),
            total_templates: suite.len(),
            total_instances: counts.total_instances,
            prior_records,
            completed_instances: state.completed_count(),
            failed_instances: state.failed_count(),
        });

        let mut progress = ProgressMonitor::new(counts.total_instances, self.progress_bar);
        let mut output: Vec<EpisodeRecord> = Vec::with_capacity(counts.total_instances);

        for (name, instances) in suite.iter() {
            self.emit(&SuiteEvent::TemplateStart {
                run_id: run_id.clone(),
                template: name.to_string(),
                instances: instances.len(),
            });
            progress.set_message(name);

            for (index, instance) in instances.iter().enumerate() {
                let identity = instance.identity(index);

                let mut prior_for_instance = 0;
                for record in state.prior(&identity) {
                    counts.tally.record(record);
                    output.push(record.clone());
                    prior_for_instance += 1;
                }
                if state.is_completed(&identity) {
                    counts.skipped += 1;
                    progress.skip_instance();
                    self.emit(&SuiteEvent::InstanceSkipped {
                        run_id: run_id.clone(),
                        identity,
                        prior_records: prior_for_instance,
                    });
                    continue;
                }

                self.emit(&SuiteEvent::InstanceStart {
                    run_id: run_id.clone(),
                    identity: identity.clone(),
                    goal: instance.goal.clone(),
                });
                progress.start_instance(&identity);

                let record = self
                    .run_instance(instance, &identity, &mut *agent, &mut *env)
                    .await;
                self.store
                    .save_episodes(std::slice::from_ref(&record), &identity)?;

                let record = project(&record, METADATA_FIELDS)?;
                counts.executed += 1;
                if record.is_failure() {
                    counts.failed += 1;
                }
                counts.tally.record(&record);
                progress.complete_instance(&identity, record.is_successful, record.run_time);
                output.push(record.clone());

                self.emit(&SuiteEvent::InstanceComplete {
                    run_id: run_id.clone(),
                    identity,
                    record,
                    tally: counts.tally,
                });
                self.emit(&SuiteEvent::Summary {
                    run_id: run_id.clone(),
                    stats: aggregate(&output),
                });
            }
        }

        counts.duration_ms = start.elapsed().as_millis() as u64;
        progress.finish(counts.tally.correct, counts.tally.total);
        self.emit(&SuiteEvent::RunEnd { run_id, counts });

        Ok(output)
    }

    /// One isolated attempt. Whatever happens inside, a record comes out.
    async fn run_instance(
        &self,
        instance: &TaskInstance,
        identity: &InstanceIdentity,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
    ) -> EpisodeRecord {
        let start = Instant::now();
        let mut initialized = false;

        let attempt = AssertUnwindSafe(self.attempt(
            instance,
            identity,
            &mut *agent,
            &mut *env,
            &mut initialized,
        ))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| Err(InstanceError::Panic(panic_message(panic.as_ref()))));
        let run_time = start.elapsed().as_secs_f64();

        let record = match attempt {
            Ok((episode, success)) => {
                EpisodeRecord::completed(instance, identity.index, episode, success, run_time)
            }
            Err(err) => {
                tracing::warn!(instance = %identity, error = %err, "instance failed; continuing with next");
                EpisodeRecord::failed(instance, identity.index, err.to_string(), run_time)
            }
        };

        if initialized {
            self.tear_down(instance, identity, &mut *env).await;
        }

        record.with_agent_name(agent.name())
    }

    async fn attempt(
        &self,
        instance: &TaskInstance,
        identity: &InstanceIdentity,
        agent: &mut dyn Agent,
        env: &mut dyn Environment,
        initialized: &mut bool,
    ) -> Result<(EpisodeResult, f64), InstanceError> {
        let template = instance.template();

        let step_budget = allocate_step_budget(&instance.template_name, instance.complexity)
            .map_err(|e| InstanceError::at(FailureStage::Prepare)(e.into()))?;
        let mut ctx = RunContext::new(identity.clone(), step_budget);
        if let Some(dir) = self.episode_dir(agent.name(), identity) {
            std::fs::create_dir_all(&dir).map_err(|e| {
                InstanceError::at(FailureStage::Prepare)(
                    anyhow::Error::new(e).context(format!("create {}", dir.display())),
                )
            })?;
            ctx = ctx.with_save_dir(dir);
        }

        *initialized = true;
        template
            .initialize(instance, &mut *env)
            .await
            .map_err(InstanceError::at(FailureStage::Initialize))?;

        let termination = template.termination_fn();
        let episode = run_episode(
            &mut *agent,
            &mut *env,
            instance,
            &mut ctx,
            termination.as_ref(),
        )
        .await
        .map_err(InstanceError::at(FailureStage::Episode))?;

        // Evaluated even when not done, but only a done episode can succeed.
        let check = template
            .is_successful(instance, &mut *env)
            .await
            .map_err(InstanceError::at(FailureStage::Evaluate))?;
        let success = if episode.done { check } else { 0.0 };

        Ok((episode, success))
    }

    async fn tear_down(
        &self,
        instance: &TaskInstance,
        identity: &InstanceIdentity,
        env: &mut dyn Environment,
    ) {
        let result = AssertUnwindSafe(instance.template().tear_down(instance, env))
            .catch_unwind()
            .await;
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => {
                tracing::warn!(instance = %identity, error = ?e, "tear down failure for this task");
            }
            Err(panic) => {
                tracing::warn!(
                    instance = %identity,
                    panic = %panic_message(panic.as_ref()),
                    "tear down panicked for this task"
                );
            }
        }
    }

    /// `<save_root>/<agent>_<save_name>/record/<identity>`
    fn episode_dir(&self, agent_name: &str, identity: &InstanceIdentity) -> Option<PathBuf> {
        self.config.save_root.as_ref().map(|root| {
            root.join(format!("{agent_name}_{}", self.config.save_name))
                .join("record")
                .join(identity.to_string())
        })
    }

    fn emit(&self, event: &SuiteEvent) {
        if self.observers.is_empty() {
            log_event(event);
            return;
        }
        for observer in &self.observers {
            observer.on_event(event);
        }
    }
}

impl<'a> SuiteRunnerBuilder<'a> {
    pub fn new(config: &'a RunnerConfig) -> Self {
        Self {
            config,
            store: Arc::new(NullCheckpointStore),
            observers: Vec::new(),
            progress_bar: false,
        }
    }

    pub fn checkpoint(mut self, store: Arc<dyn CheckpointStore>) -> Self {
        self.store = store;
        self
    }

    pub fn observer(mut self, observer: Arc<dyn SuiteObserver>) -> Self {
        self.observers.push(observer);
        self
    }

    pub fn observers(mut self, observers: Vec<Arc<dyn SuiteObserver>>) -> Self {
        self.observers.extend(observers);
        self
    }

    pub fn progress_bar(mut self, enabled: bool) -> Self {
        self.progress_bar = enabled;
        self
    }

    pub fn build(self) -> SuiteRunner<'a> {
        SuiteRunner {
            config: self.config,
            store: self.store,
            observers: self.observers,
            progress_bar: self.progress_bar,
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
