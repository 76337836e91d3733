mod common;

use std::sync::Arc;

use common::{registry, FailingStore, FakeEnv, FakeTemplate, ScriptedAgent};
use suitekit_core::checkpoint::{CheckpointStore, MemoryCheckpointStore};
use suitekit_core::config::RunnerConfig;
use suitekit_core::episode::EpisodeOutcome;
use suitekit_core::error::{CheckpointError, RunError};
use suitekit_core::executor::SuiteRunner;
use suitekit_core::suite::{build_suite, Suite, SuiteOptions};
use suitekit_core::task::InstanceIdentity;

fn suite_of(templates: &[Arc<FakeTemplate>], n: usize) -> Suite {
    let opts = SuiteOptions {
        n_task_combinations: n,
        seed: Some(1),
        ..SuiteOptions::default()
    };
    build_suite(&registry(templates), &opts).unwrap()
}

#[tokio::test]
async fn initialize_error_is_isolated_to_its_instance() {
    let flaky = Arc::new(FakeTemplate::new("Flaky", 1.0).failing_init_on(2));
    let steady = Arc::new(FakeTemplate::new("Steady", 1.0));
    let suite = suite_of(&[flaky.clone(), steady.clone()], 3);

    let store = Arc::new(MemoryCheckpointStore::new());
    let config = RunnerConfig::default();
    let runner = SuiteRunner::builder(&config)
        .checkpoint(store.clone())
        .build();
    let mut env = FakeEnv::default();
    let mut agent = ScriptedAgent::done_after(1);

    let records = runner.run(&suite, &mut agent, &mut env).await.unwrap();
    assert_eq!(records.len(), suite.total_instances());
    assert_eq!(store.len(), 6);

    let failed: Vec<_> = records.iter().filter(|r| r.is_failure()).collect();
    assert_eq!(failed.len(), 1);
    let failure = failed[0];
    assert_eq!(failure.identity(), InstanceIdentity::new("Flaky", 1));
    assert_eq!(failure.is_successful, None);
    assert_eq!(failure.episode_length, None);
    let info = failure.exception_info.as_deref().unwrap();
    assert!(info.starts_with("initialize failed"), "{info}");
    assert!(info.contains("init exploded"), "{info}");

    // Later instances of the same template and the other template still ran.
    assert_eq!(FakeTemplate::count(&flaky.check_calls), 2);
    assert_eq!(FakeTemplate::count(&steady.check_calls), 3);
    // Teardown follows every initialization attempt, failed ones included.
    assert_eq!(FakeTemplate::count(&flaky.teardown_calls), 3);
    assert_eq!(env.torn_down.len(), 6);
}

#[tokio::test]
async fn agent_panic_becomes_failure_record() {
    let template = Arc::new(FakeTemplate::new("Foo", 1.0));
    let suite = suite_of(&[template.clone()], 3);
    let config = RunnerConfig::default();
    let runner = SuiteRunner::new(&config);
    let mut env = FakeEnv::default();
    let mut agent = ScriptedAgent {
        panic_on_step: Some(2),
        ..ScriptedAgent::done_after(1)
    };

    let records = runner.run(&suite, &mut agent, &mut env).await.unwrap();
    assert_eq!(records.len(), 3);
    assert!(!records[0].is_failure());
    assert_eq!(
        records[1].exception_info.as_deref(),
        Some("panicked: agent blew up")
    );
    assert!(!records[2].is_failure());
    assert_eq!(FakeTemplate::count(&template.teardown_calls), 3);
}

#[tokio::test]
async fn agent_error_is_reported_with_stage() {
    let suite = suite_of(&[Arc::new(FakeTemplate::new("Foo", 1.0))], 1);
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();
    let mut agent = ScriptedAgent {
        error_on_step: Some(1),
        ..ScriptedAgent::done_after(1)
    };

    let records = SuiteRunner::new(&config)
        .run(&suite, &mut agent, &mut env)
        .await
        .unwrap();
    let info = records[0].exception_info.as_deref().unwrap();
    assert!(info.starts_with("episode failed"), "{info}");
    assert!(info.contains("agent step failed"), "{info}");
}

#[tokio::test]
async fn teardown_failure_does_not_change_outcome() {
    let template = Arc::new(FakeTemplate::new("Foo", 1.0).failing_teardown());
    let suite = suite_of(&[template], 2);
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();

    let records = SuiteRunner::new(&config)
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap();
    assert!(records.iter().all(|r| !r.is_failure()));
    assert!(records.iter().all(|r| r.is_successful == Some(1.0)));
}

#[tokio::test]
async fn success_check_error_is_reported_with_stage() {
    let template = Arc::new(FakeTemplate::new("Foo", 1.0).failing_check_on(1));
    let suite = suite_of(&[template.clone()], 2);
    let store = Arc::new(MemoryCheckpointStore::new());
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();

    let records = SuiteRunner::builder(&config)
        .checkpoint(store.clone())
        .build()
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap();

    let info = records[0].exception_info.as_deref().unwrap();
    assert!(info.starts_with("evaluate failed"), "{info}");
    assert!(info.contains("success check exploded"), "{info}");
    assert_eq!(records[0].is_successful, None);
    assert_eq!(records[1].is_successful, Some(1.0));
    assert_eq!(store.len(), 2);
    assert_eq!(FakeTemplate::count(&template.teardown_calls), 2);
}

#[tokio::test]
async fn teardown_panic_is_contained() {
    let template = Arc::new(FakeTemplate::new("Foo", 1.0).panicking_teardown());
    let other = Arc::new(FakeTemplate::new("Zed", 1.0));
    let suite = suite_of(&[template.clone(), other.clone()], 2);
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();

    let records = SuiteRunner::new(&config)
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap();

    assert_eq!(records.len(), 4);
    assert!(records.iter().all(|r| r.is_successful == Some(1.0)));
    assert_eq!(FakeTemplate::count(&template.teardown_calls), 2);
    assert_eq!(FakeTemplate::count(&other.check_calls), 2);
}

#[tokio::test]
async fn huge_complexity_runs_without_preallocating_the_budget() {
    // round(10 * 1e12) steps; the agent finishes on the first.
    let template = Arc::new(FakeTemplate::new("Big", 1e12));
    let suite = suite_of(&[template], 1);
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();

    let records = SuiteRunner::new(&config)
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap();

    assert!(!records[0].is_failure());
    assert_eq!(records[0].episode_length, Some(1));
    assert_eq!(records[0].outcome, Some(EpisodeOutcome::AgentCompleted));
}

#[tokio::test]
async fn checkpoint_failure_stops_the_run() {
    let template = Arc::new(FakeTemplate::new("Foo", 1.0));
    let suite = suite_of(&[template.clone()], 3);
    let config = RunnerConfig::default();
    let runner = SuiteRunner::builder(&config)
        .checkpoint(Arc::new(FailingStore))
        .build();
    let mut env = FakeEnv::default();

    let err = runner
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RunError::Checkpoint(CheckpointError::Unavailable(_))
    ));
    // Stopped after the first attempt.
    assert_eq!(FakeTemplate::count(&template.init_calls), 1);
}

#[tokio::test]
async fn zero_budget_is_never_successful() {
    // round(10 * 0.04) == 0
    let template = Arc::new(FakeTemplate::new("Tiny", 0.04));
    let suite = suite_of(&[template.clone()], 1);
    let store = Arc::new(MemoryCheckpointStore::new());
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();
    let mut agent = ScriptedAgent::done_after(1);

    let records = SuiteRunner::builder(&config)
        .checkpoint(store.clone())
        .build()
        .run(&suite, &mut agent, &mut env)
        .await
        .unwrap();

    assert_eq!(agent.resets, 0);
    assert_eq!(agent.steps, 0);
    assert_eq!(records[0].is_successful, Some(0.0));
    assert_eq!(records[0].episode_length, Some(0));
    assert_eq!(records[0].outcome, Some(EpisodeOutcome::NotStarted));
    // The check still ran.
    assert_eq!(FakeTemplate::count(&template.check_calls), 1);
    let saved = store.load(&[]).unwrap();
    assert!(saved[0].episode_data.as_ref().unwrap().is_empty());
}

#[tokio::test]
async fn budget_exhaustion_is_done_but_distinguishable() {
    // round(10 * 0.3) == 3
    let suite = suite_of(&[Arc::new(FakeTemplate::new("Slow", 0.3))], 1);
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();
    let mut agent = ScriptedAgent::never_done();

    let records = SuiteRunner::new(&config)
        .run(&suite, &mut agent, &mut env)
        .await
        .unwrap();

    assert_eq!(agent.steps, 3);
    assert_eq!(records[0].episode_length, Some(3));
    assert_eq!(records[0].outcome, Some(EpisodeOutcome::BudgetExhausted));
    assert_eq!(records[0].is_successful, Some(1.0));
}

#[tokio::test]
async fn termination_predicate_wins_over_agent_done() {
    let suite = suite_of(&[Arc::new(FakeTemplate::new("Mini", 1.0).terminating())], 1);
    let config = RunnerConfig::default();
    let mut env = FakeEnv::default();

    let records = SuiteRunner::new(&config)
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap();
    assert_eq!(records[0].outcome, Some(EpisodeOutcome::EnvironmentTerminated));
    assert_eq!(records[0].episode_length, Some(1));
}

#[tokio::test]
async fn episode_directories_are_created_under_save_root() {
    let dir = tempfile::tempdir().unwrap();
    let suite = suite_of(&[Arc::new(FakeTemplate::new("Foo", 1.0))], 2);
    let config = RunnerConfig {
        save_root: Some(dir.path().to_path_buf()),
        save_name: "7".to_string(),
        ..RunnerConfig::default()
    };
    let mut env = FakeEnv::default();

    SuiteRunner::new(&config)
        .run(&suite, &mut ScriptedAgent::done_after(1), &mut env)
        .await
        .unwrap();

    let record_dir = dir.path().join("scripted_7").join("record");
    assert!(record_dir.join("Foo_0").is_dir());
    assert!(record_dir.join("Foo_1").is_dir());
}
