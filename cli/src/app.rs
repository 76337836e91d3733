//! Command handlers: merge CLI overrides into the loaded config, wire the
//! plugins and drive the core.
use std::sync::Arc;

use suitekit_core::api::{
    aggregate, allocate_step_budget, build_suite, format_table, to_json, AppConfig,
    CheckpointConfig, CheckpointStore, CliError, JsonlCheckpointConfig, OutputFormat, Suite,
    SuiteRunner, METADATA_FIELDS,
};
use suitekit_plugins::checkpoint::JsonlCheckpointStore;
use suitekit_plugins::factory;
use suitekit_plugins::sim::SimDevice;

use crate::commands::cli::{OutputKind, ReportArgs, ReportFormat, RunArgs, SuiteArgs};

pub fn apply_suite_overrides(cfg: &mut AppConfig, args: &SuiteArgs) {
    if let Some(family) = &args.family {
        cfg.suite.family = family.clone();
    }
    if !args.tasks.is_empty() {
        cfg.suite.tasks = args.tasks.clone();
    }
    if let Some(n) = args.n_task_combinations {
        cfg.suite.n_task_combinations = n;
    }
    if args.seed.is_some() {
        cfg.suite.seed = args.seed;
    }
    if args.identical_params {
        cfg.suite.use_identical_params = true;
    }
}

pub fn apply_run_overrides(cfg: &mut AppConfig, args: &RunArgs) -> Result<(), CliError> {
    apply_suite_overrides(cfg, &args.suite);
    if let Some(dir) = &args.checkpoint_dir {
        cfg.checkpoint = CheckpointConfig::Jsonl(JsonlCheckpointConfig {
            directory: dir.clone(),
        });
    }
    if args.save_root.is_some() {
        cfg.runner.save_root = args.save_root.clone();
    }
    if let Some(name) = &args.save_name {
        cfg.runner.save_name = name.clone();
    }
    if let Some(format) = args.format {
        cfg.output.format = match format {
            OutputKind::Text => OutputFormat::Text,
            OutputKind::Jsonl => OutputFormat::Jsonl,
        };
    }
    if let Some(rate) = args.miss_rate {
        cfg.runner.oracle_miss_rate = rate;
    }
    if args.no_progress {
        cfg.output.progress_bar = false;
    }
    if args.live_summary {
        cfg.output.live_summary = true;
    }

    let rate = cfg.runner.oracle_miss_rate;
    if !(0.0..=1.0).contains(&rate) {
        return Err(CliError::Config(format!("miss rate must be in [0, 1], got {rate}")));
    }
    Ok(())
}

fn build_configured_suite(cfg: &AppConfig) -> Result<Suite, CliError> {
    let catalog = factory::build_catalog()?;
    let registry = catalog.get_registry(&cfg.suite.family)?;
    Ok(build_suite(&registry, &cfg.suite.to_options())?)
}

#[tracing::instrument(name = "cli.run", skip_all)]
pub async fn run(mut cfg: AppConfig, args: RunArgs) -> Result<i32, CliError> {
    apply_run_overrides(&mut cfg, &args)?;
    let suite = build_configured_suite(&cfg)?;
    tracing::info!(
        family = %cfg.suite.family,
        templates = suite.len(),
        instances = suite.total_instances(),
        "suite built"
    );

    let store = factory::build_checkpoint(&cfg.checkpoint);
    let observer = factory::build_observer(&cfg.output);
    let progress = cfg.output.progress_bar
        && cfg.output.format == OutputFormat::Text
        && atty::is(atty::Stream::Stderr);

    let mut agent = factory::build_agent(cfg.runner.oracle_miss_rate, cfg.suite.seed);
    let mut device = SimDevice::new();

    let records = SuiteRunner::builder(&cfg.runner)
        .checkpoint(store)
        .observer(observer)
        .progress_bar(progress)
        .build()
        .run(&suite, &mut agent, &mut device)
        .await?;

    if cfg.output.format == OutputFormat::Text {
        println!("{}", format_table(&aggregate(&records)));
    }
    Ok(0)
}

pub fn plan(mut cfg: AppConfig, args: SuiteArgs) -> Result<i32, CliError> {
    apply_suite_overrides(&mut cfg, &args);
    let suite = build_configured_suite(&cfg)?;
    for (identity, instance) in suite.identities() {
        let budget = allocate_step_budget(&instance.template_name, instance.complexity)?;
        let seed = instance
            .seed
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        println!("{identity}\tseed={seed}\tsteps={budget}\t{}", instance.goal);
    }
    Ok(0)
}

pub fn report(args: ReportArgs) -> Result<i32, CliError> {
    if !args.checkpoint_dir.is_dir() {
        return Err(CliError::Command(format!(
            "checkpoint directory not found: {}",
            args.checkpoint_dir.display()
        )));
    }
    let store: Arc<dyn CheckpointStore> = Arc::new(JsonlCheckpointStore::new(args.checkpoint_dir));
    let records = store.load(METADATA_FIELDS)?;
    let stats = aggregate(&records);
    match args.format {
        ReportFormat::Text => println!("{}", format_table(&stats)),
        ReportFormat::Json => {
            let value = to_json(&stats).map_err(anyhow::Error::from)?;
            println!("{}", serde_json::to_string_pretty(&value).map_err(anyhow::Error::from)?);
        }
    }
    Ok(0)
}

pub fn families() -> Result<i32, CliError> {
    let catalog = factory::build_catalog()?;
    for family in catalog.families() {
        let registry = catalog.get_registry(family)?;
        println!("{family} ({} templates)", registry.len());
        for name in registry.names() {
            println!("  {name}");
        }
    }
    Ok(0)
}
