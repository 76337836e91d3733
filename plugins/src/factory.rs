use std::sync::Arc;

use anyhow::Result;

use suitekit_core::api::{
    CheckpointConfig, CheckpointStore, FamilyCatalog, NullCheckpointStore, OutputConfig,
    OutputFormat, SuiteObserver,
};

use crate::checkpoint::JsonlCheckpointStore;
use crate::executor::{JsonlObserver, TextObserver};
use crate::sim::{apps_registry, system_registry, OracleAgent};

/// Settings toggles only.
pub const SIM_SYSTEM_FAMILY: &str = "sim_system";
/// App-level tasks (clock, launcher).
pub const SIM_APPS_FAMILY: &str = "sim_apps";
/// Entire simulated suite.
pub const SIM_FAMILY: &str = "sim";

pub fn build_checkpoint(cfg: &CheckpointConfig) -> Arc<dyn CheckpointStore> {
    match cfg {
        CheckpointConfig::Null => Arc::new(NullCheckpointStore),
        CheckpointConfig::Jsonl(jsonl) => Arc::new(JsonlCheckpointStore::new(jsonl.directory.clone())),
    }
}

pub fn build_observer(output: &OutputConfig) -> Arc<dyn SuiteObserver> {
    match output.format {
        OutputFormat::Jsonl => Arc::new(JsonlObserver::new(false)),
        OutputFormat::Text => {
            Arc::new(TextObserver::new(false).with_live_summary(output.live_summary))
        }
    }
}

pub fn build_catalog() -> Result<FamilyCatalog> {
    let mut catalog = FamilyCatalog::new();
    catalog
        .add_family(SIM_SYSTEM_FAMILY, system_registry()?)
        .add_family(SIM_APPS_FAMILY, apps_registry()?)
        .add_union(SIM_FAMILY, [SIM_SYSTEM_FAMILY, SIM_APPS_FAMILY]);
    Ok(catalog)
}

pub fn build_agent(miss_rate: f64, seed: Option<u64>) -> OracleAgent {
    OracleAgent::new(miss_rate, seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use suitekit_core::api::JsonlCheckpointConfig;

    #[test]
    fn sim_family_is_the_union_of_its_parts() {
        let catalog = build_catalog().unwrap();
        let full = catalog.get_registry(SIM_FAMILY).unwrap();
        let system = catalog.get_registry(SIM_SYSTEM_FAMILY).unwrap();
        let apps = catalog.get_registry(SIM_APPS_FAMILY).unwrap();
        assert_eq!(full.len(), system.len() + apps.len());
        assert!(full.contains("ClockTimerEntry"));
        assert!(full.contains("SystemWifiTurnOn"));
    }

    #[test]
    fn checkpoint_provider_follows_config() {
        assert_eq!(build_checkpoint(&CheckpointConfig::Null).name(), "null");
        let cfg = CheckpointConfig::Jsonl(JsonlCheckpointConfig {
            directory: "runs/ckpt".into(),
        });
        assert_eq!(build_checkpoint(&cfg).name(), "jsonl");
    }

    #[test]
    fn observer_follows_output_format() {
        let mut output = OutputConfig {
            format: OutputFormat::Jsonl,
            ..OutputConfig::default()
        };
        assert_eq!(build_observer(&output).format(), "jsonl");
        output.format = OutputFormat::Text;
        output.live_summary = true;
        assert_eq!(build_observer(&output).format(), "text");
    }
}
