use std::path::{Path, PathBuf};

use super::types::{AppConfig, CheckpointConfig, JsonlCheckpointConfig};

/// Default suitekit data directory: ~/.suitekit
pub fn get_suitekit_data_dir() -> anyhow::Result<PathBuf> {
    dirs::home_dir()
        .map(|home| home.join(".suitekit"))
        .ok_or_else(|| anyhow::anyhow!("Cannot determine home directory"))
}

pub fn load_from_path(path: &Path) -> anyhow::Result<AppConfig> {
    let s = std::fs::read_to_string(path)?;
    Ok(toml::from_str::<AppConfig>(&s)?)
}

pub fn load_default() -> anyhow::Result<AppConfig> {
    // Priority 1: ~/.suitekit/config.toml
    let data_dir = get_suitekit_data_dir()?;
    let user_config = data_dir.join("config.toml");

    // Priority 2: ./config.toml
    let local_config = Path::new("config.toml");

    let mut cfg = if user_config.exists() {
        load_from_path(&user_config)?
    } else if local_config.exists() {
        load_from_path(local_config)?
    } else {
        AppConfig::default()
    };

    if cfg.logging.file {
        let logs_dir = cfg.logging.log_dir()?;
        std::fs::create_dir_all(&logs_dir)?;
        cfg.logging.directory = Some(logs_dir.to_string_lossy().to_string());
    }

    apply_env_overrides(&mut cfg, |key| std::env::var(key).ok())?;
    Ok(cfg)
}

/// Environment overrides (highest priority). `lookup` is injected so the
/// rules can be tested without touching process state.
pub fn apply_env_overrides<F>(cfg: &mut AppConfig, lookup: F) -> anyhow::Result<()>
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(v) = get("SUITEKIT_SEED") {
        let seed = v
            .trim()
            .parse::<u64>()
            .map_err(|e| anyhow::anyhow!("invalid SUITEKIT_SEED {v:?}: {e}"))?;
        cfg.suite.seed = Some(seed);
    }
    if let Some(v) = get("SUITEKIT_CHECKPOINT_DIR") {
        cfg.checkpoint = CheckpointConfig::Jsonl(JsonlCheckpointConfig {
            directory: PathBuf::from(v),
        });
    }
    if let Some(v) = get("SUITEKIT_FAMILY") {
        cfg.suite.family = v.trim().to_string();
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{LoggingConfig, OutputFormat};
    use std::collections::HashMap;

    #[test]
    fn parses_sections_and_fills_defaults() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [suite]
            seed = 42
            tasks = ["Foo"]

            [checkpoint]
            provider = "jsonl"
            directory = "/tmp/ckpt"

            [output]
            format = "jsonl"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.suite.seed, Some(42));
        assert_eq!(cfg.suite.n_task_combinations, 1);
        assert_eq!(cfg.suite.family, "sim");
        assert_eq!(
            cfg.checkpoint,
            CheckpointConfig::Jsonl(JsonlCheckpointConfig {
                directory: PathBuf::from("/tmp/ckpt")
            })
        );
        assert_eq!(cfg.output.format, OutputFormat::Jsonl);
        assert!(cfg.output.progress_bar);
        assert_eq!(cfg.runner.save_name, "0");
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg: AppConfig = toml::from_str("").unwrap();
        assert_eq!(cfg.checkpoint, CheckpointConfig::Null);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn env_overrides_win() {
        let env: HashMap<&str, &str> = [
            ("SUITEKIT_SEED", "7"),
            ("SUITEKIT_CHECKPOINT_DIR", "/data/run1"),
            ("SUITEKIT_FAMILY", " sim_full "),
        ]
        .into_iter()
        .collect();

        let mut cfg = AppConfig::default();
        apply_env_overrides(&mut cfg, |k| env.get(k).map(|v| v.to_string())).unwrap();

        assert_eq!(cfg.suite.seed, Some(7));
        assert_eq!(cfg.suite.family, "sim_full");
        assert!(matches!(cfg.checkpoint, CheckpointConfig::Jsonl(ref j) if j.directory == Path::new("/data/run1")));
    }

    #[test]
    fn bad_seed_override_is_an_error() {
        let mut cfg = AppConfig::default();
        let err = apply_env_overrides(&mut cfg, |k| {
            (k == "SUITEKIT_SEED").then(|| "abc".to_string())
        });
        assert!(err.is_err());
    }

    #[test]
    fn log_dir_prefers_configured_directory() {
        let logging = LoggingConfig {
            directory: Some("  /var/log/suitekit ".into()),
            ..LoggingConfig::default()
        };
        assert_eq!(logging.log_dir().unwrap(), PathBuf::from("/var/log/suitekit"));
    }

    #[test]
    fn blank_log_dir_falls_back_to_data_dir() {
        let logging = LoggingConfig {
            directory: Some("   ".into()),
            ..LoggingConfig::default()
        };
        let Ok(data_dir) = get_suitekit_data_dir() else {
            return;
        };
        assert_eq!(logging.log_dir().unwrap(), data_dir.join("logs"));
        assert_ne!(logging.log_dir().unwrap(), std::env::temp_dir().join("suitekit"));
    }
}
