use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::suite::SuiteOptions;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub suite: SuiteConfig,

    #[serde(default)]
    pub checkpoint: CheckpointConfig,

    #[serde(default)]
    pub runner: RunnerConfig,

    #[serde(default)]
    pub output: OutputConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_logging_enabled")]
    pub enabled: bool,

    /// If true, log to stderr.
    #[serde(default = "default_logging_console")]
    pub console: bool,

    /// If true, also log to a daily file under `directory`.
    #[serde(default)]
    pub file: bool,

    /// EnvFilter string, e.g. "info" or "suitekit_core=debug".
    #[serde(default = "default_logging_level")]
    pub level: String,

    /// Directory for log files. Defaults to `~/.suitekit/logs` when file
    /// logging is on.
    #[serde(default)]
    pub directory: Option<String>,
}

fn default_logging_enabled() -> bool {
    true
}

fn default_logging_console() -> bool {
    true
}

fn default_logging_level() -> String {
    "info".to_string()
}

impl LoggingConfig {
    /// Configured directory, else `~/.suitekit/logs`.
    pub fn log_dir(&self) -> anyhow::Result<PathBuf> {
        match self.directory.as_deref().map(str::trim) {
            Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
            _ => Ok(super::get_suitekit_data_dir()?.join("logs")),
        }
    }

    /// One file per process so concurrent runs never interleave.
    pub fn log_file_name(&self) -> String {
        format!("suitekit.{}.log", std::process::id())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: default_logging_enabled(),
            console: default_logging_console(),
            file: false,
            level: default_logging_level(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuiteConfig {
    #[serde(default = "default_family")]
    pub family: String,

    #[serde(default = "default_n_task_combinations")]
    pub n_task_combinations: usize,

    #[serde(default)]
    pub seed: Option<u64>,

    /// Empty runs every template of the family.
    #[serde(default)]
    pub tasks: Vec<String>,

    #[serde(default)]
    pub use_identical_params: bool,
}

fn default_family() -> String {
    "sim".to_string()
}

fn default_n_task_combinations() -> usize {
    1
}

impl Default for SuiteConfig {
    fn default() -> Self {
        Self {
            family: default_family(),
            n_task_combinations: default_n_task_combinations(),
            seed: None,
            tasks: Vec::new(),
            use_identical_params: false,
        }
    }
}

impl SuiteConfig {
    pub fn to_options(&self) -> SuiteOptions {
        SuiteOptions {
            n_task_combinations: self.n_task_combinations,
            seed: self.seed,
            tasks: self.tasks.clone(),
            use_identical_params: self.use_identical_params,
            family: Some(self.family.clone()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "provider", rename_all = "lowercase")]
pub enum CheckpointConfig {
    #[default]
    Null,
    Jsonl(JsonlCheckpointConfig),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JsonlCheckpointConfig {
    pub directory: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Root for per-episode working directories. None disables them.
    #[serde(default)]
    pub save_root: Option<PathBuf>,

    #[serde(default = "default_save_name")]
    pub save_name: String,

    /// Fraction of episodes the built-in oracle agent deliberately fumbles.
    #[serde(default)]
    pub oracle_miss_rate: f64,
}

fn default_save_name() -> String {
    "0".to_string()
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            save_root: None,
            save_name: default_save_name(),
            oracle_miss_rate: 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Jsonl,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "jsonl" => Ok(Self::Jsonl),
            other => Err(format!("unsupported output format: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    #[serde(default = "default_progress_bar")]
    pub progress_bar: bool,

    /// Text output reprints the per-template table after every instance.
    #[serde(default)]
    pub live_summary: bool,
}

fn default_progress_bar() -> bool {
    true
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            progress_bar: default_progress_bar(),
            live_summary: false,
        }
    }
}
