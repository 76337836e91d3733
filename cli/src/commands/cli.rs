use std::path::PathBuf;

use clap::{Args as ClapArgs, Parser, Subcommand};

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    Text,
    Jsonl,
}

#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportFormat {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "suitekit", version, about = "Checkpointed task-suite harness")]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

/// Suite selection shared by `run` and `plan`.
#[derive(ClapArgs, Debug, Clone, Default)]
pub struct SuiteArgs {
    /// Task family to draw templates from.
    #[arg(long)]
    pub family: Option<String>,

    /// Only these templates (comma separated).
    #[arg(long, value_delimiter = ',')]
    pub tasks: Vec<String>,

    /// Instances per template.
    #[arg(long = "combinations")]
    pub n_task_combinations: Option<usize>,

    #[arg(long)]
    pub seed: Option<u64>,

    /// Every instance of a template gets the same parameters.
    #[arg(long)]
    pub identical_params: bool,
}

#[derive(ClapArgs, Debug, Clone, Default)]
pub struct RunArgs {
    #[command(flatten)]
    pub suite: SuiteArgs,

    /// JSONL checkpoint directory; enables resume.
    #[arg(long)]
    pub checkpoint_dir: Option<PathBuf>,

    /// Root for per-episode working directories.
    #[arg(long)]
    pub save_root: Option<PathBuf>,

    #[arg(long)]
    pub save_name: Option<String>,

    #[arg(long, value_enum)]
    pub format: Option<OutputKind>,

    /// Fraction of episodes the oracle agent fumbles, in [0, 1].
    #[arg(long)]
    pub miss_rate: Option<f64>,

    #[arg(long)]
    pub no_progress: bool,

    /// Reprint the summary table after every instance (text output).
    #[arg(long)]
    pub live_summary: bool,
}

#[derive(ClapArgs, Debug, Clone)]
pub struct ReportArgs {
    #[arg(long)]
    pub checkpoint_dir: PathBuf,

    #[arg(long, value_enum, default_value_t = ReportFormat::Text)]
    pub format: ReportFormat,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run (or resume) a suite with the oracle agent on the simulated device.
    Run(RunArgs),
    /// Build the suite and print its instances without running anything.
    Plan(SuiteArgs),
    /// Aggregate an existing checkpoint directory.
    Report(ReportArgs),
    /// List task families and their templates.
    Families,
}
