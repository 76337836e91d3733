use clap::Parser;
use suitekit_cli::app;
use suitekit_cli::commands::cli;
use suitekit_core::api::{CliError, LoggingConfig};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

static LOG_GUARD: std::sync::OnceLock<tracing_appender::non_blocking::WorkerGuard> =
    std::sync::OnceLock::new();

#[tokio::main]
async fn main() {
    let exit = match real_main().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{e}");
            e.exit_code()
        }
    };

    std::process::exit(exit);
}

async fn real_main() -> Result<i32, CliError> {
    let args = cli::Args::parse();
    let cfg = suitekit_core::config::load_default().map_err(|e| CliError::Config(e.to_string()))?;
    init_tracing(&cfg.logging).map_err(CliError::Command)?;

    match args.command {
        cli::Commands::Run(run_args) => app::run(cfg, run_args).await,
        cli::Commands::Plan(suite_args) => app::plan(cfg, suite_args),
        cli::Commands::Report(report_args) => app::report(report_args),
        cli::Commands::Families => app::families(),
    }
}

fn init_tracing(logging: &LoggingConfig) -> Result<(), String> {
    if !logging.enabled {
        return Ok(());
    }
    if !logging.console && !logging.file {
        return Err("logging enabled but neither console nor file output is on".to_string());
    }

    let file_layer = if logging.file {
        Some(
            tracing_subscriber::fmt::layer()
                .with_writer(log_file_writer(logging)?)
                .with_ansi(false),
        )
    } else {
        None
    };
    let console_layer = logging.console.then(|| {
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_ansi(atty::is(atty::Stream::Stderr))
    });

    tracing_subscriber::registry()
        .with(env_filter(&logging.level)?)
        .with(console_layer)
        .with(file_layer)
        .init();
    Ok(())
}

/// `RUST_LOG` wins over the configured level.
fn env_filter(level: &str) -> Result<EnvFilter, String> {
    match std::env::var("RUST_LOG") {
        Ok(v) if !v.trim().is_empty() => Ok(EnvFilter::from_default_env()),
        _ => EnvFilter::try_new(level).map_err(|e| format!("bad log level {level:?}: {e}")),
    }
}

fn log_file_writer(
    logging: &LoggingConfig,
) -> Result<tracing_appender::non_blocking::NonBlocking, String> {
    let dir = logging.log_dir().map_err(|e| e.to_string())?;
    std::fs::create_dir_all(&dir)
        .map_err(|e| format!("create log dir {} failed: {e}", dir.display()))?;
    let appender = tracing_appender::rolling::never(&dir, logging.log_file_name());
    let (writer, guard) = tracing_appender::non_blocking(appender);
    let _ = LOG_GUARD.set(guard);
    Ok(writer)
}
