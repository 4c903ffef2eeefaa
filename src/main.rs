use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use snafu::prelude::*;
use tracing::{debug, error, info};

use treefs::conformance::run_battery;
use treefs::{DiskFs, MemFs};

#[derive(Parser, Debug, Clone)]
#[command(version)]
struct Cli {
    /// The backend to exercise
    #[clap(value_enum)]
    backend: Backend,

    /// Root directory for the disk backend
    #[clap(long, short)]
    root: Option<PathBuf>,

    #[clap(long, short, default_value = "warn", value_enum)]
    log_level: LogLevel,
}

#[derive(Debug, Clone, ValueEnum)]
enum Backend {
    Memory,
    Disk,
}

#[derive(Debug, Clone, ValueEnum, Default)]
enum LogLevel {
    Debug,
    Info,
    #[default]
    Warn,
    Error,
    Silent,
}

impl LogLevel {
    fn to_tracing_level(&self) -> Option<tracing::Level> {
        match self {
            LogLevel::Debug => Some(tracing::Level::DEBUG),
            LogLevel::Info => Some(tracing::Level::INFO),
            LogLevel::Warn => Some(tracing::Level::WARN),
            LogLevel::Error => Some(tracing::Level::ERROR),
            LogLevel::Silent => None,
        }
    }
}

#[snafu::report]
fn main() -> Result<(), ApplicationError> {
    let cli_args = Cli::parse();
    setup_tracing(&cli_args);
    debug!("Parsed CLI arguments: {cli_args:?}");

    let failures = match cli_args.backend {
        Backend::Memory => run_battery(&MemFs::new()),
        Backend::Disk => {
            let root = cli_args.root.context(MissingRootSnafu)?;
            run_battery(&DiskFs::new(root))
        }
    };

    if failures.is_empty() {
        info!("All conformance scenarios passed");
        return Ok(());
    }
    for failure in &failures {
        error!("Scenario '{}' failed: {}", failure.scenario, failure.message);
    }
    BatteryFailedSnafu {
        failed: failures.len(),
    }
    .fail()
}

fn setup_tracing(cli_args: &Cli) {
    if let Some(level) = cli_args.log_level.to_tracing_level() {
        tracing_subscriber::fmt()
            .with_max_level(level)
            .without_time()
            .compact()
            .init();
    }
}

#[derive(Debug, Snafu)]
enum ApplicationError {
    #[snafu(display("The disk backend requires --root"))]
    MissingRoot,
    #[snafu(display("{} conformance scenario(s) failed", failed))]
    BatteryFailed { failed: usize },
}
