//! diskpart-tui CLI
//!
//! Interactive terminal front-end for the diskpart partitioning utility.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use diskpart_tui::executor::{ExecutorConfig, DEFAULT_SCRIPT_PATH, DEFAULT_TOOL};
use diskpart_tui::logging;
use diskpart_tui::tui;

#[derive(Parser)]
#[command(name = "diskpart-tui")]
#[command(about = "Interactive terminal front-end for diskpart")]
#[command(version)]
struct Cli {
    /// Partitioning tool to invoke with `/s <script>`
    #[arg(long, default_value = DEFAULT_TOOL)]
    tool: PathBuf,

    /// Script file written before each run (overwritten every time)
    #[arg(long, default_value = DEFAULT_SCRIPT_PATH)]
    script: PathBuf,

    /// Directory for log files (default: platform data dir)
    #[arg(long)]
    log_dir: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Held until exit so buffered log lines are flushed
    let log_guard = logging::init(cli.log_dir);

    let config = ExecutorConfig {
        tool: cli.tool,
        script_path: cli.script,
    };

    tracing::info!(
        tool = %config.tool.display(),
        script = %config.script_path.display(),
        "starting session"
    );

    match tui::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "terminal session failed");
            eprintln!("Error: {}", e);
            if let Some(guard) = &log_guard {
                eprintln!("Log files: {}", guard.log_dir().display());
            }
            ExitCode::FAILURE
        }
    }
}
