//! mousetrap-replay: plays scripted host sessions through the trap controller.
//!
//! ## Subcommands
//!
//! - `run`: replay a JSON script and print the host commands it produced
//! - `config`: print the effective configuration

mod logging;
mod script;

use clap::{Parser, Subcommand};
use mousetrap_core::{default_config_path, load_config, TrapConfig};
use script::{ReplayError, ReplayReport, Script};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "mousetrap-replay")]
#[command(about = "Replay scripted cursor-trap sessions")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replay a script and print every host command issued
    Run {
        /// Path to the JSON script
        #[arg(value_name = "SCRIPT")]
        script: PathBuf,

        /// Configuration file (defaults to the user config location)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Simulate a host that reports removed modal handlers
        #[arg(long)]
        teardown_signal: bool,

        /// Also write logs to a daily-rotated file in this directory
        #[arg(long, value_name = "DIR")]
        log_dir: Option<PathBuf>,
    },

    /// Print the effective configuration as TOML
    Config {
        /// Configuration file (defaults to the user config location)
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            script,
            config,
            teardown_signal,
            log_dir,
        } => {
            let _logging_guard = logging::init(log_dir.as_deref());
            match replay(&script, config, teardown_signal) {
                Ok(report) => print_report(&report),
                Err(err) => {
                    tracing::error!(error = %err, script = %script.display(), "mousetrap-replay run failed");
                    std::process::exit(1);
                }
            }
        }
        Commands::Config { config } => {
            let _logging_guard = logging::init(None);
            if let Err(err) = print_config(config) {
                tracing::error!(error = %err, "mousetrap-replay config failed");
                std::process::exit(1);
            }
        }
    }
}

fn replay(
    path: &std::path::Path,
    config_path: Option<PathBuf>,
    teardown_signal: bool,
) -> Result<ReplayReport, ReplayError> {
    let config = load_config(config_path.as_deref())?;
    let script = Script::load(path)?;
    tracing::info!(
        script = %path.display(),
        steps = script.steps.len(),
        teardown_signal,
        "Replaying"
    );
    script::run(script, config, teardown_signal)
}

fn print_report(report: &ReplayReport) {
    for step in &report.steps {
        for command in &step.commands {
            match serde_json::to_string(command) {
                Ok(line) => println!("[{}] {}", step.index, line),
                Err(err) => tracing::warn!(error = %err, "Failed to encode command"),
            }
        }
    }
    println!(
        "activated={} trapping={} state={} peak_subscriptions={}",
        report.flags.activated,
        report.flags.trapping,
        report.state.as_str(),
        report.peak_subscriptions
    );
}

fn print_config(config_path: Option<PathBuf>) -> Result<(), String> {
    let source = config_path.clone().or_else(default_config_path);
    let config: TrapConfig = load_config(config_path.as_deref())?;
    let rendered = toml::to_string_pretty(&config)
        .map_err(|err| format!("Failed to render config: {}", err))?;

    match source {
        Some(path) if path.exists() => println!("# {}", path.display()),
        _ => println!("# defaults"),
    }
    print!("{}", rendered);
    Ok(())
}
