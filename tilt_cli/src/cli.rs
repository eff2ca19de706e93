//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::OnceLock;

pub static FILE_GUARD: OnceLock<tracing_appender::non_blocking::WorkerGuard> = OnceLock::new();
/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(name = "tiltrig", version, about = "Tilt-balancing rig controller")]
pub struct Cli {
    /// Path to config TOML; built-in defaults are used when the file is missing
    #[arg(long, value_name = "FILE", default_value = "etc/tiltrig.toml")]
    pub config: PathBuf,

    /// Log as JSON lines instead of pretty
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace); overrides RUST_LOG
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Drive the rig: command server, accelerometer reader, control loop
    Run {
        /// Command server port (overrides [server] port)
        #[arg(long, value_name = "PORT")]
        port: Option<u16>,
        /// Use simulated channels and a simulated accelerometer
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
        /// Stop on its own after this many milliseconds
        #[arg(long, value_name = "MS")]
        max_run_ms: Option<u64>,
    },
    /// Validate the config and probe every configured device path
    SelfCheck,
    /// Print the effective configuration
    PrintConfig,
}
