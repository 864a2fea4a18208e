//! CLI argument definitions using clap.

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// OSMP Sensor - co-simulation harness for the dummy object-list sensor
#[derive(Parser, Debug)]
#[command(
    name = "osmp-sensor",
    author,
    version,
    about = "OSMP dummy sensor co-simulation harness",
    long_about = "Drives a ground-truth source instance and a sensor instance of the \n\
                  OSMP dummy sensor model through the same integer-slot / address \n\
                  protocol a co-simulation master uses, and reports the detections."
)]
pub struct Cli {
    /// Increase logging verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true, env = "OSMP_SENSOR_VERBOSE")]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log output format
    #[arg(
        long,
        value_enum,
        default_value = "pretty",
        global = true,
        env = "OSMP_SENSOR_LOG_FORMAT"
    )]
    pub log_format: LogFormat,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run a source -> sensor co-simulation
    Run(RunArgs),

    /// Validate configuration file without running
    Validate(ValidateArgs),

    /// Display the slot layout and effective configuration
    Info(InfoArgs),
}

/// Arguments for the `run` command
#[derive(Parser, Debug, Clone)]
pub struct RunArgs {
    /// Path to configuration file (TOML or JSON); built-in defaults if omitted
    #[arg(short, long, env = "OSMP_SENSOR_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of communication steps
    #[arg(long, default_value = "10", env = "OSMP_SENSOR_STEPS")]
    pub steps: u64,

    /// Communication step size in seconds
    #[arg(long, default_value = "0.1")]
    pub step_size: f64,

    /// Simulation start time in seconds
    #[arg(long, default_value = "0.0")]
    pub start_time: f64,

    /// Print each step's detections as JSON lines
    #[arg(long)]
    pub json: bool,

    /// Metrics server port (0 = disabled)
    #[arg(long, default_value = "0", env = "OSMP_SENSOR_METRICS_PORT")]
    pub metrics_port: u16,
}

/// Arguments for the `validate` command
#[derive(Parser, Debug)]
pub struct ValidateArgs {
    /// Path to configuration file to validate
    #[arg(short, long, default_value = "osmp_sensor.toml")]
    pub config: PathBuf,

    /// Output validation result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `info` command
#[derive(Parser, Debug)]
pub struct InfoArgs {
    /// Path to configuration file; built-in defaults if omitted
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

/// Log output format
#[derive(ValueEnum, Clone, Copy, Debug, Default)]
pub enum LogFormat {
    /// JSON structured logging
    Json,
    /// Human-readable pretty format
    #[default]
    Pretty,
    /// Compact single-line format
    Compact,
}

impl From<LogFormat> for contracts::LogFormat {
    fn from(format: LogFormat) -> Self {
        match format {
            LogFormat::Json => contracts::LogFormat::Json,
            LogFormat::Pretty => contracts::LogFormat::Pretty,
            LogFormat::Compact => contracts::LogFormat::Compact,
        }
    }
}
