use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "incmon")]
#[command(about = "Incubator Environment Monitor")]
#[command(version)]
pub struct Cli {
    /// Custom config file path
    #[arg(long, global = true)]
    pub config: Option<String>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// JSON output format
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration
    Show,
    /// Initialize fresh configuration
    Init,
    /// Set configuration value
    Set {
        /// Configuration key (e.g., monitoring.warning_count)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[derive(Subcommand)]
pub enum Commands {
    /// Monitor readings from stdin or a file (one JSON object per line)
    Run {
        /// Read from a file instead of stdin
        #[arg(long)]
        input: Option<String>,
    },

    /// Evaluate a single reading against a set-point
    Check {
        /// Feature kind (temperature or humidity)
        kind: String,

        /// Reading value
        value: f64,

        /// Set-point to compare against
        #[arg(long)]
        setpoint: f64,

        /// Warning threshold spec ("3", "10%", "3:5")
        #[arg(long)]
        warn: Option<String>,

        /// Alert threshold spec ("5", "20%", "4:6")
        #[arg(long)]
        alert: Option<String>,
    },

    /// Send a test desktop notification
    #[command(name = "test-notify")]
    TestNotify,

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}
