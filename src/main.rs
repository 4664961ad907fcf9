// incmon: Incubator Environment Monitor

use clap::Parser;
use config::Config;

// Module declarations
mod alerts;
mod cli;
mod commands;
mod config;
mod sensors;

// Import CLI types and commands
use cli::args::{Cli, Commands};
use commands::check::handle_check_command;
use commands::config::handle_config_action;
use commands::notify::handle_test_notify_command;
use commands::run::handle_run_command;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { input } => {
            let config = load_config(cli.config.as_deref());
            handle_run_command(&config, input.as_deref(), cli.verbose)?;
        }
        Commands::Check {
            kind,
            value,
            setpoint,
            warn,
            alert,
        } => {
            handle_check_command(
                &kind,
                value,
                setpoint,
                warn.as_deref(),
                alert.as_deref(),
                cli.json,
            )?;
        }
        Commands::TestNotify => {
            let config = load_config(cli.config.as_deref());
            handle_test_notify_command(&config)?;
        }
        Commands::Config { action } => {
            handle_config_action(action, cli.config.as_deref(), cli.json);
        }
    }
    Ok(())
}

fn load_config(path: Option<&str>) -> Config {
    match Config::load_from(path) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load configuration: {e}");
            std::process::exit(1);
        }
    }
}
