use crate::cli::ConfigAction;
use crate::config::Config;
use anyhow::Result;
use std::path::{Path, PathBuf};

/// Persist to the explicit path when one was given, otherwise to the
/// default location.
fn persist(config: &Config, config_path: Option<&str>) -> Result<PathBuf> {
    match config_path {
        Some(path) => {
            let path = Path::new(path);
            config.save_path(path)?;
            Ok(path.to_path_buf())
        }
        None => {
            config.save()?;
            Config::default_path()
        }
    }
}

pub fn handle_config_action(action: ConfigAction, config_path: Option<&str>, json_output: bool) {
    match action {
        ConfigAction::Init => match persist(&Config::default(), config_path) {
            Ok(path) => {
                if json_output {
                    println!(
                        r#"{{"status": "success", "message": "Configuration initialized successfully"}}"#
                    );
                } else {
                    println!("Configuration initialized at: {}", path.display());
                }
            }
            Err(e) => {
                if json_output {
                    println!(
                        r#"{{"status": "error", "message": "Failed to initialize config: {}"}}"#,
                        e
                    );
                } else {
                    eprintln!("Error: Failed to initialize config: {}", e);
                }
                std::process::exit(1);
            }
        },
        ConfigAction::Show => match Config::load_from(config_path) {
            Ok(config) => {
                if json_output {
                    match serde_json::to_string_pretty(&config) {
                        Ok(json) => println!("{}", json),
                        Err(e) => {
                            eprintln!("Error: Failed to serialize config to JSON: {}", e);
                            std::process::exit(1);
                        }
                    }
                } else {
                    match toml::to_string_pretty(&config) {
                        Ok(toml_str) => {
                            if let Ok(path) = Config::default_path() {
                                println!("Configuration ({})", path.display());
                            } else {
                                println!("Configuration:");
                            }
                            println!("{}", toml_str);
                        }
                        Err(e) => {
                            eprintln!("Error: Failed to serialize config: {}", e);
                            std::process::exit(1);
                        }
                    }
                }
            }
            Err(e) => {
                if json_output {
                    println!(
                        r#"{{"status": "error", "message": "Failed to load config: {}"}}"#,
                        e
                    );
                } else {
                    eprintln!("Error: Failed to load config: {}", e);
                }
                std::process::exit(1);
            }
        },
        ConfigAction::Set { key, value } => match Config::load_from(config_path) {
            Ok(mut config) => match config.set_value(&key, &value) {
                Ok(()) => match persist(&config, config_path) {
                    Ok(_) => {
                        if json_output {
                            println!(
                                r#"{{"status": "success", "message": "Configuration updated: {} = {}"}}"#,
                                key, value
                            );
                        } else {
                            println!("Configuration updated: {} = {}", key, value);
                        }
                    }
                    Err(e) => {
                        if json_output {
                            println!(
                                r#"{{"status": "error", "message": "Failed to save config: {}"}}"#,
                                e
                            );
                        } else {
                            eprintln!("Error: Failed to save config: {}", e);
                        }
                        std::process::exit(1);
                    }
                },
                Err(e) => {
                    if json_output {
                        println!(
                            r#"{{"status": "error", "message": "Failed to set value: {}"}}"#,
                            e
                        );
                    } else {
                        eprintln!("Error: Failed to set value: {}", e);
                    }
                    std::process::exit(1);
                }
            },
            Err(e) => {
                if json_output {
                    println!(
                        r#"{{"status": "error", "message": "Failed to load config: {}"}}"#,
                        e
                    );
                } else {
                    eprintln!("Error: Failed to load config: {}", e);
                }
                std::process::exit(1);
            }
        },
    }
}
