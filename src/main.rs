//! msconfig: inspect and validate master/slave client configuration files.
//!
//! ```text
//! msconfig check cluster.toml    # parse + validate, non-zero exit on error
//! msconfig show cluster.toml     # effective configuration as JSON
//! msconfig show                  # built-in defaults
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use masterslave_config::config::{load_config, MasterSlaveServersConfig};
use masterslave_config::observability::init_logging;

#[derive(Parser)]
#[command(name = "msconfig")]
#[command(about = "Validate and inspect master/slave client configuration", long_about = None)]
struct Cli {
    /// Log level when RUST_LOG is not set.
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse and validate a configuration file
    Check {
        path: PathBuf,
    },
    /// Print the effective configuration as JSON
    Show {
        path: Option<PathBuf>,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(command: Commands) -> Result<(), Box<dyn std::error::Error>> {
    match command {
        Commands::Check { path } => {
            let config = load_config(&path)?;
            println!(
                "{}: ok (master {}, {} slave(s), read mode {})",
                path.display(),
                config.master_address.as_deref().unwrap_or("-"),
                config.slave_addresses.len(),
                config.master_slave.read_mode(),
            );
        }
        Commands::Show { path } => {
            let config = match path {
                Some(path) => load_config(&path)?,
                None => MasterSlaveServersConfig::default(),
            };
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
    }
    Ok(())
}
