// SPDX-FileCopyrightText: 2026 Railwatch Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Railwatch - API gateway for the rail-monitoring dashboard.
//!
//! This is the binary entry point for the gateway.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;
mod shutdown;

use clap::{Parser, Subcommand};
use railwatch_config::RailwatchConfig;

/// Railwatch - API gateway for the rail-monitoring dashboard.
#[derive(Parser, Debug)]
#[command(name = "railwatch", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Commands {
    /// Start the gateway (default).
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match railwatch_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            railwatch_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("railwatch: {e}");
                std::process::exit(1);
            }
        }
        Commands::Config => match render_config(&config) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("railwatch: failed to render configuration: {e}");
                std::process::exit(1);
            }
        },
    }
}

/// Effective configuration as TOML, API key redacted.
fn render_config(config: &RailwatchConfig) -> Result<String, toml::ser::Error> {
    toml::to_string_pretty(&config.redacted())
}
