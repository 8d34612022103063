// SPDX-FileCopyrightText: 2026 Bodega Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Bodega - a WhatsApp storefront bot.
//!
//! This is the binary entry point.

mod doctor;
mod serve;

use clap::{Parser, Subcommand};

/// Bodega - a WhatsApp storefront bot.
#[derive(Parser, Debug)]
#[command(name = "bodega", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the storefront bot and dashboard gateway.
    Serve,
    /// Check configuration, storage, and seeded settings.
    Doctor,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match bodega_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            bodega_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    init_tracing(&config.store.log_level);

    let result = match cli.command {
        Some(Commands::Doctor) => doctor::run(&config).await,
        Some(Commands::Serve) | None => serve::run(config).await,
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal");
        std::process::exit(1);
    }
}

fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
