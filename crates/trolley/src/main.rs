// SPDX-FileCopyrightText: 2026 Trolley Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trolley - a conversational commerce bridge.
//!
//! This is the binary entry point. `serve` runs the chat bridge, `issuer`
//! runs the payment-token issuance service, `config` prints the resolved
//! configuration.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use trolley_config::TrolleyConfig;

mod issuer;
mod serve;

/// Trolley - a conversational commerce bridge.
#[derive(Parser, Debug)]
#[command(name = "trolley", version, about, long_about = None)]
struct Cli {
    /// Path to an explicit config file (skips the XDG hierarchy).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the chat-bridge server.
    Serve,
    /// Start the payment-token issuance server.
    Issuer,
    /// Print the resolved configuration with credentials redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match &cli.config {
        Some(path) => trolley_config::load_and_validate_path(path),
        None => trolley_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => {
            eprintln!(
                "trolley: config loaded (bridge port {}, issuer port {})",
                config.bridge.port, config.issuer.port
            );
            config
        }
        Err(errors) => {
            trolley_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Issuer) => issuer::run_issuer(config).await,
        Some(Commands::Config) => {
            println!("{}", render_config(&config));
            Ok(())
        }
        None => {
            println!("trolley: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("trolley: {e}");
        std::process::exit(1);
    }
}

/// Installs the tracing subscriber. `RUST_LOG` wins over the configured
/// level when set.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("trolley={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}

/// Serializes the resolved config back to TOML with credential fields
/// replaced, so the output is safe to paste into an issue report.
fn render_config(config: &TrolleyConfig) -> String {
    let mut redacted = config.clone();
    redacted.seller.api_key = "[redacted]".to_string();
    if redacted.model.api_key.is_some() {
        redacted.model.api_key = Some("[redacted]".to_string());
    }
    if redacted.payments.api_key.is_some() {
        redacted.payments.api_key = Some("[redacted]".to_string());
    }
    toml::to_string_pretty(&redacted).unwrap_or_else(|e| format!("# failed to render config: {e}"))
}
