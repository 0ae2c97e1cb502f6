// SPDX-FileCopyrightText: 2026 Escrowd Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Escrowd - a Telegram escrow deal bot.
//!
//! This is the binary entry point for the escrowd bot.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};

/// Escrowd - a Telegram escrow deal bot.
#[derive(Parser, Debug)]
#[command(name = "escrowd", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the escrow bot.
    Serve,
    /// Print the effective configuration.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup
    let config = match escrowd_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            escrowd_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("escrowd serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            // Never print the bot token.
            let mut config = config;
            if config.telegram.bot_token.is_some() {
                config.telegram.bot_token = Some("<redacted>".to_string());
            }
            match toml::to_string_pretty(&config) {
                Ok(rendered) => println!("{rendered}"),
                Err(e) => {
                    eprintln!("escrowd: could not render config: {e}");
                    std::process::exit(1);
                }
            }
        }
        None => {
            println!("escrowd: use --help for available commands");
        }
    }
}
