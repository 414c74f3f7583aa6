//! Fleet Manifest - per-shift vehicle records with a configurable schema
//!
//! A CLI tool for editing a fleet's daily shift manifest, its columns,
//! roster and status taxonomy, and for browsing archived days.

mod cli;
mod commands;
mod output;

use clap::Parser;
use cli::Cli;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr so JSON on stdout stays clean. RUST_LOG wins over the
/// configured level.
pub(crate) fn init_tracing(level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

fn main() {
    let cli = Cli::parse();

    if let Err(e) = commands::execute(cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
