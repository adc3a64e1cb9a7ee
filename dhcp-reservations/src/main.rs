use std::io::IsTerminal;

use anyhow::{Context, Result};
use clap::Parser;
use dhcp_reservations::settings::{resolve, Overrides};
use tracing_subscriber::EnvFilter;

mod cli;
mod edit_cmd;
mod export_cmd;
mod path_guard;

use cli::{Cli, Command};

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug);

    let validator = match &cli.command {
        Command::Add(args) => args.safety.validator.clone(),
        Command::Remove(args) => args.safety.validator.clone(),
        Command::Export(_) => None,
    };
    let overrides = Overrides {
        config_path: cli.config_file,
        domain: cli.domain,
        validator,
    };
    let settings = resolve(cli.settings.as_deref(), overrides).context("failed to load settings")?;
    tracing::debug!(
        config = %settings.config_path.display(),
        domain = %settings.domain,
        "Settings resolved"
    );

    match cli.command {
        Command::Add(args) => edit_cmd::run_add(&settings, args),
        Command::Remove(args) => edit_cmd::run_remove(&settings, args),
        Command::Export(args) => export_cmd::run_export(&settings, args),
    }
}

/// Log to stderr; `RUST_LOG` wins over `--debug`.
fn init_tracing(debug: bool) {
    let default_level = if debug { "debug" } else { "warn" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_ansi(std::io::stderr().is_terminal())
        .with_target(false)
        .init();
}
