//! kiln - development build orchestrator.
//!
//! Mirrors a source tree into compiled output, bundles clients, compiles
//! stylesheets and keeps a dev server running, rebuilding only what each
//! change touches.

mod cache;
mod classify;
mod cli;
mod config;
mod core;
mod dispatch;
mod logger;
mod server;
mod toolchain;
mod utils;
mod watch;

use std::process::ExitCode;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::ProjectConfig;
use owo_colors::OwoColorize;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }
    logger::set_verbose(cli.verbose);

    let config = ProjectConfig::load(&cli.config)?;
    crate::debug!("config"; "loaded {}", config.config_path.display());

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        let dispatcher = cli::common::dispatcher(config);
        match cli.command {
            Commands::Watch => cli::watch::watch(&dispatcher).await,
            Commands::Build => cli::build::build(&dispatcher).await,
            Commands::Start => cli::watch::start(&dispatcher).await,
            Commands::Minify => cli::build::minify(&dispatcher).await,
            Commands::Clean => cli::build::clean(&dispatcher).await,
        }
    })
}
