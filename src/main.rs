#![deny(unsafe_code)]

mod activation;
mod common;
mod config;
mod constants;
mod error;
mod gui;
mod input;
mod logger;
#[cfg(target_os = "linux")]
mod x11;

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use tracing::Level as TraceLevel;
use tracing::warn;
use tracing_subscriber::FmtSubscriber;

use crate::config::Config;
use crate::error::{AppError, Disposition, report};
use crate::logger::Logger;

#[derive(Parser)]
#[command(name = "urge")]
#[command(version)]
#[command(
    about = "Tray utility that logs labelled one-line notes",
    long_about = "Press Ctrl+Space (or use the tray menu), pick a label, type a note and press Enter. \
                  Notes are appended to date-stamped files in the configured logs directory. \
                  Settings are read from config.json in the working directory."
)]
struct Cli {}

fn main() -> ExitCode {
    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_max_level(TraceLevel::INFO)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {e}");
    }

    let _cli = Cli::parse();

    run()
}

fn run() -> ExitCode {
    let config = match Config::load_default_location() {
        Ok(config) => config,
        Err(err) => return handle(err, None),
    };

    let paths = config.paths();
    let logger = match Logger::open(&paths.logs) {
        Ok(logger) => Arc::new(logger),
        Err(err) => return handle(err, None),
    };

    logger.info("Application starting");
    if let Err(e) = std::fs::create_dir_all(&paths.assets) {
        warn!(path = %paths.assets.display(), error = %e, "Failed to create assets directory");
    }
    common::debug::log_session_info();

    match gui::run_gui(&config, logger.clone()) {
        Ok(()) => {
            logger.info("Application exiting with code 0");
            ExitCode::SUCCESS
        }
        Err(err) => handle(err, Some(logger.as_ref())),
    }
}

/// Single top-level error handler: log, then exit non-zero on fatal errors
fn handle(err: AppError, logger: Option<&Logger>) -> ExitCode {
    match report(&err, logger) {
        Disposition::Exit => ExitCode::FAILURE,
        Disposition::Continue => ExitCode::SUCCESS,
    }
}
