//! Application error taxonomy
//!
//! Components work with `anyhow` internally and convert into [`AppError`] at
//! their public boundary. `main` is the single place that decides whether an
//! error ends the process.

use std::fmt;
use std::path::PathBuf;

use crate::logger::Logger;

#[derive(Debug)]
pub enum AppError {
    /// Config file exists but could not be read or parsed
    ConfigLoad { path: PathBuf, source: anyhow::Error },
    /// Appending to a log file failed
    LogWrite {
        path: PathBuf,
        source: std::io::Error,
    },
    /// Global hotkey could not be registered
    HotkeyRegistration(anyhow::Error),
    /// Window, event loop or log directory could not be set up
    UiInit(anyhow::Error),
}

impl AppError {
    /// Fatal errors end the process; the rest are logged and the app keeps running.
    pub fn is_fatal(&self) -> bool {
        match self {
            AppError::ConfigLoad { .. } | AppError::UiInit(_) => true,
            AppError::LogWrite { .. } | AppError::HotkeyRegistration(_) => false,
        }
    }

    /// Short machine-friendly name used in structured log fields
    pub fn kind(&self) -> &'static str {
        match self {
            AppError::ConfigLoad { .. } => "config_load",
            AppError::LogWrite { .. } => "log_write",
            AppError::HotkeyRegistration(_) => "hotkey_registration",
            AppError::UiInit(_) => "ui_init",
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::ConfigLoad { path, source } => {
                write!(f, "failed to load config {}: {:#}", path.display(), source)
            }
            AppError::LogWrite { path, source } => {
                write!(f, "failed to write log {}: {}", path.display(), source)
            }
            AppError::HotkeyRegistration(source) => {
                write!(f, "failed to register global hotkey: {:#}", source)
            }
            AppError::UiInit(source) => write!(f, "failed to initialize UI: {:#}", source),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::LogWrite { source, .. } => Some(source),
            AppError::ConfigLoad { source, .. }
            | AppError::HotkeyRegistration(source)
            | AppError::UiInit(source) => Some(&**source),
        }
    }
}

/// What the caller should do after [`report`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Continue,
    Exit,
}

/// Log an error to the console and, once it exists, the general log file
pub fn report(err: &AppError, logger: Option<&Logger>) -> Disposition {
    if err.is_fatal() {
        tracing::error!(kind = err.kind(), error = %err, "Fatal error");
        match logger {
            Some(logger) => logger.error(&format!("Critical error: {err}")),
            None => eprintln!("Critical error before logger initialization: {err}"),
        }
        Disposition::Exit
    } else {
        tracing::warn!(kind = err.kind(), error = %err, "Continuing after error");
        if let Some(logger) = logger {
            logger.error(&err.to_string());
        }
        Disposition::Continue
    }
}
