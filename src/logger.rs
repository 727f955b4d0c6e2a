//! Append-only file logs
//!
//! Two date-stamped files per day in the configured logs directory: a general
//! event log and a dedicated inputs log. Files are opened once, in append
//! mode, when the [`Logger`] is constructed. Every line is also mirrored to
//! the `tracing` console subscriber.

use anyhow::Context;
use chrono::{DateTime, Local, NaiveDate};
use std::fs::{self, File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::Level;

use crate::constants::logging::{
    FILE_DATE_FORMAT, GENERAL_PREFIX, GENERAL_TIMESTAMP_FORMAT, INPUTS_PREFIX,
    INPUT_TIMESTAMP_FORMAT,
};
use crate::error::AppError;

/// Lines more verbose than this are dropped from the general log
const THRESHOLD: Level = Level::INFO;

struct LogFile {
    path: PathBuf,
    file: Mutex<File>,
}

impl LogFile {
    fn open(path: PathBuf) -> anyhow::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .with_context(|| format!("Failed to open log file {}", path.display()))?;
        Ok(Self {
            path,
            file: Mutex::new(file),
        })
    }

    fn append_line(&self, line: &str) -> Result<(), AppError> {
        let mut file = self.file.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
        writeln!(file, "{line}")
            .and_then(|_| file.flush())
            .map_err(|source| AppError::LogWrite {
                path: self.path.clone(),
                source,
            })
    }
}

pub struct Logger {
    general: LogFile,
    inputs: LogFile,
}

impl Logger {
    /// Open today's log files under `logs_dir`, creating the directory if needed
    pub fn open(logs_dir: &Path) -> Result<Self, AppError> {
        Self::open_for_date(logs_dir, Local::now().date_naive())
    }

    pub fn open_for_date(logs_dir: &Path, date: NaiveDate) -> Result<Self, AppError> {
        fs::create_dir_all(logs_dir)
            .with_context(|| format!("Failed to create logs directory {}", logs_dir.display()))
            .map_err(AppError::UiInit)?;

        let stamp = date.format(FILE_DATE_FORMAT);
        let general = LogFile::open(logs_dir.join(format!("{GENERAL_PREFIX}_{stamp}.log")))
            .map_err(AppError::UiInit)?;
        let inputs = LogFile::open(logs_dir.join(format!("{INPUTS_PREFIX}_{stamp}.log")))
            .map_err(AppError::UiInit)?;

        tracing::info!(
            general = %general.path.display(),
            inputs = %inputs.path.display(),
            "Log files opened"
        );

        Ok(Self { general, inputs })
    }

    #[cfg(test)]
    pub fn general_path(&self) -> &Path {
        &self.general.path
    }

    #[cfg(test)]
    pub fn inputs_path(&self) -> &Path {
        &self.inputs.path
    }

    pub fn debug(&self, message: &str) {
        self.log(Level::DEBUG, message);
    }

    pub fn info(&self, message: &str) {
        self.log(Level::INFO, message);
    }

    pub fn warning(&self, message: &str) {
        self.log(Level::WARN, message);
    }

    pub fn error(&self, message: &str) {
        self.log(Level::ERROR, message);
    }

    /// Append to the general log. A failed write is reported on the console only.
    pub fn log(&self, level: Level, message: &str) {
        mirror(level, message);
        if let Err(e) = self.write_general(level, message) {
            tracing::error!(error = %e, "Dropped general log line");
        }
    }

    /// Record a user submission in both the general log and the inputs log
    pub fn log_input(&self, text: &str, label: Option<&str>) -> Result<(), AppError> {
        let now = Local::now();
        let label_info = label
            .filter(|l| !l.is_empty())
            .map(|l| format!(", Label: {l}"))
            .unwrap_or_default();

        // Only claim the input in the general log once the inputs log has it
        self.inputs.append_line(&format_input_line(now, text, &label_info))?;

        let message = format!("User input: {text}{label_info}");
        mirror(Level::INFO, &message);
        self.write_general_at(now, Level::INFO, &message)
    }

    fn write_general(&self, level: Level, message: &str) -> Result<(), AppError> {
        self.write_general_at(Local::now(), level, message)
    }

    fn write_general_at(
        &self,
        at: DateTime<Local>,
        level: Level,
        message: &str,
    ) -> Result<(), AppError> {
        if level > THRESHOLD {
            return Ok(());
        }
        self.general.append_line(&format_general_line(at, level, message))
    }
}

fn mirror(level: Level, message: &str) {
    match level {
        Level::ERROR => tracing::error!("{message}"),
        Level::WARN => tracing::warn!("{message}"),
        Level::INFO => tracing::info!("{message}"),
        Level::DEBUG => tracing::debug!("{message}"),
        _ => tracing::trace!("{message}"),
    }
}

fn level_name(level: Level) -> &'static str {
    match level {
        Level::ERROR => "ERROR",
        Level::WARN => "WARNING",
        Level::INFO => "INFO",
        Level::DEBUG => "DEBUG",
        _ => "TRACE",
    }
}

/// `2024-05-01 09:30:12,345 - INFO - message`
fn format_general_line(at: DateTime<Local>, level: Level, message: &str) -> String {
    format!(
        "{} - {} - {}",
        at.format(GENERAL_TIMESTAMP_FORMAT),
        level_name(level),
        message
    )
}

/// `2024-05-01 09:30:12 - Input: text, Label: A`
fn format_input_line(at: DateTime<Local>, text: &str, label_info: &str) -> String {
    format!(
        "{} - Input: {}{}",
        at.format(INPUT_TIMESTAMP_FORMAT),
        text,
        label_info
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn read(path: &Path) -> String {
        fs::read_to_string(path).unwrap_or_default()
    }

    #[test]
    fn test_file_names_are_date_stamped() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let logger = Logger::open_for_date(dir.path(), date).unwrap();

        assert_eq!(logger.general_path(), dir.path().join("urge_20240309.log"));
        assert_eq!(logger.inputs_path(), dir.path().join("inputs_20240309.log"));
        assert!(logger.general_path().exists());
        assert!(logger.inputs_path().exists());
    }

    #[test]
    fn test_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let logger = Logger::open(&nested).unwrap();
        assert!(nested.is_dir());
        assert!(logger.general_path().starts_with(&nested));
    }

    #[test]
    fn test_level_lines() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::open(dir.path()).unwrap();

        logger.info("Application starting");
        logger.warning("Empty text submitted");
        logger.error("Something broke");
        logger.debug("too chatty");

        let contents = read(logger.general_path());
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[0].ends_with(" - INFO - Application starting"));
        assert!(lines[1].ends_with(" - WARNING - Empty text submitted"));
        assert!(lines[2].ends_with(" - ERROR - Something broke"));
        assert!(!read(logger.inputs_path()).contains("Empty text"));
    }

    #[test]
    fn test_log_input_writes_both_files() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::open(dir.path()).unwrap();

        logger.log_input("hello", Some("A")).unwrap();

        let inputs = read(logger.inputs_path());
        assert_eq!(inputs.lines().count(), 1);
        assert!(inputs.contains(" - Input: hello, Label: A"));

        let general = read(logger.general_path());
        assert!(general.contains(" - INFO - User input: hello, Label: A"));
    }

    #[test]
    fn test_log_input_without_label() {
        let dir = tempfile::tempdir().unwrap();
        let logger = Logger::open(dir.path()).unwrap();

        logger.log_input("plain", None).unwrap();
        logger.log_input("blank label", Some("")).unwrap();

        let inputs = read(logger.inputs_path());
        let lines: Vec<&str> = inputs.lines().collect();
        assert!(lines[0].ends_with(" - Input: plain"));
        assert!(lines[1].ends_with(" - Input: blank label"));
    }

    #[test]
    fn test_reopen_appends() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();

        Logger::open_for_date(dir.path(), date)
            .unwrap()
            .log_input("first", None)
            .unwrap();
        let logger = Logger::open_for_date(dir.path(), date).unwrap();
        logger.log_input("second", None).unwrap();

        let inputs = read(logger.inputs_path());
        assert_eq!(inputs.lines().count(), 2);
        assert!(inputs.lines().next().unwrap().ends_with("first"));
    }

    #[cfg(unix)]
    #[test]
    fn test_failed_inputs_write_leaves_general_log_clean() {
        let dir = tempfile::tempdir().unwrap();
        let date = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        std::os::unix::fs::symlink("/dev/full", dir.path().join("inputs_20240101.log")).unwrap();
        let logger = Logger::open_for_date(dir.path(), date).unwrap();

        for _ in 0..2 {
            let err = logger.log_input("hello", Some("A")).unwrap_err();
            assert!(matches!(err, AppError::LogWrite { .. }));
        }

        assert!(!read(logger.general_path()).contains("User input"));
    }

    #[test]
    fn test_line_formats() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 12).unwrap();
        assert_eq!(
            format_general_line(at, Level::WARN, "careful"),
            "2024-05-01 09:30:12,000 - WARNING - careful"
        );
        assert_eq!(
            format_input_line(at, "note", ", Label: B"),
            "2024-05-01 09:30:12 - Input: note, Label: B"
        );
    }
}
