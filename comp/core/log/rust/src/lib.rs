// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! `log` backend writing every record to a daily file and to stderr, as
//! plain text or one JSON object per line.

use log::{Level, LevelFilter, Log, Metadata, Record};
use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use thiserror::Error;
use time::format_description::well_known::Rfc3339;
use time::macros::format_description;
use time::OffsetDateTime;

#[derive(Error, Debug)]
pub enum InitError {
    #[error("could not create log directory {}: {source}", path.display())]
    LogDir { path: PathBuf, source: io::Error },
    #[error("could not open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },
    #[error(transparent)]
    SetLogger(#[from] log::SetLoggerError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl LogFormat {
    /// `json` (any case) selects JSON, anything else falls back to text.
    pub fn from_name(name: &str) -> Self {
        if name.trim().eq_ignore_ascii_case("json") {
            LogFormat::Json
        } else {
            LogFormat::Text
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    pub log_dir: PathBuf,
    pub level: LevelFilter,
    pub format: LogFormat,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("./logs"),
            level: LevelFilter::Info,
            format: LogFormat::Text,
        }
    }
}

/// Accepts the usual level names, including `WARNING` and `CRITICAL`.
/// Unknown names map to `Info`.
pub fn parse_level(name: &str) -> LevelFilter {
    match name.trim().to_ascii_lowercase().as_str() {
        "trace" => LevelFilter::Trace,
        "debug" => LevelFilter::Debug,
        "info" => LevelFilter::Info,
        "warn" | "warning" => LevelFilter::Warn,
        "error" | "critical" => LevelFilter::Error,
        "off" => LevelFilter::Off,
        _ => LevelFilter::Info,
    }
}

pub struct Logger {
    level: LevelFilter,
    format: LogFormat,
    path: PathBuf,
    file: Mutex<File>,
    console: bool,
}

impl Logger {
    /// Create the log directory if needed and open today's file for append.
    pub fn new(config: &LogConfig) -> Result<Self, InitError> {
        std::fs::create_dir_all(&config.log_dir).map_err(|source| InitError::LogDir {
            path: config.log_dir.clone(),
            source,
        })?;

        let path = daily_log_path(&config.log_dir, now());
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&path)
            .map_err(|source| InitError::LogFile {
                path: path.clone(),
                source,
            })?;

        Ok(Self {
            level: config.level,
            format: config.format,
            path,
            file: Mutex::new(file),
            console: true,
        })
    }

    /// Stop mirroring records to stderr.
    pub fn without_console(mut self) -> Self {
        self.console = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn format_line(&self, level: Level, message: &str, at: OffsetDateTime) -> String {
        format_line(self.format, level, message, at)
    }
}

impl Log for Logger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= self.level
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = self.format_line(record.level(), &record.args().to_string(), now());

        // A poisoned lock only means another thread panicked mid-write.
        let mut file = self.file.lock().unwrap_or_else(|e| e.into_inner());
        let _ = writeln!(file, "{line}");
        drop(file);

        if self.console {
            let _ = writeln!(io::stderr().lock(), "{line}");
        }
    }

    fn flush(&self) {
        let _ = self.file.lock().unwrap_or_else(|e| e.into_inner()).flush();
    }
}

/// Install a [`Logger`] built from `config` as the global logger.
pub fn init(config: &LogConfig) -> Result<(), InitError> {
    let logger = Logger::new(config)?;
    log::set_boxed_logger(Box::new(logger))?;
    log::set_max_level(config.level);
    Ok(())
}

pub fn daily_log_path(dir: &Path, at: OffsetDateTime) -> PathBuf {
    let day = at
        .format(format_description!("[year]-[month]-[day]"))
        .unwrap_or_else(|_| "unknown-date".to_string());
    dir.join(format!("{day}.log"))
}

/// Level label as written to the log, using the `WARNING` spelling that
/// `parse_level` also accepts.
pub fn level_name(level: Level) -> &'static str {
    match level {
        Level::Error => "ERROR",
        Level::Warn => "WARNING",
        Level::Info => "INFO",
        Level::Debug => "DEBUG",
        Level::Trace => "TRACE",
    }
}

pub fn format_line(format: LogFormat, level: Level, message: &str, at: OffsetDateTime) -> String {
    let unix = at.unix_timestamp();
    let iso = at.format(&Rfc3339).unwrap_or_default();
    let level = level_name(level);
    match format {
        LogFormat::Text => format!("unix_timestamp: {unix} | iso_timestamp: {iso} | {level} - {message}"),
        LogFormat::Json => serde_json::json!({
            "unix_timestamp": unix,
            "iso_timestamp": iso,
            "level": level,
            "message": message,
        })
        .to_string(),
    }
}

fn now() -> OffsetDateTime {
    OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc())
}
