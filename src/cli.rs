//! CLI command implementations for Enclave.

pub(crate) mod admin;
pub(crate) mod play;
pub(crate) mod simulate;
pub(crate) mod view;

mod output;

use clap::ValueEnum;
use enclave::config::ConfigError;
use enclave::snapshot::{SnapshotError, StateSnapshot};
use enclave::{Engine, EngineConfig, GameError};
use log::LevelFilter;
use simple_logger::SimpleLogger;
use std::error::Error;
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Output format for commands that print results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum OutputFormat {
    /// Human-readable text output.
    Text,
    /// Machine-readable JSON output.
    Json,
}

/// Log verbosity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogLevel {
    /// No logging.
    Off,
    /// Errors only.
    Error,
    /// Warnings and errors.
    Warn,
    /// Informational messages.
    Info,
    /// Per-placement and per-capture detail.
    Debug,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
        }
    }
}

/// Install the stderr logger.
pub(crate) fn init_logging(level: LogLevel) {
    if let Err(e) = SimpleLogger::new().with_level(level.into()).init() {
        eprintln!("Failed to initialize logging: {e}");
    }
}

/// Paths shared by every command.
#[derive(Debug)]
pub(crate) struct Context {
    /// Game state file.
    pub(crate) state: PathBuf,
    /// Optional engine configuration file.
    pub(crate) config: Option<PathBuf>,
}

impl Context {
    /// Load the engine configuration, falling back to defaults.
    pub(crate) fn engine_config(&self) -> Result<EngineConfig, CliError> {
        match &self.config {
            Some(path) => Ok(EngineConfig::load(path)?),
            None => Ok(EngineConfig::default()),
        }
    }

    /// Load the engine from the state file.
    pub(crate) fn open(&self) -> Result<Engine, CliError> {
        if !self.state.exists() {
            return Err(CliError::new(format!(
                "No state file at {} (run `enclave init` first)",
                self.state.display()
            )));
        }
        let snapshot = StateSnapshot::load(&self.state)?;
        Ok(snapshot.restore(self.engine_config()?, Arc::new(enclave::cache::NoopInvalidator))?)
    }

    /// Write the engine back to the state file.
    pub(crate) fn save(&self, engine: &Engine) -> Result<(), CliError> {
        StateSnapshot::capture(engine).save(&self.state)?;
        Ok(())
    }
}

/// CLI error type.
#[derive(Debug)]
pub(crate) struct CliError {
    message: String,
}

impl CliError {
    /// Create a new CLI error.
    pub(crate) fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl Error for CliError {}

impl From<std::io::Error> for CliError {
    fn from(e: std::io::Error) -> Self {
        Self::new(e.to_string())
    }
}

impl From<GameError> for CliError {
    fn from(e: GameError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<SnapshotError> for CliError {
    fn from(e: SnapshotError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<ConfigError> for CliError {
    fn from(e: ConfigError) -> Self {
        Self::new(e.to_string())
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        Self::new(format!("JSON serialization failed: {e}"))
    }
}
