//! Configuration and CLI argument handling

use std::{path::PathBuf, time::Duration};

use clap::{Parser, ValueEnum};

use crate::{
    error::ConfigError,
    timer::{CountdownDuration, TimerSettings},
};

/// Which time source stamps countdowns and history entries
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ClockKind {
    /// Host wall clock, read on every tick
    System,
    /// Wall clock captured once at startup, then advanced monotonically
    Monotonic,
}

/// CLI argument parsing structure
#[derive(Parser, Debug)]
#[command(name = "task-timer")]
#[command(about = "A single-task countdown timer with a persisted completion history")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Countdown duration in milliseconds
    #[arg(short, long, default_value = "5000", allow_hyphen_values = true)]
    pub duration_ms: i64,

    /// Tick cadence in milliseconds
    #[arg(long, default_value = "1000")]
    pub tick_ms: u64,

    /// Directory holding the persisted history
    #[arg(long, default_value = ".task-timer")]
    pub data_dir: PathBuf,

    /// Time source for countdowns
    #[arg(long, value_enum, default_value = "system")]
    pub clock: ClockKind,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Config {
    /// Parse configuration from command line arguments
    pub fn parse() -> Self {
        Parser::parse()
    }

    /// Get the server address as a formatted string
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Get the appropriate log level based on verbose flag
    pub fn log_level(&self) -> &'static str {
        if self.verbose { "debug" } else { "info" }
    }

    /// Validate the timer-related flags.
    pub fn timer_settings(&self) -> Result<TimerSettings, ConfigError> {
        if self.tick_ms == 0 {
            return Err(ConfigError::ZeroTickInterval);
        }
        Ok(TimerSettings {
            duration: CountdownDuration::try_from_millis(self.duration_ms)?,
            tick_interval: Duration::from_millis(self.tick_ms),
        })
    }
}
