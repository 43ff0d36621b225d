//! Configuration and CLI argument handling

use std::time::Duration;
use clap::Parser;

use crate::state::{Settings, DEFAULT_WARMUP_MINUTES};

/// CLI argument parsing structure
#[derive(Debug, Parser)]
#[command(name = "court-warmup")]
#[command(about = "A multi-court warmup countdown server")]
#[command(version)]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Court count used when none is given or it cannot be parsed
    #[arg(short, long, default_value = "0")]
    pub courts: usize,

    /// Warmup duration in minutes
    #[arg(short, long, default_value_t = DEFAULT_WARMUP_MINUTES)]
    pub warmup: u64,

    /// Initial settings as a query string or URL, e.g. "courtCount=4&warmupTime=8"
    #[arg(long)]
    pub settings: Option<String>,

    /// Milliseconds between timer ticks
    #[arg(long, default_value = "250")]
    pub tick_ms: u64,

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

    /// Settings used when a query value is missing or unparsable
    pub fn default_settings(&self) -> Settings {
        Settings::new(self.courts, self.warmup)
    }

    /// Settings to start with, taken from `--settings` when given
    pub fn initial_settings(&self) -> Settings {
        match &self.settings {
            Some(query) => Settings::parse_query(query, self.default_settings()),
            None => self.default_settings(),
        }
    }

    /// Time between timer ticks
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.tick_ms.max(1))
    }
}
