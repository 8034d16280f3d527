//! Configuration and CLI argument handling

use clap::Parser;

/// CLI argument parsing structure
#[derive(Parser, Debug, Clone)]
#[command(name = "stage-clock")]
#[command(about = "An authoritative presentation countdown mirrored to every stage display")]
#[command(version = "1.0.0")]
pub struct Config {
    /// Port to bind the server to
    #[arg(short, long, default_value = "20554")]
    pub port: u16,

    /// Host address to bind to
    #[arg(long, default_value = "0.0.0.0")]
    pub host: String,

    /// Countdown length of a fresh clock in minutes
    #[arg(short, long, default_value = "15", value_parser = clap::value_parser!(u32).range(1..=1440))]
    pub minutes: u32,

    /// Remaining seconds at or below which the clock shows a warning
    #[arg(short, long, default_value = "60")]
    pub warning: u32,

    /// Enable the auto-timer when a question is put on display
    #[arg(long)]
    pub auto_timer: bool,

    /// Auto-timer countdown length in minutes
    #[arg(long, default_value = "5", value_parser = clap::value_parser!(u32).range(1..=1440))]
    pub auto_timer_minutes: u32,

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

    /// Defaults handed to the engine on startup
    pub fn engine_settings(&self) -> EngineSettings {
        EngineSettings {
            original_time: i64::from(self.minutes) * 60,
            warning_threshold: i64::from(self.warning),
            auto_timer_enabled: self.auto_timer,
            auto_timer_minutes: self.auto_timer_minutes,
        }
    }
}

/// Initial values of a freshly started clock. Nothing survives a restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineSettings {
    /// Countdown length in seconds
    pub original_time: i64,
    pub warning_threshold: i64,
    pub auto_timer_enabled: bool,
    pub auto_timer_minutes: u32,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            original_time: 15 * 60,
            warning_threshold: 60,
            auto_timer_enabled: false,
            auto_timer_minutes: 5,
        }
    }
}
