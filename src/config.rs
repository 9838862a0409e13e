//! Monitor configuration.
//!
//! Values come from CLI flags, then environment (`SERVER_HOST`, `SERVER_PORT`,
//! `MONITOR_PROFILE`, optionally via `.env`), then the profile defaults.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::error::MonitorError;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8080;

/// How the monitor reacts to connect failures and stream closure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Profile {
    /// Exit on the first connect failure or when the stream closes.
    Oneshot,
    /// Reconnect forever with a fixed delay.
    Resilient,
}

impl Profile {
    pub fn default_report_every(self) -> u64 {
        match self {
            Profile::Oneshot => 100,
            Profile::Resilient => 10_000,
        }
    }

    pub fn reconnects(self) -> bool {
        matches!(self, Profile::Resilient)
    }
}

#[derive(Debug, Parser)]
#[command(name = "stream-monitor", version, about = "Print throughput of a newline-delimited TCP stream")]
pub struct Cli {
    /// Server host to connect to
    #[arg(long, env = "SERVER_HOST", default_value = DEFAULT_HOST)]
    pub host: String,

    /// Server port
    #[arg(long, env = "SERVER_PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    #[arg(long, env = "MONITOR_PROFILE", value_enum, default_value_t = Profile::Oneshot)]
    pub profile: Profile,

    /// Print the cumulative count every N messages (profile default if unset)
    #[arg(long)]
    pub report_every: Option<u64>,

    /// Length of the rate window in milliseconds
    #[arg(long)]
    pub rate_interval_ms: Option<u64>,

    /// Delay between reconnect attempts in milliseconds (resilient only)
    #[arg(long)]
    pub reconnect_delay_ms: Option<u64>,
}

/// Immutable settings handed to [`crate::StreamMonitor`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitorConfig {
    pub host: String,
    pub port: u16,
    pub profile: Profile,
    pub report_every: u64,
    pub rate_interval: Duration,
    pub reconnect_delay: Duration,
}

impl MonitorConfig {
    pub fn new(profile: Profile) -> Self {
        MonitorConfig {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            profile,
            report_every: profile.default_report_every(),
            rate_interval: Duration::from_secs(1),
            reconnect_delay: Duration::from_secs(2),
        }
    }

    pub fn with_address(mut self, host: impl Into<String>, port: u16) -> Self {
        self.host = host.into();
        self.port = port;
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn validate(&self) -> Result<(), MonitorError> {
        if self.report_every == 0 {
            return Err(MonitorError::Config("report interval must be at least 1 message".into()));
        }
        if self.rate_interval.is_zero() {
            return Err(MonitorError::Config("rate interval must be positive".into()));
        }
        if self.profile.reconnects() && self.reconnect_delay.is_zero() {
            return Err(MonitorError::Config("reconnect delay must be positive".into()));
        }
        if self.host.trim().is_empty() {
            return Err(MonitorError::Config("host must not be empty".into()));
        }
        Ok(())
    }
}

impl TryFrom<Cli> for MonitorConfig {
    type Error = MonitorError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let mut config = MonitorConfig::new(cli.profile).with_address(cli.host, cli.port);
        if let Some(n) = cli.report_every {
            config.report_every = n;
        }
        if let Some(ms) = cli.rate_interval_ms {
            config.rate_interval = Duration::from_millis(ms);
        }
        if let Some(ms) = cli.reconnect_delay_ms {
            config.reconnect_delay = Duration::from_millis(ms);
        }
        config.validate()?;
        Ok(config)
    }
}
