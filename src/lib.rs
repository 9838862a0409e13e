//! Throughput monitor for newline-delimited TCP streams.
//!
//! [`StreamMonitor`] connects to one server, counts each `\n`-terminated
//! message, and prints a cumulative count every N messages plus a per-second
//! rate. The [`Profile`] decides whether a closed or refused connection ends
//! the run or is retried after a fixed delay.

pub mod config;
pub mod error;
pub mod monitor;
pub mod report;
pub mod stats;

pub use config::{Cli, MonitorConfig, Profile};
pub use error::MonitorError;
pub use monitor::{connect, read_line, Line, SessionEnd, StreamMonitor};
pub use report::{ConsoleSink, Status, StatusSink};
pub use stats::{Observation, RateReport, ThroughputStats};
