use std::fmt;
use std::time::Duration;

use chrono::{DateTime, Local};

/// A human-readable status line emitted by the monitor.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Connected { addr: String },
    ConnectFailed { addr: String, attempt: u64, error: String },
    Retrying { delay: Duration },
    Count { total: u64 },
    Rate { messages: u64 },
    Closed,
    StreamFailed { error: String },
    SessionSummary {
        connected_at: DateTime<Local>,
        messages: u64,
        bytes: u64,
    },
    Shutdown { total_messages: u64, total_bytes: u64 },
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Status::Connected { addr } => write!(f, "✅ Connected to server {}", addr),
            Status::ConnectFailed { addr, attempt, error } => {
                write!(f, "❌ Connection to {} failed (attempt {}): {}", addr, attempt, error)
            }
            Status::Retrying { delay } => {
                write!(f, "🔁 Retrying in {:.1}s...", delay.as_secs_f64())
            }
            Status::Count { total } => write!(f, "📦 Received {} total messages", total),
            Status::Rate { messages } => write!(f, "📊 Rate: {} msg/s", messages),
            Status::Closed => write!(f, "❌ Connection closed by server"),
            Status::StreamFailed { error } => write!(f, "❌ Stream error: {}", error),
            Status::SessionSummary {
                connected_at,
                messages,
                bytes,
            } => write!(
                f,
                "Session since {}: {} messages, {} bytes",
                connected_at.format("%H:%M:%S"),
                messages,
                bytes
            ),
            Status::Shutdown {
                total_messages,
                total_bytes,
            } => write!(
                f,
                "Shutting down: {} messages, {} bytes received in total",
                total_messages, total_bytes
            ),
        }
    }
}

/// Destination for status lines.
pub trait StatusSink {
    fn emit(&mut self, status: Status);
}

/// Prints each status line to stdout as it happens.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleSink;

impl StatusSink for ConsoleSink {
    fn emit(&mut self, status: Status) {
        println!("{}", status);
    }
}

impl StatusSink for Vec<Status> {
    fn emit(&mut self, status: Status) {
        self.push(status);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_and_rate_lines() {
        assert_eq!(
            Status::Count { total: 200 }.to_string(),
            "📦 Received 200 total messages"
        );
        assert_eq!(
            Status::Rate { messages: 42 }.to_string(),
            "📊 Rate: 42 msg/s"
        );
    }

    #[test]
    fn retry_line_shows_seconds() {
        let line = Status::Retrying {
            delay: Duration::from_secs(2),
        }
        .to_string();
        assert_eq!(line, "🔁 Retrying in 2.0s...");
    }

    #[test]
    fn vec_sink_collects() {
        let mut sink: Vec<Status> = Vec::new();
        sink.emit(Status::Closed);
        assert_eq!(sink, vec![Status::Closed]);
    }
}
