// src/monitor.rs
use std::time::Instant;

use chrono::Local;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::net::TcpStream;
use tokio::time;
use tracing::{debug, info, warn};

use crate::config::MonitorConfig;
use crate::error::MonitorError;
use crate::report::{ConsoleSink, Status, StatusSink};
use crate::stats::{Observation, ThroughputStats};

/// One read from the stream.
#[derive(Debug, PartialEq, Eq)]
pub enum Line<'a> {
    /// Bytes up to and including the newline. The last fragment before EOF
    /// may lack one.
    Message(&'a [u8]),
    EndOfStream,
}

/// How a single connection ended.
#[derive(Debug)]
pub enum SessionEnd {
    Closed,
    Failed(MonitorError),
}

pub async fn connect(host: &str, port: u16) -> Result<TcpStream, MonitorError> {
    TcpStream::connect((host, port))
        .await
        .map_err(|e| MonitorError::connect(format!("{}:{}", host, port), e))
}

/// Reads the next newline-terminated message into `buf`.
///
/// No length cap: a peer that never sends `\n` grows `buf` without bound.
pub async fn read_line<'a, R>(reader: &mut R, buf: &'a mut Vec<u8>) -> Result<Line<'a>, MonitorError>
where
    R: AsyncBufRead + Unpin,
{
    buf.clear();
    let n = reader.read_until(b'\n', buf).await?;
    if n == 0 {
        Ok(Line::EndOfStream)
    } else {
        Ok(Line::Message(&buf[..n]))
    }
}

pub struct StreamMonitor<S = ConsoleSink> {
    config: MonitorConfig,
    stats: ThroughputStats,
    sink: S,
    failed_attempts: u64,
}

impl StreamMonitor<ConsoleSink> {
    pub fn new(config: MonitorConfig) -> Self {
        Self::with_sink(config, ConsoleSink)
    }
}

impl<S: StatusSink> StreamMonitor<S> {
    pub fn with_sink(config: MonitorConfig, sink: S) -> Self {
        let stats = ThroughputStats::new(config.report_every, config.rate_interval, Instant::now());
        StreamMonitor {
            config,
            stats,
            sink,
            failed_attempts: 0,
        }
    }

    pub fn stats(&self) -> &ThroughputStats {
        &self.stats
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Connects and reads until the profile says stop.
    ///
    /// Oneshot returns after the first session or the first failed connect.
    /// Resilient never returns.
    pub async fn run(&mut self) -> Result<(), MonitorError> {
        let reconnects = self.config.profile.reconnects();
        let addr = self.config.address();

        loop {
            debug!(%addr, attempt = self.failed_attempts + 1, "connecting");
            let stream = match connect(&self.config.host, self.config.port).await {
                Ok(stream) => stream,
                Err(err) => {
                    self.failed_attempts += 1;
                    warn!(%addr, attempt = self.failed_attempts, "connect failed: {}", err);
                    self.sink.emit(Status::ConnectFailed {
                        addr: addr.clone(),
                        attempt: self.failed_attempts,
                        error: source_message(&err),
                    });
                    if !reconnects {
                        return Err(err);
                    }
                    self.sink.emit(Status::Retrying {
                        delay: self.config.reconnect_delay,
                    });
                    time::sleep(self.config.reconnect_delay).await;
                    continue;
                }
            };

            self.failed_attempts = 0;
            info!(%addr, "connected");
            self.sink.emit(Status::Connected { addr: addr.clone() });

            match self.run_session(BufReader::new(stream)).await {
                SessionEnd::Closed if !reconnects => return Ok(()),
                SessionEnd::Failed(err) if !reconnects => return Err(err),
                _ => info!(%addr, "session ended, reconnecting"),
            }
        }
    }

    /// Counts and reports messages from `reader` until it closes or fails.
    pub async fn run_session<R>(&mut self, mut reader: R) -> SessionEnd
    where
        R: AsyncBufRead + Unpin,
    {
        let connected_at = Local::now();
        self.stats.begin_session(Instant::now());
        let mut buf = Vec::with_capacity(1024);

        let end = loop {
            match read_line(&mut reader, &mut buf).await {
                Ok(Line::Message(msg)) => {
                    let observation = self.stats.record(msg.len(), Instant::now());
                    self.report(observation);
                }
                Ok(Line::EndOfStream) => {
                    self.sink.emit(Status::Closed);
                    break SessionEnd::Closed;
                }
                Err(err) => {
                    warn!("read failed: {}", err);
                    self.sink.emit(Status::StreamFailed {
                        error: source_message(&err),
                    });
                    break SessionEnd::Failed(err);
                }
            }
        };

        debug!(
            messages = self.stats.session_messages(),
            bytes = self.stats.session_bytes(),
            "session finished"
        );
        self.sink.emit(Status::SessionSummary {
            connected_at,
            messages: self.stats.session_messages(),
            bytes: self.stats.session_bytes(),
        });
        end
    }

    /// Emits the lifetime totals, used when the process is interrupted.
    pub fn finish(&mut self) {
        self.sink.emit(Status::Shutdown {
            total_messages: self.stats.total_messages(),
            total_bytes: self.stats.total_bytes(),
        });
    }

    fn report(&mut self, observation: Observation) {
        if let Some(total) = observation.count_report {
            self.sink.emit(Status::Count { total });
        }
        if let Some(rate) = observation.rate_report {
            debug!(
                messages = rate.messages,
                elapsed_ms = rate.elapsed.as_millis() as u64,
                "rate window closed"
            );
            self.sink.emit(Status::Rate {
                messages: rate.messages,
            });
        }
    }
}

fn source_message(err: &MonitorError) -> String {
    match err {
        MonitorError::Connect { source, .. } => source.to_string(),
        MonitorError::Stream(source) => source.to_string(),
        other => other.to_string(),
    }
}
