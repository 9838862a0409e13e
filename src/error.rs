use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("connection to {addr} failed: {source}")]
    Connect {
        addr: String,
        #[source]
        source: io::Error,
    },

    #[error("stream error: {0}")]
    Stream(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl MonitorError {
    pub fn connect(addr: impl Into<String>, source: io::Error) -> Self {
        MonitorError::Connect {
            addr: addr.into(),
            source,
        }
    }
}
