use std::process::ExitCode;

use clap::Parser;
use dotenv::dotenv;
use stream_monitor::{Cli, MonitorConfig, MonitorError, StreamMonitor};
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

enum Exit {
    Finished(Result<(), MonitorError>),
    Interrupted,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let config = match MonitorConfig::try_from(Cli::parse()) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::from(2);
        }
    };
    info!(addr = %config.address(), profile = ?config.profile, "starting stream monitor");

    let mut monitor = StreamMonitor::new(config);
    let exit = tokio::select! {
        res = monitor.run() => Exit::Finished(res),
        _ = signal::ctrl_c() => Exit::Interrupted,
    };

    match exit {
        Exit::Finished(Ok(())) => ExitCode::SUCCESS,
        Exit::Finished(Err(e)) => {
            error!("monitor stopped: {}", e);
            ExitCode::FAILURE
        }
        Exit::Interrupted => {
            monitor.finish();
            ExitCode::SUCCESS
        }
    }
}
