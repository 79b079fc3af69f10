//! WhisperNet terminal client entry point.

use clap::Parser;
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;
use whispernet_app::{App, Runtime};
use whispernet_client::{Args, Config, TerminalDriver};
use whispernet_core::SystemClock;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with_writer(std::io::stderr)
        .init();

    let config = Config::try_from(Args::parse())?;
    tracing::info!(push = %config.push_url, send = %config.send_url, "starting client");

    let driver =
        TerminalDriver::new(&config, BufReader::new(tokio::io::stdin()), std::io::stdout());
    let app = App::new(SystemClock, config.policy);

    Runtime::new(driver, app).run().await?;
    Ok(())
}
