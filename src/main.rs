//! dbping command line entry point
//!
//! Reads the connection settings from the environment, runs the harness once
//! against stdout and exits non-zero on any failure. Logs go to stderr.
//!
//! The driver is looked up in [`DriverRegistry::global`], which starts empty;
//! a build that links a real driver registers it there first.

use dbping::config::HarnessConfig;
use dbping::driver::DriverRegistry;
use dbping::Harness;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} failed: {}", e.phase(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run() -> dbping::Result<()> {
    let config = HarnessConfig::from_env()?;
    let registry = DriverRegistry::global();
    tracing::debug!(driver = %config.driver, registered = ?registry.names(), "resolving driver");
    let harness = Harness::from_registry(registry, config)?;
    tracing::debug!(driver = harness.driver_name(), "driver resolved");

    let mut stdout = std::io::stdout();
    harness.run(&mut stdout).await?;
    Ok(())
}
