//! dbping: connectivity checks for pluggable database drivers
//!
//! A run formats a `user/password@host:port/database` descriptor, opens a
//! connection through a driver looked up by name, pings it and can run one
//! fixed statement whose rows are written out as JSON lines.
//!
//! Drivers plug in through the [`driver::Driver`], [`driver::Conn`] and
//! [`driver::Rows`] traits and are registered in a [`driver::DriverRegistry`].
//! Rows decode into [`driver::RowValue`], a `serde_json::Value`, so the
//! harness never needs to know the result schema.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> dbping::Result<()> {
//! use dbping::config::HarnessConfig;
//! use dbping::driver::DriverRegistry;
//! use dbping::Harness;
//!
//! let config = HarnessConfig::from_env()?;
//! let harness = Harness::from_registry(DriverRegistry::global(), config)?;
//! harness.run(&mut std::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod config;
pub mod connection;
pub mod driver;
pub mod error;
pub mod harness;
pub mod metrics;

pub use error::{DriverError, Error, Result};
pub use harness::{Harness, HarnessState, RunReport};
