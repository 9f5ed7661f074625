//! Connection parameters
//!
//! This module handles:
//! * Credentials and endpoint configuration
//! * Data source descriptor formatting and parsing

mod config;
mod descriptor;

pub use config::{ConnectionConfig, ConnectionConfigBuilder};
pub use descriptor::DataSourceDescriptor;
