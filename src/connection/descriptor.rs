//! Data source descriptor
//!
//! Format: `user/password@host:port/database`

use super::ConnectionConfig;
use crate::{Error, Result};
use std::fmt;

/// Formatted connection string handed to a driver on open
///
/// `Display` yields the full string, password included, because that is what
/// drivers consume. `Debug` and [`redacted`](Self::redacted) mask the password.
#[derive(Clone, PartialEq, Eq)]
pub struct DataSourceDescriptor {
    raw: String,
}

impl DataSourceDescriptor {
    /// Format a descriptor from configuration
    ///
    /// Pure interpolation: empty fields are kept as empty slots.
    ///
    /// # Examples
    ///
    /// ```
    /// use dbping::connection::{ConnectionConfig, DataSourceDescriptor};
    ///
    /// let config = ConnectionConfig::new("scott", "tiger", "10.0.0.5", "2881", "test");
    /// let descriptor = DataSourceDescriptor::from_config(&config);
    ///
    /// assert_eq!(descriptor.as_str(), "scott/tiger@10.0.0.5:2881/test");
    /// ```
    pub fn from_config(config: &ConnectionConfig) -> Self {
        Self {
            raw: format!(
                "{}/{}@{}:{}/{}",
                config.user, config.password, config.host, config.port, config.database
            ),
        }
    }

    /// Wrap an already formatted string without checking it
    pub fn from_raw(raw: impl Into<String>) -> Self {
        Self { raw: raw.into() }
    }

    /// Full descriptor string
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Split the descriptor back into its five slots
    ///
    /// The user ends at the first `/`, the password at the last `@`, the
    /// host and port are separated by the last `:` before the database.
    pub fn parse(&self) -> Result<ConnectionConfig> {
        let (user, rest) = self
            .raw
            .split_once('/')
            .ok_or_else(|| Error::Config("descriptor is missing '/' after user".into()))?;

        let (password, endpoint) = rest
            .rsplit_once('@')
            .ok_or_else(|| Error::Config("descriptor is missing '@' before host".into()))?;

        let (host_port, database) = endpoint
            .split_once('/')
            .ok_or_else(|| Error::Config("descriptor is missing '/' before database".into()))?;

        let (host, port) = host_port
            .rsplit_once(':')
            .ok_or_else(|| Error::Config("descriptor is missing ':' before port".into()))?;

        Ok(ConnectionConfig::new(user, password, host, port, database))
    }

    /// Descriptor with the password masked, safe to log
    pub fn redacted(&self) -> String {
        match self.parse() {
            Ok(config) => format!(
                "{}/***@{}:{}/{}",
                config.user, config.host, config.port, config.database
            ),
            Err(_) => "<malformed descriptor>".to_string(),
        }
    }
}

impl From<&ConnectionConfig> for DataSourceDescriptor {
    fn from(config: &ConnectionConfig) -> Self {
        Self::from_config(config)
    }
}

impl fmt::Display for DataSourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl fmt::Debug for DataSourceDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("DataSourceDescriptor")
            .field(&self.redacted())
            .finish()
    }
}
