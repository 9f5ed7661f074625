//! Harness configuration
//!
//! Values come from an environment-style key/value lookup; see [`env`] for
//! the keys. A missing key is an empty value, never an error.

pub mod env;

use crate::connection::ConnectionConfig;

/// Driver requested when none is configured
pub const DEFAULT_DRIVER: &str = "gobci";

/// Statement issued by the optional query phase
pub const DEFAULT_STATEMENT: &str = "SELECT 1 FROM DUAL";

/// Configuration for a single harness run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HarnessConfig {
    /// Credentials and endpoint
    pub connection: ConnectionConfig,
    /// Registered name of the driver to open connections with
    pub driver: String,
    /// Run the query phase after the liveness check
    pub run_query: bool,
    /// Statement executed by the query phase
    pub statement: String,
}

impl HarnessConfig {
    /// Configuration with the default driver and the query phase disabled
    pub fn new(connection: ConnectionConfig) -> Self {
        Self {
            connection,
            driver: DEFAULT_DRIVER.to_string(),
            run_query: false,
            statement: DEFAULT_STATEMENT.to_string(),
        }
    }

    /// Create a builder
    ///
    /// # Examples
    ///
    /// ```
    /// use dbping::config::HarnessConfig;
    /// use dbping::connection::ConnectionConfig;
    ///
    /// let config = HarnessConfig::builder(ConnectionConfig::default())
    ///     .driver("memory")
    ///     .run_query(true)
    ///     .build();
    ///
    /// assert_eq!(config.driver, "memory");
    /// assert!(config.run_query);
    /// ```
    pub fn builder(connection: ConnectionConfig) -> HarnessConfigBuilder {
        HarnessConfigBuilder {
            config: Self::new(connection),
        }
    }

    /// Load configuration from the process environment
    pub fn from_env() -> crate::Result<Self> {
        env::load(|key| std::env::var(key).ok())
    }
}

/// Builder for [`HarnessConfig`]
#[derive(Debug, Clone)]
pub struct HarnessConfigBuilder {
    config: HarnessConfig,
}

impl HarnessConfigBuilder {
    /// Set the driver name
    pub fn driver(mut self, driver: impl Into<String>) -> Self {
        self.config.driver = driver.into();
        self
    }

    /// Enable or disable the query phase
    pub fn run_query(mut self, enabled: bool) -> Self {
        self.config.run_query = enabled;
        self
    }

    /// Override the statement issued by the query phase
    pub fn statement(mut self, statement: impl Into<String>) -> Self {
        self.config.statement = statement.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> HarnessConfig {
        self.config
    }
}
