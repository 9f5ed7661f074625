//! Connection configuration

use std::fmt;

/// Connection configuration
///
/// Every field is a plain string. Missing values are empty strings; the
/// driver rejects a descriptor it cannot use when the connection is opened.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Username
    pub user: String,
    /// Password
    pub password: String,
    /// Host name or IP address
    pub host: String,
    /// Port, kept as text
    pub port: String,
    /// Database (service) name
    pub database: String,
}

impl ConnectionConfig {
    /// Create configuration from all five slots
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        host: impl Into<String>,
        port: impl Into<String>,
        database: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            host: host.into(),
            port: port.into(),
            database: database.into(),
        }
    }

    /// Create a builder, starting from empty values
    ///
    /// # Examples
    ///
    /// ```
    /// use dbping::connection::ConnectionConfig;
    ///
    /// let config = ConnectionConfig::builder()
    ///     .user("scott")
    ///     .password("tiger")
    ///     .host("10.0.0.5")
    ///     .port("2881")
    ///     .database("test")
    ///     .build();
    ///
    /// assert_eq!(config.host, "10.0.0.5");
    /// ```
    pub fn builder() -> ConnectionConfigBuilder {
        ConnectionConfigBuilder::default()
    }

    /// Names of the slots that are empty, in descriptor order
    pub fn empty_fields(&self) -> Vec<&'static str> {
        [
            ("user", &self.user),
            ("password", &self.password),
            ("host", &self.host),
            ("port", &self.port),
            ("database", &self.database),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

impl fmt::Debug for ConnectionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectionConfig")
            .field("user", &self.user)
            .field("password", &"***")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .finish()
    }
}

/// Builder for [`ConnectionConfig`]
#[derive(Debug, Clone, Default)]
pub struct ConnectionConfigBuilder {
    config: ConnectionConfig,
}

impl ConnectionConfigBuilder {
    /// Set the username
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.config.user = user.into();
        self
    }

    /// Set the password
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.config.password = password.into();
        self
    }

    /// Set the host
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.config.host = host.into();
        self
    }

    /// Set the port
    pub fn port(mut self, port: impl Into<String>) -> Self {
        self.config.port = port.into();
        self
    }

    /// Set the database name
    pub fn database(mut self, database: impl Into<String>) -> Self {
        self.config.database = database.into();
        self
    }

    /// Build the configuration
    pub fn build(self) -> ConnectionConfig {
        self.config
    }
}
