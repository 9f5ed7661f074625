//! Environment keys
//!
//! | key          | value                                      |
//! |--------------|--------------------------------------------|
//! | `USERNAME`   | user                                       |
//! | `PASSWORD`   | password                                   |
//! | `OBIP`       | host                                       |
//! | `OBPORT`     | port                                       |
//! | `OBDATABASE` | database                                   |
//! | `OBDRIVER`   | driver name (default [`DEFAULT_DRIVER`])   |
//! | `OBQUERY`    | run the query phase (`1`/`true`/`yes`/`on`) |

use super::{HarnessConfig, DEFAULT_DRIVER};
use crate::connection::ConnectionConfig;
use crate::{Error, Result};

/// Username key
pub const USERNAME: &str = "USERNAME";
/// Password key
pub const PASSWORD: &str = "PASSWORD";
/// Host key
pub const HOST: &str = "OBIP";
/// Port key
pub const PORT: &str = "OBPORT";
/// Database key
pub const DATABASE: &str = "OBDATABASE";
/// Driver name key
pub const DRIVER: &str = "OBDRIVER";
/// Query phase toggle key
pub const QUERY: &str = "OBQUERY";

/// Build connection configuration from a lookup; missing keys become empty strings
pub fn connection_config<F>(lookup: F) -> ConnectionConfig
where
    F: Fn(&str) -> Option<String>,
{
    let get = |key: &str| lookup(key).unwrap_or_default();

    ConnectionConfig::new(get(USERNAME), get(PASSWORD), get(HOST), get(PORT), get(DATABASE))
}

/// Build the full harness configuration from a lookup
///
/// Only `OBQUERY` can fail, when it holds something that is not a boolean.
pub fn load<F>(lookup: F) -> Result<HarnessConfig>
where
    F: Fn(&str) -> Option<String>,
{
    let connection = connection_config(&lookup);

    let driver = lookup(DRIVER)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_DRIVER.to_string());

    let run_query = match lookup(QUERY) {
        Some(value) => parse_flag(QUERY, &value)?,
        None => false,
    };

    Ok(HarnessConfig::builder(connection)
        .driver(driver)
        .run_query(run_query)
        .build())
}

fn parse_flag(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "" | "0" | "false" | "no" | "off" => Ok(false),
        "1" | "true" | "yes" | "on" => Ok(true),
        other => Err(Error::Config(format!(
            "{} must be a boolean, got '{}'",
            key, other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_connection_config_from_lookup() {
        let lookup = lookup_from(&[
            ("USERNAME", "root@sys"),
            ("PASSWORD", "secret"),
            ("OBIP", "10.0.0.5"),
            ("OBPORT", "2881"),
            ("OBDATABASE", "oceanbase"),
        ]);

        let config = connection_config(lookup);
        assert_eq!(
            config,
            ConnectionConfig::new("root@sys", "secret", "10.0.0.5", "2881", "oceanbase")
        );
    }

    #[test]
    fn test_missing_keys_are_empty() {
        let config = connection_config(lookup_from(&[("OBIP", "10.0.0.5")]));

        assert_eq!(config.host, "10.0.0.5");
        assert!(config.user.is_empty());
        assert!(config.password.is_empty());
        assert!(config.port.is_empty());
        assert!(config.database.is_empty());
    }

    #[test]
    fn test_load_defaults() {
        let config = load(lookup_from(&[])).unwrap();

        assert_eq!(config.driver, DEFAULT_DRIVER);
        assert!(!config.run_query);
        assert_eq!(config.connection, ConnectionConfig::default());
    }

    #[test]
    fn test_load_driver_and_query() {
        let config = load(lookup_from(&[("OBDRIVER", "memory"), ("OBQUERY", "yes")])).unwrap();

        assert_eq!(config.driver, "memory");
        assert!(config.run_query);
    }

    #[test]
    fn test_blank_driver_falls_back_to_default() {
        let config = load(lookup_from(&[("OBDRIVER", "  ")])).unwrap();
        assert_eq!(config.driver, DEFAULT_DRIVER);
    }

    #[test]
    fn test_parse_flag() {
        for value in ["1", "true", "TRUE", "yes", "on", " On "] {
            assert!(parse_flag(QUERY, value).unwrap(), "{}", value);
        }
        for value in ["", "0", "false", "No", "off"] {
            assert!(!parse_flag(QUERY, value).unwrap(), "{}", value);
        }
    }

    #[test]
    fn test_invalid_flag() {
        let err = load(lookup_from(&[("OBQUERY", "maybe")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("OBQUERY"));
    }
}
