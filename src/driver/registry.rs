//! Driver registry

use super::Driver;
use crate::{Error, Result};
use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock, RwLockReadGuard, RwLockWriteGuard};

static GLOBAL: OnceLock<DriverRegistry> = OnceLock::new();

/// Thread-safe map from driver name to driver
#[derive(Default)]
pub struct DriverRegistry {
    drivers: RwLock<HashMap<String, Arc<dyn Driver>>>,
}

impl DriverRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Process-wide registry
    ///
    /// Starts empty on first access; the embedding application registers its
    /// drivers before the first lookup. Later calls return the same instance.
    pub fn global() -> &'static DriverRegistry {
        GLOBAL.get_or_init(|| {
            tracing::debug!("initialising global driver registry");
            Self::new()
        })
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<String, Arc<dyn Driver>>> {
        self.drivers.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<String, Arc<dyn Driver>>> {
        self.drivers.write().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Register a driver under its own name
    ///
    /// Fails if the name is already taken.
    pub fn register(&self, driver: Arc<dyn Driver>) -> Result<()> {
        let name = driver.name().to_string();
        let mut drivers = self.write();

        if drivers.contains_key(&name) {
            return Err(Error::DriverExists(name));
        }

        tracing::debug!(driver = %name, "driver registered");
        drivers.insert(name, driver);
        Ok(())
    }

    /// Look up a driver by name
    pub fn get(&self, name: &str) -> Result<Arc<dyn Driver>> {
        self.read()
            .get(name)
            .cloned()
            .ok_or_else(|| Error::UnknownDriver(name.to_string()))
    }

    /// Registered driver names, sorted
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl std::fmt::Debug for DriverRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("drivers", &self.names())
            .finish()
    }
}
