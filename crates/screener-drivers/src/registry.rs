//! Driver registry keyed by namespaced class key.
//!
//! Drivers register under the service name they handle; the registry stores
//! them under [`namespaced_class_key`], so every service name that resolves to
//! the same prefix reaches the same driver.

use std::fmt;
use std::sync::Arc;

use dashmap::DashMap;
use serde::Serialize;
use tracing::{debug, warn};

use crate::prefix::namespaced_class_key;

/// How a single service would be dispatched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DriverRoute {
    /// Service name as configured.
    pub service: String,
    /// Namespaced class key the service resolves to.
    pub class_key: String,
    /// Whether a driver is registered under that key.
    pub registered: bool,
}

/// Thread-safe map from class key to shared driver handle.
///
/// `D` is usually a trait object, e.g. `DriverRegistry<dyn MyDriver>`.
pub struct DriverRegistry<D: ?Sized + Send + Sync> {
    drivers: DashMap<String, Arc<D>>,
}

impl<D: ?Sized + Send + Sync> DriverRegistry<D> {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            drivers: DashMap::new(),
        }
    }

    /// Register `driver` for `service`, returning the driver it replaced.
    pub fn register(&self, service: &str, driver: Arc<D>) -> Option<Arc<D>> {
        let key = namespaced_class_key(service);
        debug!(service, class_key = %key, "registering driver");
        let previous = self.drivers.insert(key, driver);
        if previous.is_some() {
            warn!(service, "driver replaced an earlier registration");
        }
        previous
    }

    /// Find the driver for `service`.
    #[must_use]
    pub fn lookup(&self, service: &str) -> Option<Arc<D>> {
        self.drivers
            .get(&namespaced_class_key(service))
            .map(|r| Arc::clone(r.value()))
    }

    /// Whether a driver is registered for `service`.
    #[must_use]
    pub fn contains(&self, service: &str) -> bool {
        self.drivers.contains_key(&namespaced_class_key(service))
    }

    /// Registered class keys, sorted.
    #[must_use]
    pub fn class_keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self.drivers.iter().map(|r| r.key().clone()).collect();
        keys.sort_unstable();
        keys
    }

    /// Describe how each service would be dispatched.
    ///
    /// Services without a driver are reported with `registered = false`
    /// rather than rejected.
    #[must_use]
    pub fn plan<S: AsRef<str>>(&self, services: impl IntoIterator<Item = S>) -> Vec<DriverRoute> {
        services
            .into_iter()
            .map(|service| {
                let service = service.as_ref();
                let class_key = namespaced_class_key(service);
                let registered = self.drivers.contains_key(&class_key);
                DriverRoute {
                    service: service.to_owned(),
                    class_key,
                    registered,
                }
            })
            .collect()
    }

    /// Number of registered drivers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.drivers.len()
    }

    /// Whether no driver is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.drivers.is_empty()
    }
}

impl<D: ?Sized + Send + Sync> Default for DriverRegistry<D> {
    fn default() -> Self {
        Self::new()
    }
}

impl<D: ?Sized + Send + Sync> fmt::Debug for DriverRegistry<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DriverRegistry")
            .field("class_keys", &self.class_keys())
            .finish()
    }
}
