//! Driver dispatch for Service Screener.
//!
//! Maps AWS service identifiers to the class prefix that selects a per-service
//! audit driver, and holds the registered drivers under those keys.

pub mod prefix;
pub mod registry;

pub use prefix::{CLASS_NAMESPACE, clamp_prefix, namespaced_class_key, resolve_prefix};
pub use registry::{DriverRegistry, DriverRoute};
