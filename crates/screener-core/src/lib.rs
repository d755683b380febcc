//! Core runtime state for Service Screener.
//!
//! This crate holds the state shared by every per-service audit driver during
//! a run: the process-wide [`ProcessCache`], caller identity acquisition and
//! the report paths derived from it, run configuration, and the static service
//! catalog.

pub mod cache;
pub mod catalog;
mod config;
mod error;
pub mod identity;
mod types;

pub use cache::{CacheValue, ProcessCache, keys};
pub use config::ScreenerConfig;
pub use error::{ScreenerError, ScreenerResult};
pub use identity::{IdentityProvider, IdentityRecord, OutputPathPair, acquire_account_info};
pub use types::{AwsRegion, Pillar};
