//! Configuration for a screener run.
//!
//! All configuration is driven by environment variables.

use serde::{Deserialize, Serialize};
use typed_builder::TypedBuilder;

use crate::catalog;
use crate::types::AwsRegion;

/// Run-wide configuration.
///
/// # Examples
///
/// ```
/// use screener_core::ScreenerConfig;
///
/// let config = ScreenerConfig::builder()
///     .root_dir("/opt/app".into())
///     .services(vec!["s3".into()])
///     .build();
/// assert_eq!(config.selected_services(), vec!["s3".to_owned()]);
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, TypedBuilder)]
#[serde(rename_all = "camelCase")]
pub struct ScreenerConfig {
    /// Directory that report folders are created under.
    #[builder(default = String::from("."))]
    pub root_dir: String,

    /// Region used for SDK clients and global services.
    #[builder(default)]
    pub default_region: AwsRegion,

    /// Services to screen. Empty means the whole catalog.
    #[builder(default)]
    pub services: Vec<String>,

    /// Log level filter string (e.g. `"info"`, `"debug"`).
    #[builder(default = String::from("info"))]
    pub log_level: String,

    /// Whether to dump the cache snapshot after the run.
    #[builder(default = false)]
    pub debug: bool,
}

impl Default for ScreenerConfig {
    fn default() -> Self {
        Self {
            root_dir: String::from("."),
            default_region: AwsRegion::default(),
            services: Vec::new(),
            log_level: String::from("info"),
            debug: false,
        }
    }
}

impl ScreenerConfig {
    /// Load configuration from environment variables.
    ///
    /// | Variable | Default |
    /// |----------|---------|
    /// | `SCREENER_ROOT_DIR` | `.` |
    /// | `DEFAULT_REGION` | `us-east-1` |
    /// | `SERVICES` | *(empty = whole catalog)* |
    /// | `LOG_LEVEL` | `info` |
    /// | `DEBUG` | `false` |
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = lookup("SCREENER_ROOT_DIR") {
            config.root_dir = v;
        }
        if let Some(v) = lookup("DEFAULT_REGION") {
            config.default_region = AwsRegion::new(v);
        }
        if let Some(v) = lookup("SERVICES") {
            config.services = parse_service_list(&v);
        }
        if let Some(v) = lookup("LOG_LEVEL") {
            config.log_level = v;
        }
        if let Some(v) = lookup("DEBUG") {
            config.debug = parse_bool(&v);
        }

        config
    }

    /// The configured services, or every catalogued service when none are
    /// configured.
    #[must_use]
    pub fn selected_services(&self) -> Vec<String> {
        if self.services.is_empty() {
            catalog::all_services()
                .into_iter()
                .map(str::to_owned)
                .collect()
        } else {
            self.services.clone()
        }
    }
}

/// Split a comma-separated service list, trimming, lowercasing and dropping
/// empty items.
fn parse_service_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_ascii_lowercase())
        .filter(|s| !s.is_empty())
        .collect()
}

/// Parse a string as a boolean, accepting `"1"` and `"true"` (case-insensitive).
fn parse_bool(value: &str) -> bool {
    value == "1" || value.eq_ignore_ascii_case("true")
}
