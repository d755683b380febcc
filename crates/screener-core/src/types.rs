//! Common type definitions shared across the screener.

use std::fmt;
use std::str::FromStr;

use crate::catalog;
use crate::error::ScreenerError;

/// AWS Region identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct AwsRegion(String);

impl AwsRegion {
    /// Region the screener starts from when nothing else is configured.
    pub const DEFAULT: &str = catalog::DEFAULT_REGION;

    /// Create a new region.
    #[must_use]
    pub fn new(region: impl Into<String>) -> Self {
        Self(region.into())
    }

    /// Get the region as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AwsRegion {
    fn default() -> Self {
        Self(Self::DEFAULT.to_owned())
    }
}

impl fmt::Display for AwsRegion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Well-Architected pillar a service check contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pillar {
    /// Security pillar.
    Security,
    /// Reliability pillar.
    Reliability,
    /// Cost optimization pillar.
    CostOptimization,
}

impl Pillar {
    /// Supported pillars, in report order.
    pub const ALL: [Self; 3] = [Self::Security, Self::Reliability, Self::CostOptimization];

    /// The snake_case name used in reports and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Security => "security",
            Self::Reliability => "reliability",
            Self::CostOptimization => "cost_optimization",
        }
    }
}

impl fmt::Display for Pillar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Pillar {
    type Err = ScreenerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|p| p.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ScreenerError::UnknownPillar(s.to_owned()))
    }
}
