//! Error types for the Service Screener core.

/// Core error type for Service Screener.
#[derive(Debug, thiserror::Error)]
pub enum ScreenerError {
    /// The identity provider call failed (credentials, network, throttling).
    #[error("identity provider error: {0}")]
    IdentityProvider(String),

    /// The identity provider answered without one of the required fields.
    #[error("identity response is missing field {0}")]
    IncompleteIdentity(&'static str),

    /// Unknown Well-Architected pillar name.
    #[error("unknown pillar: {0}")]
    UnknownPillar(String),
}

/// Convenience result type for Service Screener operations.
pub type ScreenerResult<T> = Result<T, ScreenerError>;
