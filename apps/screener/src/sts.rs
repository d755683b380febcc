//! STS-backed identity provider.

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_sdk_sts::error::DisplayErrorContext;
use aws_sdk_sts::operation::get_caller_identity::GetCallerIdentityOutput;
use tracing::debug;

use screener_core::{IdentityProvider, IdentityRecord, ScreenerError, ScreenerResult};

/// Resolves the caller identity with `sts:GetCallerIdentity`.
#[derive(Debug, Clone)]
pub struct StsIdentityProvider {
    client: aws_sdk_sts::Client,
}

impl StsIdentityProvider {
    /// Build a provider from a loaded SDK session.
    #[must_use]
    pub fn new(sdk_config: &SdkConfig) -> Self {
        Self {
            client: aws_sdk_sts::Client::new(sdk_config),
        }
    }
}

#[async_trait]
impl IdentityProvider for StsIdentityProvider {
    async fn caller_identity(&self) -> ScreenerResult<IdentityRecord> {
        debug!("calling sts:GetCallerIdentity");
        let output = self
            .client
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| ScreenerError::IdentityProvider(DisplayErrorContext(&e).to_string()))?;
        identity_from_output(&output)
    }
}

/// Convert the STS response, requiring all three identity fields.
fn identity_from_output(output: &GetCallerIdentityOutput) -> ScreenerResult<IdentityRecord> {
    Ok(IdentityRecord {
        user_id: output
            .user_id()
            .ok_or(ScreenerError::IncompleteIdentity("UserId"))?
            .to_owned(),
        account: output
            .account()
            .ok_or(ScreenerError::IncompleteIdentity("Account"))?
            .to_owned(),
        arn: output
            .arn()
            .ok_or(ScreenerError::IncompleteIdentity("Arn"))?
            .to_owned(),
    })
}
