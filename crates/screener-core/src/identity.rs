//! Caller identity acquisition.
//!
//! The screener asks the identity provider (STS `GetCallerIdentity` in
//! production) who it is running as, stores the answer in the
//! [`ProcessCache`], and derives the per-account report folder from it.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::cache::{ProcessCache, keys};
use crate::error::ScreenerResult;

/// Report folder segment that account folders live under.
pub const ACCOUNT_FOLDER_SEGMENT: &str = "adminlte/aws";

/// Identity of the caller, as reported by the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct IdentityRecord {
    /// Unique identifier of the calling entity.
    pub user_id: String,
    /// AWS account ID that owns the calling entity.
    pub account: String,
    /// ARN of the calling entity.
    pub arn: String,
}

/// Report folder for one account: the path relative to the root directory and
/// the same path joined with it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputPathPair {
    /// `adminlte/aws/<account>`.
    pub relative: String,
    /// `<root>/adminlte/aws/<account>`.
    pub absolute: String,
}

impl OutputPathPair {
    /// Derive both paths from the root directory and the account ID.
    #[must_use]
    pub fn for_account(root_dir: &str, account: &str) -> Self {
        let relative = format!("{ACCOUNT_FOLDER_SEGMENT}/{account}");
        let absolute = format!("{}/{relative}", root_dir.trim_end_matches('/'));
        Self { relative, absolute }
    }

    /// Write both paths into the cache in one update.
    pub fn store(&self, cache: &ProcessCache) {
        cache.set_all([
            (keys::HTML_ACCOUNT_FOLDER_PATH, self.relative.as_str()),
            (keys::HTML_ACCOUNT_FOLDER_FULLPATH, self.absolute.as_str()),
        ]);
    }

    /// Read the pair back from the cache, if both halves are present.
    #[must_use]
    pub fn load(cache: &ProcessCache) -> Option<Self> {
        Some(Self {
            relative: cache.get_text(keys::HTML_ACCOUNT_FOLDER_PATH)?,
            absolute: cache.get_text(keys::HTML_ACCOUNT_FOLDER_FULLPATH)?,
        })
    }
}

/// Source of the caller identity.
///
/// Implementations own their transport, retries and credential handling;
/// their errors are passed through unchanged.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Ask who the current credentials belong to.
    async fn caller_identity(&self) -> ScreenerResult<IdentityRecord>;
}

/// Acquire the caller identity and record it, with the derived report paths,
/// in the cache.
///
/// Nothing is written when the provider fails.
pub async fn acquire_account_info(
    cache: &ProcessCache,
    provider: &dyn IdentityProvider,
    root_dir: &str,
) -> ScreenerResult<OutputPathPair> {
    info!("acquiring identity info");

    let identity = provider.caller_identity().await?;
    let paths = OutputPathPair::for_account(root_dir, &identity.account);

    info!(
        account = %identity.account,
        arn = %identity.arn,
        folder = %paths.absolute,
        "caller identity resolved"
    );

    cache.set(keys::STS_INFO, identity);
    paths.store(cache);

    Ok(paths)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::thread;

    use super::*;
    use crate::cache::CacheValue;
    use crate::error::ScreenerError;

    struct FixedIdentity {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl IdentityProvider for FixedIdentity {
        async fn caller_identity(&self) -> ScreenerResult<IdentityRecord> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(IdentityRecord {
                user_id: "AIDAEXAMPLE".to_owned(),
                account: "123456789012".to_owned(),
                arn: "arn:aws:iam::123456789012:user/auditor".to_owned(),
            })
        }
    }

    struct FailingIdentity;

    #[async_trait]
    impl IdentityProvider for FailingIdentity {
        async fn caller_identity(&self) -> ScreenerResult<IdentityRecord> {
            Err(ScreenerError::IdentityProvider(
                "ExpiredToken: the security token included in the request is expired".to_owned(),
            ))
        }
    }

    #[test]
    fn test_should_derive_account_paths() {
        let paths = OutputPathPair::for_account("/opt/app", "123456789012");
        assert_eq!(paths.relative, "adminlte/aws/123456789012");
        assert_eq!(paths.absolute, "/opt/app/adminlte/aws/123456789012");
    }

    #[test]
    fn test_should_not_double_trailing_slash() {
        let paths = OutputPathPair::for_account("/opt/app/", "111122223333");
        assert_eq!(paths.absolute, "/opt/app/adminlte/aws/111122223333");
    }

    #[test]
    fn test_should_never_expose_half_written_paths() {
        let cache = Arc::new(ProcessCache::initialized());
        let done = Arc::new(AtomicBool::new(false));

        let writer = {
            let cache = Arc::clone(&cache);
            let done = Arc::clone(&done);
            thread::spawn(move || {
                for i in 0..2_000_u64 {
                    let account = format!("{:012}", 100_000_000_000 + i);
                    OutputPathPair::for_account("/opt/app", &account).store(&cache);
                }
                done.store(true, Ordering::SeqCst);
            })
        };

        while !done.load(Ordering::SeqCst) {
            let snapshot = cache.retrieve_all();
            let relative = snapshot
                .get(keys::HTML_ACCOUNT_FOLDER_PATH)
                .and_then(CacheValue::as_text);
            let absolute = snapshot
                .get(keys::HTML_ACCOUNT_FOLDER_FULLPATH)
                .and_then(CacheValue::as_text);
            match (relative, absolute) {
                (None, None) => {}
                (Some(relative), Some(absolute)) => {
                    assert_eq!(absolute, format!("/opt/app/{relative}"));
                }
                other => panic!("path pair observed half-written: {other:?}"),
            }
        }
        writer.join().unwrap();

        let last = OutputPathPair::load(&cache).unwrap();
        assert_eq!(last.relative, "adminlte/aws/100000001999");
        assert!(last.absolute.ends_with(&last.relative));
    }

    #[test]
    fn test_should_serialize_identity_with_aws_field_names() {
        let record = IdentityRecord {
            user_id: "u".to_owned(),
            account: "a".to_owned(),
            arn: "r".to_owned(),
        };
        let json = serde_json::to_value(&record).expect("test serialization");
        assert_eq!(json, serde_json::json!({"UserId": "u", "Account": "a", "Arn": "r"}));
    }

    #[tokio::test]
    async fn test_should_store_identity_and_paths() {
        let cache = ProcessCache::initialized();
        let provider = FixedIdentity {
            calls: AtomicUsize::new(0),
        };

        let paths = acquire_account_info(&cache, &provider, "/opt/app")
            .await
            .unwrap();

        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
        assert_eq!(paths.absolute, "/opt/app/adminlte/aws/123456789012");

        let identity = cache.get_identity(keys::STS_INFO).unwrap();
        assert_eq!(identity.account, "123456789012");
        assert_eq!(identity.user_id, "AIDAEXAMPLE");

        assert_eq!(OutputPathPair::load(&cache), Some(paths));
        assert_eq!(
            cache.get_text(keys::HTML_ACCOUNT_FOLDER_PATH).as_deref(),
            Some("adminlte/aws/123456789012")
        );
    }

    #[tokio::test]
    async fn test_should_propagate_provider_error_without_writing() {
        let cache = ProcessCache::initialized();

        let result = acquire_account_info(&cache, &FailingIdentity, "/opt/app").await;

        assert!(matches!(result, Err(ScreenerError::IdentityProvider(_))));
        assert!(cache.is_empty());
        assert_eq!(OutputPathPair::load(&cache), None);
    }
}
