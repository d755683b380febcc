//! Process-wide session cache.
//!
//! Provides [`ProcessCache`], a thread-safe key/value store for cross-cutting
//! run state: the SDK session handle, the caller identity, and the report
//! output paths derived from it. The table is created exactly once by
//! [`ProcessCache::init`] and lives until the process exits.

use std::any::Any;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, OnceLock};

use parking_lot::RwLock;
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::identity::IdentityRecord;

/// Marker written in place of opaque handles when a snapshot is serialized.
pub const OPAQUE_MARKER: &str = "<opaque>";

/// Well-known cache keys.
pub mod keys {
    /// Caller identity returned by the identity provider.
    pub const STS_INFO: &str = "stsInfo";
    /// Report folder for the account, relative to the root directory.
    pub const HTML_ACCOUNT_FOLDER_PATH: &str = "HTML_ACCOUNT_FOLDER_PATH";
    /// Report folder for the account, joined with the root directory.
    pub const HTML_ACCOUNT_FOLDER_FULLPATH: &str = "HTML_ACCOUNT_FOLDER_FULLPATH";
    /// Shared AWS SDK session configuration.
    pub const AWS_SESSION: &str = "ssBoto";
}

/// A value stored in the [`ProcessCache`].
///
/// Opaque handles are reference counted, so cloning a value never copies
/// the handle itself.
#[derive(Clone)]
pub enum CacheValue {
    /// Plain string, such as a path.
    Text(String),
    /// Caller identity record.
    Identity(IdentityRecord),
    /// Structured data.
    Json(serde_json::Value),
    /// Any other shared handle (SDK config, clients).
    Opaque(Arc<dyn Any + Send + Sync>),
}

impl CacheValue {
    /// Wrap an arbitrary shared handle.
    #[must_use]
    pub fn opaque<T: Any + Send + Sync>(value: T) -> Self {
        Self::Opaque(Arc::new(value))
    }

    /// The string payload, if this is a [`CacheValue::Text`].
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }

    /// The identity payload, if this is a [`CacheValue::Identity`].
    #[must_use]
    pub fn as_identity(&self) -> Option<&IdentityRecord> {
        match self {
            Self::Identity(id) => Some(id),
            _ => None,
        }
    }

    /// The JSON payload, if this is a [`CacheValue::Json`].
    #[must_use]
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(v) => Some(v),
            _ => None,
        }
    }

    /// Downcast an opaque handle to its concrete type.
    #[must_use]
    pub fn downcast<T: Any + Send + Sync>(&self) -> Option<Arc<T>> {
        match self {
            Self::Opaque(handle) => Arc::clone(handle).downcast::<T>().ok(),
            _ => None,
        }
    }
}

impl fmt::Debug for CacheValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(s) => f.debug_tuple("Text").field(s).finish(),
            Self::Identity(id) => f.debug_tuple("Identity").field(id).finish(),
            Self::Json(v) => f.debug_tuple("Json").field(v).finish(),
            Self::Opaque(_) => f.write_str("Opaque(..)"),
        }
    }
}

impl PartialEq for CacheValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a == b,
            (Self::Identity(a), Self::Identity(b)) => a == b,
            (Self::Json(a), Self::Json(b)) => a == b,
            (Self::Opaque(a), Self::Opaque(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl Serialize for CacheValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Text(s) => serializer.serialize_str(s),
            Self::Identity(id) => id.serialize(serializer),
            Self::Json(v) => v.serialize(serializer),
            Self::Opaque(_) => serializer.serialize_str(OPAQUE_MARKER),
        }
    }
}

impl From<String> for CacheValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CacheValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<IdentityRecord> for CacheValue {
    fn from(value: IdentityRecord) -> Self {
        Self::Identity(value)
    }
}

impl From<bool> for CacheValue {
    fn from(value: bool) -> Self {
        Self::Json(serde_json::Value::Bool(value))
    }
}

impl From<serde_json::Value> for CacheValue {
    fn from(value: serde_json::Value) -> Self {
        Self::Json(value)
    }
}

/// Thread-safe, initialize-once key/value store for run-wide state.
///
/// A store starts uninitialized; [`init`](Self::init) creates the table and
/// every later call is a no-op. Reads and writes before `init` are a
/// programming error and panic.
///
/// # Examples
///
/// ```
/// use screener_core::{CacheValue, ProcessCache};
///
/// let cache = ProcessCache::initialized();
/// cache.set("region", "us-east-1");
/// assert_eq!(cache.get_text("region").as_deref(), Some("us-east-1"));
/// assert_eq!(cache.get("missing"), None);
/// assert_eq!(cache.get_or("missing", false), CacheValue::from(false));
/// ```
#[derive(Default)]
pub struct ProcessCache {
    entries: OnceLock<RwLock<HashMap<String, CacheValue>>>,
}

impl ProcessCache {
    /// Create an uninitialized store.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            entries: OnceLock::new(),
        }
    }

    /// Create a store that is ready to use.
    #[must_use]
    pub fn initialized() -> Self {
        let cache = Self::new();
        cache.init();
        cache
    }

    /// The lazily-initialized store shared by the whole process.
    #[must_use]
    pub fn global() -> &'static Self {
        static GLOBAL: ProcessCache = ProcessCache::new();
        GLOBAL.init();
        &GLOBAL
    }

    /// Create the empty table.
    ///
    /// Only the first call has an effect; it returns `true`. Later calls keep
    /// all stored entries and return `false`.
    pub fn init(&self) -> bool {
        let mut created = false;
        self.entries.get_or_init(|| {
            created = true;
            RwLock::new(HashMap::new())
        });
        if created {
            debug!("process cache initialized");
        }
        created
    }

    /// Whether [`init`](Self::init) has run.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.entries.get().is_some()
    }

    fn table(&self) -> &RwLock<HashMap<String, CacheValue>> {
        match self.entries.get() {
            Some(table) => table,
            None => panic!("process cache accessed before init()"),
        }
    }

    /// Insert or overwrite the entry for `key`.
    pub fn set(&self, key: impl Into<String>, value: impl Into<CacheValue>) {
        self.table().write().insert(key.into(), value.into());
    }

    /// Insert several entries under a single write lock, so readers observe
    /// either none or all of them.
    pub fn set_all<K, V>(&self, entries: impl IntoIterator<Item = (K, V)>)
    where
        K: Into<String>,
        V: Into<CacheValue>,
    {
        let mut table = self.table().write();
        for (key, value) in entries {
            table.insert(key.into(), value.into());
        }
    }

    /// Look up `key`. `None` means the key was never set.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<CacheValue> {
        let value = self.table().read().get(key).cloned();
        if value.is_none() {
            debug!(key, "process cache miss");
        }
        value
    }

    /// Look up `key`, falling back to `default` when it is absent.
    #[must_use]
    pub fn get_or(&self, key: &str, default: impl Into<CacheValue>) -> CacheValue {
        self.get(key).unwrap_or_else(|| default.into())
    }

    /// Look up a text entry. Entries of another shape read as missing.
    #[must_use]
    pub fn get_text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(|v| v.as_text().map(str::to_owned))
    }

    /// Look up an identity entry. Entries of another shape read as missing.
    #[must_use]
    pub fn get_identity(&self, key: &str) -> Option<IdentityRecord> {
        self.get(key).and_then(|v| v.as_identity().cloned())
    }

    /// Look up an opaque handle of type `T`.
    #[must_use]
    pub fn get_opaque<T: Any + Send + Sync>(&self, key: &str) -> Option<Arc<T>> {
        self.get(key).and_then(|v| v.downcast::<T>())
    }

    /// Whether `key` has been set.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.table().read().contains_key(key)
    }

    /// Snapshot of every entry, for diagnostics and reporting.
    #[must_use]
    pub fn retrieve_all(&self) -> HashMap<String, CacheValue> {
        self.table().read().clone()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.table().read().len()
    }

    /// Whether the table is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.table().read().is_empty()
    }
}

impl fmt::Debug for ProcessCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut s = f.debug_struct("ProcessCache");
        match self.entries.get() {
            Some(table) => s.field("entries", &table.read().len()),
            None => s.field("entries", &"uninitialized"),
        };
        s.finish()
    }
}
