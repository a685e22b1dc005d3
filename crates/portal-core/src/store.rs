use crate::error::StoreError;
use async_trait::async_trait;
use std::time::Duration;

pub type Result<T> = std::result::Result<T, StoreError>;

/// A key-value store with atomic counters and per-key expiration.
///
/// This is the only capability the link engine needs from its backing
/// store. Implementations decide what a zero `ttl` means; both bundled
/// adapters store the value without an expiry.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Atomically increments the integer at `key` and returns the new value.
    ///
    /// A missing key counts as 0, so the first call returns 1.
    async fn incr(&self, key: &str) -> Result<i64>;

    /// Reads a string value.
    ///
    /// Returns `Ok(None)` only if the key is absent (or expired). Empty
    /// strings are returned as `Some("")`.
    async fn get_string(&self, key: &str) -> Result<Option<String>>;

    /// Reads an integer value. A missing key reads as 0.
    async fn get_int(&self, key: &str) -> Result<i64>;

    /// Unconditionally overwrites `key`, replacing any previous expiry.
    async fn set_with_expiry(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Writes several keys sharing one expiry.
    ///
    /// The default writes the entries one by one in order; a failure leaves
    /// the earlier entries in place. Adapters with cheap multi-key commits
    /// should override this to make the batch all-or-nothing.
    async fn set_all_with_expiry(&self, entries: &[(String, String)], ttl: Duration) -> Result<()> {
        for (key, value) in entries {
            self.set_with_expiry(key, value, ttl).await?;
        }
        Ok(())
    }
}
