use crate::detail::LinkDetail;
use crate::error::ShortenerError;
use crate::shortcode::ShortCode;
use async_trait::async_trait;

type Result<T> = std::result::Result<T, ShortenerError>;

/// Longest accepted TTL, about 100 years. Both store adapters can represent
/// an expiry this far out.
pub const MAX_TTL_MINUTES: u64 = 60 * 24 * 365 * 100;

#[async_trait]
pub trait Shortener: Send + Sync + 'static {
    /// Returns a short code for `url`, reusing the live code for the same URL
    /// when one exists.
    ///
    /// A `ttl_minutes` above [`MAX_TTL_MINUTES`] fails with
    /// [`ShortenerError::TtlTooLong`] before anything is allocated.
    async fn shorten(&self, url: &str, ttl_minutes: u64) -> Result<ShortCode>;

    /// Resolves a short code to its original URL.
    ///
    /// Fails with [`ShortenerError::NotFound`] if the code never existed or
    /// has expired.
    async fn unshorten(&self, code: &str) -> Result<String>;

    /// Returns the metadata recorded when the code was allocated.
    async fn info(&self, code: &str) -> Result<LinkDetail>;

    /// Number of codes handed out so far.
    async fn allocated(&self) -> Result<u64>;
}
