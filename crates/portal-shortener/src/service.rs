use crate::keys::KeyLayout;
use async_trait::async_trait;
use portal_core::{
    fingerprint, Clock, LinkDetail, ShortCode, Shortener, ShortenerError, Store, StoreError,
    SystemClock, MAX_TTL_MINUTES,
};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, trace};

type Result<T> = std::result::Result<T, ShortenerError>;

/// Reverse-map values that count as "no live code" for deduplication.
const PLACEHOLDERS: [&str; 2] = ["", "{}"];

/// A concrete implementation of the `Shortener` trait over a key-value [`Store`].
///
/// Codes come from the store's global counter rendered in base62. The
/// service keeps no state of its own, so any number of instances may share
/// one store.
///
/// Deduplication is check-then-act: two concurrent `shorten` calls for the
/// same new URL can both miss the reverse map and allocate two codes. Both
/// codes resolve to the URL and the reverse map keeps the last write.
#[derive(Debug, Clone)]
pub struct ShortenerService<S, C = SystemClock> {
    store: Arc<S>,
    clock: C,
    keys: KeyLayout,
}

impl<S: Store> ShortenerService<S, SystemClock> {
    /// Creates a new `ShortenerService` with the default key layout.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Creates a service over a store that is shared with other owners.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self {
            store,
            clock: SystemClock,
            keys: KeyLayout::default(),
        }
    }
}

impl<S: Store, C: Clock> ShortenerService<S, C> {
    /// Replaces the clock used to stamp `created_at`.
    pub fn with_clock<C2: Clock>(self, clock: C2) -> ShortenerService<S, C2> {
        ShortenerService {
            store: self.store,
            clock,
            keys: self.keys,
        }
    }

    pub fn with_keys(mut self, keys: KeyLayout) -> Self {
        self.keys = keys;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn keys(&self) -> &KeyLayout {
        &self.keys
    }

    /// Looks up a live code for `url` in the reverse map.
    async fn live_code(&self, reverse_key: &str) -> Result<Option<ShortCode>> {
        match self.store.get_string(reverse_key).await? {
            Some(code) if PLACEHOLDERS.contains(&code.as_str()) => {
                trace!(key = %reverse_key, "Reverse mapping holds a placeholder");
                Ok(None)
            }
            Some(code) => Ok(Some(ShortCode::new_unchecked(code))),
            None => Ok(None),
        }
    }
}

fn counter_value(n: i64) -> std::result::Result<u64, StoreError> {
    u64::try_from(n).map_err(|_| StoreError::InvalidData(format!("counter holds negative value {n}")))
}

fn ttl(ttl_minutes: u64) -> Duration {
    Duration::from_secs(ttl_minutes.saturating_mul(60))
}

#[async_trait]
impl<S: Store, C: Clock> Shortener for ShortenerService<S, C> {
    async fn shorten(&self, url: &str, ttl_minutes: u64) -> Result<ShortCode> {
        if ttl_minutes > MAX_TTL_MINUTES {
            return Err(ShortenerError::TtlTooLong(ttl_minutes));
        }

        let fp = fingerprint(url);
        let reverse_key = self.keys.reverse(&fp);

        if let Some(code) = self.live_code(&reverse_key).await? {
            debug!(code = %code, "Reusing live short code");
            return Ok(code);
        }

        // The increment's return value is the allocation; reading the counter
        // back separately could hand the same value to two callers.
        let n = counter_value(self.store.incr(&self.keys.counter()).await?)?;
        let code = ShortCode::from_counter(n);

        let detail = LinkDetail {
            url: url.to_owned(),
            created_at: self.clock.now(),
            ttl_minutes,
        };
        let detail = serde_json::to_string(&detail)
            .map_err(|e| StoreError::Serialization(format!("failed to serialize detail: {e}")))?;

        let [forward_key, reverse_key, detail_key] = self.keys.projections(&code, &fp);
        let entries = [
            (forward_key, url.to_owned()),
            (reverse_key, code.to_string()),
            (detail_key, detail),
        ];
        self.store
            .set_all_with_expiry(&entries, ttl(ttl_minutes))
            .await?;

        info!(code = %code, counter = n, ttl_minutes, "Allocated short code");
        Ok(code)
    }

    async fn unshorten(&self, code: &str) -> Result<String> {
        match self.store.get_string(&self.keys.forward(code)).await? {
            Some(url) => {
                trace!(code = %code, "Resolved short code");
                Ok(url)
            }
            None => {
                debug!(code = %code, "Short code not found");
                Err(ShortenerError::NotFound(format!("{code} short-link expired")))
            }
        }
    }

    async fn info(&self, code: &str) -> Result<LinkDetail> {
        let Some(raw) = self.store.get_string(&self.keys.detail(code)).await? else {
            debug!(code = %code, "Short code detail not found");
            return Err(ShortenerError::NotFound("unknown short-link".to_string()));
        };

        serde_json::from_str(&raw).map_err(|e| {
            StoreError::InvalidData(format!("invalid detail for short code '{code}': {e}")).into()
        })
    }

    /// Reads the global counter; every allocation consumed one value, so
    /// this counts codes ever issued, live or expired.
    async fn allocated(&self) -> Result<u64> {
        let n = self.store.get_int(&self.keys.counter()).await?;
        Ok(counter_value(n)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::{SignedDuration, Timestamp};
    use portal_core::ManualClock;
    use portal_storage::InMemoryStore;

    type TestService = ShortenerService<InMemoryStore<ManualClock>, ManualClock>;

    fn test_service() -> (TestService, ManualClock) {
        let clock = ManualClock::new(Timestamp::from_second(1_700_000_000).unwrap());
        let store = InMemoryStore::with_clock(clock.clone());
        let service = ShortenerService::new(store).with_clock(clock.clone());
        (service, clock)
    }

    #[tokio::test]
    async fn first_allocation_scenario() {
        let (service, clock) = test_service();
        assert_eq!(service.allocated().await.unwrap(), 0);

        let code = service.shorten("https://example.com", 60).await.unwrap();
        assert_eq!(code.as_str(), "1");
        assert_eq!(service.allocated().await.unwrap(), 1);

        assert_eq!(
            service.unshorten("1").await.unwrap(),
            "https://example.com"
        );

        let detail = service.info("1").await.unwrap();
        assert_eq!(detail.url, "https://example.com");
        assert_eq!(detail.ttl_minutes, 60);
        assert_eq!(detail.created_at, clock.now());

        let again = service.shorten("https://example.com", 60).await.unwrap();
        assert_eq!(again, code);
        assert_eq!(service.allocated().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn dedup_hit_leaves_ttl_untouched() {
        let (service, clock) = test_service();
        let code = service.shorten("https://example.com", 10).await.unwrap();

        clock.advance(SignedDuration::from_mins(5));
        let again = service.shorten("https://example.com", 60).await.unwrap();
        assert_eq!(again, code);

        // still expires on the original schedule
        clock.advance(SignedDuration::from_mins(5));
        assert!(service.unshorten(code.as_str()).await.unwrap_err().is_not_found());
        assert_eq!(service.info(code.as_str()).await.unwrap_err().status(), 404);
    }

    #[tokio::test]
    async fn distinct_urls_get_distinct_codes() {
        let (service, _) = test_service();
        let a = service.shorten("https://a.example", 60).await.unwrap();
        let b = service.shorten("https://b.example", 60).await.unwrap();
        let c = service.shorten("https://a.example/", 60).await.unwrap();

        assert_eq!(a.as_str(), "1");
        assert_eq!(b.as_str(), "2");
        assert_eq!(c.as_str(), "3");
        assert_eq!(service.unshorten("2").await.unwrap(), "https://b.example");
    }

    #[tokio::test]
    async fn codes_decode_to_counter_values() {
        let (service, _) = test_service();
        for i in 1..=130u64 {
            let code = service
                .shorten(&format!("https://example.com/{i}"), 60)
                .await
                .unwrap();
            assert_eq!(code.decode().unwrap(), i);
        }
        assert_eq!(service.allocated().await.unwrap(), 130);
    }

    #[tokio::test]
    async fn unknown_code_is_not_found() {
        let (service, _) = test_service();

        let err = service.unshorten("doesnotexist").await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
        assert_eq!(err.to_string(), "doesnotexist short-link expired");

        let err = service.info("doesnotexist").await.unwrap_err();
        assert!(matches!(err, ShortenerError::NotFound(_)));
    }

    #[tokio::test]
    async fn expiry_boundary_allocates_new_code() {
        let (service, clock) = test_service();
        let code = service.shorten("https://example.com", 1).await.unwrap();

        clock.advance(SignedDuration::from_secs(59));
        assert!(service.unshorten(code.as_str()).await.is_ok());
        assert!(service.info(code.as_str()).await.is_ok());

        clock.advance(SignedDuration::from_secs(1));
        assert!(service.unshorten(code.as_str()).await.unwrap_err().is_not_found());
        assert!(service.info(code.as_str()).await.unwrap_err().is_not_found());

        let fresh = service.shorten("https://example.com", 1).await.unwrap();
        assert_ne!(fresh, code);
        assert_eq!(service.allocated().await.unwrap(), 2);
        assert_eq!(
            service.unshorten(fresh.as_str()).await.unwrap(),
            "https://example.com"
        );
        assert_eq!(service.info(fresh.as_str()).await.unwrap().created_at, clock.now());
    }

    #[tokio::test]
    async fn zero_ttl_is_passed_through() {
        let (service, clock) = test_service();
        let code = service.shorten("https://example.com", 0).await.unwrap();

        clock.advance(SignedDuration::from_hours(24 * 30));
        assert_eq!(
            service.unshorten(code.as_str()).await.unwrap(),
            "https://example.com"
        );
        assert_eq!(service.info(code.as_str()).await.unwrap().ttl_minutes, 0);
    }

    #[tokio::test]
    async fn ttl_above_maximum_is_rejected_before_allocation() {
        let (service, clock) = test_service();

        let err = service
            .shorten("https://example.com", MAX_TTL_MINUTES + 1)
            .await
            .unwrap_err();
        assert!(matches!(err, ShortenerError::TtlTooLong(_)));
        assert_eq!(err.status(), 400);
        assert_eq!(service.allocated().await.unwrap(), 0);
        assert!(service.store().is_empty());

        let err = service.shorten("https://example.com", u64::MAX).await.unwrap_err();
        assert!(matches!(err, ShortenerError::TtlTooLong(u64::MAX)));

        let code = service
            .shorten("https://example.com", MAX_TTL_MINUTES)
            .await
            .unwrap();
        clock.advance(SignedDuration::from_hours(24 * 365 * 99));
        assert_eq!(
            service.unshorten(code.as_str()).await.unwrap(),
            "https://example.com"
        );
    }

    #[tokio::test]
    async fn placeholder_reverse_value_is_a_miss() {
        for placeholder in PLACEHOLDERS {
            let (service, _) = test_service();
            let reverse_key = service.keys().reverse(&fingerprint("https://example.com"));
            service
                .store()
                .set_with_expiry(&reverse_key, placeholder, Duration::from_secs(60))
                .await
                .unwrap();

            let code = service.shorten("https://example.com", 60).await.unwrap();
            assert_eq!(code.as_str(), "1", "placeholder {placeholder:?} should not be reused");
            assert_eq!(service.allocated().await.unwrap(), 1);
        }
    }

    #[tokio::test]
    async fn corrupt_detail_is_a_store_error() {
        let (service, _) = test_service();
        service
            .store()
            .set_with_expiry(&service.keys().detail("1"), "not json", Duration::ZERO)
            .await
            .unwrap();

        let err = service.info("1").await.unwrap_err();
        assert!(matches!(err, ShortenerError::Store(StoreError::InvalidData(_))));
        assert_eq!(err.status(), 500);
    }

    #[tokio::test]
    async fn key_prefix_isolates_services() {
        let clock = ManualClock::default();
        let store = Arc::new(InMemoryStore::with_clock(clock.clone()));
        let blue = ShortenerService::from_arc(Arc::clone(&store))
            .with_keys(KeyLayout::builder().prefix("blue:").build());
        let green = ShortenerService::from_arc(Arc::clone(&store))
            .with_keys(KeyLayout::builder().prefix("green:").build());

        let a = blue.shorten("https://example.com", 60).await.unwrap();
        let b = green.shorten("https://example.com", 60).await.unwrap();

        assert_eq!(a.as_str(), "1");
        assert_eq!(b.as_str(), "1");
        assert!(store.get_string("blue:short_link:1:url").await.unwrap().is_some());
        assert!(store.get_string("short_link:1:url").await.unwrap().is_none());
    }
}
