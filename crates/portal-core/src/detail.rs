use jiff::{SignedDuration, Timestamp};
use serde::{Deserialize, Serialize};

/// Metadata stored alongside a short code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkDetail {
    /// The original URL that was shortened.
    pub url: String,
    /// When the code was allocated.
    #[serde(rename = "create_at")]
    pub created_at: Timestamp,
    /// Lifetime of every projection of the link; `0` means no expiry.
    #[serde(rename = "expiration_in_minutes")]
    pub ttl_minutes: u64,
}

impl LinkDetail {
    /// The instant the link stops resolving, if it expires at all.
    pub fn expires_at(&self) -> Option<Timestamp> {
        if self.ttl_minutes == 0 {
            return None;
        }
        let secs = i64::try_from(self.ttl_minutes).ok()?.checked_mul(60)?;
        self.created_at
            .checked_add(SignedDuration::from_secs(secs))
            .ok()
    }
}
