use sha2::{Digest, Sha256};
use std::fmt::Display;

/// Fixed domain-separation salt mixed into every fingerprint.
///
/// Changing it invalidates every reverse mapping in the store.
const SALT: &[u8] = b"portal:url-fingerprint:v1\n";

/// A stable deduplication key for a URL.
///
/// Lowercase hex SHA-256 of [`SALT`] followed by the URL bytes. Only ever
/// used inside store keys.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Computes the fingerprint of a URL string.
pub fn fingerprint(url: &str) -> Fingerprint {
    let mut hasher = Sha256::new();
    hasher.update(SALT);
    hasher.update(url.as_bytes());
    Fingerprint(format!("{:x}", hasher.finalize()))
}
