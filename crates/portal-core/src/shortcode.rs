use crate::base62;
use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// A short code identifier for a shortened URL.
///
/// Codes are the base62 rendering of the counter value that produced them,
/// so they are 1-11 characters of `[0-9A-Za-z]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShortCode(String);

impl ShortCode {
    /// Creates the code for a counter value.
    pub fn from_counter(n: u64) -> Self {
        Self(base62::encode(n))
    }

    /// Creates a `ShortCode` after checking that it decodes to a counter value.
    pub fn parse(code: impl Into<String>) -> Result<Self> {
        let code = code.into();
        base62::decode(&code)?;
        Ok(Self(code))
    }

    /// Creates a `ShortCode` without validation.
    ///
    /// Use this only for codes read back from the store.
    pub fn new_unchecked(code: impl Into<String>) -> Self {
        Self(code.into())
    }

    /// Returns the counter value this code was produced from.
    pub fn decode(&self) -> Result<u64> {
        base62::decode(&self.0)
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consumes the code, returning the underlying string.
    pub fn into_string(self) -> String {
        self.0
    }
}

impl TryFrom<&str> for ShortCode {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl Display for ShortCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
