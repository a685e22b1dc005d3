use crate::error::{CoreError, Result};

/// Digit alphabet; a character's index is its digit value.
const ALPHABET: &[u8; 62] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz";

/// Number of base62 digits needed for `u64::MAX`.
pub const MAX_LEN: usize = 11;

/// Encodes an unsigned integer as a base62 string.
///
/// Zero encodes to `"0"`. Every other value starts with a non-zero digit,
/// so each string has exactly one preimage.
pub fn encode(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }

    let mut buf = [0u8; MAX_LEN];
    let mut i = buf.len();
    while n > 0 {
        i -= 1;
        buf[i] = ALPHABET[(n % 62) as usize];
        n /= 62;
    }
    buf[i..].iter().map(|&b| b as char).collect()
}

/// Decodes a base62 string produced by [`encode`].
///
/// Rejects the empty string, strings longer than [`MAX_LEN`], characters
/// outside the alphabet, redundant leading zeros and values that overflow `u64`.
pub fn decode(code: &str) -> Result<u64> {
    if code.is_empty() {
        return Err(CoreError::InvalidShortCode("code cannot be empty".to_string()));
    }
    if code.len() > MAX_LEN {
        return Err(CoreError::InvalidShortCode(format!(
            "length must be at most {}, got {}",
            MAX_LEN,
            code.len()
        )));
    }
    if code.len() > 1 && code.starts_with('0') {
        return Err(CoreError::InvalidShortCode(format!(
            "leading zero is not allowed: '{}'",
            code
        )));
    }

    code.bytes().try_fold(0u64, |acc, b| {
        let digit = digit_value(b).ok_or_else(|| {
            CoreError::InvalidShortCode(format!(
                "must contain only alphanumeric characters: '{}'",
                code
            ))
        })?;
        acc.checked_mul(62)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| CoreError::InvalidShortCode(format!("value out of range: '{}'", code)))
    })
}

fn digit_value(b: u8) -> Option<u64> {
    let v = match b {
        b'0'..=b'9' => b - b'0',
        b'A'..=b'Z' => b - b'A' + 10,
        b'a'..=b'z' => b - b'a' + 36,
        _ => return None,
    };
    Some(u64::from(v))
}
