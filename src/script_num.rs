//! Script number encoding under consensus minimal-encoding rules.
//!
//! Script-level integers are little-endian magnitude bytes with the sign
//! carried in the high bit of the last byte; zero is the empty encoding.
//! Each value has exactly one minimal encoding, and consensus-sensitive
//! call sites must validate minimality before decoding.

use std::fmt;

/// Errors from the numeric codec. Never silently recovered: a non-minimal
/// or oversized encoding and an out-of-range extraction are both hard
/// failures at the call site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScriptNumError {
    /// The bytes are not minimally encoded, or exceed the allowed length.
    #[error("numeric value of {0} bytes is not a valid minimal encoding")]
    Encoding(usize),

    /// The decoded value does not fit the requested integer width.
    #[error("numeric value out of range")]
    Range,
}

/// A script integer with a canonical minimal byte encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ScriptNum(i64);

/// Check that `bytes` is a minimal encoding no longer than `max_len`.
///
/// A trailing byte that contributes only a sign bit (or nothing) is
/// redundant unless the byte below it would otherwise be misread as
/// carrying the sign.
pub fn is_minimally_encoded(bytes: &[u8], max_len: usize) -> bool {
    if bytes.len() > max_len {
        return false;
    }
    if let Some(&last) = bytes.last() {
        if last & 0x7f == 0 {
            // [0x00] and [0x80] are non-minimal forms of zero.
            if bytes.len() <= 1 || bytes[bytes.len() - 2] & 0x80 == 0 {
                return false;
            }
        }
    }
    true
}

impl ScriptNum {
    /// Decode a byte encoding into a number.
    ///
    /// Fails with `Encoding` if the length exceeds `max_len`, or if
    /// `require_minimal` is set and the bytes are not minimal. Well-formed
    /// minimal input within bounds never fails. Call sites in this crate
    /// use `max_len` = 4; lengths beyond 8 bytes are rejected outright.
    pub fn from_bytes(
        bytes: &[u8],
        require_minimal: bool,
        max_len: usize,
    ) -> Result<ScriptNum, ScriptNumError> {
        if bytes.len() > max_len || bytes.len() > 8 {
            return Err(ScriptNumError::Encoding(bytes.len()));
        }
        if require_minimal && !is_minimally_encoded(bytes, max_len) {
            return Err(ScriptNumError::Encoding(bytes.len()));
        }
        if bytes.is_empty() {
            return Ok(ScriptNum(0));
        }

        let mut magnitude: u64 = 0;
        for (i, &b) in bytes.iter().enumerate() {
            magnitude |= (b as u64) << (8 * i);
        }

        // The high bit of the last byte is the sign, not magnitude.
        let sign_bit = 0x80u64 << (8 * (bytes.len() - 1));
        let value = if magnitude & sign_bit != 0 {
            -((magnitude & !sign_bit) as i64)
        } else {
            magnitude as i64
        };
        Ok(ScriptNum(value))
    }

    /// Serialize to the unique minimal encoding. Inverse of `from_bytes`.
    pub fn to_bytes(&self) -> Vec<u8> {
        if self.0 == 0 {
            return Vec::new();
        }

        let negative = self.0 < 0;
        let mut magnitude = self.0.unsigned_abs();
        let mut out = Vec::with_capacity(9);
        while magnitude > 0 {
            out.push((magnitude & 0xff) as u8);
            magnitude >>= 8;
        }

        // If the top magnitude byte would collide with the sign bit, a
        // padding byte carries the sign instead.
        let top = out[out.len() - 1];
        if top & 0x80 != 0 {
            out.push(if negative { 0x80 } else { 0x00 });
        } else if negative {
            let last = out.len() - 1;
            out[last] |= 0x80;
        }
        out
    }

    /// The numeric value.
    pub fn value(&self) -> i64 {
        self.0
    }

    /// Extract as i32, failing with `Range` if the value does not fit.
    pub fn to_i32(&self) -> Result<i32, ScriptNumError> {
        i32::try_from(self.0).map_err(|_| ScriptNumError::Range)
    }
}

impl From<i64> for ScriptNum {
    fn from(v: i64) -> ScriptNum {
        ScriptNum(v)
    }
}

impl From<ScriptNum> for i64 {
    fn from(n: ScriptNum) -> i64 {
        n.0
    }
}

impl fmt::Display for ScriptNum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
