use crate::{VerimintError, VerimintResult, PACKED_DATE_SIZE, ZERO_DATE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A date packed as six ASCII digit bytes, `YYMMDD`, big-endian
/// concatenation. `"000000"` is the reserved "unset" sentinel.
///
/// This is the exact wire encoding the query circuit consumes; decoding
/// into a Unix timestamp lives in `verimint-core`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PackedDate(pub [u8; PACKED_DATE_SIZE]);

impl PackedDate {
    pub fn from_bytes(bytes: [u8; PACKED_DATE_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; PACKED_DATE_SIZE] {
        &self.0
    }

    /// Packs a `"YYMMDD"` string, e.g. `"241209"` for 2024-12-09. The
    /// bytes are taken verbatim; validation happens at decode time.
    pub fn from_str_encoded(s: &str) -> VerimintResult<Self> {
        let bytes = s.as_bytes();
        if bytes.len() != PACKED_DATE_SIZE {
            return Err(VerimintError::Serialization(
                "Packed date must be exactly 6 bytes".into(),
            ));
        }
        let mut arr = [0u8; PACKED_DATE_SIZE];
        arr.copy_from_slice(bytes);
        Ok(Self(arr))
    }

    /// The `"000000"` sentinel meaning "unset".
    pub fn zero() -> Self {
        Self(ZERO_DATE)
    }

    pub fn is_zero_sentinel(&self) -> bool {
        self.0 == ZERO_DATE
    }

    /// Numeric value of the big-endian byte concatenation, as the circuit
    /// sees it (e.g. `"000000"` is 0x303030303030).
    pub fn to_u64(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, b| (acc << 8) | *b as u64)
    }
}

impl fmt::Debug for PackedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PackedDate({})", String::from_utf8_lossy(&self.0))
    }
}

impl fmt::Display for PackedDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.0))
    }
}

impl Default for PackedDate {
    fn default() -> Self {
        Self::zero()
    }
}
