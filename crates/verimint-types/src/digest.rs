use crate::{VerimintError, VerimintResult, DIGEST_SIZE};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 256-bit word in big-endian byte order. Used for registry roots,
/// nullifiers and public-signal values alike; the circuit treats all of
/// them as BN254 field elements reduced modulo the scalar field.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Digest256(pub [u8; DIGEST_SIZE]);

impl Digest256 {
    pub fn from_bytes(bytes: [u8; DIGEST_SIZE]) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Embeds a small integer as a big-endian 256-bit word.
    pub fn from_u64(value: u64) -> Self {
        let mut bytes = [0u8; DIGEST_SIZE];
        bytes[DIGEST_SIZE - 8..].copy_from_slice(&value.to_be_bytes());
        Self(bytes)
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.0))
    }

    pub fn from_hex(s: &str) -> VerimintResult<Self> {
        let s = s.strip_prefix("0x").unwrap_or(s);
        let bytes = hex::decode(s).map_err(|e| VerimintError::Serialization(e.to_string()))?;
        if bytes.len() > DIGEST_SIZE {
            return Err(VerimintError::Serialization("Digest too long".into()));
        }
        // Left-pad short values, matching big-endian numeric parsing.
        let mut arr = [0u8; DIGEST_SIZE];
        arr[DIGEST_SIZE - bytes.len()..].copy_from_slice(&bytes);
        Ok(Self(arr))
    }

    pub fn zero() -> Self {
        Self([0u8; DIGEST_SIZE])
    }

    pub fn is_zero(&self) -> bool {
        self.0.iter().all(|b| *b == 0)
    }
}

impl fmt::Debug for Digest256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest256({}...)", &self.to_hex()[..18])
    }
}

impl fmt::Display for Digest256 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl Default for Digest256 {
    fn default() -> Self {
        Self::zero()
    }
}

impl From<u64> for Digest256 {
    fn from(value: u64) -> Self {
        Self::from_u64(value)
    }
}
