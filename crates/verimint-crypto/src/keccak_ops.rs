use sha3::{Digest, Keccak256};
use verimint_types::{Digest256, EthAddress, DIGEST_SIZE};

pub fn keccak256(data: &[u8]) -> Digest256 {
    let hash = Keccak256::digest(data);
    let mut bytes = [0u8; DIGEST_SIZE];
    bytes.copy_from_slice(&hash);
    Digest256::from_bytes(bytes)
}

/// Derives the `eventData` public signal binding a proof to its recipient:
/// the low 248 bits of `keccak256(recipient)` with the address ABI-padded
/// to a 32-byte word. The top byte is cleared so the value always fits the
/// BN254 scalar field without reduction.
pub fn derive_event_data(recipient: &EthAddress) -> Digest256 {
    let mut padded = [0u8; DIGEST_SIZE];
    padded[DIGEST_SIZE - verimint_types::ETH_ADDRESS_SIZE..].copy_from_slice(recipient.as_bytes());

    let mut hash = keccak256(&padded).0;
    hash[0] = 0;
    Digest256::from_bytes(hash)
}
