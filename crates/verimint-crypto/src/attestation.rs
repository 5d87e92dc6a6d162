use ed25519_dalek::{Signature, Signer, SigningKey, Verifier, VerifyingKey};
use verimint_types::{Digest256, VerimintError, VerimintResult, ED25519_SIGNATURE_SIZE};

/// Replication-authenticity capability the root ledger delegates to: does
/// this attestation vouch for `new_root` becoming effective at
/// `transition_timestamp` according to the upstream source of truth?
pub trait RootAttestor {
    fn verify(
        &self,
        new_root: &Digest256,
        transition_timestamp: u64,
        attestation: &[u8],
    ) -> VerimintResult<bool>;
}

/// ed25519 attestor: the upstream replicator signs `root ‖ timestamp_be`.
pub struct Ed25519RootAttestor {
    verifying_key: VerifyingKey,
}

impl Ed25519RootAttestor {
    pub fn new(verifying_key: VerifyingKey) -> Self {
        Self { verifying_key }
    }

    pub fn from_public_key_bytes(bytes: &[u8; 32]) -> VerimintResult<Self> {
        let verifying_key = VerifyingKey::from_bytes(bytes)
            .map_err(|e| VerimintError::Crypto(e.to_string()))?;
        Ok(Self { verifying_key })
    }

    fn message(new_root: &Digest256, transition_timestamp: u64) -> Vec<u8> {
        let mut message = Vec::with_capacity(40);
        message.extend_from_slice(new_root.as_bytes());
        message.extend_from_slice(&transition_timestamp.to_be_bytes());
        message
    }

    /// Produces an attestation with the replicator's signing key. Lives
    /// here so tests and operator tooling share the exact message layout.
    pub fn sign(
        signing_key: &SigningKey,
        new_root: &Digest256,
        transition_timestamp: u64,
    ) -> Vec<u8> {
        let message = Self::message(new_root, transition_timestamp);
        signing_key.sign(&message).to_bytes().to_vec()
    }
}

impl RootAttestor for Ed25519RootAttestor {
    fn verify(
        &self,
        new_root: &Digest256,
        transition_timestamp: u64,
        attestation: &[u8],
    ) -> VerimintResult<bool> {
        if attestation.len() != ED25519_SIGNATURE_SIZE {
            return Ok(false);
        }
        let mut sig_bytes = [0u8; ED25519_SIGNATURE_SIZE];
        sig_bytes.copy_from_slice(attestation);
        let signature = Signature::from_bytes(&sig_bytes);

        let message = Self::message(new_root, transition_timestamp);
        Ok(self.verifying_key.verify(&message, &signature).is_ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::OsRng;

    #[test]
    fn test_sign_and_verify() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let attestor = Ed25519RootAttestor::new(signing_key.verifying_key());

        let root = Digest256::from_u64(77);
        let attestation = Ed25519RootAttestor::sign(&signing_key, &root, 1700000000);

        assert!(attestor.verify(&root, 1700000000, &attestation).unwrap());
    }

    #[test]
    fn test_rejects_wrong_root_or_timestamp() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let attestor = Ed25519RootAttestor::new(signing_key.verifying_key());

        let root = Digest256::from_u64(77);
        let attestation = Ed25519RootAttestor::sign(&signing_key, &root, 1700000000);

        assert!(!attestor
            .verify(&Digest256::from_u64(78), 1700000000, &attestation)
            .unwrap());
        assert!(!attestor.verify(&root, 1700000001, &attestation).unwrap());
    }

    #[test]
    fn test_rejects_malformed_attestation() {
        let signing_key = SigningKey::generate(&mut OsRng);
        let attestor = Ed25519RootAttestor::new(signing_key.verifying_key());

        assert!(!attestor
            .verify(&Digest256::from_u64(1), 1, &[0u8; 10])
            .unwrap());
    }
}
