use crate::{Digest256, EthAddress};
use serde::{Deserialize, Serialize};

/// A registry-root transition instruction attached to a mint request.
///
/// The zeroed form (`transition_timestamp == 0`, empty attestation) means
/// "no transition": the referenced root must already be known to the
/// ledger. Consumed once; never retained after being applied.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionData {
    pub new_root: Digest256,
    pub transition_timestamp: u64,
    pub attestation: Vec<u8>,
}

impl TransitionData {
    /// A transition instruction carrying an upstream attestation.
    pub fn new(new_root: Digest256, transition_timestamp: u64, attestation: Vec<u8>) -> Self {
        Self {
            new_root,
            transition_timestamp,
            attestation,
        }
    }

    /// The "no transition" form: reference an already-known root.
    pub fn existing_root(root: Digest256) -> Self {
        Self {
            new_root: root,
            transition_timestamp: 0,
            attestation: Vec::new(),
        }
    }

    pub fn is_trivial(&self) -> bool {
        self.transition_timestamp == 0 && self.attestation.is_empty()
    }
}

/// Per-recipient metadata accompanying a mint request. The nullifier is
/// derived inside the proof circuit from the private identity witness;
/// everything here is re-checked against the reconstructed signals.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserData {
    pub nullifier: Digest256,
    pub identity_creation_timestamp: u64,
    pub identity_counter: u64,
}

/// Emitted on a successful mint.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MintReceipt {
    pub recipient: EthAddress,
    pub token_id: Digest256,
    pub amount: u64,
    pub nullifier: Digest256,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_transition_form() {
        let root = Digest256::from_u64(42);
        assert!(TransitionData::existing_root(root).is_trivial());
        assert!(!TransitionData::new(root, 100, vec![]).is_trivial());
        assert!(!TransitionData::new(root, 0, vec![1]).is_trivial());
    }

    #[test]
    fn test_transition_serde_roundtrip() {
        let td = TransitionData::new(Digest256::from_u64(7), 1700000000, vec![1, 2, 3]);
        let json = serde_json::to_string(&td).unwrap();
        let back: TransitionData = serde_json::from_str(&json).unwrap();
        assert_eq!(td, back);
    }
}
