//! Shared mutable ledger state, passed into the authorizer by reference.
//! Created at system activation, mutated only inside the authorizer's
//! commit step, never torn down.

use std::collections::HashSet;
use verimint_types::{Digest256, EthAddress};

use crate::token::SoulboundLedger;

pub struct MintStore {
    nullifiers: HashSet<Digest256>,
    recipients: HashSet<EthAddress>,
    tokens: SoulboundLedger,
}

impl MintStore {
    pub fn new() -> Self {
        Self {
            nullifiers: HashSet::new(),
            recipients: HashSet::new(),
            tokens: SoulboundLedger::new(),
        }
    }

    pub fn is_nullifier_used(&self, nullifier: &Digest256) -> bool {
        self.nullifiers.contains(nullifier)
    }

    pub fn is_registered(&self, recipient: &EthAddress) -> bool {
        self.recipients.contains(recipient)
    }

    /// Records a successful mint. Both sets only ever grow.
    pub(crate) fn record_mint(&mut self, nullifier: Digest256, recipient: EthAddress) {
        self.nullifiers.insert(nullifier);
        self.recipients.insert(recipient);
    }

    pub fn tokens(&self) -> &SoulboundLedger {
        &self.tokens
    }

    pub(crate) fn tokens_mut(&mut self) -> &mut SoulboundLedger {
        &mut self.tokens
    }
}

impl Default for MintStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_mint_marks_both_sets() {
        let mut store = MintStore::new();
        let nullifier = Digest256::from_u64(1);
        let recipient = EthAddress::from_bytes([7; 20]);

        assert!(!store.is_nullifier_used(&nullifier));
        assert!(!store.is_registered(&recipient));

        store.record_mint(nullifier, recipient);

        assert!(store.is_nullifier_used(&nullifier));
        assert!(store.is_registered(&recipient));
    }
}
