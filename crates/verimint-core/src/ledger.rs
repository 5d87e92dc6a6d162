//! Append-only history of replicated registry roots. Transitions must
//! advance the effective timestamp strictly and carry a valid upstream
//! attestation; superseded roots stay queryable for a policy window so
//! proofs generated shortly before an advance still authorize.

use std::collections::HashMap;
use tracing::{debug, info};
use verimint_crypto::RootAttestor;
use verimint_types::{Digest256, TransitionData, VerimintError, VerimintResult};

/// A fully checked transition, not yet applied. Produced by
/// [`RegistryRootLedger::prepare_transition`] and consumed exactly once,
/// so the authorizer can stage a transition and commit it only after the
/// rest of the mint pipeline has passed.
#[derive(Debug)]
pub struct PendingTransition {
    new_root: Digest256,
    effective_timestamp: u64,
}

pub struct RegistryRootLedger {
    current_root: Digest256,
    current_timestamp: u64,
    /// Superseded root -> timestamp at which it was replaced.
    history: HashMap<Digest256, u64>,
    validity_window: u64,
    attestor: Box<dyn RootAttestor + Send + Sync>,
}

impl RegistryRootLedger {
    pub fn new(
        genesis_root: Digest256,
        genesis_timestamp: u64,
        validity_window: u64,
        attestor: Box<dyn RootAttestor + Send + Sync>,
    ) -> Self {
        Self {
            current_root: genesis_root,
            current_timestamp: genesis_timestamp,
            history: HashMap::new(),
            validity_window,
            attestor,
        }
    }

    pub fn current_root(&self) -> Digest256 {
        self.current_root
    }

    pub fn current_timestamp(&self) -> u64 {
        self.current_timestamp
    }

    /// True for the current root and for superseded roots still inside
    /// the validity window at `now`.
    pub fn is_valid(&self, root: &Digest256, now: u64) -> bool {
        if *root == self.current_root {
            return true;
        }
        match self.history.get(root) {
            Some(replaced_at) => now <= replaced_at.saturating_add(self.validity_window),
            None => false,
        }
    }

    /// Runs every transition check without mutating state.
    pub fn prepare_transition(&self, data: &TransitionData) -> VerimintResult<PendingTransition> {
        if data.transition_timestamp <= self.current_timestamp {
            return Err(VerimintError::StaleTransition);
        }

        let attested = self.attestor.verify(
            &data.new_root,
            data.transition_timestamp,
            &data.attestation,
        )?;
        if !attested {
            return Err(VerimintError::InvalidAttestation);
        }

        Ok(PendingTransition {
            new_root: data.new_root,
            effective_timestamp: data.transition_timestamp,
        })
    }

    /// Applies a prepared transition. Infallible by construction: all
    /// checks ran in `prepare_transition`.
    pub fn commit_transition(&mut self, pending: PendingTransition) {
        debug!(
            old_root = %self.current_root,
            new_root = %pending.new_root,
            effective_timestamp = pending.effective_timestamp,
            "registry root advanced"
        );
        self.history
            .insert(self.current_root, pending.effective_timestamp);
        self.current_root = pending.new_root;
        self.current_timestamp = pending.effective_timestamp;
    }

    /// Checks and applies a transition atomically.
    pub fn transition(&mut self, data: &TransitionData) -> VerimintResult<()> {
        let pending = self.prepare_transition(data)?;
        self.commit_transition(pending);
        info!(root = %self.current_root, timestamp = self.current_timestamp, "root transition applied");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct AcceptAll;

    impl RootAttestor for AcceptAll {
        fn verify(&self, _: &Digest256, _: u64, _: &[u8]) -> VerimintResult<bool> {
            Ok(true)
        }
    }

    struct RejectAll;

    impl RootAttestor for RejectAll {
        fn verify(&self, _: &Digest256, _: u64, _: &[u8]) -> VerimintResult<bool> {
            Ok(false)
        }
    }

    fn ledger() -> RegistryRootLedger {
        RegistryRootLedger::new(Digest256::from_u64(1), 100, 1_000, Box::new(AcceptAll))
    }

    fn transition_to(root: u64, timestamp: u64) -> TransitionData {
        TransitionData::new(Digest256::from_u64(root), timestamp, vec![0xAA])
    }

    #[test]
    fn test_transition_advances_current_root() {
        let mut ledger = ledger();
        ledger.transition(&transition_to(2, 200)).unwrap();

        assert_eq!(ledger.current_root(), Digest256::from_u64(2));
        assert_eq!(ledger.current_timestamp(), 200);
    }

    #[test]
    fn test_non_increasing_timestamp_is_stale() {
        let mut ledger = ledger();
        ledger.transition(&transition_to(2, 200)).unwrap();

        assert_eq!(
            ledger.transition(&transition_to(3, 200)),
            Err(VerimintError::StaleTransition)
        );
        assert_eq!(
            ledger.transition(&transition_to(3, 150)),
            Err(VerimintError::StaleTransition)
        );
        assert_eq!(ledger.current_root(), Digest256::from_u64(2));
    }

    #[test]
    fn test_rejected_attestation() {
        let mut ledger =
            RegistryRootLedger::new(Digest256::from_u64(1), 100, 1_000, Box::new(RejectAll));

        assert_eq!(
            ledger.transition(&transition_to(2, 200)),
            Err(VerimintError::InvalidAttestation)
        );
        assert_eq!(ledger.current_root(), Digest256::from_u64(1));
    }

    #[test]
    fn test_superseded_root_valid_within_window() {
        let mut ledger = ledger();
        let old = ledger.current_root();
        ledger.transition(&transition_to(2, 200)).unwrap();

        assert!(ledger.is_valid(&old, 200));
        assert!(ledger.is_valid(&old, 1_200));
        assert!(!ledger.is_valid(&old, 1_201));
        assert!(ledger.is_valid(&ledger.current_root(), 5_000));
    }

    #[test]
    fn test_unknown_root_never_valid() {
        let ledger = ledger();
        assert!(!ledger.is_valid(&Digest256::from_u64(99), 100));
    }

    #[test]
    fn test_prepare_does_not_mutate() {
        let ledger = ledger();
        let pending = ledger.prepare_transition(&transition_to(2, 200)).unwrap();

        assert_eq!(ledger.current_root(), Digest256::from_u64(1));
        assert_eq!(pending.new_root, Digest256::from_u64(2));
    }
}
