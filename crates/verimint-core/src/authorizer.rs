//! The mint-authorization state machine. A request walks
//! root resolution → date freshness → signal reconstruction → proof
//! verification → eligibility → commit, in that fixed order; the first
//! failing check aborts with its specific error and no state change.

use tracing::{debug, info};
use verimint_crypto::{ProofGateway, ProofPoints};
use verimint_types::{
    EthAddress, MintReceipt, PackedDate, TransitionData, UserData, VerimintError, VerimintResult,
};

use crate::clock::Clock;
use crate::config::AuthorizerConfig;
use crate::date::decode_date;
use crate::ledger::RegistryRootLedger;
use crate::signals::PublicSignals;
use crate::store::MintStore;
use crate::token::TokenSink;

pub struct MintAuthorizer {
    config: AuthorizerConfig,
    root_ledger: RegistryRootLedger,
    gateway: Box<dyn ProofGateway + Send + Sync>,
    clock: Box<dyn Clock + Send + Sync>,
    activation_timestamp: u64,
}

impl MintAuthorizer {
    /// Activates the authorizer. The activation instant is the lower
    /// bound of every future date-freshness window.
    pub fn new(
        config: AuthorizerConfig,
        root_ledger: RegistryRootLedger,
        gateway: Box<dyn ProofGateway + Send + Sync>,
        clock: Box<dyn Clock + Send + Sync>,
    ) -> Self {
        let activation_timestamp = clock.now();
        info!(
            token_id = %config.magic_token_id,
            activation_timestamp,
            "mint authorizer activated"
        );
        Self {
            config,
            root_ledger,
            gateway,
            clock,
            activation_timestamp,
        }
    }

    pub fn activation_timestamp(&self) -> u64 {
        self.activation_timestamp
    }

    pub fn root_ledger(&self) -> &RegistryRootLedger {
        &self.root_ledger
    }

    /// Standalone root advance, outside any mint.
    pub fn transition_root(&mut self, data: &TransitionData) -> VerimintResult<()> {
        self.root_ledger.transition(data)
    }

    /// Authorizes and performs a single mint. Either every check passes
    /// and all commit-step writes apply together, or no write survives.
    pub fn authorize_mint(
        &mut self,
        store: &mut MintStore,
        transition: &TransitionData,
        recipient: EthAddress,
        claimed_current_date: PackedDate,
        user: &UserData,
        proof: &ProofPoints,
    ) -> VerimintResult<MintReceipt> {
        let now = self.clock.now();

        // 1. Root resolution. A non-trivial transition is staged here and
        // applied only in the commit step.
        let pending = if transition.is_trivial() {
            if !self.root_ledger.is_valid(&transition.new_root, now) {
                return Err(VerimintError::InvalidRoot(transition.new_root));
            }
            None
        } else {
            Some(self.root_ledger.prepare_transition(transition)?)
        };
        let resolved_root = transition.new_root;
        debug!(root = %resolved_root, staged = pending.is_some(), "registry root resolved");

        // 2. Date freshness.
        let claimed = decode_date(claimed_current_date)?;
        if claimed < self.activation_timestamp || claimed > now {
            return Err(VerimintError::InvalidCurrentDate {
                claimed,
                lower_bound: self.activation_timestamp,
                now,
            });
        }

        // 3. Signal reconstruction.
        let signals = PublicSignals::reconstruct(
            &self.config,
            resolved_root,
            &recipient,
            claimed_current_date,
            user,
            self.activation_timestamp,
        );

        // 4. Proof verification.
        if !self.gateway.verify(proof, &signals.to_words())? {
            return Err(VerimintError::InvalidProof);
        }

        // 5. Eligibility.
        if store.is_nullifier_used(&user.nullifier) {
            return Err(VerimintError::NullifierUsed(user.nullifier));
        }
        if store.is_registered(&recipient) {
            return Err(VerimintError::UserAlreadyRegistered(recipient));
        }

        // 6. Commit. The issuance sink runs first so a sink failure
        // leaves no trace either.
        store
            .tokens_mut()
            .issue(&recipient, &self.config.magic_token_id, 1)?;
        store.record_mint(user.nullifier, recipient);
        if let Some(pending) = pending {
            self.root_ledger.commit_transition(pending);
        }

        let receipt = MintReceipt {
            recipient,
            token_id: self.config.magic_token_id,
            amount: 1,
            nullifier: user.nullifier,
        };
        info!(
            recipient = %receipt.recipient,
            token_id = %receipt.token_id,
            nullifier = %receipt.nullifier,
            "credential minted"
        );
        Ok(receipt)
    }
}
