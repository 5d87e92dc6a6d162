//! Deterministic reconstruction of the query circuit's public signals.
//! Every signal derives from protocol constants, the resolved registry
//! root, or values the circuit itself commits to; a caller can substitute
//! none of them without breaking the proof.

use verimint_crypto::derive_event_data;
use verimint_types::{
    Digest256, EthAddress, PackedDate, UserData, PUBLIC_SIGNAL_COUNT, ZERO_DATE,
};

use crate::config::AuthorizerConfig;

/// The 15 public signals, in circuit order. Reconstructed per call and
/// never persisted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PublicSignals {
    pub event_id: Digest256,
    pub event_data: Digest256,
    pub id_state_root: Digest256,
    pub selector: Digest256,
    pub current_date: Digest256,
    pub timestamp_lowerbound: Digest256,
    pub timestamp_upperbound: Digest256,
    pub identity_counter_lowerbound: Digest256,
    pub identity_counter_upperbound: Digest256,
    pub birth_date_lowerbound: Digest256,
    pub birth_date_upperbound: Digest256,
    pub expiration_date_lowerbound: Digest256,
    pub expiration_date_upperbound: Digest256,
    pub citizenship_mask: Digest256,
    pub nullifier: Digest256,
}

/// Numeric value of the `"000000"` sentinel as the circuit sees it.
fn zero_date_word() -> Digest256 {
    Digest256::from_u64(PackedDate::from_bytes(ZERO_DATE).to_u64())
}

impl PublicSignals {
    /// Rebuilds the signal vector for a mint request.
    ///
    /// Identities registered before the authorizer activated carry a zero
    /// creation timestamp and anchor their upper bound to the activation
    /// instant; later registrations anchor to their own creation time.
    pub fn reconstruct(
        config: &AuthorizerConfig,
        resolved_root: Digest256,
        recipient: &EthAddress,
        claimed_current_date: PackedDate,
        user: &UserData,
        activation_timestamp: u64,
    ) -> Self {
        let timestamp_upperbound = if user.identity_creation_timestamp == 0 {
            activation_timestamp
        } else {
            user.identity_creation_timestamp + 1
        };

        Self {
            event_id: config.magic_token_id,
            event_data: derive_event_data(recipient),
            id_state_root: resolved_root,
            selector: Digest256::from_u64(config.selector),
            current_date: Digest256::from_u64(claimed_current_date.to_u64()),
            timestamp_lowerbound: Digest256::zero(),
            timestamp_upperbound: Digest256::from_u64(timestamp_upperbound),
            identity_counter_lowerbound: Digest256::zero(),
            identity_counter_upperbound: Digest256::from_u64(user.identity_counter + 1),
            birth_date_lowerbound: zero_date_word(),
            birth_date_upperbound: zero_date_word(),
            expiration_date_lowerbound: zero_date_word(),
            expiration_date_upperbound: zero_date_word(),
            citizenship_mask: Digest256::zero(),
            nullifier: user.nullifier,
        }
    }

    /// The vector in the order the verifier consumes it.
    pub fn to_words(&self) -> [Digest256; PUBLIC_SIGNAL_COUNT] {
        [
            self.event_id,
            self.event_data,
            self.id_state_root,
            self.selector,
            self.current_date,
            self.timestamp_lowerbound,
            self.timestamp_upperbound,
            self.identity_counter_lowerbound,
            self.identity_counter_upperbound,
            self.birth_date_lowerbound,
            self.birth_date_upperbound,
            self.expiration_date_lowerbound,
            self.expiration_date_upperbound,
            self.citizenship_mask,
            self.nullifier,
        ]
    }
}
