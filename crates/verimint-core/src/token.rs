//! The soulbound token ledger. Issuance is the only mutation that ever
//! succeeds; transfer and burn are rejected unconditionally.

use std::collections::HashMap;
use verimint_types::{Digest256, EthAddress, VerimintError, VerimintResult};

/// Token-issuance sink the authorizer commits into. Implemented by the
/// in-process [`SoulboundLedger`]; an external token registry can be
/// substituted at this seam.
pub trait TokenSink {
    fn issue(&mut self, recipient: &EthAddress, token_id: &Digest256, amount: u64)
        -> VerimintResult<()>;
}

/// In-memory non-transferable token ledger.
#[derive(Debug, Default)]
pub struct SoulboundLedger {
    balances: HashMap<(EthAddress, Digest256), u64>,
}

impl SoulboundLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn balance_of(&self, holder: &EthAddress, token_id: &Digest256) -> u64 {
        self.balances
            .get(&(*holder, *token_id))
            .copied()
            .unwrap_or(0)
    }

    /// Always fails: the credential never moves between holders.
    pub fn transfer(
        &mut self,
        _from: &EthAddress,
        _to: &EthAddress,
        _token_id: &Digest256,
        _amount: u64,
    ) -> VerimintResult<()> {
        Err(VerimintError::TransferNotAllowed)
    }

    /// Always fails: the credential cannot be destroyed once issued.
    pub fn burn(
        &mut self,
        _holder: &EthAddress,
        _token_id: &Digest256,
        _amount: u64,
    ) -> VerimintResult<()> {
        Err(VerimintError::TransferNotAllowed)
    }
}

impl TokenSink for SoulboundLedger {
    fn issue(
        &mut self,
        recipient: &EthAddress,
        token_id: &Digest256,
        amount: u64,
    ) -> VerimintResult<()> {
        let balance = self.balances.entry((*recipient, *token_id)).or_insert(0);
        *balance += amount;
        Ok(())
    }
}
