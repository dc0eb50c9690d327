//! Inbound redemption of deposits made on other chains.

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::{
    bridge::BridgeInstance,
    crypto::OracleSignature,
    error::{BridgeError, Result},
    event::Claim,
    ledger::Transaction,
    message::ClaimMessage,
    verifier::ClaimVerifier,
};

/// The deposit a user is claiming, as recorded by the source instance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimRequest {
    pub user: Address,
    pub amount: U256,
    pub from_chain: u64,
    pub to_chain: u64,
    pub token_id: u64,
    pub tx_id: u64,
}

impl ClaimRequest {
    /// The message oracles sign to authorize this claim on the bridge at `bridge`.
    pub fn message(&self, bridge: Address, app_id: u64) -> ClaimMessage {
        ClaimMessage {
            tx_id: self.tx_id,
            from_chain: self.from_chain,
            to_chain: self.to_chain,
            token_id: self.token_id,
            amount: self.amount,
            user: self.user,
            bridge,
            app_id,
        }
    }
}

impl From<&Transaction> for ClaimRequest {
    fn from(tx: &Transaction) -> Self {
        ClaimRequest {
            user: tx.user,
            amount: tx.amount,
            from_chain: tx.from_chain,
            to_chain: tx.to_chain,
            token_id: tx.token_id,
            tx_id: tx.tx_id,
        }
    }
}

impl BridgeInstance {
    /// The message this instance expects oracles to have signed for `request`.
    pub fn claim_message(&self, request: &ClaimRequest) -> ClaimMessage {
        request.message(self.address, self.config.app_id)
    }

    /// Redeem a deposit from another chain, authorized by a quorum of oracle signatures.
    ///
    /// Anyone may submit a claim; funds always go to `request.user`. Each `(from_chain, tx_id)` pays out at most once.
    pub fn claim(&mut self, request: &ClaimRequest, signatures: &[OracleSignature]) -> Result<()> {
        let result = self.process_claim(request, signatures);
        if let Err(e) = &result {
            warn!(
                from_chain = request.from_chain,
                tx_id = request.tx_id,
                %e,
                "claim rejected"
            );
        }
        result
    }

    fn process_claim(
        &mut self,
        request: &ClaimRequest,
        signatures: &[OracleSignature],
    ) -> Result<()> {
        self.ensure_active()?;
        if request.to_chain != self.config.network_id {
            return Err(BridgeError::WrongDestination {
                to_chain: request.to_chain,
                local: self.config.network_id,
            });
        }
        self.ledger.ensure_unclaimed(request.from_chain, request.tx_id)?;
        let (_, token) = self.registered_token(request.token_id)?;

        let message = self.claim_message(request);
        let signers = ClaimVerifier::new(&self.signers, self.config.min_required_signatures)
            .verify(&message, signatures)?;

        self.release(token.as_ref(), request.user, request.amount)?;
        self.ledger.mark_claimed(request.from_chain, request.tx_id)?;

        info!(
            from_chain = request.from_chain,
            tx_id = request.tx_id,
            user = %request.user,
            token_id = request.token_id,
            amount = %request.amount,
            signers = signers.len(),
            "claim paid"
        );
        self.emit(Claim {
            user: request.user,
            amount: request.amount,
            from_chain: request.from_chain,
            to_chain: request.to_chain,
            token_id: request.token_id,
            tx_id: request.tx_id,
        });

        Ok(())
    }
}
