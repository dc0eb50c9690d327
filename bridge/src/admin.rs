//! Owner-gated configuration.
//!
//! Every operation here fails with [BridgeError::NotOwner] unless `caller` is the current owner, and none of them are
//! affected by the pause switch.

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    bridge::BridgeInstance,
    error::{BridgeError, Result},
    fees::FEE_DENOMINATOR,
};

impl BridgeInstance {
    pub fn set_network_id(&mut self, caller: Address, network_id: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.network_id = network_id;
        info!(network_id, "network id updated");
        Ok(())
    }

    /// Register the counterpart bridge on `network_id`, making it a valid deposit destination.
    pub fn set_side_contract(
        &mut self,
        caller: Address,
        network_id: u64,
        address: Address,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        self.side_contracts.insert(network_id, address);
        info!(network_id, %address, "side contract set");
        Ok(())
    }

    pub fn add_token(
        &mut self,
        caller: Address,
        token_id: u64,
        contract: Address,
        fee_rate: U256,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        if fee_rate > FEE_DENOMINATOR {
            return Err(BridgeError::InvalidFeeRate(fee_rate));
        }
        self.tokens.add(token_id, contract, fee_rate)?;
        info!(token_id, %contract, %fee_rate, "token registered");
        Ok(())
    }

    pub fn set_mintable(&mut self, caller: Address, mintable: bool) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.mintable = mintable;
        info!(mintable, "mintable mode updated");
        Ok(())
    }

    /// Adding a signer that is already registered is a no-op.
    pub fn add_signer(&mut self, caller: Address, signer: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.signers.add(signer) {
            info!(%signer, signers = self.signers.len(), "signer added");
        }
        Ok(())
    }

    /// Claims already paid on the strength of this signer stay paid.
    pub fn remove_signer(&mut self, caller: Address, signer: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        if self.signers.remove(signer) {
            info!(%signer, signers = self.signers.len(), "signer removed");
        }
        Ok(())
    }

    /// The new threshold applies to claims evaluated from now on.
    pub fn set_min_req_sigs(
        &mut self,
        caller: Address,
        min_required_signatures: u64,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        if min_required_signatures == 0 {
            return Err(BridgeError::InvalidSignatureThreshold);
        }
        self.config.min_required_signatures = min_required_signatures;
        info!(min_required_signatures, "signature threshold updated");
        Ok(())
    }

    pub fn set_app_id(&mut self, caller: Address, app_id: u64) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.app_id = app_id;
        info!(app_id, "app id updated");
        Ok(())
    }

    pub fn set_oracle_source(&mut self, caller: Address, oracle_source: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.oracle_source = oracle_source;
        info!(%oracle_source, "oracle source updated");
        Ok(())
    }

    pub fn set_collateral_source(
        &mut self,
        caller: Address,
        collateral_source: Address,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.collateral_source = collateral_source;
        info!(%collateral_source, "collateral source updated");
        Ok(())
    }

    pub fn set_bridge_reserve(&mut self, caller: Address, bridge_reserve: U256) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.bridge_reserve = bridge_reserve;
        info!(%bridge_reserve, "bridge reserve updated");
        Ok(())
    }

    /// Halt deposits and claims. Pausing an already paused bridge succeeds.
    pub fn pause(&mut self, caller: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.paused = true;
        info!("bridge paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.paused = false;
        info!("bridge unpaused");
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        self.ensure_owner(caller)?;
        self.config.owner = new_owner;
        info!(previous = %caller, %new_owner, "ownership transferred");
        Ok(())
    }

    /// Send `amount` of the bridge's native balance to `to`.
    pub fn emergency_withdraw_native(
        &mut self,
        caller: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        self.chain.transfer_native(self.address, to, amount)?;
        info!(%to, %amount, "emergency native withdrawal");
        Ok(())
    }

    /// Send `amount` of any token the bridge holds to `to`, whether or not it is registered.
    pub fn emergency_withdraw_token(
        &mut self,
        caller: Address,
        token: Address,
        to: Address,
        amount: U256,
    ) -> Result<()> {
        self.ensure_owner(caller)?;
        let contract = self.token_contract(token)?;
        contract.transfer(self.address, to, amount)?;
        info!(%token, %to, %amount, "emergency token withdrawal");
        Ok(())
    }
}
