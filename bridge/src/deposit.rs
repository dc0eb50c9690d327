//! Outbound transfers.

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    bridge::BridgeInstance,
    error::{BridgeError, Result},
    event::Deposit,
    fees::split_fee,
    ledger::Transaction,
};

impl BridgeInstance {
    /// Deposit `amount` of `token_id` from `caller` to `caller`'s own account on `to_chain`.
    pub fn deposit(
        &mut self,
        caller: Address,
        amount: U256,
        to_chain: u64,
        token_id: u64,
    ) -> Result<Transaction> {
        self.process_deposit(caller, caller, amount, to_chain, token_id, U256::ZERO)
    }

    /// As [Self::deposit], failing with [BridgeError::SlippageExceeded] if less than `min_received` would arrive.
    pub fn deposit_with_min(
        &mut self,
        caller: Address,
        amount: U256,
        to_chain: u64,
        token_id: u64,
        min_received: U256,
    ) -> Result<Transaction> {
        self.process_deposit(caller, caller, amount, to_chain, token_id, min_received)
    }

    /// Deposit `amount` of `caller`'s tokens for `user` to receive on `to_chain`.
    pub fn deposit_for(
        &mut self,
        caller: Address,
        user: Address,
        amount: U256,
        to_chain: u64,
        token_id: u64,
    ) -> Result<Transaction> {
        self.process_deposit(caller, user, amount, to_chain, token_id, U256::ZERO)
    }

    pub fn deposit_for_with_min(
        &mut self,
        caller: Address,
        user: Address,
        amount: U256,
        to_chain: u64,
        token_id: u64,
        min_received: U256,
    ) -> Result<Transaction> {
        self.process_deposit(caller, user, amount, to_chain, token_id, min_received)
    }

    fn process_deposit(
        &mut self,
        caller: Address,
        user: Address,
        amount: U256,
        to_chain: u64,
        token_id: u64,
        min_received: U256,
    ) -> Result<Transaction> {
        self.ensure_active()?;
        let (entry, token) = self.registered_token(token_id)?;
        if !self.side_contracts.contains_key(&to_chain) {
            return Err(BridgeError::UnknownDestination(to_chain));
        }

        let (fee, net) = split_fee(amount, entry.fee_rate)?;
        if net < min_received {
            return Err(BridgeError::SlippageExceeded { net, min_received });
        }
        let collected_fee = entry
            .collected_fee
            .checked_add(fee)
            .ok_or(BridgeError::ArithmeticOverflow)?;
        self.ledger.next_tx_id()?;

        self.collect(token.as_ref(), caller, amount)?;

        self.tokens.get_mut(token_id)?.collected_fee = collected_fee;
        let network_id = self.config.network_id;
        let transaction = self.ledger.record(token_id, net, network_id, to_chain, user)?;

        info!(
            tx_id = transaction.tx_id,
            %caller,
            %user,
            token_id,
            to_chain,
            %amount,
            %fee,
            "deposit recorded"
        );
        self.emit(Deposit {
            user,
            to_chain,
            token_id,
            tx_id: transaction.tx_id,
            amount: net,
        });

        Ok(transaction)
    }
}
