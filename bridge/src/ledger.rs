//! Outbound deposit records and the inbound replay-protection set.
//!
//! Both halves are append-only. A deposit record is never changed once written, and a `(fromChain, txId)` pair that
//! has been claimed stays claimed for the life of the instance.

use std::collections::{BTreeMap, BTreeSet};

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// An outbound deposit, as oracles read it when attesting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub tx_id: u64,
    pub token_id: u64,
    /// The amount credited on the destination, after fees.
    pub amount: U256,
    pub from_chain: u64,
    pub to_chain: u64,
    pub user: Address,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionLedger {
    /// The id of the most recent deposit, or zero before the first one. Ids start at 1.
    last_tx_id: u64,
    transactions: BTreeMap<u64, Transaction>,
    /// user -> destination network -> deposit ids, in deposit order.
    user_txs: BTreeMap<Address, BTreeMap<u64, Vec<u64>>>,
    /// source network -> claimed deposit ids.
    claimed: BTreeMap<u64, BTreeSet<u64>>,
}

impl TransactionLedger {
    pub fn last_tx_id(&self) -> u64 {
        self.last_tx_id
    }

    /// The id the next deposit will receive.
    pub fn next_tx_id(&self) -> Result<u64> {
        self.last_tx_id
            .checked_add(1)
            .ok_or(BridgeError::ArithmeticOverflow)
    }

    /// Append a deposit under the next id and index it for its user.
    pub fn record(
        &mut self,
        token_id: u64,
        amount: U256,
        from_chain: u64,
        to_chain: u64,
        user: Address,
    ) -> Result<Transaction> {
        let tx_id = self.next_tx_id()?;
        let transaction = Transaction {
            tx_id,
            token_id,
            amount,
            from_chain,
            to_chain,
            user,
        };

        self.last_tx_id = tx_id;
        self.transactions.insert(tx_id, transaction.clone());
        self.user_txs
            .entry(user)
            .or_default()
            .entry(to_chain)
            .or_default()
            .push(tx_id);

        Ok(transaction)
    }

    pub fn transaction(&self, tx_id: u64) -> Option<&Transaction> {
        self.transactions.get(&tx_id)
    }

    pub fn user_txs(&self, user: Address, to_chain: u64) -> &[u64] {
        self.user_txs
            .get(&user)
            .and_then(|by_chain| by_chain.get(&to_chain))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn is_claimed(&self, from_chain: u64, tx_id: u64) -> bool {
        self.claimed
            .get(&from_chain)
            .is_some_and(|ids| ids.contains(&tx_id))
    }

    pub fn ensure_unclaimed(&self, from_chain: u64, tx_id: u64) -> Result<()> {
        if self.is_claimed(from_chain, tx_id) {
            return Err(BridgeError::AlreadyClaimed { from_chain, tx_id });
        }
        Ok(())
    }

    /// Consume `(from_chain, tx_id)`. This succeeds at most once per pair.
    pub fn mark_claimed(&mut self, from_chain: u64, tx_id: u64) -> Result<()> {
        if !self.claimed.entry(from_chain).or_default().insert(tx_id) {
            return Err(BridgeError::AlreadyClaimed { from_chain, tx_id });
        }
        Ok(())
    }

    /// For each id, whether it has been claimed from `from_chain`.
    pub fn pending_txs(&self, from_chain: u64, tx_ids: &[u64]) -> Vec<bool> {
        tx_ids
            .iter()
            .map(|tx_id| self.is_claimed(from_chain, *tx_id))
            .collect()
    }
}
