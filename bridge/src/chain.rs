//! The host chain a bridge instance executes on.

use std::{collections::HashMap, fmt::Debug, sync::Arc};

use alloy::primitives::{Address, U256};
use parking_lot::RwLock;

use crate::{
    error::TokenError,
    token::{LocalToken, TokenContract},
};

/// Everything a bridge instance reads from or asks of the chain it runs on.
pub trait Chain: Debug + Send + Sync {
    /// The chain's native identity, independent of any configured network id.
    fn chain_id(&self) -> u64;

    /// Resolve the token contract deployed at `address`.
    fn token(&self, address: Address) -> Option<Arc<dyn TokenContract>>;

    fn native_balance(&self, account: Address) -> U256;

    fn transfer_native(&self, from: Address, to: Address, amount: U256) -> Result<(), TokenError>;

    /// The global collateral ratio published by the contract at `source`, over a denominator of 1e6.
    fn collateral_ratio(&self, source: Address) -> Option<U256>;
}

/// An in-memory chain holding token contracts, native balances and collateral-ratio publishers.
#[derive(Debug)]
pub struct LocalChain {
    chain_id: u64,
    tokens: RwLock<HashMap<Address, Arc<LocalToken>>>,
    native_balances: RwLock<HashMap<Address, U256>>,
    collateral_ratios: RwLock<HashMap<Address, U256>>,
}

impl LocalChain {
    pub fn new(chain_id: u64) -> Self {
        LocalChain {
            chain_id,
            tokens: RwLock::new(HashMap::new()),
            native_balances: RwLock::new(HashMap::new()),
            collateral_ratios: RwLock::new(HashMap::new()),
        }
    }

    /// Deploy a fresh token at `address`, replacing whatever was there.
    pub fn deploy_token(&self, address: Address) -> Arc<LocalToken> {
        let token = Arc::new(LocalToken::new(address));
        self.tokens.write().insert(address, token.clone());
        token
    }

    pub fn local_token(&self, address: Address) -> Option<Arc<LocalToken>> {
        self.tokens.read().get(&address).cloned()
    }

    pub fn set_native_balance(&self, account: Address, balance: U256) {
        self.native_balances.write().insert(account, balance);
    }

    pub fn set_collateral_ratio(&self, source: Address, ratio: U256) {
        self.collateral_ratios.write().insert(source, ratio);
    }
}

impl Chain for LocalChain {
    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    fn token(&self, address: Address) -> Option<Arc<dyn TokenContract>> {
        self.tokens
            .read()
            .get(&address)
            .map(|token| token.clone() as Arc<dyn TokenContract>)
    }

    fn native_balance(&self, account: Address) -> U256 {
        self.native_balances
            .read()
            .get(&account)
            .copied()
            .unwrap_or_default()
    }

    fn transfer_native(&self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        let mut balances = self.native_balances.write();
        let available = balances.get(&from).copied().unwrap_or_default();
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        if from != to {
            let credited = balances
                .get(&to)
                .copied()
                .unwrap_or_default()
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            balances.insert(from, available - amount);
            balances.insert(to, credited);
        }
        Ok(())
    }

    fn collateral_ratio(&self, source: Address) -> Option<U256> {
        self.collateral_ratios.read().get(&source).copied()
    }
}
