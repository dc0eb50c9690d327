use std::collections::BTreeMap;

use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistryEntry {
    pub contract: Address,
    /// Fee withheld on deposit, over [crate::fees::FEE_DENOMINATOR].
    pub fee_rate: U256,
    /// Fees withheld on deposit and not yet withdrawn.
    pub collected_fee: U256,
}

/// Maps logical token ids, which are shared across chains, to the local token contract and its fee.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRegistry {
    tokens: BTreeMap<u64, TokenRegistryEntry>,
}

impl TokenRegistry {
    /// Register a token id. Ids are permanent: an id that is already in use cannot be pointed at another contract.
    pub fn add(&mut self, token_id: u64, contract: Address, fee_rate: U256) -> Result<()> {
        if self.tokens.contains_key(&token_id) {
            return Err(BridgeError::TokenAlreadyRegistered(token_id));
        }
        self.tokens.insert(
            token_id,
            TokenRegistryEntry {
                contract,
                fee_rate,
                collected_fee: U256::ZERO,
            },
        );
        Ok(())
    }

    pub fn get(&self, token_id: u64) -> Result<&TokenRegistryEntry> {
        self.tokens
            .get(&token_id)
            .ok_or(BridgeError::UnknownToken(token_id))
    }

    pub fn get_mut(&mut self, token_id: u64) -> Result<&mut TokenRegistryEntry> {
        self.tokens
            .get_mut(&token_id)
            .ok_or(BridgeError::UnknownToken(token_id))
    }
}
