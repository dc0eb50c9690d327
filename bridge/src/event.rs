use alloy::primitives::{Address, U256};
use serde::{Deserialize, Serialize};

/// Emitted when a deposit is recorded. `amount` is the net amount after fees.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deposit {
    pub user: Address,
    pub to_chain: u64,
    pub token_id: u64,
    pub tx_id: u64,
    pub amount: U256,
}

/// Emitted when a claim releases funds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claim {
    pub user: Address,
    pub amount: U256,
    pub from_chain: u64,
    pub to_chain: u64,
    pub token_id: u64,
    pub tx_id: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum BridgeEvent {
    Deposit(Deposit),
    Claim(Claim),
}

impl From<Deposit> for BridgeEvent {
    fn from(event: Deposit) -> Self {
        BridgeEvent::Deposit(event)
    }
}

impl From<Claim> for BridgeEvent {
    fn from(event: Claim) -> Self {
        BridgeEvent::Claim(event)
    }
}
