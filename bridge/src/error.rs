use alloy::primitives::{Address, U256};

use crate::token::Role;

/// The reasons a bridge operation can be rejected.
///
/// Every public operation on a [crate::bridge::BridgeInstance] either commits all of its effects or returns one of
/// these without touching the ledger, the registries or the replay state.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum BridgeError {
    #[error("caller {0} is not the owner")]
    NotOwner(Address),
    #[error("bridge is paused")]
    Paused,
    #[error("unknown token id {0}")]
    UnknownToken(u64),
    #[error("no side contract configured for network {0}")]
    UnknownDestination(u64),
    #[error("quorum not met: {valid} distinct valid signers, {required} required")]
    QuorumNotMet { valid: usize, required: u64 },
    #[error("transaction {tx_id} from network {from_chain} has already been claimed")]
    AlreadyClaimed { from_chain: u64, tx_id: u64 },
    #[error("claim targets network {to_chain} but this bridge is network {local}")]
    WrongDestination { to_chain: u64, local: u64 },
    #[error("insufficient reserve: {available} held, {required} required")]
    InsufficientReserve { available: U256, required: U256 },
    #[error("net amount {net} is below the requested minimum {min_received}")]
    SlippageExceeded { net: U256, min_received: U256 },
    #[error("account {account} is missing role {role}")]
    MissingRolePermission { account: Address, role: Role },
    #[error("token id {0} is already registered")]
    TokenAlreadyRegistered(u64),
    #[error("minimum required signatures must be at least 1")]
    InvalidSignatureThreshold,
    #[error("fee rate {0} exceeds the fee denominator")]
    InvalidFeeRate(U256),
    #[error("no collateral ratio published at {0}")]
    CollateralSourceUnavailable(Address),
    #[error("no token contract at {0}")]
    UnknownTokenContract(Address),
    #[error("unknown transaction {0}")]
    TxNotFound(u64),
    #[error("insufficient balance: {available} held, {required} required")]
    InsufficientBalance { available: U256, required: U256 },
    #[error("insufficient allowance: {available} approved, {required} required")]
    InsufficientAllowance { available: U256, required: U256 },
    #[error("arithmetic overflow")]
    ArithmeticOverflow,
}

/// Failures reported by a token or host collaborator.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("account {account} is missing role {role}")]
    MissingRole { account: Address, role: Role },
    #[error("insufficient balance: {available} held, {required} required")]
    InsufficientBalance { available: U256, required: U256 },
    #[error("insufficient allowance: {available} approved, {required} required")]
    InsufficientAllowance { available: U256, required: U256 },
    #[error("arithmetic overflow")]
    Overflow,
}

impl From<TokenError> for BridgeError {
    fn from(error: TokenError) -> Self {
        match error {
            TokenError::MissingRole { account, role } => {
                BridgeError::MissingRolePermission { account, role }
            }
            TokenError::InsufficientBalance {
                available,
                required,
            } => BridgeError::InsufficientBalance {
                available,
                required,
            },
            TokenError::InsufficientAllowance {
                available,
                required,
            } => BridgeError::InsufficientAllowance {
                available,
                required,
            },
            TokenError::Overflow => BridgeError::ArithmeticOverflow,
        }
    }
}

pub type Result<T, E = BridgeError> = std::result::Result<T, E>;
