pub mod admin;
pub mod bridge;
pub mod cfg;
pub mod chain;
pub mod claim;
pub mod crypto;
pub mod deposit;
pub mod error;
pub mod event;
pub mod fees;
pub mod ledger;
pub mod message;
pub mod registry;
pub mod reserve;
pub mod signers;
pub mod token;
pub mod verifier;
