use alloy::primitives::{Address, B256, U256, eip191_hash_message};
use serde::{Deserialize, Serialize};

use crate::crypto::{Hash, OracleSignature, SecretKey};

/// The tuple oracles attest to when a deposit on one chain may be claimed on another.
///
/// The packed layout is `txId, fromChain, toChain, tokenId, amount` as 32-byte big-endian words, then the 20-byte
/// `user` and destination `bridge` addresses, then `appId` as a 32-byte word. Binding the destination bridge and the
/// app id stops a signature bundle for one destination or app being replayed against another.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClaimMessage {
    pub tx_id: u64,
    pub from_chain: u64,
    pub to_chain: u64,
    pub token_id: u64,
    pub amount: U256,
    pub user: Address,
    pub bridge: Address,
    pub app_id: u64,
}

/// Length of [ClaimMessage::encode_packed].
pub const PACKED_LEN: usize = 32 * 5 + 20 * 2 + 32;

impl ClaimMessage {
    pub fn encode_packed(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(PACKED_LEN);
        buf.extend_from_slice(&U256::from(self.tx_id).to_be_bytes::<32>());
        buf.extend_from_slice(&U256::from(self.from_chain).to_be_bytes::<32>());
        buf.extend_from_slice(&U256::from(self.to_chain).to_be_bytes::<32>());
        buf.extend_from_slice(&U256::from(self.token_id).to_be_bytes::<32>());
        buf.extend_from_slice(&self.amount.to_be_bytes::<32>());
        buf.extend_from_slice(self.user.as_slice());
        buf.extend_from_slice(self.bridge.as_slice());
        buf.extend_from_slice(&U256::from(self.app_id).to_be_bytes::<32>());
        buf
    }

    pub fn hash(&self) -> Hash {
        Hash::compute([self.encode_packed()])
    }

    /// The digest oracle signers sign and verifiers recover against.
    pub fn signing_hash(&self) -> B256 {
        eip191_hash_message(self.hash().as_bytes())
    }

    pub fn sign(&self, key: &SecretKey) -> anyhow::Result<OracleSignature> {
        key.sign_prehash(&self.signing_hash())
    }
}

/// A single oracle's signed statement about a [ClaimMessage].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Attestation {
    pub signer: Address,
    pub message_hash: Hash,
    pub signature: OracleSignature,
}

impl Attestation {
    pub fn new(message: &ClaimMessage, key: &SecretKey) -> anyhow::Result<Self> {
        Ok(Attestation {
            signer: key.address(),
            message_hash: message.hash(),
            signature: message.sign(key)?,
        })
    }
}
