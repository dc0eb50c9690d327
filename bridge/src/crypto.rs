//! A collection of cryptographic primitives used by the bridge and its oracles.
//!
//! The exact implementations of these primitives is an implementation detail for this module only and dependents
//! should not care about the implementations. Oracle attestations are Ethereum-style recoverable secp256k1
//! signatures, and signer identities are the Ethereum addresses derived from the recovered public keys.

use std::fmt::{self, Debug, Display, Formatter};

use alloy::primitives::{Address, B256, PrimitiveSignature};
use anyhow::{Result, anyhow};
use k256::ecdsa::SigningKey;
use serde::{
    Deserialize, Serialize,
    de::{self, Unexpected},
};
use sha3::{Digest, Keccak256};

#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Hash(pub [u8; 32]);

impl Hash {
    pub const ZERO: Hash = Hash([0; 32]);

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn compute<T: AsRef<[S]>, S: AsRef<[u8]>>(preimages: T) -> Hash {
        let mut hasher = Keccak256::new();
        for preimage in preimages.as_ref() {
            hasher.update(preimage.as_ref());
        }
        Self(hasher.finalize().into())
    }
}

impl Display for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

impl Debug for Hash {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", hex::encode(self.as_bytes()))
    }
}

/// A recoverable ECDSA signature laid out as `r || s || v`.
///
/// `v` is accepted both in its Ethereum form (27 or 28) and as a raw recovery id (0 or 1). It is always written
/// back out as 27 or 28.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct OracleSignature(PrimitiveSignature);

impl OracleSignature {
    pub fn from_bytes(bytes: &[u8]) -> Result<OracleSignature> {
        let bytes: &[u8; 65] = bytes
            .try_into()
            .map_err(|_| anyhow!("signature must be 65 bytes, got {}", bytes.len()))?;
        // EIP-155 style `v` values carry a chain id and are never produced by an oracle.
        let v = bytes[64];
        if !matches!(v, 0 | 1 | 27 | 28) {
            return Err(anyhow!("invalid recovery id: {v}"));
        }
        Ok(OracleSignature(PrimitiveSignature::from_raw_array(bytes)?))
    }

    pub fn from_hex(s: &str) -> Result<OracleSignature> {
        let bytes = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Self::from_bytes(&bytes)
    }

    pub fn as_bytes(&self) -> [u8; 65] {
        self.0.as_bytes()
    }

    pub fn to_hex(&self) -> String {
        format!("0x{}", hex::encode(self.as_bytes()))
    }

    /// Recover the address of the key which produced this signature over `prehash`.
    pub fn recover(&self, prehash: &B256) -> Result<Address> {
        Ok(self.0.recover_address_from_prehash(prehash)?)
    }
}

impl From<PrimitiveSignature> for OracleSignature {
    fn from(signature: PrimitiveSignature) -> Self {
        OracleSignature(signature)
    }
}

impl Display for OracleSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Debug for OracleSignature {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for OracleSignature {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_hex().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for OracleSignature {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        OracleSignature::from_hex(&s)
            .map_err(|_| de::Error::invalid_value(Unexpected::Str(&s), &"a 65-byte hex signature"))
    }
}

/// The secret key of an oracle signer.
#[derive(Debug, Clone)]
pub struct SecretKey {
    key: SigningKey,
}

impl SecretKey {
    pub fn new_from_rng<R: rand::Rng + rand::CryptoRng>(rng: &mut R) -> SecretKey {
        SecretKey {
            key: SigningKey::random(rng),
        }
    }

    /// Fails if the bytes are zero or not a valid scalar.
    pub fn from_bytes(bytes: &[u8]) -> Result<SecretKey> {
        Ok(SecretKey {
            key: SigningKey::from_slice(bytes)?,
        })
    }

    pub fn from_hex(s: &str) -> Result<SecretKey> {
        let bytes_vec = hex::decode(s.strip_prefix("0x").unwrap_or(s))?;
        Self::from_bytes(&bytes_vec)
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.key.to_bytes())
    }

    pub fn address(&self) -> Address {
        Address::from_public_key(self.key.verifying_key())
    }

    /// Sign an already hashed message.
    pub fn sign_prehash(&self, prehash: &B256) -> Result<OracleSignature> {
        let signature = self.key.sign_prehash_recoverable(prehash.as_slice())?;
        Ok(PrimitiveSignature::from(signature).into())
    }
}
