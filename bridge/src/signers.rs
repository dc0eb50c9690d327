use std::collections::BTreeSet;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};

/// The allow-list of oracle signers whose attestations count towards a quorum.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignerRegistry {
    signers: BTreeSet<Address>,
}

impl SignerRegistry {
    pub fn new(signers: impl IntoIterator<Item = Address>) -> Self {
        SignerRegistry {
            signers: signers.into_iter().collect(),
        }
    }

    /// Returns `false` if the signer was already present.
    pub fn add(&mut self, signer: Address) -> bool {
        self.signers.insert(signer)
    }

    /// Returns `false` if the signer was not present.
    pub fn remove(&mut self, signer: Address) -> bool {
        self.signers.remove(&signer)
    }

    pub fn contains(&self, signer: &Address) -> bool {
        self.signers.contains(signer)
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}
