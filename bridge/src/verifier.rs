//! Threshold verification of oracle signature bundles.

use std::collections::BTreeSet;

use alloy::primitives::Address;
use tracing::debug;

use crate::{
    crypto::OracleSignature,
    error::{BridgeError, Result},
    message::ClaimMessage,
    signers::SignerRegistry,
};

/// Checks a bundle of signatures over a [ClaimMessage] against a snapshot of the signer registry.
///
/// Verification is pure. Any party holding the same registry and threshold reaches the same verdict for the same
/// bundle.
#[derive(Debug, Clone, Copy)]
pub struct ClaimVerifier<'a> {
    registry: &'a SignerRegistry,
    min_required_signatures: u64,
}

impl<'a> ClaimVerifier<'a> {
    pub fn new(registry: &'a SignerRegistry, min_required_signatures: u64) -> Self {
        ClaimVerifier {
            registry,
            min_required_signatures,
        }
    }

    /// The distinct registered signers of `message` in `signatures`, in the order they first appear.
    ///
    /// Malformed signatures, signatures from unregistered keys and repeated signers are discarded.
    pub fn valid_signers(
        &self,
        message: &ClaimMessage,
        signatures: &[OracleSignature],
    ) -> Vec<Address> {
        let prehash = message.signing_hash();
        let mut seen = BTreeSet::new();
        let mut signers = Vec::new();

        for signature in signatures {
            let signer = match signature.recover(&prehash) {
                Ok(signer) => signer,
                Err(e) => {
                    debug!(%signature, %e, "discarding unrecoverable signature");
                    continue;
                }
            };
            if !self.registry.contains(&signer) {
                debug!(%signer, "discarding signature from unregistered signer");
                continue;
            }
            if !seen.insert(signer) {
                debug!(%signer, "discarding duplicate signature");
                continue;
            }
            signers.push(signer);
        }

        signers
    }

    /// Succeeds with the distinct valid signers iff there are at least `min_required_signatures` of them.
    pub fn verify(
        &self,
        message: &ClaimMessage,
        signatures: &[OracleSignature],
    ) -> Result<Vec<Address>> {
        let signers = self.valid_signers(message, signatures);
        // Count, not fraction: the threshold is absolute regardless of how large the registry is.
        if (signers.len() as u64) < self.min_required_signatures {
            return Err(BridgeError::QuorumNotMet {
                valid: signers.len(),
                required: self.min_required_signatures,
            });
        }
        debug!(
            message_hash = %message.hash(),
            valid = signers.len(),
            required = self.min_required_signatures,
            "quorum met"
        );
        Ok(signers)
    }
}
