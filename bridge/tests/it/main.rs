mod claim;
mod reserve;

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use bridge::{
    bridge::BridgeInstance,
    chain::LocalChain,
    claim::ClaimRequest,
    crypto::{OracleSignature, SecretKey},
    error::Result,
    token::{LocalToken, Role, TokenContract},
};
use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

/// Logical id of the token every deployment in the network carries.
pub const TOKEN_ID: u64 = 1;
/// Claims need this many distinct oracle signatures unless a test changes it.
pub const THRESHOLD: u64 = 2;

/// A bridge instance together with the chain it executes on and its copy of the bridged token.
pub struct Deployment {
    pub chain: Arc<LocalChain>,
    pub bridge: BridgeInstance,
    pub token: Arc<LocalToken>,
}

impl Deployment {
    pub fn network_id(&self) -> u64 {
        self.bridge.network()
    }

    pub fn address(&self) -> Address {
        self.bridge.address()
    }
}

/// A set of independently operated bridge deployments, wired to each other as side contracts, and the oracle
/// committee whose signatures they all accept.
///
/// The first deployment is the token's home chain and holds deposits in custody. Every other deployment mints on
/// claim and burns on deposit.
pub struct Network {
    pub seed: u64,
    pub rng: ChaCha8Rng,
    pub owner: Address,
    pub oracles: Vec<SecretKey>,
    pub deployments: Vec<Deployment>,
}

impl Network {
    pub fn new(mut rng: ChaCha8Rng, seed: u64) -> Network {
        let owner = Address::from(rng.r#gen::<[u8; 20]>());
        let oracle_count = rng.gen_range(3..=5usize);
        let oracles: Vec<_> = (0..oracle_count)
            .map(|_| SecretKey::new_from_rng(&mut rng))
            .collect();
        let network_ids = [1, 56, 250];

        let mut deployments: Vec<_> = network_ids
            .iter()
            .enumerate()
            .map(|(i, network_id)| {
                let chain = Arc::new(LocalChain::new(*network_id));
                let token = chain.deploy_token(Address::from(rng.r#gen::<[u8; 20]>()));
                let address = Address::from(rng.r#gen::<[u8; 20]>());

                let mut bridge = BridgeInstance::new(address, owner, chain.clone());
                bridge
                    .add_token(owner, TOKEN_ID, token.address(), U256::ZERO)
                    .unwrap();
                for oracle in &oracles {
                    bridge.add_signer(owner, oracle.address()).unwrap();
                }
                bridge.set_min_req_sigs(owner, THRESHOLD).unwrap();
                if i > 0 {
                    bridge.set_mintable(owner, true).unwrap();
                    token.grant_role(Role::Minter, address);
                    token.grant_role(Role::Burner, address);
                }

                Deployment {
                    chain,
                    bridge,
                    token,
                }
            })
            .collect();

        let addresses: Vec<_> = deployments
            .iter()
            .map(|d| (d.network_id(), d.address()))
            .collect();
        for deployment in &mut deployments {
            for (network_id, address) in &addresses {
                if *network_id != deployment.network_id() {
                    deployment
                        .bridge
                        .set_side_contract(owner, *network_id, *address)
                        .unwrap();
                }
            }
        }

        info!(seed, oracles = oracle_count, "network created");

        Network {
            seed,
            rng,
            owner,
            oracles,
            deployments,
        }
    }

    pub fn random_account(&mut self) -> Address {
        Address::from(self.rng.r#gen::<[u8; 20]>())
    }

    /// Give `user` `amount` tokens on deployment `index` and approve that deployment's bridge to take them.
    pub fn fund(&self, index: usize, user: Address, amount: U256) {
        let deployment = &self.deployments[index];
        deployment.token.credit(user, amount);
        deployment.token.approve(user, deployment.address(), amount);
    }

    /// Sign `request` for redemption on deployment `to` with the first `count` oracles.
    pub fn attest(&self, to: usize, request: &ClaimRequest, count: usize) -> Vec<OracleSignature> {
        let message = self.deployments[to].bridge.claim_message(request);
        self.oracles[..count]
            .iter()
            .map(|oracle| message.sign(oracle).unwrap())
            .collect()
    }

    /// Read deposit `tx_id` from deployment `from` and claim it on deployment `to` with a quorum of signatures.
    pub fn relay(&mut self, from: usize, to: usize, tx_id: u64) -> Result<ClaimRequest> {
        let request = ClaimRequest::from(self.deployments[from].bridge.get_transaction(tx_id)?);
        let signatures = self.attest(to, &request, THRESHOLD as usize);
        self.deployments[to].bridge.claim(&request, &signatures)?;
        Ok(request)
    }
}
