//! A single bridge instance and the state it owns.
//!
//! Operations are split across modules by concern: [crate::deposit] for outbound transfers, [crate::claim] for
//! inbound redemption, [crate::fees] for fee accounting, [crate::reserve] for solvency reporting and [crate::admin]
//! for owner-gated configuration. All of them are `impl` blocks on [BridgeInstance].
//!
//! Every mutator takes `&mut self` and either commits all of its effects or none. Validation runs first, then the
//! single external token effect, then the writes to the instance's own state, which cannot fail at that point.

use std::{collections::BTreeMap, sync::Arc};

use alloy::primitives::{Address, U256};
use anyhow::anyhow;
use tracing::info;

use crate::{
    cfg::BridgeConfig,
    chain::Chain,
    error::{BridgeError, Result},
    event::BridgeEvent,
    ledger::{Transaction, TransactionLedger},
    registry::{TokenRegistry, TokenRegistryEntry},
    signers::SignerRegistry,
    token::TokenContract,
};

/// Scalar configuration of an instance. Only the owner can change it, through the admin operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainConfig {
    pub network_id: u64,
    /// Always at least 1.
    pub min_required_signatures: u64,
    pub mintable: bool,
    pub paused: bool,
    pub app_id: u64,
    pub owner: Address,
    pub oracle_source: Address,
    pub collateral_source: Address,
    pub bridge_reserve: U256,
}

#[derive(Debug)]
pub struct BridgeInstance {
    /// The address this instance holds custody under and signs claims against.
    pub(crate) address: Address,
    pub(crate) config: ChainConfig,
    pub(crate) signers: SignerRegistry,
    pub(crate) tokens: TokenRegistry,
    pub(crate) ledger: TransactionLedger,
    pub(crate) side_contracts: BTreeMap<u64, Address>,
    pub(crate) events: Vec<BridgeEvent>,
    pub(crate) chain: Arc<dyn Chain>,
}

impl BridgeInstance {
    /// An active instance with no signers, tokens or side contracts, identifying as the host chain's own id.
    pub fn new(address: Address, owner: Address, chain: Arc<dyn Chain>) -> Self {
        let config = ChainConfig {
            network_id: chain.chain_id(),
            min_required_signatures: 1,
            mintable: false,
            paused: false,
            app_id: 0,
            owner,
            oracle_source: Address::ZERO,
            collateral_source: Address::ZERO,
            bridge_reserve: U256::ZERO,
        };
        BridgeInstance {
            address,
            config,
            signers: SignerRegistry::default(),
            tokens: TokenRegistry::default(),
            ledger: TransactionLedger::default(),
            side_contracts: BTreeMap::new(),
            events: Vec::new(),
            chain,
        }
    }

    pub fn from_config(config: &BridgeConfig, chain: Arc<dyn Chain>) -> anyhow::Result<Self> {
        config.validate()?;

        let mut tokens = TokenRegistry::default();
        for token in &config.tokens {
            if *token.fee > crate::fees::FEE_DENOMINATOR {
                return Err(anyhow!("fee {} of token {} is above 100%", *token.fee, token.id));
            }
            tokens.add(token.id, token.address, *token.fee)?;
        }

        let instance = BridgeInstance {
            address: config.address,
            config: ChainConfig {
                network_id: config.network_id,
                min_required_signatures: config.min_required_signatures,
                mintable: config.mintable,
                paused: config.paused,
                app_id: config.app_id,
                owner: config.owner,
                oracle_source: config.oracle_source,
                collateral_source: config.collateral_source,
                bridge_reserve: *config.bridge_reserve,
            },
            signers: SignerRegistry::new(config.signers.iter().copied()),
            tokens,
            ledger: TransactionLedger::default(),
            side_contracts: config
                .side_contracts
                .iter()
                .map(|side| (side.network_id, side.address))
                .collect(),
            events: Vec::new(),
            chain,
        };
        info!(
            address = %instance.address,
            network_id = instance.config.network_id,
            signers = instance.signers.len(),
            tokens = config.tokens.len(),
            "bridge instance created from config"
        );
        Ok(instance)
    }

    pub fn address(&self) -> Address {
        self.address
    }

    pub fn config(&self) -> &ChainConfig {
        &self.config
    }

    pub fn owner(&self) -> Address {
        self.config.owner
    }

    pub fn network(&self) -> u64 {
        self.config.network_id
    }

    pub fn min_req_sigs(&self) -> u64 {
        self.config.min_required_signatures
    }

    pub fn mintable(&self) -> bool {
        self.config.mintable
    }

    pub fn paused(&self) -> bool {
        self.config.paused
    }

    pub fn app_id(&self) -> u64 {
        self.config.app_id
    }

    pub fn bridge_reserve(&self) -> U256 {
        self.config.bridge_reserve
    }

    pub fn oracle_source(&self) -> Address {
        self.config.oracle_source
    }

    pub fn collateral_source(&self) -> Address {
        self.config.collateral_source
    }

    pub fn signers(&self) -> &SignerRegistry {
        &self.signers
    }

    pub fn is_signer(&self, account: Address) -> bool {
        self.signers.contains(&account)
    }

    /// The local contract registered under `token_id`.
    pub fn token(&self, token_id: u64) -> Result<Address> {
        Ok(self.tokens.get(token_id)?.contract)
    }

    pub fn fee(&self, token_id: u64) -> Result<U256> {
        Ok(self.tokens.get(token_id)?.fee_rate)
    }

    pub fn collected_fee(&self, token_id: u64) -> Result<U256> {
        Ok(self.tokens.get(token_id)?.collected_fee)
    }

    pub fn tokens(&self) -> &TokenRegistry {
        &self.tokens
    }

    pub fn side_contract(&self, network_id: u64) -> Option<Address> {
        self.side_contracts.get(&network_id).copied()
    }

    /// Every event emitted by this instance, oldest first.
    pub fn events(&self) -> &[BridgeEvent] {
        &self.events
    }

    pub fn get_transaction(&self, tx_id: u64) -> Result<&Transaction> {
        self.ledger
            .transaction(tx_id)
            .ok_or(BridgeError::TxNotFound(tx_id))
    }

    pub fn get_user_txs(&self, user: Address, to_chain: u64) -> &[u64] {
        self.ledger.user_txs(user, to_chain)
    }

    /// For each of `tx_ids`, whether that deposit from `from_chain` has already been claimed here.
    pub fn pending_txs(&self, from_chain: u64, tx_ids: &[u64]) -> Vec<bool> {
        self.ledger.pending_txs(from_chain, tx_ids)
    }

    pub fn last_tx_id(&self) -> u64 {
        self.ledger.last_tx_id()
    }

    /// The host chain's id. This may differ from [Self::network], which the owner configures.
    pub fn get_executing_chain_id(&self) -> u64 {
        self.chain.chain_id()
    }

    pub(crate) fn ensure_owner(&self, caller: Address) -> Result<()> {
        if caller != self.config.owner {
            return Err(BridgeError::NotOwner(caller));
        }
        Ok(())
    }

    pub(crate) fn ensure_active(&self) -> Result<()> {
        if self.config.paused {
            return Err(BridgeError::Paused);
        }
        Ok(())
    }

    pub(crate) fn token_contract(&self, address: Address) -> Result<Arc<dyn TokenContract>> {
        self.chain
            .token(address)
            .ok_or(BridgeError::UnknownTokenContract(address))
    }

    pub(crate) fn registered_token(
        &self,
        token_id: u64,
    ) -> Result<(&TokenRegistryEntry, Arc<dyn TokenContract>)> {
        let entry = self.tokens.get(token_id)?;
        let contract = self.token_contract(entry.contract)?;
        Ok((entry, contract))
    }

    /// Take `amount` from `from`: burn it when mintable, otherwise move it into custody.
    pub(crate) fn collect(
        &self,
        token: &dyn TokenContract,
        from: Address,
        amount: U256,
    ) -> Result<()> {
        if self.config.mintable {
            token.burn_from(self.address, from, amount)?;
        } else {
            token.transfer_from(self.address, from, self.address, amount)?;
        }
        Ok(())
    }

    /// Give `amount` to `to`: mint it when mintable, otherwise pay it out of custody.
    pub(crate) fn release(&self, token: &dyn TokenContract, to: Address, amount: U256) -> Result<()> {
        if self.config.mintable {
            token.mint(self.address, to, amount)?;
        } else {
            let available = token.balance_of(self.address);
            if available < amount {
                return Err(BridgeError::InsufficientReserve {
                    available,
                    required: amount,
                });
            }
            token.transfer(self.address, to, amount)?;
        }
        Ok(())
    }

    pub(crate) fn emit(&mut self, event: impl Into<BridgeEvent>) {
        self.events.push(event.into());
    }
}
