use std::{fs, ops::Deref, path::Path, str::FromStr};

use alloy::primitives::{Address, U256};
use anyhow::{Result, anyhow};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// The genesis of a single bridge instance.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BridgeConfig {
    /// Address of this bridge instance. It is part of every claim message signed for this destination.
    pub address: Address,
    /// The account allowed to call admin operations.
    pub owner: Address,
    /// Network id this instance identifies as in deposits and claims.
    pub network_id: u64,
    /// Distinct registered signers a claim must carry. Defaults to 1.
    #[serde(default = "min_required_signatures_default")]
    pub min_required_signatures: u64,
    /// Release claimed funds by minting (and take deposits by burning) rather than from custody.
    #[serde(default)]
    pub mintable: bool,
    #[serde(default)]
    pub paused: bool,
    /// Tag included in signed messages, so attestations for one app cannot be used by another.
    #[serde(default)]
    pub app_id: u64,
    /// Where oracle attestations originate. Recorded for operators; not consulted during verification.
    #[serde(default)]
    pub oracle_source: Address,
    /// Contract publishing the global collateral ratio.
    #[serde(default)]
    pub collateral_source: Address,
    /// Declared backing amount, used for solvency reporting.
    #[serde(default)]
    pub bridge_reserve: Amount,
    /// Oracle signers authorized at genesis.
    #[serde(default)]
    pub signers: Vec<Address>,
    /// Counterpart bridges on other networks. Deposits may only target these networks.
    #[serde(default)]
    pub side_contracts: Vec<SideContract>,
    #[serde(default)]
    pub tokens: Vec<TokenConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SideContract {
    pub network_id: u64,
    pub address: Address,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TokenConfig {
    /// Logical token id, shared by every bridge instance that carries this token.
    pub id: u64,
    /// The local token contract.
    pub address: Address,
    /// Deposit fee over a denominator of 1,000,000. Defaults to zero.
    #[serde(default)]
    pub fee: Amount,
}

pub fn min_required_signatures_default() -> u64 {
    1
}

impl BridgeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.min_required_signatures == 0 {
            return Err(anyhow!("min_required_signatures must be at least 1"));
        }
        for (i, token) in self.tokens.iter().enumerate() {
            if self.tokens[..i].iter().any(|t| t.id == token.id) {
                return Err(anyhow!("token id {} is configured more than once", token.id));
            }
        }
        for (i, side) in self.side_contracts.iter().enumerate() {
            if self.side_contracts[..i]
                .iter()
                .any(|s| s.network_id == side.network_id)
            {
                return Err(anyhow!(
                    "side contract for network {} is configured more than once",
                    side.network_id
                ));
            }
        }
        Ok(())
    }
}

pub fn read_config(config_file: &Path) -> Result<BridgeConfig> {
    if !config_file.exists() {
        return Err(anyhow!("config file {config_file:?} does not exist"));
    }
    let config_content = fs::read_to_string(config_file)?;
    let config: BridgeConfig = toml::from_str(&config_content)?;
    config.validate()?;
    Ok(config)
}

/// Wrapper for [U256] that (de)serializes with a decimal string. TOML integers do not reach 256 bits.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Amount(pub U256);

impl From<U256> for Amount {
    fn from(value: U256) -> Self {
        Amount(value)
    }
}

impl From<u64> for Amount {
    fn from(value: u64) -> Self {
        Amount(U256::from(value))
    }
}

impl Deref for Amount {
    type Target = U256;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let mut res = String::deserialize(deserializer)?;
        // Remove underscores
        res.retain(|c| c != '_');
        Ok(Amount(
            U256::from_str(&res).map_err(serde::de::Error::custom)?,
        ))
    }
}
