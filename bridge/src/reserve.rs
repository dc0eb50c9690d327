use alloy::primitives::U256;

use crate::{
    bridge::BridgeInstance,
    error::{BridgeError, Result},
};

/// Collateral ratios are published over this denominator, so 1,000,000 is fully collateralized.
pub const COLLATERAL_RATIO_DENOMINATOR: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

impl BridgeInstance {
    /// The dollar value backing the declared reserve: `bridge_reserve * collateral_ratio / 1e6`.
    ///
    /// This is reporting only. It never changes state and never gates a deposit or claim.
    pub fn collat_dollar_balance(&self) -> Result<U256> {
        let source = self.config.collateral_source;
        let ratio = self
            .chain
            .collateral_ratio(source)
            .ok_or(BridgeError::CollateralSourceUnavailable(source))?;
        let value = self
            .config
            .bridge_reserve
            .checked_mul(ratio)
            .ok_or(BridgeError::ArithmeticOverflow)?;
        Ok(value / COLLATERAL_RATIO_DENOMINATOR)
    }
}
