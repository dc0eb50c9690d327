//! Per-token deposit fees.

use alloy::primitives::{Address, U256};
use tracing::info;

use crate::{
    bridge::BridgeInstance,
    error::{BridgeError, Result},
};

/// Fee rates are expressed over this denominator, so 1,000,000 is 100% and 10,000 is 1%.
pub const FEE_DENOMINATOR: U256 = U256::from_limbs([1_000_000, 0, 0, 0]);

/// Split a deposit into the withheld fee and the net amount credited on the destination.
///
/// The fee rounds down, so `fee + net == amount` always holds and the depositor never pays more than the rate.
pub fn split_fee(amount: U256, rate: U256) -> Result<(U256, U256)> {
    if rate > FEE_DENOMINATOR {
        return Err(BridgeError::InvalidFeeRate(rate));
    }
    let fee = amount
        .checked_mul(rate)
        .ok_or(BridgeError::ArithmeticOverflow)?
        / FEE_DENOMINATOR;
    Ok((fee, amount - fee))
}

impl BridgeInstance {
    /// Change the fee rate of a registered token. The new rate applies to deposits made after the change.
    pub fn set_fee(&mut self, caller: Address, token_id: u64, rate: U256) -> Result<()> {
        self.ensure_owner(caller)?;
        if rate > FEE_DENOMINATOR {
            return Err(BridgeError::InvalidFeeRate(rate));
        }
        let entry = self.tokens.get_mut(token_id)?;
        let old = entry.fee_rate;
        entry.fee_rate = rate;
        info!(token_id, %old, new = %rate, "fee rate updated");
        Ok(())
    }

    /// Pay out everything collected for `token_id` to `recipient` and reset the balance to zero.
    ///
    /// Fees are released the same way claims are, by minting in mintable mode and from custody otherwise.
    pub fn withdraw_fee(
        &mut self,
        caller: Address,
        token_id: u64,
        recipient: Address,
    ) -> Result<U256> {
        self.ensure_owner(caller)?;
        let (entry, token) = self.registered_token(token_id)?;
        let amount = entry.collected_fee;

        self.release(token.as_ref(), recipient, amount)?;
        self.tokens.get_mut(token_id)?.collected_fee = U256::ZERO;

        info!(token_id, %recipient, %amount, "fees withdrawn");
        Ok(amount)
    }
}
