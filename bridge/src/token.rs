//! The capability a bridge uses to move tokens, and an in-memory token implementing it.
//!
//! The bridge never owns a token. It is handed a [TokenContract] for the address registered under a token id and
//! drives it through transfers, mints and burns. Minting and burning are gated by roles that the token's own admin
//! must grant to the bridge; the bridge cannot grant them to itself.

use std::{
    collections::{HashMap, HashSet},
    fmt::{self, Debug, Display, Formatter},
};

use alloy::primitives::{Address, U256};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::TokenError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    Minter,
    Burner,
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Role::Minter => f.write_str("MINTER_ROLE"),
            Role::Burner => f.write_str("BURNER_ROLE"),
        }
    }
}

/// Balance, transfer, mint and burn operations of a fungible token.
///
/// Each call either applies in full or returns an error and leaves the token unchanged.
pub trait TokenContract: Debug + Send + Sync {
    fn address(&self) -> Address;

    fn balance_of(&self, account: Address) -> U256;

    fn allowance(&self, owner: Address, spender: Address) -> U256;

    /// Move `amount` out of `from`, which is the caller.
    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), TokenError>;

    /// Move `amount` out of `from` on behalf of `spender`, consuming `spender`'s allowance.
    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError>;

    /// Create `amount` new tokens for `to`. `minter` must hold [Role::Minter].
    fn mint(&self, minter: Address, to: Address, amount: U256) -> Result<(), TokenError>;

    /// Destroy `amount` of `from`'s tokens, consuming `burner`'s allowance. `burner` must hold [Role::Burner].
    fn burn_from(&self, burner: Address, from: Address, amount: U256) -> Result<(), TokenError>;
}

#[derive(Debug, Default)]
struct Ledger {
    balances: HashMap<Address, U256>,
    allowances: HashMap<(Address, Address), U256>,
    roles: HashSet<(Role, Address)>,
    total_supply: U256,
}

impl Ledger {
    fn balance(&self, account: Address) -> U256 {
        self.balances.get(&account).copied().unwrap_or_default()
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.allowances
            .get(&(owner, spender))
            .copied()
            .unwrap_or_default()
    }

    fn check_role(&self, role: Role, account: Address) -> Result<(), TokenError> {
        if self.roles.contains(&(role, account)) {
            Ok(())
        } else {
            Err(TokenError::MissingRole { account, role })
        }
    }

    fn check_balance(&self, account: Address, amount: U256) -> Result<(), TokenError> {
        let available = self.balance(account);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                available,
                required: amount,
            });
        }
        Ok(())
    }

    fn check_allowance(
        &self,
        owner: Address,
        spender: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let available = self.allowance(owner, spender);
        if available < amount {
            return Err(TokenError::InsufficientAllowance {
                available,
                required: amount,
            });
        }
        Ok(())
    }

    fn spend_allowance(&mut self, owner: Address, spender: Address, amount: U256) {
        let entry = self.allowances.entry((owner, spender)).or_default();
        *entry -= amount;
    }

    fn move_balance(&mut self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        self.check_balance(from, amount)?;
        if from != to {
            self.balance(to)
                .checked_add(amount)
                .ok_or(TokenError::Overflow)?;
            *self.balances.entry(from).or_default() -= amount;
            *self.balances.entry(to).or_default() += amount;
        }
        Ok(())
    }
}

/// An in-memory token with role-gated minting and burning.
#[derive(Debug)]
pub struct LocalToken {
    address: Address,
    ledger: RwLock<Ledger>,
}

impl LocalToken {
    pub fn new(address: Address) -> Self {
        LocalToken {
            address,
            ledger: RwLock::new(Ledger::default()),
        }
    }

    pub fn total_supply(&self) -> U256 {
        self.ledger.read().total_supply
    }

    /// Issue tokens outside of the role system, as a token's admin would at genesis.
    pub fn credit(&self, account: Address, amount: U256) {
        let mut ledger = self.ledger.write();
        *ledger.balances.entry(account).or_default() += amount;
        ledger.total_supply += amount;
    }

    pub fn approve(&self, owner: Address, spender: Address, amount: U256) {
        self.ledger.write().allowances.insert((owner, spender), amount);
    }

    pub fn grant_role(&self, role: Role, account: Address) {
        self.ledger.write().roles.insert((role, account));
    }

    pub fn revoke_role(&self, role: Role, account: Address) {
        self.ledger.write().roles.remove(&(role, account));
    }

    pub fn has_role(&self, role: Role, account: Address) -> bool {
        self.ledger.read().roles.contains(&(role, account))
    }
}

impl TokenContract for LocalToken {
    fn address(&self) -> Address {
        self.address
    }

    fn balance_of(&self, account: Address) -> U256 {
        self.ledger.read().balance(account)
    }

    fn allowance(&self, owner: Address, spender: Address) -> U256 {
        self.ledger.read().allowance(owner, spender)
    }

    fn transfer(&self, from: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        self.ledger.write().move_balance(from, to, amount)
    }

    fn transfer_from(
        &self,
        spender: Address,
        from: Address,
        to: Address,
        amount: U256,
    ) -> Result<(), TokenError> {
        let mut ledger = self.ledger.write();
        if spender != from {
            ledger.check_allowance(from, spender, amount)?;
        }
        ledger.move_balance(from, to, amount)?;
        if spender != from {
            ledger.spend_allowance(from, spender, amount);
        }
        Ok(())
    }

    fn mint(&self, minter: Address, to: Address, amount: U256) -> Result<(), TokenError> {
        let mut ledger = self.ledger.write();
        ledger.check_role(Role::Minter, minter)?;
        let total_supply = ledger
            .total_supply
            .checked_add(amount)
            .ok_or(TokenError::Overflow)?;
        ledger.total_supply = total_supply;
        *ledger.balances.entry(to).or_default() += amount;
        Ok(())
    }

    fn burn_from(&self, burner: Address, from: Address, amount: U256) -> Result<(), TokenError> {
        let mut ledger = self.ledger.write();
        ledger.check_role(Role::Burner, burner)?;
        if burner != from {
            ledger.check_allowance(from, burner, amount)?;
        }
        ledger.check_balance(from, amount)?;
        if burner != from {
            ledger.spend_allowance(from, burner, amount);
        }
        *ledger.balances.entry(from).or_default() -= amount;
        ledger.total_supply -= amount;
        Ok(())
    }
}
