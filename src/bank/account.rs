use std::fmt;

use crate::Amount;
use crate::model::AccountId;

use super::{DepositError, WithdrawalError};

/// A named account with its balance.
///
/// Equality is structural over id, name and balance.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Account {
    id: AccountId,
    name: String,
    balance: Amount,
}

impl Account {
    /// Open an account under a freshly generated id.
    pub fn new(name: impl Into<String>, balance: Amount) -> Self {
        Self::with_id(AccountId::generate(), name, balance)
    }

    pub fn with_id(id: AccountId, name: impl Into<String>, balance: Amount) -> Self {
        Self {
            id,
            name: name.into(),
            balance,
        }
    }

    pub fn id(&self) -> AccountId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn balance(&self) -> Amount {
        self.balance
    }

    /// Balance rendered with two decimals and the currency marker.
    pub fn balance_display(&self) -> String {
        self.balance.to_string()
    }

    /// Take `total` out of the account, all or nothing.
    pub fn withdraw(&mut self, total: Amount) -> Result<(), WithdrawalError> {
        if total.is_negative() {
            return Err(WithdrawalError::NegativeAmount(self.id, total));
        }
        let (id, balance) = (self.id, self.balance);
        self.balance = balance
            .checked_sub(total)
            .filter(|_| balance >= total)
            .ok_or(WithdrawalError::InsufficientFunds(id, balance, total))?;

        Ok(())
    }

    /// Add `amount` to the balance. There is no upper bound besides the range
    /// of [`Amount`].
    pub fn deposit(&mut self, amount: Amount) -> Result<(), DepositError> {
        if amount.is_negative() {
            return Err(DepositError::NegativeAmount(self.id, amount));
        }
        self.balance = self
            .balance
            .checked_add(amount)
            .ok_or(DepositError::Overflow(self.id, self.balance, amount))?;

        Ok(())
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f, "Balance: {}", self.balance)
    }
}
