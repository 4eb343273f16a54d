//! The bank: a fixed set of accounts and the transfers between them.
//!
//! Every transfer withdraws principal plus provision from the source, then
//! deposits the principal on the destination. The bank keeps the provision
//! and tracks running totals of collected fees and transferred principal.

use std::fmt;

use tracing::info;

use crate::Amount;
use crate::model::{AccountId, Transaction};

mod account;
pub use account::Account;

mod error;
pub use error::{DepositError, TransactionError, WithdrawalError};

/// A named bank owning a fixed, ordered collection of accounts.
///
/// Equality is structural: name, both running totals and every account in
/// order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bank {
    name: String,
    accounts: Box<[Account]>,
    /// Sum of provisions of successful transactions
    total_provision: Amount,
    /// Sum of principals of successful transactions
    total_transferred: Amount,
}

/// Public API
impl Bank {
    pub fn new(name: impl Into<String>, accounts: impl IntoIterator<Item = Account>) -> Self {
        Self {
            name: name.into(),
            accounts: accounts.into_iter().collect(),
            total_provision: Amount::ZERO,
            total_transferred: Amount::ZERO,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn accounts(&self) -> &[Account] {
        &self.accounts
    }

    /// Return the account with the given id (last match wins)
    pub fn get_account(&self, id: AccountId) -> Option<&Account> {
        self.find_account(id).map(|idx| &self.accounts[idx])
    }

    pub fn total_provision(&self) -> Amount {
        self.total_provision
    }

    pub fn total_transfers(&self) -> Amount {
        self.total_transferred
    }

    /// Apply a single transaction on top of the current bank state.
    ///
    /// Either the whole transfer happens and both totals grow, or nothing
    /// changes. A transfer to the source account itself only costs the fee.
    /// Negative principals or provisions and sums out of the [`Amount`] range
    /// are rejected.
    pub fn make_transaction(&mut self, transaction: &Transaction) -> Result<(), TransactionError> {
        let result = self.apply(transaction);
        Self::log_result(transaction, &result);
        result.map(|_| ())
    }
}

/// Private API
impl Bank {
    /// Linear scan for the account index, last match wins
    fn find_account(&self, id: AccountId) -> Option<usize> {
        self.accounts.iter().rposition(|account| account.id() == id)
    }

    /// - Resolve both accounts
    /// - Reject negative principal or provision
    /// - Compute the total and both new running totals, all checked
    /// - Make sure the destination can take the principal
    /// - Withdraw principal plus provision from the source
    /// - Deposit principal on the destination
    /// - Store the new totals
    ///
    /// Returns the collected provision.
    fn apply(&mut self, transaction: &Transaction) -> Result<Amount, TransactionError> {
        let from = self
            .find_account(transaction.from())
            .ok_or(TransactionError::AccountNotFound(transaction.from()))?;
        let to = self
            .find_account(transaction.to())
            .ok_or(TransactionError::AccountNotFound(transaction.to()))?;

        let amount = transaction.amount();
        if amount.is_negative() {
            return Err(TransactionError::NegativeAmount(amount));
        }
        let provision = transaction
            .provision()
            .ok_or(TransactionError::Overflow)?;
        if provision.is_negative() {
            return Err(TransactionError::NegativeProvision(provision));
        }

        let total = transaction
            .total_amount()
            .ok_or(TransactionError::Overflow)?;
        let total_transferred = self
            .total_transferred
            .checked_add(amount)
            .ok_or(TransactionError::Overflow)?;
        let total_provision = self
            .total_provision
            .checked_add(provision)
            .ok_or(TransactionError::Overflow)?;

        // a self transfer ends below its starting balance
        if from != to {
            self.accounts[to]
                .balance()
                .checked_add(amount)
                .ok_or(TransactionError::Overflow)?;
        }

        self.accounts[from].withdraw(total)?;
        self.accounts[to].deposit(amount)?;

        self.total_transferred = total_transferred;
        self.total_provision = total_provision;

        Ok(provision)
    }

    /// Small helper to log `make_transaction` results
    fn log_result(transaction: &Transaction, result: &Result<Amount, TransactionError>) {
        let description = transaction.description();
        match result {
            Ok(provision) => {
                info!(
                    from = %transaction.from(),
                    to = %transaction.to(),
                    amount = %transaction.amount(),
                    provision = %provision,
                    "{description} applied"
                );
            }
            Err(e) => {
                info!(
                    from = %transaction.from(),
                    to = %transaction.to(),
                    amount = %transaction.amount(),
                    reason = %e,
                    "{description} skipped"
                );
            }
        }
    }
}

impl fmt::Display for Bank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Name: {}", self.name)?;
        writeln!(f)?;
        for account in self.accounts.iter() {
            write!(f, "{account}")?;
        }
        Ok(())
    }
}
