//! Error types for transaction processing.

use thiserror::Error;

use crate::Amount;
use crate::model::AccountId;

/// Error returned by [`Bank::make_transaction`](super::Bank::make_transaction).
///
/// Whatever the variant, the bank state is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransactionError {
    #[error("account {0} not found")]
    AccountNotFound(AccountId),

    #[error("negative principal {0}")]
    NegativeAmount(Amount),

    #[error("negative provision {0}")]
    NegativeProvision(Amount),

    #[error("amount out of range")]
    Overflow,

    #[error("withdrawal failed: {0}")]
    Withdrawal(#[from] WithdrawalError),

    #[error("deposit failed: {0}")]
    Deposit(#[from] DepositError),
}

/// Error during withdrawal from an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WithdrawalError {
    #[error("insufficient funds in account {0}: balance {1}, requested {2}")]
    InsufficientFunds(AccountId, Amount, Amount),

    #[error("cannot withdraw negative amount {1} from account {0}")]
    NegativeAmount(AccountId, Amount),
}

/// Error during deposit to an account.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DepositError {
    #[error("cannot deposit negative amount {1} to account {0}")]
    NegativeAmount(AccountId, Amount),

    #[error("balance of account {0} out of range: balance {1}, deposited {2}")]
    Overflow(AccountId, Amount, Amount),
}
