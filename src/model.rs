//! Core domain types for the bank simulator.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::atomic::{AtomicU64, Ordering};

use crate::Amount;

static NEXT_ACCOUNT_ID: AtomicU64 = AtomicU64::new(1);

/// Account identifier.
///
/// Freshly generated ids come from a process-wide monotonic counter, so two
/// accounts opened in the same process never share an id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct AccountId(u64);

impl AccountId {
    /// Allocate the next unused id.
    pub fn generate() -> Self {
        AccountId(NEXT_ACCOUNT_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn from_raw(raw: u64) -> Self {
        AccountId(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// How the bank computes its fee on top of a transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provision {
    /// A fixed fee, whatever the amount.
    FlatAmount(Amount),
    /// `floor(amount) * percent / 100`.
    FlatPercent(u32),
}

impl Provision {
    pub const FLAT_AMOUNT: &'static str = "FlatAmount";
    pub const FLAT_PERCENT: &'static str = "FlatPercent";

    /// Fee charged on a transfer of `amount`, `None` if it is out of range.
    pub fn compute(&self, amount: Amount) -> Option<Amount> {
        match *self {
            Provision::FlatAmount(fee) => Some(fee),
            Provision::FlatPercent(percent) => amount.percent_of_floor(percent),
        }
    }

    /// Policy name, as shown in transaction descriptions.
    pub fn description(&self) -> &'static str {
        match self {
            Provision::FlatAmount(_) => Self::FLAT_AMOUNT,
            Provision::FlatPercent(_) => Self::FLAT_PERCENT,
        }
    }
}

/// A transfer order between two accounts of the same bank.
///
/// Account ids are not checked here; the bank rejects unknown ones.
///
/// Equality (and hashing) only looks at the provision policy: two transfers
/// with the same fee parameter are equal whatever their amounts or accounts.
#[derive(Debug, Clone)]
pub struct Transaction {
    from: AccountId,
    to: AccountId,
    amount: Amount,
    provision: Provision,
}

impl Transaction {
    pub fn new(from: AccountId, to: AccountId, amount: Amount, provision: Provision) -> Self {
        Self {
            from,
            to,
            amount,
            provision,
        }
    }

    pub fn flat_amount(from: AccountId, to: AccountId, amount: Amount, fee: Amount) -> Self {
        Self::new(from, to, amount, Provision::FlatAmount(fee))
    }

    pub fn flat_percent(from: AccountId, to: AccountId, amount: Amount, percent: u32) -> Self {
        Self::new(from, to, amount, Provision::FlatPercent(percent))
    }

    pub fn from(&self) -> AccountId {
        self.from
    }

    pub fn to(&self) -> AccountId {
        self.to
    }

    /// The principal, credited to the destination.
    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn description(&self) -> &'static str {
        self.provision.description()
    }

    pub fn policy(&self) -> Provision {
        self.provision
    }

    /// Fee retained by the bank, computed on every call.
    ///
    /// `None` when the fee does not fit in an [`Amount`].
    pub fn provision(&self) -> Option<Amount> {
        self.provision.compute(self.amount)
    }

    /// Principal plus provision, debited from the source.
    ///
    /// `None` when the sum does not fit in an [`Amount`].
    pub fn total_amount(&self) -> Option<Amount> {
        self.amount.checked_add(self.provision()?)
    }
}

impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        self.provision == other.provision
    }
}

impl Eq for Transaction {}

impl Hash for Transaction {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.provision.hash(state);
    }
}
