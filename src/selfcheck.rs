//! Equality self-check run by the `equals` script mode.
//!
//! Exercises account, transaction and bank equality on a fixed set of values
//! and reports the first contract that does not hold.

use std::collections::HashSet;

use thiserror::Error;

use crate::Amount;
use crate::bank::{Account, Bank};
use crate::model::{AccountId, Transaction};

/// Printed when every check passes.
pub const ALL_PASSED: &str = "All your equals methods work properly.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum EqualityViolation {
    #[error("Your account equals method does not work properly.")]
    Account,
    #[error("Different accounts have the same IDS. This is not allowed")]
    DuplicateIds,
    #[error("Your transactions equals methods do not work properly.")]
    Transaction,
    #[error("Your bank equals method do not work properly.")]
    Bank,
}

fn units(value: i32) -> Amount {
    Amount::from_units(value)
}

pub fn check_equality() -> Result<(), EqualityViolation> {
    let a1 = Account::new("Andrej", units(20));
    let a2 = Account::new("Andrej", units(20));
    let a3 = Account::new("Andrej", units(30));
    let a4 = Account::new("Gajduk", units(20));

    check_accounts(&a1, &a2, &a3, &a4)?;
    check_transactions()?;
    check_banks(&a1, &a2, &a3, &a4)
}

#[allow(clippy::eq_op)]
fn check_accounts(
    a1: &Account,
    a2: &Account,
    a3: &Account,
    a4: &Account,
) -> Result<(), EqualityViolation> {
    let holds = a1 == a1 && a1 != a2 && a2 != a1 && a3 != a1 && a4 != a1;
    if !holds {
        return Err(EqualityViolation::Account);
    }

    let ids: HashSet<_> = [a1, a2, a3, a4].iter().map(|a| a.id()).collect();
    if ids.len() != 4 {
        return Err(EqualityViolation::DuplicateIds);
    }
    Ok(())
}

#[allow(clippy::eq_op)]
fn check_transactions() -> Result<(), EqualityViolation> {
    let id = AccountId::from_raw;

    let fa1 = Transaction::flat_amount(id(10), id(20), units(20), units(10));
    let fa2 = Transaction::flat_amount(id(20), id(20), units(20), units(10));
    let fa3 = Transaction::flat_amount(id(20), id(10), units(20), units(10));
    let fa4 = Transaction::flat_amount(id(10), id(20), units(50), units(50));
    let fa5 = Transaction::flat_amount(id(30), id(40), units(20), units(10));

    let fp1 = Transaction::flat_percent(id(10), id(20), units(20), 10);
    let fp2 = Transaction::flat_percent(id(10), id(20), units(20), 10);
    let fp3 = Transaction::flat_percent(id(10), id(10), units(20), 10);
    let fp4 = Transaction::flat_percent(id(10), id(20), units(50), 10);
    let fp5 = Transaction::flat_percent(id(10), id(20), units(20), 30);
    let fp6 = Transaction::flat_percent(id(30), id(40), units(20), 10);

    let holds = fa1 == fa1
        && fa2 == fa1
        && fa1 == fa2
        && fa1 == fa3
        && fa1 != fa4
        && fa1 == fa5
        && fa1 != fp1
        && fp1 == fp1
        && fp2 == fp1
        && fp1 == fp2
        && fp1 == fp3
        && fp1 == fp4
        && fp1 != fp5
        && fp1 == fp6;

    if holds {
        Ok(())
    } else {
        Err(EqualityViolation::Transaction)
    }
}

#[allow(clippy::eq_op)]
fn check_banks(
    a1: &Account,
    a2: &Account,
    a3: &Account,
    a4: &Account,
) -> Result<(), EqualityViolation> {
    let bank = |name: &str, accounts: &[&Account]| {
        Bank::new(name, accounts.iter().map(|&a| a.clone()))
    };

    let mut b1 = bank("Test", &[a1, a2, a3, a4]);
    let b2 = bank("Test", &[a2, a1, a3, a4]);
    let b3 = bank("Test", &[a1, a2, a3]);
    let b4 = bank("Sample", &[a1, a2, a3, a4]);
    let mut b5 = bank("Test", &[a1, a2, a3, a4]);

    let holds = b1 == b1 && b1 != b2 && b2 != b1 && b1 != b3 && b3 != b1 && b1 != b4 && b1 == b5;
    if !holds {
        return Err(EqualityViolation::Bank);
    }

    let t = Transaction::flat_amount(a2.id(), a3.id(), units(3), units(3));

    // the outcome is irrelevant here, only the effect on equality
    let _ = b1.make_transaction(&t);
    if b1 == b5 {
        return Err(EqualityViolation::Bank);
    }
    let _ = b5.make_transaction(&t);
    if b1 != b5 {
        return Err(EqualityViolation::Bank);
    }
    Ok(())
}
