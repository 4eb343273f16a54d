pub mod amount;
pub mod bank;
pub mod model;
pub mod roman;
pub mod script;
pub mod selfcheck;
pub mod session;

pub use amount::{Amount, AmountError};
pub use bank::{Account, Bank, TransactionError};
pub use model::{AccountId, Provision, Transaction};
