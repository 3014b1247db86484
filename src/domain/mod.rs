pub mod account;
pub mod checking;
pub mod common;
pub mod transaction;

pub use account::{Account, AccountId, HoldsTransactions};
pub use checking::CheckingAccount;
pub use common::{Amounted, Displayable, Identifiable, NamedEntity, MAX_AMOUNT};
pub use transaction::{parse_date, Transaction, TransactionKind};
