#![doc(test(attr(deny(warnings))))]

//! Finance Tracker offers small bookkeeping primitives: validated transactions,
//! accounts with derived balances, and checking accounts with overdraft, fee, and
//! check-writing rules.

pub mod config;
pub mod domain;
pub mod errors;
pub mod format;
pub mod time;
pub mod utils;

pub use domain::{
    parse_date, Account, AccountId, Amounted, CheckingAccount, HoldsTransactions, Transaction,
    TransactionKind, MAX_AMOUNT,
};
pub use errors::{LedgerError, LedgerResult};
pub use utils::sorting::{sort_by_amount_desc, sort_largest_transaction};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("Finance Tracker tracing initialized.");
    });
}
