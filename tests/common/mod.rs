#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use finance_tracker::{config::ConfigManager, Transaction, TransactionKind};
use once_cell::sync::Lazy;
use rust_decimal::Decimal;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates a config manager backed by a unique directory for each test.
pub fn setup_config_manager() -> ConfigManager {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    ConfigManager::with_base_dir(base).expect("create config manager for temp dir")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid calendar date")
}

pub fn credit(id: &str, amount: Decimal, account: &str) -> Transaction {
    Transaction::new(id, amount, date(2025, 11, 1), "Income", account, TransactionKind::Credit)
        .expect("valid credit")
}

pub fn debit(id: &str, amount: Decimal, account: &str) -> Transaction {
    Transaction::new(id, amount, date(2025, 11, 1), "Spending", account, TransactionKind::Debit)
        .expect("valid debit")
}
