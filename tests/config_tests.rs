mod common;

use std::fs;

use common::setup_config_manager;
use finance_tracker::{config::Config, CheckingAccount, HoldsTransactions, LedgerError};
use rust_decimal_macros::dec;

#[test]
fn load_without_file_returns_defaults() {
    let manager = setup_config_manager();
    assert!(!manager.path().exists());
    assert_eq!(manager.load().unwrap(), Config::default());
}

#[test]
fn save_then_load_round_trip() {
    let manager = setup_config_manager();
    let config = Config {
        overdraft_limit: dec!(750),
        monthly_fee: dec!(12.50),
        minimum_balance: dec!(1000),
    };

    manager.save(&config).unwrap();
    assert!(manager.path().exists());
    assert_eq!(manager.load().unwrap(), config);
}

#[test]
fn save_refuses_negative_terms() {
    let manager = setup_config_manager();
    let config = Config {
        overdraft_limit: dec!(-1),
        ..Config::default()
    };
    assert!(matches!(manager.save(&config), Err(LedgerError::Validation(_))));
    assert!(!manager.path().exists());
}

#[test]
fn corrupt_file_is_reported() {
    let manager = setup_config_manager();
    fs::write(manager.path(), "{ not json").unwrap();
    assert!(matches!(manager.load(), Err(LedgerError::Serde(_))));
}

#[test]
fn checking_account_opens_with_configured_terms() {
    let manager = setup_config_manager();
    manager
        .save(&Config {
            overdraft_limit: dec!(300),
            monthly_fee: dec!(5),
            minimum_balance: dec!(100),
        })
        .unwrap();

    let config = manager.load().unwrap();
    let mut checking =
        CheckingAccount::from_config("ACC010", "Configured", "Avery", &config).unwrap();

    assert_eq!(checking.overdraft_limit(), dec!(300));
    assert_eq!(checking.calculate_available_funds(), dec!(300));
    assert_eq!(checking.apply_monthly_fees().unwrap(), dec!(5));
    assert_eq!(checking.balance(), dec!(-5));
}
