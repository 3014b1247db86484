use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::domain::transaction::Transaction;
use crate::errors::{LedgerError, LedgerResult};
use crate::format::format_money;

const ACCOUNT_PREFIX: &str = "ACC";
const ACCOUNT_DIGITS: usize = 3;

/// Account identifier of the form `ACC` followed by exactly three digits, e.g. `ACC001`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountId(String);

impl AccountId {
    pub fn parse(raw: &str) -> LedgerResult<Self> {
        let well_formed = raw.strip_prefix(ACCOUNT_PREFIX).map_or(false, |digits| {
            digits.len() == ACCOUNT_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
        });
        if well_formed {
            Ok(Self(raw.to_string()))
        } else {
            Err(LedgerError::validation(format!(
                "Invalid account ID format: {}. Must be like 'ACC001'.",
                raw
            )))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for AccountId {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for AccountId {
    type Error = LedgerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<AccountId> for String {
    fn from(value: AccountId) -> Self {
        value.0
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Represents a financial account whose balance is derived from its transactions.
#[derive(Debug, Clone)]
pub struct Account {
    id: AccountId,
    name: String,
    transactions: Vec<Transaction>,
}

impl Account {
    /// Creates an empty account after validating the identifier format.
    pub fn new(account_id: &str, account_name: impl Into<String>) -> LedgerResult<Self> {
        Ok(Self {
            id: AccountId::parse(account_id)?,
            name: account_name.into(),
            transactions: Vec::new(),
        })
    }

    fn push(&mut self, transaction: Transaction) {
        tracing::debug!(
            account = %self.id,
            transaction = transaction.id(),
            amount = %transaction.signed_amount(),
            "transaction added"
        );
        self.transactions.push(transaction);
    }
}

mod sealed {
    pub trait Sealed {}

    impl Sealed for super::Account {}
    impl Sealed for crate::domain::checking::CheckingAccount {}
}

/// Shared behavior of every account flavour: identity, the transaction log, and the
/// balance derived from it. Only this crate's account types implement it, and the
/// transaction log can only grow through [`HoldsTransactions::add_transaction`].
pub trait HoldsTransactions: sealed::Sealed {
    fn base(&self) -> &Account;

    fn account_id(&self) -> &AccountId {
        &self.base().id
    }

    fn account_name(&self) -> &str {
        &self.base().name
    }

    /// Appends a transaction; insertion order is preserved.
    fn add_transaction(&mut self, transaction: Transaction);

    /// Converts a loose mapping into a transaction and appends it.
    fn add_record(&mut self, record: &Map<String, Value>) -> LedgerResult<&Transaction> {
        let transaction = Transaction::from_record(record)?;
        self.add_transaction(transaction);
        self.base()
            .transactions
            .last()
            .ok_or_else(|| LedgerError::contract("transaction was not recorded"))
    }

    fn transactions(&self) -> &[Transaction] {
        &self.base().transactions
    }

    /// Owned copy of the transaction log; mutating it leaves the account untouched.
    fn get_transactions(&self) -> Vec<Transaction> {
        self.base().transactions.clone()
    }

    fn transaction_count(&self) -> usize {
        self.base().transactions.len()
    }

    /// Sum of signed amounts, recomputed on every call. Saturates at the `Decimal` range.
    fn balance(&self) -> Decimal {
        self.base()
            .transactions
            .iter()
            .map(Transaction::signed_amount)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    fn get_balance(&self) -> Decimal {
        self.balance()
    }

    fn cmp_by_balance(&self, other: &dyn HoldsTransactions) -> Ordering {
        self.balance().cmp(&other.balance())
    }
}

impl HoldsTransactions for Account {
    fn base(&self) -> &Account {
        self
    }

    fn add_transaction(&mut self, transaction: Transaction) {
        self.push(transaction);
    }
}

impl PartialEq for Account {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Account {}

impl Hash for Account {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl Identifiable for Account {
    fn id(&self) -> &str {
        self.id.as_str()
    }
}

impl NamedEntity for Account {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Displayable for Account {
    fn display_label(&self) -> String {
        format!("{} ({})", self.name, self.id)
    }
}

impl fmt::Display for Account {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Account: {} ({}) Balance: {}",
            self.name,
            self.id,
            format_money(self.balance())
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::transaction::TransactionKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn txn(id: &str, amount: Decimal, kind: TransactionKind) -> Transaction {
        Transaction::new(
            id,
            amount,
            NaiveDate::from_ymd_opt(2025, 11, 1).unwrap(),
            "General",
            "ACC001",
            kind,
        )
        .unwrap()
    }

    #[test]
    fn account_id_format_is_enforced() {
        assert!(AccountId::parse("ACC001").is_ok());
        for bad in ["ACC01", "ACC0001", "acc001", "ACCabc", "XYZ123", "", "ACC１２３"] {
            assert!(
                matches!(AccountId::parse(bad), Err(LedgerError::Validation(_))),
                "{bad} should be rejected"
            );
        }
    }

    #[test]
    fn account_id_serde_validates() {
        let id: AccountId = serde_json::from_value(json!("ACC123")).unwrap();
        assert_eq!(id.as_str(), "ACC123");
        assert!(serde_json::from_value::<AccountId>(json!("BAD")).is_err());
    }

    #[test]
    fn new_account_is_empty() {
        let account = Account::new("ACC001", "Everyday").unwrap();
        assert_eq!(account.account_id().as_str(), "ACC001");
        assert_eq!(account.account_name(), "Everyday");
        assert_eq!(account.balance(), Decimal::ZERO);
        assert_eq!(account.transaction_count(), 0);
    }

    #[test]
    fn balance_sums_signed_amounts() {
        let mut account = Account::new("ACC001", "Everyday").unwrap();
        account.add_transaction(txn("T1", dec!(200), TransactionKind::Credit));
        account.add_transaction(txn("T2", dec!(150), TransactionKind::Debit));
        assert_eq!(account.balance(), dec!(50));
        assert_eq!(account.get_balance(), dec!(50));
    }

    #[test]
    fn get_transactions_is_a_copy() {
        let mut account = Account::new("ACC001", "Everyday").unwrap();
        account.add_transaction(txn("T1", dec!(10), TransactionKind::Credit));
        let mut copy = account.get_transactions();
        copy.clear();
        assert_eq!(account.transaction_count(), 1);
    }

    #[test]
    fn add_record_requires_an_amount() {
        let mut account = Account::new("ACC001", "Everyday").unwrap();
        let record = json!({
            "transaction_id": "T1",
            "date": "2025-11-01",
            "category": "Food",
            "account_id": "ACC001",
            "transaction_type": "debit"
        });
        let err = account.add_record(record.as_object().unwrap()).unwrap_err();
        assert!(matches!(err, LedgerError::Contract(_)));
        assert_eq!(account.transaction_count(), 0);

        let mut complete = record.as_object().unwrap().clone();
        complete.insert("amount".into(), json!(20));
        let added = account.add_record(&complete).unwrap();
        assert_eq!(added.signed_amount(), dec!(-20));
        assert_eq!(account.balance(), dec!(-20));
    }

    #[test]
    fn capability_traits_describe_the_account() {
        let account = Account::new("ACC007", "Travel").unwrap();
        assert_eq!(Identifiable::id(&account), "ACC007");
        assert_eq!(account.name(), "Travel");
        assert_eq!(account.display_label(), "Travel (ACC007)");
        assert_eq!(account.to_string(), "Account: Travel (ACC007) Balance: $0.00");
    }

    #[test]
    fn equality_is_by_identifier() {
        let a = Account::new("ACC001", "One").unwrap();
        let b = Account::new("ACC001", "Another").unwrap();
        let c = Account::new("ACC002", "One").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }
}
