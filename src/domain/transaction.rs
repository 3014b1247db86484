//! Domain model for a single ledger entry.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{self, AtomicU64};

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::domain::common::{Amounted, Displayable, Identifiable, MAX_AMOUNT};
use crate::errors::{LedgerError, LedgerResult};
use crate::format::format_money;
use crate::time::{Clock, SystemClock};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Diagnostic tally of constructed transactions. Not an id source.
static CREATED_COUNT: AtomicU64 = AtomicU64::new(0);

/// Parses an ISO `YYYY-MM-DD` calendar date.
pub fn parse_date(raw: &str) -> LedgerResult<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).map_err(|_| {
        LedgerError::validation(format!("Invalid date `{}`, expected YYYY-MM-DD", raw))
    })
}

/// Direction of money movement relative to the owning account.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Money leaving the account.
    Debit,
    /// Money entering the account.
    Credit,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            TransactionKind::Debit => "debit",
            TransactionKind::Credit => "credit",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionKind {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "debit" => Ok(TransactionKind::Debit),
            "credit" => Ok(TransactionKind::Credit),
            other => Err(LedgerError::validation(format!(
                "Transaction type must be 'debit' or 'credit', got `{}`",
                other
            ))),
        }
    }
}

/// A validated money movement. The amount is always positive; direction lives in `kind`.
#[derive(Debug, Clone)]
pub struct Transaction {
    id: String,
    amount: Decimal,
    date: NaiveDate,
    category: String,
    description: String,
    account_id: String,
    kind: TransactionKind,
}

/// Loose mapping shape accepted by [`Transaction::from_record`].
#[derive(Debug, Deserialize)]
struct TransactionRecord {
    #[serde(default)]
    transaction_id: String,
    amount: Decimal,
    date: String,
    category: String,
    #[serde(default)]
    description: String,
    account_id: String,
    transaction_type: String,
}

impl Transaction {
    /// Creates a transaction, rejecting dates after today's UTC date.
    pub fn new(
        id: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: impl Into<String>,
        account_id: impl Into<String>,
        kind: TransactionKind,
    ) -> LedgerResult<Self> {
        Self::new_with_clock(id, amount, date, category, account_id, kind, &SystemClock)
    }

    /// Same as [`Transaction::new`] but "today" comes from `clock`.
    pub fn new_with_clock(
        id: impl Into<String>,
        amount: Decimal,
        date: NaiveDate,
        category: impl Into<String>,
        account_id: impl Into<String>,
        kind: TransactionKind,
        clock: &dyn Clock,
    ) -> LedgerResult<Self> {
        let category = category.into();
        let account_id = account_id.into();

        if amount <= Decimal::ZERO {
            return Err(LedgerError::validation(format!(
                "Amount must be positive, got {}",
                amount
            )));
        }
        if amount > MAX_AMOUNT {
            return Err(LedgerError::validation(format!(
                "Amount {} exceeds the maximum of {}",
                amount, MAX_AMOUNT
            )));
        }
        let today = clock.today();
        if date > today {
            return Err(LedgerError::validation(format!(
                "Date {} is in the future (today is {})",
                date, today
            )));
        }
        if category.trim().is_empty() {
            return Err(LedgerError::validation("Category cannot be empty"));
        }
        if account_id.trim().is_empty() {
            return Err(LedgerError::validation("Account reference cannot be empty"));
        }

        CREATED_COUNT.fetch_add(1, atomic::Ordering::Relaxed);
        Ok(Self {
            id: id.into(),
            amount,
            date,
            category,
            description: String::new(),
            account_id,
            kind,
        })
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn amount(&self) -> Decimal {
        self.amount
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// The description is the only field that may change after construction.
    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub fn kind(&self) -> TransactionKind {
        self.kind
    }

    /// Negative for debits, positive for credits.
    pub fn signed_amount(&self) -> Decimal {
        match self.kind {
            TransactionKind::Debit => -self.amount,
            TransactionKind::Credit => self.amount,
        }
    }

    pub fn is_expense(&self) -> bool {
        self.kind == TransactionKind::Debit
    }

    pub fn is_income(&self) -> bool {
        self.kind == TransactionKind::Credit
    }

    /// Orders two transactions by signed amount.
    pub fn cmp_signed(&self, other: &Self) -> Ordering {
        self.signed_amount().cmp(&other.signed_amount())
    }

    /// Flattens the transaction into a string-keyed mapping.
    pub fn to_record(&self) -> Map<String, Value> {
        let mut record = Map::new();
        record.insert("transaction_id".into(), Value::String(self.id.clone()));
        record.insert("amount".into(), Value::String(self.amount.to_string()));
        record.insert(
            "date".into(),
            Value::String(self.date.format(DATE_FORMAT).to_string()),
        );
        record.insert("category".into(), Value::String(self.category.clone()));
        record.insert(
            "description".into(),
            Value::String(self.description.clone()),
        );
        record.insert("account_id".into(), Value::String(self.account_id.clone()));
        record.insert(
            "transaction_type".into(),
            Value::String(self.kind.as_str().into()),
        );
        record
    }

    /// Rebuilds a transaction from a mapping produced by [`Transaction::to_record`]
    /// or assembled by hand. `amount` may be a JSON number or a decimal string.
    pub fn from_record(record: &Map<String, Value>) -> LedgerResult<Self> {
        Self::from_record_with_clock(record, &SystemClock)
    }

    pub fn from_record_with_clock(
        record: &Map<String, Value>,
        clock: &dyn Clock,
    ) -> LedgerResult<Self> {
        match record.get("amount") {
            Some(Value::Number(_)) => {}
            Some(Value::String(raw)) if raw.parse::<Decimal>().is_ok() => {}
            Some(other) => {
                return Err(LedgerError::contract(format!(
                    "Transaction 'amount' must be numeric, got {}",
                    other
                )))
            }
            None => {
                return Err(LedgerError::contract(
                    "Transaction must have an 'amount' attribute",
                ))
            }
        }

        let parsed: TransactionRecord = serde_json::from_value(Value::Object(record.clone()))
            .map_err(|err| LedgerError::contract(format!("Malformed transaction record: {}", err)))?;
        let date = parse_date(&parsed.date)?;
        let kind = parsed.transaction_type.parse::<TransactionKind>()?;

        let txn = Self::new_with_clock(
            parsed.transaction_id,
            parsed.amount,
            date,
            parsed.category,
            parsed.account_id,
            kind,
            clock,
        )?;
        Ok(txn.with_description(parsed.description))
    }

    /// Number of transactions constructed in this process so far.
    pub fn created_count() -> u64 {
        CREATED_COUNT.load(atomic::Ordering::Relaxed)
    }

    /// Resets the diagnostic counter to zero.
    pub fn reset_created_count() {
        CREATED_COUNT.store(0, atomic::Ordering::Relaxed);
    }
}

/// Transactions with ids compare by id; anonymous ones compare field by field.
impl PartialEq for Transaction {
    fn eq(&self, other: &Self) -> bool {
        if !self.id.is_empty() && !other.id.is_empty() {
            return self.id == other.id;
        }
        self.id == other.id
            && self.amount == other.amount
            && self.date == other.date
            && self.category == other.category
            && self.description == other.description
            && self.account_id == other.account_id
            && self.kind == other.kind
    }
}

impl Eq for Transaction {}

impl Identifiable for Transaction {
    fn id(&self) -> &str {
        &self.id
    }
}

impl Amounted for Transaction {
    fn amount(&self) -> Decimal {
        self.amount
    }
}

impl Displayable for Transaction {
    fn display_label(&self) -> String {
        format!("txn:{} [{}]", self.id, self.kind)
    }
}

impl fmt::Display for Transaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} | {} | {} | {}",
            self.date,
            self.category,
            format_money(self.signed_amount()),
            self.account_id
        )?;
        if !self.description.is_empty() {
            write!(f, " | {}", self.description)?;
        }
        Ok(())
    }
}
