//! Checking accounts: an [`Account`] plus overdraft, fee, and check-writing rules.

use std::collections::BTreeSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use chrono::Datelike;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::config::Config;
use crate::domain::account::{Account, HoldsTransactions};
use crate::domain::common::{Displayable, Identifiable, NamedEntity};
use crate::domain::transaction::{Transaction, TransactionKind};
use crate::errors::{LedgerError, LedgerResult};
use crate::format::format_money;
use crate::time::{Clock, SystemClock};

const FEE_CATEGORY: &str = "Fees";
const FEE_DESCRIPTION: &str = "Monthly maintenance fee";
const CHECK_CATEGORY: &str = "Check";

#[derive(Clone)]
pub struct CheckingAccount {
    account: Account,
    owner: String,
    overdraft_limit: Decimal,
    monthly_fee: Decimal,
    minimum_balance: Decimal,
    checks_written: BTreeSet<u32>,
    last_fee_period: Option<(i32, u32)>,
}

impl CheckingAccount {
    /// Opens a checking account with the default terms: no overdraft, a $10 monthly
    /// fee, and a $500 minimum balance.
    pub fn new(
        account_id: &str,
        account_name: impl Into<String>,
        owner: impl Into<String>,
    ) -> LedgerResult<Self> {
        Self::from_config(account_id, account_name, owner, &Config::default())
    }

    /// Opens a checking account using the terms stored in `config`.
    pub fn from_config(
        account_id: &str,
        account_name: impl Into<String>,
        owner: impl Into<String>,
        config: &Config,
    ) -> LedgerResult<Self> {
        Self::with_terms(
            account_id,
            account_name,
            owner,
            config.overdraft_limit,
            config.monthly_fee,
            config.minimum_balance,
        )
    }

    pub fn with_terms(
        account_id: &str,
        account_name: impl Into<String>,
        owner: impl Into<String>,
        overdraft_limit: Decimal,
        monthly_fee: Decimal,
        minimum_balance: Decimal,
    ) -> LedgerResult<Self> {
        Config {
            overdraft_limit,
            monthly_fee,
            minimum_balance,
        }
        .validate()?;

        Ok(Self {
            account: Account::new(account_id, account_name)?,
            owner: owner.into(),
            overdraft_limit,
            monthly_fee,
            minimum_balance,
            checks_written: BTreeSet::new(),
            last_fee_period: None,
        })
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn overdraft_limit(&self) -> Decimal {
        self.overdraft_limit
    }

    pub fn monthly_fee(&self) -> Decimal {
        self.monthly_fee
    }

    pub fn minimum_balance(&self) -> Decimal {
        self.minimum_balance
    }

    /// Check numbers already used on this account, in ascending order.
    pub fn checks_written(&self) -> &BTreeSet<u32> {
        &self.checks_written
    }

    /// Year and month of the last period evaluated by
    /// [`CheckingAccount::apply_monthly_fees_for_period`].
    pub fn last_fee_period(&self) -> Option<(i32, u32)> {
        self.last_fee_period
    }

    /// Balance plus the full overdraft limit.
    pub fn calculate_available_funds(&self) -> Decimal {
        self.balance().saturating_add(self.overdraft_limit)
    }

    /// Returns whether `amount` could be withdrawn now, and why not when it cannot.
    /// The reason is empty when the withdrawal is allowed.
    pub fn can_withdraw(&self, amount: Decimal) -> (bool, String) {
        match self.ensure_can_withdraw(amount) {
            Ok(()) => (true, String::new()),
            Err(LedgerError::Validation(reason)) => (false, reason),
            Err(err) => (false, err.to_string()),
        }
    }

    /// Error-returning form of [`CheckingAccount::can_withdraw`].
    pub fn ensure_can_withdraw(&self, amount: Decimal) -> LedgerResult<()> {
        if amount <= Decimal::ZERO {
            return Err(LedgerError::validation("Amount must be positive"));
        }
        let available = self.calculate_available_funds();
        if amount > available {
            return Err(LedgerError::InsufficientFunds {
                requested: amount,
                available,
            });
        }
        Ok(())
    }

    /// Charges the monthly fee when the balance sits below the minimum.
    ///
    /// Every call is evaluated on its own: calling twice in one billing cycle charges
    /// twice. Use [`CheckingAccount::apply_monthly_fees_for_period`] to charge at most
    /// once per calendar month.
    pub fn apply_monthly_fees(&mut self) -> LedgerResult<Decimal> {
        self.apply_monthly_fees_with_clock(&SystemClock)
    }

    pub fn apply_monthly_fees_with_clock(&mut self, clock: &dyn Clock) -> LedgerResult<Decimal> {
        let balance = self.balance();
        if balance >= self.minimum_balance || self.monthly_fee <= Decimal::ZERO {
            return Ok(Decimal::ZERO);
        }

        let fee = Transaction::new_with_clock(
            format!("FEE-{}", Uuid::new_v4().simple()),
            self.monthly_fee,
            clock.today(),
            FEE_CATEGORY,
            self.account_id().as_str(),
            TransactionKind::Debit,
            clock,
        )?
        .with_description(FEE_DESCRIPTION);
        self.add_transaction(fee);

        tracing::info!(
            account = %self.account_id(),
            fee = %self.monthly_fee,
            balance = %balance,
            minimum = %self.minimum_balance,
            "monthly fee charged"
        );
        Ok(self.monthly_fee)
    }

    /// Evaluates the monthly fee once per calendar month of `clock.today()`.
    /// Later calls within an already evaluated month charge nothing.
    pub fn apply_monthly_fees_for_period(&mut self, clock: &dyn Clock) -> LedgerResult<Decimal> {
        let today = clock.today();
        let period = (today.year(), today.month());
        if self.last_fee_period == Some(period) {
            tracing::debug!(
                account = %self.account_id(),
                year = period.0,
                month = period.1,
                "monthly fee already evaluated"
            );
            return Ok(Decimal::ZERO);
        }
        let charged = self.apply_monthly_fees_with_clock(clock)?;
        self.last_fee_period = Some(period);
        Ok(charged)
    }

    /// Writes a check dated today.
    pub fn write_check(
        &mut self,
        check_number: u32,
        amount: Decimal,
        payee: &str,
    ) -> LedgerResult<Transaction> {
        self.write_check_with_clock(check_number, amount, payee, &SystemClock)
    }

    /// Records a check as a debit and returns the created transaction.
    ///
    /// Fails when the check number was used before, the amount is not positive, or
    /// the amount exceeds the available funds. Nothing changes on failure.
    pub fn write_check_with_clock(
        &mut self,
        check_number: u32,
        amount: Decimal,
        payee: &str,
        clock: &dyn Clock,
    ) -> LedgerResult<Transaction> {
        if self.checks_written.contains(&check_number) {
            tracing::warn!(account = %self.account_id(), check_number, "duplicate check number");
            return Err(LedgerError::DuplicateCheck(check_number));
        }
        if amount <= Decimal::ZERO {
            return Err(LedgerError::validation("Check amount must be positive"));
        }
        if let Err(err) = self.ensure_can_withdraw(amount) {
            tracing::warn!(
                account = %self.account_id(),
                check_number,
                amount = %amount,
                "check refused: {}",
                err
            );
            return Err(err);
        }

        let check = Transaction::new_with_clock(
            format!("{}-CHK-{}", self.account_id(), check_number),
            amount,
            clock.today(),
            CHECK_CATEGORY,
            self.account_id().as_str(),
            TransactionKind::Debit,
            clock,
        )?
        .with_description(format!("Check #{} to {}", check_number, payee));

        self.checks_written.insert(check_number);
        self.add_transaction(check.clone());
        tracing::info!(
            account = %self.account_id(),
            check_number,
            amount = %amount,
            payee,
            "check written"
        );
        Ok(check)
    }

    pub fn has_overdraft_protection(&self) -> bool {
        self.overdraft_limit > Decimal::ZERO
    }

    /// Portion of the overdraft currently drawn; zero while the balance is non-negative.
    pub fn get_overdraft_usage(&self) -> Decimal {
        (-self.balance()).max(Decimal::ZERO)
    }

    /// Human-readable account summary. Not a stable format.
    pub fn generate_statement(&self) -> String {
        let mut lines = vec![
            format!("===== Statement: {} =====", self.account_name()),
            format!("Account ID: {}", self.account_id()),
            format!("Owner: {}", self.owner),
            format!("Balance: {}", format_money(self.balance())),
            format!("Overdraft Limit: {}", format_money(self.overdraft_limit)),
            format!("Overdraft Used: {}", format_money(self.get_overdraft_usage())),
            format!(
                "Available Funds: {}",
                format_money(self.calculate_available_funds())
            ),
            format!(
                "Monthly Fee: {} (waived at {} or more)",
                format_money(self.monthly_fee),
                format_money(self.minimum_balance)
            ),
        ];

        if !self.checks_written.is_empty() {
            let numbers: Vec<String> = self.checks_written.iter().map(u32::to_string).collect();
            lines.push(format!("Checks Written: {}", numbers.join(", ")));
        }

        lines.push(format!("Transactions ({}):", self.transaction_count()));
        if self.transactions().is_empty() {
            lines.push("  (none)".into());
        }
        lines.extend(self.transactions().iter().map(|txn| format!("  {}", txn)));
        lines.join("\n")
    }

    /// Orders checking accounts by balance, lowest first.
    pub fn sort_by_balance(accounts: &mut [CheckingAccount]) {
        accounts.sort_by(|a, b| a.cmp_by_balance(b));
    }
}

impl HoldsTransactions for CheckingAccount {
    fn base(&self) -> &Account {
        &self.account
    }

    fn add_transaction(&mut self, transaction: Transaction) {
        self.account.add_transaction(transaction);
    }
}

impl PartialEq for CheckingAccount {
    fn eq(&self, other: &Self) -> bool {
        self.account_id() == other.account_id()
    }
}

impl Eq for CheckingAccount {}

impl Hash for CheckingAccount {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.account_id().hash(state);
    }
}

impl PartialEq<Account> for CheckingAccount {
    fn eq(&self, other: &Account) -> bool {
        self.account_id() == other.account_id()
    }
}

impl Identifiable for CheckingAccount {
    fn id(&self) -> &str {
        self.account_id().as_str()
    }
}

impl NamedEntity for CheckingAccount {
    fn name(&self) -> &str {
        self.account_name()
    }
}

impl Displayable for CheckingAccount {
    fn display_label(&self) -> String {
        format!("{} ({}, {})", self.account_name(), self.account_id(), self.owner)
    }
}

impl fmt::Display for CheckingAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "CheckingAccount: {} (Balance: {}, Available: {})",
            self.account_name(),
            format_money(self.balance()),
            format_money(self.calculate_available_funds())
        )
    }
}

impl fmt::Debug for CheckingAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckingAccount")
            .field("account_id", &self.account_id().as_str())
            .field("account_name", &self.account_name())
            .field("owner", &self.owner)
            .field("overdraft_limit", &format_args!("{:.2}", self.overdraft_limit))
            .field("monthly_fee", &format_args!("{:.2}", self.monthly_fee))
            .field("minimum_balance", &format_args!("{:.2}", self.minimum_balance))
            .field("transactions", &self.transaction_count())
            .field("checks_written", &self.checks_written)
            .finish()
    }
}
