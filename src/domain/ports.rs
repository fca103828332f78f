use super::account::Account;
use super::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;

#[async_trait]
pub trait AccountStore: Send + Sync {
    async fn find_by_iban(&self, iban: &str) -> Result<Option<Account>>;
    async fn save(&self, account: Account) -> Result<Account>;
    async fn find_all(&self) -> Result<Vec<Account>>;
}

#[async_trait]
pub trait TransactionStore: Send + Sync {
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>>;
    async fn save(&self, tx: Transaction) -> Result<Transaction>;
    async fn find_all(&self) -> Result<Vec<Transaction>>;
    /// Transactions of one account, in store order unless `sort` is given.
    async fn find_by_account(&self, iban: &str, sort: Option<SortOrder>)
    -> Result<Vec<Transaction>>;
}

pub type AccountStoreBox = Box<dyn AccountStore>;
pub type TransactionStoreBox = Box<dyn TransactionStore>;

pub type AccountStoreFactory = Box<dyn Fn() -> AccountStoreBox + Send + Sync>;
pub type TransactionStoreFactory = Box<dyn Fn() -> TransactionStoreBox + Send + Sync>;

#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Listing order. Amount is the only sortable field.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SortOrder {
    pub direction: SortDirection,
}

impl SortOrder {
    pub const AMOUNT_ASC: Self = Self {
        direction: SortDirection::Asc,
    };
    pub const AMOUNT_DESC: Self = Self {
        direction: SortDirection::Desc,
    };

    /// Parses `asc`/`desc` in any case. Anything else means natural order.
    pub fn from_token(token: Option<&str>) -> Option<Self> {
        match token?.trim() {
            t if t.eq_ignore_ascii_case("asc") => Some(Self::AMOUNT_ASC),
            t if t.eq_ignore_ascii_case("desc") => Some(Self::AMOUNT_DESC),
            _ => None,
        }
    }

    pub fn compare(&self, a: &Transaction, b: &Transaction) -> Ordering {
        match self.direction {
            SortDirection::Asc => a.amount.cmp(&b.amount),
            SortDirection::Desc => b.amount.cmp(&a.amount),
        }
    }

    /// Stable sort, so equal amounts keep store order.
    pub fn apply(&self, transactions: &mut [Transaction]) {
        transactions.sort_by(|a, b| self.compare(a, b));
    }
}

/// Source of "now" for default timestamps and status derivation.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
