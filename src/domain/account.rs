use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// An account identified by its IBAN.
///
/// Accounts are opened implicitly by the first posting against an unknown IBAN
/// and afterwards only their balance changes. The balance is never negative
/// after a successful posting.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Account {
    /// Primary key. Only checked for emptiness.
    pub iban: String,
    /// When the account was opened.
    pub opened_at: DateTime<Utc>,
    /// Running balance derived from every posted transaction.
    pub balance: Decimal,
}

impl Account {
    /// Opens an account holding `balance`, timestamped at `opened_at`.
    pub fn open(iban: impl Into<String>, balance: Decimal, opened_at: DateTime<Utc>) -> Self {
        Self {
            iban: iban.into(),
            opened_at,
            balance,
        }
    }

    /// Returns the same account carrying a new balance.
    pub fn with_balance(self, balance: Decimal) -> Self {
        Self { balance, ..self }
    }
}
