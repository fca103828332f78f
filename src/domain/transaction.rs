use crate::error::{BankError, Result};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A posting payload as submitted by a caller.
///
/// Every field but the account and the amount is optional; defaults are
/// resolved when the payload becomes a [`Transaction`].
#[derive(Debug, Deserialize, Serialize, PartialEq, Clone, Default)]
pub struct TransactionInput {
    #[serde(default)]
    pub reference: Option<String>,
    #[serde(rename = "account_iban", default)]
    pub account: String,
    #[serde(default)]
    pub date: Option<DateTime<Utc>>,
    /// A zero amount is treated the same as a missing one.
    #[serde(default)]
    pub amount: Option<Decimal>,
    #[serde(default)]
    pub fee: Option<Decimal>,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionInput {
    pub fn new(account: impl Into<String>, amount: Decimal) -> Self {
        Self {
            account: account.into(),
            amount: Some(amount),
            ..Self::default()
        }
    }

    pub fn reference(mut self, reference: impl Into<String>) -> Self {
        self.reference = Some(reference.into());
        self
    }

    pub fn date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    pub fn fee(mut self, fee: Decimal) -> Self {
        self.fee = Some(fee);
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The caller supplied reference, if it is non-empty.
    pub fn supplied_reference(&self) -> Option<&str> {
        self.reference.as_deref().filter(|r| !r.is_empty())
    }

    /// Checks the payload rules and returns the signed amount to post.
    pub fn validate(&self) -> Result<Decimal> {
        let mut problems = Vec::new();
        if self.account.trim().is_empty() {
            problems.push("the IBAN number of the account is required");
        }
        let amount = self.amount.filter(|a| !a.is_zero());
        if amount.is_none() {
            problems.push("the amount of the transaction is required");
        }
        if self.fee.is_some_and(|f| f < Decimal::ZERO) {
            problems.push("the fee cannot be less than zero");
        }

        match amount {
            Some(amount) if problems.is_empty() => Ok(amount),
            _ => Err(BankError::InvalidInput(problems.join(", "))),
        }
    }
}

/// A posted transaction. Immutable once stored.
#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct Transaction {
    pub reference: String,
    #[serde(rename = "account_iban")]
    pub account: String,
    pub date: DateTime<Utc>,
    /// Negative for debits, positive for credits.
    pub amount: Decimal,
    /// Always a non-negative magnitude.
    pub fee: Option<Decimal>,
    pub description: Option<String>,
}

impl Transaction {
    /// Builds the stored record from a validated payload.
    pub fn from_input(
        input: TransactionInput,
        reference: String,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            reference,
            account: input.account,
            date: input.date.unwrap_or(now),
            amount,
            fee: input.fee,
            description: input.description,
        }
    }
}
