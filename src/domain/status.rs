use super::transaction::Transaction;
use crate::error::{BankError, Result};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

/// Origin of a status inquiry. Decides how amount and fee are presented.
#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Channel {
    Client,
    Atm,
    Internal,
}

impl FromStr for Channel {
    type Err = BankError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CLIENT" => Ok(Self::Client),
            "ATM" => Ok(Self::Atm),
            "INTERNAL" => Ok(Self::Internal),
            other => Err(BankError::InvalidInput(format!("unknown channel {other}"))),
        }
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Client => "CLIENT",
            Self::Atm => "ATM",
            Self::Internal => "INTERNAL",
        })
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Eq, Clone, Copy)]
#[serde(rename_all = "UPPERCASE")]
pub enum Status {
    Pending,
    Settled,
    Future,
    Invalid,
}

#[derive(Debug, Serialize, Deserialize, PartialEq, Clone)]
pub struct TransactionStatusRequest {
    pub reference: String,
    /// Unrecognised tokens deserialize as absent, same as [`Self::parse`].
    #[serde(default, deserialize_with = "lenient_channel")]
    pub channel: Option<Channel>,
}

fn lenient_channel<'de, D>(deserializer: D) -> std::result::Result<Option<Channel>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.and_then(|c| c.parse().ok()))
}

impl TransactionStatusRequest {
    pub fn new(reference: impl Into<String>, channel: Option<Channel>) -> Self {
        Self {
            reference: reference.into(),
            channel,
        }
    }

    /// Builds a request from raw tokens. An unrecognised channel is dropped,
    /// which later surfaces as [`BankError::ChannelRequired`].
    pub fn parse(reference: impl Into<String>, channel: Option<&str>) -> Self {
        Self::new(reference, channel.and_then(|c| c.parse().ok()))
    }
}

#[derive(Debug, Serialize, PartialEq, Clone)]
pub struct TransactionStatusView {
    pub reference: String,
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fee: Option<Decimal>,
}

impl TransactionStatusView {
    pub fn invalid(reference: impl Into<String>) -> Self {
        Self {
            reference: reference.into(),
            status: Status::Invalid,
            amount: None,
            fee: None,
        }
    }
}

/// Lifecycle status of a transaction dated `date` as seen on `today`.
pub fn lifecycle_status(date: NaiveDate, today: NaiveDate, channel: Option<Channel>) -> Status {
    if date < today {
        Status::Settled
    } else if date == today || channel == Some(Channel::Atm) {
        Status::Pending
    } else {
        Status::Future
    }
}

/// Subtracts the fee from the amount's magnitude, keeping the amount's sign.
pub fn fee_adjusted_amount(amount: Decimal, fee: Option<Decimal>) -> Decimal {
    let fee = fee.unwrap_or(Decimal::ZERO);
    let adjusted = amount.abs() - fee;
    if amount < Decimal::ZERO {
        -adjusted
    } else {
        adjusted
    }
}

/// Derives the status view for `requested` on `today`.
///
/// An unknown reference yields an `INVALID` view without needing a channel.
/// For a known transaction the channel is mandatory.
pub fn resolve_status(
    requested: &str,
    transaction: Option<&Transaction>,
    channel: Option<Channel>,
    today: NaiveDate,
) -> Result<TransactionStatusView> {
    let Some(tx) = transaction else {
        return Ok(TransactionStatusView::invalid(requested));
    };

    let status = lifecycle_status(tx.date.date_naive(), today, channel);
    let (amount, fee) = match channel {
        Some(Channel::Client | Channel::Atm) => (fee_adjusted_amount(tx.amount, tx.fee), None),
        Some(Channel::Internal) => (tx.amount, tx.fee),
        None => {
            return Err(BankError::ChannelRequired {
                reference: tx.reference.clone(),
            });
        }
    };

    Ok(TransactionStatusView {
        reference: tx.reference.clone(),
        status,
        amount: Some(amount),
        fee,
    })
}
