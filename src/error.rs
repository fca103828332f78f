use rust_decimal::Decimal;
use thiserror::Error;

/// Errors surfaced by the posting, status and listing operations.
///
/// None of these are retried internally; every variant is terminal for the
/// request that produced it.
#[derive(Error, Debug)]
pub enum BankError {
    #[error("the reference {reference} was already used in other transaction")]
    DuplicateReference { reference: String },

    #[error("the balance of account {iban} could not be below 0 (balance {balance}, amount {amount})")]
    InsufficientFunds {
        iban: String,
        balance: Decimal,
        amount: Decimal,
    },

    #[error("no {entity} found for {key}")]
    NotFound { entity: &'static str, key: String },

    #[error("please provide a channel for the reference {reference}")]
    ChannelRequired { reference: String },

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {0}")]
    Internal(Box<dyn std::error::Error + Send + Sync>),

    #[cfg(feature = "storage-rocksdb")]
    #[error("RocksDB error: {0}")]
    RocksDb(#[from] rocksdb::Error),
}

impl BankError {
    pub fn account_not_found(iban: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "account",
            key: iban.into(),
        }
    }

    pub fn transaction_not_found(reference: impl Into<String>) -> Self {
        Self::NotFound {
            entity: "transaction",
            key: reference.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, BankError>;
