use crate::domain::account::Account;
use crate::domain::ports::{AccountStore, SortOrder, TransactionStore};
use crate::domain::transaction::Transaction;
use crate::error::{BankError, Result};
use async_trait::async_trait;
use rocksdb::{ColumnFamily, ColumnFamilyDescriptor, DB, IteratorMode, Options};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Column Family for storing accounts, keyed by IBAN.
pub const CF_ACCOUNTS: &str = "accounts";
/// Column Family for storing transactions, keyed by reference.
pub const CF_TRANSACTIONS: &str = "transactions";

/// A persistent store implementation using RocksDB.
///
/// Handles storage for both `Account` and `Transaction` entities using
/// separate Column Families with JSON-encoded values. Natural order for
/// listings is key order.
///
/// This struct is thread-safe (`Clone` shares the underlying `Arc<DB>`).
#[derive(Clone)]
pub struct RocksDBStore {
    db: Arc<DB>,
}

fn internal(message: String) -> BankError {
    BankError::Internal(Box::new(std::io::Error::other(message)))
}

impl RocksDBStore {
    /// Opens or creates a RocksDB instance at the specified path.
    ///
    /// Ensures that the required column families ("accounts" and "transactions") exist.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut opts = Options::default();
        opts.create_if_missing(true);
        opts.create_missing_column_families(true);

        let cf_accounts = ColumnFamilyDescriptor::new(CF_ACCOUNTS, Options::default());
        let cf_transactions = ColumnFamilyDescriptor::new(CF_TRANSACTIONS, Options::default());

        let db = DB::open_cf_descriptors(&opts, path, vec![cf_accounts, cf_transactions])?;

        Ok(Self { db: Arc::new(db) })
    }

    fn cf(&self, name: &str) -> Result<&ColumnFamily> {
        self.db
            .cf_handle(name)
            .ok_or_else(|| internal(format!("{name} column family not found")))
    }

    fn put<T: Serialize>(&self, cf_name: &str, key: &str, value: &T) -> Result<()> {
        let cf = self.cf(cf_name)?;
        let bytes = serde_json::to_vec(value)
            .map_err(|e| internal(format!("Serialization error: {e}")))?;
        self.db.put_cf(cf, key.as_bytes(), bytes)?;
        Ok(())
    }

    fn get<T: DeserializeOwned>(&self, cf_name: &str, key: &str) -> Result<Option<T>> {
        let cf = self.cf(cf_name)?;
        match self.db.get_pinned_cf(cf, key.as_bytes())? {
            Some(bytes) => serde_json::from_slice(&bytes)
                .map(Some)
                .map_err(|e| internal(format!("Deserialization error: {e}"))),
            None => Ok(None),
        }
    }

    fn scan<T: DeserializeOwned>(&self, cf_name: &str) -> Result<Vec<T>> {
        let cf = self.cf(cf_name)?;
        let mut values = Vec::new();
        for item in self.db.iterator_cf(cf, IteratorMode::Start) {
            let (_key, value) = item?;
            let value = serde_json::from_slice(&value)
                .map_err(|e| internal(format!("Failed to deserialize {cf_name}: {e}")))?;
            values.push(value);
        }
        Ok(values)
    }
}

#[async_trait]
impl AccountStore for RocksDBStore {
    async fn find_by_iban(&self, iban: &str) -> Result<Option<Account>> {
        self.get(CF_ACCOUNTS, iban)
    }

    async fn save(&self, account: Account) -> Result<Account> {
        self.put(CF_ACCOUNTS, &account.iban, &account)?;
        Ok(account)
    }

    async fn find_all(&self) -> Result<Vec<Account>> {
        self.scan(CF_ACCOUNTS)
    }
}

#[async_trait]
impl TransactionStore for RocksDBStore {
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>> {
        self.get(CF_TRANSACTIONS, reference)
    }

    async fn save(&self, tx: Transaction) -> Result<Transaction> {
        self.put(CF_TRANSACTIONS, &tx.reference, &tx)?;
        Ok(tx)
    }

    async fn find_all(&self) -> Result<Vec<Transaction>> {
        self.scan(CF_TRANSACTIONS)
    }

    async fn find_by_account(
        &self,
        iban: &str,
        sort: Option<SortOrder>,
    ) -> Result<Vec<Transaction>> {
        let mut found: Vec<Transaction> = self
            .scan::<Transaction>(CF_TRANSACTIONS)?
            .into_iter()
            .filter(|tx| tx.account == iban)
            .collect();
        if let Some(sort) = sort {
            sort.apply(&mut found);
        }
        Ok(found)
    }
}
