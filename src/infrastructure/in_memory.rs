use crate::domain::account::Account;
use crate::domain::ports::{AccountStore, SortOrder, TransactionStore};
use crate::domain::transaction::Transaction;
use crate::error::Result;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A thread-safe in-memory store for accounts.
///
/// Uses `Arc<RwLock<HashMap<String, Account>>>` to allow shared concurrent access.
/// Ideal for testing or single-run workloads where persistence is not required.
#[derive(Default, Clone)]
pub struct InMemoryAccountStore {
    accounts: Arc<RwLock<HashMap<String, Account>>>,
}

impl InMemoryAccountStore {
    /// Creates a new, empty in-memory account store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl AccountStore for InMemoryAccountStore {
    async fn find_by_iban(&self, iban: &str) -> Result<Option<Account>> {
        let accounts = self.accounts.read().await;
        Ok(accounts.get(iban).cloned())
    }

    async fn save(&self, account: Account) -> Result<Account> {
        let mut accounts = self.accounts.write().await;
        accounts.insert(account.iban.clone(), account.clone());
        Ok(account)
    }

    async fn find_all(&self) -> Result<Vec<Account>> {
        let accounts = self.accounts.read().await;
        let mut all: Vec<Account> = accounts.values().cloned().collect();
        all.sort_by(|a, b| a.iban.cmp(&b.iban));
        Ok(all)
    }
}

#[derive(Default)]
struct TransactionTable {
    by_reference: HashMap<String, Transaction>,
    /// References in insertion order.
    order: Vec<String>,
}

impl TransactionTable {
    fn in_order(&self) -> impl Iterator<Item = &Transaction> {
        self.order.iter().filter_map(|r| self.by_reference.get(r))
    }
}

/// A thread-safe in-memory store for transactions.
///
/// Natural order is insertion order.
#[derive(Default, Clone)]
pub struct InMemoryTransactionStore {
    table: Arc<RwLock<TransactionTable>>,
}

impl InMemoryTransactionStore {
    /// Creates a new, empty in-memory transaction store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TransactionStore for InMemoryTransactionStore {
    async fn find_by_reference(&self, reference: &str) -> Result<Option<Transaction>> {
        let table = self.table.read().await;
        Ok(table.by_reference.get(reference).cloned())
    }

    async fn save(&self, tx: Transaction) -> Result<Transaction> {
        let mut table = self.table.write().await;
        if table
            .by_reference
            .insert(tx.reference.clone(), tx.clone())
            .is_none()
        {
            table.order.push(tx.reference.clone());
        }
        Ok(tx)
    }

    async fn find_all(&self) -> Result<Vec<Transaction>> {
        let table = self.table.read().await;
        Ok(table.in_order().cloned().collect())
    }

    async fn find_by_account(
        &self,
        iban: &str,
        sort: Option<SortOrder>,
    ) -> Result<Vec<Transaction>> {
        let table = self.table.read().await;
        let mut found: Vec<Transaction> = table
            .in_order()
            .filter(|tx| tx.account == iban)
            .cloned()
            .collect();
        if let Some(sort) = sort {
            sort.apply(&mut found);
        }
        Ok(found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn tx(reference: &str, account: &str, amount: Decimal) -> Transaction {
        Transaction {
            reference: reference.to_string(),
            account: account.to_string(),
            date: Utc::now(),
            amount,
            fee: None,
            description: None,
        }
    }

    #[tokio::test]
    async fn test_in_memory_account_store() {
        let store = InMemoryAccountStore::new();
        let account = Account::open("ABC123", dec!(100.0), Utc::now());

        store.save(account.clone()).await.unwrap();
        let retrieved = store.find_by_iban("ABC123").await.unwrap().unwrap();
        assert_eq!(retrieved, account);

        assert!(store.find_by_iban("XYZ").await.unwrap().is_none());
        assert_eq!(store.find_all().await.unwrap(), vec![account]);
    }

    #[tokio::test]
    async fn test_in_memory_transaction_store() {
        let store = InMemoryTransactionStore::new();
        let t = tx("1A", "ABC123", dec!(100.0));

        store.save(t.clone()).await.unwrap();
        let retrieved = store.find_by_reference("1A").await.unwrap().unwrap();
        assert_eq!(retrieved, t);
        assert!(store.find_by_reference("2B").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_by_account_orders() {
        let store = InMemoryTransactionStore::new();
        store.save(tx("1A", "ABC123", dec!(20))).await.unwrap();
        store.save(tx("2B", "OTHER", dec!(5))).await.unwrap();
        store.save(tx("3C", "ABC123", dec!(-7))).await.unwrap();
        store.save(tx("4D", "ABC123", dec!(50))).await.unwrap();

        let refs = |txs: Vec<Transaction>| txs.into_iter().map(|t| t.reference).collect::<Vec<_>>();

        let natural = store.find_by_account("ABC123", None).await.unwrap();
        assert_eq!(refs(natural), ["1A", "3C", "4D"]);

        let asc = store
            .find_by_account("ABC123", Some(SortOrder::AMOUNT_ASC))
            .await
            .unwrap();
        assert_eq!(refs(asc), ["3C", "1A", "4D"]);

        let desc = store
            .find_by_account("ABC123", Some(SortOrder::AMOUNT_DESC))
            .await
            .unwrap();
        assert_eq!(refs(desc), ["4D", "1A", "3C"]);

        assert_eq!(store.find_all().await.unwrap().len(), 4);
    }
}
