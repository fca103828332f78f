use crate::domain::account::Account;
use crate::domain::balance::compute_new_balance;
use crate::domain::ports::{AccountStoreBox, Clock, SortOrder, SystemClock, TransactionStoreBox};
use crate::domain::reference::generate as generate_reference;
use crate::domain::status::{TransactionStatusRequest, TransactionStatusView, resolve_status};
use crate::domain::transaction::{Transaction, TransactionInput};
use crate::error::{BankError, Result};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// Async mutexes keyed by a string, created on first use and removed once
/// nobody holds or waits on them.
#[derive(Default)]
struct KeyedLocks {
    locks: DashMap<String, Arc<Mutex<()>>>,
}

/// Holds one key of a [`KeyedLocks`] until dropped.
struct KeyedGuard<'a> {
    locks: &'a DashMap<String, Arc<Mutex<()>>>,
    key: String,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for KeyedGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        // Waiters keep their own clone, so a count of one means the entry is idle.
        self.locks
            .remove_if(&self.key, |_, lock| Arc::strong_count(lock) == 1);
    }
}

impl KeyedLocks {
    async fn lock(&self, key: &str) -> KeyedGuard<'_> {
        // The map guard must be released before awaiting the mutex.
        let lock = self.locks.entry(key.to_string()).or_default().clone();
        let guard = lock.lock_owned().await;
        KeyedGuard {
            locks: &self.locks,
            key: key.to_string(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    fn len(&self) -> usize {
        self.locks.len()
    }
}

/// The entry point for posting transactions and querying them.
///
/// `BankEngine` owns the storage backends. Postings are serialised per
/// reference and per IBAN, locks always taken in that order, so concurrent
/// callers sharing one engine cannot claim the same reference twice or
/// overdraw an account.
pub struct BankEngine {
    account_store: AccountStoreBox,
    transaction_store: TransactionStoreBox,
    clock: Box<dyn Clock>,
    generate_reference: fn() -> String,
    reference_locks: KeyedLocks,
    account_locks: KeyedLocks,
}

impl BankEngine {
    /// Creates a new `BankEngine` reading the system clock.
    ///
    /// # Arguments
    ///
    /// * `account_store` - The store for accounts.
    /// * `transaction_store` - The store for posted transactions.
    pub fn new(account_store: AccountStoreBox, transaction_store: TransactionStoreBox) -> Self {
        Self::with_clock(account_store, transaction_store, Box::new(SystemClock))
    }

    pub fn with_clock(
        account_store: AccountStoreBox,
        transaction_store: TransactionStoreBox,
        clock: Box<dyn Clock>,
    ) -> Self {
        Self {
            account_store,
            transaction_store,
            clock,
            generate_reference,
            reference_locks: KeyedLocks::default(),
            account_locks: KeyedLocks::default(),
        }
    }

    /// Replaces the generator used for postings submitted without a reference.
    pub fn with_reference_generator(mut self, generate: fn() -> String) -> Self {
        self.generate_reference = generate;
        self
    }

    /// Posts a transaction and updates its account's balance.
    ///
    /// The account is written before the transaction. A failure between the
    /// two writes leaves the balance reflecting a transaction that was never
    /// stored; nothing compensates for it.
    #[tracing::instrument(skip_all, fields(account = %input.account))]
    pub async fn post(&self, input: TransactionInput) -> Result<Transaction> {
        let amount = input.validate()?;

        let supplied = input.supplied_reference().map(str::to_string);
        let reference = supplied.clone().unwrap_or_else(self.generate_reference);

        let _reference_guard = self.reference_locks.lock(&reference).await;
        if self
            .transaction_store
            .find_by_reference(&reference)
            .await?
            .is_some()
        {
            tracing::warn!(%reference, generated = supplied.is_none(), "reference already used");
            return Err(BankError::DuplicateReference { reference });
        }

        let _account_guard = self.account_locks.lock(&input.account).await;
        let existing = self.account_store.find_by_iban(&input.account).await?;
        let balance = compute_new_balance(&input.account, existing.as_ref(), amount)
            .inspect_err(|e| tracing::warn!(error = %e, "posting rejected"))?;
        tracing::info!(%balance, "balance computed before saving the transaction");

        let now = self.clock.now();
        let account = match existing {
            Some(account) => account.with_balance(balance),
            None => Account::open(input.account.clone(), balance, now),
        };
        self.account_store.save(account).await?;

        let tx = Transaction::from_input(input, reference, amount, now);
        let saved = self.transaction_store.save(tx).await?;
        tracing::info!(reference = %saved.reference, amount = %saved.amount, "saved transaction");
        Ok(saved)
    }

    /// Derives the status of a transaction for the requesting channel.
    pub async fn status(&self, request: &TransactionStatusRequest) -> Result<TransactionStatusView> {
        if request.reference.trim().is_empty() {
            return Err(BankError::InvalidInput(
                "the reference of the transaction is required".to_string(),
            ));
        }

        let tx = self
            .transaction_store
            .find_by_reference(&request.reference)
            .await?;
        let now = self.clock.now();
        tracing::debug!(
            reference = %request.reference,
            date = ?tx.as_ref().map(|t| t.date),
            current = %now,
            "resolving transaction status"
        );
        let view = resolve_status(&request.reference, tx.as_ref(), request.channel, now.date_naive())?;
        tracing::info!(reference = %view.reference, status = ?view.status, "transaction status");
        Ok(view)
    }

    pub async fn find_account(&self, iban: &str) -> Result<Account> {
        self.account_store
            .find_by_iban(iban)
            .await?
            .ok_or_else(|| BankError::account_not_found(iban))
    }

    pub async fn find_transaction(&self, reference: &str) -> Result<Transaction> {
        self.transaction_store
            .find_by_reference(reference)
            .await?
            .ok_or_else(|| BankError::transaction_not_found(reference))
    }

    pub async fn accounts(&self) -> Result<Vec<Account>> {
        self.account_store.find_all().await
    }

    pub async fn transactions(&self) -> Result<Vec<Transaction>> {
        self.transaction_store.find_all().await
    }

    /// Transactions of one account. `sort` is `asc` or `desc` by amount; any
    /// other token keeps store order.
    pub async fn account_transactions(
        &self,
        iban: &str,
        sort: Option<&str>,
    ) -> Result<Vec<Transaction>> {
        let account = self.find_account(iban).await?;
        self.transaction_store
            .find_by_account(&account.iban, SortOrder::from_token(sort))
            .await
    }
}
