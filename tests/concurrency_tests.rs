use bankcore::application::engine::BankEngine;
use bankcore::domain::transaction::TransactionInput;
use bankcore::error::BankError;
use bankcore::infrastructure::in_memory::{InMemoryAccountStore, InMemoryTransactionStore};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use std::sync::Arc;

fn engine() -> Arc<BankEngine> {
    Arc::new(BankEngine::new(
        Box::new(InMemoryAccountStore::new()),
        Box::new(InMemoryTransactionStore::new()),
    ))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_debits_never_overdraw() {
    let engine = engine();
    engine
        .post(TransactionInput::new("ABC123", dec!(100)))
        .await
        .unwrap();

    let handles: Vec<_> = (0..50)
        .map(|i| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .post(TransactionInput::new("ABC123", dec!(-10)).reference(format!("D{i}")))
                    .await
            })
        })
        .collect();

    let mut accepted = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => accepted += 1,
            Err(BankError::InsufficientFunds { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(accepted, 10);
    let account = engine.find_account("ABC123").await.unwrap();
    assert_eq!(account.balance, Decimal::ZERO);
    assert_eq!(
        engine.account_transactions("ABC123", None).await.unwrap().len(),
        11
    );
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_reference_claims_single_winner() {
    let engine = engine();

    let handles: Vec<_> = (0..20)
        .map(|i| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .post(TransactionInput::new(format!("IBAN{i}"), dec!(5)).reference("12345A"))
                    .await
            })
        })
        .collect();

    let mut winners = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => winners += 1,
            Err(BankError::DuplicateReference { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }

    assert_eq!(winners, 1);
    assert_eq!(engine.accounts().await.unwrap().len(), 1);
    assert_eq!(engine.transactions().await.unwrap().len(), 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_concurrent_credits_on_many_accounts() {
    let engine = engine();

    let handles: Vec<_> = (0..200)
        .map(|i| {
            let engine = Arc::clone(&engine);
            tokio::spawn(async move {
                engine
                    .post(TransactionInput::new(format!("IBAN{}", i % 10), dec!(1.5)).reference(format!("C{i}")))
                    .await
            })
        })
        .collect();
    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let accounts = engine.accounts().await.unwrap();
    assert_eq!(accounts.len(), 10);
    for account in accounts {
        assert_eq!(account.balance, dec!(30.0));
    }
}
