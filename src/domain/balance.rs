//! Balance rules applied when a transaction is posted.

use super::account::Account;
use crate::error::{BankError, Result};
use rust_decimal::Decimal;

/// Computes the balance an account holds after posting `amount`.
///
/// A never-seen account opens with `amount` itself, so it cannot open with a
/// debit. Fails with [`BankError::InsufficientFunds`] whenever the result would
/// be negative; nothing is mutated either way.
pub fn compute_new_balance(
    iban: &str,
    existing: Option<&Account>,
    amount: Decimal,
) -> Result<Decimal> {
    let balance = existing.map(|a| a.balance).unwrap_or(Decimal::ZERO);
    let new_balance = balance
        .checked_add(amount)
        .ok_or_else(|| BankError::InvalidInput(format!("amount {amount} overflows the balance")))?;

    if new_balance < Decimal::ZERO {
        return Err(BankError::InsufficientFunds {
            iban: iban.to_string(),
            balance,
            amount,
        });
    }
    Ok(new_balance)
}
