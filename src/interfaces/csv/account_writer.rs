use crate::domain::account::Account;
use crate::error::Result;
use std::io::Write;

/// Writes account states as CSV (`iban,opened_at,balance`).
pub struct AccountWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> AccountWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_accounts(&mut self, accounts: impl IntoIterator<Item = Account>) -> Result<()> {
        for account in accounts {
            self.writer.serialize(&account)?;
        }
        self.writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use rust_decimal_macros::dec;

    #[test]
    fn test_write_accounts() {
        let opened_at = Utc.with_ymd_and_hms(2026, 1, 2, 10, 0, 0).unwrap();
        let mut out = Vec::new();
        AccountWriter::new(&mut out)
            .write_accounts(vec![Account::open("ABC123", dec!(69.5), opened_at)])
            .unwrap();

        let text = String::from_utf8(out).unwrap();
        assert_eq!(
            text,
            "iban,opened_at,balance\nABC123,2026-01-02T10:00:00Z,69.5\n"
        );
    }
}
