use crate::domain::transaction::Transaction;
use crate::error::Result;
use std::io::Write;

/// Writes posted transactions as CSV, one row per transaction.
pub struct TransactionWriter<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> TransactionWriter<W> {
    pub fn new(sink: W) -> Self {
        Self {
            writer: csv::Writer::from_writer(sink),
        }
    }

    pub fn write_transaction(&mut self, tx: &Transaction) -> Result<()> {
        self.writer.serialize(tx)?;
        Ok(())
    }

    pub fn write_transactions<'a>(
        &mut self,
        transactions: impl IntoIterator<Item = &'a Transaction>,
    ) -> Result<()> {
        for tx in transactions {
            self.write_transaction(tx)?;
        }
        self.flush()
    }

    pub fn flush(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}
