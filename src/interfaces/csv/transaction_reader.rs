use crate::domain::transaction::TransactionInput;
use crate::error::{BankError, Result};
use std::io::Read;

/// Reads posting payloads from a CSV source.
///
/// Expected header: `reference,account_iban,date,amount,fee,description`.
/// Empty fields are treated as absent. Dates are RFC 3339.
pub struct TransactionReader<R: Read> {
    reader: csv::Reader<R>,
}

impl<R: Read> TransactionReader<R> {
    /// Creates a new `TransactionReader` from any `Read` source (e.g., File, Stdin).
    pub fn new(source: R) -> Self {
        let reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_reader(source);
        Self { reader }
    }

    /// Returns an iterator that lazily reads and deserializes payloads.
    pub fn transactions(self) -> impl Iterator<Item = Result<TransactionInput>> {
        self.reader
            .into_deserialize()
            .map(|result| result.map_err(BankError::from))
    }
}
