use std::fs::File;
use std::io::Error;
use std::path::Path;

pub const HEADER: [&str; 6] = ["reference", "account_iban", "date", "amount", "fee", "description"];

/// Writes `rows` credits of 1.0, spread over `accounts` IBANs, each with its own reference.
pub fn generate_csv(path: &Path, rows: usize, accounts: usize) -> Result<(), Error> {
    let file = File::create(path)?;
    let mut wtr = csv::WriterBuilder::new().from_writer(file);

    wtr.write_record(HEADER)?;

    for i in 1..=rows {
        let iban = format!("ES{:022}", i % accounts);
        wtr.write_record([&format!("{i}R"), &iban, "", "1.0", "", ""])?;
    }

    wtr.flush()?;
    Ok(())
}
