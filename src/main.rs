use bankcore::application::engine::BankEngine;
use bankcore::domain::ports::{AccountStoreBox, TransactionStoreBox};
use bankcore::domain::status::TransactionStatusRequest;
use bankcore::infrastructure::in_memory::{InMemoryAccountStore, InMemoryTransactionStore};
use bankcore::interfaces::csv::account_writer::AccountWriter;
use bankcore::interfaces::csv::transaction_reader::TransactionReader;
use bankcore::interfaces::csv::transaction_writer::TransactionWriter;
use bankcore::observability::{self, LogFormat};
use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use std::fs::File;
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "BANKCORE_DB_PATH", global = true)]
    db_path: Option<PathBuf>,

    /// Log output format, written to stderr.
    #[arg(long, env = "BANKCORE_LOG_FORMAT", value_enum, default_value_t = LogFormat::Text, global = true)]
    log_format: LogFormat,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Post every transaction of a CSV file and print the stored records
    Post {
        /// Input CSV: reference,account_iban,date,amount,fee,description
        input: PathBuf,
        /// After posting, print the status of this reference as a JSON line (repeatable)
        #[arg(long = "status", value_name = "REFERENCE")]
        statuses: Vec<String>,
        /// Channel used for the --status lookups: CLIENT, ATM or INTERNAL
        #[arg(long, requires = "statuses")]
        channel: Option<String>,
    },
    /// Print the status of a transaction as JSON
    ///
    /// Without --db-path (or without the storage-rocksdb feature) the store starts
    /// empty, so every reference is INVALID; use `post --status` instead.
    Status {
        reference: String,
        /// CLIENT, ATM or INTERNAL
        #[arg(long)]
        channel: Option<String>,
    },
    /// List transactions, optionally those of one account sorted by amount
    ///
    /// Only meaningful with persistent storage (--db-path).
    Transactions {
        #[arg(long)]
        account: Option<String>,
        /// asc or desc; anything else keeps store order
        #[arg(long)]
        sort: Option<String>,
    },
    /// List accounts and their balances
    ///
    /// Only meaningful with persistent storage (--db-path).
    Accounts,
}

fn in_memory_engine() -> BankEngine {
    let as_store: AccountStoreBox = Box::new(InMemoryAccountStore::new());
    let ts_store: TransactionStoreBox = Box::new(InMemoryTransactionStore::new());
    BankEngine::new(as_store, ts_store)
}

#[cfg(feature = "storage-rocksdb")]
fn open_engine(db_path: Option<PathBuf>) -> Result<BankEngine> {
    use bankcore::infrastructure::rocksdb::RocksDBStore;

    let Some(db_path) = db_path else {
        return Ok(in_memory_engine());
    };
    let store = RocksDBStore::open(db_path).into_diagnostic()?;
    let as_store: AccountStoreBox = Box::new(store.clone());
    let ts_store: TransactionStoreBox = Box::new(store);
    Ok(BankEngine::new(as_store, ts_store))
}

#[cfg(not(feature = "storage-rocksdb"))]
fn open_engine(db_path: Option<PathBuf>) -> Result<BankEngine> {
    if let Some(db_path) = db_path {
        tracing::warn!(
            db_path = %db_path.display(),
            "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
        );
    }
    Ok(in_memory_engine())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    observability::init(cli.log_format);

    let engine = open_engine(cli.db_path)?;
    let stdout = io::stdout();

    match cli.command {
        Command::Post {
            input,
            statuses,
            channel,
        } => {
            let file = File::open(input).into_diagnostic()?;
            let reader = TransactionReader::new(file);
            let mut writer = TransactionWriter::new(stdout.lock());
            for (row, payload) in reader.transactions().enumerate() {
                match payload {
                    Ok(payload) => match engine.post(payload).await {
                        Ok(tx) => writer.write_transaction(&tx).into_diagnostic()?,
                        Err(e) => tracing::error!(row = row + 1, error = %e, "Error posting transaction"),
                    },
                    Err(e) => tracing::error!(row = row + 1, error = %e, "Error reading transaction"),
                }
            }
            writer.flush().into_diagnostic()?;
            drop(writer);

            for reference in statuses {
                let request = TransactionStatusRequest::parse(reference, channel.as_deref());
                match engine.status(&request).await {
                    Ok(view) => println!("{}", serde_json::to_string(&view).into_diagnostic()?),
                    Err(e) => tracing::error!(reference = %request.reference, error = %e, "Error resolving status"),
                }
            }
        }
        Command::Status { reference, channel } => {
            let request = TransactionStatusRequest::parse(reference, channel.as_deref());
            let view = engine.status(&request).await.into_diagnostic()?;
            println!("{}", serde_json::to_string(&view).into_diagnostic()?);
        }
        Command::Transactions { account, sort } => {
            let transactions = match account {
                Some(iban) => engine.account_transactions(&iban, sort.as_deref()).await,
                None => engine.transactions().await,
            }
            .into_diagnostic()?;
            TransactionWriter::new(stdout.lock())
                .write_transactions(&transactions)
                .into_diagnostic()?;
        }
        Command::Accounts => {
            let accounts = engine.accounts().await.into_diagnostic()?;
            AccountWriter::new(stdout.lock())
                .write_accounts(accounts)
                .into_diagnostic()?;
        }
    }

    Ok(())
}
