//! Reading and writing a user's ledger file.
//!
//! A ledger file is a CSV with exactly the header `Date,Title,Amount`. Dates are written in the
//! day-first `DD-MM-YYYY` form and parsed day-first when read back. Rows appear in insertion
//! order. Files are always replaced whole.

use crate::backup::Backup;
use crate::config::{ledger_extension, ledger_stem};
use crate::error::{Error, ErrorType, IntoResult};
use crate::model::{Amount, ExpenseDate, ExpenseRecord, Ledger, Username};
use crate::{utils, Config, Result};
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, trace};

/// The column headers, in order.
pub const HEADERS: [&str; 3] = ["Date", "Title", "Amount"];

// "Date","Title","Amount"
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct CsvRecord {
    date: String,
    title: String,
    amount: String,
}

impl From<&ExpenseRecord> for CsvRecord {
    fn from(record: &ExpenseRecord) -> Self {
        Self {
            date: record.date().format(),
            title: record.title().to_string(),
            amount: record.amount().to_string(),
        }
    }
}

/// Loads and saves ledgers in the spendbook home directory.
#[derive(Debug, Clone)]
pub struct LedgerStore {
    root: PathBuf,
    backup: Backup,
}

impl LedgerStore {
    /// Creates a new `LedgerStore` from a `Config`.
    pub fn new(config: &Config) -> Self {
        Self {
            root: config.root().to_path_buf(),
            backup: config.backup(),
        }
    }

    /// The backing file of `user`'s ledger.
    pub fn path(&self, user: &Username) -> PathBuf {
        self.root.join(format!("{}.{}", ledger_stem(user), ledger_extension()))
    }

    /// Loads `user`'s ledger. A user without a ledger file gets an empty ledger.
    ///
    /// # Errors
    /// - `Storage` if the file cannot be read or its header is not `Date,Title,Amount`.
    /// - `Parse` if a row has a date, title or amount that cannot be understood.
    pub async fn load(&self, user: &Username) -> Result<Ledger> {
        let path = self.path(user);
        match utils::read_optional(&path)
            .await
            .pub_result(ErrorType::Storage)?
        {
            Some(content) => {
                let ledger = parse_ledger(user, &content)
                    .with_context(|| format!("Unable to load the ledger at {}", path.display()))
                    .pub_result(ErrorType::Storage)?;
                debug!("Loaded {} expenses for {user}", ledger.len());
                Ok(ledger)
            }
            None => {
                debug!("No ledger file for {user} at {}, starting empty", path.display());
                Ok(Ledger::new(user.clone()))
            }
        }
    }

    /// Like `load`, but a missing ledger file is a `NotFound` error.
    pub async fn load_existing(&self, user: &Username) -> Result<Ledger> {
        let path = self.path(user);
        if !path.is_file() {
            return Err(Error::msg(
                ErrorType::NotFound,
                format!("{user} has no ledger file at {}", path.display()),
            ));
        }
        self.load(user).await
    }

    /// Writes every entry of `ledger` to its owner's file, replacing the file all-or-nothing.
    ///
    /// If a previous version of the file exists it is copied to the backups directory first.
    pub async fn save(&self, ledger: &Ledger) -> Result<()> {
        let user = ledger.owner();
        let path = self.path(user);
        let data = serialize_ledger(ledger).pub_result(ErrorType::Storage)?;

        if path.is_file() {
            let backup = self
                .backup
                .copy_file(&path, &ledger_stem(user), ledger_extension())
                .await
                .context("Unable to back up the ledger before saving")
                .pub_result(ErrorType::Storage)?;
            trace!("Saved backup to {}", backup.display());
        }

        write_ledger_file(&path, data)
            .await
            .pub_result(ErrorType::Storage)?;
        debug!("Saved {} expenses for {user} to {}", ledger.len(), path.display());
        Ok(())
    }
}

async fn write_ledger_file(path: &Path, data: Vec<u8>) -> anyhow::Result<()> {
    utils::write_atomic(path, data)
        .await
        .with_context(|| format!("Unable to save the ledger to {}", path.display()))
}

fn parse_ledger(user: &Username, content: &str) -> anyhow::Result<Ledger> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_reader(content.as_bytes());

    // An empty file has no header row at all, which fails this check too.
    let headers = reader.headers().context("Unable to read the header row")?;
    if headers.iter().ne(HEADERS.iter().copied()) {
        anyhow::bail!(
            "Expected the columns {} but found {}",
            HEADERS.join(","),
            headers.iter().collect::<Vec<_>>().join(",")
        );
    }

    let mut records = Vec::new();
    for (ix, row) in reader.deserialize::<CsvRecord>().enumerate() {
        // Row 1 is the header.
        let line = ix + 2;
        let row = row.with_context(|| format!("Unable to read row {line}"))?;
        let record = parse_row(row).with_context(|| format!("Row {line} is invalid"))?;
        records.push(record);
    }
    Ok(Ledger::from_records(user.clone(), records))
}

fn parse_row(row: CsvRecord) -> anyhow::Result<ExpenseRecord> {
    let date = ExpenseDate::parse(&row.date).pub_result(ErrorType::Parse)?;
    let amount = Amount::from_str(&row.amount).pub_result(ErrorType::Parse)?;
    let record = ExpenseRecord::new(date, &row.title, amount)
        .map_err(|e| Error::new(ErrorType::Parse, e))?;
    Ok(record)
}

fn serialize_ledger(ledger: &Ledger) -> anyhow::Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    // Written by hand so that an empty ledger still gets its header.
    writer
        .write_record(HEADERS)
        .context("Unable to write the header row")?;
    for record in ledger.records() {
        writer
            .serialize(CsvRecord::from(record))
            .context("Unable to serialize an expense")?;
    }
    writer
        .into_inner()
        .map_err(|e| anyhow::anyhow!("Unable to flush the CSV writer: {e}"))
}
