use crate::error::{Error, ErrorType};
use crate::model::{Amount, ExpenseDate};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// One expense: what it was, when, and how much.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct ExpenseRecord {
    date: ExpenseDate,
    title: String,
    amount: Amount,
}

impl ExpenseRecord {
    /// Creates a record. The title is trimmed and must not be empty afterwards.
    pub fn new(
        date: impl Into<ExpenseDate>,
        title: impl AsRef<str>,
        amount: Amount,
    ) -> Result<Self> {
        Ok(Self {
            date: date.into(),
            title: validate_title(title)?,
            amount,
        })
    }

    pub fn date(&self) -> ExpenseDate {
        self.date
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// The `"title - amount"` string shown in selection lists.
    pub fn label(&self) -> String {
        format!("{} - {}", self.title, self.amount)
    }

    pub(crate) fn set_title(&mut self, title: impl AsRef<str>) -> Result<()> {
        self.title = validate_title(title)?;
        Ok(())
    }

    pub(crate) fn set_amount(&mut self, amount: Amount) {
        self.amount = amount;
    }
}

impl AsRef<ExpenseRecord> for ExpenseRecord {
    fn as_ref(&self) -> &ExpenseRecord {
        self
    }
}

fn validate_title(title: impl AsRef<str>) -> Result<String> {
    let trimmed = title.as_ref().trim();
    if trimmed.is_empty() {
        return Err(Error::msg(
            ErrorType::Validation,
            "Expense title cannot be empty",
        ));
    }
    Ok(trimmed.to_string())
}

/// Identifies one entry within a loaded ledger.
///
/// Ids are handed out in file order when a ledger is loaded, starting at 1, and keep counting up
/// for entries added afterwards. They are not written to the ledger file.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(u64);

impl RecordId {
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(&self) -> u64 {
        self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl From<u64> for RecordId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// An `ExpenseRecord` together with the `RecordId` it has in its ledger.
#[derive(Debug, Clone, Eq, PartialEq, Hash, Serialize)]
pub struct Entry {
    id: RecordId,
    #[serde(flatten)]
    record: ExpenseRecord,
}

impl Entry {
    pub(crate) fn new(id: RecordId, record: ExpenseRecord) -> Self {
        Self { id, record }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn record(&self) -> &ExpenseRecord {
        &self.record
    }

    pub(crate) fn record_mut(&mut self) -> &mut ExpenseRecord {
        &mut self.record
    }
}

impl AsRef<ExpenseRecord> for Entry {
    fn as_ref(&self) -> &ExpenseRecord {
        &self.record
    }
}

impl std::ops::Deref for Entry {
    type Target = ExpenseRecord;

    fn deref(&self) -> &Self::Target {
        &self.record
    }
}
