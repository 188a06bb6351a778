use crate::error::{Error, ErrorType};
use crate::model::{Amount, Entry, ExpenseRecord, RecordId, Username};
use crate::Result;
use tracing::trace;

/// The ordered expense entries of one user.
///
/// All mutations work on the in-memory sequence only. Nothing reaches the disk until the ledger is
/// handed to `LedgerStore::save`.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Ledger {
    owner: Username,
    entries: Vec<Entry>,
    next_id: u64,
}

impl Ledger {
    /// An empty ledger for `owner`.
    pub fn new(owner: Username) -> Self {
        Self {
            owner,
            entries: Vec::new(),
            next_id: 1,
        }
    }

    /// Builds a ledger from records in file order, numbering them from 1.
    pub fn from_records(owner: Username, records: impl IntoIterator<Item = ExpenseRecord>) -> Self {
        let mut ledger = Self::new(owner);
        for record in records {
            ledger.add(record);
        }
        ledger
    }

    pub fn owner(&self) -> &Username {
        &self.owner
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn records(&self) -> impl Iterator<Item = &ExpenseRecord> {
        self.entries.iter().map(Entry::record)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, id: RecordId) -> Option<&Entry> {
        self.entries.iter().find(|e| e.id() == id)
    }

    /// Appends `record` and returns the id it was given.
    ///
    /// The title and amount were already validated when the `ExpenseRecord` was built.
    pub fn add(&mut self, record: ExpenseRecord) -> RecordId {
        let id = RecordId::new(self.next_id);
        self.next_id += 1;
        trace!("Adding entry {id} to the ledger of {}", self.owner);
        self.entries.push(Entry::new(id, record));
        id
    }

    /// Replaces the title and amount of the entry `id`. On error nothing is changed.
    pub fn edit(&mut self, id: RecordId, new_title: &str, new_amount: Amount) -> Result<&Entry> {
        let ix = self.position(id)?;
        let entry = &mut self.entries[ix];
        entry.record_mut().set_title(new_title)?;
        entry.record_mut().set_amount(new_amount);
        Ok(&self.entries[ix])
    }

    /// Removes the entry `id` and returns it. The ids of the other entries do not change.
    pub fn delete(&mut self, id: RecordId) -> Result<Entry> {
        let ix = self.position(id)?;
        Ok(self.entries.remove(ix))
    }

    fn position(&self, id: RecordId) -> Result<usize> {
        self.entries
            .iter()
            .position(|e| e.id() == id)
            .ok_or_else(|| {
                Error::msg(
                    ErrorType::NotFound,
                    format!("There is no expense with id {id} in the ledger of {}", self.owner),
                )
            })
    }
}

/// Finds the first entry whose `"title - amount"` label equals `label`.
///
/// Entries that share a title and amount have the same label, so the first one in `entries` wins.
/// Prefer targeting entries by `RecordId` where possible.
pub fn resolve_label<'a, I>(entries: I, label: &str) -> Option<RecordId>
where
    I: IntoIterator<Item = &'a Entry>,
{
    let wanted = label.trim();
    entries
        .into_iter()
        .find(|e| e.label() == wanted)
        .map(Entry::id)
}
