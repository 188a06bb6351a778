//! Command handlers for the spendbook CLI.
//!
//! This module contains implementations for all CLI subcommands. Every ledger command receives
//! the `Session` of the user it acts for, obtained through [`authenticate`].

mod add;
mod auth;
mod delete;
mod edit;
mod init;
mod search;
mod summary;

use crate::args::{Target, TargetArgs};
use crate::error::{Error, ErrorType};
use crate::model::{resolve_label, Amount, Entry, ExpenseDate, Ledger, RecordId};
use crate::{query, Result};
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use add::add;
pub use auth::{authenticate, login, signup};
pub use delete::delete;
pub use edit::edit;
pub use init::init;
pub use search::search;
pub use summary::{summary, MonthSummary, MonthTotal};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// Print the message to `info!` and the structured data (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// One expense as shown to the user.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct ExpenseView {
    id: RecordId,
    date: ExpenseDate,
    weekday: String,
    sunday: bool,
    title: String,
    amount: Amount,
}

impl ExpenseView {
    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn date(&self) -> ExpenseDate {
        self.date
    }

    /// The full English name of the day, e.g. `Wednesday`.
    pub fn weekday(&self) -> &str {
        &self.weekday
    }

    pub fn sunday(&self) -> bool {
        self.sunday
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    /// A single line for listings. Sundays are marked with `*`.
    pub fn line(&self, currency_symbol: &str) -> String {
        let marker = if self.sunday { '*' } else { ' ' };
        format!(
            "{marker} [{}] {} {:<9}  {}  {}",
            self.id,
            self.date,
            self.weekday,
            self.title,
            self.amount.display_with(currency_symbol)
        )
    }
}

impl From<&Entry> for ExpenseView {
    fn from(entry: &Entry) -> Self {
        let date = entry.date();
        Self {
            id: entry.id(),
            date,
            weekday: date.naive().format("%A").to_string(),
            sunday: date.is_sunday(),
            title: entry.title().to_string(),
            amount: entry.amount(),
        }
    }
}

/// A list of expenses with their total.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct Listing {
    expenses: Vec<ExpenseView>,
    total: Amount,
}

impl Listing {
    pub fn new<'a>(entries: impl IntoIterator<Item = &'a Entry>) -> Self {
        let expenses: Vec<ExpenseView> = entries.into_iter().map(ExpenseView::from).collect();
        let total = expenses.iter().map(ExpenseView::amount).sum();
        Self { expenses, total }
    }

    pub fn expenses(&self) -> &[ExpenseView] {
        &self.expenses
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    /// Renders the listing under `heading`, followed by the total.
    pub(crate) fn render(&self, heading: &str, currency_symbol: &str) -> String {
        let mut lines = vec![heading.to_string()];
        lines.extend(self.expenses.iter().map(|e| e.line(currency_symbol)));
        if self.expenses.iter().any(ExpenseView::sunday) {
            lines.push("  (* Sunday)".to_string());
        }
        lines.push(format!(
            "Total Expense: {}",
            self.total.display_with(currency_symbol)
        ));
        lines.join("\n")
    }
}

/// Finds the entry that an `edit` or `delete` is aimed at.
fn find_target<'a>(ledger: &'a Ledger, target: &TargetArgs) -> Result<&'a Entry> {
    let target = target.target().ok_or_else(|| {
        Error::msg(
            ErrorType::Validation,
            "Choose an expense with --id, or with --date and --select",
        )
    })?;
    match target {
        Target::Id { id, label } => {
            let entry = ledger.get(id).ok_or_else(|| {
                Error::msg(
                    ErrorType::NotFound,
                    format!("There is no expense with id {id}"),
                )
            })?;
            match label {
                Some(label) if entry.label() != label.trim() => Err(Error::msg(
                    ErrorType::NotFound,
                    format!(
                        "Expense {id} is '{}', not '{}'. Search again for its current id",
                        entry.label(),
                        label.trim()
                    ),
                )),
                _ => Ok(entry),
            }
        }
        Target::Label { date, label } => {
            let on_day = query::by_exact_date(ledger, date);
            if on_day.is_empty() {
                return Err(Error::msg(
                    ErrorType::NotFound,
                    format!("No expenses found for {date}"),
                ));
            }
            resolve_label(on_day.iter().copied(), &label)
                .and_then(|id| ledger.get(id))
                .ok_or_else(|| {
                    Error::msg(
                        ErrorType::NotFound,
                        format!("No expense '{label}' on {date}"),
                    )
                })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ExpenseRecord, Username};

    fn ledger() -> Ledger {
        let rows = [
            ((2025, 2, 9), "Movie", 300),
            ((2025, 2, 5), "Coffee", 50),
            ((2025, 2, 5), "Coffee", 50),
        ];
        Ledger::from_records(
            Username::new("alice").unwrap(),
            rows.into_iter().map(|((y, m, d), t, a)| {
                ExpenseRecord::new(ExpenseDate::from_ymd(y, m, d).unwrap(), t, Amount::from(a))
                    .unwrap()
            }),
        )
    }

    #[test]
    fn test_expense_view() {
        let ledger = ledger();
        let sunday = ExpenseView::from(&ledger.entries()[0]);
        assert_eq!(sunday.weekday(), "Sunday");
        assert!(sunday.sunday());
        assert_eq!(sunday.line("₹"), "* [1] 09-02-2025 Sunday     Movie  ₹300.00");

        let wednesday = ExpenseView::from(&ledger.entries()[1]);
        assert_eq!(wednesday.weekday(), "Wednesday");
        assert!(!wednesday.sunday());
        assert!(wednesday.line("$").starts_with("  [2] 05-02-2025 Wednesday"));
    }

    #[test]
    fn test_listing_total() {
        let ledger = ledger();
        let listing = Listing::new(ledger.entries());
        assert_eq!(listing.expenses().len(), 3);
        assert_eq!(listing.total(), Amount::from(400));
        let text = listing.render("Expenses:", "₹");
        assert!(text.ends_with("Total Expense: ₹400.00"));
        assert!(text.contains("(* Sunday)"));
    }

    #[test]
    fn test_find_target_by_label_takes_first_on_that_day() {
        let ledger = ledger();
        let date = ExpenseDate::from_ymd(2025, 2, 5).unwrap();
        let entry = find_target(&ledger, &TargetArgs::label(date, "Coffee - 50")).unwrap();
        assert_eq!(entry.id(), RecordId::new(2));

        let err = find_target(&ledger, &TargetArgs::label(date, "Movie - 300")).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }

    #[test]
    fn test_find_target_by_id() {
        let ledger = ledger();
        let entry = find_target(&ledger, &TargetArgs::id(3u64)).unwrap();
        assert_eq!(entry.id(), RecordId::new(3));
        let err = find_target(&ledger, &TargetArgs::id(9u64)).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
    }

    #[test]
    fn test_find_target_by_id_checks_the_label() {
        let ledger = ledger();
        let target = TargetArgs::id_with_label(1u64, " Movie - 300 ");
        assert_eq!(find_target(&ledger, &target).unwrap().id(), RecordId::new(1));

        let target = TargetArgs::id_with_label(1u64, "Coffee - 50");
        let err = find_target(&ledger, &target).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert!(err.to_string().contains("Expense 1 is 'Movie - 300'"));
    }
}
