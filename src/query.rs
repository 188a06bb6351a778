//! Selecting entries of a ledger by date.
//!
//! Every function here borrows the ledger and returns the matching entries in ledger order. The
//! ledger itself is never changed.

use crate::error::{Error, ErrorType};
use crate::model::{Entry, ExpenseDate, Ledger};
use crate::Result;
use serde::Serialize;
use std::fmt::{Display, Formatter};
use tracing::trace;

/// Which years a month search covers.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthScope {
    /// The month in every year the ledger has.
    AllYears,
    /// The month of one year only.
    Year(i32),
}

impl Display for MonthScope {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            MonthScope::AllYears => f.write_str("all years"),
            MonthScope::Year(year) => write!(f, "{year}"),
        }
    }
}

/// Entries dated exactly `date`.
pub fn by_exact_date(ledger: &Ledger, date: ExpenseDate) -> Vec<&Entry> {
    ledger
        .entries()
        .iter()
        .filter(|e| e.date() == date)
        .collect()
}

/// Entries dated from `start` to `end`, both inclusive. A backwards range matches nothing.
pub fn by_range(ledger: &Ledger, start: ExpenseDate, end: ExpenseDate) -> Vec<&Entry> {
    if start > end {
        trace!("Range {start} to {end} is backwards, nothing matches");
        return Vec::new();
    }
    ledger
        .entries()
        .iter()
        .filter(|e| start <= e.date() && e.date() <= end)
        .collect()
}

/// Entries whose month is `month` (1 to 12) within `scope`.
///
/// # Errors
/// - `Validation` if `month` is not between 1 and 12.
pub fn by_month(ledger: &Ledger, month: u32, scope: MonthScope) -> Result<Vec<&Entry>> {
    validate_month(month)?;
    Ok(ledger
        .entries()
        .iter()
        .filter(|e| {
            let date = e.date();
            date.month() == month
                && match scope {
                    MonthScope::AllYears => true,
                    MonthScope::Year(year) => date.year() == year,
                }
        })
        .collect())
}

pub(crate) fn validate_month(month: u32) -> Result<()> {
    if !(1..=12).contains(&month) {
        return Err(Error::msg(
            ErrorType::Validation,
            format!("Month must be between 1 and 12, got {month}"),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Amount, ExpenseRecord, Username};

    fn date(y: i32, m: u32, d: u32) -> ExpenseDate {
        ExpenseDate::from_ymd(y, m, d).unwrap()
    }

    fn ledger() -> Ledger {
        let rows = [
            (date(2025, 2, 4), "Coffee", 50),
            (date(2025, 2, 11), "Lunch", 200),
            (date(2025, 2, 4), "Bus", 30),
            (date(2024, 2, 20), "Books", 500),
            (date(2025, 3, 1), "Rent", 9000),
        ];
        Ledger::from_records(
            Username::new("alice").unwrap(),
            rows.into_iter()
                .map(|(d, t, a)| ExpenseRecord::new(d, t, Amount::from(a)).unwrap()),
        )
    }

    fn titles(entries: &[&Entry]) -> Vec<String> {
        entries.iter().map(|e| e.title().to_string()).collect()
    }

    #[test]
    fn test_by_exact_date_keeps_ledger_order() {
        let ledger = ledger();
        let found = by_exact_date(&ledger, date(2025, 2, 4));
        assert_eq!(titles(&found), vec!["Coffee", "Bus"]);
        assert!(by_exact_date(&ledger, date(2025, 2, 5)).is_empty());
    }

    #[test]
    fn test_by_range_is_inclusive() {
        let ledger = ledger();
        let found = by_range(&ledger, date(2025, 2, 1), date(2025, 2, 10));
        assert_eq!(titles(&found), vec!["Coffee", "Bus"]);

        let found = by_range(&ledger, date(2025, 2, 4), date(2025, 2, 11));
        assert_eq!(titles(&found), vec!["Coffee", "Lunch", "Bus"]);
    }

    #[test]
    fn test_by_range_single_day_equals_exact_date() {
        let ledger = ledger();
        let day = date(2025, 2, 4);
        assert_eq!(by_range(&ledger, day, day), by_exact_date(&ledger, day));
    }

    #[test]
    fn test_by_range_backwards_is_empty() {
        let ledger = ledger();
        assert!(by_range(&ledger, date(2025, 2, 10), date(2025, 2, 1)).is_empty());
    }

    #[test]
    fn test_by_month_all_years() {
        let ledger = ledger();
        let found = by_month(&ledger, 2, MonthScope::AllYears).unwrap();
        assert_eq!(titles(&found), vec!["Coffee", "Lunch", "Bus", "Books"]);
    }

    #[test]
    fn test_by_month_single_year() {
        let ledger = ledger();
        let found = by_month(&ledger, 2, MonthScope::Year(2024)).unwrap();
        assert_eq!(titles(&found), vec!["Books"]);
        assert!(by_month(&ledger, 7, MonthScope::AllYears).unwrap().is_empty());
    }

    #[test]
    fn test_by_month_out_of_range() {
        let ledger = ledger();
        for month in [0, 13] {
            let err = by_month(&ledger, month, MonthScope::AllYears).unwrap_err();
            assert_eq!(err.error_type(), ErrorType::Validation);
        }
    }

    #[test]
    fn test_month_scope_display() {
        assert_eq!(MonthScope::AllYears.to_string(), "all years");
        assert_eq!(MonthScope::Year(2025).to_string(), "2025");
    }
}
