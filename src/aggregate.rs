//! Totals over a set of expense records.
//!
//! These functions accept anything that can be viewed as an [`ExpenseRecord`], so they work on a
//! whole ledger as well as on the result of a query.

use crate::model::{Amount, ExpenseDate, ExpenseRecord};
use std::collections::BTreeMap;

/// The total amount of `records`. Zero when there are none.
pub fn sum<'a, R>(records: impl IntoIterator<Item = &'a R>) -> Amount
where
    R: AsRef<ExpenseRecord> + 'a,
{
    records.into_iter().map(|r| r.as_ref().amount()).sum()
}

/// The total amount per distinct title, ordered by title. Titles must match exactly.
pub fn group_by_title<'a, R>(records: impl IntoIterator<Item = &'a R>) -> BTreeMap<String, Amount>
where
    R: AsRef<ExpenseRecord> + 'a,
{
    let mut totals: BTreeMap<String, Amount> = BTreeMap::new();
    for record in records {
        let record = record.as_ref();
        let total = totals.entry(record.title().to_string()).or_default();
        *total = *total + record.amount();
    }
    totals
}

/// The total amount per day, oldest first. Days without expenses are absent.
pub fn daily_totals<'a, R>(
    records: impl IntoIterator<Item = &'a R>,
) -> BTreeMap<ExpenseDate, Amount>
where
    R: AsRef<ExpenseRecord> + 'a,
{
    let mut totals: BTreeMap<ExpenseDate, Amount> = BTreeMap::new();
    for record in records {
        let record = record.as_ref();
        let total = totals.entry(record.date()).or_default();
        *total = *total + record.amount();
    }
    totals
}

/// The total amount per `(year, month)`, oldest first.
pub fn monthly_totals<'a, R>(
    records: impl IntoIterator<Item = &'a R>,
) -> BTreeMap<(i32, u32), Amount>
where
    R: AsRef<ExpenseRecord> + 'a,
{
    let mut totals: BTreeMap<(i32, u32), Amount> = BTreeMap::new();
    for record in records {
        let record = record.as_ref();
        let date = record.date();
        let total = totals.entry((date.year(), date.month())).or_default();
        *total = *total + record.amount();
    }
    totals
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Entry, Ledger, Username};
    use crate::query;
    use std::str::FromStr;

    fn record(y: i32, m: u32, d: u32, title: &str, amount: &str) -> ExpenseRecord {
        ExpenseRecord::new(
            ExpenseDate::from_ymd(y, m, d).unwrap(),
            title,
            Amount::from_str(amount).unwrap(),
        )
        .unwrap()
    }

    fn records() -> Vec<ExpenseRecord> {
        vec![
            record(2025, 2, 4, "Coffee", "50"),
            record(2025, 2, 4, "Lunch", "200.50"),
            record(2025, 2, 11, "Coffee", "60"),
            record(2025, 3, 1, "Rent", "9000"),
            record(2024, 12, 31, "coffee", "40"),
        ]
    }

    fn amount(s: &str) -> Amount {
        Amount::from_str(s).unwrap()
    }

    #[test]
    fn test_sum() {
        assert_eq!(sum(&records()), amount("9350.50"));
    }

    #[test]
    fn test_sum_of_nothing_is_zero() {
        let empty: Vec<ExpenseRecord> = Vec::new();
        assert_eq!(sum(&empty), Amount::ZERO);
        assert!(group_by_title(&empty).is_empty());
    }

    #[test]
    fn test_group_by_title_is_exact_and_ordered() {
        let groups = group_by_title(&records());
        let titles: Vec<&str> = groups.keys().map(String::as_str).collect();
        assert_eq!(titles, vec!["Coffee", "Lunch", "Rent", "coffee"]);
        assert_eq!(groups["Coffee"], amount("110"));
        assert_eq!(groups["coffee"], amount("40"));
    }

    #[test]
    fn test_group_totals_add_up_to_sum() {
        let records = records();
        let groups = group_by_title(&records);
        let group_total: Amount = groups.values().sum();
        assert_eq!(group_total, sum(&records));
    }

    #[test]
    fn test_daily_totals() {
        let totals = daily_totals(&records());
        let days: Vec<String> = totals.keys().map(ExpenseDate::format).collect();
        assert_eq!(days, vec!["31-12-2024", "04-02-2025", "11-02-2025", "01-03-2025"]);
        assert_eq!(
            totals[&ExpenseDate::from_ymd(2025, 2, 4).unwrap()],
            amount("250.50")
        );
    }

    #[test]
    fn test_monthly_totals() {
        let totals = monthly_totals(&records());
        let months: Vec<(i32, u32)> = totals.keys().copied().collect();
        assert_eq!(months, vec![(2024, 12), (2025, 2), (2025, 3)]);
        assert_eq!(totals[&(2025, 2)], amount("310.50"));
    }

    #[test]
    fn test_aggregates_over_query_results() {
        let ledger = Ledger::from_records(Username::new("alice").unwrap(), records());
        let february: Vec<&Entry> =
            query::by_month(&ledger, 2, query::MonthScope::AllYears).unwrap();
        assert_eq!(sum(february.iter().copied()), amount("310.50"));
        assert_eq!(sum(ledger.entries()), amount("9350.50"));
    }
}
