use crate::args::SummaryArgs;
use crate::auth::Session;
use crate::commands::Out;
use crate::model::{Amount, ExpenseDate};
use crate::query::MonthScope;
use crate::{aggregate, query, Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// The totals of one month: overall, per title, per day and, across years, per year.
#[derive(Debug, Clone, Eq, PartialEq, Serialize)]
pub struct MonthSummary {
    month: u32,
    scope: MonthScope,
    expenses: usize,
    total: Amount,
    by_title: BTreeMap<String, Amount>,
    by_day: BTreeMap<ExpenseDate, Amount>,
    by_year: Vec<MonthTotal>,
}

/// The total of one calendar month of one year.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize)]
pub struct MonthTotal {
    year: i32,
    month: u32,
    total: Amount,
}

impl MonthTotal {
    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn total(&self) -> Amount {
        self.total
    }
}

impl MonthSummary {
    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn scope(&self) -> MonthScope {
        self.scope
    }

    /// The number of expenses in the month.
    pub fn expenses(&self) -> usize {
        self.expenses
    }

    pub fn total(&self) -> Amount {
        self.total
    }

    pub fn by_title(&self) -> &BTreeMap<String, Amount> {
        &self.by_title
    }

    pub fn by_day(&self) -> &BTreeMap<ExpenseDate, Amount> {
        &self.by_day
    }

    /// The month's total in each year that has expenses in it, oldest first.
    pub fn by_year(&self) -> &[MonthTotal] {
        &self.by_year
    }

    fn render(&self, currency_symbol: &str) -> String {
        let name = month_name(self.month);
        if self.expenses == 0 {
            return format!("No expenses found for {name} ({})", self.scope);
        }
        let mut lines = vec![
            format!("Summary for {name} ({})", self.scope),
            format!(
                "Total Expense: {} in {} expense(s)",
                self.total.display_with(currency_symbol),
                self.expenses
            ),
            "By title:".to_string(),
        ];
        lines.extend(self.by_title.iter().map(|(title, amount)| {
            format!("  {title}: {}", amount.display_with(currency_symbol))
        }));
        if self.by_year.len() > 1 {
            lines.push("By year:".to_string());
            lines.extend(self.by_year.iter().map(|m| {
                format!("  {name} {}: {}", m.year, m.total.display_with(currency_symbol))
            }));
        }
        lines.push("By day:".to_string());
        lines.extend(self.by_day.iter().map(|(date, amount)| {
            let marker = if date.is_sunday() { " *" } else { "" };
            format!("  {date}: {}{marker}", amount.display_with(currency_symbol))
        }));
        lines.join("\n")
    }
}

fn month_name(month: u32) -> String {
    NaiveDate::from_ymd_opt(2000, month, 1)
        .map(|d| d.format("%B").to_string())
        .unwrap_or_else(|| format!("month {month}"))
}

/// Summarizes one month of the session user's ledger.
///
/// # Errors
/// - `Validation` if the month is not between 1 and 12.
pub async fn summary(
    config: Config,
    session: &Session,
    args: SummaryArgs,
) -> Result<Out<MonthSummary>> {
    let month = args.month();
    let scope = config
        .month_filter()
        .scope(month.year(), ExpenseDate::today().year());
    let ledger = config.store().load(session.username()).await?;
    let entries = query::by_month(&ledger, month.month(), scope)?;

    let summary = MonthSummary {
        month: month.month(),
        scope,
        expenses: entries.len(),
        total: aggregate::sum(entries.iter().copied()),
        by_title: aggregate::group_by_title(entries.iter().copied()),
        by_day: aggregate::daily_totals(entries.iter().copied()),
        by_year: aggregate::monthly_totals(entries.iter().copied())
            .into_iter()
            .map(|((year, month), total)| MonthTotal { year, month, total })
            .collect(),
    };
    Ok(Out::new(summary.render(config.currency_symbol()), summary))
}
