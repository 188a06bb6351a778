use crate::args::{SearchArgs, SearchBy};
use crate::auth::Session;
use crate::commands::{Listing, Out};
use crate::model::ExpenseDate;
use crate::{query, Config, Result};

/// Lists the session user's expenses of a day, a date range or a month, with their total.
///
/// A search that matches nothing is not an error.
pub async fn search(config: Config, session: &Session, args: SearchArgs) -> Result<Out<Listing>> {
    let ledger = config.store().load(session.username()).await?;

    let (listing, what) = match args.by() {
        SearchBy::Date(by) => {
            let date = by.on().unwrap_or_else(ExpenseDate::today);
            (
                Listing::new(query::by_exact_date(&ledger, date)),
                date.to_string(),
            )
        }
        SearchBy::Range(by) => {
            let end = by.end().unwrap_or_else(ExpenseDate::today);
            (
                Listing::new(query::by_range(&ledger, by.start(), end)),
                format!("{} to {end}", by.start()),
            )
        }
        SearchBy::Month(by) => {
            let scope = config
                .month_filter()
                .scope(by.year(), ExpenseDate::today().year());
            (
                Listing::new(query::by_month(&ledger, by.month(), scope)?),
                format!("month {} of {scope}", by.month()),
            )
        }
    };

    let message = if listing.is_empty() {
        format!("No expenses found for {what}")
    } else {
        listing.render(&format!("Expenses for {what}:"), config.currency_symbol())
    };
    Ok(Out::new(message, listing))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::{MonthArgs, SearchDateArgs, SearchRangeArgs};
    use crate::config::MonthFilter;
    use crate::error::ErrorType;
    use crate::model::Amount;
    use crate::test::TestEnv;

    fn date(y: i32, m: u32, d: u32) -> ExpenseDate {
        ExpenseDate::from_ymd(y, m, d).unwrap()
    }

    fn titles(listing: &Listing) -> Vec<&str> {
        listing.expenses().iter().map(|e| e.title()).collect()
    }

    #[tokio::test]
    async fn test_search_date() {
        let env = TestEnv::new().await;
        let session = env.signup_alice().await;
        env.seed_alice().await;

        let by = SearchBy::Date(SearchDateArgs::new(env.alice_login(), Some(date(2025, 2, 4))));
        let out = search(env.config(), &session, SearchArgs::new(by)).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(titles(listing), vec!["Coffee", "Lunch"]);
        assert_eq!(listing.total(), Amount::from(250));
        assert!(out.message().starts_with("Expenses for 04-02-2025:"));
        assert!(out.message().ends_with("Total Expense: ₹250.00"));
    }

    #[tokio::test]
    async fn test_search_range_is_inclusive() {
        let env = TestEnv::new().await;
        let session = env.signup_alice().await;
        env.seed_alice().await;

        let by = SearchBy::Range(SearchRangeArgs::new(
            env.alice_login(),
            date(2025, 2, 1),
            Some(date(2025, 2, 9)),
        ));
        let out = search(env.config(), &session, SearchArgs::new(by)).await.unwrap();
        let listing = out.structure().unwrap();
        assert_eq!(titles(listing), vec!["Coffee", "Lunch", "Movie"]);
        // The 9th is a Sunday.
        assert!(listing.expenses()[2].sunday());
        assert!(out.message().contains("* [3] 09-02-2025 Sunday"));
    }

    #[tokio::test]
    async fn test_search_nothing_found() {
        let env = TestEnv::new().await;
        let session = env.signup_alice().await;
        env.seed_alice().await;

        let by = SearchBy::Range(SearchRangeArgs::new(
            env.alice_login(),
            date(2025, 2, 10),
            Some(date(2025, 2, 1)),
        ));
        let out = search(env.config(), &session, SearchArgs::new(by)).await.unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert_eq!(out.structure().unwrap().total(), Amount::ZERO);
        assert!(out.message().starts_with("No expenses found"));
    }

    #[tokio::test]
    async fn test_search_month_respects_month_filter() {
        let mut env = TestEnv::new().await;
        let session = env.signup_alice().await;
        env.seed_alice().await;

        let by = SearchBy::Month(MonthArgs::new(env.alice_login(), 2, None));
        let out = search(env.config(), &session, SearchArgs::new(by)).await.unwrap();
        assert_eq!(
            titles(out.structure().unwrap()),
            vec!["Coffee", "Lunch", "Movie", "Coffee", "Books"]
        );

        let by = SearchBy::Month(MonthArgs::new(env.alice_login(), 2, Some(2024)));
        let out = search(env.config(), &session, SearchArgs::new(by)).await.unwrap();
        assert_eq!(titles(out.structure().unwrap()), vec!["Books"]);

        env.set_month_filter(MonthFilter::SingleYear).await;
        let by = SearchBy::Month(MonthArgs::new(env.alice_login(), 2, None));
        let out = search(env.config(), &session, SearchArgs::new(by)).await.unwrap();
        let expected = if ExpenseDate::today().year() == 2025 { 4 } else { 0 };
        assert_eq!(out.structure().unwrap().expenses().len(), expected);
    }

    #[tokio::test]
    async fn test_search_month_out_of_range() {
        let env = TestEnv::new().await;
        let session = env.signup_alice().await;
        let by = SearchBy::Month(MonthArgs::new(env.alice_login(), 13, None));
        let err = search(env.config(), &session, SearchArgs::new(by))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Validation);
    }
}
