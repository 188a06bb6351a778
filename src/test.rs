//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::args::LoginArgs;
use crate::auth::{Credentials, Session};
use crate::config::MonthFilter;
use crate::model::{Amount, ExpenseDate, ExpenseRecord, Ledger, Username};
use crate::store::LedgerStore;
use crate::Config;
use tempfile::TempDir;

const ALICE: &str = "alice";
const ALICE_PASSWORD: &str = "pw";

/// Test environment that sets up a spendbook home directory with a Config.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    /// Creates a test environment with an initialized home directory and no users.
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().join("spendbook");
        let config = Config::create(&root).await.unwrap();

        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    pub fn store(&self) -> LedgerStore {
        self.config.store()
    }

    pub fn alice(&self) -> Username {
        Username::new(ALICE).unwrap()
    }

    pub fn alice_login(&self) -> LoginArgs {
        LoginArgs::new(ALICE, ALICE_PASSWORD)
    }

    pub async fn set_month_filter(&mut self, month_filter: MonthFilter) {
        self.config.set_month_filter(month_filter).await;
    }

    /// Registers alice and returns her session.
    pub async fn signup_alice(&self) -> Session {
        let mut credentials = Credentials::load(self.config.credentials_path())
            .await
            .unwrap();
        credentials
            .signup(ALICE, ALICE_PASSWORD, ALICE_PASSWORD)
            .await
            .unwrap();
        credentials.login(ALICE, ALICE_PASSWORD).unwrap()
    }

    /// Saves this ledger for alice, replacing whatever she had:
    ///
    /// | id | date       | title  | amount |
    /// |----|------------|--------|--------|
    /// | 1  | 04-02-2025 | Coffee | 50     |
    /// | 2  | 04-02-2025 | Lunch  | 200    |
    /// | 3  | 09-02-2025 | Movie  | 300    |
    /// | 4  | 11-02-2025 | Coffee | 60     |
    /// | 5  | 20-02-2024 | Books  | 500    |
    ///
    /// The 9th of February 2025 is a Sunday.
    pub async fn seed_alice(&self) -> Ledger {
        let rows = [
            ((2025, 2, 4), "Coffee", 50),
            ((2025, 2, 4), "Lunch", 200),
            ((2025, 2, 9), "Movie", 300),
            ((2025, 2, 11), "Coffee", 60),
            ((2024, 2, 20), "Books", 500),
        ];
        let records = rows.into_iter().map(|((y, m, d), title, amount)| {
            ExpenseRecord::new(
                ExpenseDate::from_ymd(y, m, d).unwrap(),
                title,
                Amount::from(amount),
            )
            .unwrap()
        });
        let ledger = Ledger::from_records(self.alice(), records);
        self.store().save(&ledger).await.unwrap();
        ledger
    }
}
