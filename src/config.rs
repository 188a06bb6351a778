//! Configuration file handling for spendbook.
//!
//! The configuration file is stored at `$SPENDBOOK_HOME/config.json` and contains settings such as
//! how many ledger backups to keep and how month searches treat years.

use crate::backup::Backup;
use crate::error::{ErrorType, IntoResult};
use crate::model::Username;
use crate::query::MonthScope;
use crate::store::LedgerStore;
use crate::{utils, Result};
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const APP_NAME: &str = "spendbook";
const CONFIG_VERSION: u8 = 1;
const BACKUP_COPIES: u32 = 5;
const CURRENCY_SYMBOL: &str = "₹";
const BACKUPS: &str = ".backups";
const CONFIG_JSON: &str = "config.json";
const CREDENTIALS_JSON: &str = "user_credentials.json";
const LEDGER_PREFIX: &str = "expenses_";
const LEDGER_EXTENSION: &str = "csv";

/// The `Config` object represents the configuration of the app. You instantiate it by providing
/// the path to `$SPENDBOOK_HOME` and from there it loads `$SPENDBOOK_HOME/config.json`. It
/// provides paths to the files that are expected in a certain location within the home directory.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    backups: PathBuf,
    config_path: PathBuf,
    credentials_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Creates the data directory, its backups subdirectory and an initial `config.json` with
    /// default settings.
    ///
    /// # Errors
    /// - Returns an error if the directory is already initialized or any file operation fails.
    pub async fn create(dir: impl Into<PathBuf>) -> Result<Self> {
        Self::create_inner(dir.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(maybe_relative: PathBuf) -> anyhow::Result<Self> {
        utils::make_dir(&maybe_relative)
            .await
            .context("Unable to create the spendbook home directory")?;
        let root = utils::canonicalize(&maybe_relative).await?;

        let config_path = root.join(CONFIG_JSON);
        if config_path.exists() {
            bail!(
                "The directory '{}' is already initialized, found '{}'",
                root.display(),
                config_path.display()
            )
        }

        let backups = root.join(BACKUPS);
        utils::make_dir(&backups).await?;

        let config_file = ConfigFile::default();
        config_file.save(&config_path).await?;

        Ok(Self {
            credentials_path: root.join(CREDENTIALS_JSON),
            root,
            backups,
            config_path,
            config_file,
        })
    }

    /// This will
    /// - validate that the home directory exists and that the config file exists
    /// - load the config file
    /// - validate that the backups directory exists
    /// - return the loaded configuration object
    pub async fn load(home: impl Into<PathBuf>) -> Result<Self> {
        Self::load_inner(home.into())
            .await
            .pub_result(ErrorType::Config)
    }

    async fn load_inner(maybe_relative: PathBuf) -> anyhow::Result<Self> {
        let root = utils::canonicalize(&maybe_relative)
            .await
            .context("The spendbook home directory is missing, run 'spendbook init' first")?;

        let config_path = root.join(CONFIG_JSON);
        if !config_path.is_file() {
            bail!(
                "The config file is missing '{}', run 'spendbook init' first",
                config_path.display()
            )
        }
        let config_file = ConfigFile::load(&config_path).await?;

        let config = Self {
            backups: root.join(BACKUPS),
            credentials_path: root.join(CREDENTIALS_JSON),
            root,
            config_path,
            config_file,
        };
        if !config.backups.is_dir() {
            bail!(
                "The backups directory is missing '{}'",
                config.backups.display()
            )
        }
        Ok(config)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    pub fn backups(&self) -> &Path {
        &self.backups
    }

    /// The shared file holding every user's password hash.
    pub fn credentials_path(&self) -> &Path {
        &self.credentials_path
    }

    pub fn backup_copies(&self) -> u32 {
        self.config_file.backup_copies
    }

    pub fn month_filter(&self) -> MonthFilter {
        self.config_file.month_filter
    }

    pub fn currency_symbol(&self) -> &str {
        &self.config_file.currency_symbol
    }

    /// Creates a new `Backup` instance for managing backup files.
    pub fn backup(&self) -> Backup {
        Backup::new(self)
    }

    /// Creates the `LedgerStore` that reads and writes ledger files in this home directory.
    pub fn store(&self) -> LedgerStore {
        LedgerStore::new(self)
    }

    #[cfg(test)]
    pub(crate) async fn set_month_filter(&mut self, month_filter: MonthFilter) {
        self.config_file.month_filter = month_filter;
        self.config_file.save(&self.config_path).await.unwrap();
    }
}

/// The file name of `user`'s ledger without its extension, e.g. `expenses_alice`. Backups of the
/// ledger use it as their prefix.
pub(crate) fn ledger_stem(user: &Username) -> String {
    format!("{LEDGER_PREFIX}{user}")
}

pub(crate) fn ledger_extension() -> &'static str {
    LEDGER_EXTENSION
}

/// How a month search treats years when none is given explicitly.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MonthFilter {
    /// February means every February in the ledger.
    #[default]
    AllYears,
    /// February means February of the current year.
    SingleYear,
}

serde_plain::derive_display_from_serialize!(MonthFilter);
serde_plain::derive_fromstr_from_deserialize!(MonthFilter);

impl MonthFilter {
    /// Resolves the scope of a month search. An explicit `year` always wins.
    pub fn scope(&self, year: Option<i32>, current_year: i32) -> MonthScope {
        match (year, self) {
            (Some(year), _) => MonthScope::Year(year),
            (None, MonthFilter::AllYears) => MonthScope::AllYears,
            (None, MonthFilter::SingleYear) => MonthScope::Year(current_year),
        }
    }
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "spendbook",
///   "config_version": 1,
///   "backup_copies": 5,
///   "month_filter": "all_years",
///   "currency_symbol": "₹"
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "spendbook"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Number of backup copies to keep per ledger
    #[serde(default = "default_backup_copies")]
    backup_copies: u32,

    /// Whether month searches cover all years or only one
    #[serde(default)]
    month_filter: MonthFilter,

    /// Shown in front of totals
    #[serde(default = "default_currency_symbol")]
    currency_symbol: String,
}

fn default_backup_copies() -> u32 {
    BACKUP_COPIES
}

fn default_currency_symbol() -> String {
    CURRENCY_SYMBOL.to_string()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            backup_copies: BACKUP_COPIES,
            month_filter: MonthFilter::default(),
            currency_symbol: default_currency_symbol(),
        }
    }
}

impl ConfigFile {
    /// Loads a ConfigFile from the specified path.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed, or belongs to another application.
    async fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = utils::read(path).await?;

        let config: ConfigFile = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file at {}", path.display()))?;

        anyhow::ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        anyhow::ensure!(
            config.config_version == CONFIG_VERSION,
            "Config version {} is unsupported. Is a newer version of spendbook available?",
            config.config_version
        );

        Ok(config)
    }

    /// Saves the ConfigFile to the specified path.
    async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let p = path.as_ref();
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(p, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create() {
        let dir = TempDir::new().unwrap();
        let home_dir = dir.path().join("spendbook_home");

        let config = Config::create(&home_dir).await.unwrap();

        assert!(config.backups().is_dir());
        assert!(config.config_path().is_file());
        assert_eq!(config.backup_copies(), 5);
        assert_eq!(config.month_filter(), MonthFilter::AllYears);
        assert_eq!(config.currency_symbol(), "₹");
        assert!(!config.credentials_path().exists());
    }

    #[tokio::test]
    async fn test_config_create_twice_fails() {
        let dir = TempDir::new().unwrap();
        Config::create(dir.path()).await.unwrap();
        let err = Config::create(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("already initialized"));
    }

    #[tokio::test]
    async fn test_config_load() {
        let dir = TempDir::new().unwrap();
        let created = Config::create(dir.path()).await.unwrap();
        let loaded = Config::load(dir.path()).await.unwrap();
        assert_eq!(created.root(), loaded.root());
        assert_eq!(created.config_file, loaded.config_file);
    }

    #[tokio::test]
    async fn test_config_load_uninitialized() {
        let dir = TempDir::new().unwrap();
        let err = Config::load(dir.path()).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("config file is missing"));

        let err = Config::load(dir.path().join("nope")).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }

    #[tokio::test]
    async fn test_config_file_load_with_minimal_config() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "spendbook",
            "config_version": 1
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[tokio::test]
    async fn test_config_file_load_invalid_app_name() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "wrong_app",
            "config_version": 1
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let result = ConfigFile::load(&config_path).await;
        assert!(result.unwrap_err().to_string().contains("Invalid app_name"));
    }

    #[tokio::test]
    async fn test_config_file_month_filter_single_year() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("config.json");
        let json = r#"{
            "app_name": "spendbook",
            "config_version": 1,
            "month_filter": "single_year",
            "currency_symbol": "$"
        }"#;
        utils::write(&config_path, json).await.unwrap();

        let config = ConfigFile::load(&config_path).await.unwrap();
        assert_eq!(config.month_filter, MonthFilter::SingleYear);
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_month_filter_scope() {
        assert_eq!(MonthFilter::AllYears.scope(None, 2025), MonthScope::AllYears);
        assert_eq!(
            MonthFilter::AllYears.scope(Some(2024), 2025),
            MonthScope::Year(2024)
        );
        assert_eq!(
            MonthFilter::SingleYear.scope(None, 2025),
            MonthScope::Year(2025)
        );
    }
}
