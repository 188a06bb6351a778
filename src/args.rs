//! These structs provide the CLI interface for the spendbook CLI.

use crate::model::{Amount, ExpenseDate, RecordId};
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing_subscriber::filter::LevelFilter;

/// spendbook: A command-line tool for keeping track of daily expenses.
///
/// Each user has a password protected ledger of expenses stored as a CSV file in the spendbook
/// home directory. Expenses can be added, edited, deleted, searched by date, date range or month,
/// and summarized per month.
///
/// Run `spendbook init` once to create the home directory, then `spendbook signup` to create an
/// account.
#[derive(Debug, Parser, Clone)]
pub struct Args {
    #[clap(flatten)]
    common: Common,

    #[command(subcommand)]
    command: Command,
}

impl Args {
    pub fn new(common: Common, command: Command) -> Self {
        Self { common, command }
    }

    pub fn common(&self) -> &Common {
        &self.common
    }

    pub fn command(&self) -> &Command {
        &self.command
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the spendbook home directory and its configuration file.
    ///
    /// By default the home directory is $HOME/spendbook. Pass --home or set SPENDBOOK_HOME to put
    /// it somewhere else. Every other command needs it to exist.
    Init,
    /// Create a new user account.
    Signup(SignupArgs),
    /// Check a username and password.
    Login(LoginArgs),
    /// Record an expense.
    Add(AddArgs),
    /// Change the title or amount of an expense.
    Edit(EditArgs),
    /// Remove an expense.
    Delete(DeleteArgs),
    /// List expenses of a day, a date range or a month, with their total.
    Search(SearchArgs),
    /// Show the total of a month, broken down by title and by day.
    Summary(SummaryArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG. See the tracing-subscriber EnvFilter documentation.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The directory where spendbook data and configuration is held. Defaults to ~/spendbook
    #[arg(long, env = "SPENDBOOK_HOME", default_value_t = default_spendbook_home())]
    home: DisplayPath,
}

impl Common {
    pub fn new(log_level: LevelFilter, home: PathBuf) -> Self {
        Self {
            log_level,
            home: home.into(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn home(&self) -> &DisplayPath {
        &self.home
    }
}

/// Args for the `spendbook signup` command.
#[derive(Debug, Parser, Clone)]
pub struct SignupArgs {
    /// The username to register. Letters, digits, '_', '-' and '.' are allowed.
    #[arg(long)]
    user: String,

    /// The password for the new account.
    #[arg(long, env = "SPENDBOOK_PASSWORD", hide_env_values = true)]
    password: String,

    /// The password again.
    #[arg(long)]
    confirm_password: String,
}

impl SignupArgs {
    pub fn new(
        user: impl Into<String>,
        password: impl Into<String>,
        confirm_password: impl Into<String>,
    ) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
            confirm_password: confirm_password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn confirm_password(&self) -> &str {
        &self.confirm_password
    }
}

/// The credentials every ledger command authenticates with.
#[derive(Debug, Parser, Clone)]
pub struct LoginArgs {
    /// Your username.
    #[arg(long)]
    user: String,

    /// Your password.
    #[arg(long, env = "SPENDBOOK_PASSWORD", hide_env_values = true)]
    password: String,
}

impl LoginArgs {
    pub fn new(user: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            password: password.into(),
        }
    }

    pub fn user(&self) -> &str {
        &self.user
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

/// Args for the `spendbook add` command.
#[derive(Debug, Parser, Clone)]
pub struct AddArgs {
    #[clap(flatten)]
    login: LoginArgs,

    /// What the money was spent on.
    #[arg(long)]
    title: String,

    /// How much was spent, e.g. 250 or 12.50.
    #[arg(long)]
    amount: Amount,

    /// The day of the expense as DD-MM-YYYY or YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    date: Option<ExpenseDate>,
}

impl AddArgs {
    pub fn new(
        login: LoginArgs,
        title: impl Into<String>,
        amount: Amount,
        date: Option<ExpenseDate>,
    ) -> Self {
        Self {
            login,
            title: title.into(),
            amount,
            date,
        }
    }

    pub fn login(&self) -> &LoginArgs {
        &self.login
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn amount(&self) -> Amount {
        self.amount
    }

    pub fn date(&self) -> Option<ExpenseDate> {
        self.date
    }
}

/// Which expense an `edit` or `delete` applies to.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Target {
    /// The id shown by `search`. With a `label`, the expense must also have that label.
    Id { id: RecordId, label: Option<String> },
    /// The first expense on `date` whose `"title - amount"` label is `label`.
    Label { date: ExpenseDate, label: String },
}

/// Selects an expense either by `--id` or by `--date` together with `--select`.
///
/// Ids are positions in the ledger file, so they shift after a delete. Passing `--select` along
/// with `--id` makes the command fail instead of touching a different expense.
#[derive(Debug, Parser, Clone)]
pub struct TargetArgs {
    /// The id of the expense, as shown by `spendbook search`.
    #[arg(long, conflicts_with = "date", required_unless_present = "date")]
    id: Option<u64>,

    /// The day of the expense. Use together with --select.
    #[arg(long, requires = "select")]
    date: Option<ExpenseDate>,

    /// The "title - amount" label of the expense, e.g. "Coffee - 50". With --date, the first
    /// expense on that day with this label is used. With --id, the expense must have it.
    #[arg(long)]
    select: Option<String>,
}

impl TargetArgs {
    pub fn id(id: impl Into<RecordId>) -> Self {
        Self {
            id: Some(id.into().value()),
            date: None,
            select: None,
        }
    }

    /// Targets the expense with `id`, but only if its label is `label`.
    pub fn id_with_label(id: impl Into<RecordId>, label: impl Into<String>) -> Self {
        Self {
            id: Some(id.into().value()),
            date: None,
            select: Some(label.into()),
        }
    }

    pub fn label(date: ExpenseDate, label: impl Into<String>) -> Self {
        Self {
            id: None,
            date: Some(date),
            select: Some(label.into()),
        }
    }

    /// The selected expense, or `None` if the arguments name neither an id nor a date and label.
    pub fn target(&self) -> Option<Target> {
        match (self.id, self.date, &self.select) {
            (Some(id), _, label) => Some(Target::Id {
                id: RecordId::new(id),
                label: label.clone(),
            }),
            (None, Some(date), Some(label)) => Some(Target::Label {
                date,
                label: label.clone(),
            }),
            _ => None,
        }
    }
}

/// Args for the `spendbook edit` command.
#[derive(Debug, Parser, Clone)]
pub struct EditArgs {
    #[clap(flatten)]
    login: LoginArgs,

    #[clap(flatten)]
    target: TargetArgs,

    /// The new title. Defaults to the current one.
    #[arg(long)]
    title: Option<String>,

    /// The new amount. Defaults to the current one.
    #[arg(long)]
    amount: Option<Amount>,

    /// Confirms the change. Nothing is edited without it.
    #[arg(long)]
    yes: bool,
}

impl EditArgs {
    pub fn new(
        login: LoginArgs,
        target: TargetArgs,
        title: Option<String>,
        amount: Option<Amount>,
        yes: bool,
    ) -> Self {
        Self {
            login,
            target,
            title,
            amount,
            yes,
        }
    }

    pub fn login(&self) -> &LoginArgs {
        &self.login
    }

    pub fn target(&self) -> &TargetArgs {
        &self.target
    }

    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    pub fn amount(&self) -> Option<Amount> {
        self.amount
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `spendbook delete` command.
#[derive(Debug, Parser, Clone)]
pub struct DeleteArgs {
    #[clap(flatten)]
    login: LoginArgs,

    #[clap(flatten)]
    target: TargetArgs,

    /// Confirms the deletion. Nothing is deleted without it.
    #[arg(long)]
    yes: bool,
}

impl DeleteArgs {
    pub fn new(login: LoginArgs, target: TargetArgs, yes: bool) -> Self {
        Self { login, target, yes }
    }

    pub fn login(&self) -> &LoginArgs {
        &self.login
    }

    pub fn target(&self) -> &TargetArgs {
        &self.target
    }

    pub fn yes(&self) -> bool {
        self.yes
    }
}

/// Args for the `spendbook search` command.
#[derive(Debug, Parser, Clone)]
pub struct SearchArgs {
    #[command(subcommand)]
    by: SearchBy,
}

impl SearchArgs {
    pub fn new(by: SearchBy) -> Self {
        Self { by }
    }

    pub fn by(&self) -> &SearchBy {
        &self.by
    }

    pub fn login(&self) -> &LoginArgs {
        match &self.by {
            SearchBy::Date(args) => &args.login,
            SearchBy::Range(args) => &args.login,
            SearchBy::Month(args) => &args.login,
        }
    }
}

#[derive(Subcommand, Debug, Clone)]
pub enum SearchBy {
    /// Expenses of one day.
    Date(SearchDateArgs),
    /// Expenses from one day to another, both included.
    Range(SearchRangeArgs),
    /// Expenses of a month.
    Month(MonthArgs),
}

/// Args for `spendbook search date`.
#[derive(Debug, Parser, Clone)]
pub struct SearchDateArgs {
    #[clap(flatten)]
    login: LoginArgs,

    /// The day, as DD-MM-YYYY or YYYY-MM-DD. Defaults to today.
    #[arg(long)]
    on: Option<ExpenseDate>,
}

impl SearchDateArgs {
    pub fn new(login: LoginArgs, on: Option<ExpenseDate>) -> Self {
        Self { login, on }
    }

    pub fn on(&self) -> Option<ExpenseDate> {
        self.on
    }
}

/// Args for `spendbook search range`.
#[derive(Debug, Parser, Clone)]
pub struct SearchRangeArgs {
    #[clap(flatten)]
    login: LoginArgs,

    /// The first day of the range.
    #[arg(long)]
    from: ExpenseDate,

    /// The last day of the range. Defaults to today.
    #[arg(long)]
    to: Option<ExpenseDate>,
}

impl SearchRangeArgs {
    pub fn new(login: LoginArgs, from: ExpenseDate, to: Option<ExpenseDate>) -> Self {
        Self { login, from, to }
    }

    pub fn start(&self) -> ExpenseDate {
        self.from
    }

    pub fn end(&self) -> Option<ExpenseDate> {
        self.to
    }
}

/// Selects a month for `spendbook search month` and `spendbook summary`.
#[derive(Debug, Parser, Clone)]
pub struct MonthArgs {
    #[clap(flatten)]
    login: LoginArgs,

    /// The month, 1 to 12.
    #[arg(long)]
    month: u32,

    /// Restricts the search to one year. Without it, the month_filter setting in config.json
    /// decides whether every year or only the current one is searched.
    #[arg(long)]
    year: Option<i32>,
}

impl MonthArgs {
    pub fn new(login: LoginArgs, month: u32, year: Option<i32>) -> Self {
        Self { login, month, year }
    }

    pub fn login(&self) -> &LoginArgs {
        &self.login
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn year(&self) -> Option<i32> {
        self.year
    }
}

/// Args for the `spendbook summary` command.
#[derive(Debug, Parser, Clone)]
pub struct SummaryArgs {
    #[clap(flatten)]
    month: MonthArgs,
}

impl SummaryArgs {
    pub fn new(month: MonthArgs) -> Self {
        Self { month }
    }

    pub fn login(&self) -> &LoginArgs {
        self.month.login()
    }

    pub fn month(&self) -> &MonthArgs {
        &self.month
    }
}

fn default_spendbook_home() -> DisplayPath {
    DisplayPath(match dirs::home_dir() {
        Some(home) => home.join("spendbook"),
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --home or SPENDBOOK_HOME instead of relying on the default \
                spendbook home directory. If you continue using the program right now, you may \
                have problems!",
            );
            PathBuf::from("spendbook")
        }
    })
}

#[derive(Debug, Default, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DisplayPath(PathBuf);

impl From<PathBuf> for DisplayPath {
    fn from(value: PathBuf) -> Self {
        DisplayPath(value)
    }
}

impl Deref for DisplayPath {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl AsRef<Path> for DisplayPath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for DisplayPath {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn new(path: PathBuf) -> Self {
        Self(path)
    }

    pub fn path(&self) -> &Path {
        &self.0
    }
}
