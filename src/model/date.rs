//! The single source of truth for how expense dates are read and written.
//!
//! Dates are stored in the ledger file as day-first `DD-MM-YYYY` strings. Reading accepts that
//! form and the ISO `YYYY-MM-DD` form. Which one a string is gets decided by where its four-digit
//! year sits, never by guessing from the values, so `05-02-2025` is always the 5th of February.

use chrono::{Datelike, NaiveDate, NaiveTime, Weekday};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// The `chrono` format string of the persisted form.
const DAY_FIRST: &str = "%d-%m-%Y";

/// The only time component accepted after an ISO date.
const TIME: &str = "%H:%M:%S";

/// A calendar date of an expense, without a time component.
///
/// ```
/// # use spendbook::model::ExpenseDate;
/// let date = ExpenseDate::parse("2025-02-05").unwrap();
/// assert_eq!(date.to_string(), "05-02-2025");
/// assert_eq!(ExpenseDate::parse("05-02-2025").unwrap(), date);
/// ```
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct ExpenseDate(NaiveDate);

impl ExpenseDate {
    /// Creates a date from its parts, failing if they do not form a real calendar date.
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Result<Self, DateError> {
        NaiveDate::from_ymd_opt(year, month, day)
            .map(Self)
            .ok_or_else(|| DateError(format!("{day:02}-{month:02}-{year:04} is not a real date")))
    }

    /// Parses a date string in either `DD-MM-YYYY` or `YYYY-MM-DD` form. `/` is accepted in place
    /// of `-`. An ISO form may be followed by an `HH:MM:SS` time, e.g. `2025-02-05 00:00:00`,
    /// which is dropped.
    pub fn parse(raw: &str) -> Result<Self, DateError> {
        let trimmed = raw.trim();
        let (date_part, time) = split_time(trimmed);
        if let Some(time) = time {
            NaiveTime::parse_from_str(time, TIME).map_err(|_| unrecognized(raw))?;
        }
        let fields: Vec<&str> = date_part.split(['-', '/']).collect();
        let [a, b, c] = fields.as_slice() else {
            return Err(unrecognized(raw));
        };
        if !fields.iter().all(|f| is_digits(f)) {
            return Err(unrecognized(raw));
        }
        let (year, month, day) = match (a.len(), b.len(), c.len()) {
            (4, 1..=2, 1..=2) => (*a, *b, *c),
            // A time component only ever follows the ISO form.
            (1..=2, 1..=2, 4) if time.is_none() => (*c, *b, *a),
            _ => return Err(unrecognized(raw)),
        };
        // These are short runs of ASCII digits, so the parses cannot overflow.
        let year: i32 = year.parse().map_err(|_| unrecognized(raw))?;
        let month: u32 = month.parse().map_err(|_| unrecognized(raw))?;
        let day: u32 = day.parse().map_err(|_| unrecognized(raw))?;
        Self::from_ymd(year, month, day)
    }

    /// Renders the date as `DD-MM-YYYY`, the persisted and displayed form.
    pub fn format(&self) -> String {
        self.0.format(DAY_FIRST).to_string()
    }

    pub fn weekday(&self) -> Weekday {
        self.0.weekday()
    }

    /// Sundays get highlighted in listings.
    pub fn is_sunday(&self) -> bool {
        self.weekday() == Weekday::Sun
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    /// The month, 1 through 12.
    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn naive(&self) -> NaiveDate {
        self.0
    }

    /// Today's date in the local time zone.
    pub fn today() -> Self {
        Self(chrono::Local::now().date_naive())
    }
}

fn split_time(s: &str) -> (&str, Option<&str>) {
    match s.split_once([' ', 'T']) {
        Some((date, time)) => (date, Some(time)),
        None => (s, None),
    }
}

fn is_digits(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| c.is_ascii_digit())
}

fn unrecognized(raw: &str) -> DateError {
    DateError(format!("'{raw}' is not a date in DD-MM-YYYY or YYYY-MM-DD form"))
}

/// A date string that could not be parsed.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct DateError(String);

impl Display for DateError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl std::error::Error for DateError {}

impl From<NaiveDate> for ExpenseDate {
    fn from(value: NaiveDate) -> Self {
        Self(value)
    }
}

impl From<ExpenseDate> for NaiveDate {
    fn from(value: ExpenseDate) -> Self {
        value.0
    }
}

impl Display for ExpenseDate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.format(DAY_FIRST))
    }
}

impl FromStr for ExpenseDate {
    type Err = DateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ExpenseDate {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.format())
    }
}

impl<'de> Deserialize<'de> for ExpenseDate {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ExpenseDate::parse(&s).map_err(serde::de::Error::custom)
    }
}
