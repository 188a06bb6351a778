//! Types that represent the core data model, such as `ExpenseRecord` and `Ledger`.
mod amount;
mod date;
mod ledger;
mod record;
mod user;

pub use amount::{Amount, AmountError};
pub use date::{DateError, ExpenseDate};
pub use ledger::{resolve_label, Ledger};
pub use record::{Entry, ExpenseRecord, RecordId};
pub use user::{Username, UsernameError};
