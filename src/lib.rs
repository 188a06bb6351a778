pub mod aggregate;
pub mod args;
pub mod auth;
mod backup;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod query;
mod store;
mod utils;

#[cfg(test)]
mod test;

pub use config::{Config, MonthFilter};
pub use error::{Error, ErrorType, IntoResult, Result};
pub use store::LedgerStore;
