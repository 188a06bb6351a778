//! The public error type.
//!
//! Internally the crate uses `anyhow` with `.context(..)` to build up readable error chains. At
//! the module boundaries those errors are tagged with an `ErrorType` via [`IntoResult`] so that
//! callers can tell a rejected input from a broken file without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt::{Debug, Display, Formatter};

/// The broad category of an [`Error`].
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// Bad user input: an empty title, a negative amount, mismatched passwords.
    Validation,
    /// A date or amount string that could not be understood.
    Parse,
    /// A record id or a file that was expected to exist but does not.
    NotFound,
    /// Reading or writing a backing file failed, or a file has the wrong shape.
    Storage,
    /// Unknown user or wrong password.
    Auth,
    /// The data directory or its configuration is missing or invalid.
    Config,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// An error returned from the public API of this crate.
pub struct Error {
    error_type: ErrorType,
    inner: anyhow::Error,
}

impl Error {
    pub fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// Creates an error of type `error_type` from a plain message.
    pub fn msg(error_type: ErrorType, message: impl Display) -> Self {
        Self::new(error_type, anyhow::anyhow!("{message}"))
    }

    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }
}

impl Debug for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} error: {:?}", self.error_type, self.inner)
    }
}

/// Prints the whole context chain, e.g. `Unable to load the ledger: Row 3 is invalid: ...`.
impl Display for Error {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:#}", self.inner)
    }
}

// `source` stays `None` because `Display` already includes the chain.
impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;

/// Converts any error result into a public [`Result`] with the given [`ErrorType`].
///
/// If the error already carries an [`Error`] somewhere in its `anyhow` context chain, the type of
/// that error is kept and the context is preserved.
pub trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T, E> IntoResult<T> for std::result::Result<T, E>
where
    E: Into<anyhow::Error>,
{
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| {
            let e: anyhow::Error = e.into();
            let error_type = e
                .downcast_ref::<Error>()
                .map(Error::error_type)
                .unwrap_or(error_type);
            Error::new(error_type, e)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_pub_result_tags_untyped_errors() {
        let result: std::result::Result<(), std::io::Error> =
            Err(std::io::Error::other("disk on fire"));
        let err = result.pub_result(ErrorType::Storage).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Storage);
        assert!(err.to_string().contains("disk on fire"));
    }

    #[test]
    fn test_pub_result_keeps_existing_type() {
        let inner: Result<()> = Err(Error::msg(ErrorType::NotFound, "no record 7"));
        let wrapped = inner.context("Unable to edit");
        let err = wrapped.pub_result(ErrorType::Storage).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::NotFound);
        assert_eq!(err.to_string(), "Unable to edit: no record 7");
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::NotFound.to_string(), "not_found");
        let err = Error::msg(ErrorType::Validation, "Expense title cannot be empty");
        assert_eq!(err.to_string(), "Expense title cannot be empty");
    }
}
