//! Error types for the public interface of this library.
//!
//! Internally we use `anyhow` (see `Res`) and add context as errors bubble up. At the public
//! boundary an error is tagged with an `ErrorType` so that callers can tell a bad input file from a
//! bad date without parsing messages.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

/// The internal result type.
pub(crate) type Res<T> = anyhow::Result<T>;

/// The public result type.
pub type Result<T> = std::result::Result<T, Error>;

/// The broad category of an error.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorType {
    /// The input table is malformed, e.g. a required column is missing.
    Schema,
    /// An `Order_Date` value could not be parsed into a calendar date.
    InvalidDate,
    /// A `Sales` or `Profit` value could not be parsed into a number.
    InvalidNumber,
    /// The configuration file is missing, unreadable or invalid.
    Config,
    /// A file could not be read or written.
    Io,
    /// The requested category or sub-categories are not usable.
    Selection,
}

serde_plain::derive_display_from_serialize!(ErrorType);
serde_plain::derive_fromstr_from_deserialize!(ErrorType);

/// The public error type. It carries an `ErrorType` and the full `anyhow` context chain, which
/// `Display` prints on one line.
#[derive(Debug, thiserror::Error)]
#[error("{error_type} error: {inner:#}")]
pub struct Error {
    error_type: ErrorType,
    #[source]
    inner: anyhow::Error,
}

impl Error {
    pub(crate) fn new(error_type: ErrorType, inner: impl Into<anyhow::Error>) -> Self {
        Self {
            error_type,
            inner: inner.into(),
        }
    }

    /// The broad category of this error.
    pub fn error_type(&self) -> ErrorType {
        self.error_type
    }

    /// The underlying error, including its context chain.
    pub fn inner(&self) -> &anyhow::Error {
        &self.inner
    }

    /// Wraps the error with additional context, keeping its `ErrorType`.
    pub(crate) fn context<C>(self, context: C) -> Self
    where
        C: Display + Send + Sync + 'static,
    {
        Self {
            error_type: self.error_type,
            inner: self.inner.context(context),
        }
    }
}

/// Converts an internal result into a public one by tagging the error with an `ErrorType`.
pub(crate) trait IntoResult<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T>;
}

impl<T> IntoResult<T> for Res<T> {
    fn pub_result(self, error_type: ErrorType) -> Result<T> {
        self.map_err(|e| Error::new(error_type, e))
    }
}

impl<T> IntoResult<T> for Result<T> {
    /// An error that is already public keeps its original `ErrorType`.
    fn pub_result(self, _error_type: ErrorType) -> Result<T> {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{anyhow, Context};

    #[test]
    fn test_pub_result_tags_error() {
        let res: Res<()> = Err(anyhow!("bad"));
        let err = res.pub_result(ErrorType::Schema).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Schema);
    }

    #[test]
    fn test_display_includes_context_chain() {
        let res: Res<()> = Err(anyhow!("root cause")).context("while loading");
        let err = res.pub_result(ErrorType::Io).unwrap_err();
        let s = err.to_string();
        assert!(s.starts_with("io error:"));
        assert!(s.contains("while loading"));
        assert!(s.contains("root cause"));
    }

    #[test]
    fn test_public_error_keeps_type() {
        let res: Result<()> = Err(Error::new(ErrorType::InvalidDate, anyhow!("x")));
        let err = res.pub_result(ErrorType::Config).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidDate);
    }

    #[test]
    fn test_error_type_display() {
        assert_eq!(ErrorType::InvalidDate.to_string(), "invalid_date");
        assert_eq!(ErrorType::Schema.to_string(), "schema");
    }

    #[test]
    fn test_source_is_the_tagged_error() {
        let res: Res<()> = Err(anyhow!("root cause")).context("while loading");
        let err = res.pub_result(ErrorType::Io).unwrap_err();
        let source = std::error::Error::source(&err).unwrap();
        assert_eq!(source.to_string(), "while loading");
        assert_eq!(source.source().unwrap().to_string(), "root cause");
    }
}
