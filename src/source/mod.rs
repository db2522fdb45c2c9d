//! Where raw table rows come from.
//!
//! A `Source` yields the rows of a sales table, header row first, as strings. Turning those rows
//! into a `Dataset` is the job of `Dataset::parse`, so every source gets the same validation.

mod csv_file;
mod memory;

use crate::error::{Error, ErrorType, IntoResult, Res};
use crate::model::Dataset;
use crate::Result;
use anyhow::anyhow;
use std::path::PathBuf;
use tracing::debug;

pub use csv_file::CsvSource;
pub use memory::MemorySource;
pub(crate) use csv_file::parse_csv;
pub(crate) use memory::SAMPLE_CSV;

/// The environment variable that switches the program to `Mode::Test`.
pub const TEST_MODE_ENV: &str = "SALES_SUMMARY_IN_TEST_MODE";

/// A provider of raw table rows.
#[async_trait::async_trait]
pub trait Source {
    /// Returns every row of the table. The first row is the header row.
    async fn rows(&mut self) -> Res<Vec<Vec<String>>>;

    /// A short human-readable description of the source, for log messages.
    fn describe(&self) -> String;
}

/// Whether the program reads real files or the built-in sample data.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub enum Mode {
    #[default]
    File,
    Test,
}

impl Mode {
    /// `Mode::Test` when `SALES_SUMMARY_IN_TEST_MODE` is set and non-empty, otherwise `Mode::File`.
    pub fn from_env() -> Self {
        match std::env::var(TEST_MODE_ENV) {
            Ok(value) if !value.is_empty() => Mode::Test,
            _ => Mode::File,
        }
    }
}

/// Creates the source for `mode`. In `Mode::File` a `path` is required.
pub fn source(mode: Mode, path: Option<PathBuf>) -> Result<Box<dyn Source + Send>> {
    match (mode, path) {
        (Mode::Test, _) => Ok(Box::new(MemorySource::default())),
        (Mode::File, Some(path)) => Ok(Box::new(CsvSource::new(path))),
        (Mode::File, None) => Err(Error::new(
            ErrorType::Config,
            anyhow!("No data file given. Pass --data or set data_path in the config file"),
        )),
    }
}

/// Reads all rows from `source` and parses them into a `Dataset`.
///
/// # Errors
/// - `ErrorType::Io` if the source cannot be read.
/// - Any error from `Dataset::parse`.
pub async fn load(source: &mut (dyn Source + Send)) -> Result<Dataset> {
    let description = source.describe();
    debug!("Loading sales data from {description}");
    let rows = source.rows().await.pub_result(ErrorType::Io)?;
    Dataset::parse(rows).map_err(|e| e.context(format!("Invalid sales data in {description}")))
}
