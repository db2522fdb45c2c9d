//! Command handlers for the sales CLI.
//!
//! Each handler loads what it needs through an `Input`, runs the pipeline and returns an `Out`
//! holding both a human-readable message and the structured result.

mod init;
mod rows;
mod selection;
mod summary;
mod table;

use crate::config::Config;
use crate::model::{Dataset, DateParser};
use crate::source::{self, Mode};
use crate::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::debug;

pub use init::init;
pub use rows::rows;
pub use selection::{metrics, report, subcategories, MetricsOut};
pub use summary::{categories, months};

/// The output type for a command. This allows the command to return a consistent message and,
/// optionally, structured data.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    /// What `print` writes to stdout: the structure as pretty JSON when `json` is set and there is
    /// a structure, otherwise the message.
    pub fn render(&self, json: bool) -> String {
        match (json, self.structure()) {
            (true, Some(structure)) => match serde_json::to_string_pretty(structure) {
                Ok(s) => s,
                Err(e) => {
                    debug!("Unable to serialize command output: {e}");
                    self.message.clone()
                }
            },
            _ => self.message.clone(),
        }
    }

    /// Prints the rendered output to stdout. Logging goes to stderr, so stdout carries only the
    /// result.
    pub fn print(&self, json: bool) {
        println!("{}", self.render(json));
    }
}

/// Where commands get their data and settings from.
#[derive(Debug, Clone)]
pub struct Input {
    config: Config,
    mode: Mode,
    data: Option<PathBuf>,
}

impl Input {
    /// `data`, when given, takes precedence over the config file's `data_path`.
    pub fn new(config: Config, mode: Mode, data: Option<PathBuf>) -> Self {
        Self { config, mode, data }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn date_parser(&self) -> DateParser {
        self.config.date_parser()
    }

    /// Loads the dataset from the configured source.
    ///
    /// # Errors
    /// - `ErrorType::Config` if no data file is known in `Mode::File`.
    /// - `ErrorType::Io` if the file cannot be read.
    /// - `ErrorType::Schema` or `ErrorType::InvalidNumber` if its contents are invalid.
    pub async fn dataset(&self) -> Result<Arc<Dataset>> {
        let path = self.data.clone().or_else(|| self.config.data_path());
        let mut rows = source::source(self.mode, path)?;
        let dataset = source::load(rows.as_mut()).await?;
        Ok(Arc::new(dataset))
    }
}
