//! These structs provide the CLI interface for the sales CLI.

use crate::config::default_config_path;
use clap::{Parser, Subcommand};
use std::convert::Infallible;
use std::fmt::{Display, Formatter};
use std::ops::Deref;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::error;
use tracing::level_filters::LevelFilter;

/// sales: Summarize a sales CSV by category, sub-category and month.
///
/// The input is a "Superstore" style table with at least the columns Category, Sub_Category,
/// Order_Date, Sales and Profit. Pick a category and, optionally, some of its sub-categories to see
/// their monthly sales, totals and profit margin next to the margin of the whole dataset.
///
/// Set SALES_SUMMARY_IN_TEST_MODE to any non-empty value to run against a small built-in sample
/// instead of a file.
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
    /// Create the configuration file and point it at a sales CSV.
    ///
    /// After this, the other commands no longer need --data.
    Init(InitArgs),
    /// Print the raw table.
    Rows(RowsArgs),
    /// Print sales and profit totals for each category.
    Categories,
    /// Print sales per calendar month, optionally for a selection only.
    Months(MonthsArgs),
    /// Print the sub-categories that exist under a category.
    Subcategories(SubcategoriesArgs),
    /// Print total sales, total profit and profit margin of a selection, and how its margin
    /// compares to the whole dataset.
    Metrics(SelectArgs),
    /// Print everything above for one selection, computed in a single pass.
    Report(ReportArgs),
}

/// Arguments common to all subcommands.
#[derive(Debug, Parser, Clone)]
pub struct Common {
    /// The logging verbosity. One of, from least to most verbose:
    /// off, error, warn, info, debug, trace
    ///
    /// This can be overridden by RUST_LOG.
    #[arg(long, default_value_t = LevelFilter::INFO)]
    log_level: LevelFilter,

    /// The configuration file. It is optional unless --data is also absent.
    #[arg(long, env = "SALES_CONFIG", default_value_t = default_config())]
    config: DisplayPath,

    /// The sales CSV. Overrides data_path from the configuration file.
    #[arg(long, env = "SALES_DATA")]
    data: Option<PathBuf>,

    /// Print the structured result as JSON instead of text.
    #[arg(long)]
    json: bool,
}

impl Common {
    pub fn new(
        log_level: LevelFilter,
        config: PathBuf,
        data: Option<PathBuf>,
        json: bool,
    ) -> Self {
        Self {
            log_level,
            config: config.into(),
            data,
            json,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level
    }

    pub fn config(&self) -> &DisplayPath {
        &self.config
    }

    pub fn data(&self) -> Option<&Path> {
        self.data.as_deref()
    }

    pub fn json(&self) -> bool {
        self.json
    }
}

/// Args for the `sales init` command.
#[derive(Debug, Parser, Clone)]
pub struct InitArgs {
    /// The sales CSV that the configuration should point to.
    #[arg(long)]
    data: PathBuf,
}

impl InitArgs {
    pub fn new(data: impl Into<PathBuf>) -> Self {
        Self { data: data.into() }
    }

    pub fn data(&self) -> &Path {
        &self.data
    }
}

/// Args for the `sales rows` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct RowsArgs {
    /// Print at most this many rows.
    #[arg(long)]
    limit: Option<usize>,
}

impl RowsArgs {
    pub fn new(limit: Option<usize>) -> Self {
        Self { limit }
    }

    pub fn limit(&self) -> Option<usize> {
        self.limit
    }
}

/// Args for the `sales subcategories` command.
#[derive(Debug, Parser, Clone)]
pub struct SubcategoriesArgs {
    #[arg(long)]
    category: String,
}

impl SubcategoriesArgs {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }
}

/// A category and, optionally, some of its sub-categories. Without --sub-category every
/// sub-category of the category is selected.
#[derive(Debug, Parser, Clone)]
pub struct SelectArgs {
    /// The category, matched exactly.
    #[arg(long)]
    category: String,

    /// A sub-category of the category. Repeat to select several.
    #[arg(long = "sub-category")]
    sub_categories: Vec<String>,
}

impl SelectArgs {
    pub fn new<S, I>(category: impl Into<String>, sub_categories: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        Self {
            category: category.into(),
            sub_categories: sub_categories.into_iter().map(Into::into).collect(),
        }
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sub_categories(&self) -> &[String] {
        &self.sub_categories
    }
}

/// Args for the `sales months` command.
#[derive(Debug, Parser, Clone, Default)]
pub struct MonthsArgs {
    /// Only count records of this category.
    #[arg(long)]
    category: Option<String>,

    /// Only count records of this sub-category. Requires --category. Repeat to select several.
    #[arg(long = "sub-category", requires = "category")]
    sub_categories: Vec<String>,

    /// Include months without sales as zero.
    #[arg(long)]
    dense: bool,
}

impl MonthsArgs {
    pub fn new(category: Option<String>, sub_categories: Vec<String>, dense: bool) -> Self {
        Self {
            category,
            sub_categories,
            dense,
        }
    }

    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    pub fn sub_categories(&self) -> &[String] {
        &self.sub_categories
    }

    pub fn dense(&self) -> bool {
        self.dense
    }
}

/// Args for the `sales report` command.
#[derive(Debug, Parser, Clone)]
pub struct ReportArgs {
    #[clap(flatten)]
    select: SelectArgs,

    /// Include months without sales as zero.
    #[arg(long)]
    dense: bool,
}

impl ReportArgs {
    pub fn new(select: SelectArgs, dense: bool) -> Self {
        Self { select, dense }
    }

    pub fn select(&self) -> &SelectArgs {
        &self.select
    }

    pub fn dense(&self) -> bool {
        self.dense
    }
}

fn default_config() -> DisplayPath {
    DisplayPath(match default_config_path() {
        Some(path) => path,
        None => {
            error!(
                "There was an error when trying to get your home directory. You can get around \
                this by providing --config or SALES_CONFIG instead of relying on the default \
                config location.",
            );
            PathBuf::from("config.json")
        }
    })
}

/// A `PathBuf` that can be used as a clap default value.
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
        write!(f, "{}", self.0.display())
    }
}

impl FromStr for DisplayPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(PathBuf::from(s)))
    }
}

impl DisplayPath {
    pub fn path(&self) -> &Path {
        &self.0
    }
}
