//! Sales summaries for a "Superstore" style CSV: totals by category, sales by month, and the
//! metrics of a category and sub-category selection compared to the whole dataset.
//!
//! The pipeline functions in `pipeline` are pure and take a `&Dataset`, so a single loaded
//! `Dataset` behind an `Arc` can serve any number of concurrent `Report`s.

pub mod args;
pub mod commands;
mod config;
mod error;
pub mod model;
pub mod pipeline;
mod report;
pub mod source;
mod utils;


pub use config::{default_config_path, Config};
pub use error::{Error, ErrorType, Result};
pub use model::{Amount, Dataset, Percent, Record};
pub use pipeline::{
    compute_delta, compute_metrics, distinct_subcategories, filter_by_category,
    filter_by_subcategories, summarize_by_category, summarize_by_month, Metrics, Selection,
};
pub use report::{Report, ReportOptions};
pub use source::Mode;
