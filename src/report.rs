//! One full recomputation of everything the dashboard shows.
//!
//! A `Report` is built from a shared, read-only `Dataset` and a `Selection`. Building it never
//! touches the dataset, so any number of reports can be built at the same time from one
//! `Arc<Dataset>`.

use crate::model::{Dataset, DateParser, Percent};
use crate::pipeline::{
    compute_delta, compute_metrics, summarize_by_category, summarize_by_month_with,
    CategorySummary, Metrics, MonthlySummary, Selection,
};
use crate::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::debug;

/// Options that shape a `Report` without changing which records it covers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportOptions {
    pub date_parser: DateParser,
    /// Fill months without sales with zero in both monthly series.
    pub dense: bool,
}

/// Everything derived from the dataset for one selection.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Report {
    #[serde(skip)]
    rows: Arc<Dataset>,
    categories: CategorySummary,
    monthly: MonthlySummary,
    selection: Selection,
    #[serde(skip)]
    filtered: Dataset,
    selection_monthly: MonthlySummary,
    metrics: Metrics,
    overall: Metrics,
    delta: Percent,
}

impl Report {
    /// Recomputes every view from `dataset`.
    ///
    /// # Errors
    /// `ErrorType::InvalidDate` if any `Order_Date` cannot be parsed. Every record's date is
    /// checked, not only those in the selection.
    pub fn build(
        dataset: Arc<Dataset>,
        selection: &Selection,
        options: &ReportOptions,
    ) -> Result<Self> {
        let categories = summarize_by_category(&dataset);
        let mut monthly = summarize_by_month_with(&dataset, &options.date_parser)?;

        let filtered = selection.apply(&dataset);
        let mut selection_monthly = summarize_by_month_with(&filtered, &options.date_parser)?;
        if options.dense {
            monthly = monthly.dense();
            selection_monthly = selection_monthly.dense();
        }

        let metrics = compute_metrics(&filtered);
        let overall = compute_metrics(&dataset);
        let delta = compute_delta(&metrics, &overall);
        debug!(
            "Built report for '{}' with {} of {} records",
            selection.category(),
            filtered.len(),
            dataset.len()
        );

        Ok(Self {
            rows: dataset,
            categories,
            monthly,
            selection: selection.clone(),
            filtered,
            selection_monthly,
            metrics,
            overall,
            delta,
        })
    }

    /// The full dataset the report was built from.
    pub fn rows(&self) -> &Dataset {
        &self.rows
    }

    pub fn categories(&self) -> &CategorySummary {
        &self.categories
    }

    /// Sales per month over the whole dataset.
    pub fn monthly(&self) -> &MonthlySummary {
        &self.monthly
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    /// The records inside the selection.
    pub fn filtered(&self) -> &Dataset {
        &self.filtered
    }

    /// Sales per month for the records inside the selection.
    pub fn selection_monthly(&self) -> &MonthlySummary {
        &self.selection_monthly
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    pub fn overall(&self) -> &Metrics {
        &self.overall
    }

    /// The selection's profit margin minus the overall profit margin.
    pub fn delta(&self) -> Percent {
        self.delta
    }
}
