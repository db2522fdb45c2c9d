use crate::model::{Amount, Dataset, Percent};
use serde::{Deserialize, Serialize};

/// Headline numbers for a set of records.
#[derive(Default, Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Metrics {
    pub total_sales: Amount,
    pub total_profit: Amount,
    /// `total_profit / total_sales * 100`, defined as zero when there are no sales.
    pub profit_margin: Percent,
}

impl Metrics {
    pub fn new(total_sales: Amount, total_profit: Amount) -> Self {
        Self {
            total_sales,
            total_profit,
            profit_margin: Percent::ratio(total_profit, total_sales),
        }
    }
}

/// Sums sales and profit in one pass and derives the profit margin. An empty dataset gives all
/// zeros.
pub fn compute_metrics(dataset: &Dataset) -> Metrics {
    let (sales, profit) = dataset
        .iter()
        .fold((Amount::ZERO, Amount::ZERO), |(sales, profit), record| {
            (sales + record.sales(), profit + record.profit())
        });
    Metrics::new(sales, profit)
}

/// How far the selection's margin is above (positive) or below (negative) the overall margin.
pub fn compute_delta(selection: &Metrics, overall: &Metrics) -> Percent {
    selection.profit_margin - overall.profit_margin
}
