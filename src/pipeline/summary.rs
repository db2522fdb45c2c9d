//! Grouped totals: by category and by calendar month.

use crate::model::{Amount, Month};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// The sums for one category.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CategoryTotals {
    pub sales: Amount,
    pub profit: Amount,
    /// The number of records in the category.
    pub records: usize,
    /// Sums of the other columns whose values are numeric in every record of the category. Blank
    /// cells are skipped. A column whose sum overflows is left out.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    pub other: BTreeMap<String, Decimal>,
}

/// Totals per category, iterated in category-name order.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategorySummary(BTreeMap<String, CategoryTotals>);

impl CategorySummary {
    pub fn get(&self, category: &str) -> Option<&CategoryTotals> {
        self.0.get(category)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &CategoryTotals)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn total_sales(&self) -> Amount {
        self.0.values().map(|t| t.sales).sum()
    }

    pub fn total_profit(&self) -> Amount {
        self.0.values().map(|t| t.profit).sum()
    }
}

/// Accumulates `CategoryTotals` while also tracking which extra columns have stopped being
/// numeric.
#[derive(Default)]
pub(super) struct CategoryAccumulator {
    totals: CategoryTotals,
    /// `None` once a non-numeric value has been seen for the column.
    other: BTreeMap<String, Option<Decimal>>,
}

impl CategoryAccumulator {
    pub(super) fn add(&mut self, sales: Amount, profit: Amount, other: &BTreeMap<String, String>) {
        self.totals.sales += sales;
        self.totals.profit += profit;
        self.totals.records += 1;
        for (header, value) in other {
            let value = value.trim();
            if value.is_empty() {
                continue;
            }
            let slot = self
                .other
                .entry(header.clone())
                .or_insert(Some(Decimal::ZERO));
            *slot = match (*slot, Decimal::from_str(value)) {
                (Some(sum), Ok(v)) => sum.checked_add(v),
                _ => None,
            };
        }
    }

    pub(super) fn finish(self) -> CategoryTotals {
        let mut totals = self.totals;
        totals.other = self
            .other
            .into_iter()
            .filter_map(|(header, sum)| sum.map(|s| (header, s)))
            .collect();
        totals
    }
}

impl CategorySummary {
    pub(super) fn from_accumulators(groups: BTreeMap<String, CategoryAccumulator>) -> Self {
        Self(groups.into_iter().map(|(k, acc)| (k, acc.finish())).collect())
    }
}

/// Sales per calendar month, iterated chronologically. Months without records are absent unless
/// the summary has been made `dense`.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MonthlySummary(BTreeMap<Month, Amount>);

impl MonthlySummary {
    pub(super) fn add(&mut self, month: Month, sales: Amount) {
        *self.0.entry(month).or_default() += sales;
    }

    pub fn get(&self, month: Month) -> Option<Amount> {
        self.0.get(&month).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Month, Amount)> + '_ {
        self.0.iter().map(|(m, a)| (*m, *a))
    }

    pub fn months(&self) -> impl Iterator<Item = Month> + '_ {
        self.0.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn first(&self) -> Option<Month> {
        self.0.keys().next().copied()
    }

    pub fn last(&self) -> Option<Month> {
        self.0.keys().next_back().copied()
    }

    pub fn total(&self) -> Amount {
        self.0.values().sum()
    }

    /// Returns the same series with a zero entry for every month between the first and the last
    /// that had no records.
    pub fn dense(&self) -> MonthlySummary {
        let (Some(first), Some(last)) = (self.first(), self.last()) else {
            return MonthlySummary::default();
        };
        let mut filled = BTreeMap::new();
        let mut month = first;
        while month <= last {
            filled.insert(month, self.get(month).unwrap_or_default());
            month = month.next();
        }
        MonthlySummary(filled)
    }
}

impl FromIterator<(Month, Amount)> for MonthlySummary {
    fn from_iter<T: IntoIterator<Item = (Month, Amount)>>(iter: T) -> Self {
        let mut summary = MonthlySummary::default();
        for (month, sales) in iter {
            summary.add(month, sales);
        }
        summary
    }
}
