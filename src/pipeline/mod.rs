//! The aggregation and filtering pipeline.
//!
//! Every function here is a single pass over a `Dataset` that folds records into a new value. No
//! function mutates its input, so one loaded `Dataset` can be shared by any number of callers.

mod metrics;
mod selection;
mod summary;

pub use metrics::{compute_delta, compute_metrics, Metrics};
pub use selection::Selection;
pub use summary::{CategorySummary, CategoryTotals, MonthlySummary};

use crate::model::{Dataset, DateParser, DatedDataset, Month};
use crate::Result;
use std::collections::{BTreeMap, HashSet};
use summary::CategoryAccumulator;
use tracing::trace;

/// Sums `Sales`, `Profit`, the record count and any other numeric columns for each distinct
/// category.
pub fn summarize_by_category(dataset: &Dataset) -> CategorySummary {
    let mut groups: BTreeMap<String, CategoryAccumulator> = BTreeMap::new();
    for record in dataset {
        groups
            .entry(record.category().to_string())
            .or_default()
            .add(record.sales(), record.profit(), record.other_fields());
    }
    trace!("Grouped {} records into {} categories", dataset.len(), groups.len());
    CategorySummary::from_accumulators(groups)
}

/// Sums `Sales` per calendar month using the default date formats.
///
/// # Errors
/// `ErrorType::InvalidDate` if any `Order_Date` cannot be parsed.
pub fn summarize_by_month(dataset: &Dataset) -> Result<MonthlySummary> {
    summarize_by_month_with(dataset, &DateParser::default())
}

/// Like `summarize_by_month`, with the given date formats.
pub fn summarize_by_month_with(dataset: &Dataset, parser: &DateParser) -> Result<MonthlySummary> {
    let dated = dataset.index_by_date(parser)?;
    Ok(monthly_sales(&dated))
}

/// Sums `Sales` per calendar month of an already date-indexed dataset.
pub fn monthly_sales(dated: &DatedDataset<'_>) -> MonthlySummary {
    dated
        .rows()
        .iter()
        .map(|(date, record)| (Month::of(*date), record.sales()))
        .collect()
}

/// The records whose category is exactly `category`, in their original order.
pub fn filter_by_category(dataset: &Dataset, category: &str) -> Dataset {
    dataset.filtered(|r| r.category() == category)
}

/// The distinct sub-categories of `dataset`, in the order they first appear.
pub fn distinct_subcategories(dataset: &Dataset) -> Vec<String> {
    let mut seen = HashSet::new();
    dataset
        .iter()
        .map(|r| r.sub_category())
        .filter(|s| seen.insert(*s))
        .map(str::to_string)
        .collect()
}

/// The records whose sub-category is in `selected`, in their original order. Selecting nothing
/// gives an empty dataset.
pub fn filter_by_subcategories<S, I>(dataset: &Dataset, selected: I) -> Dataset
where
    S: AsRef<str>,
    I: IntoIterator<Item = S>,
{
    let selected: HashSet<String> = selected
        .into_iter()
        .map(|s| s.as_ref().to_string())
        .collect();
    dataset.filtered(|r| selected.contains(r.sub_category()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorType;
    use crate::model::{Amount, Record};
    use crate::test::{amount, furniture_dataset, sample_dataset};

    fn month(s: &str) -> Month {
        s.parse().unwrap()
    }

    #[test]
    fn test_summarize_by_category_furniture() {
        let summary = summarize_by_category(&furniture_dataset());
        assert_eq!(summary.len(), 1);
        let furniture = summary.get("Furniture").unwrap();
        assert_eq!(furniture.sales, amount("300"));
        assert_eq!(furniture.profit, amount("10"));
        assert_eq!(furniture.records, 2);
    }

    #[test]
    fn test_summarize_by_category_sorted_and_conserves_sales() {
        let dataset = sample_dataset();
        let summary = summarize_by_category(&dataset);
        let names: Vec<&str> = summary.iter().map(|(name, _)| name).collect();
        assert_eq!(names, vec!["Furniture", "Office Supplies", "Technology"]);
        let total: Amount = dataset.iter().map(|r| r.sales()).sum();
        assert_eq!(summary.total_sales(), total);
    }

    #[test]
    fn test_summarize_by_category_sums_other_numeric_columns() {
        let dataset = Dataset::new(vec![
            Record::new("Furniture", "Chairs", "2023-01-15", amount("100"), amount("20"))
                .with_field("Quantity", "2")
                .with_field("Region", "West"),
            Record::new("Furniture", "Tables", "2023-02-10", amount("200"), amount("-10"))
                .with_field("Quantity", "5")
                .with_field("Region", "East"),
        ]);
        let summary = summarize_by_category(&dataset);
        let furniture = summary.get("Furniture").unwrap();
        assert_eq!(furniture.other.get("Quantity").unwrap().to_string(), "7");
        assert!(!furniture.other.contains_key("Region"));
    }

    #[test]
    fn test_summarize_by_category_empty() {
        assert!(summarize_by_category(&Dataset::default()).is_empty());
    }

    #[test]
    fn test_summarize_by_month_furniture() {
        let summary = summarize_by_month(&furniture_dataset()).unwrap();
        let entries: Vec<(Month, Amount)> = summary.iter().collect();
        assert_eq!(
            entries,
            vec![
                (month("2023-01"), amount("100")),
                (month("2023-02"), amount("200"))
            ]
        );
    }

    #[test]
    fn test_summarize_by_month_is_sparse_and_chronological() {
        let dataset = Dataset::new(vec![
            Record::new("Technology", "Phones", "2023-04-02", amount("50"), amount("5")),
            Record::new("Technology", "Phones", "12/30/2022", amount("10"), amount("1")),
            Record::new("Technology", "Phones", "2023-04-20", amount("25"), amount("2")),
        ]);
        let summary = summarize_by_month(&dataset).unwrap();
        let entries: Vec<(String, Amount)> =
            summary.iter().map(|(m, a)| (m.to_string(), a)).collect();
        assert_eq!(
            entries,
            vec![
                ("2022-12".to_string(), amount("10")),
                ("2023-04".to_string(), amount("75")),
            ]
        );
        // The gap stays a gap until asked for.
        assert_eq!(summary.get(month("2023-01")), None);
        assert_eq!(summary.dense().len(), 5);
        assert_eq!(summary.dense().get(month("2023-01")), Some(Amount::ZERO));
    }

    #[test]
    fn test_summarize_by_month_invalid_date() {
        let dataset = Dataset::new(vec![
            Record::new("Furniture", "Chairs", "2023-01-15", amount("1"), amount("1")),
            Record::new("Furniture", "Chairs", "31st of Smarch", amount("1"), amount("1")),
        ]);
        let err = summarize_by_month(&dataset).unwrap_err();
        assert_eq!(err.error_type(), ErrorType::InvalidDate);
        assert!(err.to_string().contains("record 2"));
    }

    #[test]
    fn test_summarize_by_month_with_configured_formats() {
        let dataset = Dataset::new(vec![Record::new(
            "Furniture",
            "Chairs",
            "15.01.2023",
            amount("1"),
            amount("1"),
        )]);
        let parser = DateParser::new(["%d.%m.%Y"]);
        let summary = summarize_by_month_with(&dataset, &parser).unwrap();
        assert_eq!(summary.get(month("2023-01")), Some(amount("1")));
        assert!(summarize_by_month_with(&dataset, &DateParser::new(["%Y-%m-%d"])).is_err());
    }

    #[test]
    fn test_summarize_by_month_empty() {
        assert!(summarize_by_month(&Dataset::default()).unwrap().is_empty());
    }

    #[test]
    fn test_filter_by_category() {
        let dataset = sample_dataset();
        let furniture = filter_by_category(&dataset, "Furniture");
        assert!(!furniture.is_empty());
        assert!(furniture.iter().all(|r| r.category() == "Furniture"));
        // exact match only
        assert!(filter_by_category(&dataset, "furniture").is_empty());
        assert!(filter_by_category(&dataset, "Toys").is_empty());
    }

    #[test]
    fn test_filter_by_category_preserves_order() {
        let dataset = sample_dataset();
        let furniture = filter_by_category(&dataset, "Furniture");
        let expected: Vec<&Record> = dataset
            .iter()
            .filter(|r| r.category() == "Furniture")
            .collect();
        let actual: Vec<&Record> = furniture.iter().collect();
        assert_eq!(actual, expected);
    }

    #[test]
    fn test_distinct_subcategories_first_seen_order() {
        let dataset = filter_by_category(&sample_dataset(), "Furniture");
        assert_eq!(
            distinct_subcategories(&dataset),
            vec!["Bookcases", "Chairs", "Tables"]
        );
        assert!(distinct_subcategories(&Dataset::default()).is_empty());
    }

    #[test]
    fn test_filter_by_subcategories() {
        let dataset = furniture_dataset();
        let chairs = filter_by_subcategories(&dataset, ["Chairs"]);
        assert_eq!(chairs.len(), 1);
        assert_eq!(chairs[0], dataset[0]);
    }

    #[test]
    fn test_filter_by_subcategories_empty_selection() {
        let dataset = sample_dataset();
        assert!(filter_by_subcategories(&dataset, Vec::<&str>::new()).is_empty());
    }

    #[test]
    fn test_selecting_all_subcategories_is_a_no_op() {
        let dataset = sample_dataset();
        for category in ["Furniture", "Office Supplies", "Technology", "Toys"] {
            let by_category = filter_by_category(&dataset, category);
            let all = distinct_subcategories(&by_category);
            assert_eq!(filter_by_subcategories(&by_category, &all), by_category);
        }
    }

    #[test]
    fn test_chairs_scenario() {
        let dataset = furniture_dataset();
        let overall = compute_metrics(&dataset);
        let chairs = filter_by_subcategories(&filter_by_category(&dataset, "Furniture"), ["Chairs"]);
        assert_eq!(chairs.len(), 1);
        let metrics = compute_metrics(&chairs);
        assert_eq!(metrics.total_sales, amount("100"));
        assert_eq!(metrics.total_profit, amount("20"));
        assert_eq!(metrics.profit_margin.to_string(), "20.00%");
        assert_eq!(compute_delta(&metrics, &overall).to_string(), "16.67%");
    }
}
