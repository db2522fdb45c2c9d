use proptest::prelude::*;
use rust_decimal::Decimal;
use sales_summary::pipeline::{
    compute_metrics, distinct_subcategories, filter_by_category, filter_by_subcategories,
    summarize_by_category, summarize_by_month,
};
use sales_summary::{Amount, Dataset, Metrics, Record, Selection};

const CATEGORIES: &[&str] = &["Furniture", "Office Supplies", "Technology"];
const SUB_CATEGORIES: &[&str] = &["Chairs", "Labels", "Phones", "Tables", "Binders"];

fn record() -> impl Strategy<Value = Record> {
    (
        0..CATEGORIES.len(),
        0..SUB_CATEGORIES.len(),
        2014i32..=2018,
        1u32..=12,
        1u32..=28,
        any::<bool>(),
        -100_000i64..1_000_000,
        -50_000i64..50_000,
    )
        .prop_map(|(c, s, year, month, day, us, sales, profit)| {
            let date = if us {
                format!("{month}/{day}/{year}")
            } else {
                format!("{year}-{month:02}-{day:02}")
            };
            Record::new(
                CATEGORIES[c],
                SUB_CATEGORIES[s],
                date,
                Amount::new(Decimal::new(sales, 2)),
                Amount::new(Decimal::new(profit, 2)),
            )
        })
}

fn dataset() -> impl Strategy<Value = Dataset> {
    proptest::collection::vec(record(), 0..64).prop_map(Dataset::new)
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 128,
        rng_seed: proptest::test_runner::RngSeed::Fixed(0),
        max_shrink_iters: 0,
        failure_persistence: None,
        .. ProptestConfig::default()
    })]

    #[test]
    fn category_totals_conserve_sales_and_profit(dataset in dataset()) {
        let summary = summarize_by_category(&dataset);
        let overall = compute_metrics(&dataset);
        prop_assert_eq!(summary.total_sales(), overall.total_sales);
        prop_assert_eq!(summary.total_profit(), overall.total_profit);
        let records: usize = summary.iter().map(|(_, t)| t.records).sum();
        prop_assert_eq!(records, dataset.len());
    }

    #[test]
    fn monthly_totals_conserve_sales(dataset in dataset()) {
        let summary = summarize_by_month(&dataset).unwrap();
        prop_assert_eq!(summary.total(), compute_metrics(&dataset).total_sales);
        let months: Vec<_> = summary.months().collect();
        prop_assert!(months.windows(2).all(|w| w[0] < w[1]));
        prop_assert_eq!(summary.dense().total(), summary.total());
    }

    #[test]
    fn selecting_every_sub_category_changes_nothing(dataset in dataset(), c in 0..CATEGORIES.len()) {
        let by_category = filter_by_category(&dataset, CATEGORIES[c]);
        let all = distinct_subcategories(&by_category);
        prop_assert_eq!(filter_by_subcategories(&by_category, &all), by_category.clone());
        prop_assert_eq!(Selection::new(&dataset, CATEGORIES[c]).apply(&dataset), by_category);
    }

    #[test]
    fn selecting_nothing_gives_nothing(dataset in dataset(), c in 0..CATEGORIES.len()) {
        let by_category = filter_by_category(&dataset, CATEGORIES[c]);
        let none = filter_by_subcategories(&by_category, Vec::<String>::new());
        prop_assert!(none.is_empty());
        prop_assert_eq!(compute_metrics(&none), Metrics::default());
    }

    #[test]
    fn category_filter_partitions_the_dataset(dataset in dataset()) {
        let mut total = 0;
        for category in CATEGORIES {
            let filtered = filter_by_category(&dataset, category);
            prop_assert!(filtered.iter().all(|r| r.category() == *category));
            total += filtered.len();
        }
        prop_assert_eq!(total, dataset.len());
    }
}
