use crate::args::{ReportArgs, SelectArgs, SubcategoriesArgs};
use crate::commands::summary::{describe, render_categories, render_months};
use crate::commands::{Input, Out};
use crate::model::{Dataset, Percent};
use crate::pipeline::{compute_delta, compute_metrics, Metrics, Selection};
use crate::report::{Report, ReportOptions};
use crate::Result;
use serde::Serialize;

/// The sub-categories that exist under `--category`, in the order they first appear.
pub async fn subcategories(input: &Input, args: &SubcategoriesArgs) -> Result<Out<Vec<String>>> {
    let dataset = input.dataset().await?;
    let selection = Selection::new(&dataset, args.category());
    let domain = selection.domain().to_vec();
    let message = if domain.is_empty() {
        format!("There are no records in category '{}'", args.category())
    } else {
        domain.join("\n")
    };
    Ok(Out::new(message, domain))
}

/// The metrics of a selection next to the metrics of the whole dataset.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsOut {
    pub selection: Selection,
    pub metrics: Metrics,
    pub overall: Metrics,
    pub delta: Percent,
}

/// Total sales, total profit and profit margin of the selection, and its margin delta against the
/// whole dataset.
pub async fn metrics(input: &Input, args: &SelectArgs) -> Result<Out<MetricsOut>> {
    let dataset = input.dataset().await?;
    let selection = select(&dataset, args)?;
    let metrics = compute_metrics(&selection.apply(&dataset));
    let overall = compute_metrics(&dataset);
    let delta = compute_delta(&metrics, &overall);
    let message = format!(
        "Metrics for {}\n\n{}",
        describe(&selection),
        render_metrics(&metrics, delta)
    );
    Ok(Out::new(
        message,
        MetricsOut {
            selection,
            metrics,
            overall,
            delta,
        },
    ))
}

/// Every view of the dashboard for one selection.
pub async fn report(input: &Input, args: &ReportArgs) -> Result<Out<Report>> {
    let dataset = input.dataset().await?;
    let selection = select(&dataset, args.select())?;
    let options = ReportOptions {
        date_parser: input.date_parser(),
        dense: args.dense() || input.config().fill_empty_months(),
    };
    let report = Report::build(dataset, &selection, &options)?;
    let message = format!(
        "Sales by category\n\n{}\n\nMonthly sales, all records\n\n{}\n\n\
         Sub-categories of '{}': {}\n\nMonthly sales for {}\n\n{}\n\n{}",
        render_categories(report.categories()),
        render_months(report.monthly()),
        selection.category(),
        selection.domain().join(", "),
        describe(&selection),
        render_months(report.selection_monthly()),
        render_metrics(report.metrics(), report.delta()),
    );
    Ok(Out::new(message, report))
}

fn select(dataset: &Dataset, args: &SelectArgs) -> Result<Selection> {
    if args.sub_categories().is_empty() {
        Ok(Selection::new(dataset, args.category()))
    } else {
        Selection::with_sub_categories(dataset, args.category(), args.sub_categories())
    }
}

fn render_metrics(metrics: &Metrics, delta: Percent) -> String {
    format!(
        "Total sales:   {}\nTotal profit:  {}\nProfit margin: {} ({} against all records)",
        metrics.total_sales,
        metrics.total_profit,
        metrics.profit_margin,
        signed(delta)
    )
}

/// Formats `delta` with an explicit sign. The sign is taken after rounding to the two places that
/// are shown, so a tiny delta prints as `0.00%`.
fn signed(delta: Percent) -> String {
    let shown = delta.value().round_dp(2);
    if shown.is_zero() {
        Percent::ZERO.to_string()
    } else if shown.is_sign_negative() {
        delta.to_string()
    } else {
        format!("+{delta}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Mode;
    use crate::test::TestEnv;
    use crate::ErrorType;

    async fn input() -> (TestEnv, Input) {
        let env = TestEnv::new().await;
        let input = Input::new(env.config(), Mode::File, None);
        (env, input)
    }

    #[tokio::test]
    async fn test_subcategories() {
        let (_env, input) = input().await;
        let out = subcategories(&input, &SubcategoriesArgs::new("Office Supplies"))
            .await
            .unwrap();
        assert_eq!(out.structure().unwrap(), &["Labels", "Storage", "Binders"]);
        let out = subcategories(&input, &SubcategoriesArgs::new("Toys"))
            .await
            .unwrap();
        assert!(out.structure().unwrap().is_empty());
        assert!(out.message().contains("no records"));
    }

    #[tokio::test]
    async fn test_metrics_technology() {
        let (_env, input) = input().await;
        let out = metrics(&input, &SelectArgs::new("Technology", ["Phones"]))
            .await
            .unwrap();
        let result = out.structure().unwrap();
        assert_eq!(result.metrics.total_sales.to_string(), "$907.15");
        assert_eq!(result.metrics.profit_margin.to_string(), "10.00%");
        assert_eq!(result.overall, compute_metrics(&input.dataset().await.unwrap()));
        assert!(out.message().contains("Profit margin: 10.00%"));
    }

    #[tokio::test]
    async fn test_metrics_unknown_sub_category() {
        let (_env, input) = input().await;
        let err = metrics(&input, &SelectArgs::new("Technology", ["Chairs"]))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Selection);
    }

    #[tokio::test]
    async fn test_report_message_sections() {
        let (_env, input) = input().await;
        let args = ReportArgs::new(SelectArgs::new("Furniture", Vec::<String>::new()), false);
        let out = report(&input, &args).await.unwrap();
        let message = out.message();
        assert!(message.contains("Sub-categories of 'Furniture': Bookcases, Chairs, Tables"));
        assert!(message.contains("Monthly sales for 'Furniture'"));
        assert_eq!(out.structure().unwrap().filtered().len(), 4);
    }

    #[test]
    fn test_signed() {
        assert_eq!(signed(Percent::ZERO), "0.00%");
        let up = Percent::ratio(crate::test::amount("1"), crate::test::amount("8"));
        assert_eq!(signed(up), "+12.50%");
        let down = Percent::ratio(crate::test::amount("-1"), crate::test::amount("8"));
        assert_eq!(signed(down), "-12.50%");
    }

    #[test]
    fn test_signed_rounds_before_sign() {
        use rust_decimal::Decimal;
        assert_eq!(signed(Percent::new(Decimal::new(1, 3))), "0.00%");
        assert_eq!(signed(Percent::new(Decimal::new(-1, 3))), "0.00%");
        assert_eq!(signed(Percent::new(Decimal::new(6, 3))), "+0.01%");
        assert_eq!(signed(Percent::new(Decimal::new(-6, 3))), "-0.01%");
    }
}
