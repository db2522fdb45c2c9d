use crate::args::MonthsArgs;
use crate::commands::table::{Align, Table};
use crate::commands::{Input, Out};
use crate::pipeline::{
    summarize_by_category, summarize_by_month_with, CategorySummary, MonthlySummary, Selection,
};
use crate::Result;
use tracing::debug;

/// Sales, profit and record count per category.
pub async fn categories(input: &Input) -> Result<Out<CategorySummary>> {
    let dataset = input.dataset().await?;
    let summary = summarize_by_category(&dataset);
    Ok(Out::new(render_categories(&summary), summary))
}

/// Sales per month for the whole dataset, or for a category and its chosen sub-categories.
pub async fn months(input: &Input, args: &MonthsArgs) -> Result<Out<MonthlySummary>> {
    let dataset = input.dataset().await?;
    let (scope, summary) = match args.category() {
        Some(category) => {
            let mut selection = Selection::new(&dataset, category);
            if !args.sub_categories().is_empty() {
                selection.select(args.sub_categories())?;
            }
            let filtered = selection.apply(&dataset);
            debug!("{} records in the selection", filtered.len());
            (
                describe(&selection),
                summarize_by_month_with(&filtered, &input.date_parser())?,
            )
        }
        None => (
            "all records".to_string(),
            summarize_by_month_with(&dataset, &input.date_parser())?,
        ),
    };
    let summary = if args.dense() || input.config().fill_empty_months() {
        summary.dense()
    } else {
        summary
    };
    let message = format!("Monthly sales for {scope}\n\n{}", render_months(&summary));
    Ok(Out::new(message, summary))
}

/// A short description of a selection for message headings.
pub(super) fn describe(selection: &Selection) -> String {
    if selection.is_all() {
        format!("'{}'", selection.category())
    } else {
        format!(
            "'{}' ({})",
            selection.category(),
            selection.sub_categories().join(", ")
        )
    }
}

pub(super) fn render_categories(summary: &CategorySummary) -> String {
    let mut table = Table::new([
        ("Category", Align::Left),
        ("Records", Align::Right),
        ("Sales", Align::Right),
        ("Profit", Align::Right),
    ]);
    for (category, totals) in summary.iter() {
        table.push(vec![
            category.to_string(),
            totals.records.to_string(),
            totals.sales.to_string(),
            totals.profit.to_string(),
        ]);
    }
    table.push(vec![
        "Total".to_string(),
        summary.iter().map(|(_, t)| t.records).sum::<usize>().to_string(),
        summary.total_sales().to_string(),
        summary.total_profit().to_string(),
    ]);
    table.render()
}

pub(super) fn render_months(summary: &MonthlySummary) -> String {
    let mut table = Table::new([("Month", Align::Left), ("Sales", Align::Right)]);
    for (month, sales) in summary.iter() {
        table.push(vec![month.to_string(), sales.to_string()]);
    }
    table.render()
}
