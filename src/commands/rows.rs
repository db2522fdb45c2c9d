use crate::args::RowsArgs;
use crate::commands::table::{Align, Table};
use crate::commands::{Input, Out};
use crate::model::{Dataset, Record, RecordColumn};
use crate::Result;

/// The raw table, optionally truncated to `--limit` rows.
pub async fn rows(input: &Input, args: &RowsArgs) -> Result<Out<Vec<Record>>> {
    let dataset = input.dataset().await?;
    let shown: Vec<Record> = match args.limit() {
        Some(limit) => dataset.iter().take(limit).cloned().collect(),
        None => dataset.data().to_vec(),
    };
    let mut message = render(&dataset, &shown);
    if shown.len() < dataset.len() {
        message.push_str(&format!("\n\n{} of {} rows", shown.len(), dataset.len()));
    }
    Ok(Out::new(message, shown))
}

/// One column of the rows table: the header as written in the file and where its values live.
struct Column {
    header: String,
    known: Option<RecordColumn>,
}

impl Column {
    fn cell(&self, record: &Record) -> String {
        match self.known {
            Some(RecordColumn::Category) => record.category().to_string(),
            Some(RecordColumn::SubCategory) => record.sub_category().to_string(),
            Some(RecordColumn::OrderDate) => record.order_date().to_string(),
            Some(RecordColumn::Sales) => record.sales().to_string(),
            Some(RecordColumn::Profit) => record.profit().to_string(),
            None => record
                .other_fields()
                .get(&self.header)
                .cloned()
                .unwrap_or_default(),
        }
    }

    fn align(&self) -> Align {
        match self.known {
            Some(RecordColumn::Sales | RecordColumn::Profit) => Align::Right,
            _ => Align::Left,
        }
    }
}

/// Uses the file's own column order when the dataset came from a table, and the five known
/// columns otherwise.
fn columns(dataset: &Dataset) -> Vec<Column> {
    match dataset.mapping() {
        Some(mapping) => mapping
            .headers()
            .iter()
            .enumerate()
            .map(|(ix, header)| Column {
                header: header.as_ref().to_string(),
                known: RecordColumn::ALL
                    .into_iter()
                    .find(|c| mapping.index_of(c.as_header_str()) == Some(ix)),
            })
            .collect(),
        None => RecordColumn::ALL
            .into_iter()
            .map(|c| Column {
                header: c.as_header_str().to_string(),
                known: Some(c),
            })
            .collect(),
    }
}

fn render(dataset: &Dataset, shown: &[Record]) -> String {
    let columns = columns(dataset);
    let mut table = Table::new(columns.iter().map(|c| (c.header.clone(), c.align())));
    for record in shown {
        table.push(columns.iter().map(|c| c.cell(record)).collect());
    }
    table.render()
}
