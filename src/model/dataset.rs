use crate::error::{ErrorType, IntoResult};
use crate::model::record::check_required;
use crate::model::{Amount, DateParser, Mapping, Record, RecordColumn};
use crate::Result;
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::ops::Index;
use tracing::{debug, warn};

/// An ordered sequence of sales records. Once loaded it is never mutated; the filtering functions
/// in `crate::pipeline` return new `Dataset` values.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Dataset {
    /// The header row as it appeared in the source, if there was one.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    mapping: Option<Mapping>,
    data: Vec<Record>,
}

impl Dataset {
    pub fn new(data: Vec<Record>) -> Self {
        Self {
            mapping: None,
            data,
        }
    }

    /// Parses raw rows where the first row is the header.
    ///
    /// These generics are confusing, but think of it like this: `rows` is an iterator into
    /// something that looks like `Vec<Vec<String>>`.
    ///
    /// # Errors
    /// - `ErrorType::Schema` if there is no header row, a header is duplicated, a required column
    ///   is missing, or a row is longer than the header row. Nothing is partially loaded.
    /// - `ErrorType::InvalidNumber` if a `Sales` or `Profit` cell is not a number, or if the sum of
    ///   the magnitudes of a column does not fit in a `Decimal`. That bound keeps every total the
    ///   pipeline takes over a subset of the records exact.
    pub fn parse<S, R, I>(rows: I) -> Result<Self>
    where
        S: Into<String>,
        R: IntoIterator<Item = S>,
        I: IntoIterator<Item = R>,
    {
        let mut rows = rows.into_iter();
        let mapping = match rows.next() {
            Some(header_row) => Mapping::new(header_row)
                .context("Unable to read the header row")
                .pub_result(ErrorType::Schema)?,
            None => {
                return Err(anyhow!("An empty table cannot be parsed into a Dataset"))
                    .pub_result(ErrorType::Schema)
            }
        };
        check_required(&mapping).pub_result(ErrorType::Schema)?;

        // Use the canonical names for required columns so that `Record` can recognize them no
        // matter how the file spelled them.
        let mut headers: Vec<String> = mapping
            .headers()
            .iter()
            .map(|h| h.as_ref().to_string())
            .collect();
        for column in RecordColumn::ALL {
            if let Some(ix) = mapping.index_of(column.as_header_str()) {
                headers[ix] = column.as_header_str().to_string();
            }
        }

        let mut data = Vec::new();
        let mut magnitudes = (Amount::ZERO, Amount::ZERO);
        for (row_ix, row) in rows.enumerate() {
            // Row 1 is the header.
            let row_number = row_ix + 2;
            let values: Vec<String> = row.into_iter().map(|s| s.into()).collect();
            if values.iter().all(|v| v.trim().is_empty()) {
                continue;
            }
            if values.len() > headers.len() {
                return Err(anyhow!(
                    "A row longer than the header row was encountered at row {row_number}"
                ))
                .pub_result(ErrorType::Schema);
            }
            let record = Record::new_with_headers(&headers, values)
                .map_err(|e| e.context(format!("Unable to parse row {row_number}")))?;
            magnitudes = match (
                magnitudes.0.checked_add(record.sales().abs()),
                magnitudes.1.checked_add(record.profit().abs()),
            ) {
                (Some(sales), Some(profit)) => (sales, profit),
                _ => {
                    return Err(anyhow!(
                        "The {} and {} totals are too large to add up at row {row_number}",
                        RecordColumn::Sales.as_header_str(),
                        RecordColumn::Profit.as_header_str()
                    ))
                    .pub_result(ErrorType::InvalidNumber)
                }
            };
            if record.sales().is_negative() {
                warn!(
                    "Row {row_number} has a negative {} value {}",
                    RecordColumn::Sales.as_header_str(),
                    record.sales()
                );
            }
            data.push(record);
        }
        debug!("Parsed {} records", data.len());

        Ok(Self {
            mapping: Some(mapping),
            data,
        })
    }

    pub fn data(&self) -> &[Record] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.data.iter()
    }

    /// The header row of the source this data was loaded from, if any.
    pub fn mapping(&self) -> Option<&Mapping> {
        self.mapping.as_ref()
    }

    /// Returns a new `Dataset` holding clones of the records for which `predicate` returns true.
    /// The header mapping and record order are kept.
    pub fn filtered<F>(&self, mut predicate: F) -> Self
    where
        F: FnMut(&Record) -> bool,
    {
        Self {
            mapping: self.mapping.clone(),
            data: self.data.iter().filter(|r| predicate(r)).cloned().collect(),
        }
    }

    /// Produces a date-indexed view of this dataset by parsing every `Order_Date` with `parser`.
    /// The dataset itself is left untouched.
    ///
    /// # Errors
    /// `ErrorType::InvalidDate` on the first date that cannot be parsed. Records are never skipped.
    pub fn index_by_date(&self, parser: &DateParser) -> Result<DatedDataset<'_>> {
        let mut rows = Vec::with_capacity(self.data.len());
        for (ix, record) in self.data.iter().enumerate() {
            let date = parser
                .parse(record.order_date())
                .with_context(|| format!("Unable to parse the order date of record {}", ix + 1))
                .pub_result(ErrorType::InvalidDate)?;
            rows.push((date, record));
        }
        Ok(DatedDataset { rows })
    }
}

impl Index<usize> for Dataset {
    type Output = Record;

    fn index(&self, index: usize) -> &Self::Output {
        &self.data[index]
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<T: IntoIterator<Item = Record>>(iter: T) -> Self {
        Dataset::new(iter.into_iter().collect())
    }
}

/// A `Dataset` in which each record is paired with its parsed order date. Borrows the records it
/// was built from.
#[derive(Debug, Clone)]
pub struct DatedDataset<'a> {
    rows: Vec<(NaiveDate, &'a Record)>,
}

impl<'a> DatedDataset<'a> {
    pub fn rows(&self) -> &[(NaiveDate, &'a Record)] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
