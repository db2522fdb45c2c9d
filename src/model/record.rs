use crate::error::{ErrorType, IntoResult, Res};
use crate::model::Amount;
use crate::Result;
use anyhow::{bail, Context};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::str::FromStr;

/// Represents a single sales transaction, i.e. one row of the input table.
#[derive(Default, Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Record {
    category: String,
    sub_category: String,
    /// Kept as it was written in the file. See `Dataset::index_by_date` for the parsed view.
    order_date: String,
    sales: Amount,
    profit: Amount,
    /// Columns other than the five above, keyed by their header.
    #[serde(skip_serializing_if = "BTreeMap::is_empty", default)]
    other_fields: BTreeMap<String, String>,
}

impl Record {
    pub fn new(
        category: impl Into<String>,
        sub_category: impl Into<String>,
        order_date: impl Into<String>,
        sales: Amount,
        profit: Amount,
    ) -> Self {
        Self {
            category: category.into(),
            sub_category: sub_category.into(),
            order_date: order_date.into(),
            sales,
            profit,
            other_fields: BTreeMap::new(),
        }
    }

    /// Builds a record from one row of values, where `headers[i]` names `values[i]`. Missing
    /// trailing values are treated as empty.
    ///
    /// # Errors
    /// - `ErrorType::Schema` if there are more values than headers.
    /// - `ErrorType::InvalidNumber` if `Sales` or `Profit` cannot be parsed.
    pub fn new_with_headers<S1, S2, I>(headers: &[S1], values: I) -> Result<Self>
    where
        S1: AsRef<str>,
        S2: Into<String>,
        I: IntoIterator<Item = S2>,
    {
        let mut record = Record::default();
        for (ix, value) in values.into_iter().map(|s| s.into()).enumerate() {
            let header = headers
                .get(ix)
                .with_context(|| format!("No header found for column index {ix}"))
                .pub_result(ErrorType::Schema)?
                .as_ref();
            record
                .set_with_header(header, value)
                .pub_result(ErrorType::InvalidNumber)?;
        }
        Ok(record)
    }

    pub(crate) fn set_with_header<S1, S2>(&mut self, header: S1, value: S2) -> Res<()>
    where
        S1: AsRef<str>,
        S2: Into<String>,
    {
        let header = header.as_ref();
        let value = value.into();

        match RecordColumn::from_header(header) {
            Some(RecordColumn::Category) => self.category = value,
            Some(RecordColumn::SubCategory) => self.sub_category = value,
            Some(RecordColumn::OrderDate) => self.order_date = value,
            Some(RecordColumn::Sales) => {
                self.sales = Amount::from_str(&value)
                    .with_context(|| format!("Bad value in the {SALES_STR} column"))?
            }
            Some(RecordColumn::Profit) => {
                self.profit = Amount::from_str(&value)
                    .with_context(|| format!("Bad value in the {PROFIT_STR} column"))?
            }
            None => {
                let _ = self.other_fields.insert(header.to_string(), value);
            }
        }

        Ok(())
    }

    pub fn category(&self) -> &str {
        &self.category
    }

    pub fn sub_category(&self) -> &str {
        &self.sub_category
    }

    pub fn order_date(&self) -> &str {
        &self.order_date
    }

    pub fn sales(&self) -> Amount {
        self.sales
    }

    pub fn profit(&self) -> Amount {
        self.profit
    }

    pub fn other_fields(&self) -> &BTreeMap<String, String> {
        &self.other_fields
    }

    /// Adds or replaces an extra column value.
    pub fn with_field(mut self, header: impl Into<String>, value: impl Into<String>) -> Self {
        self.other_fields.insert(header.into(), value.into());
        self
    }
}

/// The columns every sales table must have.
#[derive(Debug, Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordColumn {
    Category,
    SubCategory,
    OrderDate,
    Sales,
    Profit,
}

serde_plain::derive_display_from_serialize!(RecordColumn);
serde_plain::derive_fromstr_from_deserialize!(RecordColumn);

impl RecordColumn {
    pub const ALL: [RecordColumn; 5] = [
        RecordColumn::Category,
        RecordColumn::SubCategory,
        RecordColumn::OrderDate,
        RecordColumn::Sales,
        RecordColumn::Profit,
    ];

    /// Matches headers exactly as they appear in the canonical file. Headers are normalized by
    /// `Mapping` before they get here when loading a table.
    pub fn from_header(header: impl AsRef<str>) -> Option<RecordColumn> {
        match header.as_ref() {
            CATEGORY_STR => Some(RecordColumn::Category),
            SUB_CATEGORY_STR => Some(RecordColumn::SubCategory),
            ORDER_DATE_STR => Some(RecordColumn::OrderDate),
            SALES_STR => Some(RecordColumn::Sales),
            PROFIT_STR => Some(RecordColumn::Profit),
            _ => None,
        }
    }

    pub fn as_header_str(&self) -> &'static str {
        match self {
            RecordColumn::Category => CATEGORY_STR,
            RecordColumn::SubCategory => SUB_CATEGORY_STR,
            RecordColumn::OrderDate => ORDER_DATE_STR,
            RecordColumn::Sales => SALES_STR,
            RecordColumn::Profit => PROFIT_STR,
        }
    }
}

pub(crate) const CATEGORY_STR: &str = "Category";
pub(crate) const SUB_CATEGORY_STR: &str = "Sub_Category";
pub(crate) const ORDER_DATE_STR: &str = "Order_Date";
pub(crate) const SALES_STR: &str = "Sales";
pub(crate) const PROFIT_STR: &str = "Profit";

/// Checks that a header row has every required column, naming all that are missing.
pub(crate) fn check_required(mapping: &super::Mapping) -> Res<()> {
    let missing: Vec<&str> = RecordColumn::ALL
        .iter()
        .filter(|col| mapping.index_of(col.as_header_str()).is_none())
        .map(|col| col.as_header_str())
        .collect();
    if !missing.is_empty() {
        bail!("Missing required column(s): {}", missing.join(", "));
    }
    Ok(())
}
