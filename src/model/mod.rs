//! Types that represent the core data model, such as `Record` and `Dataset`.
mod amount;
mod dataset;
mod mapping;
mod month;
mod record;

pub use amount::{Amount, AmountError, Percent};
pub use dataset::{Dataset, DatedDataset};
pub use mapping::{Header, Mapping, MappingError};
pub use month::{DateParser, Month, DEFAULT_DATE_FORMATS};
pub use record::{Record, RecordColumn};
