use crate::error::Res;
use crate::source::{parse_csv, Source};

/// A small superstore-style sample used by `Mode::Test` and by unit tests.
pub(crate) const SAMPLE_CSV: &str = r##"Row_ID,Category,Sub_Category,Order_Date,Sales,Profit
1,Furniture,Bookcases,11/8/2016,261.96,41.9136
2,Furniture,Chairs,11/8/2016,731.94,219.582
3,Office Supplies,Labels,6/12/2016,14.62,6.8714
4,Furniture,Tables,10/11/2015,957.5775,-383.031
5,Office Supplies,Storage,10/11/2015,22.368,2.5164
6,Technology,Phones,6/9/2014,907.152,90.7152
7,Office Supplies,Binders,6/9/2014,18.504,5.7825
8,Technology,Accessories,6/9/2014,114.9,34.47
9,Furniture,Chairs,6/9/2014,48.86,14.1694
"##;

/// Serves rows that are already in memory. The default instance serves `SAMPLE_CSV`.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    rows: Option<Vec<Vec<String>>>,
}

impl MemorySource {
    pub fn new(rows: Vec<Vec<String>>) -> Self {
        Self { rows: Some(rows) }
    }
}

#[async_trait::async_trait]
impl Source for MemorySource {
    async fn rows(&mut self) -> Res<Vec<Vec<String>>> {
        match &self.rows {
            Some(rows) => Ok(rows.clone()),
            None => parse_csv(SAMPLE_CSV),
        }
    }

    fn describe(&self) -> String {
        match &self.rows {
            Some(rows) => format!("in-memory table of {} rows", rows.len()),
            None => "in-memory sample data".to_string(),
        }
    }
}
