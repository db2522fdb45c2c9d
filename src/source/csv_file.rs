use crate::error::Res;
use crate::source::Source;
use crate::utils;
use anyhow::Context;
use std::path::PathBuf;

/// Reads a sales table from a CSV file on disk.
#[derive(Debug, Clone)]
pub struct CsvSource {
    path: PathBuf,
}

impl CsvSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait::async_trait]
impl Source for CsvSource {
    async fn rows(&mut self) -> Res<Vec<Vec<String>>> {
        let content = utils::read(&self.path).await?;
        parse_csv(&content).with_context(|| format!("Malformed CSV in {}", self.path.display()))
    }

    fn describe(&self) -> String {
        format!("'{}'", self.path.display())
    }
}

/// Splits CSV text into rows of fields. The header row is returned as an ordinary row. Rows may
/// have differing lengths; validating them is left to `Dataset::parse`.
pub(crate) fn parse_csv(content: &str) -> Res<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());
    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result.context("Unable to read a CSV record")?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
