use crate::commands::Out;
use crate::source::{self, CsvSource};
use crate::{Config, Result};
use std::path::Path;

/// Writes a config file at `config_path` that points to the sales CSV at `data`.
///
/// The CSV is loaded once before anything is written, so a file with a bad header row is reported
/// now rather than on the next command.
///
/// # Errors
/// - `ErrorType::Io`, `ErrorType::Schema` or `ErrorType::InvalidNumber` if `data` cannot be
///   loaded.
/// - `ErrorType::Config` if the config file cannot be written.
pub async fn init(config_path: &Path, data: &Path) -> Result<Out<()>> {
    let dataset = source::load(&mut CsvSource::new(data)).await?;
    let config = Config::create(config_path, data)
        .await
        .map_err(|e| e.context("Unable to create the config file"))?;
    Ok(format!(
        "Wrote {} for {} records in '{}'",
        config.config_path().display(),
        dataset.len(),
        data.display()
    )
    .into())
}
