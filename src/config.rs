//! Configuration file handling.
//!
//! The configuration file is optional. It lives at `$HOME/.config/sales/config.json` unless
//! `--config` or `SALES_CONFIG` says otherwise, and it holds the path of the sales CSV along with
//! the date formats and the monthly summary policy.

use crate::error::{ErrorType, IntoResult, Res};
use crate::model::{DateParser, DEFAULT_DATE_FORMATS};
use crate::{utils, Result};
use anyhow::{ensure, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

const APP_NAME: &str = "sales";
const CONFIG_VERSION: u8 = 1;
pub(crate) const CONFIG_JSON: &str = "config.json";

/// The `Config` object represents the configuration of the app. It is loaded from a JSON file and
/// resolves the paths in it against the directory that holds that file.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    config_path: PathBuf,
    config_file: ConfigFile,
}

impl Config {
    /// Writes a fresh config file at `config_path` that points to `data_path`.
    ///
    /// # Arguments
    /// - `config_path` - Where to write the file, e.g. `$HOME/.config/sales/config.json`. Missing
    ///   parent directories are created.
    /// - `data_path` - The sales CSV. It must exist; its absolute path is stored.
    ///
    /// # Errors
    /// - `ErrorType::Config` if the data file does not exist or any file operation fails.
    pub async fn create(config_path: impl Into<PathBuf>, data_path: &Path) -> Result<Self> {
        Self::create_inner(config_path.into(), data_path)
            .await
            .pub_result(ErrorType::Config)
    }

    async fn create_inner(config_path: PathBuf, data_path: &Path) -> Res<Self> {
        let data_path = tokio::fs::canonicalize(data_path)
            .await
            .with_context(|| format!("The data file '{}' does not exist", data_path.display()))?;
        let root = parent_dir(&config_path);
        utils::make_dir(&root)
            .await
            .context("Unable to create the config directory")?;

        let config_file = ConfigFile {
            data_path: Some(data_path),
            ..ConfigFile::default()
        };
        config_file.save(&config_path).await?;
        debug!("Wrote config file {}", config_path.display());

        Ok(Self {
            root,
            config_path,
            config_file,
        })
    }

    /// Loads and validates the config file at `config_path`.
    ///
    /// # Errors
    /// - `ErrorType::Config` if the file is missing, is not valid JSON, or fails validation.
    pub async fn load(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        let config_file = ConfigFile::load(&config_path)
            .await
            .pub_result(ErrorType::Config)?;
        Ok(Self {
            root: parent_dir(&config_path),
            config_path,
            config_file,
        })
    }

    /// Like `load`, but a missing file gives the default configuration. A file that exists but is
    /// invalid is still an error.
    pub async fn load_or_default(config_path: impl Into<PathBuf>) -> Result<Self> {
        let config_path = config_path.into();
        if config_path.is_file() {
            return Self::load(config_path).await;
        }
        debug!(
            "No config file at {}, using defaults",
            config_path.display()
        );
        Ok(Self {
            root: parent_dir(&config_path),
            config_path,
            config_file: ConfigFile::default(),
        })
    }

    /// The directory that holds the config file.
    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// The configured sales CSV. A relative path is resolved against `root`.
    pub fn data_path(&self) -> Option<PathBuf> {
        self.config_file
            .data_path
            .as_deref()
            .map(|p| utils::resolve(&self.root, p))
    }

    pub fn date_formats(&self) -> &[String] {
        &self.config_file.date_formats
    }

    /// A `DateParser` for the configured date formats.
    pub fn date_parser(&self) -> DateParser {
        DateParser::new(self.config_file.date_formats.iter().cloned())
    }

    /// Whether monthly summaries should include months without sales.
    pub fn fill_empty_months(&self) -> bool {
        self.config_file.fill_empty_months
    }
}

fn parent_dir(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// The default location of the config file: `$HOME/.config/sales/config.json`.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".config").join(APP_NAME).join(CONFIG_JSON))
}

/// Represents the serialization and deserialization format of the configuration file.
///
/// Example configuration:
/// ```json
/// {
///   "app_name": "sales",
///   "config_version": 1,
///   "data_path": "Superstore_Sales_utf8.csv",
///   "date_formats": ["%m/%d/%Y", "%Y-%m-%d"],
///   "fill_empty_months": false
/// }
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
struct ConfigFile {
    /// Application name, should always be "sales"
    app_name: String,

    /// Configuration file version
    config_version: u8,

    /// Path to the sales CSV (relative to config.json or absolute)
    #[serde(skip_serializing_if = "Option::is_none", default)]
    data_path: Option<PathBuf>,

    /// chrono format strings tried in order when parsing `Order_Date`
    #[serde(default = "default_date_formats")]
    date_formats: Vec<String>,

    #[serde(default)]
    fill_empty_months: bool,
}

fn default_date_formats() -> Vec<String> {
    DEFAULT_DATE_FORMATS.iter().map(|s| s.to_string()).collect()
}

impl Default for ConfigFile {
    fn default() -> Self {
        Self {
            app_name: APP_NAME.to_string(),
            config_version: CONFIG_VERSION,
            data_path: None,
            date_formats: default_date_formats(),
            fill_empty_months: false,
        }
    }
}

impl ConfigFile {
    /// Loads and validates a ConfigFile from `path`.
    async fn load(path: &Path) -> Res<Self> {
        let config: ConfigFile = utils::deserialize(path)
            .await
            .context("Unable to load the config file")?;

        ensure!(
            config.app_name == APP_NAME,
            "Invalid app_name in config file: expected '{}', got '{}'",
            APP_NAME,
            config.app_name
        );
        ensure!(
            config.config_version == CONFIG_VERSION,
            "Unsupported config_version {} in config file, expected {}",
            config.config_version,
            CONFIG_VERSION
        );
        ensure!(
            !config.date_formats.is_empty(),
            "The date_formats list in the config file is empty"
        );

        Ok(config)
    }

    async fn save(&self, path: &Path) -> Res<()> {
        let data = serde_json::to_string_pretty(self).context("Unable to serialize config")?;
        utils::write(path, data)
            .await
            .context("Unable to write config file")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_config_create_then_load() {
        let dir = TempDir::new().unwrap();
        let data = dir.path().join("sales.csv");
        utils::write(&data, "Category\n").await.unwrap();
        let config_path = dir.path().join("a").join("b").join(CONFIG_JSON);

        let created = Config::create(&config_path, &data).await.unwrap();
        assert!(config_path.is_file());
        let loaded = Config::load(&config_path).await.unwrap();

        let expected = tokio::fs::canonicalize(&data).await.unwrap();
        assert_eq!(created.data_path(), Some(expected.clone()));
        assert_eq!(loaded.data_path(), Some(expected));
        assert!(!loaded.fill_empty_months());
        assert_eq!(loaded.date_formats().len(), DEFAULT_DATE_FORMATS.len());
    }

    #[tokio::test]
    async fn test_config_create_missing_data_file() {
        let dir = TempDir::new().unwrap();
        let err = Config::create(dir.path().join(CONFIG_JSON), &dir.path().join("nope.csv"))
            .await
            .unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("nope.csv"));
    }

    #[tokio::test]
    async fn test_relative_data_path_resolves_against_config_dir() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_JSON);
        utils::write(
            &config_path,
            r#"{
                "app_name": "sales",
                "config_version": 1,
                "data_path": "data/sales.csv",
                "date_formats": ["%d.%m.%Y"],
                "fill_empty_months": true
            }"#,
        )
        .await
        .unwrap();
        let config = Config::load(&config_path).await.unwrap();
        assert_eq!(
            config.data_path(),
            Some(dir.path().join("data").join("sales.csv"))
        );
        assert!(config.fill_empty_months());
        assert_eq!(config.date_parser().formats(), &["%d.%m.%Y".to_string()]);
    }

    #[tokio::test]
    async fn test_optional_fields_default() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_JSON);
        utils::write(&config_path, r#"{"app_name": "sales", "config_version": 1}"#)
            .await
            .unwrap();
        let config = Config::load(&config_path).await.unwrap();
        assert_eq!(config.data_path(), None);
        assert_eq!(config.date_parser(), DateParser::default());
    }

    #[tokio::test]
    async fn test_wrong_app_name() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_JSON);
        utils::write(&config_path, r#"{"app_name": "inventory", "config_version": 1}"#)
            .await
            .unwrap();
        let err = Config::load(&config_path).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
        assert!(err.to_string().contains("app_name"));
    }

    #[tokio::test]
    async fn test_empty_date_formats_rejected() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_JSON);
        utils::write(
            &config_path,
            r#"{"app_name": "sales", "config_version": 1, "date_formats": []}"#,
        )
        .await
        .unwrap();
        assert!(Config::load(&config_path).await.is_err());
    }

    #[tokio::test]
    async fn test_load_or_default_missing_file() {
        let dir = TempDir::new().unwrap();
        let config = Config::load_or_default(dir.path().join(CONFIG_JSON))
            .await
            .unwrap();
        assert_eq!(config.data_path(), None);
        assert_eq!(config.root(), dir.path());
    }

    #[tokio::test]
    async fn test_load_or_default_invalid_file_is_error() {
        let dir = TempDir::new().unwrap();
        let config_path = dir.path().join(CONFIG_JSON);
        utils::write(&config_path, "not json").await.unwrap();
        let err = Config::load_or_default(&config_path).await.unwrap_err();
        assert_eq!(err.error_type(), ErrorType::Config);
    }
}
