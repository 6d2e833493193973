//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::Config;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: LibConfigBuilder<config::builder::DefaultState>,
    key: &str,
    value: T,
) -> Result<LibConfigBuilder<config::builder::DefaultState>> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

impl Config {
    /// Loads configuration from an optional TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `PATHMINER_` and use double underscores
    /// for nested values. For example:
    /// - `PATHMINER_PIPELINE__BATCH_SIZE=16`
    /// - `PATHMINER_STORAGE__KIND=code2vec`
    /// - `PATHMINER_PIPELINE__TRANSFORMATIONS=exclude_comments,hide_literals`
    pub fn from_file(path: Option<&Path>) -> Result<Self> {
        let builder = ConfigLib::builder();

        let builder = set_config_default(
            builder,
            "pipeline.language",
            default_language().to_string(),
        )?;
        let builder = set_config_default(
            builder,
            "pipeline.batch_size",
            default_batch_size() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "pipeline.transformations",
            default_transformations()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>(),
        )?;
        let builder = set_config_default(
            builder,
            "paths.max_height",
            default_max_path_height() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "paths.max_width",
            default_max_path_width() as i64,
        )?;
        let mut builder = set_config_default(builder, "storage.kind", default_storage_kind())?;

        // Add the config file if it exists
        if let Some(path) = path {
            if !path.exists() {
                return Err(Error::config(format!(
                    "Config file {} does not exist",
                    path.display()
                )));
            }
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with PATHMINER_ prefix
        builder = builder.add_source(
            Environment::with_prefix("PATHMINER")
                .separator("__")
                .list_separator(",")
                .with_list_parse_key("pipeline.transformations")
                .try_parsing(true),
        );

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))
    }

    /// Creates a config from a TOML string (useful for testing)
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load and validate configuration
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (`--config` path), when given
    /// 3. Environment variables (PATHMINER_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let config = Self::from_file(config_path)?;
        config.validate()?;
        Ok(config)
    }
}
