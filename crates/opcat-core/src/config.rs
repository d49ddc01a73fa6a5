use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::catalog::{CatalogOptions, EXTENSION_PREFIX};
use crate::error::ConfigError;

/// Project configuration loaded from `.opcat.yaml`.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct OpcatConfig {
    pub input: String,
    pub format: OutputFormat,
    pub catalog: CatalogConfig,
}

impl Default for OpcatConfig {
    fn default() -> Self {
        Self {
            input: "swagger.yaml".to_string(),
            format: OutputFormat::Yaml,
            catalog: CatalogConfig::default(),
        }
    }
}

impl OpcatConfig {
    pub fn catalog_options(&self) -> CatalogOptions {
        CatalogOptions {
            extension_prefix: self.catalog.extension_prefix.clone(),
            inherit_path_parameters: self.catalog.inherit_path_parameters,
        }
    }
}

/// How the CLI prints catalogs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputFormat {
    #[default]
    Yaml,
    Json,
}

/// Operation extraction settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    pub extension_prefix: String,
    pub inherit_path_parameters: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            extension_prefix: EXTENSION_PREFIX.to_string(),
            inherit_path_parameters: false,
        }
    }
}

/// Default config file name.
pub const CONFIG_FILE_NAME: &str = ".opcat.yaml";

/// Load config from a YAML file. Returns `None` if the file doesn't exist.
pub fn load_config(path: &Path) -> Result<Option<OpcatConfig>, ConfigError> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let config: OpcatConfig =
        serde_yaml_ng::from_str(&content).map_err(|source| ConfigError::Yaml {
            path: path.display().to_string(),
            source,
        })?;
    Ok(Some(config))
}

/// Generate the default config file content.
pub fn default_config_content() -> &'static str {
    r#"# opcat configuration
input: swagger.yaml
format: yaml            # yaml | json

catalog:
  extension_prefix: "x-"          # path-level keys inherited by every operation
  inherit_path_parameters: false  # prepend path-level parameters to each operation
"#
}
