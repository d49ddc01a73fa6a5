use std::path::Path;

use serde_json::Value;

use crate::error::LoadError;

/// On-disk encoding of a spec document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Yaml,
    Json,
}

impl Encoding {
    /// `.yaml` and `.yml` are YAML, everything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Encoding::Yaml,
            _ => Encoding::Json,
        }
    }
}

/// Parse a document tree from YAML.
pub fn from_yaml(input: &str) -> Result<Value, LoadError> {
    Ok(serde_yaml_ng::from_str(input)?)
}

/// Parse a document tree from JSON.
pub fn from_json(input: &str) -> Result<Value, LoadError> {
    Ok(serde_json::from_str(input)?)
}

fn parse(content: &str, encoding: Encoding) -> Result<Value, LoadError> {
    match encoding {
        Encoding::Yaml => from_yaml(content),
        Encoding::Json => from_json(content),
    }
}

/// Read and parse a spec file, picking the parser by extension.
pub fn load_path(path: &Path) -> Result<Value, LoadError> {
    let content = std::fs::read_to_string(path)?;
    log::debug!("loaded {} ({} bytes)", path.display(), content.len());
    parse(&content, Encoding::from_path(path))
}

/// Async variant of [`load_path`]; only the read itself is awaited.
pub async fn load_path_async(path: &Path) -> Result<Value, LoadError> {
    let content = tokio::fs::read_to_string(path).await?;
    log::debug!("loaded {} ({} bytes)", path.display(), content.len());
    parse(&content, Encoding::from_path(path))
}
