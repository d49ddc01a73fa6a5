use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read spec: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse YAML: {0}")]
    Yaml(#[from] serde_yaml_ng::Error),

    #[error("failed to parse JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ResolveError {
    /// The pointer is not rooted at the local document (`#`).
    #[error("invalid reference format: {0}")]
    InvalidReferenceFormat(String),

    /// The pointer walks into a missing key.
    #[error("invalid reference: {0}")]
    InvalidReference(String),
}

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("load error: {0}")]
    Load(#[from] LoadError),

    #[error("resolve error: {0}")]
    Resolve(#[from] ResolveError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("failed to parse config {path}: {source}")]
    Yaml {
        path: String,
        source: serde_yaml_ng::Error,
    },
}
