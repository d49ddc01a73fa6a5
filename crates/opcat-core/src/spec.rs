use std::path::{Path, PathBuf};

use serde_json::Value;

use crate::catalog::{self, CatalogOptions, Operation};
use crate::error::{CatalogError, ResolveError};
use crate::load;

/// Where a spec comes from: a file to load, or an already parsed tree.
#[derive(Debug, Clone)]
pub enum SpecSource {
    Path(PathBuf),
    Document(Value),
}

impl From<&str> for SpecSource {
    fn from(path: &str) -> Self {
        SpecSource::Path(PathBuf::from(path))
    }
}

impl From<String> for SpecSource {
    fn from(path: String) -> Self {
        SpecSource::Path(PathBuf::from(path))
    }
}

impl From<PathBuf> for SpecSource {
    fn from(path: PathBuf) -> Self {
        SpecSource::Path(path)
    }
}

impl From<&Path> for SpecSource {
    fn from(path: &Path) -> Self {
        SpecSource::Path(path.to_path_buf())
    }
}

impl From<Value> for SpecSource {
    fn from(document: Value) -> Self {
        SpecSource::Document(document)
    }
}

/// A loaded document with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Spec {
    document: Value,
}

impl Spec {
    /// Wrap a parsed document, applying defaults.
    pub fn new(document: Value) -> Self {
        Self {
            document: apply_defaults(document),
        }
    }

    pub fn document(&self) -> &Value {
        &self.document
    }

    pub fn into_document(self) -> Value {
        self.document
    }

    pub fn base_path(&self) -> &str {
        self.document
            .get("basePath")
            .and_then(Value::as_str)
            .unwrap_or("/")
    }

    /// The flattened operation catalog.
    pub fn operations(&self) -> Result<Vec<Operation>, ResolveError> {
        catalog::get_all_operations(&self.document)
    }

    pub fn operations_with_options(
        &self,
        options: &CatalogOptions,
    ) -> Result<Vec<Operation>, ResolveError> {
        catalog::get_all_operations_with_options(&self.document, options)
    }
}

/// Set `basePath` to `/` when it is missing or falsy. Other non-string
/// values are stringified the way the assembler reads them.
pub fn apply_defaults(mut document: Value) -> Value {
    let normalized = catalog::operation::base_path(&document);
    if let Value::Object(root) = &mut document {
        if !matches!(root.get("basePath"), Some(Value::String(s)) if *s == normalized) {
            root.insert("basePath".into(), Value::String(normalized));
        }
    }
    document
}

/// Load (if given a path) and normalize a spec, blocking on the read.
pub fn get_spec_sync(source: impl Into<SpecSource>) -> Result<Spec, CatalogError> {
    let document = match source.into() {
        SpecSource::Path(path) => load::load_path(&path)?,
        SpecSource::Document(document) => document,
    };
    Ok(Spec::new(document))
}

/// Load (if given a path) and normalize a spec.
pub async fn get_spec(source: impl Into<SpecSource>) -> Result<Spec, CatalogError> {
    let document = match source.into() {
        SpecSource::Path(path) => load::load_path_async(&path).await?,
        SpecSource::Document(document) => document,
    };
    Ok(Spec::new(document))
}
