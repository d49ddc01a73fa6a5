pub mod operation;
pub mod schemas;
pub mod types;

pub use operation::{create_path_operation, create_path_operation_with_options};
pub use schemas::{create_param_group_schemas, create_response_schemas};
pub use types::{HttpMethod, ObjectSchema, Operation, ParameterLocation, ResponseSchema};

use serde_json::{Map, Value};

use crate::error::ResolveError;

/// Default marker for vendor-extension keys.
pub const EXTENSION_PREFIX: &str = "x-";

/// Options controlling how operations are extracted and assembled.
#[derive(Debug, Clone)]
pub struct CatalogOptions {
    /// Keys starting with this prefix are vendor extensions.
    pub extension_prefix: String,
    /// Prepend path-level `parameters` to each operation's own.
    pub inherit_path_parameters: bool,
}

impl Default for CatalogOptions {
    fn default() -> Self {
        Self {
            extension_prefix: EXTENSION_PREFIX.to_string(),
            inherit_path_parameters: false,
        }
    }
}

/// Collect the vendor-extension fields of a path item.
pub fn extract_extensions(path_item: &Map<String, Value>, prefix: &str) -> Map<String, Value> {
    path_item
        .iter()
        .filter(|(k, _)| k.starts_with(prefix))
        .map(|(k, v)| (k.clone(), v.clone()))
        .collect()
}

/// Build the descriptor of every (path, method) pair in the document.
pub fn get_all_operations(document: &Value) -> Result<Vec<Operation>, ResolveError> {
    get_all_operations_with_options(document, &CatalogOptions::default())
}

/// Like [`get_all_operations`], with explicit options.
///
/// Paths come in document order, and methods in the order the path item
/// declares them.
pub fn get_all_operations_with_options(
    document: &Value,
    options: &CatalogOptions,
) -> Result<Vec<Operation>, ResolveError> {
    let mut operations = Vec::new();

    let Some(paths) = document.get("paths").and_then(Value::as_object) else {
        return Ok(operations);
    };

    for (path, path_item) in paths {
        let Some(item) = path_item.as_object() else {
            log::warn!("path item for '{path}' is not an object, skipping");
            continue;
        };
        let extensions = extract_extensions(item, &options.extension_prefix);

        for key in item.keys() {
            if let Some(method) = HttpMethod::from_key(key) {
                let op = create_path_operation_with_options(
                    method,
                    path,
                    path_item,
                    &extensions,
                    document,
                    options,
                )?;
                operations.push(op);
            }
        }
    }

    Ok(operations)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_paths() {
        assert!(get_all_operations(&json!({"swagger": "2.0"})).unwrap().is_empty());
    }

    #[test]
    fn test_methods_in_source_order() {
        let doc = json!({"paths": {
            "/b": {"post": {}, "get": {}, "parameters": [], "x-tag": "b"},
            "/a": {"delete": {}, "GET": {}, "trace": {}}
        }});
        let ops = get_all_operations(&doc).unwrap();
        let pairs: Vec<(String, HttpMethod)> =
            ops.iter().map(|op| (op.path.clone(), op.method)).collect();
        assert_eq!(
            pairs,
            [
                ("/b".to_string(), HttpMethod::Post),
                ("/b".to_string(), HttpMethod::Get),
                ("/a".to_string(), HttpMethod::Delete),
            ]
        );
    }

    #[test]
    fn test_path_extensions_inherited() {
        let doc = json!({"paths": {
            "/pets": {
                "x-controller": "pets",
                "x-auth": "none",
                "get": {"x-auth": "token"},
                "put": {}
            }
        }});
        let ops = get_all_operations(&doc).unwrap();
        assert_eq!(ops.len(), 2);
        for op in &ops {
            assert_eq!(op.extensions["x-controller"], "pets");
        }
        assert_eq!(ops[0].to_value()["x-auth"], "token");
        assert_eq!(ops[1].to_value()["x-auth"], "none");
    }

    #[test]
    fn test_custom_extension_prefix() {
        let doc = json!({"paths": {"/pets": {"x-a": 1, "ext-b": 2, "get": {}}}});
        let options = CatalogOptions {
            extension_prefix: "ext-".into(),
            ..Default::default()
        };
        let ops = get_all_operations_with_options(&doc, &options).unwrap();
        assert!(ops[0].extensions.contains_key("ext-b"));
        assert!(!ops[0].extensions.contains_key("x-a"));
    }

    #[test]
    fn test_non_object_path_item_skipped() {
        let doc = json!({"paths": {"/broken": "nope", "/ok": {"get": {}}}});
        let ops = get_all_operations(&doc).unwrap();
        assert_eq!(ops.len(), 1);
        assert_eq!(ops[0].path, "/ok");
    }

    #[test]
    fn test_error_aborts_whole_catalog() {
        let doc = json!({"paths": {
            "/ok": {"get": {}},
            "/bad": {"get": {"responses": {"200": {"$ref": "#/responses/Nope"}}}}
        }});
        assert_eq!(
            get_all_operations(&doc).unwrap_err(),
            ResolveError::InvalidReference("#/responses/Nope".into())
        );
    }
}
