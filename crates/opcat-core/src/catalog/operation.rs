use serde_json::{Map, Value};

use crate::error::ResolveError;
use crate::resolve::RefResolver;

use super::CatalogOptions;
use super::schemas::{create_param_group_schemas, create_response_schemas};
use super::types::{HttpMethod, Operation};

/// Assemble the descriptor for one method of a path item, with default options.
pub fn create_path_operation(
    method: HttpMethod,
    path: &str,
    path_item: &Value,
    path_extensions: &Map<String, Value>,
    document: &Value,
) -> Result<Operation, ResolveError> {
    create_path_operation_with_options(
        method,
        path,
        path_item,
        path_extensions,
        document,
        &CatalogOptions::default(),
    )
}

/// Assemble the descriptor for one method of a path item.
///
/// Only the operation node (and, when inheriting, the path-level parameter
/// list) is resolved, never the whole document.
pub fn create_path_operation_with_options(
    method: HttpMethod,
    path: &str,
    path_item: &Value,
    path_extensions: &Map<String, Value>,
    document: &Value,
    options: &CatalogOptions,
) -> Result<Operation, ResolveError> {
    let mut resolver = RefResolver::new(document);

    let resolved = match path_item.get(method.as_str()) {
        Some(node) => resolver.resolve(node)?,
        None => Value::Null,
    };
    let mut fields = match resolved {
        Value::Object(fields) => fields,
        Value::Null => Map::new(),
        other => {
            log::warn!("{method} {path}: operation is not an object ({other}), ignoring it");
            Map::new()
        }
    };

    if !fields.get("parameters").is_some_and(Value::is_array) {
        fields.insert("parameters".into(), Value::Array(Vec::new()));
    }
    if !fields.get("responses").is_some_and(Value::is_object) {
        fields.insert("responses".into(), Value::Object(Map::new()));
    }

    if options.inherit_path_parameters {
        if let Some(shared) = path_item.get("parameters") {
            let inherited = match resolver.resolve(shared)? {
                Value::Array(params) => params,
                _ => Vec::new(),
            };
            if let Some(Value::Array(own)) = fields.get_mut("parameters") {
                *own = merge_parameters(inherited, std::mem::take(own));
            }
        }
    }

    let id = match fields.get("operationId") {
        Some(Value::String(id)) => Some(id.clone()),
        Some(scalar @ (Value::Number(_) | Value::Bool(_))) => Some(scalar.to_string()),
        Some(Value::Null) | None => None,
        Some(other) => {
            log::warn!("{method} {path}: ignoring non-scalar operationId {other}");
            None
        }
    };
    fields.retain(|key, _| key != "operationId");

    let base_path = base_path(document);
    let full_path = normalize_path(&format!("/{base_path}/{path}"));

    let consumes = media_types(&fields, document, "consumes");
    let produces = media_types(&fields, document, "produces");
    // The derived lists replace whatever the node declared.
    fields.retain(|key, _| key != "consumes" && key != "produces");

    let param_group_schemas = match fields.get("parameters") {
        Some(Value::Array(params)) => create_param_group_schemas(params),
        _ => Default::default(),
    };
    let response_schemas = match fields.get("responses") {
        Some(Value::Object(responses)) => create_response_schemas(responses),
        _ => Default::default(),
    };

    log::debug!(
        "assembled {method} {full_path} ({} parameter groups, {} responses)",
        param_group_schemas.len(),
        response_schemas.len()
    );

    Ok(Operation {
        id,
        method,
        path: path.to_string(),
        full_path,
        consumes,
        produces,
        param_group_schemas,
        response_schemas,
        extensions: path_extensions.clone(),
        fields,
    })
}

/// The document's `basePath` as a string.
///
/// Non-empty strings are kept, non-zero numbers and `true` are stringified,
/// anything else is `/`.
pub fn base_path(document: &Value) -> String {
    match document.get("basePath") {
        Some(Value::String(s)) if !s.is_empty() => s.clone(),
        Some(Value::Number(n)) if n.as_f64() != Some(0.0) => n.to_string(),
        Some(Value::Bool(true)) => "true".to_string(),
        _ => "/".to_string(),
    }
}

/// Path-level parameters first; an operation parameter with the same
/// `name` and `in` replaces the inherited one.
fn merge_parameters(inherited: Vec<Value>, own: Vec<Value>) -> Vec<Value> {
    let key = |p: &Value| {
        (
            p.get("name").and_then(Value::as_str).map(str::to_owned),
            p.get("in").and_then(Value::as_str).map(str::to_owned),
        )
    };
    let mut merged: Vec<Value> = inherited
        .into_iter()
        .filter(|p| !own.iter().any(|o| key(o) == key(p)))
        .collect();
    merged.extend(own);
    merged
}

/// Operation-level list when present and non-empty, else the document's.
fn media_types(fields: &Map<String, Value>, document: &Value, key: &str) -> Option<Vec<String>> {
    let as_list = |v: &Value| -> Option<Vec<String>> {
        v.as_array().map(|items| {
            items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_owned))
                .collect()
        })
    };
    fields
        .get(key)
        .and_then(as_list)
        .filter(|types| !types.is_empty())
        .or_else(|| document.get(key).and_then(as_list))
}

/// POSIX-style normalization: collapse slashes, drop `.`, pop on `..`.
/// A trailing slash survives.
pub fn normalize_path(path: &str) -> String {
    let mut segments: Vec<&str> = Vec::new();
    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            s => segments.push(s),
        }
    }

    let mut normalized = format!("/{}", segments.join("/"));
    if path.ends_with('/') && !segments.is_empty() {
        normalized.push('/');
    }
    normalized
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path("//api//users/{id}"), "/api/users/{id}");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("/api/./v1/../users"), "/api/users");
        assert_eq!(normalize_path("/../../x"), "/x");
        assert_eq!(normalize_path("/api/users/"), "/api/users/");
    }

    #[test]
    fn test_full_path_joins_base_path() {
        let doc = json!({
            "basePath": "/api",
            "paths": {"/users/{id}": {"get": {}}}
        });
        let op = create_path_operation(
            HttpMethod::Get,
            "/users/{id}",
            &doc["paths"]["/users/{id}"],
            &Map::new(),
            &doc,
        )
        .unwrap();
        assert_eq!(op.path, "/users/{id}");
        assert_eq!(op.full_path, "/api/users/{id}");
    }

    #[test]
    fn test_defaults_and_missing_base_path() {
        let doc = json!({"paths": {"/ping": {"head": {"operationId": "ping"}}}});
        let op = create_path_operation(
            HttpMethod::Head,
            "/ping",
            &doc["paths"]["/ping"],
            &Map::new(),
            &doc,
        )
        .unwrap();
        assert_eq!(op.id.as_deref(), Some("ping"));
        assert_eq!(op.full_path, "/ping");
        assert_eq!(op.fields["parameters"], json!([]));
        assert_eq!(op.fields["responses"], json!({}));
        assert!(!op.fields.contains_key("operationId"));
        assert!(op.param_group_schemas.is_empty());
        assert!(op.response_schemas.is_empty());
        assert!(op.consumes.is_none());
    }

    #[test]
    fn test_media_type_inheritance() {
        let doc = json!({
            "consumes": ["application/json"],
            "produces": ["application/json", "application/xml"],
            "paths": {"/upload": {"post": {
                "consumes": ["multipart/form-data"],
                "produces": []
            }}}
        });
        let op = create_path_operation(
            HttpMethod::Post,
            "/upload",
            &doc["paths"]["/upload"],
            &Map::new(),
            &doc,
        )
        .unwrap();
        assert_eq!(op.consumes, Some(vec!["multipart/form-data".to_string()]));
        assert_eq!(
            op.produces,
            Some(vec![
                "application/json".to_string(),
                "application/xml".to_string()
            ])
        );
    }

    #[test]
    fn test_declared_empty_media_types_agree_with_serialized() {
        let doc = json!({
            "consumes": ["application/json"],
            "paths": {"/items": {"post": {"consumes": [], "produces": ["text/plain"]}}}
        });
        let op = create_path_operation(
            HttpMethod::Post,
            "/items",
            &doc["paths"]["/items"],
            &Map::new(),
            &doc,
        )
        .unwrap();
        assert_eq!(op.consumes, Some(vec!["application/json".to_string()]));
        let value = op.to_value();
        assert_eq!(value["consumes"], json!(op.consumes));
        assert_eq!(op.get("consumes"), Some(json!(["application/json"])));
        assert_eq!(value["produces"], json!(["text/plain"]));
        assert!(!op.fields.contains_key("consumes"));
        assert!(!op.fields.contains_key("produces"));
    }

    #[test]
    fn test_operation_id_forms() {
        let doc = json!({"paths": {"/a": {
            "get": {"operationId": null},
            "put": {"operationId": 42},
            "post": {"operationId": {"name": "x"}}
        }}});
        let item = &doc["paths"]["/a"];
        let id = |method| {
            create_path_operation(method, "/a", item, &Map::new(), &doc)
                .unwrap()
                .id
        };
        assert_eq!(id(HttpMethod::Get), None);
        assert_eq!(id(HttpMethod::Put).as_deref(), Some("42"));
        assert_eq!(id(HttpMethod::Post), None);
    }

    #[test]
    fn test_base_path_forms() {
        assert_eq!(base_path(&json!({"basePath": "/api"})), "/api");
        assert_eq!(base_path(&json!({"basePath": 5})), "5");
        assert_eq!(base_path(&json!({"basePath": ""})), "/");
        assert_eq!(base_path(&json!({"basePath": 0})), "/");
        assert_eq!(base_path(&json!({"basePath": ["x"]})), "/");
        assert_eq!(base_path(&json!({})), "/");

        let doc = json!({"basePath": 5, "paths": {"/v": {"get": {}}}});
        let op = create_path_operation(HttpMethod::Get, "/v", &doc["paths"]["/v"], &Map::new(), &doc)
            .unwrap();
        assert_eq!(op.full_path, "/5/v");
    }

    #[test]
    fn test_operation_level_ref_with_override() {
        let doc = json!({
            "x-operations": {
                "list": {"operationId": "listThings", "summary": "List", "tags": ["things"]}
            },
            "paths": {"/things": {"get": {
                "$ref": "#/x-operations/list",
                "summary": "List things"
            }}}
        });
        let op = create_path_operation(
            HttpMethod::Get,
            "/things",
            &doc["paths"]["/things"],
            &Map::new(),
            &doc,
        )
        .unwrap();
        assert_eq!(op.id.as_deref(), Some("listThings"));
        assert_eq!(op.fields["summary"], "List things");
        assert_eq!(op.fields["tags"], json!(["things"]));
        assert!(!op.fields.contains_key("$ref"));
    }

    #[test]
    fn test_inherit_path_parameters() {
        let doc = json!({
            "parameters": {"Tenant": {"name": "tenant", "in": "header", "required": true}},
            "paths": {"/items/{id}": {
                "parameters": [
                    {"$ref": "#/parameters/Tenant"},
                    {"name": "id", "in": "path", "type": "string", "required": true}
                ],
                "get": {"parameters": [
                    {"name": "id", "in": "path", "type": "integer", "required": true}
                ]}
            }}
        });
        let item = &doc["paths"]["/items/{id}"];
        let options = CatalogOptions {
            inherit_path_parameters: true,
            ..Default::default()
        };
        let op = create_path_operation_with_options(
            HttpMethod::Get,
            "/items/{id}",
            item,
            &Map::new(),
            &doc,
            &options,
        )
        .unwrap();
        let params = op.parameters();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0]["name"], "tenant");
        assert_eq!(params[1]["type"], "integer");

        let plain = create_path_operation(HttpMethod::Get, "/items/{id}", item, &Map::new(), &doc)
            .unwrap();
        assert_eq!(plain.parameters().len(), 1);
    }

    #[test]
    fn test_bad_reference_fails_operation() {
        let doc = json!({"paths": {"/x": {"get": {"parameters": [{"$ref": "parameters/X"}]}}}});
        let err = create_path_operation(HttpMethod::Get, "/x", &doc["paths"]["/x"], &Map::new(), &doc)
            .unwrap_err();
        assert_eq!(
            err,
            ResolveError::InvalidReferenceFormat("parameters/X".into())
        );
    }
}
