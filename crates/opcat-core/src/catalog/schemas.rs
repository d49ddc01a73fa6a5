use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::types::{ObjectSchema, ParameterLocation, ResponseSchema};

fn is_required(node: &Value) -> bool {
    node.get("required").and_then(Value::as_bool).unwrap_or(false)
}

/// Group parameters by location into one object schema per location.
///
/// Each property is a shallow copy of the parameter keyed by its name.
/// Locations without parameters are left out.
pub fn create_param_group_schemas(
    parameters: &[Value],
) -> IndexMap<ParameterLocation, ObjectSchema> {
    let mut groups = IndexMap::new();

    for location in ParameterLocation::ALL {
        let mut properties = Map::new();
        let mut required: Vec<String> = Vec::new();

        for param in parameters {
            if param.get("in").and_then(Value::as_str) != Some(location.as_str()) {
                continue;
            }
            let Some(name) = param.get("name").and_then(Value::as_str) else {
                log::warn!("skipping unnamed {location} parameter");
                continue;
            };
            properties.insert(name.to_string(), param.clone());
            if is_required(param) && !required.iter().any(|r| r == name) {
                required.push(name.to_string());
            }
        }

        if !properties.is_empty() {
            groups.insert(location, ObjectSchema::new(properties, required));
        }
    }

    groups
}

/// Build `{bodySchema, headersSchema}` for every declared response.
pub fn create_response_schemas(responses: &Map<String, Value>) -> IndexMap<String, ResponseSchema> {
    responses
        .iter()
        .map(|(status, response)| {
            let body_schema = response.get("schema").cloned();
            let headers_schema = response
                .get("headers")
                .and_then(Value::as_object)
                .map(|headers| {
                    let required = headers
                        .iter()
                        .filter(|(_, header)| is_required(header))
                        .map(|(name, _)| name.clone())
                        .collect();
                    ObjectSchema::new(headers.clone(), required)
                });
            (
                status.clone(),
                ResponseSchema {
                    body_schema,
                    headers_schema,
                },
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_groups_only_present_locations() {
        let params = vec![
            json!({"name": "id", "in": "path", "required": true, "type": "string"}),
            json!({"name": "q", "in": "query", "type": "string"}),
        ];
        let groups = create_param_group_schemas(&params);
        let keys: Vec<ParameterLocation> = groups.keys().copied().collect();
        assert_eq!(keys, [ParameterLocation::Path, ParameterLocation::Query]);

        let path = &groups[&ParameterLocation::Path];
        assert_eq!(path.schema_type, "object");
        assert_eq!(path.required, ["id"]);
        assert_eq!(path.properties["id"], params[0]);

        let query = &groups[&ParameterLocation::Query];
        assert!(query.required.is_empty());
        assert_eq!(
            json!(query),
            json!({
                "type": "object",
                "properties": {"q": {"name": "q", "in": "query", "type": "string"}},
                "required": []
            })
        );
    }

    #[test]
    fn test_unknown_and_unnamed_parameters_dropped() {
        let params = vec![
            json!({"name": "session", "in": "cookie"}),
            json!({"in": "header", "required": true}),
            json!({"name": "file", "in": "formData", "type": "file", "required": true}),
        ];
        let groups = create_param_group_schemas(&params);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[&ParameterLocation::FormData].required, ["file"]);
    }

    #[test]
    fn test_required_is_subset_of_properties() {
        let params = vec![
            json!({"name": "a", "in": "header", "required": true}),
            json!({"name": "a", "in": "header", "required": true}),
            json!({"name": "b", "in": "header", "required": "yes"}),
        ];
        let groups = create_param_group_schemas(&params);
        let header = &groups[&ParameterLocation::Header];
        assert_eq!(header.required, ["a"]);
        for name in &header.required {
            assert!(header.properties.contains_key(name));
        }
    }

    #[test]
    fn test_no_parameters() {
        assert!(create_param_group_schemas(&[]).is_empty());
    }

    #[test]
    fn test_response_headers_without_body() {
        let responses = json!({"200": {"headers": {"X-Rate": {"required": true}}}});
        let schemas = create_response_schemas(responses.as_object().unwrap());
        assert_eq!(
            json!(schemas["200"]),
            json!({
                "headersSchema": {
                    "type": "object",
                    "properties": {"X-Rate": {"required": true}},
                    "required": ["X-Rate"]
                }
            })
        );
        assert!(schemas["200"].body_schema.is_none());
    }

    #[test]
    fn test_response_body_without_headers() {
        let responses = json!({
            "200": {"description": "ok", "schema": {"type": "array"}},
            "default": {"description": "error"}
        });
        let schemas = create_response_schemas(responses.as_object().unwrap());
        let keys: Vec<&String> = schemas.keys().collect();
        assert_eq!(keys, ["200", "default"]);
        assert_eq!(schemas["200"].body_schema, Some(json!({"type": "array"})));
        assert!(schemas["200"].headers_schema.is_none());
        assert!(schemas["default"].body_schema.is_none());
    }
}
