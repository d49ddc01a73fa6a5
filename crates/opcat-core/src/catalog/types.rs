use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value, json};

/// HTTP method a path item may declare an operation under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Put,
    Post,
    Delete,
    Options,
    Head,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 7] = [
        HttpMethod::Get,
        HttpMethod::Put,
        HttpMethod::Post,
        HttpMethod::Delete,
        HttpMethod::Options,
        HttpMethod::Head,
        HttpMethod::Patch,
    ];

    /// Path item key for this method.
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Put => "put",
            HttpMethod::Post => "post",
            HttpMethod::Delete => "delete",
            HttpMethod::Options => "options",
            HttpMethod::Head => "head",
            HttpMethod::Patch => "patch",
        }
    }

    /// Match a path item key. Only lower-case names are methods.
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where a request parameter is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ParameterLocation {
    #[serde(rename = "header")]
    Header,
    #[serde(rename = "path")]
    Path,
    #[serde(rename = "query")]
    Query,
    #[serde(rename = "body")]
    Body,
    #[serde(rename = "formData")]
    FormData,
}

impl ParameterLocation {
    pub const ALL: [ParameterLocation; 5] = [
        ParameterLocation::Header,
        ParameterLocation::Path,
        ParameterLocation::Query,
        ParameterLocation::Body,
        ParameterLocation::FormData,
    ];

    /// Value of the parameter's `in` field.
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterLocation::Header => "header",
            ParameterLocation::Path => "path",
            ParameterLocation::Query => "query",
            ParameterLocation::Body => "body",
            ParameterLocation::FormData => "formData",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|l| l.as_str() == key)
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A generated `{type: object, properties, required}` schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ObjectSchema {
    #[serde(rename = "type")]
    pub schema_type: String,
    pub properties: Map<String, Value>,
    pub required: Vec<String>,
}

impl ObjectSchema {
    pub fn new(properties: Map<String, Value>, required: Vec<String>) -> Self {
        Self {
            schema_type: "object".to_string(),
            properties,
            required,
        }
    }
}

/// Body and header schemas of one declared response.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseSchema {
    #[serde(rename = "bodySchema", skip_serializing_if = "Option::is_none")]
    pub body_schema: Option<Value>,

    #[serde(rename = "headersSchema", skip_serializing_if = "Option::is_none")]
    pub headers_schema: Option<ObjectSchema>,
}

/// The normalized, self-contained record for one (path, method) pair.
///
/// Serializes to a single object: path-level vendor extensions first, then
/// the computed fields, then the operation's own fields. Later keys win.
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub id: Option<String>,
    pub method: HttpMethod,
    /// Path template as declared.
    pub path: String,
    /// Base path and template joined and normalized.
    pub full_path: String,
    pub consumes: Option<Vec<String>>,
    pub produces: Option<Vec<String>>,
    pub param_group_schemas: IndexMap<ParameterLocation, ObjectSchema>,
    pub response_schemas: IndexMap<String, ResponseSchema>,
    /// Vendor extensions inherited from the path item.
    pub extensions: Map<String, Value>,
    /// Resolved operation fields, without `operationId`.
    pub fields: Map<String, Value>,
}

impl Operation {
    /// Resolved parameter list (defaulted to empty).
    pub fn parameters(&self) -> &[Value] {
        self.fields
            .get("parameters")
            .and_then(|v| v.as_array())
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Resolved responses map (defaulted to empty).
    pub fn responses(&self) -> Option<&Map<String, Value>> {
        self.fields.get("responses").and_then(|v| v.as_object())
    }

    /// Look a key up with the same precedence the serialized form uses.
    pub fn get(&self, key: &str) -> Option<Value> {
        if let Some(value) = self.fields.get(key) {
            return Some(value.clone());
        }
        if let Some(value) = self.computed_fields().get(key).filter(|v| !v.is_null()) {
            return Some(value.clone());
        }
        self.extensions.get(key).cloned()
    }

    fn computed_fields(&self) -> Map<String, Value> {
        let mut computed = Map::new();
        computed.insert("id".into(), json!(self.id));
        computed.insert("path".into(), json!(self.path));
        computed.insert("fullPath".into(), json!(self.full_path));
        computed.insert("consumes".into(), json!(self.consumes));
        computed.insert("produces".into(), json!(self.produces));
        computed.insert("paramGroupSchemas".into(), json!(self.param_group_schemas));
        computed.insert("responseSchemas".into(), json!(self.response_schemas));
        computed.insert("method".into(), json!(self.method));
        computed
    }

    /// The descriptor as one JSON object.
    pub fn to_value(&self) -> Value {
        let mut merged = self.extensions.clone();
        for (key, value) in self.computed_fields() {
            // Absent id/consumes/produces stay absent.
            if value.is_null() {
                continue;
            }
            merged.insert(key, value);
        }
        for (key, value) in &self.fields {
            merged.insert(key.clone(), value.clone());
        }
        Value::Object(merged)
    }
}

impl Serialize for Operation {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}
