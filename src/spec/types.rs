use super::ordered::OrderedMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Root of a loaded API description
///
/// Only the parts the compilers read are typed; everything else is ignored.
/// Immutable for the length of a compilation run.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Specification {
    #[serde(default)]
    pub openapi: Option<String>,
    #[serde(default)]
    pub info: Option<Info>,
    /// URL template → raw PathItem object, in declaration order
    #[serde(default)]
    pub paths: Option<OrderedMap<Value>>,
    #[serde(default)]
    pub components: Option<Components>,
    /// Document-wide security requirements
    #[serde(default)]
    pub security: Option<Vec<SecurityRequirement>>,
}

impl Specification {
    /// Named component schemas, if the document declares any
    pub fn schemas(&self) -> Option<&OrderedMap<SchemaDefinition>> {
        self.components.as_ref()?.schemas.as_ref()
    }

    pub fn security_schemes(&self) -> Option<&OrderedMap<SecurityScheme>> {
        self.components.as_ref().map(|c| &c.security_schemes)
    }

    /// Slug derived from `info.title`, used for file names and logging
    pub fn slug(&self) -> String {
        let title = self.info.as_ref().map(|i| i.title.as_str()).unwrap_or("api");
        let slug = title
            .to_lowercase()
            .replace(|c: char| !c.is_ascii_alphanumeric(), "_")
            .trim_matches('_')
            .to_string();
        if slug.is_empty() {
            "api".to_string()
        } else {
            slug
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Info {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub summary: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Components {
    #[serde(default)]
    pub schemas: Option<OrderedMap<SchemaDefinition>>,
    #[serde(default)]
    pub parameters: OrderedMap<Value>,
    #[serde(default, rename = "requestBodies")]
    pub request_bodies: OrderedMap<Value>,
    #[serde(default)]
    pub responses: OrderedMap<Value>,
    #[serde(default)]
    pub examples: OrderedMap<Value>,
    #[serde(default, rename = "securitySchemes")]
    pub security_schemes: OrderedMap<SecurityScheme>,
}

/// One requirement group: scheme name → scopes (oauth2) or roles (apiKey)
pub type SecurityRequirement = OrderedMap<Vec<String>>;

/// A declared security scheme
///
/// The compiler never enforces a scheme; it only forwards the kind so the
/// runtime auth registry knows whether requirement entries are scopes or roles.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SecurityScheme {
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scheme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// `type` may be a single name or, in OpenAPI 3.1, a list such as `[string, "null"]`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum TypeDecl {
    Single(String),
    Multiple(Vec<String>),
}

impl TypeDecl {
    /// The first non-`null` type name
    pub fn primary(&self) -> Option<&str> {
        match self {
            TypeDecl::Single(t) => Some(t.as_str()),
            TypeDecl::Multiple(ts) => ts.iter().map(String::as_str).find(|t| *t != "null"),
        }
    }
}

/// Property-level `required: true`, or an object's list of required names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Required {
    Flag(bool),
    Names(Vec<String>),
}

/// A JSON-Schema-like node from `components.schemas`
///
/// `$ref` targets are never followed; compilers read only the referenced name.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SchemaDefinition {
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub schema_type: Option<TypeDecl>,
    #[serde(default, skip_serializing_if = "OrderedMap::is_empty")]
    pub properties: OrderedMap<SchemaDefinition>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub items: Option<Box<SchemaDefinition>>,
    #[serde(default, rename = "$ref", skip_serializing_if = "Option::is_none")]
    pub reference: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    #[serde(default, rename = "enum", skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub required: Option<Required>,
    #[serde(default, rename = "x-junction", skip_serializing_if = "Option::is_none")]
    pub x_junction: Option<bool>,
}

impl SchemaDefinition {
    pub fn json_type(&self) -> Option<&str> {
        self.schema_type.as_ref().and_then(TypeDecl::primary)
    }

    pub fn is_object(&self) -> bool {
        self.json_type() == Some("object")
    }

    /// Target of an array-of-`$ref` property, if this is one
    pub fn array_item_ref(&self) -> Option<&str> {
        if self.json_type() != Some("array") {
            return None;
        }
        self.items.as_ref()?.reference.as_deref()
    }

    /// Whether the named child property is required
    ///
    /// Honours both the child's own `required: true` and this object's
    /// `required: [..]` list.
    pub fn property_required(&self, name: &str, property: &SchemaDefinition) -> bool {
        let listed = matches!(&self.required, Some(Required::Names(names)) if names.iter().any(|n| n == name));
        listed || matches!(property.required, Some(Required::Flag(true)))
    }
}

/// HTTP methods the extractor turns into operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub const ALL: [HttpMethod; 5] = [
        HttpMethod::Get,
        HttpMethod::Post,
        HttpMethod::Put,
        HttpMethod::Delete,
        HttpMethod::Patch,
    ];

    /// Parse a PathItem key; anything outside the allow-list is `None`
    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|m| m.as_str() == key)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "get",
            HttpMethod::Post => "post",
            HttpMethod::Put => "put",
            HttpMethod::Delete => "delete",
            HttpMethod::Patch => "patch",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ParameterLocation {
    Path,
    Query,
    Header,
    Cookie,
}

impl ParameterLocation {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "path" => Some(ParameterLocation::Path),
            "query" => Some(ParameterLocation::Query),
            "header" => Some(ParameterLocation::Header),
            "cookie" => Some(ParameterLocation::Cookie),
            _ => None,
        }
    }
}

impl fmt::Display for ParameterLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterLocation::Path => write!(f, "path"),
            ParameterLocation::Query => write!(f, "query"),
            ParameterLocation::Header => write!(f, "header"),
            ParameterLocation::Cookie => write!(f, "cookie"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub location: ParameterLocation,
    pub required: bool,
    /// Declared schema, verbatim
    pub schema: Option<Value>,
}

/// Name of a user-supplied middleware, resolved by the runtime registry
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MiddlewareRef {
    pub name: String,
}

impl MiddlewareRef {
    pub fn new(name: impl Into<String>) -> Self {
        MiddlewareRef { name: name.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RequestBody {
    pub required: bool,
    /// `content["application/json"].schema`, verbatim
    pub json_schema: Option<Value>,
}

/// One HTTP method on a PathItem
#[derive(Debug, Clone, PartialEq)]
pub struct Operation {
    pub method: HttpMethod,
    pub operation_id: String,
    pub parameters: Vec<Parameter>,
    pub request_body: Option<RequestBody>,
    /// Status code → response object with `$ref`s already resolved
    pub responses: OrderedMap<Value>,
    /// Effective requirements (operation-level, else document-level)
    pub security: Vec<SecurityRequirement>,
    /// Operation-level `x-service` hint
    pub service: Option<String>,
    /// Operation-level `x-middleware`, appended after the PathItem's
    pub middleware: Vec<MiddlewareRef>,
}

/// A URL template and the operations declared on it
#[derive(Debug, Clone, PartialEq)]
pub struct PathItem {
    pub path: String,
    pub service: Option<String>,
    pub middleware: Vec<MiddlewareRef>,
    pub operations: Vec<Operation>,
}

/// Normalised route/operation model shared by every compiler stage
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SpecModel {
    pub path_items: Vec<PathItem>,
}

impl SpecModel {
    /// Every operation with its PathItem, in source order
    pub fn operations(&self) -> impl Iterator<Item = (&PathItem, &Operation)> {
        self.path_items
            .iter()
            .flat_map(|item| item.operations.iter().map(move |op| (item, op)))
    }

    pub fn operation(&self, operation_id: &str) -> Option<&Operation> {
        self.operations()
            .map(|(_, op)| op)
            .find(|op| op.operation_id == operation_id)
    }
}
