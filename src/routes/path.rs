use crate::naming::to_snake_case;
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use serde::Deserialize;

/// `{name}` parameter token in an OpenAPI URL template
#[allow(clippy::expect_used)]
static PARAM_TOKEN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^}]+)\}").expect("path parameter regex should be valid"));

/// Resource name for templates without a static segment
pub const ROOT_RESOURCE: &str = "root";

/// Parameter syntax of the target router
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouterSyntax {
    /// `/widgets/:id`
    #[default]
    Colon,
    /// `/widgets/{id}`
    Brace,
    /// `/widgets/<id>`
    Angle,
}

impl RouterSyntax {
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "colon" | "express" => Some(RouterSyntax::Colon),
            "brace" | "openapi" => Some(RouterSyntax::Brace),
            "angle" => Some(RouterSyntax::Angle),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouterSyntax::Colon => "colon",
            RouterSyntax::Brace => "brace",
            RouterSyntax::Angle => "angle",
        }
    }

    fn param(&self, name: &str) -> String {
        match self {
            RouterSyntax::Colon => format!(":{name}"),
            RouterSyntax::Brace => format!("{{{name}}}"),
            RouterSyntax::Angle => format!("<{name}>"),
        }
    }
}

/// Rewrite every `{x}` token for `syntax`; all other characters are kept
///
/// ```
/// use foundry::routes::{translate_path, RouterSyntax};
///
/// assert_eq!(translate_path("/widgets/{id}", RouterSyntax::Colon), "/widgets/:id");
/// assert_eq!(translate_path("/widgets/{id}", RouterSyntax::Angle), "/widgets/<id>");
/// ```
pub fn translate_path(template: &str, syntax: RouterSyntax) -> String {
    PARAM_TOKEN
        .replace_all(template, |caps: &Captures<'_>| syntax.param(&caps[1]))
        .into_owned()
}

/// Parameter names in template order
pub fn path_params(template: &str) -> Vec<String> {
    PARAM_TOKEN
        .captures_iter(template)
        .map(|caps| caps[1].to_string())
        .collect()
}

/// Snake-case name of the first segment that is not a `{param}`
pub fn resource_for_path(template: &str) -> String {
    template
        .split('/')
        .find(|segment| !segment.is_empty() && !segment.starts_with('{'))
        .map(to_snake_case)
        .unwrap_or_else(|| ROOT_RESOURCE.to_string())
}
