//! Canonical naming rules shared by every compiler stage.
//!
//! Table names, junction tables, route resources and router/service names all
//! derive from these functions. Keeping one implementation is what lets
//! [`crate::assembly::Artifacts::table_for_resource`] line a route group up with
//! the table of the same entity.

/// Prefix of a local component schema reference
pub const SCHEMA_REF_PREFIX: &str = "#/components/schemas/";

/// Convert an identifier to snake_case
///
/// Word boundaries are a lowercase letter or digit followed by an uppercase
/// letter, whitespace, and `-`. Everything is lowercased.
///
/// ```
/// use foundry::naming::to_snake_case;
/// assert_eq!(to_snake_case("OrderLine"), "order_line");
/// assert_eq!(to_snake_case("order-lines"), "order_lines");
/// ```
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut prev: Option<char> = None;
    for c in s.chars() {
        if c.is_whitespace() || c == '-' {
            out.push('_');
        } else if c.is_uppercase() {
            if matches!(prev, Some(p) if p.is_lowercase() || p.is_ascii_digit()) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
        prev = Some(c);
    }
    out
}

/// Convert a snake_case (or already camelCase) identifier to lowerCamelCase
pub fn to_camel_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut capitalize_next = false;
    for c in to_snake_case(s).chars() {
        if c == '_' {
            capitalize_next = !out.is_empty();
        } else if capitalize_next {
            out.extend(c.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Convert an identifier to PascalCase
pub fn to_pascal_case(s: &str) -> String {
    let camel = to_camel_case(s);
    let mut chars = camel.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

/// The schema name a `$ref` points at
///
/// Only the last path segment is read; the referenced schema is never
/// followed, so cyclic references are harmless.
pub fn ref_name(ref_path: &str) -> &str {
    ref_path
        .strip_prefix(SCHEMA_REF_PREFIX)
        .unwrap_or_else(|| ref_path.rsplit('/').next().unwrap_or(ref_path))
}

/// Table name for a component schema name
pub fn table_name(schema_name: &str) -> String {
    to_snake_case(schema_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("Order"), "order");
        assert_eq!(to_snake_case("OrderLine"), "order_line");
        assert_eq!(to_snake_case("orderLine"), "order_line");
        assert_eq!(to_snake_case("order_line"), "order_line");
        assert_eq!(to_snake_case("Order Line"), "order_line");
        assert_eq!(to_snake_case("v2Items"), "v2_items");
        assert_eq!(to_snake_case("widgets"), "widgets");
    }

    #[test]
    fn test_camel_and_pascal_case() {
        assert_eq!(to_camel_case("order_lines"), "orderLines");
        assert_eq!(to_camel_case("widgets"), "widgets");
        assert_eq!(to_camel_case("_private"), "private");
        assert_eq!(to_pascal_case("order_lines"), "OrderLines");
        assert_eq!(to_pascal_case("widgets"), "Widgets");
        assert_eq!(to_pascal_case(""), "");
    }

    #[test]
    fn test_ref_name() {
        assert_eq!(ref_name("#/components/schemas/OrderLine"), "OrderLine");
        assert_eq!(ref_name("other.yaml#/defs/Thing"), "Thing");
        assert_eq!(ref_name("Plain"), "Plain");
    }
}
