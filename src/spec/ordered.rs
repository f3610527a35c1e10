use indexmap::IndexMap;

/// A string-keyed map that remembers declaration order
///
/// Component schemas, paths and responses are iterated in the order the
/// document declares them. Deserialising straight from YAML or from a
/// `serde_json::Value` built with `preserve_order` keeps that order.
/// Re-inserting an existing key replaces its value in place.
pub type OrderedMap<V> = IndexMap<String, V>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_yaml_declaration_order_survives() {
        let yaml = "zeta: 1\nalpha: 2\nmid: 3\n";
        let map: OrderedMap<u32> = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["zeta", "alpha", "mid"]);
        assert_eq!(map.get("alpha"), Some(&2));
    }

    #[test]
    fn test_json_value_order_survives() {
        let value: serde_json::Value =
            serde_json::from_str(r#"{"b": true, "a": false}"#).unwrap();
        let map: OrderedMap<bool> = serde_json::from_value(value).unwrap();
        let (key, value) = map.first().unwrap();
        assert_eq!(key, "b");
        assert!(*value);
    }

    #[test]
    fn test_insert_replaces_in_place() {
        let mut map = OrderedMap::new();
        map.insert("a".to_string(), 1);
        map.insert("b".to_string(), 2);
        map.insert("a".to_string(), 3);
        assert_eq!(map.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(serde_json::to_string(&map).unwrap(), r#"{"a":3,"b":2}"#);
    }

    #[test]
    fn test_large_maps_deserialize_in_order() {
        let yaml: String = (0..20_000).map(|i| format!("k{i}: {i}\n")).collect();
        let map: OrderedMap<u32> = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(map.len(), 20_000);
        assert_eq!(map.get_index(19_999).map(|(k, _)| k.as_str()), Some("k19999"));
        assert_eq!(map.get("k1234"), Some(&1234));
    }
}
