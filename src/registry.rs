//! Ordered, first-wins registries.
//!
//! Compiled artifacts are keyed by operationId or resource name. A key may be
//! registered once; later registrations are rejected with a
//! [`RegistrationConflict`] and the earlier entry is retained.

use crate::error::RegistrationConflict;
use crate::spec::OrderedMap;
use serde::Serialize;

/// Insertion-ordered map that refuses to overwrite entries
#[derive(Debug, Clone, PartialEq)]
pub struct Registry<T> {
    kind: &'static str,
    entries: OrderedMap<T>,
}

impl<T> Registry<T> {
    /// Create an empty registry; `kind` names it in conflict reports
    pub fn new(kind: &'static str) -> Self {
        Registry {
            kind,
            entries: OrderedMap::new(),
        }
    }

    /// Register `value` under `key`
    ///
    /// # Errors
    ///
    /// Returns a [`RegistrationConflict`] when `key` is already present. The
    /// registry is left unchanged.
    pub fn register(&mut self, key: impl Into<String>, value: T) -> Result<(), RegistrationConflict> {
        let key = key.into();
        if self.entries.contains_key(&key) {
            return Err(RegistrationConflict {
                registry: self.kind.to_string(),
                key,
            });
        }
        self.entries.insert(key, value);
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<&T> {
        self.entries.get(key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }
}

impl<T: Serialize> Serialize for Registry<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.entries.serialize(serializer)
    }
}
