use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::identity::{CanonicalId, EntityKind};

/// Preferred display names for common ingredients, keyed by page token.
///
/// Loaded once at startup and handed to whatever extracts or aggregates
/// ingredients. Read-only after loading.
#[derive(Debug, Clone, Default)]
pub struct NameLookup {
    names: HashMap<String, String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum LookupValue {
    Entry { name: String },
    Plain(String),
}

impl NameLookup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON object of `token → {"name": …}` (or `token → "name"`).
    ///
    /// # Errors
    ///
    /// Returns the JSON error if the document has another shape.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        let raw: HashMap<String, LookupValue> = serde_json::from_str(json)?;
        let names = raw
            .into_iter()
            .map(|(token, value)| {
                let name = match value {
                    LookupValue::Entry { name } | LookupValue::Plain(name) => name,
                };
                (token, name)
            })
            .collect();
        Ok(Self { names })
    }

    /// Load a lookup table from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Lookup`] if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let lookup_error = |message: String| Error::Lookup {
            path: path.to_owned(),
            message,
        };
        let json = std::fs::read_to_string(path).map_err(|e| lookup_error(e.to_string()))?;
        let lookup = Self::from_json(&json).map_err(|e| lookup_error(e.to_string()))?;
        tracing::debug!("loaded {} preferred names from {}", lookup.len(), path.display());
        Ok(lookup)
    }

    pub fn insert(&mut self, token: impl Into<String>, name: impl Into<String>) {
        self.names.insert(token.into(), name.into());
    }

    /// Preferred name for an ingredient identifier. Products never match.
    pub fn get(&self, id: &CanonicalId) -> Option<&str> {
        if id.kind() != EntityKind::Ingredient {
            return None;
        }
        self.names.get(id.token()).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn ingredient(token: &str) -> CanonicalId {
        CanonicalId::new(EntityKind::Ingredient, token).unwrap()
    }

    #[test]
    fn parses_entry_objects() {
        let lookup = NameLookup::from_json(r#"{"abc123": {"name": "salicylic acid", "count": 4}}"#)
            .unwrap();
        assert_eq!(lookup.get(&ingredient("abc123")), Some("salicylic acid"));
        assert_eq!(lookup.len(), 1);
    }

    #[test]
    fn parses_plain_strings() {
        let lookup = NameLookup::from_json(r#"{"w1": "water"}"#).unwrap();
        assert_eq!(lookup.get(&ingredient("w1")), Some("water"));
    }

    #[test]
    fn products_never_match() {
        let mut lookup = NameLookup::new();
        lookup.insert("abc123", "salicylic acid");
        let product = CanonicalId::new(EntityKind::Product, "abc123").unwrap();
        assert_eq!(lookup.get(&product), None);
    }

    #[test]
    fn rejects_other_shapes() {
        assert!(NameLookup::from_json("[1, 2]").is_err());
    }

    #[test]
    fn load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"g1": {{"name": "glycerin"}}}}"#).unwrap();
        let lookup = NameLookup::load(file.path()).unwrap();
        assert_eq!(lookup.get(&ingredient("g1")), Some("glycerin"));
    }

    #[test]
    fn load_missing_file_is_lookup_error() {
        let err = NameLookup::load(Path::new("/nonexistent/names.json")).unwrap_err();
        assert!(matches!(err, Error::Lookup { .. }));
    }
}
