//! Resource types of the KiCad HTTP library API

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize};

/// Links returned by the API root
#[derive(Debug, Clone, Serialize)]
pub struct RootLinks {
    pub categories: String,
    pub parts: String,
}

/// A part category, e.g. `CAP` / Capacitors
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// One entry of a category's part list
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartSummary {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub description: String,
}

/// A single field shown on the KiCad symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartField {
    pub value: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<String>,
}

/// Part fields keyed by column name, in source column order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMap(Vec<(String, PartField)>);

impl FieldMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a field, keeping the position of an existing key
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let field = PartField {
            value: value.into(),
            visible: None,
        };
        match self.0.iter_mut().find(|(k, _)| *k == key) {
            Some((_, existing)) => *existing = field,
            None => self.0.push((key, field)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, f)| f.value.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(|(k, _)| k.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PartField)> {
        self.0.iter().map(|(k, f)| (k.as_str(), f))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for FieldMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, field) in &self.0 {
            map.serialize_entry(key, field)?;
        }
        map.end()
    }
}

/// Full part record as consumed by the KiCad symbol chooser
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PartDetail {
    pub id: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(rename = "symbolIdStr", skip_serializing_if = "String::is_empty")]
    pub symbol_id_str: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub exclude_from_bom: String,
    #[serde(skip_serializing_if = "FieldMap::is_empty")]
    pub fields: FieldMap,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub revision: String,
}

/// A manufacturer / manufacturer part number pair
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceUpdate {
    #[serde(default)]
    pub manufacturer: String,
    #[serde(default)]
    pub mpn: String,
}

/// Editable fields of a part
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartUpdate {
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub sources: Vec<SourceUpdate>,
}

/// Column names for the source at `index`: `Manufacturer`/`MPN`, then
/// `Manufacturer2`/`MPN2`, `Manufacturer3`/`MPN3`, ...
pub fn source_columns(index: usize) -> (String, String) {
    if index == 0 {
        ("Manufacturer".to_string(), "MPN".to_string())
    } else {
        let n = index + 1;
        (format!("Manufacturer{}", n), format!("MPN{}", n))
    }
}
