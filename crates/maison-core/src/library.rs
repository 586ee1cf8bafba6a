//! Curated model library - the authenticated catalog's backing index
//!
//! The library is a TOML file maintained alongside the model assets. Unlike
//! the public directory scan, entries here carry a human name, a curated
//! category, and search tags.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::catalog::ModelDescriptor;

#[derive(Error, Debug)]
pub enum LibraryError {
    #[error("Failed to read library index: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse library index: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Failed to serialize library index: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// A single curated model entry
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    /// Human-readable name (e.g., "Lounge Chair")
    pub name: String,
    /// Asset file name (e.g., "lounge_chair.glb")
    pub filename: String,
    /// Curated category key
    pub category: String,
    /// URL the asset is served from
    pub url: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Extra search keywords
    #[serde(default)]
    pub tags: Vec<String>,
    /// Date the model was added to the library
    #[serde(default)]
    pub added: Option<NaiveDate>,
}

impl From<&LibraryEntry> for ModelDescriptor {
    fn from(entry: &LibraryEntry) -> Self {
        ModelDescriptor {
            filename: entry.filename.clone(),
            category: entry.category.clone(),
            url: entry.url.clone(),
        }
    }
}

/// The library index
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryIndex {
    /// Version of the index format
    #[serde(default = "default_version")]
    pub version: String,
    /// Model entries
    #[serde(default, rename = "model")]
    pub models: Vec<LibraryEntry>,
}

fn default_version() -> String {
    "1.0".to_string()
}

impl Default for LibraryIndex {
    fn default() -> Self {
        Self {
            version: default_version(),
            models: Vec::new(),
        }
    }
}

impl LibraryIndex {
    /// Load the index from a TOML file
    pub fn from_file(path: &Path) -> Result<Self, LibraryError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Load the index from a TOML string
    pub fn from_toml(content: &str) -> Result<Self, LibraryError> {
        let index: LibraryIndex = toml::from_str(content)?;
        Ok(index)
    }

    /// Save the index to a TOML file
    pub fn to_file(&self, path: &Path) -> Result<(), LibraryError> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// All distinct categories, sorted
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> =
            self.models.iter().map(|m| m.category.clone()).collect();
        categories.sort();
        categories.dedup();
        categories
    }

    /// Entries in a category (case-insensitive), or all entries
    pub fn filter_category(&self, category: Option<&str>) -> Vec<&LibraryEntry> {
        match category {
            Some(category) => self
                .models
                .iter()
                .filter(|m| m.category.eq_ignore_ascii_case(category))
                .collect(),
            None => self.models.iter().collect(),
        }
    }

    /// Substring search over name, filename, category, and tags
    pub fn search(&self, query: &str) -> Vec<&LibraryEntry> {
        let needle = query.to_lowercase();
        if needle.is_empty() {
            return Vec::new();
        }
        self.models
            .iter()
            .filter(|m| {
                m.name.to_lowercase().contains(&needle)
                    || m.filename.to_lowercase().contains(&needle)
                    || m.category.to_lowercase().contains(&needle)
                    || m.tags.iter().any(|t| t.to_lowercase().contains(&needle))
            })
            .collect()
    }

    /// Convert entries to the wire descriptor shape
    pub fn descriptors<'a>(entries: impl IntoIterator<Item = &'a LibraryEntry>) -> Vec<ModelDescriptor> {
        entries.into_iter().map(ModelDescriptor::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX: &str = r#"
version = "1.0"

[[model]]
name = "Lounge Chair"
filename = "lounge_chair.glb"
category = "seating"
url = "/models/lounge_chair.glb"
tags = ["chair", "lounge", "armchair"]
added = "2025-11-03"

[[model]]
name = "Walnut Desk"
filename = "walnut_desk.glb"
category = "tables"
url = "/models/walnut_desk.glb"
description = "Mid-century walnut writing desk"

[[model]]
name = "Arc Lamp"
filename = "arc_lamp.glb"
category = "lighting"
url = "/models/arc_lamp.glb"
tags = ["floor", "lamp"]
"#;

    #[test]
    fn test_load_and_categories() {
        let index = LibraryIndex::from_toml(INDEX).unwrap();
        assert_eq!(index.models.len(), 3);
        assert_eq!(index.categories(), vec!["lighting", "seating", "tables"]);
        assert_eq!(
            index.models[0].added,
            Some(NaiveDate::from_ymd_opt(2025, 11, 3).unwrap())
        );
    }

    #[test]
    fn test_filter_category() {
        let index = LibraryIndex::from_toml(INDEX).unwrap();
        let seating = index.filter_category(Some("SEATING"));
        assert_eq!(seating.len(), 1);
        assert_eq!(seating[0].name, "Lounge Chair");
        assert_eq!(index.filter_category(None).len(), 3);
        assert!(index.filter_category(Some("rugs")).is_empty());
    }

    #[test]
    fn test_search() {
        let index = LibraryIndex::from_toml(INDEX).unwrap();
        // Tag match
        assert_eq!(index.search("armchair").len(), 1);
        // Name match, case-insensitive
        assert_eq!(index.search("walnut").len(), 1);
        // Category match
        assert_eq!(index.search("lighting").len(), 1);
        assert!(index.search("").is_empty());
        assert!(index.search("ottoman").is_empty());
    }

    #[test]
    fn test_descriptors() {
        let index = LibraryIndex::from_toml(INDEX).unwrap();
        let descriptors = LibraryIndex::descriptors(index.filter_category(Some("tables")));
        assert_eq!(descriptors.len(), 1);
        assert_eq!(descriptors[0].filename, "walnut_desk.glb");
        assert_eq!(descriptors[0].url, "/models/walnut_desk.glb");
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.toml");

        let index = LibraryIndex::from_toml(INDEX).unwrap();
        index.to_file(&path).unwrap();

        let reloaded = LibraryIndex::from_file(&path).unwrap();
        assert_eq!(reloaded.models.len(), index.models.len());
        assert_eq!(reloaded.models[1].description.as_deref(), Some("Mid-century walnut writing desk"));
    }
}
