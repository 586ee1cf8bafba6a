//! Model catalog types and presentation helpers
//!
//! The catalog is a flat list of loadable furniture models. Both catalog
//! endpoints (the directory scan and the curated library) respond with the
//! same envelope, so the client parses one shape and folds failures into
//! `CatalogError` values rather than panics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    /// The endpoint answered, but flagged the request as failed
    #[error("catalog request rejected: {0}")]
    Rejected(String),
    /// The request never produced a parsable payload
    #[error("catalog request failed: {0}")]
    Transport(String),
}

/// Metadata record identifying a loadable 3D asset
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelDescriptor {
    /// Asset file name (e.g., "lounge_chair.glb")
    pub filename: String,
    /// Category key (seating, tables, lighting, storage, decor, furniture)
    pub category: String,
    /// URL the asset is served from (relative to the daemon, or absolute)
    pub url: String,
}

/// Envelope returned by both catalog endpoints
///
/// `success` defaults to false so a payload without the flag is treated as
/// a failure and triggers the endpoint fallback.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CatalogResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub models: Vec<ModelDescriptor>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub categories: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl CatalogResponse {
    /// Whether the payload carries a usable model list
    pub fn is_success(&self) -> bool {
        self.success
    }

    /// Extract the model list, or the server-provided failure reason
    pub fn into_models(self) -> Result<Vec<ModelDescriptor>, CatalogError> {
        if self.success {
            Ok(self.models)
        } else {
            let reason = self
                .error
                .or(self.message)
                .unwrap_or_else(|| "no success flag in catalog payload".to_string());
            Err(CatalogError::Rejected(reason))
        }
    }
}

/// Derive a category from an asset filename
///
/// Mirrors the catalog service contract: filenames are the only metadata the
/// public scan has, so substrings decide the category.
pub fn categorize_filename(filename: &str) -> &'static str {
    let lower = filename.to_lowercase();
    if ["chair", "sofa", "couch"].iter().any(|k| lower.contains(k)) {
        "seating"
    } else if ["table", "desk"].iter().any(|k| lower.contains(k)) {
        "tables"
    } else if ["lamp", "light"].iter().any(|k| lower.contains(k)) {
        "lighting"
    } else if ["shelf", "cabinet"].iter().any(|k| lower.contains(k)) {
        "storage"
    } else {
        "furniture"
    }
}

/// Normalize a filename for display: strip the extension, underscores to spaces
pub fn display_name(filename: &str) -> String {
    let stem = match filename.rsplit_once('.') {
        Some((stem, _ext)) if !stem.is_empty() => stem,
        _ => filename,
    };
    stem.replace('_', " ")
}

/// Fixed category -> icon table; unknown categories get the default icon
pub fn category_icon(category: &str) -> &'static str {
    match category.to_lowercase().as_str() {
        "seating" => "🛋",
        "tables" => "🪑",
        "lighting" => "💡",
        "storage" => "🗄",
        "decor" => "🖼",
        _ => "📦",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name() {
        assert_eq!(display_name("lounge_chair.glb"), "lounge chair");
        assert_eq!(display_name("desk.gltf"), "desk");
        assert_eq!(display_name("floor_lamp_tall.glb"), "floor lamp tall");
        // No extension: used as-is
        assert_eq!(display_name("plain"), "plain");
        // Hidden-file style names keep their leading dot
        assert_eq!(display_name(".glb"), ".glb");
    }

    #[test]
    fn test_categorize_filename() {
        assert_eq!(categorize_filename("lounge_chair.glb"), "seating");
        assert_eq!(categorize_filename("Sofa_Modern.glb"), "seating");
        assert_eq!(categorize_filename("coffee_table.glb"), "tables");
        // "desk" wins over "lamp": table keywords are checked first
        assert_eq!(categorize_filename("desk_lamp.glb"), "tables");
        assert_eq!(categorize_filename("floor_lamp.glb"), "lighting");
        assert_eq!(categorize_filename("book_shelf.glb"), "storage");
        assert_eq!(categorize_filename("mystery_object.glb"), "furniture");
    }

    #[test]
    fn test_category_icon_fallback() {
        assert_eq!(category_icon("seating"), "🛋");
        assert_eq!(category_icon("LIGHTING"), "💡");
        // Unknown categories fall back to the default icon
        assert_eq!(category_icon("spaceship"), "📦");
        assert_eq!(category_icon(""), "📦");
    }

    #[test]
    fn test_response_without_success_flag_is_failure() {
        let resp: CatalogResponse = serde_json::from_str(r#"{"models": []}"#).unwrap();
        assert!(!resp.is_success());
        assert!(matches!(resp.into_models(), Err(CatalogError::Rejected(_))));
    }

    #[test]
    fn test_response_error_message_is_carried() {
        let resp: CatalogResponse =
            serde_json::from_str(r#"{"success": false, "error": "library offline"}"#).unwrap();
        match resp.into_models() {
            Err(CatalogError::Rejected(reason)) => assert_eq!(reason, "library offline"),
            other => panic!("unexpected: {:?}", other),
        }
    }

    #[test]
    fn test_successful_response_yields_models() {
        let resp: CatalogResponse = serde_json::from_str(
            r#"{"success": true, "models": [
                {"filename": "sofa.glb", "category": "seating", "url": "/models/sofa.glb"}
            ], "count": 1}"#,
        )
        .unwrap();
        let models = resp.into_models().unwrap();
        assert_eq!(models.len(), 1);
        assert_eq!(models[0].filename, "sofa.glb");
        assert_eq!(models[0].url, "/models/sofa.glb");
    }
}
