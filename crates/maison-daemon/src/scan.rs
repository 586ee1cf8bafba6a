//! Models-directory scan backing the public catalog
//!
//! The public endpoint has no database behind it: it lists the glTF assets
//! on disk and derives each model's category from its filename.

use maison_core::catalog::{categorize_filename, ModelDescriptor};
use std::path::Path;

/// Extensions the scan accepts
const MODEL_EXTENSIONS: &[&str] = &["glb", "gltf"];

/// Scan a directory for loadable models
///
/// A missing directory is created and yields an empty catalog rather than an
/// error. Results are sorted by filename so the catalog is stable across
/// requests.
pub fn scan_models_dir(dir: &Path) -> std::io::Result<Vec<ModelDescriptor>> {
    if !dir.exists() {
        std::fs::create_dir_all(dir)?;
        return Ok(Vec::new());
    }

    let mut models = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }

        let filename = entry.file_name().to_string_lossy().to_string();
        if !is_model_file(&filename) {
            continue;
        }

        models.push(ModelDescriptor {
            category: categorize_filename(&filename).to_string(),
            url: format!("/models/{}", filename),
            filename,
        });
    }

    models.sort_by(|a, b| a.filename.cmp(&b.filename));
    Ok(models)
}

/// Whether a filename has a recognized model extension (case-insensitive)
fn is_model_file(filename: &str) -> bool {
    filename
        .rsplit_once('.')
        .map(|(stem, ext)| !stem.is_empty() && MODEL_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_lists_one_descriptor_per_model() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("lounge_chair.glb"), b"glb").unwrap();
        std::fs::write(dir.path().join("walnut_desk.GLTF"), b"gltf").unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"skip me").unwrap();
        std::fs::write(dir.path().join("thumbnail.png"), b"skip me").unwrap();

        let models = scan_models_dir(dir.path()).unwrap();
        assert_eq!(models.len(), 2);

        // Sorted by filename
        assert_eq!(models[0].filename, "lounge_chair.glb");
        assert_eq!(models[0].category, "seating");
        assert_eq!(models[0].url, "/models/lounge_chair.glb");
        assert_eq!(models[1].filename, "walnut_desk.GLTF");
        assert_eq!(models[1].category, "tables");
    }

    #[test]
    fn test_missing_dir_is_created_and_empty() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("not_yet");

        let models = scan_models_dir(&missing).unwrap();
        assert!(models.is_empty());
        assert!(missing.is_dir());
    }

    #[test]
    fn test_is_model_file() {
        assert!(is_model_file("sofa.glb"));
        assert!(is_model_file("sofa.GLB"));
        assert!(is_model_file("scene.gltf"));
        assert!(!is_model_file("sofa.obj"));
        assert!(!is_model_file("glb"));
        assert!(!is_model_file(".glb"));
    }
}
