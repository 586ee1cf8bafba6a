//! Application state management

use anyhow::Result;
use maison_core::LibraryIndex;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{info, warn};

use crate::config::Config;

/// Shared application state
pub struct AppState {
    /// Configuration
    pub config: Config,
    /// Curated model library, None when no index file is available
    pub library: RwLock<Option<LibraryIndex>>,
}

impl AppState {
    /// Create new application state
    pub fn new(config: Config) -> Result<Arc<Self>> {
        let library = load_library(&config.library.path);

        Ok(Arc::new(Self {
            config,
            library: RwLock::new(library),
        }))
    }

    /// Reload the library index from disk
    pub async fn reload_library(&self) -> bool {
        let library = load_library(&self.config.library.path);
        let loaded = library.is_some();
        *self.library.write().await = library;
        loaded
    }
}

/// Load the library index, treating a missing or broken file as "no library"
fn load_library(path: &str) -> Option<LibraryIndex> {
    let path = Path::new(path);
    if !path.exists() {
        info!(path = %path.display(), "Library index not found, curated catalog disabled");
        return None;
    }

    match LibraryIndex::from_file(path) {
        Ok(index) => {
            info!(
                path = %path.display(),
                count = index.models.len(),
                "Loaded model library"
            );
            Some(index)
        }
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to load model library");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_library_disables_curated_catalog() {
        let mut config = Config::default();
        config.library.path = "/nonexistent/library.toml".to_string();

        let state = AppState::new(config).unwrap();
        assert!(state.library.blocking_read().is_none());
    }

    #[test]
    fn test_library_loaded_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("library.toml");
        std::fs::write(
            &path,
            r#"
[[model]]
name = "Lounge Chair"
filename = "lounge_chair.glb"
category = "seating"
url = "/models/lounge_chair.glb"
"#,
        )
        .unwrap();

        let mut config = Config::default();
        config.library.path = path.to_string_lossy().to_string();

        let state = AppState::new(config).unwrap();
        let library = state.library.blocking_read();
        assert_eq!(library.as_ref().unwrap().models.len(), 1);
    }
}
