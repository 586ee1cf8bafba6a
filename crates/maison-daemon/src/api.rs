//! REST API handlers

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use maison_core::catalog::CatalogResponse;
use maison_core::LibraryIndex;
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

use crate::scan::scan_models_dir;
use crate::state::AppState;

/// API error response
#[derive(serde::Serialize)]
struct ApiError {
    error: String,
}

impl ApiError {
    fn new(msg: impl Into<String>) -> Self {
        Self { error: msg.into() }
    }
}

/// Public catalog: list the glTF assets in the models directory
pub async fn public_models(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let models_dir = state.config.models.path.clone();

    match scan_models_dir(Path::new(&models_dir)) {
        Ok(models) => {
            let count = models.len();
            Json(CatalogResponse {
                success: true,
                count: Some(count),
                models,
                ..Default::default()
            })
            .into_response()
        }
        Err(e) => {
            error!(dir = %models_dir, error = %e, "Models directory scan failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(CatalogResponse {
                    success: false,
                    error: Some(format!("Failed to scan models: {}", e)),
                    ..Default::default()
                }),
            )
                .into_response()
        }
    }
}

/// Query parameters for the curated catalog
#[derive(Deserialize)]
pub struct ModelsQuery {
    pub category: Option<String>,
}

/// Curated catalog: serve the library index, optionally filtered by category
pub async fn library_models(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ModelsQuery>,
) -> impl IntoResponse {
    let library = state.library.read().await;
    let Some(library) = library.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(CatalogResponse {
                success: false,
                error: Some("Model library not available".to_string()),
                ..Default::default()
            }),
        )
            .into_response();
    };

    let entries = library.filter_category(query.category.as_deref());
    Json(CatalogResponse {
        success: true,
        models: LibraryIndex::descriptors(entries),
        categories: Some(library.categories()),
        ..Default::default()
    })
    .into_response()
}

/// Query parameters for library search
#[derive(Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
}

/// Search the curated library by name, filename, category, or tag
pub async fn search_models(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    if query.q.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ApiError::new("Search query required")),
        )
            .into_response();
    }

    let library = state.library.read().await;
    let Some(library) = library.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(CatalogResponse {
                success: false,
                error: Some("Model library not available".to_string()),
                ..Default::default()
            }),
        )
            .into_response();
    };

    let matches = library.search(query.q.trim());
    let count = matches.len();
    Json(CatalogResponse {
        success: true,
        models: LibraryIndex::descriptors(matches),
        count: Some(count),
        ..Default::default()
    })
    .into_response()
}

/// Reload the library index from disk
pub async fn reload_library(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    info!("Library reload requested");

    if state.reload_library().await {
        Json(serde_json::json!({"status": "reloaded"})).into_response()
    } else {
        (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ApiError::new("Model library not available")),
        )
            .into_response()
    }
}
