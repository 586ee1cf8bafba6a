//! Network client for backend communication
//!
//! All requests run as browser futures and hand their results back to Bevy
//! through shared pending cells drained by Update systems. Nothing here
//! blocks the UI thread, and every failure is folded into a value.

use bevy::prelude::*;
use maison_core::auth::{
    AuthPhase, EmailRequest, LoginRequest, LoginResponse, OtpVerifyRequest,
    PasswordResetVerifyRequest, RegisterRequest,
};
use maison_core::catalog::{CatalogError, ModelDescriptor};
use maison_core::profile::{Profile, ProfileUpdate};
use std::sync::{Arc, Mutex};

use crate::app::CatalogState;
use crate::notify::Notifications;
use crate::session;
use crate::ui::{AuthState, ProfileState};

pub struct NetworkPlugin;

/// Resource storing the backend connection configuration
#[derive(Resource, Clone)]
pub struct ApiConfig {
    /// HTTP(S) base URL for the REST API (e.g., "https://maison.example.com")
    pub base_url: String,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8080".to_string(),
        }
    }
}

impl ApiConfig {
    /// Same-origin configuration from the browser location
    #[cfg(target_arch = "wasm32")]
    pub fn from_browser() -> Self {
        let Some(window) = web_sys::window() else {
            return Self::default();
        };
        let location = window.location();

        let host = location.host().unwrap_or_else(|_| "localhost:8080".to_string());
        let is_https = location.protocol().unwrap_or_default() == "https:";

        Self {
            base_url: format!("{}://{}", if is_https { "https" } else { "http" }, host),
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    pub fn from_browser() -> Self {
        Self::default()
    }
}

/// Pending catalog fetch result
#[derive(Resource, Default, Clone)]
pub struct PendingCatalog(pub Arc<Mutex<Option<Result<Vec<ModelDescriptor>, CatalogError>>>>);

/// Pending login response
#[derive(Resource, Default, Clone)]
pub struct PendingLogin(pub Arc<Mutex<Option<Result<LoginResponse, String>>>>);

/// Pending profile fetch result
#[derive(Resource, Default, Clone)]
pub struct PendingProfile(pub Arc<Mutex<Option<Result<Profile, String>>>>);

/// Pending ack-style results (register, OTP, reset, profile update, logout)
#[derive(Resource, Default, Clone)]
pub struct PendingNotices(pub Arc<Mutex<Vec<Result<String, String>>>>);

impl Plugin for NetworkPlugin {
    fn build(&self, app: &mut App) {
        // Initialize API config from browser URL
        let api_config = ApiConfig::from_browser();

        app.insert_resource(api_config)
            .init_resource::<PendingCatalog>()
            .init_resource::<PendingLogin>()
            .init_resource::<PendingProfile>()
            .init_resource::<PendingNotices>()
            .add_systems(Startup, initial_catalog_fetch)
            .add_systems(
                Update,
                (
                    process_catalog_results,
                    process_login_results,
                    process_profile_results,
                    process_notice_results,
                ),
            );
    }
}

/// Kick off the first catalog fetch at startup
fn initial_catalog_fetch(
    api: Res<ApiConfig>,
    pending: Res<PendingCatalog>,
    mut catalog: ResMut<CatalogState>,
) {
    catalog.loading = true;
    fetch_catalog(&api.base_url, &pending);
}

/// Drain the catalog pending cell into the catalog resource
fn process_catalog_results(
    pending: Res<PendingCatalog>,
    mut catalog: ResMut<CatalogState>,
    mut notifications: ResMut<Notifications>,
) {
    let result = pending.0.lock().ok().and_then(|mut cell| cell.take());
    let Some(result) = result else { return };

    catalog.loading = false;
    match result {
        Ok(models) => {
            tracing::info!(count = models.len(), "Catalog loaded");
            catalog.error = None;
            catalog.models = models;
        }
        Err(e) => {
            tracing::error!(error = %e, "Catalog fetch failed");
            catalog.error = Some(e.to_string());
            notifications.error(format!("Could not load model catalog: {}", e));
        }
    }
}

/// Drain login responses and advance the auth flow
fn process_login_results(
    pending: Res<PendingLogin>,
    mut auth: ResMut<AuthState>,
    mut notifications: ResMut<Notifications>,
) {
    let result = pending.0.lock().ok().and_then(|mut cell| cell.take());
    let Some(result) = result else { return };

    auth.busy = false;
    match result {
        Ok(resp) => {
            let (next, error) = auth.phase.on_login_response(&resp);
            if let Some(error) = error {
                auth.error = Some(error.clone());
                notifications.error(error);
            } else {
                auth.error = None;
                match &next {
                    AuthPhase::AwaitingOtp { .. } => {
                        notifications.info("Enter the one-time code sent to your email");
                    }
                    AuthPhase::SignedIn(identity) => {
                        session::store_identity(identity);
                        notifications.success(
                            resp.message.unwrap_or_else(|| "Login successful".to_string()),
                        );
                        auth.password.clear();
                        auth.otp.clear();
                    }
                    AuthPhase::SignedOut => {}
                }
            }
            auth.phase = next;
        }
        Err(e) => {
            auth.error = Some(e.clone());
            notifications.error(format!("Login failed: {}", e));
        }
    }
}

/// Drain profile fetches into the profile form (and the auth phase on bootstrap)
fn process_profile_results(
    pending: Res<PendingProfile>,
    mut auth: ResMut<AuthState>,
    mut profile_state: ResMut<ProfileState>,
    mut notifications: ResMut<Notifications>,
) {
    let result = pending.0.lock().ok().and_then(|mut cell| cell.take());
    let Some(result) = result else { return };

    let was_probe = profile_state.bootstrap_probe;
    profile_state.bootstrap_probe = false;
    profile_state.busy = false;

    match result {
        Ok(profile) => {
            if !auth.phase.is_signed_in() {
                // Server still holds a session: sign in and refresh the cache
                let identity = maison_core::Identity {
                    username: profile.username.clone(),
                    email: profile.email.clone(),
                };
                session::store_identity(&identity);
                auth.phase = AuthPhase::SignedIn(identity);
            }
            profile_state.fill_form(&profile);
            profile_state.profile = Some(profile);
        }
        Err(e) => {
            // A failed bootstrap probe just means "not signed in"
            if !was_probe {
                notifications.error(format!("Could not load profile: {}", e));
            } else {
                tracing::debug!(error = %e, "No server-side session");
            }
        }
    }
}

/// Drain ack-style results into notifications
fn process_notice_results(pending: Res<PendingNotices>, mut notifications: ResMut<Notifications>) {
    let drained: Vec<Result<String, String>> = match pending.0.lock() {
        Ok(mut queue) => queue.drain(..).collect(),
        Err(_) => return,
    };

    for result in drained {
        match result {
            Ok(message) => notifications.success(message),
            Err(error) => notifications.error(error),
        }
    }
}

/// Join a base URL and an API path
fn endpoint(base_url: &str, path: &str) -> String {
    format!(
        "{}/{}",
        base_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

// --- Fetch entry points -------------------------------------------------
//
// Each takes the base URL and a pending cell, spawns the browser future, and
// returns immediately. Outside the browser the cells get an error value so
// callers still observe a completion.

/// Fetch the model catalog: public endpoint first, authenticated fallback
pub fn fetch_catalog(base_url: &str, pending: &PendingCatalog) {
    #[cfg(target_arch = "wasm32")]
    {
        let cell = pending.0.clone();
        let primary = endpoint(base_url, "api/ar/models/public");
        let fallback = endpoint(base_url, "api/ar/models");
        wasm_bindgen_futures::spawn_local(async move {
            let result = fetch_catalog_inner(&primary, &fallback).await;
            if let Ok(mut cell) = cell.lock() {
                *cell = Some(result);
            }
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = base_url;
        set_cell(
            &pending.0,
            Err(CatalogError::Transport(NATIVE_UNAVAILABLE.to_string())),
        );
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_catalog_inner(
    primary: &str,
    fallback: &str,
) -> Result<Vec<ModelDescriptor>, CatalogError> {
    let first_failure = match fetch_catalog_once(primary).await {
        Ok(models) => return Ok(models),
        Err(e) => e,
    };

    tracing::warn!(error = %first_failure, "Public catalog failed, trying authenticated endpoint");
    match fetch_catalog_once(fallback).await {
        Ok(models) => Ok(models),
        // Surface the fallback's reason; it is the most recent server word
        Err(e) => Err(e),
    }
}

#[cfg(target_arch = "wasm32")]
async fn fetch_catalog_once(url: &str) -> Result<Vec<ModelDescriptor>, CatalogError> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| CatalogError::Transport(e.to_string()))?;
    let payload: maison_core::CatalogResponse = resp
        .json()
        .await
        .map_err(|e| CatalogError::Transport(e.to_string()))?;
    payload.into_models()
}

/// First or second phase of the login flow, depending on `req.otp`
pub fn login(base_url: &str, req: LoginRequest, pending: &PendingLogin) {
    #[cfg(target_arch = "wasm32")]
    {
        let cell = pending.0.clone();
        let url = endpoint(base_url, "api/login");
        wasm_bindgen_futures::spawn_local(async move {
            let result = post_json_as::<LoginRequest, LoginResponse>(&url, &req).await;
            if let Ok(mut cell) = cell.lock() {
                *cell = Some(result);
            }
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (base_url, req);
        set_cell(&pending.0, Err(NATIVE_UNAVAILABLE.to_string()));
    }
}

/// Fetch the signed-in user's profile
pub fn fetch_profile(base_url: &str, pending: &PendingProfile) {
    #[cfg(target_arch = "wasm32")]
    {
        let cell = pending.0.clone();
        let url = endpoint(base_url, "api/profile/get");
        wasm_bindgen_futures::spawn_local(async move {
            let result = get_json_as::<Profile>(&url).await;
            if let Ok(mut cell) = cell.lock() {
                *cell = Some(result);
            }
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = base_url;
        set_cell(&pending.0, Err(NATIVE_UNAVAILABLE.to_string()));
    }
}

pub fn update_profile(base_url: &str, update: ProfileUpdate, pending: &PendingNotices) {
    ack_call(base_url, "api/profile/update", update, pending);
}

pub fn register(base_url: &str, req: RegisterRequest, pending: &PendingNotices) {
    ack_call(base_url, "api/register", req, pending);
}

pub fn verify_otp(base_url: &str, req: OtpVerifyRequest, pending: &PendingNotices) {
    ack_call(base_url, "api/verify-otp", req, pending);
}

pub fn resend_verification(base_url: &str, req: EmailRequest, pending: &PendingNotices) {
    ack_call(base_url, "api/resend-verification", req, pending);
}

pub fn reset_password(base_url: &str, req: EmailRequest, pending: &PendingNotices) {
    ack_call(base_url, "api/reset-password", req, pending);
}

pub fn reset_password_verify(
    base_url: &str,
    req: PasswordResetVerifyRequest,
    pending: &PendingNotices,
) {
    ack_call(base_url, "api/reset-password/verify", req, pending);
}

pub fn logout(base_url: &str, pending: &PendingNotices) {
    ack_call(base_url, "api/logout", serde_json::json!({}), pending);
}

/// POST a body to an ack-style endpoint; queue the message-or-error outcome
fn ack_call<B: serde::Serialize + 'static>(
    base_url: &str,
    path: &str,
    body: B,
    pending: &PendingNotices,
) {
    #[cfg(target_arch = "wasm32")]
    {
        let queue = pending.0.clone();
        let url = endpoint(base_url, path);
        wasm_bindgen_futures::spawn_local(async move {
            let result = match post_json_as::<B, maison_core::auth::AckResponse>(&url, &body).await
            {
                Ok(ack) => ack.into_notice(),
                Err(e) => Err(e),
            };
            if let Ok(mut queue) = queue.lock() {
                queue.push(result);
            }
        });
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = (base_url, path, body);
        if let Ok(mut queue) = pending.0.lock() {
            queue.push(Err(NATIVE_UNAVAILABLE.to_string()));
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
const NATIVE_UNAVAILABLE: &str = "network requests require the browser runtime";

#[cfg(not(target_arch = "wasm32"))]
fn set_cell<T>(cell: &Arc<Mutex<Option<T>>>, value: T) {
    if let Ok(mut cell) = cell.lock() {
        *cell = Some(value);
    }
}

#[cfg(target_arch = "wasm32")]
async fn get_json_as<T: serde::de::DeserializeOwned>(url: &str) -> Result<T, String> {
    let resp = gloo_net::http::Request::get(url)
        .send()
        .await
        .map_err(|e| e.to_string())?;
    if !resp.ok() {
        return Err(error_from_response(resp).await);
    }
    resp.json::<T>().await.map_err(|e| e.to_string())
}

#[cfg(target_arch = "wasm32")]
async fn post_json_as<B: serde::Serialize, T: serde::de::DeserializeOwned>(
    url: &str,
    body: &B,
) -> Result<T, String> {
    let resp = gloo_net::http::Request::post(url)
        .json(body)
        .map_err(|e| e.to_string())?
        .send()
        .await
        .map_err(|e| e.to_string())?;
    // Error statuses still carry a parsable envelope (e.g. {"error": ...}),
    // so parse the body either way and let the caller read the error field.
    resp.json::<T>()
        .await
        .map_err(|e| format!("HTTP {}: {}", resp.status(), e))
}

/// Pull the server's error string out of a failed response, if any
#[cfg(target_arch = "wasm32")]
async fn error_from_response(resp: gloo_net::http::Response) -> String {
    let status = resp.status();
    if let Ok(ack) = resp.json::<maison_core::auth::AckResponse>().await {
        if let Some(error) = ack.error {
            return error;
        }
    }
    format!("HTTP {}", status)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joining() {
        assert_eq!(
            endpoint("http://localhost:8080", "api/login"),
            "http://localhost:8080/api/login"
        );
        assert_eq!(
            endpoint("https://maison.example.com/", "/api/ar/models/public"),
            "https://maison.example.com/api/ar/models/public"
        );
    }
}
