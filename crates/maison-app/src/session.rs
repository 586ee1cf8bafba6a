//! Client-side session cache: theme flag + cached identity
//!
//! Both values live in browser local storage and are invalidated on logout.
//! Malformed cached data is treated as absent so a corrupt cache can never
//! break the page.

use bevy::prelude::*;
use maison_core::auth::{AuthPhase, Identity};

use crate::app::UiTheme;
use crate::network::{self, ApiConfig, PendingProfile};
use crate::ui::{AuthState, ProfileState};

const THEME_KEY: &str = "maison.theme";
const IDENTITY_KEY: &str = "maison.identity";

#[cfg(target_arch = "wasm32")]
fn local_storage() -> Option<web_sys::Storage> {
    web_sys::window()?.local_storage().ok().flatten()
}

/// Read the persisted theme flag; None when unset
pub fn load_theme() -> Option<bool> {
    #[cfg(target_arch = "wasm32")]
    {
        let value = local_storage()?.get_item(THEME_KEY).ok().flatten()?;
        match value.as_str() {
            "dark" => Some(true),
            "light" => Some(false),
            _ => None,
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Persist the theme flag
pub fn store_theme(dark: bool) {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.set_item(THEME_KEY, if dark { "dark" } else { "light" });
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = dark;
    }
}

/// Read the cached identity; malformed data reads as None
pub fn load_identity() -> Option<Identity> {
    #[cfg(target_arch = "wasm32")]
    {
        let raw = local_storage()?.get_item(IDENTITY_KEY).ok().flatten()?;
        maison_core::auth::parse_cached_identity(&raw)
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        None
    }
}

/// Persist the identity after a successful login or profile fetch
pub fn store_identity(identity: &Identity) {
    #[cfg(target_arch = "wasm32")]
    {
        if let (Some(storage), Ok(raw)) = (local_storage(), serde_json::to_string(identity)) {
            let _ = storage.set_item(IDENTITY_KEY, &raw);
        }
    }
    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = identity;
    }
}

/// Drop both persisted values (logout)
pub fn clear_session() {
    #[cfg(target_arch = "wasm32")]
    {
        if let Some(storage) = local_storage() {
            let _ = storage.remove_item(THEME_KEY);
            let _ = storage.remove_item(IDENTITY_KEY);
        }
    }
}

/// Session bootstrap: restore theme and identity, or probe the server
///
/// An absent (or malformed, which parses as absent) cached identity triggers
/// a profile fetch; if the server still holds a session the user is signed
/// in without re-entering credentials.
pub fn bootstrap_session(
    mut theme: ResMut<UiTheme>,
    mut auth: ResMut<AuthState>,
    mut profile: ResMut<ProfileState>,
    api: Res<ApiConfig>,
    pending_profile: Res<PendingProfile>,
) {
    if let Some(dark) = load_theme() {
        theme.dark = dark;
    }

    if let Some(identity) = load_identity() {
        tracing::info!(user = %identity.username, "Restored cached session");
        auth.phase = AuthPhase::SignedIn(identity);
    } else {
        profile.bootstrap_probe = true;
        network::fetch_profile(&api.base_url, &pending_profile);
    }
}
