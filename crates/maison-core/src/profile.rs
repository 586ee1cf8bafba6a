//! Profile payloads
//!
//! Field naming is snake_case end-to-end; `email_notifications` is the
//! canonical spelling in both directions.

use serde::{Deserialize, Serialize};

/// Profile fields returned by `/api/profile/get`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub bio: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub website: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub email_notifications: bool,
}

/// Body for `/api/profile/update`
///
/// Password fields are sent only when the user is changing the password.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileUpdate {
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub company: Option<String>,
    pub website: Option<String>,
    pub location: Option<String>,
    pub email_notifications: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub new_password: Option<String>,
}

impl ProfileUpdate {
    /// Build an update payload from current profile fields
    pub fn from_profile(profile: &Profile) -> Self {
        Self {
            username: profile.username.clone(),
            email: profile.email.clone(),
            bio: profile.bio.clone(),
            company: profile.company.clone(),
            website: profile.website.clone(),
            location: profile.location.clone(),
            email_notifications: profile.email_notifications,
            current_password: None,
            new_password: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_profile_uses_snake_case_notifications() {
        let raw = r#"{
            "username": "ada",
            "email": "ada@example.com",
            "email_notifications": true
        }"#;
        let profile: Profile = serde_json::from_str(raw).unwrap();
        assert!(profile.email_notifications);

        let update = ProfileUpdate::from_profile(&profile);
        let json = serde_json::to_string(&update).unwrap();
        assert!(json.contains("email_notifications"));
        assert!(!json.contains("emailNotifications"));
        // Passwords stay out of the payload unless set
        assert!(!json.contains("password"));
    }
}
