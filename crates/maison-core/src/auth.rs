//! Auth wire types and the two-phase login flow
//!
//! The backend supports an OTP-gated login: the first `/api/login` call may
//! answer `{require_otp: true, email}` instead of a session, and only a
//! second call carrying the OTP signs the user in. `AuthPhase` models that
//! flow so the dashboard cannot enter the signed-in state early.

use serde::{Deserialize, Serialize};

/// Cached user identity, mirrored between the server session and local storage
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub username: String,
    pub email: String,
}

/// Parse a cached identity string; malformed or empty data is treated as absent
pub fn parse_cached_identity(raw: &str) -> Option<Identity> {
    let identity: Identity = serde_json::from_str(raw).ok()?;
    if identity.username.is_empty() || identity.email.is_empty() {
        return None;
    }
    Some(identity)
}

/// Body for `/api/login`; `otp` is present only on the second phase
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp: Option<String>,
    pub remember: bool,
}

/// Response from `/api/login`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub require_otp: bool,
    #[serde(default)]
    pub error: Option<String>,
}

/// Body for `/api/register`
#[derive(Debug, Clone, Serialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Body for `/api/verify-otp`
#[derive(Debug, Clone, Serialize)]
pub struct OtpVerifyRequest {
    pub email: String,
    pub otp: String,
}

/// Body for `/api/resend-verification` and `/api/reset-password`
#[derive(Debug, Clone, Serialize)]
pub struct EmailRequest {
    pub email: String,
}

/// Body for `/api/reset-password/verify`
#[derive(Debug, Clone, Serialize)]
pub struct PasswordResetVerifyRequest {
    pub email: String,
    pub otp: String,
    pub new_password: String,
}

/// Message-or-error envelope used by the ack-style endpoints
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AckResponse {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl AckResponse {
    /// Fold into a user-facing notice: Ok on success, Err with the reason
    pub fn into_notice(self) -> Result<String, String> {
        if let Some(error) = self.error {
            Err(error)
        } else {
            Ok(self.message.unwrap_or_else(|| "Done".to_string()))
        }
    }
}

/// Client-side login flow state
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthPhase {
    #[default]
    SignedOut,
    /// First login call answered `require_otp`; waiting for the code
    AwaitingOtp { email: String },
    SignedIn(Identity),
}

impl AuthPhase {
    /// Advance the flow with a `/api/login` response
    ///
    /// Returns the next phase and an error message to surface, if any. An
    /// error response never advances the phase; a `require_otp` response
    /// never signs in.
    pub fn on_login_response(&self, resp: &LoginResponse) -> (AuthPhase, Option<String>) {
        if let Some(error) = &resp.error {
            return (self.clone(), Some(error.clone()));
        }

        if resp.require_otp {
            let email = resp.email.clone().unwrap_or_default();
            return (AuthPhase::AwaitingOtp { email }, None);
        }

        match (&resp.username, &resp.email) {
            (Some(username), Some(email)) => (
                AuthPhase::SignedIn(Identity {
                    username: username.clone(),
                    email: email.clone(),
                }),
                None,
            ),
            _ => (
                self.clone(),
                Some("login response carried no identity".to_string()),
            ),
        }
    }

    pub fn is_signed_in(&self) -> bool {
        matches!(self, AuthPhase::SignedIn(_))
    }

    pub fn identity(&self) -> Option<&Identity> {
        match self {
            AuthPhase::SignedIn(identity) => Some(identity),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_response(username: &str, email: &str) -> LoginResponse {
        LoginResponse {
            message: Some("Login successful".to_string()),
            username: Some(username.to_string()),
            email: Some(email.to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_direct_login_signs_in() {
        let phase = AuthPhase::SignedOut;
        let (next, err) = phase.on_login_response(&ok_response("ada", "ada@example.com"));
        assert!(err.is_none());
        assert!(next.is_signed_in());
        assert_eq!(next.identity().unwrap().username, "ada");
    }

    #[test]
    fn test_otp_gate_blocks_sign_in() {
        let phase = AuthPhase::SignedOut;
        let resp = LoginResponse {
            require_otp: true,
            email: Some("ada@example.com".to_string()),
            ..Default::default()
        };
        let (next, err) = phase.on_login_response(&resp);
        assert!(err.is_none());
        // Must not be signed in until a second call with the OTP succeeds
        assert!(!next.is_signed_in());
        assert_eq!(
            next,
            AuthPhase::AwaitingOtp {
                email: "ada@example.com".to_string()
            }
        );

        // Second call including the OTP completes the flow
        let (done, err) = next.on_login_response(&ok_response("ada", "ada@example.com"));
        assert!(err.is_none());
        assert!(done.is_signed_in());
    }

    #[test]
    fn test_error_keeps_phase() {
        let phase = AuthPhase::AwaitingOtp {
            email: "ada@example.com".to_string(),
        };
        let resp = LoginResponse {
            error: Some("Invalid OTP".to_string()),
            ..Default::default()
        };
        let (next, err) = phase.on_login_response(&resp);
        assert_eq!(err.as_deref(), Some("Invalid OTP"));
        assert_eq!(next, phase);
    }

    #[test]
    fn test_identityless_success_is_an_error() {
        let phase = AuthPhase::SignedOut;
        let (next, err) = phase.on_login_response(&LoginResponse::default());
        assert!(err.is_some());
        assert_eq!(next, AuthPhase::SignedOut);
    }

    #[test]
    fn test_cached_identity_roundtrip() {
        let identity = Identity {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
        };
        let raw = serde_json::to_string(&identity).unwrap();
        assert_eq!(parse_cached_identity(&raw), Some(identity));
    }

    #[test]
    fn test_malformed_cached_identity_is_absent() {
        assert_eq!(parse_cached_identity("not json"), None);
        assert_eq!(parse_cached_identity("{\"username\": \"ada\"}"), None);
        assert_eq!(
            parse_cached_identity("{\"username\": \"\", \"email\": \"\"}"),
            None
        );
    }

    #[test]
    fn test_ack_into_notice() {
        let ok = AckResponse {
            message: Some("OTP sent".to_string()),
            error: None,
        };
        assert_eq!(ok.into_notice(), Ok("OTP sent".to_string()));

        let err = AckResponse {
            message: None,
            error: Some("Email not found".to_string()),
        };
        assert_eq!(err.into_notice(), Err("Email not found".to_string()));
    }

    #[test]
    fn test_login_request_omits_absent_otp() {
        let req = LoginRequest {
            username: "ada".to_string(),
            password: "secret".to_string(),
            otp: None,
            remember: false,
        };
        let json = serde_json::to_string(&req).unwrap();
        assert!(!json.contains("otp"));
    }
}
