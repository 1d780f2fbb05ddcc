//! Login and token verification.
//!
//! Tokens are HS256 JWTs keyed with the configured secret. Verification
//! recomputes the signature and checks expiry; a token whose payload was
//! edited, or that was signed with another secret, is rejected.
//!
//! When auth is disabled, login always succeeds as `guest` and every token
//! is accepted.

mod token;

pub use token::{Claims, TokenSigner, REMEMBER_ME_TTL, SESSION_TTL};

use serde::{Deserialize, Serialize};
use subtle::ConstantTimeEq;
use tracing::{info, warn};

use crate::config::AuthSettings;

/// Errors raised while issuing or decoding tokens.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),

    #[error("{0}")]
    Rejected(String),
}

/// Credentials presented at login.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Result of verifying a token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenCheck {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub claims: Option<Claims>,
}

/// Checks credentials and issues/verifies tokens.
#[derive(Debug, Clone)]
pub struct Authenticator {
    settings: AuthSettings,
    signer: TokenSigner,
}

impl Authenticator {
    #[must_use]
    pub fn new(settings: AuthSettings) -> Self {
        let signer = TokenSigner::new(settings.secret.as_bytes());
        Self { settings, signer }
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.settings.enabled
    }

    /// Check credentials and issue a token on success.
    ///
    /// Wrong credentials are not an error: they produce
    /// `success: false` with a message.
    ///
    /// # Errors
    ///
    /// Returns an error only if token encoding fails.
    pub fn login(&self, request: &LoginRequest) -> Result<LoginResponse, AuthError> {
        if !self.settings.enabled {
            return Ok(LoginResponse {
                success: true,
                token: Some(self.signer.issue("guest", false)?),
                message: Some("Authentication disabled; logged in as guest".to_string()),
            });
        }

        if !self.credentials_match(&request.username, &request.password) {
            warn!(username = %request.username, "Login rejected");
            return Ok(LoginResponse {
                success: false,
                token: None,
                message: Some("Invalid username or password".to_string()),
            });
        }

        let token = self.signer.issue(&request.username, request.remember_me)?;
        info!(username = %request.username, remember_me = request.remember_me, "Login succeeded");
        Ok(LoginResponse {
            success: true,
            token: Some(token),
            message: Some("Logged in".to_string()),
        })
    }

    /// Verify a token's signature and expiry.
    #[must_use]
    pub fn verify(&self, token: &str) -> TokenCheck {
        if !self.settings.enabled {
            return TokenCheck {
                valid: true,
                claims: None,
            };
        }

        match self.signer.verify(token) {
            Ok(claims) => TokenCheck {
                valid: true,
                claims: Some(claims),
            },
            Err(e) => {
                warn!(error = %e, "Token rejected");
                TokenCheck {
                    valid: false,
                    claims: None,
                }
            }
        }
    }

    fn credentials_match(&self, username: &str, password: &str) -> bool {
        let user_ok = username.as_bytes().ct_eq(self.settings.username.as_bytes());
        let pass_ok = password.as_bytes().ct_eq(self.settings.password.as_bytes());
        bool::from(user_ok & pass_ok)
    }
}
