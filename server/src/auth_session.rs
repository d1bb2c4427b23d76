use crate::data_store::AdminId;
use base64::Engine;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The admin session of a client
///
/// The session token is handed out to the client after a successful admin login, either as a
/// string in the JSON response (for sending it back via the `X-SESSION-TOKEN` header) or as an
/// HTTP-only cookie. It is not encrypted but signed with the server's secret (HMAC-SHA256), so the
/// client can't forge or modify it. It only carries the admin's id, so the data_store needs to check
/// that the admin account still exists, each time the token is used.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionToken {
    #[serde(rename = "a")]
    admin_id: Option<AdminId>,
    /// Creation time of the session, as unix timestamp
    #[serde(rename = "t")]
    issued_at: i64,
}

impl SessionToken {
    pub fn new() -> Self {
        Self {
            admin_id: None,
            issued_at: chrono::Utc::now().timestamp(),
        }
    }

    pub fn set_admin(&mut self, admin_id: AdminId) {
        self.admin_id = Some(admin_id);
        self.issued_at = chrono::Utc::now().timestamp();
    }

    pub fn admin_id(&self) -> Option<AdminId> {
        self.admin_id
    }

    /// Serialize and sign the session token. The result is URL and cookie safe.
    pub fn as_string(&self, secret: &str) -> String {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        // Serializing a struct of two numbers can't fail
        let payload = serde_json::to_vec(self).unwrap_or_default();
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret.as_bytes());
        let signature = ring::hmac::sign(&key, &payload);
        format!(
            "{}.{}",
            engine.encode(&payload),
            engine.encode(signature.as_ref())
        )
    }

    /// Parse a session token string created by [SessionToken::as_string], verify its signature and
    /// check that it is not older than `max_age`.
    pub fn from_string(
        data: &str,
        secret: &str,
        max_age: std::time::Duration,
    ) -> Result<Self, SessionError> {
        let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
        let (payload, signature) = data
            .split_once('.')
            .ok_or(SessionError::InvalidTokenStructure)?;
        let payload = engine
            .decode(payload)
            .map_err(|_| SessionError::InvalidTokenStructure)?;
        let signature = engine
            .decode(signature)
            .map_err(|_| SessionError::InvalidTokenStructure)?;
        let key = ring::hmac::Key::new(ring::hmac::HMAC_SHA256, secret.as_bytes());
        ring::hmac::verify(&key, &payload, &signature)
            .map_err(|_| SessionError::SignatureVerificationFailed)?;
        let token: SessionToken =
            serde_json::from_slice(&payload).map_err(|_| SessionError::InvalidTokenStructure)?;
        let age = chrono::Utc::now().timestamp() - token.issued_at;
        if age < 0 || age as u64 > max_age.as_secs() {
            return Err(SessionError::ExpiredToken);
        }
        Ok(token)
    }
}

impl Default for SessionToken {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionError {
    InvalidTokenStructure,
    SignatureVerificationFailed,
    ExpiredToken,
}

impl Display for SessionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SessionError::InvalidTokenStructure => f.write_str("Invalid session token structure"),
            SessionError::SignatureVerificationFailed => {
                f.write_str("Session token signature verification failed")
            }
            SessionError::ExpiredToken => f.write_str("Session token is expired"),
        }
    }
}

impl std::error::Error for SessionError {}
