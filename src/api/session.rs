//! Authentication state shared by every request.
//!
//! The session owns the bearer token for the whole process. It is created
//! once, handed to [`ApiClient`](super::ApiClient) at construction and
//! changes only through [`AuthSession::sign_in`] and
//! [`AuthSession::sign_out`]. The client calls `sign_out` itself when the
//! backend answers 401.

use std::fs;
use std::path::PathBuf;
use std::sync::RwLock;

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::ApiClient;
use crate::error::ObraError;

/// Claims the backend puts in its access token.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    #[serde(default)]
    pub sub: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    /// Company id of the signed-in user.
    #[serde(default)]
    pub cid: Option<i64>,
    #[serde(default)]
    pub exp: Option<i64>,
}

impl Claims {
    pub fn display_email(&self) -> &str {
        self.email
            .as_deref()
            .or(self.sub.as_deref())
            .unwrap_or("unknown")
    }

    pub fn is_super_admin(&self) -> bool {
        self.role.as_deref() == Some("super_admin")
    }

    /// Area a freshly signed-in user lands on.
    pub fn landing(&self) -> &'static str {
        if self.is_super_admin() {
            "admin"
        } else {
            "projects"
        }
    }
}

#[derive(Serialize, Deserialize)]
struct StoredSession {
    token: String,
}

#[derive(Debug)]
pub struct AuthSession {
    store: Option<PathBuf>,
    token: RwLock<Option<String>>,
}

impl AuthSession {
    /// A session that is never written to disk.
    pub fn in_memory() -> Self {
        Self {
            store: None,
            token: RwLock::new(None),
        }
    }

    /// Restore the token persisted at `path`, if any.
    pub fn load(path: PathBuf) -> Result<Self, ObraError> {
        let token = if path.exists() {
            let content = fs::read_to_string(&path)?;
            match serde_json::from_str::<StoredSession>(&content) {
                Ok(stored) if !stored.token.is_empty() => Some(stored.token),
                _ => {
                    debug!(path = %path.display(), "ignoring unreadable session file");
                    None
                }
            }
        } else {
            None
        };
        Ok(Self {
            store: Some(path),
            token: RwLock::new(token),
        })
    }

    pub fn bearer(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    pub fn is_signed_in(&self) -> bool {
        self.bearer().is_some()
    }

    pub fn claims(&self) -> Option<Claims> {
        self.bearer().and_then(|t| decode_claims(&t).ok())
    }

    /// Adopt a new token, persist it and return its claims.
    pub fn sign_in(&self, token: String) -> Result<Claims, ObraError> {
        let claims = decode_claims(&token)?;
        if let Some(path) = &self.store {
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent)?;
            }
            let body = serde_json::to_string(&StoredSession {
                token: token.clone(),
            })?;
            fs::write(path, body)?;
        }
        if let Ok(mut slot) = self.token.write() {
            *slot = Some(token);
        }
        info!(user = claims.display_email(), "signed in");
        Ok(claims)
    }

    /// Drop the token from memory and disk. Safe to call when signed out.
    pub fn sign_out(&self) {
        if let Ok(mut slot) = self.token.write() {
            *slot = None;
        }
        if let Some(path) = &self.store {
            if path.exists() {
                if let Err(e) = fs::remove_file(path) {
                    debug!(error = %e, "could not remove session file");
                }
            }
        }
    }
}

/// Decode the payload segment of a JWT. The signature is not checked;
/// the backend does that on every request.
pub fn decode_claims(token: &str) -> Result<Claims, ObraError> {
    let payload = token
        .split('.')
        .nth(1)
        .ok_or_else(|| ObraError::validation("Malformed access token"))?;
    let bytes = URL_SAFE_NO_PAD
        .decode(payload.trim_end_matches('='))
        .map_err(|e| ObraError::validation(format!("Malformed access token: {e}")))?;
    serde_json::from_slice(&bytes)
        .map_err(|e| ObraError::validation(format!("Malformed access token: {e}")))
}

#[derive(Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Exchange credentials for a token and sign the session in. Refused
/// credentials come back as `REJECTED` with the backend's message.
pub fn login(client: &ApiClient, email: &str, password: &str) -> Result<Claims, ObraError> {
    if email.trim().is_empty() || password.is_empty() {
        return Err(ObraError::validation("Email and password are required"));
    }
    let response: TokenResponse =
        client.post_form("/login", &[("username", email.trim()), ("password", password)])?;
    client.session().sign_in(response.access_token)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn token_for(claims: serde_json::Value) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
        format!("{header}.{payload}.signature")
    }

    #[test]
    fn test_decode_claims() {
        let token = token_for(serde_json::json!({"sub": "ana@obra.mx", "role": "admin", "cid": 7}));
        let claims = decode_claims(&token).unwrap();
        assert_eq!(claims.display_email(), "ana@obra.mx");
        assert_eq!(claims.cid, Some(7));
        assert_eq!(claims.landing(), "projects");
        assert!(decode_claims("not-a-token").is_err());
    }

    #[test]
    fn test_super_admin_lands_on_admin() {
        let token = token_for(serde_json::json!({"sub": "root", "role": "super_admin"}));
        assert_eq!(decode_claims(&token).unwrap().landing(), "admin");
    }

    #[test]
    fn test_sign_in_persists_and_sign_out_clears() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("session.json");
        let token = token_for(serde_json::json!({"sub": "ana@obra.mx"}));

        let session = AuthSession::load(path.clone()).unwrap();
        assert!(!session.is_signed_in());
        session.sign_in(token.clone()).unwrap();
        assert!(path.exists());

        let restored = AuthSession::load(path.clone()).unwrap();
        assert_eq!(restored.bearer(), Some(token));

        restored.sign_out();
        assert!(!restored.is_signed_in());
        assert!(!path.exists());
        restored.sign_out();
    }

    #[test]
    fn test_bad_token_is_not_adopted() {
        let session = AuthSession::in_memory();
        assert!(session.sign_in("garbage".into()).is_err());
        assert!(!session.is_signed_in());
    }
}
