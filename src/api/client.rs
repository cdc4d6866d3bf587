use std::path::Path;
use std::time::Duration;

use reqwest::blocking::{multipart, Client, RequestBuilder, Response};
use reqwest::{Method, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::session::AuthSession;
use crate::config::Settings;
use crate::error::ObraError;

/// Blocking JSON client for the backend. Every request carries the
/// session's bearer token; a 401 signs the session out, except on the
/// token endpoint where it means the credentials were refused.
pub struct ApiClient {
    http: Client,
    base_url: String,
    session: AuthSession,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration, session: AuthSession) -> Result<Self, ObraError> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("obra/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ObraError::config(format!("Cannot build HTTP client: {e}")))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn from_settings(settings: &Settings, api_url: Option<&str>, session: AuthSession) -> Result<Self, ObraError> {
        Self::new(
            settings.effective_api_url(api_url),
            Duration::from_secs(settings.timeout_secs()),
            session,
        )
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &AuthSession {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ObraError> {
        let response = self.send(Method::GET, path, |r| r)?;
        parse_json(response)
    }

    pub fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T, ObraError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.send(Method::GET, path, |r| r.query(query))?;
        parse_json(response)
    }

    pub fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ObraError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::POST, path, |r| r.json(body))?;
        parse_json(response)
    }

    pub fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ObraError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.send(Method::PUT, path, |r| r.json(body))?;
        parse_json(response)
    }

    pub fn delete(&self, path: &str) -> Result<(), ObraError> {
        self.send(Method::DELETE, path, |r| r)?;
        Ok(())
    }

    /// Form-encoded POST, used by the token endpoint. A 401 here carries
    /// the backend's reason and leaves the session alone.
    pub fn post_form<T: DeserializeOwned>(&self, path: &str, fields: &[(&str, &str)]) -> Result<T, ObraError> {
        let response = self.exchange(Method::POST, path, |r| r.form(fields), OnUnauthorized::Reject)?;
        parse_json(response)
    }

    /// Multipart POST with the file under the `file` field.
    pub fn post_file<T: DeserializeOwned>(&self, path: &str, file: &Path) -> Result<T, ObraError> {
        let form = multipart::Form::new()
            .file("file", file)
            .map_err(|e| ObraError::io(format!("Cannot read {}: {e}", file.display())))?;
        let response = self.send(Method::POST, path, |r| r.multipart(form))?;
        parse_json(response)
    }

    /// GET raw bytes (spreadsheets, model files).
    pub fn download(&self, path: &str) -> Result<Vec<u8>, ObraError> {
        let response = self.send(Method::GET, path, |r| r)?;
        Ok(response.bytes()?.to_vec())
    }

    fn send<F>(&self, method: Method, path: &str, build: F) -> Result<Response, ObraError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        self.exchange(method, path, build, OnUnauthorized::SignOut)
    }

    fn exchange<F>(&self, method: Method, path: &str, build: F, on_401: OnUnauthorized) -> Result<Response, ObraError>
    where
        F: FnOnce(RequestBuilder) -> RequestBuilder,
    {
        let url = self.url(path);
        debug!(%method, %url, "request");
        let mut request = self.http.request(method.clone(), &url);
        if let Some(token) = self.session.bearer() {
            request = request.bearer_auth(token);
        }
        let response = build(request).send().map_err(|e| {
            ObraError::network(format!("Cannot reach {}: {e}", self.base_url))
        })?;

        let status = response.status();
        debug!(%method, %url, status = status.as_u16(), "response");
        if status.is_success() {
            return Ok(response);
        }
        if status == StatusCode::UNAUTHORIZED && on_401 == OnUnauthorized::SignOut {
            warn!("backend answered 401, signing out");
            self.session.sign_out();
            return Err(ObraError::session_expired());
        }
        let body = response.text().unwrap_or_default();
        Err(error_from_body(status.as_u16(), &body))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OnUnauthorized {
    SignOut,
    Reject,
}

fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T, ObraError> {
    let bytes = response.bytes()?;
    if bytes.is_empty() {
        // Some write endpoints answer with an empty body.
        return Ok(serde_json::from_value(Value::Null)?);
    }
    Ok(serde_json::from_slice(&bytes)?)
}

/// Map a failed response body to the error the user sees: the `detail`
/// message verbatim when there is one, a generic status message otherwise.
pub(crate) fn error_from_body(status: u16, body: &str) -> ObraError {
    let detail = serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| v.get("detail").cloned());
    match detail {
        Some(Value::String(message)) if !message.is_empty() => ObraError::rejected(status, message),
        Some(Value::Array(items)) => {
            let messages: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    other => other.get("msg").and_then(Value::as_str).map(str::to_string),
                })
                .collect();
            if messages.is_empty() {
                ObraError::unknown(status)
            } else {
                ObraError::rejected(status, messages.join("; "))
            }
        }
        _ => ObraError::unknown(status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;

    #[test]
    fn test_string_detail_is_verbatim() {
        let err = error_from_body(400, r#"{"detail": "Contratista en uso por un contrato"}"#);
        assert_eq!(err.code, ErrorCode::Rejected);
        assert_eq!(err.message, "Contratista en uso por un contrato");
        assert_eq!(err.status, Some(400));
    }

    #[test]
    fn test_validation_array_is_joined() {
        let err = error_from_body(
            422,
            r#"{"detail": [{"loc": ["body", "name"], "msg": "field required"},
                           {"loc": ["body", "end_date"], "msg": "invalid date"}]}"#,
        );
        assert_eq!(err.message, "field required; invalid date");
    }

    #[test]
    fn test_no_detail_is_unknown() {
        let err = error_from_body(500, "Internal Server Error");
        assert_eq!(err.code, ErrorCode::UnknownError);
        assert_eq!(err.message, "Request failed with status code 500");
    }
}
