//! Typed wrappers over the payroll/budget REST backend.
//!
//! Every call forwards the caller's bearer token. Non-2xx responses become
//! [`ApiError::Status`] carrying the backend's `detail` message.

mod budget;
mod directory;
mod employee;
mod payroll;
mod scenario;
mod tax_rate;

use std::time::Duration;

use reqwest::{Method, RequestBuilder, Response, header};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use thiserror::Error;
use tracing::{debug, warn};

/// Message shown when the backend gives no usable `detail`.
pub const GENERIC_ERROR_MESSAGE: &str = "Something went wrong, contact the system administrator";

#[derive(Debug, Error)]
pub enum ApiError {
    /// Backend answered with a non-success status
    #[error("{detail}")]
    Status { status: u16, detail: String },

    /// Connection, timeout or body read failure
    #[error("backend request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Response body did not match the expected DTO
    #[error("unexpected backend payload: {0}")]
    Decode(#[from] serde_json::Error),
}

impl ApiError {
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        let detail = extract_detail(body).unwrap_or_else(|| GENERIC_ERROR_MESSAGE.to_string());
        ApiError::Status { status, detail }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Message safe to show to the user.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status { detail, .. } => detail.clone(),
            ApiError::Transport(_) | ApiError::Decode(_) => GENERIC_ERROR_MESSAGE.to_string(),
        }
    }
}

/// Pulls the user-visible message out of an error body.
///
/// `detail` is either a plain string or a validation list whose entries carry `msg`.
fn extract_detail(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    match value.get("detail")? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Array(items) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(Value::as_str))
                .collect();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}

/// Binary payload returned by export endpoints.
#[derive(Debug, Clone)]
pub struct Download {
    pub bytes: Vec<u8>,
    pub content_type: String,
    pub content_disposition: Option<String>,
}

#[derive(Clone, Debug)]
pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    fn request(&self, method: Method, token: &str, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        debug!(%method, %url, "Backend request");
        self.http.request(method, url).bearer_auth(token)
    }

    async fn check(response: Response) -> Result<Response, ApiError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let url = response.url().to_string();
        let body = response.bytes().await?;
        let err = ApiError::from_response(status.as_u16(), &body);
        warn!(status = status.as_u16(), %url, error = %err, "Backend returned an error");
        Err(err)
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let response = Self::check(response).await?;
        let body = response.bytes().await?;
        if body.is_empty() {
            return Ok(serde_json::from_slice(b"null")?);
        }
        Ok(serde_json::from_slice(&body)?)
    }

    pub(crate) async fn get<T, Q>(&self, token: &str, path: &str, query: &Q) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, token, path).query(query).send().await?;
        Self::decode(response).await
    }

    pub(crate) async fn send_json<T, B>(
        &self,
        method: Method,
        token: &str,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let response = self.request(method, token, path).json(body).send().await?;
        Self::decode(response).await
    }

    /// DELETE ignores whatever body the backend sends back.
    pub(crate) async fn delete(&self, token: &str, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, token, path).send().await?;
        Self::check(response).await?;
        Ok(())
    }

    pub(crate) async fn download<Q>(&self, token: &str, path: &str, query: &Q) -> Result<Download, ApiError>
    where
        Q: Serialize + ?Sized,
    {
        let response = self.request(Method::GET, token, path).query(query).send().await?;
        let response = Self::check(response).await?;

        let headers = response.headers();
        let content_type = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/octet-stream")
            .to_string();
        let content_disposition = headers
            .get(header::CONTENT_DISPOSITION)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let bytes = response.bytes().await?.to_vec();
        Ok(Download {
            bytes,
            content_type,
            content_disposition,
        })
    }

    pub(crate) async fn upload<T: DeserializeOwned>(
        &self,
        token: &str,
        path: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<T, ApiError> {
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(file_name.to_string())
            .mime_str("application/vnd.openxmlformats-officedocument.spreadsheetml.sheet")?;
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .request(Method::POST, token, path)
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    pub fn client_for(server: &MockServer) -> BackendClient {
        BackendClient::new(&server.uri(), Duration::from_secs(5)).unwrap()
    }

    #[test]
    fn detail_string_is_used_as_message() {
        let err = ApiError::from_response(400, br#"{"detail": "Version is not in DRAFT"}"#);
        assert_eq!(err.user_message(), "Version is not in DRAFT");
        assert_eq!(err.status(), Some(400));
    }

    #[test]
    fn validation_list_messages_are_joined() {
        let body = json!({
            "detail": [
                {"loc": ["body", "year"], "msg": "field required"},
                {"loc": ["body", "month"], "msg": "ensure this value is less than 13"}
            ]
        });
        let err = ApiError::from_response(422, body.to_string().as_bytes());
        assert_eq!(
            err.user_message(),
            "field required; ensure this value is less than 13"
        );
    }

    #[test]
    fn missing_detail_falls_back_to_generic_message() {
        let err = ApiError::from_response(500, b"<html>Bad gateway</html>");
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);

        let err = ApiError::from_response(500, br#"{"detail": "  "}"#);
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }

    #[tokio::test]
    async fn forwards_bearer_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/users"))
            .and(header("authorization", "Bearer abc"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .expect(1)
            .mount(&server)
            .await;

        let users = client_for(&server).list_users("abc").await.unwrap();
        assert!(users.is_empty());
    }

    #[tokio::test]
    async fn error_status_carries_backend_detail() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/99"))
            .respond_with(
                ResponseTemplate::new(404).set_body_json(json!({"detail": "Employee not found"})),
            )
            .mount(&server)
            .await;

        let err = client_for(&server).get_employee("t", 99).await.unwrap_err();
        assert!(matches!(err, ApiError::Status { status: 404, .. }));
        assert_eq!(err.to_string(), "Employee not found");
    }

    #[tokio::test]
    async fn malformed_payload_is_a_decode_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/employees/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "nope"})))
            .mount(&server)
            .await;

        let err = client_for(&server).get_employee("t", 1).await.unwrap_err();
        assert!(matches!(err, ApiError::Decode(_)));
        assert_eq!(err.user_message(), GENERIC_ERROR_MESSAGE);
    }
}
