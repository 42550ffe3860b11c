//! REST client for the Recicla Contigo backend.
//!
//! All endpoints live under `{base}/api`. Bodies are JSON with the
//! backend's Spanish field names; error responses carry a `detail` field
//! that is either a message string or a list of validation entries.
//!
//! # Endpoints
//!
//! - **Accounts**: `usuarios`, `login`
//! - **Reports**: `reportes`, `reportes-publicos`, `mapa-reportes`
//! - **Catalog**: `incentivos`, `canjear`, `educacion`, `noticias`,
//!   `notificaciones`, `ranking`

mod accounts;
mod catalog;
mod error;
mod reports;

pub use catalog::Redemption;
pub use error::ApiError;
pub use reports::ReportGateway;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use reqwest::Method;
use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use url::Url;

use crate::config::ClientConfig;

const USER_AGENT: &str = concat!("recicla-contigo/", env!("CARGO_PKG_VERSION"));

/// Backend API client.
///
/// Cheap to clone; clones share the connection pool and bearer token.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    client: reqwest::Client,
    base_url: Url,
    token: RwLock<Option<SecretString>>,
}

impl ApiClient {
    /// Create a client for the backend at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(base_url: Url, timeout: Option<Duration>) -> Result<Self, ApiError> {
        let mut builder = reqwest::Client::builder().user_agent(USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build()?;

        Ok(Self {
            inner: Arc::new(ApiClientInner {
                client,
                base_url,
                token: RwLock::new(None),
            }),
        })
    }

    /// Create a client from loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn from_config(config: &ClientConfig) -> Result<Self, ApiError> {
        Self::new(config.api_url.clone(), config.http_timeout)
    }

    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Attach `token` as a bearer credential to subsequent requests.
    pub fn set_token(&self, token: SecretString) {
        *self.inner.token.write() = Some(token);
    }

    pub fn clear_token(&self) {
        *self.inner.token.write() = None;
    }

    #[must_use]
    pub fn has_token(&self) -> bool {
        self.inner.token.read().is_some()
    }

    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        let base = self.inner.base_url.as_str().trim_end_matches('/');
        Ok(Url::parse(&format!("{base}/api{path}"))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<reqwest::RequestBuilder, ApiError> {
        let url = self.endpoint(path)?;
        let builder = self.inner.client.request(method, url);
        let token = self.inner.token.read();
        Ok(match token.as_ref() {
            Some(token) => builder.bearer_auth(token.expose_secret()),
            None => builder,
        })
    }

    /// Execute a GET request against the backend.
    pub(crate) async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.request(Method::GET, path)?.send().await?;
        Self::handle_response(response).await
    }

    /// Execute a POST request against the backend.
    pub(crate) async fn post<T: DeserializeOwned, B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.request(Method::POST, path)?.json(body).send().await?;
        Self::handle_response(response).await
    }

    /// Execute a PUT request, caring only about the status.
    pub(crate) async fn put<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<(), ApiError> {
        let response = self.request(Method::PUT, path)?.json(body).send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Execute a DELETE request against the backend.
    pub(crate) async fn delete(&self, path: &str) -> Result<(), ApiError> {
        let response = self.request(Method::DELETE, path)?.send().await?;
        if response.status().is_success() {
            return Ok(());
        }
        Err(Self::parse_error(response).await)
    }

    /// Handle API response and parse JSON.
    async fn handle_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, ApiError> {
        if response.status().is_success() {
            return response
                .json()
                .await
                .map_err(|e| ApiError::Parse(format!("Failed to parse response: {e}")));
        }

        Err(Self::parse_error(response).await)
    }

    /// Turn a non-success response into an error, keeping the `detail`.
    async fn parse_error(response: reqwest::Response) -> ApiError {
        let status = response.status().as_u16();
        let body = response.text().await.unwrap_or_default();
        let detail = extract_detail(&body);

        if status == 401 || status == 403 {
            return ApiError::Unauthorized { detail };
        }
        ApiError::Api { status, detail }
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("authenticated", &self.has_token())
            .finish_non_exhaustive()
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    detail: Option<Detail>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Detail {
    Message(String),
    Validation(Vec<ValidationEntry>),
}

#[derive(Deserialize)]
struct ValidationEntry {
    msg: String,
}

/// Pull a human message out of an error body. Validation lists are joined.
fn extract_detail(body: &str) -> Option<String> {
    let parsed: ErrorBody = serde_json::from_str(body).ok()?;
    let message = match parsed.detail? {
        Detail::Message(message) => message,
        Detail::Validation(entries) => entries
            .into_iter()
            .map(|e| e.msg)
            .collect::<Vec<_>>()
            .join("; "),
    };
    let message = message.trim();
    (!message.is_empty()).then(|| message.to_owned())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use httpmock::prelude::*;

    use super::*;

    #[test]
    fn test_extract_detail_string() {
        assert_eq!(
            extract_detail(r#"{"detail":"Credenciales inválidas"}"#).as_deref(),
            Some("Credenciales inválidas")
        );
    }

    #[test]
    fn test_extract_detail_validation_list() {
        let body = r#"{"detail":[{"loc":["body","latitud"],"msg":"field required","type":"value_error.missing"},{"loc":["body","usuario_id"],"msg":"field required"}]}"#;
        assert_eq!(
            extract_detail(body).as_deref(),
            Some("field required; field required")
        );
    }

    #[test]
    fn test_extract_detail_absent() {
        assert!(extract_detail("Internal Server Error").is_none());
        assert!(extract_detail(r#"{"error":"x"}"#).is_none());
        assert!(extract_detail(r#"{"detail":"  "}"#).is_none());
    }

    #[test]
    fn test_endpoint_joins_api_prefix() {
        let client = ApiClient::new(Url::parse("http://localhost:8001/").unwrap(), None).unwrap();
        assert_eq!(
            client.endpoint("/reportes-publicos").unwrap().as_str(),
            "http://localhost:8001/api/reportes-publicos"
        );
    }

    #[test]
    fn test_debug_hides_token() {
        let client = ApiClient::new(Url::parse("http://localhost:8001").unwrap(), None).unwrap();
        client.set_token(SecretString::from("eyJhbGciOi"));
        let debug = format!("{client:?}");
        assert!(!debug.contains("eyJhbGciOi"));
        assert!(debug.contains("authenticated: true"));
    }

    #[tokio::test]
    async fn test_bearer_token_attached() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(GET)
                    .path("/api/ranking")
                    .header("authorization", "Bearer abc123");
                then.status(200).json_body(serde_json::json!({"ranking": []}));
            })
            .await;

        let client = ApiClient::new(Url::parse(&server.base_url()).unwrap(), None).unwrap();
        client.set_token(SecretString::from("abc123"));
        let ranking = client.ranking().await.unwrap();

        assert!(ranking.is_empty());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_unauthorized_keeps_detail() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/api/ranking");
                then.status(401)
                    .json_body(serde_json::json!({"detail": "Token expirado"}));
            })
            .await;

        let client = ApiClient::new(Url::parse(&server.base_url()).unwrap(), None).unwrap();
        let err = client.ranking().await.unwrap_err();

        assert!(matches!(err, ApiError::Unauthorized { .. }));
        assert_eq!(err.detail(), Some("Token expirado"));
    }
}
