//! API client for communicating with the Internal Sea Core REST API.
//!
//! This module provides the `ApiClient` struct for making authenticated
//! requests against the `/api/v1` surface: login, the current user,
//! items and organizations.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{header, Client, Method};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, warn};

use crate::auth::Credential;
use crate::models::{Item, ItemCreate, Organization, TokenResponse, User, UserUpdate};

use super::ApiError;

// ============================================================================
// Constants
// ============================================================================

/// Versioned path prefix shared by every endpoint
pub const API_PREFIX: &str = "/api/v1";

/// HTTP request timeout in seconds.
/// 30s allows for slow API responses while failing fast enough for good UX.
const REQUEST_TIMEOUT_SECS: u64 = 30;

const USER_AGENT: &str = concat!("seaport/", env!("CARGO_PKG_VERSION"));

/// API client for the Internal Sea Core backend.
/// Clone is cheap - reqwest::Client uses Arc internally for connection pooling.
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    token: Option<Credential>,
}

impl ApiClient {
    /// Create a new API client for the backend at `base_url` (e.g. `http://localhost:8000`)
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: None,
        })
    }

    /// Create a new ApiClient with the given token, sharing the connection pool.
    pub fn with_token(&self, token: Credential) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: Some(token),
        }
    }

    /// Create a copy of this client that sends no credential
    pub fn anonymous(&self) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            token: None,
        }
    }

    pub fn has_token(&self) -> bool {
        self.token.is_some()
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}{}", self.base_url, API_PREFIX, path)
    }

    fn auth_headers(&self) -> Result<header::HeaderMap, ApiError> {
        let mut headers = header::HeaderMap::new();
        if let Some(ref token) = self.token {
            let mut value = header::HeaderValue::from_str(&format!("Bearer {}", token.expose()))?;
            value.set_sensitive(true);
            headers.insert(header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Check if response is successful, returning a typed error with body if not.
    async fn check_response(response: reqwest::Response) -> Result<reqwest::Response, ApiError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            Err(ApiError::from_status(status, &body))
        }
    }

    /// Send a request and return the body text of a successful response.
    async fn send<B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<String, ApiError> {
        let url = self.url(path);
        debug!(method = %method, path = path, authenticated = self.has_token(), "API request");

        let mut request = self
            .client
            .request(method.clone(), &url)
            .headers(self.auth_headers()?);
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await.map_err(|e| {
            warn!(method = %method, path = path, error = %e, "Request failed to send");
            ApiError::NetworkError(e)
        })?;

        let response = Self::check_response(response).await.map_err(|e| {
            debug!(method = %method, path = path, error = %e, "API request rejected");
            e
        })?;

        Ok(response.text().await?)
    }

    /// Issue a request against `path` (relative to `/api/v1`) and decode the JSON response.
    /// The current credential, if any, is attached as a bearer header.
    pub async fn request<T: DeserializeOwned, B: Serialize + ?Sized>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError> {
        let text = self.send(method, path, body).await?;
        serde_json::from_str(&text).map_err(|e| {
            ApiError::InvalidResponse(format!("Failed to parse JSON response from {}: {}", path, e))
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request::<T, ()>(Method::GET, path, None).await
    }

    // ===== Authentication =====

    /// Exchange email and password for a bearer token.
    /// Uses the OAuth2 password form the backend expects; no credential is attached.
    pub async fn login(&self, email: &str, password: &str) -> Result<TokenResponse, ApiError> {
        let url = self.url("/auth/login");
        debug!(path = "/auth/login", "Submitting credentials");

        let response = self
            .client
            .post(&url)
            .header(header::ACCEPT, "application/json")
            .form(&[("username", email), ("password", password)])
            .send()
            .await?;

        let response = Self::check_response(response).await?;
        let text = response.text().await?;
        serde_json::from_str(&text)
            .map_err(|e| ApiError::InvalidResponse(format!("Failed to parse token response: {}", e)))
    }

    // ===== Users =====

    pub async fn fetch_me(&self) -> Result<User, ApiError> {
        self.get("/users/me").await
    }

    pub async fn update_me(&self, update: &UserUpdate) -> Result<User, ApiError> {
        self.request(Method::PUT, "/users/me", Some(update)).await
    }

    pub async fn fetch_users(&self) -> Result<Vec<User>, ApiError> {
        self.get("/users/").await
    }

    // ===== Items =====

    pub async fn fetch_items(&self) -> Result<Vec<Item>, ApiError> {
        self.get("/items/").await
    }

    pub async fn fetch_item(&self, id: i64) -> Result<Item, ApiError> {
        self.get(&format!("/items/{}", id)).await
    }

    pub async fn create_item(&self, item: &ItemCreate) -> Result<Item, ApiError> {
        self.request(Method::POST, "/items/", Some(item)).await
    }

    /// Delete an item. The confirmation body is ignored.
    pub async fn delete_item(&self, id: i64) -> Result<(), ApiError> {
        self.send::<()>(Method::DELETE, &format!("/items/{}", id), None)
            .await
            .map(|_| ())
    }

    // ===== Organizations =====

    pub async fn fetch_organizations(&self) -> Result<Vec<Organization>, ApiError> {
        self.get("/organizations/").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_string_contains, header, header_exists, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_json() -> serde_json::Value {
        json!({
            "id": 1,
            "email": "a@b.com",
            "full_name": "A B",
            "is_active": true,
            "is_superuser": false,
            "created_at": "2024-01-01T00:00:00"
        })
    }

    #[test]
    fn test_url_joins_prefix() {
        let client = ApiClient::new("http://localhost:8000/").unwrap();
        assert_eq!(client.base_url(), "http://localhost:8000");
        assert_eq!(client.url("/items/"), "http://localhost:8000/api/v1/items/");
    }

    #[test]
    fn test_with_token_and_anonymous() {
        let client = ApiClient::new("http://localhost:8000").unwrap();
        assert!(!client.has_token());
        let authed = client.with_token(Credential::new("tok123"));
        assert!(authed.has_token());
        assert!(!authed.anonymous().has_token());
    }

    #[tokio::test]
    async fn test_login_posts_form() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/auth/login"))
            .and(body_string_contains("username=a%40b.com"))
            .and(body_string_contains("password=secret"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "tok123",
                "token_type": "bearer"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let token = client.login("a@b.com", "secret").await.unwrap();
        assert_eq!(token.access_token, "tok123");
    }

    #[tokio::test]
    async fn test_bearer_header_attached() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/me"))
            .and(header("authorization", "Bearer tok123"))
            .respond_with(ResponseTemplate::new(200).set_body_json(user_json()))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri())
            .unwrap()
            .with_token(Credential::new("tok123"));
        let me = client.fetch_me().await.unwrap();
        assert_eq!(me.full_name.as_deref(), Some("A B"));
    }

    #[tokio::test]
    async fn test_no_header_without_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/items/"))
            .and(header_exists("authorization"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/items/"))
            .respond_with(ResponseTemplate::new(401).set_body_json(json!({"detail": "Not authenticated"})))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        let err = client.fetch_items().await.unwrap_err();
        assert!(err.is_unauthorized());
    }

    #[tokio::test]
    async fn test_forbidden_is_unauthorized() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/organizations/"))
            .respond_with(ResponseTemplate::new(403))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri())
            .unwrap()
            .with_token(Credential::new("stale"));
        assert!(client.fetch_organizations().await.unwrap_err().is_unauthorized());
    }

    #[tokio::test]
    async fn test_create_and_delete_item() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/v1/items/"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "id": 1, "title": "x", "description": "y", "owner_id": 1
            })))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path("/api/v1/items/1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "message": "Item deleted successfully"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri())
            .unwrap()
            .with_token(Credential::new("tok123"));
        let created = client
            .create_item(&ItemCreate {
                title: "x".to_string(),
                description: "y".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(created.id, 1);
        client.delete_item(created.id).await.unwrap();
    }

    #[tokio::test]
    async fn test_server_error_and_bad_json() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/api/v1/users/"))
            .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/api/v1/items/"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>"))
            .mount(&server)
            .await;

        let client = ApiClient::new(&server.uri()).unwrap();
        assert!(matches!(
            client.fetch_users().await.unwrap_err(),
            ApiError::ServerError(ref body) if body == "boom"
        ));
        assert!(matches!(
            client.fetch_items().await.unwrap_err(),
            ApiError::InvalidResponse(_)
        ));
    }

    #[tokio::test]
    async fn test_unreachable_backend_is_network_error() {
        // Nothing listens on port 9 (discard) in the test environment
        let client = ApiClient::new("http://127.0.0.1:9").unwrap();
        assert!(client.fetch_items().await.unwrap_err().is_network());
    }
}
