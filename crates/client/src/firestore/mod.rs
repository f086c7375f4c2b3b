//! Firestore REST client implementing the `DocumentStore` capability.
//!
//! ### Specification
//!
//! - **Endpoint**: `POST {base}/projects/{project}/databases/{db}/documents:runQuery`
//! - **Authentication**: optional `key` query parameter (public datasets
//!   and the emulator need none).
//! - **Pagination**: pages are ordered by resource name; continuation
//!   resumes strictly after the last document of the previous page via a
//!   `startAt { before: false }` reference cursor.
//! - **Emulator**: `FIRESTORE_EMULATOR_HOST` redirects the client to a
//!   local emulator over plain HTTP.

pub mod error;
pub mod request;
pub mod response;

pub use error::FirestoreError;

use std::time::Duration;

use async_trait::async_trait;

use request::RunQueryBody;
use response::RunQueryElement;
use vodsite_core::{AppConfig, DocumentPage, DocumentStore, Error, PageCursor, RawDocument};

/// Default base URL for the Firestore REST API.
const DEFAULT_BASE_URL: &str = "https://firestore.googleapis.com/v1";

/// Default request timeout.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Default user agent.
const DEFAULT_USER_AGENT: &str = "vodsite/0.1";

/// Environment variable pointing at a local store emulator.
const EMULATOR_HOST_VAR: &str = "FIRESTORE_EMULATOR_HOST";

/// Store client configuration.
#[derive(Debug, Clone)]
pub struct FirestoreConfig {
    /// Project id selecting the logical dataset/tenant.
    pub project_id: String,
    /// Database name within the project (default: `(default)`).
    pub database: String,
    /// API key for restricted datasets, appended as the `key` parameter.
    pub api_key: Option<String>,
    /// Base URL (default: live API, or the emulator when
    /// FIRESTORE_EMULATOR_HOST is set).
    pub base_url: String,
    /// Request timeout (default: 20s).
    pub timeout: Duration,
    /// User-agent string.
    pub user_agent: String,
}

impl FirestoreConfig {
    /// Configuration for `project_id` with defaults for everything else.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database: "(default)".into(),
            api_key: None,
            base_url: resolve_base_url(),
            timeout: DEFAULT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.into(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// Reads VODSITE_PROJECT_ID (required) and VODSITE_API_KEY.
    pub fn from_env() -> Result<Self, FirestoreError> {
        let project_id = std::env::var("VODSITE_PROJECT_ID").map_err(|_| FirestoreError::MissingProjectId)?;
        let api_key = std::env::var("VODSITE_API_KEY").ok();

        Ok(Self { api_key, ..Self::new(project_id) })
    }

    /// Derive client configuration from the application config.
    pub fn from_app_config(config: &AppConfig) -> Result<Self, FirestoreError> {
        let project_id = config.project_id.as_deref().ok_or(FirestoreError::MissingProjectId)?;

        Ok(Self {
            database: config.database.clone(),
            api_key: config.api_key.clone(),
            timeout: config.timeout(),
            user_agent: config.user_agent.clone(),
            ..Self::new(project_id)
        })
    }
}

/// Live API unless an emulator host is configured.
fn resolve_base_url() -> String {
    match std::env::var(EMULATOR_HOST_VAR) {
        Ok(host) if !host.is_empty() => {
            tracing::info!(host = %host, "using store emulator");
            format!("http://{host}/v1")
        }
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

/// Firestore REST client.
#[derive(Debug, Clone)]
pub struct FirestoreClient {
    http: reqwest::Client,
    config: FirestoreConfig,
}

impl FirestoreClient {
    /// Create a new client with the given configuration.
    pub fn new(config: FirestoreConfig) -> Result<Self, FirestoreError> {
        url::Url::parse(&config.base_url)
            .map_err(|e| FirestoreError::InvalidBaseUrl(format!("{}: {e}", config.base_url)))?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()
            .map_err(FirestoreError::from)?;

        Ok(Self { http, config })
    }

    /// Create a new client from environment variables.
    pub fn from_env() -> Result<Self, FirestoreError> {
        Self::new(FirestoreConfig::from_env()?)
    }

    fn run_query_url(&self) -> String {
        format!(
            "{}/projects/{}/databases/{}/documents:runQuery",
            self.config.base_url, self.config.project_id, self.config.database
        )
    }

    /// Execute one bounded page query against a collection.
    async fn run_query(
        &self, collection: &str, limit: usize, after: Option<&PageCursor>,
    ) -> Result<Vec<RawDocument>, FirestoreError> {
        let body = RunQueryBody::page(collection, limit, after);

        tracing::debug!(collection, limit, continuation = after.is_some(), "querying document store");

        let mut request = self.http.post(self.run_query_url()).json(&body);
        if let Some(key) = &self.config.api_key {
            request = request.query(&[("key", key)]);
        }

        let response = request.send().await?;

        let status = response.status();
        if status == 401 || status == 403 {
            return Err(FirestoreError::AuthError);
        }
        if status.is_client_error() || status.is_server_error() {
            return Err(FirestoreError::HttpError { status: status.as_u16() });
        }

        let elements: Vec<RunQueryElement> =
            response.json().await.map_err(|e| FirestoreError::Parse(e.to_string()))?;

        let mut docs = Vec::with_capacity(elements.len());
        for element in elements {
            if let Some(document) = element.document {
                docs.push(document.into_raw()?);
            }
        }

        tracing::debug!(collection, documents = docs.len(), "page decoded");
        Ok(docs)
    }
}

#[async_trait]
impl DocumentStore for FirestoreClient {
    async fn query_page(
        &self, collection: &str, limit: usize, after: Option<&PageCursor>,
    ) -> Result<DocumentPage, Error> {
        let docs = self
            .run_query(collection, limit, after)
            .await
            .map_err(|e| Error::StoreQuery { collection: collection.to_string(), reason: e.to_string() })?;

        let next = docs.last().map(|doc| PageCursor::new(doc.name.clone()));
        Ok(DocumentPage { docs, next })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = FirestoreConfig::new("catalog-prod");
        assert_eq!(config.project_id, "catalog-prod");
        assert_eq!(config.database, "(default)");
        assert!(config.api_key.is_none());
        assert_eq!(config.timeout, Duration::from_secs(20));
    }

    #[test]
    fn test_run_query_url() {
        let mut config = FirestoreConfig::new("catalog-prod");
        config.base_url = DEFAULT_BASE_URL.to_string();
        let client = FirestoreClient::new(config).unwrap();

        assert_eq!(
            client.run_query_url(),
            "https://firestore.googleapis.com/v1/projects/catalog-prod/databases/(default)/documents:runQuery"
        );
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let mut config = FirestoreConfig::new("catalog-prod");
        config.base_url = "not a url".into();
        let result = FirestoreClient::new(config);
        assert!(matches!(result, Err(FirestoreError::InvalidBaseUrl(_))));
    }

    #[test]
    fn test_from_app_config_requires_project_id() {
        let config = AppConfig::default();
        let result = FirestoreConfig::from_app_config(&config);
        assert!(matches!(result, Err(FirestoreError::MissingProjectId)));
    }

    #[test]
    fn test_from_app_config_carries_settings() {
        let app = AppConfig {
            project_id: Some("catalog-prod".into()),
            database: "staging".into(),
            api_key: Some("k-123".into()),
            timeout_ms: 5_000,
            ..Default::default()
        };

        let config = FirestoreConfig::from_app_config(&app).unwrap();
        assert_eq!(config.project_id, "catalog-prod");
        assert_eq!(config.database, "staging");
        assert_eq!(config.api_key.as_deref(), Some("k-123"));
        assert_eq!(config.timeout, Duration::from_millis(5_000));
    }

    #[test]
    fn test_emulator_base_url() {
        let original = std::env::var(EMULATOR_HOST_VAR).ok();
        unsafe {
            std::env::set_var(EMULATOR_HOST_VAR, "127.0.0.1:6001");
        }

        assert_eq!(resolve_base_url(), "http://127.0.0.1:6001/v1");

        unsafe {
            match original {
                Some(host) => std::env::set_var(EMULATOR_HOST_VAR, host),
                None => std::env::remove_var(EMULATOR_HOST_VAR),
            }
        }
    }
}
