//! Main MaprClient

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use reqwest::Client;
use reqwest::header::CACHE_CONTROL;
use reqwest::header::COOKIE;
use serde_json::Value;
use url::Url;

use crate::api::ApiRequest;
use crate::api::JsonSource;
use crate::error::ApiError;
use crate::error::ConfigError;
use crate::error::Error;
use crate::session::SessionProvider;

/// HTTP client for the web server's read API.
///
/// This client is cheap to clone (uses `Arc` internally), so the loader and
/// the search box can each hold their own handle.
///
/// # Example
///
/// ```ignore
/// use mapr_lib::{MaprClient, StaticSession};
///
/// let client = MaprClient::builder()
///     .url("https://idr.openmicroscopy.org")
///     .session(StaticSession::anonymous())
///     .build()?;
/// ```
#[derive(Clone)]
pub struct MaprClient {
    inner: Arc<MaprClientInner>,
}

struct MaprClientInner {
    base_url: Url,
    session_provider: Arc<dyn SessionProvider>,
    http_client: Client,
    timeout: Option<Duration>,
}

impl MaprClient {
    /// Creates a new builder for constructing a client.
    pub fn builder() -> MaprClientBuilder<Missing, Missing> {
        MaprClientBuilder::new()
    }

    /// Returns the base URL of the server, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Resolves a request against the base URL, query string included.
    pub fn url_for(&self, request: &ApiRequest) -> Result<Url, Error> {
        let mut url = self
            .inner
            .base_url
            .join(request.path.trim_start_matches('/'))
            .map_err(ApiError::from)?;
        if !request.query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in &request.query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Issues a GET and parses the body as JSON.
    ///
    /// Non-2xx statuses become [`ApiError::Http`]; bodies that are not JSON
    /// become [`ApiError::Parse`] carrying the raw text.
    pub async fn get_json(&self, request: &ApiRequest) -> Result<Value, Error> {
        let url = self.url_for(request)?;
        debug!("GET {}", url);

        let session = self
            .inner
            .session_provider
            .session(self.inner.base_url.as_str())
            .await?;

        let mut builder = self
            .inner
            .http_client
            .get(url.clone())
            .header(CACHE_CONTROL, "no-cache");

        if let Some(session) = session {
            builder = builder.header(COOKIE, session.as_cookie());
        }

        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await.map_err(|e| self.map_send_error(e))?;
        let status = response.status();
        let body = response.text().await.map_err(ApiError::from)?;

        if !status.is_success() {
            debug!("GET {} -> {}", url, status);
            return Err(ApiError::http(status.as_u16(), body).into());
        }

        serde_json::from_str(&body)
            .map_err(|e| ApiError::parse_with_body(e.to_string(), body).into())
    }

    fn map_send_error(&self, err: reqwest::Error) -> Error {
        match self.inner.timeout {
            Some(timeout) if err.is_timeout() => ApiError::Timeout(timeout).into(),
            _ => ApiError::Network(err).into(),
        }
    }
}

#[async_trait]
impl JsonSource for MaprClient {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, Error> {
        MaprClient::get_json(self, request).await
    }
}

impl std::fmt::Debug for MaprClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MaprClient")
            .field("base_url", &self.inner.base_url.as_str())
            .field("timeout", &self.inner.timeout)
            .finish()
    }
}

// =============================================================================
// Typestate Builder
// =============================================================================

/// Marker type for missing required builder fields.
pub struct Missing;

/// Marker type for set builder fields.
pub struct Set<T>(T);

/// Builder for constructing a [`MaprClient`].
///
/// Uses the typestate pattern so `url` and `session` must be set before
/// `build` is available.
pub struct MaprClientBuilder<U, P> {
    url: U,
    session_provider: P,
    timeout: Option<Duration>,
    connect_timeout: Option<Duration>,
    http_client: Option<Client>,
}

impl MaprClientBuilder<Missing, Missing> {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            url: Missing,
            session_provider: Missing,
            timeout: None,
            connect_timeout: None,
            http_client: None,
        }
    }
}

impl Default for MaprClientBuilder<Missing, Missing> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P> MaprClientBuilder<Missing, P> {
    /// Sets the server's base URL, e.g. `https://idr.openmicroscopy.org`.
    pub fn url(self, url: impl Into<String>) -> MaprClientBuilder<Set<String>, P> {
        MaprClientBuilder {
            url: Set(url.into()),
            session_provider: self.session_provider,
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U> MaprClientBuilder<U, Missing> {
    /// Sets the session provider.
    pub fn session<T: SessionProvider + 'static>(
        self,
        provider: T,
    ) -> MaprClientBuilder<U, Set<Arc<dyn SessionProvider>>> {
        MaprClientBuilder {
            url: self.url,
            session_provider: Set(Arc::new(provider) as Arc<dyn SessionProvider>),
            timeout: self.timeout,
            connect_timeout: self.connect_timeout,
            http_client: self.http_client,
        }
    }
}

impl<U, P> MaprClientBuilder<U, P> {
    /// Sets the request timeout. Without one a hung request waits forever.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Sets the connection timeout.
    ///
    /// This is applied when building the HTTP client.
    pub fn connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = Some(timeout);
        self
    }

    /// Sets a custom HTTP client.
    pub fn http_client(mut self, client: Client) -> Self {
        self.http_client = Some(client);
        self
    }
}

impl MaprClientBuilder<Set<String>, Set<Arc<dyn SessionProvider>>> {
    /// Builds the [`MaprClient`].
    ///
    /// Fails only if the base URL does not parse.
    pub fn build(self) -> Result<MaprClient, ConfigError> {
        let raw = self.url.0;
        let mut normalized = raw.trim().to_string();
        if !normalized.ends_with('/') {
            normalized.push('/');
        }
        let base_url = Url::parse(&normalized).map_err(|e| ConfigError::BaseUrl {
            url: raw.clone(),
            message: e.to_string(),
        })?;

        let http_client = self.http_client.unwrap_or_else(|| {
            let mut builder = Client::builder();
            if let Some(timeout) = self.connect_timeout {
                builder = builder.connect_timeout(timeout);
            }
            builder.build().unwrap_or_default()
        });

        Ok(MaprClient {
            inner: Arc::new(MaprClientInner {
                base_url,
                session_provider: self.session_provider.0,
                http_client,
                timeout: self.timeout,
            }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::StaticSession;

    fn client(url: &str) -> MaprClient {
        MaprClient::builder()
            .url(url)
            .session(StaticSession::anonymous())
            .build()
            .unwrap()
    }

    #[test]
    fn test_base_url_gets_trailing_slash() {
        let client = client("https://example.org/omero");
        assert_eq!(client.base_url().as_str(), "https://example.org/omero/");
    }

    #[test]
    fn test_url_for_joins_path_and_query() {
        let client = client("https://example.org/omero");
        let request = ApiRequest::new("/mapr/api/autocomplete/gene/")
            .param("value", "cdc 20")
            .param("query", true);
        let url = client.url_for(&request).unwrap();
        assert_eq!(
            url.as_str(),
            "https://example.org/omero/mapr/api/autocomplete/gene/?value=cdc+20&query=true"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        let result = MaprClient::builder()
            .url("not a url")
            .session(StaticSession::anonymous())
            .build();
        assert!(matches!(result, Err(ConfigError::BaseUrl { .. })));
    }
}
