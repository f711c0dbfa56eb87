//! The seam between the tree logic and the HTTP client

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Error;

/// A read-only GET against the backend API.
///
/// `path` is relative to the server's base URL, e.g. `webclient/api/plates/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApiRequest {
    pub path: String,
    pub query: Vec<(String, String)>,
}

impl ApiRequest {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            query: Vec::new(),
        }
    }

    /// Appends a query parameter.
    pub fn param(mut self, key: impl Into<String>, value: impl ToString) -> Self {
        self.query.push((key.into(), value.to_string()));
        self
    }

    /// Sets a query parameter, replacing any earlier value for the same key.
    pub fn set_param(&mut self, key: &str, value: impl ToString) {
        self.query.retain(|(k, _)| k != key);
        self.query.push((key.to_string(), value.to_string()));
    }

    /// Returns the first value for `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

/// Anything that can answer an [`ApiRequest`] with a JSON body.
///
/// [`MaprClient`](crate::MaprClient) is the production implementation;
/// tests plug in canned responses.
#[async_trait]
pub trait JsonSource: Send + Sync {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, Error>;
}

#[async_trait]
impl<T: JsonSource + ?Sized> JsonSource for std::sync::Arc<T> {
    async fn get_json(&self, request: &ApiRequest) -> Result<Value, Error> {
        (**self).get_json(request).await
    }
}
