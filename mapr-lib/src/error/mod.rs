//! Error types

mod api;
mod config;

pub use api::*;
pub use config::*;

/// Top-level error for every fallible operation in this crate.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The backend call failed.
    #[error(transparent)]
    Api(#[from] ApiError),

    /// Configuration could not be loaded or is inconsistent.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The session provider could not produce a session.
    #[error("Session unavailable: {0}")]
    Session(String),

    /// The node kind has no endpoint, so there is nothing to load.
    #[error("No route for node kind '{0}'")]
    NoRoute(&'static str),

    /// A load was started under a filter that has since been replaced.
    #[error("Load discarded: filter changed while request was in flight")]
    StaleLoad,
}

impl Error {
    /// Returns `true` if the error came from the network layer or an HTTP status.
    pub fn is_network(&self) -> bool {
        matches!(
            self,
            Self::Api(ApiError::Network(_) | ApiError::Http { .. } | ApiError::Timeout(_))
        )
    }

    /// Returns the HTTP status code if the backend answered with an error status.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Api(e) => e.status_code(),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_carries_status() {
        let err: Error = ApiError::http(503, "Service Unavailable").into();
        assert!(err.is_network());
        assert_eq!(err.status_code(), Some(503));
    }

    #[test]
    fn test_local_errors_are_not_network() {
        let parse: Error = ApiError::parse("missing maps").into();
        assert!(!parse.is_network());
        assert_eq!(parse.status_code(), None);
        assert!(!Error::StaleLoad.is_network());
        assert_eq!(Error::Session("offline".to_string()).status_code(), None);
    }
}
