//! Web session seam

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;

use crate::error::Error;

/// Name of the cookie the web client authenticates with.
pub const SESSION_COOKIE: &str = "sessionid";

/// A logged-in web session.
#[derive(Debug, Clone)]
pub struct Session {
    /// The session key sent as the `sessionid` cookie.
    pub key: String,
    /// When the session expires, if known.
    pub expires_at: Option<DateTime<Utc>>,
}

impl Session {
    /// Creates a session with no known expiry.
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            expires_at: None,
        }
    }

    /// Creates a session with an expiration time.
    pub fn with_expiry(key: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self {
            key: key.into(),
            expires_at: Some(expires_at),
        }
    }

    /// Returns `true` if the session has expired.
    ///
    /// Returns `false` if expiration time is unknown.
    pub fn is_expired(&self) -> bool {
        self.expires_at.is_some_and(|exp| Utc::now() >= exp)
    }

    /// The `Cookie` header value for this session.
    pub fn as_cookie(&self) -> String {
        format!("{}={}", SESSION_COOKIE, self.key)
    }
}

/// Supplies the session used for every request.
///
/// The client calls `session` before each request, so implementations
/// should cache and only log in again when the session has expired.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Returns a session valid for `base_url`, or `None` for anonymous access.
    async fn session(&self, base_url: &str) -> Result<Option<Session>, Error>;
}

/// A provider that always returns the same session, or none at all.
///
/// # Example
///
/// ```
/// use mapr_lib::StaticSession;
///
/// let provider = StaticSession::new("0f5ad6c1");
/// let public = StaticSession::anonymous();
/// ```
#[derive(Debug, Clone)]
pub struct StaticSession {
    session: Option<Session>,
}

impl StaticSession {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            session: Some(Session::new(key)),
        }
    }

    /// No cookie is sent; for public servers.
    pub fn anonymous() -> Self {
        Self { session: None }
    }

    pub fn from_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }
}

#[async_trait]
impl SessionProvider for StaticSession {
    async fn session(&self, _base_url: &str) -> Result<Option<Session>, Error> {
        match &self.session {
            Some(session) if session.is_expired() => {
                Err(Error::Session("static session has expired".to_string()))
            }
            other => Ok(other.clone()),
        }
    }
}
