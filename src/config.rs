//! Client configuration.

use std::time::Duration;

/// Server used when no URL is configured.
pub const DEFAULT_URL: &str = "http://localhost:5000";

/// Upper bound for a whole request, including reading the body.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

pub const DEFAULT_USER_AGENT: &str = concat!("thomas-client/", env!("THOMAS_VERSION"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// URL to the server, may include protocol, port number and a path prefix.
    pub base_url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Resolves an endpoint against the base URL.
    ///
    /// The endpoint is appended verbatim; a `/` is inserted only when the
    /// endpoint does not already start with one.
    pub fn url_to(&self, endpoint: &str) -> String {
        if endpoint.starts_with('/') {
            format!("{}{}", self.base_url, endpoint)
        } else {
            format!("{}/{}", self.base_url, endpoint)
        }
    }
}
