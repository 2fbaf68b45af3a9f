use anyhow::{Context, Result, bail};
use log::debug;
use std::fmt;
use std::time::Duration;

use crate::client::{Client, TOKEN_ENDPOINT};
use crate::config::{ClientConfig, DEFAULT_URL};
use crate::session::mask;

/// Connection settings collected from the command line and environment.
#[derive(Clone, PartialEq, Eq)]
pub struct Options {
    pub url: String,
    pub username: Option<String>,
    pub password: Option<String>,
    pub timeout: Duration,
    pub auth_endpoint: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            username: None,
            password: None,
            timeout: crate::config::DEFAULT_TIMEOUT,
            auth_endpoint: TOKEN_ENDPOINT.to_string(),
        }
    }
}

impl fmt::Debug for Options {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Options")
            .field("url", &self.url)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "********"))
            .field("timeout", &self.timeout)
            .field("auth_endpoint", &self.auth_endpoint)
            .finish()
    }
}

/// Builds a client and, when a username is given, authenticates it.
#[tracing::instrument(skip(options), fields(url = %options.url))]
pub async fn connect(options: &Options) -> Result<Client> {
    let config =
        ClientConfig::new(options.url.trim_end_matches('/')).with_timeout(options.timeout);
    let mut client = Client::new(config).context("Failed to create HTTP client")?;

    if let Some(username) = &options.username {
        let Some(password) = &options.password else {
            bail!(
                "A password is required when a username is given (--password or THOMAS_PASSWORD)"
            );
        };

        client
            .authenticate_at(username, password, &options.auth_endpoint)
            .await
            .with_context(|| format!("Failed to authenticate as '{}'", username))?;

        if let Some(token) = client.session().access_token() {
            debug!("Using access token {}", mask(token));
        }
    }

    Ok(client)
}
