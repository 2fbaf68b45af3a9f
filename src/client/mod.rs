//! Session client for Thomas' RESTful API.
//!
//! The client keeps the session tokens and transparently refreshes an
//! expired access token: a request answered with 401 is retried once after a
//! successful refresh. Every HTTP call is issued sequentially; state-changing
//! operations take `&mut self`, so one client serves one caller at a time.

mod networks;

use log::{debug, error, info, warn};
use reqwest::Method;
use serde_json::{Value, json};
use std::marker::PhantomData;

use crate::config::ClientConfig;
use crate::error::{ClientError, Result};
use crate::http::{Attempt, HttpClient, Verdict, classify, is_failure, server_error};
use crate::model::{JsonNetwork, MetadataStore};
use crate::session::{RefreshGrant, Session, SessionState, TokenGrant};

pub use networks::{NETWORKS_ENDPOINT, SUMMARY_COLUMNS};

/// Endpoint used by [`Client::authenticate`].
pub const TOKEN_ENDPOINT: &str = "token";

#[derive(Debug)]
pub struct Client<M = JsonNetwork> {
    config: ClientConfig,
    http: HttpClient,
    session: Session,
    metadata: MetadataStore,
    _model: PhantomData<fn() -> M>,
}

impl<M> Client<M> {
    /// Creates a client for the configured server. No request is made.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let http = HttpClient::from_config(&config)?;
        Ok(Self::with_http_client(config, http))
    }

    pub fn with_http_client(config: ClientConfig, http: HttpClient) -> Self {
        Self {
            config,
            http,
            session: Session::new(),
            metadata: MetadataStore::new(),
            _model: PhantomData,
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Replaces the session, e.g. with tokens saved from an earlier run.
    pub fn set_session(&mut self, session: Session) {
        self.session = session;
    }

    pub fn state(&self) -> SessionState {
        self.session.state()
    }

    pub fn url_to(&self, endpoint: &str) -> String {
        self.config.url_to(endpoint)
    }

    /// Authenticates against the default `token` endpoint.
    pub async fn authenticate(&mut self, username: &str, password: &str) -> Result<()> {
        self.authenticate_at(username, password, TOKEN_ENDPOINT).await
    }

    /// Exchanges username and password for an access and refresh token.
    ///
    /// Any status other than 200 fails with [`ClientError::Authentication`].
    /// The error body is optional: its `msg` (or `message`) becomes the error
    /// message when present, otherwise the message is empty.
    #[tracing::instrument(skip(self, password))]
    pub async fn authenticate_at(
        &mut self,
        username: &str,
        password: &str,
        endpoint: &str,
    ) -> Result<()> {
        let url = self.url_to(endpoint);
        let credentials = json!({ "username": username, "password": password });

        let response = self
            .http
            .send(Method::POST, &url, None, Some(&credentials), &[])
            .await?;
        let data = response.json_lenient();

        if is_failure(response.status) {
            let message = data
                .as_ref()
                .and_then(|d| d.get("msg").or_else(|| d.get("message")))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();
            error!("Failed to authenticate ({}): {}", response.status, message);
            return Err(ClientError::Authentication { message });
        }

        let grant = match data {
            Some(data) => serde_json::from_value::<TokenGrant>(data)?,
            None => TokenGrant::default(),
        };

        info!("Successfully authenticated!");
        self.session.authenticated(grant);
        Ok(())
    }

    /// Obtains a new access token using the refresh token.
    ///
    /// Only status 200 with an `_access_token` field succeeds. On failure the
    /// session is cleared and the caller has to authenticate again.
    #[tracing::instrument(skip(self))]
    pub async fn refresh_token(&mut self) -> Result<()> {
        info!("Refreshing token");

        let Some((pending, refresh_url, refresh_token)) = self.session.begin_refresh() else {
            error!("Could not refresh token: no refresh token available");
            self.session.invalidate();
            return Err(ClientError::authentication("no refresh token available"));
        };

        let url = self.config.url_to(&refresh_url);
        match Self::exchange_refresh(&self.http, &url, &refresh_token).await {
            Ok(access_token) => {
                debug!("Access token refreshed");
                pending.complete(access_token);
                Ok(())
            }
            Err(e) => {
                error!("Could not refresh token: {}", e);
                pending.fail();
                Err(e)
            }
        }
    }

    async fn exchange_refresh(
        http: &HttpClient,
        url: &str,
        refresh_token: &str,
    ) -> Result<String> {
        let response = http
            .send(Method::POST, url, Some(refresh_token), None, &[])
            .await?;

        if response.status.as_u16() != 200 {
            let status = response.status.as_u16();
            let message = response
                .json_lenient()
                .as_ref()
                .and_then(|d| d.get("msg").or_else(|| d.get("message")))
                .and_then(Value::as_str)
                .map(|m| format!("refresh rejected with HTTP {}: {}", status, m))
                .unwrap_or_else(|| format!("refresh rejected with HTTP {}", status));
            return Err(ClientError::authentication(message));
        }

        let grant: RefreshGrant = response
            .json_lenient()
            .and_then(|data| serde_json::from_value(data).ok())
            .ok_or_else(|| {
                ClientError::authentication("refresh response has no _access_token")
            })?;

        Ok(grant.access_token)
    }

    /// Performs a request and decodes the JSON response.
    ///
    /// A 401 triggers one token refresh and one retry; see [`Client::request_from`].
    pub async fn request(
        &mut self,
        endpoint: &str,
        body: Option<&Value>,
        method: Method,
        query: &[(&str, &str)],
    ) -> Result<Value> {
        self.request_from(endpoint, body, method, query, Attempt::First)
            .await
    }

    /// Performs a request starting at the given attempt.
    ///
    /// On [`Attempt::First`] a 401 refreshes the token and retries once with
    /// [`Attempt::Retry`]. Any other status above 200, or a 401 on the retry,
    /// fails with [`ClientError::Server`].
    #[tracing::instrument(skip(self, body))]
    pub async fn request_from(
        &mut self,
        endpoint: &str,
        body: Option<&Value>,
        method: Method,
        query: &[(&str, &str)],
        attempt: Attempt,
    ) -> Result<Value> {
        let url = self.url_to(endpoint);
        let mut attempt = attempt;

        loop {
            let response = self
                .http
                .send(method.clone(), &url, self.session.bearer(), body, query)
                .await?;

            match classify(response.status, attempt) {
                Verdict::Accept => return response.json(),
                Verdict::RefreshAndRetry => {
                    error!("Server responded with error code: {}", response.status);
                    info!("Trying to refresh token ...");
                    self.refresh_token().await?;
                    attempt = Attempt::Retry;
                }
                Verdict::Fail => {
                    error!("Server responded with error code: {}", response.status);
                    if response.status == reqwest::StatusCode::UNAUTHORIZED {
                        warn!("Not refreshing token again");
                    }
                    return Err(server_error(&response));
                }
            }
        }
    }
}
