//! Thin wrapper around reqwest performing exactly one HTTP exchange per call.

use log::debug;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::config::ClientConfig;
use crate::error::Result;

/// Status and raw body of a completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Decodes the body as JSON.
    pub fn json(&self) -> Result<Value> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Decodes the body as JSON, or `None` if it is not valid JSON.
    pub fn json_lenient(&self) -> Option<Value> {
        serde_json::from_slice(&self.body).ok()
    }
}

#[derive(Clone, Debug)]
pub struct HttpClient {
    client: Client,
}

impl HttpClient {
    /// Creates a new HTTP client wrapping the given reqwest Client.
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a reqwest Client with the configured timeouts and user agent.
    pub fn from_config(config: &ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.as_str())
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .build()?;
        Ok(Self::new(client))
    }

    /// Sends one request and reads the whole response body.
    ///
    /// The status is not inspected here; any response the server produced is
    /// returned as `Ok`. Only transport failures are errors.
    #[tracing::instrument(skip(self, bearer, body))]
    pub async fn send(
        &self,
        method: Method,
        url: &str,
        bearer: Option<&str>,
        body: Option<&Value>,
        query: &[(&str, &str)],
    ) -> Result<RawResponse> {
        debug!("{} {}...", method, url);

        let mut request = self.client.request(method.clone(), url);
        if !query.is_empty() {
            request = request.query(query);
        }
        if let Some(token) = bearer {
            request = request.bearer_auth(token);
        }
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        debug!("{} {} -> {} ({} bytes)", method, url, status, body.len());

        Ok(RawResponse { status, body })
    }
}
