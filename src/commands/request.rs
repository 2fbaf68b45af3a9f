use anyhow::{Context, Result};
use reqwest::Method;
use serde_json::Value;
use std::io::Write;

use super::NetworkStore;

/// HTTP methods accepted by the `request` command.
#[derive(clap::ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl From<HttpMethod> for Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
        }
    }
}

/// Parses a `key=value` query parameter.
pub fn parse_query_pair(s: &str) -> Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid query parameter '{}', expected KEY=VALUE", s)),
    }
}

/// Send a raw request and print the JSON response
#[tracing::instrument(skip(store, data, out))]
pub async fn request<S: NetworkStore, W: Write>(
    store: &mut S,
    method: HttpMethod,
    endpoint: &str,
    data: Option<&str>,
    query: &[(String, String)],
    out: &mut W,
) -> Result<()> {
    let body = data
        .map(serde_json::from_str::<Value>)
        .transpose()
        .context("Request body is not valid JSON")?;

    let response = store
        .request(method.into(), endpoint, body, query.to_vec())
        .await
        .with_context(|| format!("Request to '{}' failed", endpoint))?;

    writeln!(out, "{}", serde_json::to_string_pretty(&response)?)?;
    Ok(())
}
