use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::client::Client;
use crate::error::Result;
use crate::model::{JsonNetwork, Metadata, Tracked};
use crate::table::Table;

/// Network operations the CLI commands need.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait NetworkStore: Send {
    async fn list_networks(&mut self) -> Result<Table>;

    async fn load(&mut self, id: &str) -> Result<Tracked<JsonNetwork>>;

    /// Saves the network and returns the metadata the server reported.
    async fn save(&mut self, network: &Tracked<JsonNetwork>) -> Result<Metadata>;

    async fn save_as(
        &mut self,
        network: &Tracked<JsonNetwork>,
        id: &str,
    ) -> Result<(Tracked<JsonNetwork>, Metadata)>;

    fn metadata(&self, network: &Tracked<JsonNetwork>) -> Option<Metadata>;

    async fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Result<Value>;
}

#[async_trait]
impl NetworkStore for Client<JsonNetwork> {
    async fn list_networks(&mut self) -> Result<Table> {
        Client::list_networks(self).await
    }

    async fn load(&mut self, id: &str) -> Result<Tracked<JsonNetwork>> {
        Client::load(self, id).await
    }

    async fn save(&mut self, network: &Tracked<JsonNetwork>) -> Result<Metadata> {
        Client::save(self, network).await?;
        Ok(Client::metadata(self, network).cloned().unwrap_or_default())
    }

    async fn save_as(
        &mut self,
        network: &Tracked<JsonNetwork>,
        id: &str,
    ) -> Result<(Tracked<JsonNetwork>, Metadata)> {
        let copy = Client::save_as(self, network, id).await?;
        let metadata = Client::metadata(self, &copy).cloned().unwrap_or_default();
        Ok((copy, metadata))
    }

    fn metadata(&self, network: &Tracked<JsonNetwork>) -> Option<Metadata> {
        Client::metadata(self, network).cloned()
    }

    async fn request(
        &mut self,
        method: Method,
        endpoint: &str,
        body: Option<Value>,
        query: Vec<(String, String)>,
    ) -> Result<Value> {
        let query: Vec<(&str, &str)> = query
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        Client::request(self, endpoint, body.as_ref(), method, &query).await
    }
}
