//! Network resources: listing, loading and saving models.

use log::{debug, info};
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;

use super::Client;
use crate::error::{ClientError, Result};
use crate::model::{Metadata, Model, Tracked};
use crate::table::Table;

/// Collection endpoint for networks.
pub const NETWORKS_ENDPOINT: &str = "network";

/// Columns kept by [`Client::list_networks`] when the server provides them.
pub const SUMMARY_COLUMNS: [&str; 3] = ["id", "name", "owner"];

/// Body of `POST /network` and `POST /network/{id}`.
#[derive(Serialize, Debug)]
struct Resource<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
    name: Option<String>,
    json: Value,
}

impl<'a> Resource<'a> {
    fn from_model<M: Model>(model: &M, id: Option<&'a str>) -> Self {
        Self {
            id,
            name: model.name(),
            json: model.as_dict(),
        }
    }
}

impl<M: Model> Client<M> {
    /// Lists the networks available on the server.
    ///
    /// The table is reduced to `id`, `name` and `owner`; if the server does
    /// not provide all three, the full table is returned instead.
    #[tracing::instrument(skip(self))]
    pub async fn list_networks(&mut self) -> Result<Table> {
        let data = self
            .request(NETWORKS_ENDPOINT, None, Method::GET, &[])
            .await?;
        let table = Table::from_records(data)?;

        match table.select(&SUMMARY_COLUMNS) {
            Some(summary) => Ok(summary),
            None => {
                debug!(
                    "Listing lacks one of {:?}, returning all columns",
                    SUMMARY_COLUMNS
                );
                Ok(table)
            }
        }
    }

    /// Loads a network from the server and remembers its metadata.
    #[tracing::instrument(skip(self))]
    pub async fn load(&mut self, id: &str) -> Result<Tracked<M>> {
        let response = self
            .request(&format!("{}/{}", NETWORKS_ENDPOINT, id), None, Method::GET, &[])
            .await?;

        let (json, metadata) = Metadata::split_resource(response)?;
        let json = json.ok_or_else(|| {
            ClientError::UnexpectedResponse(format!("network '{}' has no json field", id))
        })?;

        let model = M::from_dict(json).map_err(|e| ClientError::Model(Box::new(e)))?;
        let model = Tracked::new(model);
        self.metadata.insert(&model, metadata);

        info!("Loaded network '{}'", id);
        Ok(model)
    }

    /// Saves a copy of `model` on the server under `target_id`.
    ///
    /// The copy is returned and carries the server's metadata; `model` and
    /// whatever metadata it had are left untouched.
    #[tracing::instrument(skip(self, model))]
    pub async fn save_as(&mut self, model: &Tracked<M>, target_id: &str) -> Result<Tracked<M>> {
        let copy = model.duplicate();
        let resource = Resource::from_model(&*copy, Some(target_id));

        let metadata = self
            .post_resource(&format!("/{}", NETWORKS_ENDPOINT), &resource)
            .await?;
        self.metadata.insert(&copy, metadata);

        info!("Saved network as '{}'", target_id);
        Ok(copy)
    }

    /// Saves `model` on the server.
    ///
    /// A model that was loaded or saved before is updated under its id;
    /// otherwise a new network is created and the id assigned by the server
    /// is remembered for the next save.
    #[tracing::instrument(skip(self, model))]
    pub async fn save(&mut self, model: &Tracked<M>) -> Result<()> {
        let id = self.metadata.get(model).and_then(Metadata::id);

        let endpoint = match &id {
            Some(id) => format!("/{}/{}", NETWORKS_ENDPOINT, id),
            None => format!("/{}", NETWORKS_ENDPOINT),
        };
        debug!("Saving network to {}", endpoint);

        let resource = Resource::from_model(&**model, None);
        let metadata = self.post_resource(&endpoint, &resource).await?;
        self.metadata.insert(model, metadata);

        Ok(())
    }

    /// Server-side attributes remembered for this model instance.
    pub fn metadata(&self, model: &Tracked<M>) -> Option<&Metadata> {
        self.metadata.get(model)
    }

    /// Drops the metadata remembered for this model instance.
    pub fn forget(&mut self, model: &Tracked<M>) -> Option<Metadata> {
        self.metadata.remove(model)
    }

    async fn post_resource(
        &mut self,
        endpoint: &str,
        resource: &Resource<'_>,
    ) -> Result<Metadata> {
        let body = serde_json::to_value(resource)?;
        let response = self
            .request(endpoint, Some(&body), Method::POST, &[])
            .await?;

        let (_, metadata) = Metadata::split_resource(response)?;
        Ok(metadata)
    }
}
