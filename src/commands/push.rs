use anyhow::{Context, Result};
use log::info;
use serde_json::Value;
use std::io::Write;
use std::path::Path;

use super::NetworkStore;
use crate::model::{JsonNetwork, Model, Tracked};

/// Read a serialized network from a file.
pub fn read_network(path: &Path) -> Result<JsonNetwork> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("Failed to parse {} as JSON", path.display()))?;
    let network = JsonNetwork::from_dict(value)
        .with_context(|| format!("{} does not contain a network", path.display()))?;
    Ok(network)
}

/// Upload a network file, as a new network or under the given id
#[tracing::instrument(skip(store, out))]
pub async fn push<S: NetworkStore, W: Write>(
    store: &mut S,
    path: &Path,
    save_as: Option<&str>,
    out: &mut W,
) -> Result<()> {
    let network = Tracked::new(read_network(path)?);

    let metadata = match save_as {
        Some(id) => {
            let (_, metadata) = store
                .save_as(&network, id)
                .await
                .with_context(|| format!("Failed to save network as '{}'", id))?;
            metadata
        }
        None => store
            .save(&network)
            .await
            .context("Failed to save network")?,
    };

    info!(
        "Saved {} as '{}'",
        path.display(),
        metadata.id().unwrap_or_default()
    );
    writeln!(out, "{}", serde_json::to_string_pretty(&metadata)?)?;

    Ok(())
}
