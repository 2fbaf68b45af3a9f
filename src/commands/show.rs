use anyhow::{Context, Result};
use serde_json::json;
use std::io::Write;

use super::NetworkStore;

/// Print a network and the metadata the server keeps for it
#[tracing::instrument(skip(store, out))]
pub async fn show<S: NetworkStore, W: Write>(
    store: &mut S,
    id: &str,
    out: &mut W,
) -> Result<()> {
    let network = store
        .load(id)
        .await
        .with_context(|| format!("Failed to load network '{}'", id))?;
    let metadata = store.metadata(&network).unwrap_or_default();

    let document = json!({
        "metadata": metadata,
        "json": network.value(),
    });
    writeln!(out, "{}", serde_json::to_string_pretty(&document)?)?;

    Ok(())
}
