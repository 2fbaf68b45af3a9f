use anyhow::{Context, Result};
use log::debug;
use std::io::Write;

use super::NetworkStore;

/// List the networks available on the server
#[tracing::instrument(skip(store, out))]
pub async fn list<S: NetworkStore, W: Write>(store: &mut S, out: &mut W) -> Result<()> {
    let table = store
        .list_networks()
        .await
        .context("Failed to list networks")?;

    if table.is_empty() {
        writeln!(out, "No networks found.")?;
        return Ok(());
    }

    debug!("Found {} network(s)", table.len());
    write!(out, "{}", table)?;

    Ok(())
}
