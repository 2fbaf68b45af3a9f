//! Client for Thomas' RESTful API, a service that stores Bayesian network
//! models as JSON documents.
//!
//! ```no_run
//! use thomas_client::{Client, ClientConfig};
//!
//! # async fn run() -> thomas_client::Result<()> {
//! let mut client: Client = Client::new(ClientConfig::new("http://localhost:5000"))?;
//! client.authenticate("alice", "secret").await?;
//!
//! println!("{}", client.list_networks().await?);
//!
//! let network = client.load("asia").await?;
//! client.save(&network).await?;
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod commands;
pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod session;
pub mod table;

pub use client::Client;
pub use config::ClientConfig;
pub use error::{ClientError, Result};
pub use http::Attempt;
pub use model::{JsonNetwork, Metadata, Model, Tracked};
pub use session::{Session, SessionState};
pub use table::Table;
