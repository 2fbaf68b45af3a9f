//! Commands of the `thomas` binary.
//!
//! Commands talk to the server through [`NetworkStore`] and write their
//! output to the given writer.

pub mod config;
mod list;
mod push;
mod request;
mod show;
mod store;

pub use config::{Options, connect};
pub use list::list;
pub use push::{push, read_network};
pub use request::{HttpMethod, parse_query_pair, request};
pub use show::show;
pub use store::NetworkStore;

#[cfg(test)]
pub use store::MockNetworkStore;
