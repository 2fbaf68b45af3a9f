//! HTTP exchange and the refresh-and-retry policy around it.

mod client;
mod retry;

pub use client::{HttpClient, RawResponse};
pub use retry::{Attempt, Verdict, classify, is_failure, server_error};
