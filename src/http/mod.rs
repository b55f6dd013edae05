//! HTTP client module with status classification and typed fetch errors.

mod client;
mod error;
mod status;

pub use client::HttpClient;
pub use error::FetchError;
pub use status::{StatusError, classify_status};
