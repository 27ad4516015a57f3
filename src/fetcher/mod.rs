//! Retrieval of page HTML for analysis when the page is addressed by URL.

pub mod client;
pub mod errors;
pub mod pipeline;
pub mod types;

pub use client::fetch;
pub use errors::FetchError;
pub use types::{Charset, PageResponse};
