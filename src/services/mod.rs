// src/services/mod.rs

//! Crawl services: the browse-API client and the record transformer.

pub mod fetch;
pub mod transform;

pub use fetch::{DiscoveryPage, FetchClient, PageFetcher};
pub use transform::transform;
