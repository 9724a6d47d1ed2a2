//! Pipeline entry points for crawler operations.
//!
//! - `run_crawler`: sweep the priority categories and upsert every product

pub mod crawl;

pub use crawl::{CrawlStats, run_crawler};
