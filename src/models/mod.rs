// src/models/mod.rs

//! Domain models for the crawler application.
//!
//! This module contains all data structures used throughout the application,
//! organized by their primary purpose.

pub mod catalog;
mod category;
mod config;
mod discovery;
mod product;

// Re-export all public types
pub use category::{CategoryNode, build_parent_category_map, collect_priority_leaf_slugs};
pub use config::{Config, QueryConfig, SESSION_COOKIE_ENV, ScraperConfig, SessionConfig};
pub use discovery::{
    DiscoveryNode, DiscoveryResponse, LowestAsk, Market, MarketState, Media, PageInfo, Trait,
};
pub use product::{ProductRecord, StoredProduct};
