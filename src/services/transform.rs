// src/services/transform.rs

//! Raw node → product record normalization.
//!
//! Pure functions only: no I/O, no clock reads. The caller supplies the
//! timestamp and the parent-category lookup.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use url::Url;

use crate::models::catalog;
use crate::models::{DiscoveryNode, ProductRecord, Trait};

/// Vertical recorded for categories missing from the parent map.
const FALLBACK_VERTICAL: &str = "Other";

/// CDN template for the rotated front view. Only valid for footwear.
const FRONT_IMAGE_TEMPLATE: &str = "https://images.stockx.com/360/{slug}/Images/{slug}/Lv2/img10.jpg";

/// Normalize a raw browse node into a persistable record.
///
/// Returns `None` when the node carries no usable primary image or no
/// marketplace id; such records are dropped, not retried.
pub fn transform(
    node: &DiscoveryNode,
    category_slug: &str,
    verticals: &HashMap<String, String>,
    now: DateTime<Utc>,
) -> Option<ProductRecord> {
    let market_id = node.id.as_deref()?.to_string();

    let image_url = match primary_image(node) {
        Some(url) => url,
        None => {
            log::debug!("Dropping {market_id}: no usable image");
            return None;
        }
    };

    let front_image_url = front_image_url(&image_url, category_slug);

    let parent_category = verticals
        .get(category_slug)
        .cloned()
        .unwrap_or_else(|| FALLBACK_VERTICAL.to_string());

    Some(ProductRecord {
        market_id,
        title: node.title.clone().unwrap_or_default(),
        brand: node.brand.clone().unwrap_or_default(),
        category: category_slug.to_string(),
        parent_category,
        image_url,
        front_image_url,
        url_key: node.url_key.clone().unwrap_or_default(),
        lowest_ask: node.lowest_ask(),
        description: node.description.clone().unwrap_or_default(),
        gender: node.gender.clone().unwrap_or_default(),
        release_date: trait_string(&node.traits, "Release Date"),
        retail_price: trait_number(&node.traits, "Retail Price"),
        created_at: now,
        updated_at: now,
    })
}

/// Pick the best available image URL and strip its query string.
///
/// Priority: full image, then small image, then thumbnail.
fn primary_image(node: &DiscoveryNode) -> Option<String> {
    let media = node.media.as_ref()?;
    let raw = media
        .image_url
        .as_deref()
        .or(media.small_image_url.as_deref())
        .or(media.thumb_url.as_deref())?;
    Some(clean_image_url(raw))
}

/// Strip any query-string suffix from an image URL.
pub fn clean_image_url(raw: &str) -> String {
    match raw.split_once('?') {
        Some((base, _)) => base.to_string(),
        None => raw.to_string(),
    }
}

/// Derive the front/360 CDN URL from a cleaned image URL.
///
/// Only footwear categories get a front view. The CDN keys the 360 set by
/// the image's file stem minus the trailing "-Product" marker.
pub fn front_image_url(clean_url: &str, category_slug: &str) -> Option<String> {
    if !catalog::is_footwear(category_slug) {
        return None;
    }

    let parsed = Url::parse(clean_url).ok()?;
    let file = parsed.path_segments()?.next_back()?;
    if file.is_empty() {
        return None;
    }

    let stem = file.rsplit_once('.').map_or(file, |(stem, _)| stem);
    let slug = stem.strip_suffix("-Product").unwrap_or(stem);
    if slug.is_empty() {
        return None;
    }

    Some(FRONT_IMAGE_TEMPLATE.replace("{slug}", slug))
}

/// First trait with the given name, as a string.
fn trait_string(traits: &[Trait], name: &str) -> Option<String> {
    find_trait(traits, name)?.as_str().map(str::to_string)
}

/// First trait with the given name, as a number. String-encoded numbers
/// ("180") are accepted too.
fn trait_number(traits: &[Trait], name: &str) -> Option<f64> {
    let value = find_trait(traits, name)?;
    value
        .as_f64()
        .or_else(|| value.as_str().and_then(|s| s.trim().parse().ok()))
}

/// First matching trait value; duplicates beyond the first are ignored.
fn find_trait<'a>(traits: &'a [Trait], name: &str) -> Option<&'a serde_json::Value> {
    traits
        .iter()
        .find(|t| t.name.as_deref() == Some(name))?
        .value
        .as_ref()
}
