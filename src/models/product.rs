//! Normalized product record structures.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A transformed product record, ready for persistence.
///
/// Keyed by the marketplace's immutable item identifier; the storage layer
/// assigns its own row id on insert.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProductRecord {
    /// Marketplace item identifier (unique, immutable)
    pub market_id: String,

    /// Product title
    pub title: String,

    /// Brand name
    pub brand: String,

    /// Leaf category slug the product was scraped under
    pub category: String,

    /// Top-level vertical name ("Shoes", "Apparel", ...; "Other" if untagged)
    pub parent_category: String,

    /// Primary image URL, query string stripped
    pub image_url: String,

    /// Derived front/360 CDN image URL; footwear only
    pub front_image_url: Option<String>,

    /// Marketplace URL key for the product page
    pub url_key: String,

    /// Current lowest ask, in the configured currency
    pub lowest_ask: Option<f64>,

    /// Product description
    pub description: String,

    /// Gender tag ("men", "women", "unisex", ...)
    pub gender: String,

    /// "Release Date" trait, as reported
    pub release_date: Option<String>,

    /// "Retail Price" trait, as reported
    pub retail_price: Option<f64>,

    /// First-sighting timestamp
    pub created_at: DateTime<Utc>,

    /// Last-sighting timestamp
    pub updated_at: DateTime<Utc>,
}

/// A persisted product row: a [`ProductRecord`] plus the internal row id.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StoredProduct {
    /// Internally generated row id; never overwritten after insert
    pub id: u64,

    #[serde(flatten)]
    pub record: ProductRecord,
}

impl StoredProduct {
    /// Insert a fresh row from a record.
    pub fn new(id: u64, record: ProductRecord) -> Self {
        Self { id, record }
    }

    /// Merge a repeat sighting into this row.
    ///
    /// Only the mutable subset is overwritten: title, brand, category,
    /// parent category, image URLs, url key, lowest ask, description, and
    /// the updated-at timestamp. Row id, created-at, gender, release date
    /// and retail price keep their original values.
    pub fn merge(&mut self, incoming: ProductRecord) {
        let r = &mut self.record;
        r.title = incoming.title;
        r.brand = incoming.brand;
        r.category = incoming.category;
        r.parent_category = incoming.parent_category;
        r.image_url = incoming.image_url;
        r.front_image_url = incoming.front_image_url;
        r.url_key = incoming.url_key;
        r.lowest_ask = incoming.lowest_ask;
        r.description = incoming.description;
        r.updated_at = incoming.updated_at;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_record(title: &str) -> ProductRecord {
        ProductRecord {
            market_id: "prod-1".to_string(),
            title: title.to_string(),
            brand: "Jordan".to_string(),
            category: "sneakers".to_string(),
            parent_category: "Shoes".to_string(),
            image_url: "https://img/a.jpg".to_string(),
            front_image_url: None,
            url_key: "air-jordan-1".to_string(),
            lowest_ask: Some(210.0),
            description: String::new(),
            gender: "men".to_string(),
            release_date: Some("2023-11-04".to_string()),
            retail_price: Some(180.0),
            created_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn merge_preserves_immutable_fields() {
        let mut row = StoredProduct::new(7, sample_record("Old Title"));
        let original_created = row.record.created_at;

        let mut incoming = sample_record("New Title");
        incoming.gender = "women".to_string();
        incoming.release_date = Some("2099-01-01".to_string());
        incoming.retail_price = Some(1.0);
        incoming.created_at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();
        incoming.updated_at = Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap();

        row.merge(incoming);

        assert_eq!(row.id, 7);
        assert_eq!(row.record.title, "New Title");
        assert_eq!(row.record.created_at, original_created);
        assert_eq!(row.record.gender, "men");
        assert_eq!(row.record.release_date.as_deref(), Some("2023-11-04"));
        assert_eq!(row.record.retail_price, Some(180.0));
        assert_eq!(
            row.record.updated_at,
            Utc.with_ymd_and_hms(2026, 6, 1, 0, 0, 0).unwrap()
        );
    }
}
