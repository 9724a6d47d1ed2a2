// src/models/discovery.rs

//! Wire types for the marketplace `getDiscoveryData` GraphQL response.
//!
//! Every field is optional: the browse API routinely omits nested objects,
//! so nothing here trusts the shape. Presence is checked at each access
//! point in the transformer.

use serde::Deserialize;

/// Top-level GraphQL response envelope.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscoveryResponse {
    pub data: Option<DiscoveryData>,
}

impl DiscoveryResponse {
    /// Flatten the envelope into the list of product nodes.
    pub fn into_nodes(self) -> Vec<DiscoveryNode> {
        self.results()
            .map(|r| r.edges)
            .unwrap_or_default()
            .into_iter()
            .filter_map(|edge| edge.node)
            .collect()
    }

    /// Pagination metadata as reported by the server. Not trustworthy; the
    /// orchestrator only acts on empty edge lists.
    pub fn page_info(&self) -> Option<&PageInfo> {
        self.data
            .as_ref()?
            .browse
            .as_ref()?
            .results
            .as_ref()?
            .page_info
            .as_ref()
    }

    fn results(self) -> Option<BrowseResults> {
        self.data?.browse?.results
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct DiscoveryData {
    pub browse: Option<Browse>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Browse {
    pub results: Option<BrowseResults>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct BrowseResults {
    #[serde(default)]
    pub edges: Vec<Edge>,

    pub page_info: Option<PageInfo>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Edge {
    pub node: Option<DiscoveryNode>,
}

/// Server-reported pagination metadata.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub limit: Option<u32>,
    pub page: Option<u32>,
    pub page_count: Option<u32>,
    pub total: Option<u64>,
}

/// A single raw product node from the browse results.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct DiscoveryNode {
    /// Immutable marketplace item identifier
    pub id: Option<String>,
    pub title: Option<String>,
    pub brand: Option<String>,
    pub url_key: Option<String>,
    pub product_category: Option<String>,
    pub description: Option<String>,
    pub gender: Option<String>,
    pub media: Option<Media>,

    #[serde(default)]
    pub traits: Vec<Trait>,

    pub market: Option<Market>,
}

impl DiscoveryNode {
    /// Current lowest ask, when the market snapshot carries one.
    pub fn lowest_ask(&self) -> Option<f64> {
        self.market
            .as_ref()?
            .state
            .as_ref()?
            .lowest_ask
            .as_ref()?
            .amount
    }
}

/// Product image variants, in descending quality.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct Media {
    pub image_url: Option<String>,
    pub small_image_url: Option<String>,
    pub thumb_url: Option<String>,
}

/// A name/value product trait (release date, retail price, colorway, ...).
///
/// Values arrive as strings or bare numbers depending on the trait, hence
/// the loose [`serde_json::Value`].
#[derive(Debug, Clone, Deserialize, Default)]
pub struct Trait {
    pub name: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct Market {
    pub state: Option<MarketState>,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct MarketState {
    pub lowest_ask: Option<LowestAsk>,
}

#[derive(Debug, Clone, Deserialize, Default)]
pub struct LowestAsk {
    pub amount: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_a_full_response() {
        let json = r#"{
            "data": { "browse": { "results": {
                "edges": [
                    { "node": {
                        "id": "prod-1",
                        "title": "Jordan 1 Retro High",
                        "brand": "Jordan",
                        "urlKey": "air-jordan-1-retro-high",
                        "productCategory": "sneakers",
                        "gender": "men",
                        "media": { "imageUrl": "https://img/a.jpg?w=300" },
                        "traits": [
                            { "name": "Release Date", "value": "2023-11-04" },
                            { "name": "Retail Price", "value": 180 }
                        ],
                        "market": { "state": { "lowestAsk": { "amount": 212.5 } } }
                    } },
                    { "node": null }
                ],
                "pageInfo": { "limit": 40, "page": 1, "pageCount": 25, "total": 1000 }
            } } }
        }"#;

        let resp: DiscoveryResponse = serde_json::from_str(json).unwrap();
        assert_eq!(resp.page_info().and_then(|p| p.page_count), Some(25));

        let nodes = resp.into_nodes();
        assert_eq!(nodes.len(), 1);
        assert_eq!(nodes[0].id.as_deref(), Some("prod-1"));
        assert_eq!(nodes[0].lowest_ask(), Some(212.5));
    }

    #[test]
    fn tolerates_missing_everything() {
        let resp: DiscoveryResponse = serde_json::from_str("{}").unwrap();
        assert!(resp.page_info().is_none());
        assert!(resp.into_nodes().is_empty());

        let node: DiscoveryNode = serde_json::from_str("{}").unwrap();
        assert!(node.lowest_ask().is_none());
        assert!(node.media.is_none());
    }
}
