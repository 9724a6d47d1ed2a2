// src/services/fetch.rs

//! Marketplace browse-API client.
//!
//! Issues one paginated `getDiscoveryData` GraphQL query per call, with
//! headers impersonating a desktop browser session. All session state lives
//! in [`Config`]; nothing is read from the environment at request time.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};

use crate::error::{AppError, Result};
use crate::models::{Config, DiscoveryNode, DiscoveryResponse, PageInfo};

/// The browse query document, trimmed to the fields the pipeline consumes.
const DISCOVERY_QUERY: &str = r#"query getDiscoveryData($country: String!, $currencyCode: CurrencyCode, $filters: [BrowseFilterInput], $flow: BrowseFlow, $market: String, $page: BrowsePageInput, $sort: BrowseSortInput) {
  browse(country: $country, currencyCode: $currencyCode, filters: $filters, flow: $flow, market: $market, page: $page, sort: $sort) {
    results {
      edges {
        node {
          ... on Product {
            id
            title
            brand
            urlKey
            productCategory
            description
            gender
            media {
              imageUrl
              smallImageUrl
              thumbUrl
            }
            traits {
              name
              value
            }
            market(currencyCode: $currencyCode) {
              state {
                lowestAsk {
                  amount
                }
              }
            }
          }
        }
      }
      pageInfo {
        limit
        page
        pageCount
        total
      }
    }
  }
}"#;

/// One decoded page of browse results.
#[derive(Debug, Default)]
pub struct DiscoveryPage {
    pub nodes: Vec<DiscoveryNode>,
    pub page_info: Option<PageInfo>,
}

impl DiscoveryPage {
    /// True when the server returned no edges: the normal end-of-data signal.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

/// Seam for the orchestrator: one category page per call.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page (1-based) of a category's browse results.
    async fn fetch_page(&self, slug: &str, page: u32) -> Result<DiscoveryPage>;
}

/// HTTP client for the marketplace browse endpoint.
pub struct FetchClient {
    config: Arc<Config>,
    client: Client,
}

impl FetchClient {
    /// Build a client with the spoofed browser headers and session cookie.
    pub fn new(config: Arc<Config>) -> Result<Self> {
        let headers = build_headers(&config)?;
        let client = Client::builder()
            .user_agent(&config.scraper.user_agent)
            .timeout(Duration::from_secs(config.scraper.timeout_secs))
            .default_headers(headers)
            .build()?;

        Ok(Self { config, client })
    }

    /// Request body for one category page.
    fn request_body(&self, slug: &str, page: u32) -> serde_json::Value {
        let q = &self.config.query;
        serde_json::json!({
            "operationName": "getDiscoveryData",
            "variables": {
                "country": q.country,
                "currencyCode": q.currency,
                "filters": [{ "id": "category", "selectedValues": [slug] }],
                "flow": "CATEGORY",
                "market": q.market,
                "page": { "index": page, "limit": self.config.scraper.page_limit },
                "sort": { "id": q.sort },
            },
            "query": DISCOVERY_QUERY,
        })
    }
}

#[async_trait]
impl PageFetcher for FetchClient {
    async fn fetch_page(&self, slug: &str, page: u32) -> Result<DiscoveryPage> {
        let body = self.request_body(slug, page);
        let response = self
            .client
            .post(&self.config.scraper.endpoint)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::FORBIDDEN {
            // The session cookie no longer passes; every further request
            // would fail the same way. Fatal for the whole run.
            return Err(AppError::AuthExpired);
        }
        if !status.is_success() {
            return Err(AppError::fetch(slug, format!("HTTP {status} on page {page}")));
        }

        let decoded: DiscoveryResponse = response
            .json()
            .await
            .map_err(|e| AppError::fetch(slug, format!("decode failure on page {page}: {e}")))?;

        let page_info = decoded.page_info().cloned();
        Ok(DiscoveryPage {
            nodes: decoded.into_nodes(),
            page_info,
        })
    }
}

/// Build the spoofed browse-session header set.
///
/// The device identifier is extracted from the session cookie string; it is
/// simply absent (along with the cookie header) when no cookie is
/// configured, in which case the server answers with the auth failure the
/// orchestrator aborts on.
fn build_headers(config: &Config) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert("accept", HeaderValue::from_static("application/json"));
    headers.insert(
        "accept-language",
        HeaderValue::from_static("en-US,en;q=0.9"),
    );
    headers.insert(
        "apollographql-client-name",
        HeaderValue::from_static("Iron"),
    );
    headers.insert("origin", HeaderValue::from_static("https://stockx.com"));
    headers.insert("referer", HeaderValue::from_static("https://stockx.com/"));

    let cookie = config.session.cookie.trim();
    if !cookie.is_empty() {
        headers.insert(
            "cookie",
            HeaderValue::from_str(cookie)
                .map_err(|e| AppError::config(format!("session cookie is not a valid header: {e}")))?,
        );

        if let Some(device_id) = extract_cookie_value(cookie, &config.session.device_id_cookie_key)
        {
            headers.insert(
                HeaderName::from_static("x-stockx-device-id"),
                HeaderValue::from_str(&device_id).map_err(|e| {
                    AppError::config(format!("device id is not a valid header: {e}"))
                })?,
            );
        } else {
            log::warn!(
                "Cookie carries no '{}' entry; requests go out without a device id",
                config.session.device_id_cookie_key
            );
        }
    }

    Ok(headers)
}

/// Pull a single value out of a "k1=v1; k2=v2" cookie string.
pub fn extract_cookie_value(cookie: &str, key: &str) -> Option<String> {
    cookie.split(';').find_map(|pair| {
        let (k, v) = pair.split_once('=')?;
        (k.trim() == key).then(|| v.trim().to_string())
    })
}
