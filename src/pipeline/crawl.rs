// src/pipeline/crawl.rs

//! Product crawl pipeline.
//!
//! Fully sequential: one category, one page, one request in flight. The
//! category visitation order is shuffled per run and the inter-page sleep is
//! jittered, both from an injected RNG so tests can pin the behavior down.

use std::time::Duration;

use chrono::{DateTime, Utc};
use rand::Rng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;

use crate::error::Result;
use crate::models::Config;
use crate::models::catalog;
use crate::services::{PageFetcher, transform};
use crate::storage::{ProductStore, UpsertOutcome};

/// Summary of a crawl run.
#[derive(Debug, Clone)]
pub struct CrawlStats {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub categories: usize,
    pub pages_fetched: usize,
    pub page_failures: usize,
    pub products_seen: usize,
    pub inserted: usize,
    pub updated: usize,
    pub dropped: usize,
}

/// Run the product crawler over all priority categories.
///
/// Transient page failures are logged and skipped; the category simply loses
/// the rest of its page budget. An authentication failure aborts the whole
/// run immediately — there is no point continuing once the session cookie is
/// dead, and hammering the endpoint anyway only draws attention.
pub async fn run_crawler(
    config: &Config,
    fetcher: &dyn PageFetcher,
    store: &dyn ProductStore,
    rng: &mut StdRng,
) -> Result<CrawlStats> {
    let start_time = Utc::now();

    let mut slugs = catalog::priority_slugs();
    slugs.shuffle(rng);
    let verticals = catalog::parent_categories();

    log::info!("Crawling {} priority categories", slugs.len());

    let mut stats = CrawlStats {
        start_time,
        end_time: start_time,
        categories: slugs.len(),
        pages_fetched: 0,
        page_failures: 0,
        products_seen: 0,
        inserted: 0,
        updated: 0,
        dropped: 0,
    };

    for slug in &slugs {
        for page in 1..=config.scraper.pages_per_category {
            let fetched = fetcher.fetch_page(slug, page).await;

            let page_data = match fetched {
                Ok(page_data) => page_data,
                Err(e) if e.is_fatal() => {
                    log::error!("Session rejected while crawling '{slug}'; aborting run");
                    return Err(e);
                }
                Err(e) => {
                    log::warn!("Skipping '{slug}' page {page}: {e}");
                    stats.page_failures += 1;
                    break;
                }
            };

            stats.pages_fetched += 1;

            if page_data.is_empty() {
                log::debug!("'{slug}' exhausted at page {page}");
                break;
            }

            if let Some(info) = &page_data.page_info {
                log::debug!(
                    "'{slug}' page {page}: {} nodes (server reports {:?} total)",
                    page_data.nodes.len(),
                    info.total
                );
            }

            for node in &page_data.nodes {
                stats.products_seen += 1;
                match transform(node, slug, &verticals, Utc::now()) {
                    Some(record) => match store.upsert(record).await? {
                        UpsertOutcome::Inserted => stats.inserted += 1,
                        UpsertOutcome::Updated => stats.updated += 1,
                    },
                    None => stats.dropped += 1,
                }
            }

            throttle(config, rng).await;
        }
    }

    stats.end_time = Utc::now();
    log::info!(
        "Crawl done: {} pages, {} products ({} inserted, {} updated, {} dropped), {} page failures",
        stats.pages_fetched,
        stats.products_seen,
        stats.inserted,
        stats.updated,
        stats.dropped,
        stats.page_failures
    );

    Ok(stats)
}

/// Sleep a randomized duration between page fetches.
async fn throttle(config: &Config, rng: &mut StdRng) {
    let (min, max) = (config.scraper.sleep_min_ms, config.scraper.sleep_max_ms);
    if max == 0 {
        return;
    }
    let millis = rng.gen_range(min..=max);
    tokio::time::sleep(Duration::from_millis(millis)).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use rand::SeedableRng;

    use crate::error::AppError;
    use crate::models::{DiscoveryNode, Media, ProductRecord, StoredProduct};
    use crate::services::DiscoveryPage;

    fn test_config() -> Config {
        let mut config = Config::default();
        config.scraper.sleep_min_ms = 0;
        config.scraper.sleep_max_ms = 0;
        config
    }

    fn node(id: &str) -> DiscoveryNode {
        DiscoveryNode {
            id: Some(id.to_string()),
            title: Some(format!("Product {id}")),
            media: Some(Media {
                image_url: Some(format!("https://img/{id}.jpg?w=1")),
                ..Media::default()
            }),
            ..DiscoveryNode::default()
        }
    }

    fn imageless_node(id: &str) -> DiscoveryNode {
        DiscoveryNode {
            id: Some(id.to_string()),
            ..DiscoveryNode::default()
        }
    }

    /// Serves one canned page per category; everything else is empty.
    struct StubFetcher {
        pages: HashMap<String, Vec<DiscoveryNode>>,
        /// Categories that 403 (fatal) when visited
        auth_fail_on: Vec<String>,
        visited: Mutex<Vec<String>>,
    }

    impl StubFetcher {
        fn new(pages: HashMap<String, Vec<DiscoveryNode>>) -> Self {
            Self {
                pages,
                auth_fail_on: Vec::new(),
                visited: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl PageFetcher for StubFetcher {
        async fn fetch_page(&self, slug: &str, page: u32) -> Result<DiscoveryPage> {
            self.visited.lock().unwrap().push(slug.to_string());
            if self.auth_fail_on.iter().any(|s| s == slug) {
                return Err(AppError::AuthExpired);
            }
            let nodes = if page == 1 {
                self.pages.get(slug).cloned().unwrap_or_default()
            } else {
                Vec::new()
            };
            Ok(DiscoveryPage {
                nodes,
                page_info: None,
            })
        }
    }

    /// In-memory store mirroring LocalStore's merge semantics.
    #[derive(Default)]
    struct MemStore {
        rows: Mutex<HashMap<String, StoredProduct>>,
    }

    #[async_trait]
    impl ProductStore for MemStore {
        async fn upsert(&self, record: ProductRecord) -> Result<UpsertOutcome> {
            let mut rows = self.rows.lock().unwrap();
            let next_id = rows.len() as u64 + 1;
            match rows.get_mut(&record.market_id) {
                Some(existing) => {
                    existing.merge(record);
                    Ok(UpsertOutcome::Updated)
                }
                None => {
                    rows.insert(record.market_id.clone(), StoredProduct::new(next_id, record));
                    Ok(UpsertOutcome::Inserted)
                }
            }
        }

        async fn get(&self, market_id: &str) -> Result<Option<StoredProduct>> {
            Ok(self.rows.lock().unwrap().get(market_id).cloned())
        }

        async fn count(&self) -> Result<usize> {
            Ok(self.rows.lock().unwrap().len())
        }
    }

    #[tokio::test]
    async fn full_sweep_upserts_and_completes() {
        let fetcher = StubFetcher::new(HashMap::from([
            ("sneakers".to_string(), vec![node("s1"), node("s2")]),
            ("bags".to_string(), vec![node("b1"), imageless_node("b2")]),
        ]));
        let store = MemStore::default();
        let mut rng = StdRng::seed_from_u64(7);

        let stats = run_crawler(&test_config(), &fetcher, &store, &mut rng)
            .await
            .unwrap();

        assert_eq!(stats.products_seen, 4);
        assert_eq!(stats.inserted, 3);
        assert_eq!(stats.updated, 0);
        assert_eq!(stats.dropped, 1); // b2 has no image
        assert_eq!(stats.page_failures, 0);
        assert_eq!(store.count().await.unwrap(), 3);

        // Every priority category was visited exactly once (page budget 1).
        let visited = fetcher.visited.lock().unwrap();
        assert_eq!(visited.len(), catalog::priority_slugs().len());
    }

    #[tokio::test]
    async fn auth_failure_aborts_the_run_immediately() {
        let slugs = catalog::priority_slugs();
        let mut rng = StdRng::seed_from_u64(42);
        // Pin the visitation order so the failing category is known.
        let mut order = slugs.clone();
        order.shuffle(&mut rng);
        let failing = order[1].clone();

        let mut fetcher = StubFetcher::new(HashMap::new());
        fetcher.auth_fail_on.push(failing);
        let store = MemStore::default();

        let mut run_rng = StdRng::seed_from_u64(42);
        let result = run_crawler(&test_config(), &fetcher, &store, &mut run_rng).await;

        assert!(matches!(result, Err(AppError::AuthExpired)));
        // Stopped at the second category; no further ones attempted.
        assert_eq!(fetcher.visited.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn transient_failure_skips_category_and_continues() {
        struct FlakyFetcher {
            visited: Mutex<Vec<String>>,
        }

        #[async_trait]
        impl PageFetcher for FlakyFetcher {
            async fn fetch_page(&self, slug: &str, _page: u32) -> Result<DiscoveryPage> {
                self.visited.lock().unwrap().push(slug.to_string());
                if slug == "sneakers" {
                    return Err(AppError::fetch(slug, "HTTP 500"));
                }
                Ok(DiscoveryPage::default())
            }
        }

        let fetcher = FlakyFetcher {
            visited: Mutex::new(Vec::new()),
        };
        let store = MemStore::default();
        let mut rng = StdRng::seed_from_u64(3);

        let stats = run_crawler(&test_config(), &fetcher, &store, &mut rng)
            .await
            .unwrap();

        assert_eq!(stats.page_failures, 1);
        assert_eq!(
            fetcher.visited.lock().unwrap().len(),
            catalog::priority_slugs().len()
        );
    }

    #[tokio::test]
    async fn rerun_produces_no_net_growth() {
        let fetcher = StubFetcher::new(HashMap::from([(
            "sneakers".to_string(),
            vec![node("s1"), node("s2")],
        )]));
        let store = MemStore::default();

        let mut rng = StdRng::seed_from_u64(1);
        let first = run_crawler(&test_config(), &fetcher, &store, &mut rng)
            .await
            .unwrap();
        let count_after_first = store.count().await.unwrap();

        let mut rng = StdRng::seed_from_u64(2);
        let second = run_crawler(&test_config(), &fetcher, &store, &mut rng)
            .await
            .unwrap();

        assert_eq!(first.inserted, 2);
        assert_eq!(second.inserted, 0);
        assert_eq!(second.updated, 2);
        assert_eq!(store.count().await.unwrap(), count_after_first);
    }

    #[tokio::test]
    async fn shuffle_is_deterministic_under_a_fixed_seed() {
        let fetcher_a = StubFetcher::new(HashMap::new());
        let fetcher_b = StubFetcher::new(HashMap::new());
        let store = MemStore::default();

        let mut rng = StdRng::seed_from_u64(99);
        run_crawler(&test_config(), &fetcher_a, &store, &mut rng)
            .await
            .unwrap();
        let mut rng = StdRng::seed_from_u64(99);
        run_crawler(&test_config(), &fetcher_b, &store, &mut rng)
            .await
            .unwrap();

        assert_eq!(
            *fetcher_a.visited.lock().unwrap(),
            *fetcher_b.visited.lock().unwrap()
        );
    }
}
