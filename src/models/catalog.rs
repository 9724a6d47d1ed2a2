// src/models/catalog.rs

//! Static marketplace category catalog.
//!
//! Mirrors the marketplace's browse taxonomy. Defined once at process start
//! and never mutated; both the crawl worklist and the filter taxonomy the
//! CLI exposes are derived from it on demand.

use std::collections::{HashMap, HashSet};
use std::sync::LazyLock;

use crate::models::category::{
    CategoryNode, build_parent_category_map, collect_priority_leaf_slugs,
};

/// Leaf slugs considered sellable and worth crawling.
///
/// Entries with no matching leaf in the tree are dead weight, not errors.
pub const PRIORITY_CATEGORIES: &[&str] = &[
    "sneakers",
    "boots",
    "sandals",
    "dress-shoes",
    "cleats",
    "t-shirts",
    "hoodies",
    "sweatshirts",
    "jackets",
    "coats",
    "jeans",
    "pants",
    "shorts",
    "hats",
    "bags",
    "belts",
    "sunglasses",
    "watches",
    "jewelry",
    "figures",
    "trading-cards",
    "skateboards",
];

/// Leaf slugs for which a front/360 CDN image can be derived.
pub const FOOTWEAR_CATEGORIES: &[&str] =
    &["sneakers", "boots", "sandals", "slides", "dress-shoes", "cleats"];

/// The canonical category forest.
pub static CATEGORY_TREE: LazyLock<Vec<CategoryNode>> = LazyLock::new(build_tree);

fn build_tree() -> Vec<CategoryNode> {
    vec![
        CategoryNode::branch(
            "Shoes",
            "shoes",
            vec![
                CategoryNode::leaf("Sneakers", "sneakers"),
                CategoryNode::leaf("Boots", "boots"),
                CategoryNode::leaf("Sandals", "sandals"),
                CategoryNode::leaf("Slides", "slides"),
                CategoryNode::leaf("Dress Shoes", "dress-shoes"),
                CategoryNode::leaf("Cleats", "cleats"),
            ],
        ),
        CategoryNode::branch(
            "Apparel",
            "apparel",
            vec![
                CategoryNode::branch(
                    "Tops",
                    "tops",
                    vec![
                        CategoryNode::leaf("T-Shirts", "t-shirts"),
                        CategoryNode::leaf("Hoodies", "hoodies"),
                        CategoryNode::leaf("Sweatshirts", "sweatshirts"),
                        CategoryNode::leaf("Shirts", "shirts"),
                    ],
                ),
                CategoryNode::branch(
                    "Bottoms",
                    "bottoms",
                    vec![
                        CategoryNode::leaf("Jeans", "jeans"),
                        CategoryNode::leaf("Pants", "pants"),
                        CategoryNode::leaf("Shorts", "shorts"),
                        CategoryNode::leaf("Skirts", "skirts"),
                    ],
                ),
                CategoryNode::branch(
                    "Outerwear",
                    "outerwear",
                    vec![
                        CategoryNode::leaf("Jackets", "jackets"),
                        CategoryNode::leaf("Coats", "coats"),
                        CategoryNode::leaf("Vests", "vests"),
                    ],
                ),
            ],
        ),
        CategoryNode::branch(
            "Accessories",
            "accessories",
            vec![
                CategoryNode::leaf("Hats", "hats"),
                CategoryNode::leaf("Bags", "bags"),
                CategoryNode::leaf("Belts", "belts"),
                CategoryNode::leaf("Sunglasses", "sunglasses"),
                CategoryNode::leaf("Watches", "watches"),
                CategoryNode::leaf("Jewelry", "jewelry"),
                CategoryNode::leaf("Scarves", "scarves"),
                CategoryNode::leaf("Socks", "socks"),
            ],
        ),
        CategoryNode::branch(
            "Collectibles",
            "collectibles",
            vec![
                CategoryNode::leaf("Figures", "figures"),
                CategoryNode::leaf("Trading Cards", "trading-cards"),
                CategoryNode::leaf("Skateboards", "skateboards"),
                CategoryNode::leaf("Posters", "posters"),
            ],
        ),
        CategoryNode::branch(
            "Electronics",
            "electronics",
            vec![
                CategoryNode::leaf("Gaming Consoles", "gaming-consoles"),
                CategoryNode::leaf("Headphones", "headphones"),
            ],
        ),
    ]
}

/// Ordered crawl worklist: allow-listed leaf slugs in tree traversal order.
///
/// Deterministic and cheap; called both by the CLI taxonomy listing and by
/// the crawl orchestrator (which shuffles its own copy).
pub fn priority_slugs() -> Vec<String> {
    let allow: HashSet<&str> = PRIORITY_CATEGORIES.iter().copied().collect();
    collect_priority_leaf_slugs(&CATEGORY_TREE, &allow)
}

/// Slug → top-level vertical name lookup for every category in the tree.
pub fn parent_categories() -> HashMap<String, String> {
    build_parent_category_map(&CATEGORY_TREE)
}

/// True when the slug belongs to a footwear category.
pub fn is_footwear(slug: &str) -> bool {
    FOOTWEAR_CATEGORIES.contains(&slug)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_slugs_are_leaves_of_the_tree() {
        let verticals = parent_categories();
        for slug in priority_slugs() {
            assert!(verticals.contains_key(&slug), "unknown slug {slug}");
        }
    }

    #[test]
    fn priority_slugs_follow_tree_order() {
        let slugs = priority_slugs();
        // Shoes come before Apparel in the tree, regardless of allow-set order.
        let sneakers = slugs.iter().position(|s| s == "sneakers").unwrap();
        let tshirts = slugs.iter().position(|s| s == "t-shirts").unwrap();
        assert!(sneakers < tshirts);
    }

    #[test]
    fn priority_slugs_are_idempotent() {
        assert_eq!(priority_slugs(), priority_slugs());
    }

    #[test]
    fn deep_leaves_map_to_their_vertical() {
        let verticals = parent_categories();
        assert_eq!(verticals.get("t-shirts").map(String::as_str), Some("Apparel"));
        assert_eq!(verticals.get("jeans").map(String::as_str), Some("Apparel"));
        assert_eq!(verticals.get("sneakers").map(String::as_str), Some("Shoes"));
        assert_eq!(verticals.get("bags").map(String::as_str), Some("Accessories"));
    }

    #[test]
    fn footwear_set_membership() {
        assert!(is_footwear("sneakers"));
        assert!(is_footwear("boots"));
        assert!(!is_footwear("bags"));
        assert!(!is_footwear("t-shirts"));
    }
}
