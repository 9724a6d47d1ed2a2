// src/models/category.rs

//! Category taxonomy tree and its traversal primitives.
//!
//! The taxonomy is a static forest of [`CategoryNode`]s. Two traversals are
//! built on it:
//!
//! - [`collect_priority_leaf_slugs`]: the ordered crawl worklist
//! - [`build_parent_category_map`]: slug → top-level vertical name lookup

use std::collections::{HashMap, HashSet};

use serde::{Deserialize, Serialize};

/// A node in the category taxonomy.
///
/// Slugs are unique across the whole forest by convention; this is not
/// validated, and a duplicate silently takes last-write-wins in the parent
/// map. A node may carry no slug at all (pure grouping node).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CategoryNode {
    /// Display name (e.g., "Apparel")
    pub name: String,

    /// Marketplace category slug (e.g., "t-shirts"); grouping nodes have none
    #[serde(default)]
    pub slug: Option<String>,

    /// Child categories, in display order
    #[serde(default)]
    pub children: Vec<CategoryNode>,
}

impl CategoryNode {
    /// Create a leaf category.
    pub fn leaf(name: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: Some(slug.into()),
            children: Vec::new(),
        }
    }

    /// Create an internal category with children.
    pub fn branch(
        name: impl Into<String>,
        slug: impl Into<String>,
        children: Vec<CategoryNode>,
    ) -> Self {
        Self {
            name: name.into(),
            slug: Some(slug.into()),
            children,
        }
    }

    /// Create a slugless grouping node.
    pub fn group(name: impl Into<String>, children: Vec<CategoryNode>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            children,
        }
    }

    /// True if this node has no children.
    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Collect the slugs of allow-listed leaves, in tree traversal order.
///
/// Depth-first pre-order: internal nodes are never emitted, and a leaf is
/// emitted only when its slug is a member of `allow`. Allow-set entries that
/// match no leaf are silently ignored.
pub fn collect_priority_leaf_slugs(
    nodes: &[CategoryNode],
    allow: &HashSet<&str>,
) -> Vec<String> {
    let mut slugs = Vec::new();
    for node in nodes {
        collect_leaves(node, allow, &mut slugs);
    }
    slugs
}

fn collect_leaves(node: &CategoryNode, allow: &HashSet<&str>, out: &mut Vec<String>) {
    if !node.is_leaf() {
        for child in &node.children {
            collect_leaves(child, allow, out);
        }
        return;
    }
    if let Some(slug) = &node.slug {
        if allow.contains(slug.as_str()) {
            out.push(slug.clone());
        }
    }
}

/// Build the slug → vertical-name lookup.
///
/// The vertical recorded for every node in a subtree is the *name of its
/// top-level ancestor*: the accumulator is fixed once per root and never
/// updated while descending. "t-shirts" under Apparel → Tops therefore maps
/// to "Apparel", not "Tops". Downstream grouping depends on this coarse
/// propagation, so it stays exactly as is.
///
/// Slugless nodes are not recorded, but their children still inherit the
/// vertical. Internal nodes with slugs are recorded like leaves.
pub fn build_parent_category_map(nodes: &[CategoryNode]) -> HashMap<String, String> {
    let mut map = HashMap::new();
    for node in nodes {
        record_vertical(node, &node.name, &mut map);
    }
    map
}

fn record_vertical(node: &CategoryNode, vertical: &str, map: &mut HashMap<String, String>) {
    if let Some(slug) = &node.slug {
        map.insert(slug.clone(), vertical.to_string());
    }
    for child in &node.children {
        record_vertical(child, vertical, map);
    }
}
