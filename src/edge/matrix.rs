//! Pairwise link matrix over edges and duplicates.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::error::InsightsResult;
use crate::types::Duplicates;

use super::Edge;

const DUPLICATE: &str = "duplicate";

/// The links between one pair of records, `a < b`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatrixEntry {
    pub a: String,
    pub b: String,
    /// Every requested link name, `true` if it connects this pair.
    pub links: BTreeMap<String, bool>,
}

/// Builds the link matrix of all record pairs connected by at least one requested link.
///
/// Link names are rule ids for edges and `duplicate` (or `<group>:duplicate` for a
/// group-prefixed duplicates key) for duplicates. With `links = None` every link name present in
/// the input is requested. Entries are ordered by `(a, b)`.
pub fn matrix<E: AsRef<str>, L: AsRef<str>>(
    edges: &[E],
    duplicates: &Duplicates,
    links: Option<&[L]>,
) -> InsightsResult<Vec<MatrixEntry>> {
    let requested: BTreeSet<String> = match links {
        Some(links) => links.iter().map(|l| l.as_ref().to_string()).collect(),
        None => discover_links(edges, duplicates)?,
    };

    let mut pairs: BTreeMap<(String, String), BTreeMap<String, bool>> = BTreeMap::new();
    let mut mark = |a: &str, b: &str, link: &str| {
        pairs
            .entry((a.to_string(), b.to_string()))
            .or_insert_with(|| requested.iter().map(|l| (l.clone(), false)).collect())
            .insert(link.to_string(), true);
    };

    for raw in edges {
        let edge = Edge::parse(raw.as_ref())?;
        if requested.contains(edge.rule) {
            mark(edge.a, edge.b, edge.rule);
        }
    }

    for (key, others) in duplicates {
        let (link, id) = duplicate_link(key);
        if !requested.contains(&link) {
            continue;
        }
        for other in others {
            let (a, b) = if other.as_str() < id { (other.as_str(), id) } else { (id, other.as_str()) };
            mark(a, b, &link);
        }
    }

    Ok(pairs
        .into_iter()
        .map(|((a, b), links)| MatrixEntry { a, b, links })
        .collect())
}

/// Splits a duplicates key into its link name and record id.
fn duplicate_link(key: &str) -> (String, &str) {
    match key.split_once(':') {
        Some((group, id)) => (format!("{group}:{DUPLICATE}"), id),
        None => (DUPLICATE.to_string(), key),
    }
}

fn discover_links<E: AsRef<str>>(edges: &[E], duplicates: &Duplicates) -> InsightsResult<BTreeSet<String>> {
    let mut links = BTreeSet::new();
    for raw in edges {
        links.insert(Edge::parse(raw.as_ref())?.rule.to_string());
    }
    links.extend(duplicates.keys().map(|key| duplicate_link(key).0));
    Ok(links)
}
