//! Page parameter parsing

use crate::types::QueryPairs;
use std::str::FromStr;

/// Base name of the page number parameter
pub const PAGE_VAR: &str = "page";

/// Base name of the anchor parameter
pub const ANCHOR_VAR: &str = "pk";

/// Split a raw query string (with or without a leading `?`) into pairs
pub fn parse_query(query: &str) -> QueryPairs {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .into_owned()
        .collect()
}

/// Page number and anchor requested for one paginator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageParams<K> {
    /// Requested page, always at least 1
    pub page: u64,
    /// Anchor key, if one was given and parses
    pub anchor: Option<K>,
}

impl<K> Default for PageParams<K> {
    fn default() -> Self {
        Self {
            page: 1,
            anchor: None,
        }
    }
}

impl<K: FromStr> PageParams<K> {
    /// Read the parameters for `prefix` out of a pair list
    ///
    /// When a key repeats, the last value wins.
    pub fn from_pairs(pairs: &[(String, String)], prefix: &str) -> Self {
        let page_var = format!("{prefix}{PAGE_VAR}");
        let anchor_var = format!("{prefix}{ANCHOR_VAR}");

        Self {
            page: parse_page(last_value(pairs, &page_var)),
            anchor: last_value(pairs, &anchor_var).and_then(parse_anchor),
        }
    }

    /// Read the parameters for `prefix` out of a raw query string
    pub fn from_query(query: &str, prefix: &str) -> Self {
        Self::from_pairs(&parse_query(query), prefix)
    }
}

fn last_value<'a>(pairs: &'a [(String, String)], key: &str) -> Option<&'a str> {
    pairs
        .iter()
        .rev()
        .find(|(k, _)| k == key)
        .map(|(_, v)| v.as_str())
}

fn parse_page(raw: Option<&str>) -> u64 {
    raw.and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|page| *page >= 1)
        .unwrap_or(1)
}

fn parse_anchor<K: FromStr>(raw: &str) -> Option<K> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    raw.parse().ok()
}
