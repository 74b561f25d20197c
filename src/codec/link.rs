//! Page link building

use super::params::{ANCHOR_VAR, PAGE_VAR};
use crate::types::QueryPairs;
use std::fmt::Display;

/// Builds `?...` links to other pages of one paginator
///
/// All parameters other than this paginator's page and anchor are
/// reproduced unchanged and in their original order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkBuilder {
    pairs: QueryPairs,
    page_var: String,
    anchor_var: String,
}

impl LinkBuilder {
    /// Create a builder over the current request's parameters
    pub fn new(pairs: QueryPairs, prefix: &str) -> Self {
        Self {
            pairs,
            page_var: format!("{prefix}{PAGE_VAR}"),
            anchor_var: format!("{prefix}{ANCHOR_VAR}"),
        }
    }

    /// Name of the page parameter
    pub fn page_var(&self) -> &str {
        &self.page_var
    }

    /// Name of the anchor parameter
    pub fn anchor_var(&self) -> &str {
        &self.anchor_var
    }

    /// Link to `page`, anchored at `anchor` unless it is the first page
    pub fn link<K: Display>(&self, page: u64, anchor: Option<&K>) -> String {
        let mut pairs = self.pairs.clone();

        set_param(&mut pairs, &self.page_var, page.to_string());
        match anchor {
            Some(anchor) if page != 1 => set_param(&mut pairs, &self.anchor_var, anchor.to_string()),
            _ => pairs.retain(|(k, _)| k != &self.anchor_var),
        }

        let encoded = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(pairs.iter())
            .finish();
        format!("?{encoded}")
    }
}

/// Replace the first occurrence of `key` in place (dropping repeats), or append
fn set_param(pairs: &mut QueryPairs, key: &str, value: String) {
    let mut value = Some(value);
    pairs.retain_mut(|(k, v)| {
        if k != key {
            return true;
        }
        match value.take() {
            Some(new) => {
                *v = new;
                true
            }
            None => false,
        }
    });
    if let Some(value) = value {
        pairs.push((key.to_string(), value));
    }
}
