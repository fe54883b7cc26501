//! Listing filters and paged results.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Restricts a listing to a path prefix and a window of results.
///
/// A `limit` of zero asks for the configured default page size.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Filter {
    #[serde(rename = "PathPrefix", default)]
    pub path_prefix: String,
    #[serde(rename = "Offset", default)]
    pub offset: usize,
    #[serde(rename = "Limit", default)]
    pub limit: usize,
}

impl Default for Filter {
    fn default() -> Self {
        Filter {
            path_prefix: "/".to_string(),
            offset: 0,
            limit: 0,
        }
    }
}

impl Filter {
    pub fn with_path_prefix(path_prefix: impl Into<String>) -> Self {
        Filter {
            path_prefix: path_prefix.into(),
            ..Filter::default()
        }
    }

    pub fn paged(mut self, offset: usize, limit: usize) -> Self {
        self.offset = offset;
        self.limit = limit;
        self
    }

    /// The path prefix to match, treating an empty prefix as the root.
    pub fn effective_path_prefix(&self) -> &str {
        if self.path_prefix.is_empty() {
            "/"
        } else {
            &self.path_prefix
        }
    }
}

/// One page of a listing plus the number of rows matching before paging.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Page<T> {
    #[serde(rename = "Items")]
    pub items: Vec<T>,
    #[serde(rename = "Total")]
    pub total: usize,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: usize) -> Self {
        Page { items, total }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_filter_default_is_root() {
        let filter = Filter::default();
        assert_eq!(filter.effective_path_prefix(), "/");
        assert_eq!(filter.limit, 0);
    }

    #[test]
    fn test_empty_prefix_is_root() {
        let filter = Filter::with_path_prefix("");
        assert_eq!(filter.effective_path_prefix(), "/");
    }

    #[test]
    fn test_filter_deserializes_partial() {
        let filter: Filter = serde_json::from_str(r#"{"PathPrefix":"/team/","Limit":5}"#).unwrap();
        assert_eq!(filter.path_prefix, "/team/");
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.limit, 5);
    }

    #[test]
    fn test_page_map_keeps_total() {
        let page = Page::new(vec![1, 2], 10).map(|n| n * 2);
        assert_eq!(page.items, vec![2, 4]);
        assert_eq!(page.total, 10);
    }
}
