//! Runtime configuration for [`crate::api::AuthApi`].

use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::types::Filter;

const DEFAULT_LIMIT: usize = 20;
const MAX_LIMIT: usize = 1000;

/// Listing limits and statically configured administrators.
///
/// Every field has a default, so partial JSON is accepted:
///
/// ```
/// use iam_core::CoreConfig;
///
/// let config = CoreConfig::from_json(r#"{"admin_identifiers": ["root"]}"#).unwrap();
/// assert_eq!(config.default_limit, 20);
/// assert!(config.is_admin("root"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Page size used when a filter asks for a limit of zero.
    pub default_limit: usize,
    /// Upper bound for any requested page size.
    pub max_limit: usize,
    /// Identifiers treated as administrators regardless of what authentication reports.
    pub admin_identifiers: Vec<String>,
}

impl Default for CoreConfig {
    fn default() -> Self {
        CoreConfig {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
            admin_identifiers: Vec::new(),
        }
    }
}

impl CoreConfig {
    pub fn from_json(json: &str) -> Result<Self, ApiError> {
        serde_json::from_str(json).map_err(|e| ApiError::invalid(format!("configuration: {e}")))
    }

    pub fn with_admins<I, S>(mut self, identifiers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.admin_identifiers
            .extend(identifiers.into_iter().map(Into::into));
        self
    }

    pub fn is_admin(&self, identifier: &str) -> bool {
        self.admin_identifiers.iter().any(|a| a == identifier)
    }

    /// Zero selects the default; anything above the maximum is clamped.
    pub fn resolve_limit(&self, requested: usize) -> usize {
        let limit = if requested == 0 {
            self.default_limit
        } else {
            requested
        };
        limit.min(self.max_limit)
    }

    /// A copy of `filter` with an empty prefix normalized to `/` and its limit resolved.
    pub fn resolve_filter(&self, filter: &Filter) -> Filter {
        Filter::with_path_prefix(filter.effective_path_prefix())
            .paged(filter.offset, self.resolve_limit(filter.limit))
    }
}
