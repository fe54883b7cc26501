//! Resource identifiers and hierarchical prefix patterns.

use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display as StrumDisplay, EnumIter, EnumString};
use utoipa::ToSchema;

use crate::error::ApiError;
use crate::pattern::{WILDCARD, matches};
use crate::validation::{is_valid_external_id, is_valid_name, is_valid_org, is_valid_path};

const URN_SCHEME: &str = "urn";

/// The kinds of securable entities.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    ToSchema,
    StrumDisplay,
    EnumString,
    AsRefStr,
    EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ResourceType {
    Policy,
    Group,
    User,
}

/// A resource identifier, or a prefix pattern when it ends in `*`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
#[serde(transparent)]
pub struct Urn(String);

impl Urn {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The organization segment.
    pub fn org(&self) -> &str {
        self.0.split(':').nth(1).unwrap_or_default()
    }

    pub fn resource_type(&self) -> Option<ResourceType> {
        self.0.split(':').nth(2).and_then(|t| t.parse().ok())
    }

    /// Whether this is a listing prefix rather than a single resource.
    pub fn is_prefix(&self) -> bool {
        self.0.ends_with(WILDCARD)
    }

    /// True if `other` is this resource, or lies under this prefix.
    pub fn covers(&self, other: &Urn) -> bool {
        if self.is_prefix() {
            matches(&self.0, &other.0)
        } else {
            self == other
        }
    }
}

impl Display for Urn {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Urn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Urn {
    type Err = ApiError;

    /// Accepts `urn:<org>:<type>:<path><name>` and `urn:<org>:<type>:<path>*`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(4, ':').collect();
        let [scheme, org, kind, rest] = parts.as_slice() else {
            return Err(ApiError::invalid(format!(
                "malformed urn '{s}' (expected format: urn:<org>:<type>:<path><name>)"
            )));
        };
        if *scheme != URN_SCHEME || !is_valid_org(org) || !rest.starts_with('/') {
            return Err(ApiError::invalid(format!("malformed urn '{s}'")));
        }
        kind.parse::<ResourceType>()
            .map_err(|_| ApiError::invalid(format!("unknown resource type '{kind}' in '{s}'")))?;

        Ok(Urn(s.to_string()))
    }
}

fn is_valid_leaf(resource_type: ResourceType, name: &str) -> bool {
    match resource_type {
        ResourceType::User => is_valid_external_id(name),
        ResourceType::Policy | ResourceType::Group => is_valid_name(name),
    }
}

/// Build the canonical identifier `urn:<org>:<type>:<path><name>`.
pub fn create_urn(
    org: &str,
    resource_type: ResourceType,
    path: &str,
    name: &str,
) -> Result<Urn, ApiError> {
    if !is_valid_org(org) {
        return Err(ApiError::invalid(format!("org {org}")));
    }
    if !is_valid_path(path) {
        return Err(ApiError::invalid(format!("path {path}")));
    }
    if !is_valid_leaf(resource_type, name) {
        return Err(ApiError::invalid(format!("{resource_type} name {name}")));
    }
    Ok(Urn(format!("{URN_SCHEME}:{org}:{resource_type}:{path}{name}")))
}

/// Build the listing pattern `urn:<org>:<type>:<path_prefix>*`. A prefix of `/`
/// covers everything of that type in the organization.
pub fn urn_prefix(
    org: &str,
    resource_type: ResourceType,
    path_prefix: &str,
) -> Result<Urn, ApiError> {
    if !is_valid_org(org) {
        return Err(ApiError::invalid(format!("org {org}")));
    }
    if !is_valid_path(path_prefix) {
        return Err(ApiError::invalid(format!("path prefix {path_prefix}")));
    }
    Ok(Urn(format!(
        "{URN_SCHEME}:{org}:{resource_type}:{path_prefix}{WILDCARD}"
    )))
}
