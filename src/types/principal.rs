//! The request-scoped identity an authorization decision is made for.

use std::fmt::{Display, Formatter, Result as FmtResult};

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::group::GroupIdentity;

/// An immutable snapshot of the caller: identifier, admin flag and group memberships.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    id: String,
    #[serde(default)]
    admin: bool,
    #[serde(default)]
    groups: Vec<GroupIdentity>,
}

impl Principal {
    pub fn new(id: impl Into<String>) -> Self {
        Principal {
            id: id.into(),
            admin: false,
            groups: Vec::new(),
        }
    }

    /// An administrator skips statement evaluation. Requests stay scoped to the
    /// reference organization and prefix.
    pub fn admin(id: impl Into<String>) -> Self {
        Principal {
            admin: true,
            ..Principal::new(id)
        }
    }

    pub fn with_groups<I>(mut self, groups: I) -> Self
    where
        I: IntoIterator<Item = GroupIdentity>,
    {
        self.groups.extend(groups);
        self
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn is_admin(&self) -> bool {
        self.admin
    }

    pub fn groups(&self) -> &[GroupIdentity] {
        &self.groups
    }

    pub fn is_member_of(&self, group: &GroupIdentity) -> bool {
        self.groups.contains(group)
    }
}

impl Display for Principal {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}", self.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_principal_membership() {
        let principal = Principal::new("alice").with_groups([
            GroupIdentity::new("acme", "admins"),
            GroupIdentity::new("globex", "admins"),
        ]);
        assert!(principal.is_member_of(&GroupIdentity::new("acme", "admins")));
        assert!(!principal.is_member_of(&GroupIdentity::new("acme", "users")));
        assert_eq!(principal.groups().len(), 2);
        assert!(!principal.is_admin());
    }

    #[test]
    fn test_admin_principal() {
        let principal = Principal::admin("root");
        assert!(principal.is_admin());
        assert_eq!(principal.to_string(), "root");
    }

    #[test]
    fn test_principal_deserializes_without_optional_fields() {
        let principal: Principal = serde_json::from_str(r#"{"id":"alice"}"#).unwrap();
        assert_eq!(principal, Principal::new("alice"));
    }
}
