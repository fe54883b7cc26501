//! Policies: named, organization-scoped bundles of statements.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::traits::UrnResource;

use super::statement::Statement;
use super::urn::{ResourceType, Urn, create_urn};

/// A stored policy. The URN is always derived from `org`, `path` and `name`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Policy {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "Name")]
    pub name: String,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Org")]
    pub org: String,
    #[serde(rename = "CreateAt")]
    pub create_at: DateTime<Utc>,
    #[serde(rename = "Urn")]
    pub urn: Urn,
    #[serde(rename = "Statements")]
    pub statements: Vec<Statement>,
}

impl Policy {
    /// Build a new policy with a fresh identifier and creation time.
    pub fn new(
        org: &str,
        name: &str,
        path: &str,
        statements: Vec<Statement>,
    ) -> Result<Self, ApiError> {
        Ok(Policy {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            path: path.to_string(),
            org: org.to_string(),
            create_at: Utc::now(),
            urn: create_urn(org, ResourceType::Policy, path, name)?,
            statements,
        })
    }

    /// The same policy under a new name, path and body, with its URN regenerated.
    pub fn renamed(
        &self,
        name: &str,
        path: &str,
        statements: Vec<Statement>,
    ) -> Result<Self, ApiError> {
        Ok(Policy {
            id: self.id.clone(),
            name: name.to_string(),
            path: path.to_string(),
            org: self.org.clone(),
            create_at: self.create_at,
            urn: create_urn(&self.org, ResourceType::Policy, path, name)?,
            statements,
        })
    }

    pub fn identity(&self) -> PolicyIdentity {
        PolicyIdentity {
            org: self.org.clone(),
            name: self.name.clone(),
        }
    }
}

impl UrnResource for Policy {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// The natural key of a policy.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct PolicyIdentity {
    #[serde(rename = "Org")]
    pub org: String,
    #[serde(rename = "Name")]
    pub name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn statements() -> Vec<Statement> {
        vec![Statement::allow(["policy:get"], ["urn:acme:policy:/*"])]
    }

    #[test]
    fn test_new_policy_derives_urn() {
        let policy = Policy::new("acme", "readers", "/finance/", statements()).unwrap();
        assert_eq!(policy.urn.as_str(), "urn:acme:policy:/finance/readers");
        assert_eq!(policy.org(), "acme");
        assert!(Uuid::parse_str(&policy.id).is_ok());
    }

    #[test]
    fn test_new_policy_rejects_bad_path() {
        let err = Policy::new("acme", "readers", "finance", statements()).unwrap_err();
        assert!(matches!(err, ApiError::InvalidParameter(_)));
    }

    #[test]
    fn test_renamed_regenerates_urn_and_keeps_identity() {
        let policy = Policy::new("acme", "readers", "/finance/", statements()).unwrap();
        let renamed = policy.renamed("auditors", "/audit/", vec![]).unwrap();
        assert_eq!(renamed.id, policy.id);
        assert_eq!(renamed.org, "acme");
        assert_eq!(renamed.create_at, policy.create_at);
        assert_eq!(renamed.urn.as_str(), "urn:acme:policy:/audit/auditors");
    }

    #[test]
    fn test_policy_wire_field_names() {
        let policy = Policy::new("acme", "readers", "/", statements()).unwrap();
        let json = serde_json::to_value(&policy).unwrap();
        for field in ["ID", "Name", "Path", "Org", "CreateAt", "Urn", "Statements"] {
            assert!(json.get(field).is_some(), "missing field {field}");
        }
        assert_eq!(json["Urn"], "urn:acme:policy:/readers");

        let back: Policy = serde_json::from_value(json).unwrap();
        assert_eq!(back, policy);
    }
}
