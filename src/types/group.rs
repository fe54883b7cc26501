//! Groups of users inside an organization.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::traits::UrnResource;

use super::urn::{ResourceType, Urn, create_urn};
use super::user::User;

/// A stored group. Unique per `(org, name)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Group {
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
}

impl Group {
    pub fn new(org: &str, name: &str, path: &str) -> Result<Self, ApiError> {
        Ok(Group {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            path: path.to_string(),
            org: org.to_string(),
            create_at: Utc::now(),
            urn: create_urn(org, ResourceType::Group, path, name)?,
        })
    }

    /// The same group under a new name and path, with its URN regenerated.
    pub fn renamed(&self, name: &str, path: &str) -> Result<Self, ApiError> {
        Ok(Group {
            id: self.id.clone(),
            name: name.to_string(),
            path: path.to_string(),
            org: self.org.clone(),
            create_at: self.create_at,
            urn: create_urn(&self.org, ResourceType::Group, path, name)?,
        })
    }

    pub fn identity(&self) -> GroupIdentity {
        GroupIdentity::new(&self.org, &self.name)
    }
}

impl UrnResource for Group {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// The natural key of a group.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, ToSchema)]
pub struct GroupIdentity {
    #[serde(rename = "Org")]
    pub org: String,
    #[serde(rename = "Name")]
    pub name: String,
}

impl GroupIdentity {
    pub fn new(org: impl Into<String>, name: impl Into<String>) -> Self {
        GroupIdentity {
            org: org.into(),
            name: name.into(),
        }
    }
}

impl Display for GroupIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "{}/{}", self.org, self.name)
    }
}

/// The members of a group, by external identifier.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct GroupMembers {
    #[serde(rename = "Users")]
    pub users: Vec<String>,
    #[serde(rename = "Total")]
    pub total: usize,
}

impl GroupMembers {
    pub fn from_users(users: &[User], total: usize) -> Self {
        GroupMembers {
            users: users.iter().map(|u| u.external_id.clone()).collect(),
            total,
        }
    }
}
