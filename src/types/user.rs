//! Users and the authenticated caller.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::traits::UrnResource;

use super::urn::{ResourceType, Urn, create_urn};

/// A stored user, keyed by the identifier the authentication provider knows it by.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(rename = "ID")]
    pub id: String,
    #[serde(rename = "ExternalID")]
    pub external_id: String,
    #[serde(rename = "Path")]
    pub path: String,
    #[serde(rename = "Org")]
    pub org: String,
    #[serde(rename = "CreateAt")]
    pub create_at: DateTime<Utc>,
    #[serde(rename = "Urn")]
    pub urn: Urn,
}

impl User {
    pub fn new(org: &str, external_id: &str, path: &str) -> Result<Self, ApiError> {
        Ok(User {
            id: Uuid::new_v4().to_string(),
            external_id: external_id.to_string(),
            path: path.to_string(),
            org: org.to_string(),
            create_at: Utc::now(),
            urn: create_urn(org, ResourceType::User, path, external_id)?,
        })
    }

    /// The same user under a new path, with its URN regenerated.
    pub fn moved(&self, path: &str) -> Result<Self, ApiError> {
        Ok(User {
            path: path.to_string(),
            urn: create_urn(&self.org, ResourceType::User, path, &self.external_id)?,
            ..self.clone()
        })
    }
}

impl UrnResource for User {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

/// The caller as vouched for by the authentication collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub struct AuthenticatedUser {
    #[serde(rename = "Identifier")]
    pub identifier: String,
    #[serde(rename = "Admin", default)]
    pub admin: bool,
}

impl AuthenticatedUser {
    pub fn new(identifier: impl Into<String>) -> Self {
        AuthenticatedUser {
            identifier: identifier.into(),
            admin: false,
        }
    }

    pub fn admin(identifier: impl Into<String>) -> Self {
        AuthenticatedUser {
            identifier: identifier.into(),
            admin: true,
        }
    }
}
