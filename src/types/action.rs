//! The closed set of actions a statement can name.

use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumIter, EnumString};
use utoipa::ToSchema;

use super::urn::ResourceType;

/// Every operation that is subject to authorization, rendered as `<type>:<verb>`.
///
/// Statements refer to these by string pattern (`policy:*`, `group:list-*`); the
/// domain operations only ever ask about a variant of this enum.
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
    Display,
    EnumString,
    AsRefStr,
    EnumIter,
)]
pub enum Action {
    #[strum(serialize = "policy:create")]
    #[serde(rename = "policy:create")]
    CreatePolicy,
    #[strum(serialize = "policy:get")]
    #[serde(rename = "policy:get")]
    GetPolicy,
    #[strum(serialize = "policy:list")]
    #[serde(rename = "policy:list")]
    ListPolicies,
    #[strum(serialize = "policy:update")]
    #[serde(rename = "policy:update")]
    UpdatePolicy,
    #[strum(serialize = "policy:delete")]
    #[serde(rename = "policy:delete")]
    DeletePolicy,
    #[strum(serialize = "policy:list-attached-groups")]
    #[serde(rename = "policy:list-attached-groups")]
    ListAttachedGroups,

    #[strum(serialize = "group:create")]
    #[serde(rename = "group:create")]
    CreateGroup,
    #[strum(serialize = "group:get")]
    #[serde(rename = "group:get")]
    GetGroup,
    #[strum(serialize = "group:list")]
    #[serde(rename = "group:list")]
    ListGroups,
    #[strum(serialize = "group:update")]
    #[serde(rename = "group:update")]
    UpdateGroup,
    #[strum(serialize = "group:delete")]
    #[serde(rename = "group:delete")]
    DeleteGroup,
    #[strum(serialize = "group:add-member")]
    #[serde(rename = "group:add-member")]
    AddMember,
    #[strum(serialize = "group:remove-member")]
    #[serde(rename = "group:remove-member")]
    RemoveMember,
    #[strum(serialize = "group:list-members")]
    #[serde(rename = "group:list-members")]
    ListMembers,
    #[strum(serialize = "group:attach-policy")]
    #[serde(rename = "group:attach-policy")]
    AttachGroupPolicy,
    #[strum(serialize = "group:detach-policy")]
    #[serde(rename = "group:detach-policy")]
    DetachGroupPolicy,
    #[strum(serialize = "group:list-attached-policies")]
    #[serde(rename = "group:list-attached-policies")]
    ListAttachedGroupPolicies,

    #[strum(serialize = "user:create")]
    #[serde(rename = "user:create")]
    CreateUser,
    #[strum(serialize = "user:get")]
    #[serde(rename = "user:get")]
    GetUser,
    #[strum(serialize = "user:list")]
    #[serde(rename = "user:list")]
    ListUsers,
    #[strum(serialize = "user:update")]
    #[serde(rename = "user:update")]
    UpdateUser,
    #[strum(serialize = "user:delete")]
    #[serde(rename = "user:delete")]
    DeleteUser,
    #[strum(serialize = "user:list-groups")]
    #[serde(rename = "user:list-groups")]
    ListGroupsForUser,
    #[strum(serialize = "user:attach-policy")]
    #[serde(rename = "user:attach-policy")]
    AttachUserPolicy,
    #[strum(serialize = "user:detach-policy")]
    #[serde(rename = "user:detach-policy")]
    DetachUserPolicy,
    #[strum(serialize = "user:list-attached-policies")]
    #[serde(rename = "user:list-attached-policies")]
    ListAttachedUserPolicies,
}

impl Action {
    /// The kind of resource this action is checked against.
    pub fn resource_type(&self) -> ResourceType {
        use Action::*;
        match self {
            CreatePolicy | GetPolicy | ListPolicies | UpdatePolicy | DeletePolicy
            | ListAttachedGroups => ResourceType::Policy,
            CreateGroup
            | GetGroup
            | ListGroups
            | UpdateGroup
            | DeleteGroup
            | AddMember
            | RemoveMember
            | ListMembers
            | AttachGroupPolicy
            | DetachGroupPolicy
            | ListAttachedGroupPolicies => ResourceType::Group,
            CreateUser | GetUser | ListUsers | UpdateUser | DeleteUser | ListGroupsForUser
            | AttachUserPolicy | DetachUserPolicy | ListAttachedUserPolicies => {
                ResourceType::User
            }
        }
    }
}
