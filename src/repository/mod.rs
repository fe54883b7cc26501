//! Storage boundary consumed by the domain operations.
//!
//! The engine never talks to a repository. [`crate::api::AuthApi`] fetches the
//! entities and attachment listings it needs, then hands plain values to the engine.
//! Every operation reports failures as a [`RepositoryError`]. Filtered listings are
//! ordered by URN, and a filter limit of zero returns every matching row.

mod memory;

pub use memory::MemoryRepository;

use crate::error::RepositoryError;
use crate::types::{Filter, Group, Page, Policy, User};

pub type RepoResult<T> = Result<T, RepositoryError>;

/// Users and their direct policy attachments.
pub trait UserRepo {
    fn add_user(&self, user: User) -> RepoResult<User>;
    fn get_user_by_external_id(&self, org: &str, external_id: &str) -> RepoResult<User>;
    fn get_users_filtered(&self, org: &str, filter: &Filter) -> RepoResult<Page<User>>;
    /// Replace the stored user with the same id.
    fn update_user(&self, user: User) -> RepoResult<User>;
    /// Remove a user together with its memberships and attachments.
    fn remove_user(&self, id: &str) -> RepoResult<()>;
    fn get_groups_by_user_id(&self, id: &str, filter: &Filter) -> RepoResult<Page<Group>>;
    fn attach_user_policy(&self, user_id: &str, policy_id: &str) -> RepoResult<()>;
    fn detach_user_policy(&self, user_id: &str, policy_id: &str) -> RepoResult<()>;
    fn get_attached_user_policies(&self, user_id: &str, filter: &Filter)
    -> RepoResult<Page<Policy>>;
}

/// Groups, memberships and group policy attachments.
pub trait GroupRepo {
    fn add_group(&self, group: Group) -> RepoResult<Group>;
    fn get_group_by_name(&self, org: &str, name: &str) -> RepoResult<Group>;
    fn get_group_by_id(&self, id: &str) -> RepoResult<Group>;
    fn get_groups_filtered(&self, org: &str, filter: &Filter) -> RepoResult<Page<Group>>;
    /// Replace the stored group with the same id; name, path and URN change together.
    fn update_group(&self, group: Group) -> RepoResult<Group>;
    /// Remove a group together with its memberships and attachments.
    fn remove_group(&self, id: &str) -> RepoResult<()>;
    fn add_member(&self, user_id: &str, group_id: &str) -> RepoResult<()>;
    fn remove_member(&self, user_id: &str, group_id: &str) -> RepoResult<()>;
    fn is_member_of_group(&self, user_id: &str, group_id: &str) -> RepoResult<bool>;
    fn get_group_members(&self, group_id: &str, filter: &Filter) -> RepoResult<Page<User>>;
    fn attach_policy(&self, group_id: &str, policy_id: &str) -> RepoResult<()>;
    fn detach_policy(&self, group_id: &str, policy_id: &str) -> RepoResult<()>;
    fn is_attached_to_group(&self, group_id: &str, policy_id: &str) -> RepoResult<bool>;
    fn get_attached_policies(&self, group_id: &str, filter: &Filter) -> RepoResult<Page<Policy>>;
}

/// Policies and the reverse view of group attachments.
pub trait PolicyRepo {
    fn add_policy(&self, policy: Policy) -> RepoResult<Policy>;
    fn get_policy_by_name(&self, org: &str, name: &str) -> RepoResult<Policy>;
    fn get_policy_by_id(&self, id: &str) -> RepoResult<Policy>;
    fn get_policies_filtered(&self, org: &str, filter: &Filter) -> RepoResult<Page<Policy>>;
    /// Replace the stored policy with the same id; name, path, URN and statements change together.
    fn update_policy(&self, policy: Policy) -> RepoResult<Policy>;
    /// Remove a policy together with its attachments.
    fn remove_policy(&self, id: &str) -> RepoResult<()>;
    fn get_attached_groups(&self, policy_id: &str, filter: &Filter) -> RepoResult<Page<Group>>;
}

/// Everything the domain operations need from storage.
pub trait Repository: UserRepo + GroupRepo + PolicyRepo + Send + Sync {}

impl<T> Repository for T where T: UserRepo + GroupRepo + PolicyRepo + Send + Sync {}
