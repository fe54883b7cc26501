//! In-process repository. Cloneable and thread-safe; all clones share one store.

use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use itertools::Itertools;
use tracing::debug;

use super::{GroupRepo, PolicyRepo, RepoResult, UserRepo};
use crate::error::{EntityKind, RepositoryError};
use crate::types::{Filter, Group, Page, Policy, User};

#[derive(Debug, Default)]
struct Store {
    users: HashMap<String, User>,
    groups: HashMap<String, Group>,
    policies: HashMap<String, Policy>,
    /// (group id, user id)
    memberships: BTreeSet<(String, String)>,
    /// (group id, policy id)
    group_policies: BTreeSet<(String, String)>,
    /// (user id, policy id)
    user_policies: BTreeSet<(String, String)>,
}

impl Store {
    fn user(&self, id: &str) -> RepoResult<&User> {
        self.users
            .get(id)
            .ok_or_else(|| RepositoryError::not_found(EntityKind::User, format!("user with id {id}")))
    }

    fn group(&self, id: &str) -> RepoResult<&Group> {
        self.groups.get(id).ok_or_else(|| {
            RepositoryError::not_found(EntityKind::Group, format!("group with id {id}"))
        })
    }

    fn policy(&self, id: &str) -> RepoResult<&Policy> {
        self.policies.get(id).ok_or_else(|| {
            RepositoryError::not_found(EntityKind::Policy, format!("policy with id {id}"))
        })
    }
}

/// Relations may only join entities of one organization.
fn same_org(left_org: &str, right_org: &str, relation: impl FnOnce() -> String) -> RepoResult<()> {
    if left_org == right_org {
        Ok(())
    } else {
        Err(RepositoryError::InvalidRelation(format!(
            "{} belong to different organizations",
            relation()
        )))
    }
}

/// Apply a filter's path prefix and window to entities, ordered by URN.
fn paginate<'a, T, I, F>(entities: I, filter: &Filter, path_of: F) -> Page<T>
where
    T: Clone + 'a,
    I: Iterator<Item = &'a T>,
    F: Fn(&T) -> (&str, &str),
{
    let prefix = filter.effective_path_prefix();
    let matching: Vec<&T> = entities
        .filter(|e| path_of(e).0.starts_with(prefix))
        .sorted_by(|a, b| path_of(a).1.cmp(path_of(b).1))
        .collect();
    let total = matching.len();
    // A zero limit means no limit at this layer.
    let limit = if filter.limit == 0 { usize::MAX } else { filter.limit };
    let items = matching
        .into_iter()
        .skip(filter.offset)
        .take(limit)
        .cloned()
        .collect();
    Page::new(items, total)
}

fn user_keys(u: &User) -> (&str, &str) {
    (&u.path, u.urn.as_str())
}

fn group_keys(g: &Group) -> (&str, &str) {
    (&g.path, g.urn.as_str())
}

fn policy_keys(p: &Policy) -> (&str, &str) {
    (&p.path, p.urn.as_str())
}

#[derive(Debug, Clone, Default)]
pub struct MemoryRepository {
    inner: Arc<RwLock<Store>>,
}

impl MemoryRepository {
    pub fn new() -> Self {
        MemoryRepository::default()
    }

    fn read(&self) -> RepoResult<RwLockReadGuard<'_, Store>> {
        Ok(self.inner.read()?)
    }

    fn write(&self) -> RepoResult<RwLockWriteGuard<'_, Store>> {
        Ok(self.inner.write()?)
    }
}

impl UserRepo for MemoryRepository {
    fn add_user(&self, user: User) -> RepoResult<User> {
        let mut store = self.write()?;
        if store.users.contains_key(&user.id)
            || store
                .users
                .values()
                .any(|u| u.org == user.org && u.external_id == user.external_id)
        {
            return Err(RepositoryError::already_exists(
                EntityKind::User,
                format!("user {} in org {}", user.external_id, user.org),
            ));
        }
        debug!(event = "Repository", phase = "AddUser", urn = user.urn.as_str());
        store.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn get_user_by_external_id(&self, org: &str, external_id: &str) -> RepoResult<User> {
        let store = self.read()?;
        store
            .users
            .values()
            .find(|u| u.org == org && u.external_id == external_id)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(
                    EntityKind::User,
                    format!("user {external_id} in org {org}"),
                )
            })
    }

    fn get_users_filtered(&self, org: &str, filter: &Filter) -> RepoResult<Page<User>> {
        let store = self.read()?;
        Ok(paginate(
            store.users.values().filter(|u| u.org == org),
            filter,
            user_keys,
        ))
    }

    fn update_user(&self, user: User) -> RepoResult<User> {
        let mut store = self.write()?;
        store.user(&user.id)?;
        debug!(event = "Repository", phase = "UpdateUser", urn = user.urn.as_str());
        store.users.insert(user.id.clone(), user.clone());
        Ok(user)
    }

    fn remove_user(&self, id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        store.user(id)?;
        store.users.remove(id);
        store.memberships.retain(|(_, user_id)| user_id != id);
        store.user_policies.retain(|(user_id, _)| user_id != id);
        Ok(())
    }

    fn get_groups_by_user_id(&self, id: &str, filter: &Filter) -> RepoResult<Page<Group>> {
        let store = self.read()?;
        store.user(id)?;
        let groups = store
            .memberships
            .iter()
            .filter(|(_, user_id)| user_id == id)
            .filter_map(|(group_id, _)| store.groups.get(group_id));
        Ok(paginate(groups, filter, group_keys))
    }

    fn attach_user_policy(&self, user_id: &str, policy_id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        same_org(&store.user(user_id)?.org, &store.policy(policy_id)?.org, || {
            format!("user {user_id} and policy {policy_id}")
        })?;
        if !store
            .user_policies
            .insert((user_id.to_string(), policy_id.to_string()))
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Attachment,
                format!("policy {policy_id} already attached to user {user_id}"),
            ));
        }
        Ok(())
    }

    fn detach_user_policy(&self, user_id: &str, policy_id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        if !store
            .user_policies
            .remove(&(user_id.to_string(), policy_id.to_string()))
        {
            return Err(RepositoryError::not_found(
                EntityKind::Attachment,
                format!("policy {policy_id} is not attached to user {user_id}"),
            ));
        }
        Ok(())
    }

    fn get_attached_user_policies(&self, user_id: &str, filter: &Filter) -> RepoResult<Page<Policy>> {
        let store = self.read()?;
        store.user(user_id)?;
        let policies = store
            .user_policies
            .iter()
            .filter(|(uid, _)| uid == user_id)
            .filter_map(|(_, policy_id)| store.policies.get(policy_id));
        Ok(paginate(policies, filter, policy_keys))
    }
}

impl GroupRepo for MemoryRepository {
    fn add_group(&self, group: Group) -> RepoResult<Group> {
        let mut store = self.write()?;
        if store.groups.contains_key(&group.id)
            || store
                .groups
                .values()
                .any(|g| g.org == group.org && g.name == group.name)
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Group,
                format!("group {} in org {}", group.name, group.org),
            ));
        }
        debug!(event = "Repository", phase = "AddGroup", urn = group.urn.as_str());
        store.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    fn get_group_by_name(&self, org: &str, name: &str) -> RepoResult<Group> {
        let store = self.read()?;
        store
            .groups
            .values()
            .find(|g| g.org == org && g.name == name)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::Group, format!("group {name} in org {org}"))
            })
    }

    fn get_group_by_id(&self, id: &str) -> RepoResult<Group> {
        Ok(self.read()?.group(id)?.clone())
    }

    fn get_groups_filtered(&self, org: &str, filter: &Filter) -> RepoResult<Page<Group>> {
        let store = self.read()?;
        Ok(paginate(
            store.groups.values().filter(|g| g.org == org),
            filter,
            group_keys,
        ))
    }

    fn update_group(&self, group: Group) -> RepoResult<Group> {
        let mut store = self.write()?;
        store.group(&group.id)?;
        if store
            .groups
            .values()
            .any(|g| g.id != group.id && g.org == group.org && g.name == group.name)
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Group,
                format!("group {} in org {}", group.name, group.org),
            ));
        }
        debug!(event = "Repository", phase = "UpdateGroup", urn = group.urn.as_str());
        store.groups.insert(group.id.clone(), group.clone());
        Ok(group)
    }

    fn remove_group(&self, id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        store.group(id)?;
        store.groups.remove(id);
        store.memberships.retain(|(group_id, _)| group_id != id);
        store.group_policies.retain(|(group_id, _)| group_id != id);
        Ok(())
    }

    fn add_member(&self, user_id: &str, group_id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        same_org(&store.user(user_id)?.org, &store.group(group_id)?.org, || {
            format!("user {user_id} and group {group_id}")
        })?;
        if !store
            .memberships
            .insert((group_id.to_string(), user_id.to_string()))
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Membership,
                format!("user {user_id} is already a member of group {group_id}"),
            ));
        }
        Ok(())
    }

    fn remove_member(&self, user_id: &str, group_id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        if !store
            .memberships
            .remove(&(group_id.to_string(), user_id.to_string()))
        {
            return Err(RepositoryError::not_found(
                EntityKind::Membership,
                format!("user {user_id} is not a member of group {group_id}"),
            ));
        }
        Ok(())
    }

    fn is_member_of_group(&self, user_id: &str, group_id: &str) -> RepoResult<bool> {
        let store = self.read()?;
        Ok(store
            .memberships
            .contains(&(group_id.to_string(), user_id.to_string())))
    }

    fn get_group_members(&self, group_id: &str, filter: &Filter) -> RepoResult<Page<User>> {
        let store = self.read()?;
        store.group(group_id)?;
        let members = store
            .memberships
            .iter()
            .filter(|(gid, _)| gid == group_id)
            .filter_map(|(_, user_id)| store.users.get(user_id));
        Ok(paginate(members, filter, user_keys))
    }

    fn attach_policy(&self, group_id: &str, policy_id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        same_org(&store.group(group_id)?.org, &store.policy(policy_id)?.org, || {
            format!("group {group_id} and policy {policy_id}")
        })?;
        if !store
            .group_policies
            .insert((group_id.to_string(), policy_id.to_string()))
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Attachment,
                format!("policy {policy_id} already attached to group {group_id}"),
            ));
        }
        Ok(())
    }

    fn detach_policy(&self, group_id: &str, policy_id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        if !store
            .group_policies
            .remove(&(group_id.to_string(), policy_id.to_string()))
        {
            return Err(RepositoryError::not_found(
                EntityKind::Attachment,
                format!("policy {policy_id} is not attached to group {group_id}"),
            ));
        }
        Ok(())
    }

    fn is_attached_to_group(&self, group_id: &str, policy_id: &str) -> RepoResult<bool> {
        let store = self.read()?;
        Ok(store
            .group_policies
            .contains(&(group_id.to_string(), policy_id.to_string())))
    }

    fn get_attached_policies(&self, group_id: &str, filter: &Filter) -> RepoResult<Page<Policy>> {
        let store = self.read()?;
        store.group(group_id)?;
        let policies = store
            .group_policies
            .iter()
            .filter(|(gid, _)| gid == group_id)
            .filter_map(|(_, policy_id)| store.policies.get(policy_id));
        Ok(paginate(policies, filter, policy_keys))
    }
}

impl PolicyRepo for MemoryRepository {
    fn add_policy(&self, policy: Policy) -> RepoResult<Policy> {
        let mut store = self.write()?;
        if store.policies.contains_key(&policy.id)
            || store
                .policies
                .values()
                .any(|p| p.org == policy.org && p.name == policy.name)
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Policy,
                format!("policy {} in org {}", policy.name, policy.org),
            ));
        }
        debug!(event = "Repository", phase = "AddPolicy", urn = policy.urn.as_str());
        store.policies.insert(policy.id.clone(), policy.clone());
        Ok(policy)
    }

    fn get_policy_by_name(&self, org: &str, name: &str) -> RepoResult<Policy> {
        let store = self.read()?;
        store
            .policies
            .values()
            .find(|p| p.org == org && p.name == name)
            .cloned()
            .ok_or_else(|| {
                RepositoryError::not_found(EntityKind::Policy, format!("policy {name} in org {org}"))
            })
    }

    fn get_policy_by_id(&self, id: &str) -> RepoResult<Policy> {
        Ok(self.read()?.policy(id)?.clone())
    }

    fn get_policies_filtered(&self, org: &str, filter: &Filter) -> RepoResult<Page<Policy>> {
        let store = self.read()?;
        Ok(paginate(
            store.policies.values().filter(|p| p.org == org),
            filter,
            policy_keys,
        ))
    }

    fn update_policy(&self, policy: Policy) -> RepoResult<Policy> {
        let mut store = self.write()?;
        store.policy(&policy.id)?;
        if store
            .policies
            .values()
            .any(|p| p.id != policy.id && p.org == policy.org && p.name == policy.name)
        {
            return Err(RepositoryError::already_exists(
                EntityKind::Policy,
                format!("policy {} in org {}", policy.name, policy.org),
            ));
        }
        debug!(event = "Repository", phase = "UpdatePolicy", urn = policy.urn.as_str());
        store.policies.insert(policy.id.clone(), policy.clone());
        Ok(policy)
    }

    fn remove_policy(&self, id: &str) -> RepoResult<()> {
        let mut store = self.write()?;
        store.policy(id)?;
        store.policies.remove(id);
        store.group_policies.retain(|(_, policy_id)| policy_id != id);
        store.user_policies.retain(|(_, policy_id)| policy_id != id);
        Ok(())
    }

    fn get_attached_groups(&self, policy_id: &str, filter: &Filter) -> RepoResult<Page<Group>> {
        let store = self.read()?;
        store.policy(policy_id)?;
        let groups = store
            .group_policies
            .iter()
            .filter(|(_, pid)| pid == policy_id)
            .filter_map(|(group_id, _)| store.groups.get(group_id));
        Ok(paginate(groups, filter, group_keys))
    }
}
