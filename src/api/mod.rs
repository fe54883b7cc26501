//! Domain operations for policies, groups and users.
//!
//! Every operation follows the same shape: validate the input, fetch the current
//! state, ask [`crate::engine::authorize`] whether the caller may act on it, then
//! query or mutate the repository. Repository errors are translated into
//! [`ApiError`] on the way out.
//!
//! A missing entity is reported as `NotFound` even when the caller would not have
//! been authorized to see it; transports that must hide existence can map both
//! `NotFound` and `Unauthorized` to the same response.

mod group;
mod policy;
mod user;

use tracing::{debug, warn};

use crate::config::CoreConfig;
use crate::engine::{PermissionSnapshot, authorize};
use crate::error::{ApiError, RepositoryError};
use crate::repository::Repository;
use crate::traits::UrnResource;
use crate::types::{Action, AuthenticatedUser, Filter, Page, Principal, Urn};
use crate::validation::{is_valid_external_id, is_valid_name, is_valid_org, is_valid_path};

pub type ApiResult<T> = Result<T, ApiError>;

/// Authorization-aware façade over a [`Repository`].
#[derive(Debug, Clone)]
pub struct AuthApi<R> {
    repo: R,
    config: CoreConfig,
}

impl<R: Repository> AuthApi<R> {
    pub fn new(repo: R, config: CoreConfig) -> Self {
        AuthApi { repo, config }
    }

    pub fn repository(&self) -> &R {
        &self.repo
    }

    pub fn config(&self) -> &CoreConfig {
        &self.config
    }

    /// Build the principal and its attached policies for a request scoped to `org`.
    ///
    /// A caller without a user record in `org` gets an empty snapshot and is denied
    /// everything unless it is an administrator.
    pub fn load_permissions(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
    ) -> ApiResult<(Principal, PermissionSnapshot)> {
        if caller.admin || self.config.is_admin(&caller.identifier) {
            return Ok((Principal::admin(&caller.identifier), PermissionSnapshot::new()));
        }

        let user = match self.repo.get_user_by_external_id(org, &caller.identifier) {
            Ok(user) => user,
            Err(RepositoryError::NotFound { .. }) => {
                debug!(
                    event = "Api",
                    phase = "UnknownPrincipal",
                    principal = caller.identifier.as_str(),
                    org = org
                );
                return Ok((Principal::new(&caller.identifier), PermissionSnapshot::new()));
            }
            Err(e) => return Err(e.into()),
        };

        let groups = self
            .repo
            .get_groups_by_user_id(&user.id, &Filter::default())?
            .items;
        let direct = self
            .repo
            .get_attached_user_policies(&user.id, &Filter::default())?;
        let mut snapshot = PermissionSnapshot::new().with_direct_policies(direct.items);
        for group in &groups {
            let attached = self.repo.get_attached_policies(&group.id, &Filter::default())?;
            snapshot = snapshot.with_group_policies(group.identity(), attached.items);
        }

        let principal =
            Principal::new(&caller.identifier).with_groups(groups.iter().map(|g| g.identity()));
        Ok((principal, snapshot))
    }

    /// Filter `candidates` down to what the caller may perform `action` on.
    fn authorized<T: UrnResource>(
        &self,
        caller: &AuthenticatedUser,
        reference: &Urn,
        action: Action,
        candidates: Vec<T>,
    ) -> ApiResult<Vec<T>> {
        let (principal, snapshot) = self.load_permissions(caller, reference.org())?;
        Ok(authorize(&principal, &snapshot, reference, action, candidates))
    }

    /// Require permission for `action` on a single resource, returning it back.
    fn require<T: UrnResource>(
        &self,
        caller: &AuthenticatedUser,
        action: Action,
        resource: T,
    ) -> ApiResult<T> {
        let reference = resource.urn().clone();
        self.authorized(caller, &reference, action, vec![resource])?
            .pop()
            .ok_or_else(|| unauthorized(caller, &reference, action))
    }
}

fn unauthorized(caller: &AuthenticatedUser, urn: &Urn, action: Action) -> ApiError {
    warn!(
        event = "Api",
        phase = "Unauthorized",
        principal = caller.identifier.as_str(),
        action = action.as_ref(),
        urn = urn.as_str()
    );
    ApiError::Unauthorized {
        principal: caller.identifier.clone(),
        urn: urn.to_string(),
    }
}

/// Apply a resolved filter's window to an already authorized listing.
fn window<T>(items: Vec<T>, filter: &Filter) -> Page<T> {
    let total = items.len();
    let items = items
        .into_iter()
        .skip(filter.offset)
        .take(filter.limit)
        .collect();
    Page::new(items, total)
}

fn check_org(org: &str) -> ApiResult<()> {
    if is_valid_org(org) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!("org {org}")))
    }
}

fn check_name(what: &str, name: &str) -> ApiResult<()> {
    if is_valid_name(name) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!("{what} name {name}")))
    }
}

fn check_external_id(id: &str) -> ApiResult<()> {
    if is_valid_external_id(id) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!("user external id {id}")))
    }
}

fn check_path(path: &str) -> ApiResult<()> {
    if is_valid_path(path) {
        Ok(())
    } else {
        Err(ApiError::invalid(format!("path {path}")))
    }
}

/// An empty prefix means the root.
fn check_path_prefix(filter: &Filter) -> ApiResult<()> {
    if filter.path_prefix.is_empty() {
        Ok(())
    } else {
        check_path(&filter.path_prefix)
    }
}

#[cfg(test)]
mod tests;
