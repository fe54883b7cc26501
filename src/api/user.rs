use tracing::info;

use super::{
    ApiResult, AuthApi, check_external_id, check_name, check_org, check_path, check_path_prefix,
    window,
};
use crate::repository::Repository;
use crate::types::{
    Action, AuthenticatedUser, Filter, GroupIdentity, Page, PolicyIdentity, ResourceType, User,
    urn_prefix,
};

impl<R: Repository> AuthApi<R> {
    pub fn add_user(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
        path: &str,
    ) -> ApiResult<User> {
        check_external_id(external_id)?;
        check_org(org)?;
        check_path(path)?;

        let user = User::new(org, external_id, path)?;
        let user = self.require(caller, Action::CreateUser, user)?;
        let created = self.repo.add_user(user)?;

        info!(event = "Api", phase = "UserCreated", urn = created.urn.as_str());
        Ok(created)
    }

    pub fn get_user(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
    ) -> ApiResult<User> {
        check_external_id(external_id)?;
        check_org(org)?;

        let user = self.repo.get_user_by_external_id(org, external_id)?;
        self.require(caller, Action::GetUser, user)
    }

    pub fn list_users(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        filter: &Filter,
    ) -> ApiResult<Page<User>> {
        check_path_prefix(filter)?;
        check_org(org)?;
        let filter = self.config.resolve_filter(filter);

        let users = self
            .repo
            .get_users_filtered(org, &Filter::with_path_prefix(&filter.path_prefix))?;
        let reference = urn_prefix(org, ResourceType::User, &filter.path_prefix)?;
        let allowed = self.authorized(caller, &reference, Action::ListUsers, users.items)?;

        Ok(window(allowed, &filter))
    }

    /// Move a user to a new path; requires `user:update` on the old and the new URN.
    pub fn update_user(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
        new_path: &str,
    ) -> ApiResult<User> {
        check_external_id(external_id)?;
        check_org(org)?;
        check_path(new_path)?;

        let current = self.repo.get_user_by_external_id(org, external_id)?;
        let current = self.require(caller, Action::UpdateUser, current)?;
        let updated = self.require(caller, Action::UpdateUser, current.moved(new_path)?)?;
        let updated = self.repo.update_user(updated)?;

        info!(
            event = "Api",
            phase = "UserUpdated",
            from = current.urn.as_str(),
            to = updated.urn.as_str()
        );
        Ok(updated)
    }

    pub fn remove_user(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
    ) -> ApiResult<()> {
        check_external_id(external_id)?;
        check_org(org)?;

        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let user = self.require(caller, Action::DeleteUser, user)?;
        self.repo.remove_user(&user.id)?;

        info!(event = "Api", phase = "UserRemoved", urn = user.urn.as_str());
        Ok(())
    }

    pub fn list_groups_for_user(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
        filter: &Filter,
    ) -> ApiResult<Page<GroupIdentity>> {
        check_external_id(external_id)?;
        check_org(org)?;
        check_path_prefix(filter)?;

        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let user = self.require(caller, Action::ListGroupsForUser, user)?;
        let groups = self
            .repo
            .get_groups_by_user_id(&user.id, &self.config.resolve_filter(filter))?;

        Ok(groups.map(|g| g.identity()))
    }

    pub fn attach_user_policy(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
        policy_name: &str,
    ) -> ApiResult<()> {
        check_external_id(external_id)?;
        check_name("policy", policy_name)?;
        check_org(org)?;

        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let policy = self.repo.get_policy_by_name(org, policy_name)?;
        let user = self.require(caller, Action::AttachUserPolicy, user)?;
        self.repo.attach_user_policy(&user.id, &policy.id)?;

        info!(
            event = "Api",
            phase = "UserPolicyAttached",
            user = user.urn.as_str(),
            policy = policy.urn.as_str()
        );
        Ok(())
    }

    pub fn detach_user_policy(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
        policy_name: &str,
    ) -> ApiResult<()> {
        check_external_id(external_id)?;
        check_name("policy", policy_name)?;
        check_org(org)?;

        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let policy = self.repo.get_policy_by_name(org, policy_name)?;
        let user = self.require(caller, Action::DetachUserPolicy, user)?;
        self.repo.detach_user_policy(&user.id, &policy.id)?;

        info!(
            event = "Api",
            phase = "UserPolicyDetached",
            user = user.urn.as_str(),
            policy = policy.urn.as_str()
        );
        Ok(())
    }

    /// Policies attached directly to a user, not through groups.
    pub fn list_user_policies(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        external_id: &str,
        filter: &Filter,
    ) -> ApiResult<Page<PolicyIdentity>> {
        check_external_id(external_id)?;
        check_org(org)?;
        check_path_prefix(filter)?;

        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let user = self.require(caller, Action::ListAttachedUserPolicies, user)?;
        let policies = self
            .repo
            .get_attached_user_policies(&user.id, &self.config.resolve_filter(filter))?;

        Ok(policies.map(|p| p.identity()))
    }
}
