use tracing::info;

use super::{ApiResult, AuthApi, check_name, check_org, check_path, check_path_prefix, window};
use crate::repository::Repository;
use crate::types::{
    Action, AuthenticatedUser, Filter, GroupIdentity, Page, Policy, PolicyIdentity, ResourceType,
    Statement, urn_prefix,
};
use crate::validation::validate_statements;

impl<R: Repository> AuthApi<R> {
    pub fn get_policy_by_name(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        name: &str,
    ) -> ApiResult<Policy> {
        check_name("policy", name)?;
        check_org(org)?;

        let policy = self.repo.get_policy_by_name(org, name)?;
        self.require(caller, Action::GetPolicy, policy)
    }

    /// List the policies under a path prefix that the caller may list.
    pub fn list_policies(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        filter: &Filter,
    ) -> ApiResult<Page<PolicyIdentity>> {
        check_path_prefix(filter)?;
        check_org(org)?;
        let filter = self.config.resolve_filter(filter);

        let policies = self
            .repo
            .get_policies_filtered(org, &Filter::with_path_prefix(&filter.path_prefix))?;
        let reference = urn_prefix(org, ResourceType::Policy, &filter.path_prefix)?;
        let allowed = self.authorized(caller, &reference, Action::ListPolicies, policies.items)?;

        Ok(window(allowed, &filter).map(|p| p.identity()))
    }

    pub fn add_policy(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        name: &str,
        path: &str,
        statements: Vec<Statement>,
    ) -> ApiResult<Policy> {
        check_name("policy", name)?;
        check_org(org)?;
        check_path(path)?;
        validate_statements(&statements)?;

        let policy = Policy::new(org, name, path, statements)?;
        let policy = self.require(caller, Action::CreatePolicy, policy)?;
        let created = self.repo.add_policy(policy)?;

        info!(event = "Api", phase = "PolicyCreated", urn = created.urn.as_str());
        Ok(created)
    }

    /// Replace name, path and statements of a policy. The caller needs
    /// `policy:update` on both the current and the resulting URN.
    pub fn update_policy(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        name: &str,
        new_name: &str,
        new_path: &str,
        new_statements: Vec<Statement>,
    ) -> ApiResult<Policy> {
        check_name("policy", name)?;
        check_org(org)?;
        check_name("policy new", new_name)?;
        check_path(new_path)?;
        validate_statements(&new_statements)?;

        let current = self.repo.get_policy_by_name(org, name)?;
        let current = self.require(caller, Action::UpdatePolicy, current)?;
        let updated = current.renamed(new_name, new_path, new_statements)?;
        let updated = self.require(caller, Action::UpdatePolicy, updated)?;
        let updated = self.repo.update_policy(updated)?;

        info!(
            event = "Api",
            phase = "PolicyUpdated",
            from = current.urn.as_str(),
            to = updated.urn.as_str()
        );
        Ok(updated)
    }

    pub fn remove_policy(&self, caller: &AuthenticatedUser, org: &str, name: &str) -> ApiResult<()> {
        check_name("policy", name)?;
        check_org(org)?;

        let policy = self.repo.get_policy_by_name(org, name)?;
        let policy = self.require(caller, Action::DeletePolicy, policy)?;
        self.repo.remove_policy(&policy.id)?;

        info!(event = "Api", phase = "PolicyRemoved", urn = policy.urn.as_str());
        Ok(())
    }

    /// The groups a policy is attached to.
    pub fn list_attached_groups(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        name: &str,
        filter: &Filter,
    ) -> ApiResult<Page<GroupIdentity>> {
        check_name("policy", name)?;
        check_org(org)?;
        check_path_prefix(filter)?;

        let policy = self.repo.get_policy_by_name(org, name)?;
        let policy = self.require(caller, Action::ListAttachedGroups, policy)?;
        let groups = self
            .repo
            .get_attached_groups(&policy.id, &self.config.resolve_filter(filter))?;

        Ok(groups.map(|g| g.identity()))
    }
}
