use tracing::info;

use super::{
    ApiResult, AuthApi, check_external_id, check_name, check_org, check_path, check_path_prefix,
    window,
};
use crate::repository::Repository;
use crate::types::{
    Action, AuthenticatedUser, Filter, Group, GroupIdentity, GroupMembers, Page, PolicyIdentity,
    ResourceType, urn_prefix,
};

impl<R: Repository> AuthApi<R> {
    pub fn add_group(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        name: &str,
        path: &str,
    ) -> ApiResult<Group> {
        check_name("group", name)?;
        check_org(org)?;
        check_path(path)?;

        let group = Group::new(org, name, path)?;
        let group = self.require(caller, Action::CreateGroup, group)?;
        let created = self.repo.add_group(group)?;

        info!(event = "Api", phase = "GroupCreated", urn = created.urn.as_str());
        Ok(created)
    }

    pub fn get_group(&self, caller: &AuthenticatedUser, org: &str, name: &str) -> ApiResult<Group> {
        check_name("group", name)?;
        check_org(org)?;

        let group = self.repo.get_group_by_name(org, name)?;
        self.require(caller, Action::GetGroup, group)
    }

    pub fn list_groups(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        filter: &Filter,
    ) -> ApiResult<Page<GroupIdentity>> {
        check_path_prefix(filter)?;
        check_org(org)?;
        let filter = self.config.resolve_filter(filter);

        let groups = self
            .repo
            .get_groups_filtered(org, &Filter::with_path_prefix(&filter.path_prefix))?;
        let reference = urn_prefix(org, ResourceType::Group, &filter.path_prefix)?;
        let allowed = self.authorized(caller, &reference, Action::ListGroups, groups.items)?;

        Ok(window(allowed, &filter).map(|g| g.identity()))
    }

    /// Rename or move a group; requires `group:update` on the old and the new URN.
    pub fn update_group(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        name: &str,
        new_name: &str,
        new_path: &str,
    ) -> ApiResult<Group> {
        check_name("group", name)?;
        check_org(org)?;
        check_name("group new", new_name)?;
        check_path(new_path)?;

        let current = self.repo.get_group_by_name(org, name)?;
        let current = self.require(caller, Action::UpdateGroup, current)?;
        let updated = self.require(caller, Action::UpdateGroup, current.renamed(new_name, new_path)?)?;
        let updated = self.repo.update_group(updated)?;

        info!(
            event = "Api",
            phase = "GroupUpdated",
            from = current.urn.as_str(),
            to = updated.urn.as_str()
        );
        Ok(updated)
    }

    pub fn remove_group(&self, caller: &AuthenticatedUser, org: &str, name: &str) -> ApiResult<()> {
        check_name("group", name)?;
        check_org(org)?;

        let group = self.repo.get_group_by_name(org, name)?;
        let group = self.require(caller, Action::DeleteGroup, group)?;
        self.repo.remove_group(&group.id)?;

        info!(event = "Api", phase = "GroupRemoved", urn = group.urn.as_str());
        Ok(())
    }

    pub fn add_member(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        group_name: &str,
        external_id: &str,
    ) -> ApiResult<()> {
        check_name("group", group_name)?;
        check_external_id(external_id)?;
        check_org(org)?;

        let group = self.repo.get_group_by_name(org, group_name)?;
        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let group = self.require(caller, Action::AddMember, group)?;
        self.repo.add_member(&user.id, &group.id)?;

        info!(
            event = "Api",
            phase = "MemberAdded",
            group = group.urn.as_str(),
            user = user.urn.as_str()
        );
        Ok(())
    }

    pub fn remove_member(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        group_name: &str,
        external_id: &str,
    ) -> ApiResult<()> {
        check_name("group", group_name)?;
        check_external_id(external_id)?;
        check_org(org)?;

        let group = self.repo.get_group_by_name(org, group_name)?;
        let user = self.repo.get_user_by_external_id(org, external_id)?;
        let group = self.require(caller, Action::RemoveMember, group)?;
        self.repo.remove_member(&user.id, &group.id)?;

        info!(
            event = "Api",
            phase = "MemberRemoved",
            group = group.urn.as_str(),
            user = user.urn.as_str()
        );
        Ok(())
    }

    pub fn list_members(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        group_name: &str,
        filter: &Filter,
    ) -> ApiResult<GroupMembers> {
        check_name("group", group_name)?;
        check_org(org)?;
        check_path_prefix(filter)?;

        let group = self.repo.get_group_by_name(org, group_name)?;
        let group = self.require(caller, Action::ListMembers, group)?;
        let members = self
            .repo
            .get_group_members(&group.id, &self.config.resolve_filter(filter))?;

        Ok(GroupMembers::from_users(&members.items, members.total))
    }

    pub fn attach_policy(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        group_name: &str,
        policy_name: &str,
    ) -> ApiResult<()> {
        check_name("group", group_name)?;
        check_name("policy", policy_name)?;
        check_org(org)?;

        let group = self.repo.get_group_by_name(org, group_name)?;
        let policy = self.repo.get_policy_by_name(org, policy_name)?;
        let group = self.require(caller, Action::AttachGroupPolicy, group)?;
        self.repo.attach_policy(&group.id, &policy.id)?;

        info!(
            event = "Api",
            phase = "GroupPolicyAttached",
            group = group.urn.as_str(),
            policy = policy.urn.as_str()
        );
        Ok(())
    }

    pub fn detach_policy(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        group_name: &str,
        policy_name: &str,
    ) -> ApiResult<()> {
        check_name("group", group_name)?;
        check_name("policy", policy_name)?;
        check_org(org)?;

        let group = self.repo.get_group_by_name(org, group_name)?;
        let policy = self.repo.get_policy_by_name(org, policy_name)?;
        let group = self.require(caller, Action::DetachGroupPolicy, group)?;
        self.repo.detach_policy(&group.id, &policy.id)?;

        info!(
            event = "Api",
            phase = "GroupPolicyDetached",
            group = group.urn.as_str(),
            policy = policy.urn.as_str()
        );
        Ok(())
    }

    pub fn list_attached_policies(
        &self,
        caller: &AuthenticatedUser,
        org: &str,
        group_name: &str,
        filter: &Filter,
    ) -> ApiResult<Page<PolicyIdentity>> {
        check_name("group", group_name)?;
        check_org(org)?;
        check_path_prefix(filter)?;

        let group = self.repo.get_group_by_name(org, group_name)?;
        let group = self.require(caller, Action::ListAttachedGroupPolicies, group)?;
        let policies = self
            .repo
            .get_attached_policies(&group.id, &self.config.resolve_filter(filter))?;

        Ok(policies.map(|p| p.identity()))
    }
}
