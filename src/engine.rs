//! The policy authorization engine.
//!
//! Three pure stages, none of which performs I/O:
//! 1. [`resolve_statements`] flattens the policies attached to a principal, directly
//!    and through its groups, into one statement set for one organization.
//! 2. [`evaluate`] applies default-deny / deny-overrides to one `(action, urn)` pair.
//! 3. [`authorize`] filters a candidate list down to what the principal may act on.

use itertools::Itertools;
use tracing::{debug, info};

use crate::traits::UrnResource;
use crate::types::{Action, Decision, Effect, GroupIdentity, Policy, Principal, Statement, Urn};

/// Policies reachable from a principal, already fetched by the caller.
#[derive(Debug, Clone, Default)]
pub struct PermissionSnapshot {
    direct: Vec<Policy>,
    groups: Vec<(GroupIdentity, Vec<Policy>)>,
}

impl PermissionSnapshot {
    pub fn new() -> Self {
        PermissionSnapshot::default()
    }

    /// Policies attached to the principal itself.
    pub fn with_direct_policies<I>(mut self, policies: I) -> Self
    where
        I: IntoIterator<Item = Policy>,
    {
        self.direct.extend(policies);
        self
    }

    /// Policies attached to one group.
    pub fn with_group_policies<I>(mut self, group: GroupIdentity, policies: I) -> Self
    where
        I: IntoIterator<Item = Policy>,
    {
        self.groups.push((group, policies.into_iter().collect()));
        self
    }

    pub fn is_empty(&self) -> bool {
        self.direct.is_empty() && self.groups.iter().all(|(_, p)| p.is_empty())
    }
}

/// The statements governing one principal inside one organization.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EffectivePermissions {
    org: String,
    statements: Vec<Statement>,
}

impl EffectivePermissions {
    pub fn org(&self) -> &str {
        &self.org
    }

    pub fn statements(&self) -> &[Statement] {
        &self.statements
    }

    pub fn evaluate(&self, action: Action, target: &Urn) -> Decision {
        evaluate(&self.statements, action.as_ref(), target.as_str())
    }
}

/// Flatten direct and group-inherited policies into one statement set.
///
/// Only policies owned by `org` count, and group policies only count for groups of
/// `org` the principal is currently a member of. Duplicate statements are dropped.
pub fn resolve_statements(
    principal: &Principal,
    org: &str,
    snapshot: &PermissionSnapshot,
) -> EffectivePermissions {
    let direct = snapshot.direct.iter();
    let inherited = snapshot
        .groups
        .iter()
        .filter(|(group, _)| group.org == org && principal.is_member_of(group))
        .flat_map(|(_, policies)| policies.iter());

    let statements: Vec<Statement> = direct
        .chain(inherited)
        .filter(|policy| policy.org == org)
        .flat_map(|policy| policy.statements.iter())
        .unique()
        .cloned()
        .collect();

    debug!(
        event = "Authorize",
        phase = "Resolved",
        principal = principal.id(),
        org = org,
        statements = statements.len()
    );

    EffectivePermissions {
        org: org.to_string(),
        statements,
    }
}

/// Decide one `(action, target)` pair. Any applicable deny wins, otherwise any
/// applicable allow wins, otherwise the answer is deny.
pub fn evaluate(statements: &[Statement], action: &str, target: &str) -> Decision {
    let mut allowed = false;
    for statement in statements.iter().filter(|s| s.applies_to(action, target)) {
        match statement.effect {
            Effect::Deny => return Decision::Deny,
            Effect::Allow => allowed = true,
        }
    }
    if allowed {
        Decision::Allow
    } else {
        Decision::Deny
    }
}

/// Return the candidates `principal` may perform `action` on, in input order.
///
/// `reference` is either the exact URN of the targeted resource or a listing prefix
/// such as `urn:acme:policy:/team/*`. Its organization scopes the whole request:
/// candidates of another organization are never returned, and for a prefix only
/// candidates under the prefix are. Candidates whose resource type differs from the
/// one `action` applies to are dropped. Each remaining candidate is evaluated on its
/// own URN. Administrators skip evaluation but not scoping.
pub fn authorize<R, I>(
    principal: &Principal,
    snapshot: &PermissionSnapshot,
    reference: &Urn,
    action: Action,
    candidates: I,
) -> Vec<R>
where
    R: UrnResource,
    I: IntoIterator<Item = R>,
{
    let org = reference.org();
    let resource_type = action.resource_type();
    let in_scope = |candidate: &R| {
        candidate.org() == org
            && candidate.urn().resource_type() == Some(resource_type)
            && (!reference.is_prefix() || reference.covers(candidate.urn()))
    };

    if principal.is_admin() {
        info!(
            event = "Authorize",
            phase = "AdminBypass",
            principal = principal.id(),
            action = action.as_ref(),
            reference = reference.as_str()
        );
        return candidates.into_iter().filter(|c| in_scope(c)).collect();
    }

    let permissions = resolve_statements(principal, org, snapshot);

    candidates
        .into_iter()
        .filter(|candidate| {
            if !in_scope(candidate) {
                return false;
            }
            let decision = permissions.evaluate(action, candidate.urn());
            debug!(
                event = "Authorize",
                phase = "Decision",
                principal = principal.id(),
                action = action.as_ref(),
                resource = candidate.urn().as_str(),
                decision = %decision
            );
            decision.is_allowed()
        })
        .collect()
}

#[cfg(test)]
mod tests;
