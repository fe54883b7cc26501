use super::*;
use crate::repository::{MemoryRepository, PolicyRepo};
use crate::types::Statement;
use insta::assert_snapshot;

mod user;

const ORG: &str = "acme";

fn api() -> AuthApi<MemoryRepository> {
    AuthApi::new(MemoryRepository::new(), CoreConfig::default())
}

fn root() -> AuthenticatedUser {
    AuthenticatedUser::admin("root")
}

fn caller(id: &str) -> AuthenticatedUser {
    AuthenticatedUser::new(id)
}

/// Create `user` (if needed) and attach a fresh policy holding `statements` to it.
fn grant(api: &AuthApi<MemoryRepository>, user: &str, policy: &str, statements: Vec<Statement>) {
    if api.get_user(&root(), ORG, user).is_err() {
        api.add_user(&root(), ORG, user, "/").unwrap();
    }
    api.add_policy(&root(), ORG, policy, "/grants/", statements)
        .unwrap();
    api.attach_user_policy(&root(), ORG, user, policy).unwrap();
}

fn names(page: &Page<crate::types::PolicyIdentity>) -> Vec<&str> {
    page.items.iter().map(|p| p.name.as_str()).collect()
}

#[test]
fn test_unknown_caller_gets_empty_permissions() {
    let api = api();
    let (principal, snapshot) = api.load_permissions(&caller("nobody"), ORG).unwrap();
    assert!(!principal.is_admin());
    assert!(principal.groups().is_empty());
    assert!(snapshot.is_empty());
}

#[test]
fn test_configured_admin_is_admin() {
    let api = AuthApi::new(
        MemoryRepository::new(),
        CoreConfig::default().with_admins(["ops"]),
    );
    let (principal, _) = api.load_permissions(&caller("ops"), ORG).unwrap();
    assert!(principal.is_admin());

    let created = api.add_group(&caller("ops"), ORG, "operators", "/").unwrap();
    assert_eq!(created.urn.as_str(), "urn:acme:group:/operators");
}

#[test]
fn test_load_permissions_collects_direct_and_group_policies() {
    let api = api();
    grant(
        &api,
        "alice",
        "own",
        vec![Statement::allow(["user:get"], ["urn:acme:user:/alice"])],
    );
    api.add_group(&root(), ORG, "readers", "/").unwrap();
    api.add_policy(
        &root(),
        ORG,
        "read-all",
        "/",
        vec![Statement::allow(["policy:get"], ["urn:acme:policy:/*"])],
    )
    .unwrap();
    api.attach_policy(&root(), ORG, "readers", "read-all").unwrap();
    api.add_member(&root(), ORG, "readers", "alice").unwrap();

    let (principal, snapshot) = api.load_permissions(&caller("alice"), ORG).unwrap();
    assert_eq!(principal.groups(), &[crate::types::GroupIdentity::new(ORG, "readers")]);

    let permissions = crate::engine::resolve_statements(&principal, ORG, &snapshot);
    assert_eq!(permissions.statements().len(), 2);
}

#[test]
fn test_end_to_end_group_inherited_access() {
    let api = api();
    api.add_user(&root(), ORG, "u1", "/").unwrap();
    api.add_group(&root(), ORG, "g1", "/").unwrap();
    api.add_policy(
        &root(),
        ORG,
        "p1",
        "/",
        vec![Statement::allow(["policy:get"], ["urn:acme:policy:/*"])],
    )
    .unwrap();
    api.add_policy(
        &root(),
        ORG,
        "p2",
        "/finance/",
        vec![Statement::deny(["*"], ["*"])],
    )
    .unwrap();
    api.attach_policy(&root(), ORG, "g1", "p1").unwrap();
    api.add_member(&root(), ORG, "g1", "u1").unwrap();

    let fetched = api.get_policy_by_name(&caller("u1"), ORG, "p2").unwrap();
    assert_eq!(fetched.urn.as_str(), "urn:acme:policy:/finance/p2");

    api.remove_member(&root(), ORG, "g1", "u1").unwrap();
    let err = api.get_policy_by_name(&caller("u1"), ORG, "p2").unwrap_err();
    assert_eq!(err.status_code(), 403);
}

#[test]
fn test_unauthorized_error_text() {
    let api = api();
    api.add_policy(
        &root(),
        ORG,
        "secret",
        "/",
        vec![Statement::allow(["policy:get"], ["urn:acme:policy:/secret"])],
    )
    .unwrap();

    let err = api
        .get_policy_by_name(&caller("mallory"), ORG, "secret")
        .unwrap_err();
    assert_snapshot!(err.to_string(), @"principal mallory is not allowed to access resource urn:acme:policy:/secret");
}

#[test]
fn test_repository_is_shared_with_caller() {
    let api = api();
    api.add_policy(
        &root(),
        ORG,
        "shared",
        "/",
        vec![Statement::allow(["policy:get"], ["*"])],
    )
    .unwrap();
    assert!(api.repository().get_policy_by_name(ORG, "shared").is_ok());
    assert_eq!(api.config().default_limit, 20);
}
