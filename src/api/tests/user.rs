use super::*;
use crate::error::EntityKind;

#[test]
fn test_add_and_get_user() {
    let api = api();
    let created = api
        .add_user(&root(), ORG, "dave@example.com", "/eng/")
        .unwrap();
    assert_eq!(created.urn.as_str(), "urn:acme:user:/eng/dave@example.com");

    let fetched = api.get_user(&root(), ORG, "dave@example.com").unwrap();
    assert_eq!(fetched, created);

    let err = api
        .add_user(&root(), ORG, "dave@example.com", "/")
        .unwrap_err();
    assert!(matches!(
        err,
        ApiError::AlreadyExists {
            kind: EntityKind::User,
            ..
        }
    ));
}

#[test]
fn test_same_external_id_in_two_orgs() {
    let api = api();
    api.add_user(&root(), ORG, "dave", "/").unwrap();
    api.add_user(&root(), "globex", "dave", "/").unwrap();
    assert_ne!(
        api.get_user(&root(), ORG, "dave").unwrap().id,
        api.get_user(&root(), "globex", "dave").unwrap().id
    );
}

#[test]
fn test_user_can_read_itself() {
    let api = api();
    grant(
        &api,
        "alice",
        "self",
        vec![Statement::allow(["user:get"], ["urn:acme:user:/alice"])],
    );
    api.add_user(&root(), ORG, "bob", "/").unwrap();

    assert!(api.get_user(&caller("alice"), ORG, "alice").is_ok());
    assert!(matches!(
        api.get_user(&caller("alice"), ORG, "bob").unwrap_err(),
        ApiError::Unauthorized { .. }
    ));
}

#[test]
fn test_update_user_moves_path() {
    let api = api();
    api.add_user(&root(), ORG, "dave", "/").unwrap();
    let moved = api.update_user(&root(), ORG, "dave", "/eng/").unwrap();
    assert_eq!(moved.urn.as_str(), "urn:acme:user:/eng/dave");

    let listed = api
        .list_users(&root(), ORG, &Filter::with_path_prefix("/eng/"))
        .unwrap();
    assert_eq!(listed.total, 1);
    assert_eq!(listed.items[0].external_id, "dave");
}

#[test]
fn test_list_users_pages() {
    let api = api();
    for n in 0..4 {
        api.add_user(&root(), ORG, &format!("u{n}"), "/").unwrap();
    }
    let page = api
        .list_users(&root(), ORG, &Filter::default().paged(3, 10))
        .unwrap();
    assert_eq!(page.total, 4);
    assert_eq!(page.items.len(), 1);
    assert_eq!(page.items[0].external_id, "u3");
}

#[test]
fn test_direct_policies() {
    let api = api();
    api.add_user(&root(), ORG, "dave", "/").unwrap();
    api.add_policy(
        &root(),
        ORG,
        "readers",
        "/",
        vec![Statement::allow(["policy:get"], ["urn:acme:policy:/*"])],
    )
    .unwrap();

    assert!(api.get_policy_by_name(&caller("dave"), ORG, "readers").is_err());
    api.attach_user_policy(&root(), ORG, "dave", "readers").unwrap();
    assert!(api.get_policy_by_name(&caller("dave"), ORG, "readers").is_ok());

    let policies = api
        .list_user_policies(&root(), ORG, "dave", &Filter::default())
        .unwrap();
    assert_eq!(policies.total, 1);
    assert_eq!(policies.items[0].name, "readers");

    api.detach_user_policy(&root(), ORG, "dave", "readers").unwrap();
    assert!(matches!(
        api.detach_user_policy(&root(), ORG, "dave", "readers").unwrap_err(),
        ApiError::NotFound {
            kind: EntityKind::Attachment,
            ..
        }
    ));
    assert!(api.get_policy_by_name(&caller("dave"), ORG, "readers").is_err());
}

#[test]
fn test_remove_user() {
    let api = api();
    api.add_user(&root(), ORG, "dave", "/").unwrap();
    api.add_group(&root(), ORG, "g", "/").unwrap();
    api.add_member(&root(), ORG, "g", "dave").unwrap();

    api.remove_user(&root(), ORG, "dave").unwrap();
    let members = api
        .list_members(&root(), ORG, "g", &Filter::default())
        .unwrap();
    assert_eq!(members.total, 0);
    assert!(matches!(
        api.get_user(&root(), ORG, "dave").unwrap_err(),
        ApiError::NotFound { .. }
    ));
}

#[test]
fn test_invalid_external_id() {
    let api = api();
    let err = api.add_user(&root(), ORG, "bad id", "/").unwrap_err();
    assert_eq!(err.status_code(), 400);
}

#[test]
fn test_user_relation_listings_are_paged() {
    let api = api();
    api.add_user(&root(), ORG, "dave", "/").unwrap();
    for (name, path) in [("a", "/"), ("b", "/eng/"), ("c", "/eng/")] {
        api.add_group(&root(), ORG, name, path).unwrap();
        api.add_member(&root(), ORG, name, "dave").unwrap();
        api.add_policy(
            &root(),
            ORG,
            &format!("{name}-policy"),
            path,
            vec![Statement::allow(["policy:get"], ["urn:acme:policy:/*"])],
        )
        .unwrap();
        api.attach_user_policy(&root(), ORG, "dave", &format!("{name}-policy"))
            .unwrap();
    }

    let groups = api
        .list_groups_for_user(&root(), ORG, "dave", &Filter::with_path_prefix("/eng/"))
        .unwrap();
    assert_eq!(groups.total, 2);
    let names: Vec<&str> = groups.items.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(names, vec!["b", "c"]);

    let policies = api
        .list_user_policies(&root(), ORG, "dave", &Filter::default().paged(2, 1))
        .unwrap();
    assert_eq!(policies.total, 3);
    assert_eq!(policies.items.len(), 1);
    assert_eq!(policies.items[0].name, "c-policy");

    let err = api
        .list_user_policies(&root(), ORG, "dave", &Filter::with_path_prefix("eng"))
        .unwrap_err();
    assert!(matches!(err, ApiError::InvalidParameter(_)));
}
