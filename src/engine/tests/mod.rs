use super::*;
use crate::types::{ResourceType, create_urn, urn_prefix};
use yare::parameterized;


/// A bare resource for candidate lists.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Doc {
    urn: Urn,
}

impl Doc {
    fn new(urn: &str) -> Self {
        Doc {
            urn: urn.parse().unwrap(),
        }
    }
}

impl UrnResource for Doc {
    fn urn(&self) -> &Urn {
        &self.urn
    }
}

fn policy(org: &str, name: &str, statements: Vec<Statement>) -> Policy {
    Policy::new(org, name, "/", statements).unwrap()
}

fn urn(s: &str) -> Urn {
    s.parse().unwrap()
}

fn urns<R: UrnResource>(resources: &[R]) -> Vec<&str> {
    resources.iter().map(|r| r.urn().as_str()).collect()
}

#[test]
fn test_end_to_end_group_scenario() {
    let p1 = policy(
        "A",
        "P1",
        vec![Statement::allow(["policy:get"], ["urn:A:policy:/*"])],
    );
    let g1 = GroupIdentity::new("A", "G1");
    let snapshot = PermissionSnapshot::new().with_group_policies(g1.clone(), vec![p1]);
    let p2 = Doc::new("urn:A:policy:/finance/p2");
    let reference = urn("urn:A:policy:/finance/p2");

    let member = Principal::new("U1").with_groups([g1]);
    let allowed = authorize(
        &member,
        &snapshot,
        &reference,
        Action::GetPolicy,
        vec![p2.clone()],
    );
    assert_eq!(allowed, vec![p2.clone()]);

    let removed = Principal::new("U1");
    let allowed = authorize(&removed, &snapshot, &reference, Action::GetPolicy, vec![p2]);
    assert!(allowed.is_empty());
}

#[test]
fn test_admin_bypasses_evaluation() {
    let principal = Principal::admin("root");
    let reference = urn_prefix("acme", ResourceType::Policy, "/").unwrap();
    let candidates = vec![
        Doc::new("urn:acme:policy:/a"),
        Doc::new("urn:globex:policy:/b"),
        Doc::new("urn:acme:policy:/team/c"),
    ];

    let allowed = authorize(
        &principal,
        &PermissionSnapshot::new(),
        &reference,
        Action::ListPolicies,
        candidates,
    );
    assert_eq!(urns(&allowed), vec!["urn:acme:policy:/a", "urn:acme:policy:/team/c"]);
}

#[test]
fn test_authorize_accepts_borrowed_candidates() {
    let principal = Principal::new("alice");
    let snapshot = PermissionSnapshot::new().with_direct_policies(vec![policy(
        "acme",
        "all",
        vec![Statement::allow(["*"], ["urn:acme:*"])],
    )]);
    let docs = vec![Doc::new("urn:acme:policy:/a"), Doc::new("urn:acme:policy:/b")];
    let reference = create_urn("acme", ResourceType::Policy, "/", "a").unwrap();

    let allowed = authorize(&principal, &snapshot, &reference, Action::DeletePolicy, &docs);
    assert_eq!(allowed.len(), 2);
    assert_eq!(allowed[0], &docs[0]);
}

#[test]
fn test_concurrent_authorization() {
    use std::sync::Arc;
    use std::thread;

    let snapshot = Arc::new(PermissionSnapshot::new().with_direct_policies(vec![policy(
        "acme",
        "readers",
        vec![Statement::allow(["policy:get"], ["urn:acme:policy:/*"])],
    )]));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let snapshot = Arc::clone(&snapshot);
            thread::spawn(move || {
                let principal = Principal::new(format!("user-{i}"));
                for n in 0..50 {
                    let doc = Doc::new(&format!("urn:acme:policy:/p{n}"));
                    let reference = doc.urn.clone();
                    let allowed =
                        authorize(&principal, &snapshot, &reference, Action::GetPolicy, vec![doc]);
                    assert_eq!(allowed.len(), 1);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
