//! Data model for the authorization engine and the domain operations.
//!
//! Canonical string forms:
//! - URN: `urn:<org>:<resource-type>:<path><name>`, e.g. `urn:acme:policy:/finance/p1`
//! - URN prefix: `urn:<org>:<resource-type>:<path>*`, e.g. `urn:acme:policy:/finance/*`
//! - Action: `<resource-type>:<verb>`, e.g. `policy:get`, `group:add-member`
//!
//! Wire field names follow the service's JSON API (`ID`, `Name`, `Path`, `Org`,
//! `CreateAt`, `Urn`, `Statements`).

mod action;
mod decision;
mod filter;
mod group;
mod policy;
mod principal;
mod statement;
mod urn;
mod user;

pub use action::Action;
pub use decision::Decision;
pub use filter::{Filter, Page};
pub use group::{Group, GroupIdentity, GroupMembers};
pub use policy::{Policy, PolicyIdentity};
pub use principal::Principal;
pub use statement::{Effect, Statement};
pub use urn::{ResourceType, Urn, create_urn, urn_prefix};
pub use user::{AuthenticatedUser, User};
