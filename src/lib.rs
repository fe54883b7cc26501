// src/lib.rs
pub use api::{ApiResult, AuthApi};
pub use config::CoreConfig;
pub use engine::{EffectivePermissions, PermissionSnapshot, authorize, evaluate, resolve_statements};
pub use error::{ApiError, EntityKind, RepositoryError};
pub use repository::{GroupRepo, MemoryRepository, PolicyRepo, RepoResult, Repository, UserRepo};
pub use traits::UrnResource;
pub use types::{
    Action, AuthenticatedUser, Decision, Effect, Filter, Group, GroupIdentity, GroupMembers, Page,
    Policy, PolicyIdentity, Principal, ResourceType, Statement, Urn, User, create_urn, urn_prefix,
};

pub mod api;
pub mod config;
pub mod engine;
pub mod error;
pub mod pattern;
pub mod repository;
pub mod traits;
pub mod types;
pub mod validation;
