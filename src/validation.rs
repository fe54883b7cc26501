//! Field-format checks applied before any authorization decision.

use once_cell::sync::Lazy;
use regex::Regex;
use strum::IntoEnumIterator;

use crate::error::ApiError;
use crate::pattern::matches;
use crate::types::{Action, Statement};

static NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-]+$").expect("valid name regex"));
static ORG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[\w\-]+$").expect("valid org regex"));
static EXTERNAL_ID_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\-.@]+$").expect("valid external id regex"));
static PATH_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/(?:[\w\-]+/)*$").expect("valid path regex"));
static ACTION_PATTERN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\w\-:*]+$").expect("valid action pattern regex"));
static RESOURCE_PATTERN_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^urn:[\w\-*]+:[\w\-*]+:[\w\-/.@*]*$").expect("valid resource regex"));

const MAX_NAME_LEN: usize = 128;
const MAX_PATH_LEN: usize = 512;

pub fn is_valid_name(name: &str) -> bool {
    name.len() <= MAX_NAME_LEN && NAME_RE.is_match(name)
}

pub fn is_valid_org(org: &str) -> bool {
    org.len() <= MAX_NAME_LEN && ORG_RE.is_match(org)
}

/// User identifiers come from the authentication collaborator and may be e-mail like.
pub fn is_valid_external_id(id: &str) -> bool {
    id.len() <= MAX_NAME_LEN && EXTERNAL_ID_RE.is_match(id)
}

/// A path starts and ends with `/` and has no empty segments, e.g. `/` or `/team/infra/`.
pub fn is_valid_path(path: &str) -> bool {
    path.len() <= MAX_PATH_LEN && PATH_RE.is_match(path)
}

fn is_valid_action_pattern(pattern: &str) -> bool {
    ACTION_PATTERN_RE.is_match(pattern) && Action::iter().any(|a| matches(pattern, a.as_ref()))
}

fn is_valid_resource_pattern(pattern: &str) -> bool {
    pattern == "*" || RESOURCE_PATTERN_RE.is_match(pattern)
}

/// Check a policy body: at least one statement, each with at least one action and
/// resource, every action pattern naming at least one known action.
pub fn validate_statements(statements: &[Statement]) -> Result<(), ApiError> {
    if statements.is_empty() {
        return Err(ApiError::invalid("policy must contain at least one statement"));
    }

    for (idx, statement) in statements.iter().enumerate() {
        if statement.actions.is_empty() {
            return Err(ApiError::invalid(format!("statement {idx} has no actions")));
        }
        if statement.resources.is_empty() {
            return Err(ApiError::invalid(format!("statement {idx} has no resources")));
        }
        if let Some(bad) = statement
            .actions
            .iter()
            .find(|a| !is_valid_action_pattern(a))
        {
            return Err(ApiError::invalid(format!(
                "statement {idx} has unknown action pattern '{bad}'"
            )));
        }
        if let Some(bad) = statement
            .resources
            .iter()
            .find(|r| !is_valid_resource_pattern(r))
        {
            return Err(ApiError::invalid(format!(
                "statement {idx} has invalid resource pattern '{bad}'"
            )));
        }
    }

    Ok(())
}
