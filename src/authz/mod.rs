mod admin;
mod default;
mod owner;
mod rule;
mod union;

pub mod chain;
pub mod config;
pub mod factory;

use anyhow::Result;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::types::principal::Principal;

/// Policy evaluation of a named permission against a storage object.
///
/// Implementations are shared by all requests and must not keep per-request
/// state.
pub trait Authorizer: Send + Sync {
    /// Authorizes a request and returns the decision.
    ///
    /// An `Err` means the decision could not be made (for example the role
    /// tables could not be read); it is never used for an ordinary denial.
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse>;
}

/// A storage-level object that permissions can be checked against.
pub trait Authorizable {
    /// Resource kind matched by role rules, e.g. `package`.
    fn kind(&self) -> &'static str;

    fn id(&self) -> i64;

    /// ID of the user owning this object, if ownership is known without
    /// further lookups.
    fn owner_id(&self) -> Option<i64>;
}

pub struct AuthzRequest<'a> {
    pub object: &'a dyn Authorizable,
    pub principal: &'a Principal,
    pub permission: &'a str,
}

/// Possible responses from an authorization check.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum AuthzResponse {
    /// Access is granted
    Ok,
    /// Defers decision to next authorizer in chain
    Continue,
    /// Access is denied
    Unauthorized,
}

static PERMISSION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_.]+$").unwrap());

pub fn is_valid_permission(permission: &str) -> bool {
    PERMISSION_REGEX.is_match(permission)
}
