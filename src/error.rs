use thiserror::Error;

/// Classified failure of an authorization check.
///
/// Only [`AuthzError::AccessDenied`] is an ordinary outcome. The other two
/// variants carry a diagnostic that should be logged but never shown to the
/// caller verbatim.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthzError {
    /// The principal is absent or does not hold the required right.
    #[error("access denied")]
    AccessDenied,

    /// Storage or conversion failure while deciding.
    #[error("unable to authorize: {0}")]
    Internal(String),

    /// The owning-field path or permission name does not fit the resource.
    #[error("unable to authorize, invalid directive: {0}")]
    InvalidDirective(String),
}

impl AuthzError {
    pub fn internal(err: anyhow::Error) -> Self {
        Self::Internal(format!("{err:#}"))
    }

    pub fn is_denied(&self) -> bool {
        matches!(self, Self::AccessDenied)
    }
}
