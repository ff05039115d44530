//! Entry points used by the request pipeline to guard a protected operation.
//!
//! Each gate decides first and runs `next` only when access is granted.
//! `next`'s own result is returned unchanged. The `authorize_*` functions
//! make the same decisions without running anything.

use std::future::Future;

use log::{debug, error, warn};
use serde_json::Value;

use crate::authz::{is_valid_permission, AuthzRequest, AuthzResponse};
use crate::context::RequestContext;
use crate::convert::to_storage;
use crate::error::AuthzError;
use crate::inspect::Object;
use crate::path::FieldPath;
use crate::resolver::{OwnershipResolver, Verdict};
use crate::types::model::{Model, User};

/// Runs `next` only for admin principals.
pub async fn admin_only<T, E, F, Fut>(ctx: &RequestContext, next: F) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<AuthzError>,
{
    authorize_admin(ctx).map_err(|err| report::<E>("admin_only", err))?;
    next().await
}

/// Runs `next` for admins and for the principal owning `resource` through
/// `path`.
pub async fn owner_or_admin<T, E, F, Fut>(
    ctx: &RequestContext,
    resource: &Object,
    path: &FieldPath,
    next: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<AuthzError>,
{
    authorize_owner(ctx, resource, path).map_err(|err| report::<E>("owner_or_admin", err))?;
    next().await
}

/// Runs `next` when the authorizer grants `permission` on `resource`.
pub async fn check_permission<T, E, F, Fut>(
    ctx: &RequestContext,
    resource: &Object,
    permission: &str,
    next: F,
) -> Result<T, E>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
    E: From<AuthzError>,
{
    authorize_permission(ctx, resource, permission)
        .map_err(|err| report::<E>("check_permission", err))?;
    next().await
}

pub fn authorize_admin(ctx: &RequestContext) -> Result<(), AuthzError> {
    match ctx.principal() {
        Some(principal) if principal.is_admin => Ok(()),
        Some(principal) => {
            debug!("User {} is not an admin", principal.id);
            Err(AuthzError::AccessDenied)
        }
        None => {
            debug!("No principal in request");
            Err(AuthzError::AccessDenied)
        }
    }
}

pub fn authorize_owner(
    ctx: &RequestContext,
    resource: &Object,
    path: &FieldPath,
) -> Result<(), AuthzError> {
    let principal = match ctx.principal() {
        Some(principal) => principal,
        None => {
            debug!("No principal in request");
            return Err(AuthzError::AccessDenied);
        }
    };

    if principal.is_admin {
        return Ok(());
    }

    // A user resource is owned by that user only.
    if resource.model() == Some(User::NAME) {
        let id = resource.field(User::PRIMARY_KEY).and_then(Value::as_i64);
        return match id {
            Some(id) if id == principal.id => Ok(()),
            _ => Err(AuthzError::AccessDenied),
        };
    }

    // Resolver failures of any kind surface as internal errors. A path that
    // does not fit the resource is still logged as a bug.
    let resolver = OwnershipResolver::new(ctx.db(), ctx.registry());
    let verdict = match resolver.resolve(principal, resource, path) {
        Ok(verdict) => verdict,
        Err(AuthzError::InvalidDirective(msg)) => {
            error!(
                "Owning field path does not fit {} object: {msg}",
                resource.model().unwrap_or("mapping")
            );
            return Err(AuthzError::Internal(msg));
        }
        Err(err) => return Err(err),
    };

    match verdict {
        Verdict::Allow => Ok(()),
        Verdict::Deny => Err(AuthzError::AccessDenied),
    }
}

pub fn authorize_permission(
    ctx: &RequestContext,
    resource: &Object,
    permission: &str,
) -> Result<(), AuthzError> {
    let principal = match ctx.principal() {
        Some(principal) => principal,
        None => {
            debug!("No principal in request");
            return Err(AuthzError::AccessDenied);
        }
    };

    if !is_valid_permission(permission) {
        return Err(AuthzError::InvalidDirective(format!(
            "invalid permission name '{permission}'"
        )));
    }

    let object = match to_storage(resource) {
        Some(object) => object,
        None => {
            return Err(AuthzError::Internal(format!(
                "no storage representation for {} object",
                resource.model().unwrap_or("mapping")
            )));
        }
    };

    let req = AuthzRequest {
        object: &object,
        principal,
        permission,
    };
    let resp = ctx
        .authorizer()
        .authorize_request(&req)
        .map_err(AuthzError::internal)?;

    match resp {
        AuthzResponse::Ok => Ok(()),
        AuthzResponse::Continue | AuthzResponse::Unauthorized => {
            debug!(
                "User {} has no '{permission}' permission on {}",
                principal.id,
                resource.model().unwrap_or("mapping")
            );
            Err(AuthzError::AccessDenied)
        }
    }
}

fn report<E: From<AuthzError>>(gate: &str, err: AuthzError) -> E {
    match err {
        AuthzError::AccessDenied => debug!("[{gate}] Access denied"),
        AuthzError::Internal(ref msg) => warn!("[{gate}] Unable to authorize: {msg}"),
        AuthzError::InvalidDirective(ref msg) => error!("[{gate}] Invalid directive: {msg}"),
    }
    E::from(err)
}
