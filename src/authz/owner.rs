use std::collections::HashSet;

use anyhow::Result;

use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Grants the configured permissions to the owner of an object.
pub struct OwnerAuthorizer {
    permissions: HashSet<String>,
}

impl OwnerAuthorizer {
    pub fn new(permissions: HashSet<String>) -> Self {
        Self { permissions }
    }
}

impl Authorizer for OwnerAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        if req.object.owner_id() != Some(req.principal.id) {
            return Ok(AuthzResponse::Continue);
        }

        if self.permissions.contains("*") || self.permissions.contains(req.permission) {
            return Ok(AuthzResponse::Ok);
        }

        Ok(AuthzResponse::Continue)
    }
}
