use anyhow::Result;

use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Grants everything to admin principals, defers for everyone else.
#[derive(Default)]
pub struct AdminAuthorizer;

impl AdminAuthorizer {
    pub fn new() -> Self {
        Self
    }
}

impl Authorizer for AdminAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        if req.principal.is_admin {
            return Ok(AuthzResponse::Ok);
        }

        Ok(AuthzResponse::Continue)
    }
}
