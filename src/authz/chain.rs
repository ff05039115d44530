use anyhow::Result;

use super::union::UnionAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// A chain of authorizers that are executed in sequence
///
/// - Authorizers are tried in order until one makes a definitive decision
/// - If an authorizer returns Continue, the next one in chain is tried
/// - If all authorizers return Continue, the final result is Continue
pub struct ChainAuthorizer {
    pub(super) authorizers: Vec<UnionAuthorizer>,
}

impl ChainAuthorizer {
    pub fn new(authorizers: Vec<UnionAuthorizer>) -> Self {
        Self { authorizers }
    }
}

impl Authorizer for ChainAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        for authorizer in self.authorizers.iter() {
            match authorizer.authorize_request(req)? {
                AuthzResponse::Ok => return Ok(AuthzResponse::Ok),
                AuthzResponse::Continue => continue,
                AuthzResponse::Unauthorized => return Ok(AuthzResponse::Unauthorized),
            }
        }

        Ok(AuthzResponse::Continue)
    }
}
