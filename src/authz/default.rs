use anyhow::Result;

use crate::types::role::RoleRule;

use super::{Authorizer, AuthzRequest, AuthzResponse};

/// Rules granted to every authenticated principal, regardless of roles.
pub struct DefaultAuthorizer {
    rules: Vec<RoleRule>,
}

impl DefaultAuthorizer {
    pub fn new(rules: Vec<RoleRule>) -> Self {
        Self { rules }
    }
}

impl Authorizer for DefaultAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        let kind = req.object.kind();
        if self.rules.iter().any(|rule| rule.allows(kind, req.permission)) {
            return Ok(AuthzResponse::Ok);
        }

        Ok(AuthzResponse::Continue)
    }
}

#[cfg(test)]
mod tests {
    use crate::authz::tests::TestObject;
    use crate::types::principal::Principal;

    use super::*;

    #[test]
    fn test_default() {
        let rules = vec![RoleRule::new(["package", "release"], ["read"])];
        let authorizer = DefaultAuthorizer::new(rules);
        let principal = Principal::new(3);
        let package = TestObject {
            kind: "package",
            id: 1,
            owner_id: Some(7),
        };
        let user = TestObject {
            kind: "user",
            id: 7,
            owner_id: Some(7),
        };

        let check = |object: &TestObject, permission: &str| {
            authorizer
                .authorize_request(&AuthzRequest {
                    object,
                    principal: &principal,
                    permission,
                })
                .unwrap()
        };

        assert_eq!(check(&package, "read"), AuthzResponse::Ok);
        assert_eq!(check(&package, "edit"), AuthzResponse::Continue);
        assert_eq!(check(&user, "read"), AuthzResponse::Continue);
    }
}
