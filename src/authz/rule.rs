use std::sync::Arc;

use anyhow::{Context, Result};

use crate::db::Database;

use super::{Authorizer, AuthzRequest, AuthzResponse};

/// An authorizer that handles role-based access control
///
/// This authorizer implements access control based on the roles stored for
/// the principal:
/// - Skips admin principals (returns Continue)
/// - Loads the principal's roles from database
/// - Grants access if any rule covers the object kind and the permission,
///   denies otherwise
pub struct RuleAuthorizer {
    db: Arc<Database>,
}

impl RuleAuthorizer {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }
}

impl Authorizer for RuleAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        if req.principal.is_admin {
            return Ok(AuthzResponse::Continue);
        }

        let roles = self
            .db
            .with_transaction(|tx| tx.list_user_roles(req.principal.id))
            .with_context(|| format!("list roles of user {}", req.principal.id))?;

        let kind = req.object.kind();
        for role in roles {
            if role.rules.iter().any(|rule| rule.allows(kind, req.permission)) {
                return Ok(AuthzResponse::Ok);
            }
        }

        Ok(AuthzResponse::Unauthorized)
    }
}

#[cfg(test)]
mod tests {
    use crate::authz::tests::TestObject;
    use crate::db::types::RoleRecord;
    use crate::types::principal::Principal;
    use crate::types::role::RoleRule;

    use super::*;

    #[test]
    fn test_rule_authorizer() {
        let db = Arc::new(Database::memory().unwrap());
        let authorizer = RuleAuthorizer::new(db.clone());

        db.with_transaction(|tx| {
            tx.create_role(&RoleRecord {
                name: String::from("maintainer"),
                rules: vec![
                    RoleRule::new(["package"], ["*"]),
                    RoleRule::new(["release"], ["read"]),
                ],
                update_time: 0,
            })?;
            tx.create_user_role(3, "maintainer")?;
            Ok(())
        })
        .unwrap();

        let package = TestObject {
            kind: "package",
            id: 1,
            owner_id: Some(7),
        };
        let release = TestObject {
            kind: "release",
            id: 2,
            owner_id: None,
        };

        let check = |object: &TestObject, principal: Principal, permission: &str| {
            authorizer
                .authorize_request(&AuthzRequest {
                    object,
                    principal: &principal,
                    permission,
                })
                .unwrap()
        };

        // Admin principal should continue
        assert_eq!(
            check(&package, Principal::admin(1), "edit"),
            AuthzResponse::Continue
        );

        // Wildcard verb
        assert_eq!(
            check(&package, Principal::new(3), "delete"),
            AuthzResponse::Ok
        );

        // Specific resource and verb
        assert_eq!(check(&release, Principal::new(3), "read"), AuthzResponse::Ok);
        assert_eq!(
            check(&release, Principal::new(3), "edit"),
            AuthzResponse::Unauthorized
        );

        // User without roles
        assert_eq!(
            check(&package, Principal::new(4), "read"),
            AuthzResponse::Unauthorized
        );
    }
}
