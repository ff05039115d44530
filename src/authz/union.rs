use anyhow::Result;

use super::admin::AdminAuthorizer;
use super::default::DefaultAuthorizer;
use super::owner::OwnerAuthorizer;
use super::rule::RuleAuthorizer;
use super::{Authorizer, AuthzRequest, AuthzResponse};

/// A union type that can hold different types of authorizers
pub enum UnionAuthorizer {
    /// Grants everything to admins
    Admin(AdminAuthorizer),
    /// Grants configured permissions to object owners
    Owner(OwnerAuthorizer),
    /// Rules shared by every principal
    Default(DefaultAuthorizer),
    /// Role tables in the database
    Rule(RuleAuthorizer),
}

impl Authorizer for UnionAuthorizer {
    fn authorize_request(&self, req: &AuthzRequest) -> Result<AuthzResponse> {
        match self {
            UnionAuthorizer::Admin(a) => a.authorize_request(req),
            UnionAuthorizer::Owner(o) => o.authorize_request(req),
            UnionAuthorizer::Default(d) => d.authorize_request(req),
            UnionAuthorizer::Rule(r) => r.authorize_request(req),
        }
    }
}
