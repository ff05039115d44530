use std::sync::Arc;

use crate::db::Database;

use super::admin::AdminAuthorizer;
use super::chain::ChainAuthorizer;
use super::config::AuthzConfig;
use super::default::DefaultAuthorizer;
use super::owner::OwnerAuthorizer;
use super::rule::RuleAuthorizer;
use super::union::UnionAuthorizer;

#[derive(Default)]
pub struct AuthzFactory;

impl AuthzFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build_authorizer(&self, cfg: &AuthzConfig, db: Arc<Database>) -> ChainAuthorizer {
        let mut authorizers = vec![UnionAuthorizer::Admin(AdminAuthorizer::new())];

        if !cfg.owner_permissions.is_empty() {
            let owner_authz = OwnerAuthorizer::new(cfg.owner_permissions.clone());
            authorizers.push(UnionAuthorizer::Owner(owner_authz));
        }

        if !cfg.default_rules.is_empty() {
            let default_authz = DefaultAuthorizer::new(cfg.default_rules.clone());
            authorizers.push(UnionAuthorizer::Default(default_authz));
        }

        authorizers.push(UnionAuthorizer::Rule(RuleAuthorizer::new(db)));

        ChainAuthorizer::new(authorizers)
    }
}
