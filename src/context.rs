use std::sync::Arc;

use crate::authz::config::AuthzConfig;
use crate::authz::factory::AuthzFactory;
use crate::authz::Authorizer;
use crate::db::Database;
use crate::registry::ModelRegistry;
use crate::types::principal::Principal;

/// Process-wide state shared by all authorization checks. Built once at
/// startup and never mutated afterwards.
pub struct AuthzContext {
    db: Arc<Database>,
    registry: ModelRegistry,
    authorizer: Box<dyn Authorizer>,
}

impl AuthzContext {
    pub fn new(
        db: Arc<Database>,
        registry: ModelRegistry,
        authorizer: Box<dyn Authorizer>,
    ) -> Self {
        Self {
            db,
            registry,
            authorizer,
        }
    }

    /// Default models plus the authorizer chain described by `cfg`.
    pub fn build(cfg: &AuthzConfig, db: Arc<Database>) -> Self {
        let authorizer = AuthzFactory::new().build_authorizer(cfg, db.clone());
        Self::new(db, ModelRegistry::default(), Box::new(authorizer))
    }

    pub fn db(&self) -> &Database {
        &self.db
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.authorizer.as_ref()
    }
}

/// Per-request view: the shared context and the authenticated principal, if
/// any.
#[derive(Clone)]
pub struct RequestContext {
    shared: Arc<AuthzContext>,
    principal: Option<Principal>,
}

impl RequestContext {
    pub fn with_principal(shared: Arc<AuthzContext>, principal: Principal) -> Self {
        Self {
            shared,
            principal: Some(principal),
        }
    }

    pub fn anonymous(shared: Arc<AuthzContext>) -> Self {
        Self {
            shared,
            principal: None,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        self.principal.as_ref()
    }

    pub fn db(&self) -> &Database {
        self.shared.db()
    }

    pub fn registry(&self) -> &ModelRegistry {
        self.shared.registry()
    }

    pub fn authorizer(&self) -> &dyn Authorizer {
        self.shared.authorizer()
    }
}
