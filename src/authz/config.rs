use std::collections::HashSet;

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};

use crate::config::{CommonConfig, PathSet};
use crate::types::role::RoleRule;

use super::is_valid_permission;

/// Authorization related configuration
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthzConfig {
    /// Permissions a user holds on the objects it owns. `*` grants all of
    /// them. Defaults to `read` and `edit`.
    #[serde(default = "AuthzConfig::default_owner_permissions")]
    pub owner_permissions: HashSet<String>,

    /// Rules granted to every authenticated user on top of its roles.
    /// Defaults to empty.
    #[serde(default)]
    pub default_rules: Vec<RoleRule>,
}

impl CommonConfig for AuthzConfig {
    fn default() -> Self {
        Self {
            owner_permissions: Self::default_owner_permissions(),
            default_rules: vec![],
        }
    }

    fn complete(&mut self, _ps: &PathSet) -> Result<()> {
        for permission in self.owner_permissions.iter() {
            if permission != "*" && !is_valid_permission(permission) {
                bail!("invalid owner permission '{permission}'");
            }
        }

        for rule in self.default_rules.iter() {
            if rule.resources.is_empty() || rule.verbs.is_empty() {
                bail!("default rules require both resources and verbs");
            }
        }

        Ok(())
    }
}

impl AuthzConfig {
    pub fn default_owner_permissions() -> HashSet<String> {
        ["read", "edit"].into_iter().map(String::from).collect()
    }
}
