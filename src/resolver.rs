use log::debug;

use crate::db::Database;
use crate::error::AuthzError;
use crate::inspect::{lookup, FieldValue, Object};
use crate::path::FieldPath;
use crate::registry::ModelRegistry;
use crate::types::principal::Principal;

/// Outcome of an ownership resolution that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny,
}

/// Walks an owning-field path from a resource object down to the ID that
/// decides ownership.
///
/// Integer fields on `[alias,Model]` steps are treated as foreign keys and
/// the named model is loaded before continuing. An unloaded reference causes
/// the current object to be reloaded by its own primary key, once per step.
/// The resolver keeps no state between calls.
pub struct OwnershipResolver<'a> {
    db: &'a Database,
    registry: &'a ModelRegistry,
}

impl<'a> OwnershipResolver<'a> {
    pub fn new(db: &'a Database, registry: &'a ModelRegistry) -> Self {
        Self { db, registry }
    }

    pub fn resolve(
        &self,
        principal: &Principal,
        root: &Object,
        path: &FieldPath,
    ) -> Result<Verdict, AuthzError> {
        let steps = path.steps();
        let mut current = root.clone();
        let mut index = 0;
        let mut reloaded = false;

        while index < steps.len() {
            let step = &steps[index];
            let value = match lookup(&current, &step.alias, self.registry) {
                Some(value) => value,
                None => {
                    debug!("Field '{}' not found while resolving '{path}'", step.alias);
                    return Ok(Verdict::Deny);
                }
            };

            match value {
                FieldValue::Integer(id) => match step.model.as_deref() {
                    Some(model) => {
                        if !self.registry.contains(model) {
                            return Err(AuthzError::InvalidDirective(format!(
                                "unknown model '{model}' in owning field path '{path}'"
                            )));
                        }
                        current = self.load(model, id)?;
                    }
                    None if id == principal.id => return Ok(Verdict::Allow),
                    None => {
                        debug!(
                            "Field '{}' is {id}, principal is {}, path '{path}'",
                            step.alias, principal.id
                        );
                        return Ok(Verdict::Deny);
                    }
                },

                FieldValue::Reference(None) => {
                    if reloaded {
                        debug!(
                            "Reference '{}' still absent after reload, path '{path}'",
                            step.alias
                        );
                        return Ok(Verdict::Deny);
                    }
                    current = self.reload(&current)?;
                    reloaded = true;
                    continue;
                }

                FieldValue::Reference(Some(object)) => current = object,

                FieldValue::Unsupported(kind) => {
                    return Err(AuthzError::InvalidDirective(format!(
                        "field '{}' holds a {kind}, expected an ID or a reference, path '{path}'",
                        step.alias
                    )));
                }
            }

            index += 1;
            reloaded = false;
        }

        Err(AuthzError::InvalidDirective(format!(
            "owning field path '{path}' ends without an ownership comparison"
        )))
    }

    fn load(&self, model: &str, id: i64) -> Result<Object, AuthzError> {
        debug!("Load {model} {id} for ownership check");
        self.db
            .with_transaction(|tx| self.registry.load(tx, model, id))
            .map_err(AuthzError::internal)
    }

    fn reload(&self, object: &Object) -> Result<Object, AuthzError> {
        debug!(
            "Reload partially loaded {} object",
            object.model().unwrap_or("mapping")
        );
        self.db
            .with_transaction(|tx| self.registry.reload(tx, object))
            .map_err(AuthzError::internal)
    }
}
