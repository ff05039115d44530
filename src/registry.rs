use std::collections::HashMap;

use anyhow::{bail, Context, Result};

use crate::db::types::Transaction;
use crate::inspect::Object;
use crate::types::model::{Model, Package, Release, User};

type Loader = fn(&dyn Transaction, i64) -> Result<Object>;

/// Everything the resolver needs to know about one model.
pub struct ModelEntry {
    pub name: &'static str,
    pub primary_key: &'static str,
    references: &'static [(&'static str, &'static str)],
    loader: Loader,
}

/// Resolves model names used in owning-field paths to loaders. Populated once
/// at startup and read-only afterwards.
pub struct ModelRegistry {
    entries: HashMap<&'static str, ModelEntry>,
}

impl Default for ModelRegistry {
    fn default() -> Self {
        let mut registry = Self::new();
        registry
            .register::<User>()
            .register::<Package>()
            .register::<Release>();
        registry
    }
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    pub fn register<M: Model>(&mut self) -> &mut Self {
        self.entries.insert(
            M::NAME,
            ModelEntry {
                name: M::NAME,
                primary_key: M::PRIMARY_KEY,
                references: M::references(),
                loader: load_object::<M>,
            },
        );
        self
    }

    pub fn get(&self, name: &str) -> Option<&ModelEntry> {
        self.entries.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Model name of the reference field `alias` declared by `model`.
    pub fn reference_model(&self, model: &str, alias: &str) -> Option<&'static str> {
        self.get(model)?
            .references
            .iter()
            .find(|(field, _)| *field == alias)
            .map(|(_, target)| *target)
    }

    /// Loads the model called `name` with primary key `id`.
    pub fn load(&self, tx: &dyn Transaction, name: &str, id: i64) -> Result<Object> {
        let entry = match self.get(name) {
            Some(entry) => entry,
            None => bail!("unknown model '{name}'"),
        };
        (entry.loader)(tx, id).with_context(|| format!("load {name} {id}"))
    }

    /// Loads a fresh copy of `object` by its own primary key.
    pub fn reload(&self, tx: &dyn Transaction, object: &Object) -> Result<Object> {
        let name = match object.model() {
            Some(name) => name,
            None => bail!("cannot reload a plain mapping"),
        };
        let entry = match self.get(name) {
            Some(entry) => entry,
            None => bail!("unknown model '{name}'"),
        };
        let id = match object.field(entry.primary_key).and_then(|id| id.as_i64()) {
            Some(id) => id,
            None => bail!(
                "{name} object has no integer primary key '{}'",
                entry.primary_key
            ),
        };
        self.load(tx, name, id)
    }
}

fn load_object<M: Model>(tx: &dyn Transaction, id: i64) -> Result<Object> {
    let model = M::load(tx, id)?;
    Object::from_model(&model)
}
