use anyhow::{bail, Context, Result};
use serde_json::{Map, Value};

use crate::registry::ModelRegistry;
use crate::types::model::Model;

/// A resource viewed through its external field aliases.
///
/// Objects built from a [`Model`] remember the model name, which is what
/// allows them to be reloaded from storage. Plain mappings (request
/// arguments, nested values of unknown type) have no model.
#[derive(Debug, Clone, PartialEq)]
pub struct Object {
    model: Option<String>,
    fields: Map<String, Value>,
}

/// The value found under one alias, classified for path traversal.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Integer(i64),
    /// `None` is an unloaded (or absent) reference.
    Reference(Option<Object>),
    Unsupported(&'static str),
}

impl Object {
    pub fn from_model<M: Model>(model: &M) -> Result<Self> {
        let value = serde_json::to_value(model)
            .with_context(|| format!("serialize {} object", M::NAME))?;
        Self::typed(M::NAME, value)
    }

    pub fn typed(model: impl ToString, value: Value) -> Result<Self> {
        let model = model.to_string();
        match value {
            Value::Object(fields) => Ok(Self {
                model: Some(model),
                fields,
            }),
            _ => bail!("{model} object must be a map of fields"),
        }
    }

    pub fn mapping(value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self {
                model: None,
                fields,
            }),
            _ => bail!("mapping object must be a map of fields"),
        }
    }

    pub fn model(&self) -> Option<&str> {
        self.model.as_deref()
    }

    pub fn field(&self, alias: &str) -> Option<&Value> {
        self.fields.get(alias)
    }

    pub fn into_model<M: Model>(self) -> Result<M> {
        serde_json::from_value(Value::Object(self.fields))
            .with_context(|| format!("deserialize {} object", M::NAME))
    }
}

/// Looks up `alias` on `object`. Returns `None` when the object has no such
/// field.
pub fn lookup(object: &Object, alias: &str, registry: &ModelRegistry) -> Option<FieldValue> {
    let value = object.field(alias)?;
    let value = match value {
        Value::Number(n) => match n.as_i64() {
            Some(n) => FieldValue::Integer(n),
            None if n.is_u64() => FieldValue::Unsupported("out-of-range integer"),
            None => FieldValue::Unsupported("float"),
        },
        Value::Null => FieldValue::Reference(None),
        Value::Object(fields) => {
            let model = object
                .model()
                .and_then(|model| registry.reference_model(model, alias));
            FieldValue::Reference(Some(Object {
                model: model.map(String::from),
                fields: fields.clone(),
            }))
        }
        Value::String(_) => FieldValue::Unsupported("string"),
        Value::Bool(_) => FieldValue::Unsupported("boolean"),
        Value::Array(_) => FieldValue::Unsupported("list"),
    };
    Some(value)
}
