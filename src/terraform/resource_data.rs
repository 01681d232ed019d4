use serde::Serialize;
use serde_json::{Map, Value};

use crate::schema::{Block, SchemaError};

/// Attribute bag for a single resource instance.
///
/// Values are stored in their schema shape (lowercase attribute names) and
/// every write is type-checked against the bound [`Block`].
#[derive(Debug, Clone)]
pub struct ResourceData {
    block: &'static Block,
    id: String,
    attributes: Map<String, Value>,
}

impl ResourceData {
    pub fn new(block: &'static Block) -> Self {
        Self {
            block,
            id: String::new(),
            attributes: Map::new(),
        }
    }

    /// NOTE: Values are taken as-is; callers validate configuration up front.
    pub fn from_attributes(
        block: &'static Block,
        id: impl Into<String>,
        attributes: Map<String, Value>,
    ) -> Self {
        Self {
            block,
            id: id.into(),
            attributes,
        }
    }

    /// Rebuilds the bag from persisted state, splitting off the `id` key.
    pub fn from_state(block: &'static Block, mut attributes: Map<String, Value>) -> Self {
        let id = match attributes.remove("id") {
            Some(Value::String(id)) => id,
            _ => String::new(),
        };
        Self::from_attributes(block, id, attributes)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// An empty id marks the instance as gone.
    pub fn set_id(&mut self, id: impl Into<String>) {
        self.id = id.into();
    }

    /// Returns the stored value, falling back to the schema default.
    pub fn get(&self, key: &str) -> Option<&Value> {
        match self.attributes.get(key) {
            Some(Value::Null) | None => self
                .block
                .attribute(key)
                .and_then(|attr| attr.default.as_ref()),
            Some(value) => Some(value),
        }
    }

    pub fn set<T: Serialize>(&mut self, key: &str, value: T) -> Result<(), SchemaError> {
        let value = serde_json::to_value(value).map_err(|_| SchemaError::TypeMismatch {
            path: key.to_string(),
            expected: "a JSON-representable value".to_string(),
            found: "unserializable value",
        })?;
        self.block.check_attribute(key, &value)?;

        if value.is_null() {
            self.attributes.remove(key);
        } else {
            self.attributes.insert(key.to_string(), value);
        }
        Ok(())
    }

    pub fn attributes(&self) -> &Map<String, Value> {
        &self.attributes
    }

    /// Attributes as persisted in state: the bag plus the `id` key.
    pub fn to_state_attributes(&self) -> Map<String, Value> {
        let mut attributes = self.attributes.clone();
        attributes.insert("id".to_string(), Value::String(self.id.clone()));
        attributes
    }
}
