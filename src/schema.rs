//! Declarative resource schema.
//!
//! A schema is a tree of [`Block`]s whose attributes carry a type, presence
//! flags, an optional default and a description. The tree is used to type-check
//! configuration and every value written into a [`ResourceData`] bag.
//!
//! [`ResourceData`]: crate::terraform::ResourceData

use std::collections::BTreeMap;
use std::time::Duration;

use serde_json::Value;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum SchemaError {
    #[error("unknown attribute '{path}'")]
    UnknownAttribute { path: String },

    #[error("attribute '{path}' must be {expected}, got {found}")]
    TypeMismatch {
        path: String,
        expected: String,
        found: &'static str,
    },

    #[error("attribute '{path}' requires at least {min} item(s), got {found}")]
    TooFewItems { path: String, min: usize, found: usize },

    #[error("attribute '{path}' is computed and cannot be configured")]
    ComputedOnly { path: String },
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttributeType {
    String,
    Bool,
    Int,
    List(Box<AttributeType>),
    Object(Block),
}

impl AttributeType {
    fn describe(&self) -> String {
        match self {
            AttributeType::String => "a string".to_string(),
            AttributeType::Bool => "a bool".to_string(),
            AttributeType::Int => "an integer".to_string(),
            AttributeType::List(elem) => format!("a list of {}", elem.type_name()),
            AttributeType::Object(_) => "an object".to_string(),
        }
    }

    /// Short name used by the schema tree renderer.
    pub fn type_name(&self) -> String {
        match self {
            AttributeType::String => "string".to_string(),
            AttributeType::Bool => "bool".to_string(),
            AttributeType::Int => "int".to_string(),
            AttributeType::List(elem) => format!("list({})", elem.type_name()),
            AttributeType::Object(_) => "object".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Attribute {
    pub ty: AttributeType,
    pub optional: bool,
    pub computed: bool,
    pub description: &'static str,
    pub default: Option<Value>,
    pub min_items: Option<usize>,
}

impl Attribute {
    fn of(ty: AttributeType) -> Self {
        Self {
            ty,
            optional: false,
            computed: false,
            description: "",
            default: None,
            min_items: None,
        }
    }

    pub fn string() -> Self {
        Self::of(AttributeType::String)
    }

    pub fn bool() -> Self {
        Self::of(AttributeType::Bool)
    }

    pub fn int() -> Self {
        Self::of(AttributeType::Int)
    }

    pub fn list_of(elem: AttributeType) -> Self {
        Self::of(AttributeType::List(Box::new(elem)))
    }

    pub fn list_of_strings() -> Self {
        Self::list_of(AttributeType::String)
    }

    pub fn list_of_blocks(block: Block) -> Self {
        Self::list_of(AttributeType::Object(block))
    }

    pub fn object(block: Block) -> Self {
        Self::of(AttributeType::Object(block))
    }

    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    pub fn computed(mut self) -> Self {
        self.computed = true;
        self
    }

    pub fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }

    pub fn with_default(mut self, default: impl Into<Value>) -> Self {
        self.default = Some(default.into());
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    /// Computed attributes that are not also optional are owned by the
    /// remote system and rejected in configuration.
    pub fn is_computed_only(&self) -> bool {
        self.computed && !self.optional
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Block {
    attributes: BTreeMap<&'static str, Attribute>,
}

impl Block {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_attribute(mut self, name: &'static str, attribute: Attribute) -> Self {
        self.attributes.insert(name, attribute);
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Attribute> {
        self.attributes.get(name)
    }

    pub fn attributes(&self) -> impl Iterator<Item = (&'static str, &Attribute)> {
        self.attributes.iter().map(|(name, attr)| (*name, attr))
    }

    /// Type-checks a single attribute value. `null` is always accepted and
    /// means "unset".
    pub fn check_attribute(&self, name: &str, value: &Value) -> Result<(), SchemaError> {
        let attribute = self
            .attribute(name)
            .ok_or_else(|| SchemaError::UnknownAttribute {
                path: name.to_string(),
            })?;
        check_value(name, &attribute.ty, value, false)
    }

    /// Type-checks a whole object against this block.
    pub fn check(&self, value: &Value) -> Result<(), SchemaError> {
        check_object("", self, value, false)
    }

    /// Type-checks user configuration: on top of [`Block::check`] it rejects
    /// computed-only attributes and enforces `min_items`.
    pub fn validate_config(&self, value: &Value) -> Result<(), SchemaError> {
        check_object("", self, value, true)
    }
}

fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", prefix, name)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(n) if n.is_i64() => "integer",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "list",
        Value::Object(_) => "object",
    }
}

fn check_object(path: &str, block: &Block, value: &Value, config: bool) -> Result<(), SchemaError> {
    let map = match value {
        Value::Null => return Ok(()),
        Value::Object(map) => map,
        other => {
            return Err(SchemaError::TypeMismatch {
                path: if path.is_empty() { "<root>".to_string() } else { path.to_string() },
                expected: "an object".to_string(),
                found: kind_of(other),
            });
        }
    };

    for (name, value) in map {
        let attr_path = join(path, name);
        let attribute = block
            .attribute(name)
            .ok_or_else(|| SchemaError::UnknownAttribute {
                path: attr_path.clone(),
            })?;

        if config && attribute.is_computed_only() && !value.is_null() {
            return Err(SchemaError::ComputedOnly { path: attr_path });
        }

        check_value(&attr_path, &attribute.ty, value, config)?;

        if config {
            if let (Some(min), Value::Array(items)) = (attribute.min_items, value) {
                if items.len() < min {
                    return Err(SchemaError::TooFewItems {
                        path: attr_path,
                        min,
                        found: items.len(),
                    });
                }
            }
        }
    }

    Ok(())
}

fn check_value(path: &str, ty: &AttributeType, value: &Value, config: bool) -> Result<(), SchemaError> {
    if value.is_null() {
        return Ok(());
    }

    let mismatch = || SchemaError::TypeMismatch {
        path: path.to_string(),
        expected: ty.describe(),
        found: kind_of(value),
    };

    match ty {
        AttributeType::String if value.is_string() => Ok(()),
        AttributeType::Bool if value.is_boolean() => Ok(()),
        // u64 values past i64::MAX cannot be carried by the API types.
        AttributeType::Int if value.is_i64() => Ok(()),
        AttributeType::List(elem) => {
            let items = value.as_array().ok_or_else(mismatch)?;
            for (idx, item) in items.iter().enumerate() {
                check_value(&format!("{}.{}", path, idx), elem, item, config)?;
            }
            Ok(())
        }
        AttributeType::Object(block) => check_object(path, block, value, config),
        _ => Err(mismatch()),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceTimeouts {
    pub create: Duration,
    pub update: Duration,
    pub delete: Duration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Importer {
    /// The import identifier is stored as-is and the resource is then read.
    Passthrough,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResourceSchema {
    pub type_name: &'static str,
    pub block: Block,
    pub timeouts: ResourceTimeouts,
    pub importer: Option<Importer>,
}
