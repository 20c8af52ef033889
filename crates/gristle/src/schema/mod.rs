//! Field schema documents: types, constraints and the loader that
//! meta-validates them.

mod constraint;
mod loader;
mod types;

use std::path::Path;

use tracing::debug;

use crate::error::{GristleError, Result, SchemaError};

pub use constraint::{FieldConstraint, Pattern, Rule};
pub use loader::{RECOGNIZED_KEYWORDS, UNSUPPORTED_KEYWORDS};
pub use types::{DgType, JsonType, NumericValue};

/// A validated schema: constraints aligned by position with record fields.
#[derive(Debug, Clone, Default)]
pub struct SchemaDocument {
    items: Vec<FieldConstraint>,
}

impl SchemaDocument {
    /// Create a schema from already-built constraints.
    pub fn new(items: Vec<FieldConstraint>) -> Self {
        Self { items }
    }

    /// Parse and meta-validate schema text.
    pub fn parse(text: &str) -> std::result::Result<Self, SchemaError> {
        loader::parse_schema(text).map(Self::new)
    }

    /// Read, parse and meta-validate a schema file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| GristleError::io(path, e))?;
        let schema = Self::parse(&text)?;
        debug!(path = %path.display(), fields = schema.len(), "loaded schema");
        Ok(schema)
    }

    /// Constraints in field order.
    pub fn items(&self) -> &[FieldConstraint] {
        &self.items
    }

    /// Constraint for the field at `index`.
    pub fn get(&self, index: usize) -> Option<&FieldConstraint> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
