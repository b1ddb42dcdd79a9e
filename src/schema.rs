//! Field declarations for a record type.
//!
//! A [`Schema`] is the static, ordered list of [`FieldDescriptor`]s for one
//! record type. Declaration order matters: it is the order fields are
//! validated, encoded, listed on the command line, and filled by
//! [`Record::from_positional`](crate::Record::from_positional).
//!
//! ```ignore
//! let schema = Schema::builder("TrainConfig")
//!     .doc("Hyper-parameters for a training run.")
//!     .field(FieldDescriptor::new("batch_size", Kind::Integer))
//!     .field(FieldDescriptor::new("optimizer", DeclaredType::choice(["Adam", "AdamW"])))
//!     .field(FieldDescriptor::new("debug", Kind::Boolean).default_value(false))
//!     .build();
//! ```

use crate::classify::classify;
use crate::error::RootConfigError;
use crate::types::{DeclaredType, Shape, Value};

/// Produces a fresh default value each time it is called.
pub type DefaultFactory = fn() -> Value;

/// Where an omitted field's value comes from.
#[derive(Debug, Clone)]
pub enum FieldDefault {
    /// The field is required.
    None,
    Value(Value),
    Factory(DefaultFactory),
}

#[derive(Debug, Clone)]
pub struct FieldDescriptor {
    name: String,
    declared_type: DeclaredType,
    default: FieldDefault,
    positional: bool,
    help: Option<String>,
}

impl FieldDescriptor {
    pub fn new(name: &str, declared_type: impl Into<DeclaredType>) -> Self {
        Self {
            name: name.to_string(),
            declared_type: declared_type.into(),
            default: FieldDefault::None,
            positional: true,
            help: None,
        }
    }

    /// Use `value` when the field is omitted.
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default = FieldDefault::Value(value.into());
        self
    }

    /// Call `factory` for a fresh value when the field is omitted.
    pub fn default_factory(mut self, factory: DefaultFactory) -> Self {
        self.default = FieldDefault::Factory(factory);
        self
    }

    /// The field can only be given by name, never positionally.
    pub fn keyword_only(mut self) -> Self {
        self.positional = false;
        self
    }

    /// Help text shown next to the field's CLI flag.
    pub fn help(mut self, text: &str) -> Self {
        self.help = Some(text.to_string());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn declared_type(&self) -> &DeclaredType {
        &self.declared_type
    }

    pub fn default(&self) -> &FieldDefault {
        &self.default
    }

    pub fn is_positional(&self) -> bool {
        self.positional
    }

    pub fn help_text(&self) -> Option<&str> {
        self.help.as_deref()
    }

    pub fn is_required(&self) -> bool {
        matches!(self.default, FieldDefault::None)
    }

    /// The value used when the field is omitted. Invokes the factory, if any.
    pub fn default_for_omitted(&self) -> Option<Value> {
        match &self.default {
            FieldDefault::None => None,
            FieldDefault::Value(v) => Some(v.clone()),
            FieldDefault::Factory(factory) => Some(factory()),
        }
    }
}

/// Ordered field declarations for one record type.
#[derive(Debug, Clone)]
pub struct Schema {
    name: String,
    doc: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl Schema {
    pub fn builder(name: &str) -> SchemaBuilder {
        SchemaBuilder {
            name: name.to_string(),
            doc: None,
            fields: Vec::new(),
        }
    }

    /// Record type name. Also used as the CLI program name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Record type description. Also used as the CLI about text.
    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn fields(&self) -> &[FieldDescriptor] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.field(name).is_some()
    }

    /// Classify every field up front.
    ///
    /// Catches schema authoring mistakes without needing an instance.
    /// Returns the shapes in declaration order.
    pub fn check(&self) -> Result<Vec<Shape>, RootConfigError> {
        self.fields
            .iter()
            .map(|field| {
                let shape = classify(&field.declared_type).map_err(|source| {
                    RootConfigError::Schema {
                        field: field.name.clone(),
                        source,
                    }
                })?;
                if shape == Shape::Unsupported {
                    return Err(RootConfigError::UnsupportedType {
                        field: field.name.clone(),
                        declared: field.declared_type.clone(),
                    });
                }
                Ok(shape)
            })
            .collect()
    }
}

/// Builder for [`Schema`].
pub struct SchemaBuilder {
    name: String,
    doc: Option<String>,
    fields: Vec<FieldDescriptor>,
}

impl SchemaBuilder {
    pub fn doc(mut self, doc: &str) -> Self {
        self.doc = Some(doc.to_string());
        self
    }

    /// Declare a field. Redeclaring a name replaces the earlier declaration
    /// but keeps its position.
    pub fn field(mut self, field: FieldDescriptor) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn build(self) -> Schema {
        Schema {
            name: self.name,
            doc: self.doc,
            fields: self.fields,
        }
    }
}
