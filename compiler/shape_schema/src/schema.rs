//! Validator values and their composition operations.
//!
//! A [`Schema`] is an immutable, cheaply cloneable handle to one validator
//! node. Nodes form a DAG through ordinary ownership; cycles (recursive
//! shapes) only ever close through a [`Deferred`] cell, which holds a key
//! rather than a node.

use std::fmt;
use std::sync::{Arc, Weak};

use serde_json::Value;
use shape_ir::{ParamId, SchemaId};

use crate::Deferred;

/// Handle to an immutable validator.
///
/// Cloning shares the node. Identity ([`Schema::id`]) is assigned once at
/// construction and survives clones, which is what cache keys compare.
#[derive(Clone)]
pub struct Schema(Arc<SchemaNode>);

struct SchemaNode {
    id: SchemaId,
    kind: SchemaKind,
}

/// What a validator checks.
#[derive(Debug)]
pub enum SchemaKind {
    /// Accepts every value.
    Any,
    /// Accepts `null`.
    Null,
    /// Accepts `true` / `false`.
    Boolean,
    /// Accepts any JSON number.
    Number,
    /// Accepts numbers with no fractional part.
    Integer,
    /// Accepts strings.
    String,
    /// Accepts exactly this value.
    Literal(Value),
    /// Accepts one of these strings.
    Enum(Box<[String]>),
    /// Accepts arrays whose every element matches.
    Array(Schema),
    /// Accepts `null` or the inner value.
    Optional(Schema),
    /// Accepts objects with these fields.
    Object(ObjectShape),
    /// Accepts a value matching at least one alternative.
    Union(Box<[Schema]>),
    /// Accepts objects whose tag field selects the variant to check.
    Tagged(TaggedShape),
    /// Forward reference, resolved on first use.
    Deferred(Arc<dyn Deferred>),
}

/// Fields of an object validator.
#[derive(Debug)]
pub struct ObjectShape {
    pub fields: Box<[Field]>,
    pub unknown: UnknownKeys,
}

/// What to do with object keys no field declares.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum UnknownKeys {
    /// Ignore them.
    #[default]
    Allow,
    /// Report each one as an issue.
    Reject,
}

/// One named field of an object validator.
#[derive(Debug, Clone)]
pub struct Field {
    pub name: Box<str>,
    pub schema: Schema,
    pub required: bool,
}

impl Field {
    /// A field that must be present.
    pub fn required(name: impl Into<Box<str>>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: true,
        }
    }

    /// A field that may be absent. When present it must match.
    pub fn optional(name: impl Into<Box<str>>, schema: Schema) -> Self {
        Self {
            name: name.into(),
            schema,
            required: false,
        }
    }
}

/// A union discriminated by a string field.
#[derive(Debug)]
pub struct TaggedShape {
    pub tag: Box<str>,
    pub variants: Box<[(Box<str>, Schema)]>,
}

impl TaggedShape {
    /// The variant selected by `tag_value`.
    pub fn variant(&self, tag_value: &str) -> Option<&Schema> {
        self.variants
            .iter()
            .find(|(t, _)| &**t == tag_value)
            .map(|(_, s)| s)
    }
}

impl Schema {
    fn from_kind(kind: SchemaKind) -> Self {
        Schema(Arc::new(SchemaNode {
            id: SchemaId::fresh(),
            kind,
        }))
    }

    // === Leaves ===

    pub fn any() -> Self {
        Self::from_kind(SchemaKind::Any)
    }

    pub fn null() -> Self {
        Self::from_kind(SchemaKind::Null)
    }

    pub fn boolean() -> Self {
        Self::from_kind(SchemaKind::Boolean)
    }

    pub fn number() -> Self {
        Self::from_kind(SchemaKind::Number)
    }

    pub fn integer() -> Self {
        Self::from_kind(SchemaKind::Integer)
    }

    pub fn string() -> Self {
        Self::from_kind(SchemaKind::String)
    }

    /// Accepts exactly `value`.
    pub fn literal(value: impl Into<Value>) -> Self {
        Self::from_kind(SchemaKind::Literal(value.into()))
    }

    /// Accepts one of `options`.
    pub fn enumeration<S: Into<String>>(options: impl IntoIterator<Item = S>) -> Self {
        Self::from_kind(SchemaKind::Enum(
            options.into_iter().map(Into::into).collect(),
        ))
    }

    // === Composition ===

    /// Array of `element`.
    pub fn array(element: Schema) -> Self {
        Self::from_kind(SchemaKind::Array(element))
    }

    /// `null` or `inner`.
    pub fn optional(inner: Schema) -> Self {
        Self::from_kind(SchemaKind::Optional(inner))
    }

    /// Object with `fields`; undeclared keys are ignored.
    pub fn object(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::object_with(fields, UnknownKeys::Allow)
    }

    /// Object with `fields`; undeclared keys are issues.
    pub fn strict_object(fields: impl IntoIterator<Item = Field>) -> Self {
        Self::object_with(fields, UnknownKeys::Reject)
    }

    fn object_with(fields: impl IntoIterator<Item = Field>, unknown: UnknownKeys) -> Self {
        Self::from_kind(SchemaKind::Object(ObjectShape {
            fields: fields.into_iter().collect(),
            unknown,
        }))
    }

    /// Any of `alternatives`.
    pub fn union(alternatives: impl IntoIterator<Item = Schema>) -> Self {
        Self::from_kind(SchemaKind::Union(alternatives.into_iter().collect()))
    }

    /// Objects discriminated by the string field `tag`.
    pub fn tagged<T: Into<Box<str>>>(
        tag: impl Into<Box<str>>,
        variants: impl IntoIterator<Item = (T, Schema)>,
    ) -> Self {
        Self::from_kind(SchemaKind::Tagged(TaggedShape {
            tag: tag.into(),
            variants: variants.into_iter().map(|(t, s)| (t.into(), s)).collect(),
        }))
    }

    /// Wrap a forward reference so it composes like any other validator.
    pub fn deferred(cell: Arc<dyn Deferred>) -> Self {
        Self::from_kind(SchemaKind::Deferred(cell))
    }

    // === Identity ===

    /// This validator's identity.
    #[inline]
    pub fn id(&self) -> SchemaId {
        self.0.id
    }

    /// This validator as a cache key parameter.
    #[inline]
    pub fn param(&self) -> ParamId {
        ParamId::of(self.0.id)
    }

    /// Whether both handles share one node.
    #[inline]
    pub fn ptr_eq(&self, other: &Schema) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    /// Non-owning handle to this validator.
    pub fn downgrade(&self) -> WeakSchema {
        WeakSchema(Arc::downgrade(&self.0))
    }

    /// What this validator checks.
    #[inline]
    pub fn kind(&self) -> &SchemaKind {
        &self.0.kind
    }

    /// Whether this is an unresolved forward reference.
    pub fn is_deferred(&self) -> bool {
        matches!(self.0.kind, SchemaKind::Deferred(_))
    }

    /// Short description of what this validator expects, for diagnostics.
    pub fn expected(&self) -> &'static str {
        match self.kind() {
            SchemaKind::Any => "any",
            SchemaKind::Null => "null",
            SchemaKind::Boolean => "boolean",
            SchemaKind::Number => "number",
            SchemaKind::Integer => "integer",
            SchemaKind::String | SchemaKind::Enum(_) => "string",
            SchemaKind::Literal(_) => "literal",
            SchemaKind::Array(_) => "array",
            SchemaKind::Optional(_) => "optional",
            SchemaKind::Object(_) | SchemaKind::Tagged(_) => "object",
            SchemaKind::Union(_) => "union",
            SchemaKind::Deferred(_) => "deferred",
        }
    }
}

/// Non-owning handle to a validator, for back-references that must not keep
/// their target alive.
#[derive(Clone, Debug, Default)]
pub struct WeakSchema(Weak<SchemaNode>);

impl WeakSchema {
    /// The validator, if it is still alive.
    pub fn upgrade(&self) -> Option<Schema> {
        self.0.upgrade().map(Schema)
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Schema{}(", self.0.id)?;
        match self.kind() {
            SchemaKind::Array(inner) => write!(f, "array {inner:?}")?,
            SchemaKind::Optional(inner) => write!(f, "optional {inner:?}")?,
            SchemaKind::Object(shape) => {
                f.write_str("object {")?;
                for (i, field) in shape.fields.iter().enumerate() {
                    if i > 0 {
                        f.write_str(",")?;
                    }
                    let mark = if field.required { "" } else { "?" };
                    write!(f, " {}{mark}", field.name)?;
                }
                f.write_str(" }")?;
            }
            SchemaKind::Deferred(cell) => write!(f, "deferred {:?}", cell.key())?,
            _ => f.write_str(self.expected())?,
        }
        f.write_str(")")
    }
}
