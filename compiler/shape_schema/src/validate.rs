//! Checking values against validators.
//!
//! The walk collects every issue rather than stopping at the first. A
//! forward reference that cannot be resolved aborts the walk with a
//! [`ProtocolViolation`]: that is a construction bug and must never be
//! folded into the issue list.

use serde_json::Value;
use shape_ir::CacheKey;

use crate::issue::{type_name, Path, PathSegment};
use crate::schema::{ObjectShape, TaggedShape, UnknownKeys};
use crate::stack::ensure_sufficient_stack;
use crate::{Issue, IssueCode, Issues, ProtocolViolation, Report, Schema, SchemaKind};

/// Default nesting limit for a checked document.
pub const DEFAULT_MAX_DEPTH: usize = 1024;

/// Knobs for one validation run.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ValidateOptions {
    /// Deepest array/object nesting checked before reporting `TooDeep`.
    pub max_depth: usize,
}

impl Default for ValidateOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Schema {
    /// Check `value`, collecting issues.
    pub fn validate(&self, value: &Value) -> Result<Report, ProtocolViolation> {
        self.validate_with(value, ValidateOptions::default())
    }

    /// Check `value` with explicit options.
    pub fn validate_with(
        &self,
        value: &Value,
        options: ValidateOptions,
    ) -> Result<Report, ProtocolViolation> {
        let mut walker = Walker {
            options,
            path: Path::root(),
            issues: Vec::new(),
            resolving: Vec::new(),
        };
        walker.check(self, value, 0)?;
        Ok(Report::new(walker.issues))
    }

    /// Application-facing check: `Ok` or the issues.
    ///
    /// # Panics
    /// Panics on a [`ProtocolViolation`]. A validator that cannot resolve its
    /// own forward references would otherwise accept or reject everything.
    pub fn safe_parse(&self, value: &Value) -> Result<(), Issues> {
        match self.validate(value) {
            Ok(report) => report.into_result(),
            Err(violation) => {
                tracing::error!(%violation, "validator construction protocol violated");
                panic!("validator construction protocol violated: {violation}");
            }
        }
    }

    /// Whether `value` matches. Panics like [`Schema::safe_parse`].
    pub fn accepts(&self, value: &Value) -> bool {
        self.safe_parse(value).is_ok()
    }
}

struct Walker {
    options: ValidateOptions,
    path: Path,
    issues: Vec<Issue>,
    /// Forward references being resolved, each with the value it was
    /// entered on. Meeting the same pair again means no input was consumed.
    resolving: Vec<(*const Value, CacheKey)>,
}

impl Walker {
    fn report(&mut self, code: IssueCode) {
        self.issues.push(Issue {
            path: self.path.clone(),
            code,
        });
    }

    fn invalid_type(&mut self, expected: &'static str, value: &Value) {
        self.report(IssueCode::InvalidType {
            expected,
            received: type_name(value),
        });
    }

    fn check(&mut self, schema: &Schema, value: &Value, depth: usize) -> Result<(), ProtocolViolation> {
        match schema.kind() {
            SchemaKind::Any => {}
            SchemaKind::Null => {
                if !value.is_null() {
                    self.invalid_type("null", value);
                }
            }
            SchemaKind::Boolean => {
                if !value.is_boolean() {
                    self.invalid_type("boolean", value);
                }
            }
            SchemaKind::Number => {
                if !value.is_number() {
                    self.invalid_type("number", value);
                }
            }
            SchemaKind::Integer => {
                let whole = value.is_i64()
                    || value.is_u64()
                    || value.as_f64().is_some_and(|f| f.fract() == 0.0);
                if !whole {
                    self.invalid_type("integer", value);
                }
            }
            SchemaKind::String => {
                if !value.is_string() {
                    self.invalid_type("string", value);
                }
            }
            SchemaKind::Literal(expected) => {
                if value != expected {
                    self.report(IssueCode::InvalidLiteral {
                        expected: expected.clone(),
                    });
                }
            }
            SchemaKind::Enum(options) => match value.as_str() {
                Some(s) if options.iter().any(|o| o == s) => {}
                Some(s) => self.report(IssueCode::InvalidEnumValue {
                    options: options.to_vec(),
                    received: s.to_owned(),
                }),
                None => self.invalid_type("string", value),
            },
            SchemaKind::Optional(inner) => {
                if !value.is_null() {
                    self.check(inner, value, depth)?;
                }
            }
            SchemaKind::Array(element) => {
                let Some(items) = value.as_array() else {
                    self.invalid_type("array", value);
                    return Ok(());
                };
                if !self.enter(depth) {
                    return Ok(());
                }
                for (idx, item) in items.iter().enumerate() {
                    self.path.push(PathSegment::Index(idx));
                    let result = ensure_sufficient_stack(|| self.check(element, item, depth + 1));
                    self.path.pop();
                    result?;
                }
            }
            SchemaKind::Object(shape) => self.check_object(shape, value, depth)?,
            SchemaKind::Union(alternatives) => {
                self.check_union(alternatives, value, depth)?;
            }
            SchemaKind::Tagged(shape) => self.check_tagged(shape, value, depth)?,
            SchemaKind::Deferred(cell) => {
                let marker = (std::ptr::from_ref(value), cell.key().clone());
                if self.resolving.contains(&marker) {
                    return Err(ProtocolViolation::Unproductive {
                        shape: cell.shape().to_owned(),
                    });
                }
                let target = cell.resolve()?;
                self.resolving.push(marker);
                let result = ensure_sufficient_stack(|| self.check(&target, value, depth));
                self.resolving.pop();
                result?;
            }
        }
        Ok(())
    }

    /// Whether descending one more level stays within the depth limit.
    fn enter(&mut self, depth: usize) -> bool {
        if depth >= self.options.max_depth {
            self.report(IssueCode::TooDeep {
                limit: self.options.max_depth,
            });
            return false;
        }
        true
    }

    fn check_object(
        &mut self,
        shape: &ObjectShape,
        value: &Value,
        depth: usize,
    ) -> Result<(), ProtocolViolation> {
        let Some(map) = value.as_object() else {
            self.invalid_type("object", value);
            return Ok(());
        };
        if !self.enter(depth) {
            return Ok(());
        }

        for field in &*shape.fields {
            match map.get(&*field.name) {
                Some(field_value) => {
                    self.path.push(PathSegment::Key(field.name.to_string()));
                    let result =
                        ensure_sufficient_stack(|| self.check(&field.schema, field_value, depth + 1));
                    self.path.pop();
                    result?;
                }
                None if field.required => self.report(IssueCode::MissingField {
                    field: field.name.to_string(),
                }),
                None => {}
            }
        }

        if shape.unknown == UnknownKeys::Reject {
            for key in map.keys() {
                if !shape.fields.iter().any(|f| &*f.name == key) {
                    self.report(IssueCode::UnknownField { field: key.clone() });
                }
            }
        }
        Ok(())
    }

    fn check_union(
        &mut self,
        alternatives: &[Schema],
        value: &Value,
        depth: usize,
    ) -> Result<(), ProtocolViolation> {
        for alternative in alternatives {
            let mut trial = Walker {
                options: self.options,
                path: self.path.clone(),
                issues: Vec::new(),
                resolving: self.resolving.clone(),
            };
            trial.check(alternative, value, depth)?;
            if trial.issues.is_empty() {
                return Ok(());
            }
        }
        self.report(IssueCode::NoUnionMatch {
            alternatives: alternatives.len(),
        });
        Ok(())
    }

    fn check_tagged(
        &mut self,
        shape: &TaggedShape,
        value: &Value,
        depth: usize,
    ) -> Result<(), ProtocolViolation> {
        let Some(map) = value.as_object() else {
            self.invalid_type("object", value);
            return Ok(());
        };
        let Some(tag_value) = map.get(&*shape.tag) else {
            self.report(IssueCode::MissingField {
                field: shape.tag.to_string(),
            });
            return Ok(());
        };
        let Some(tag) = tag_value.as_str() else {
            self.path.push(PathSegment::Key(shape.tag.to_string()));
            self.invalid_type("string", tag_value);
            self.path.pop();
            return Ok(());
        };
        match shape.variant(tag) {
            Some(variant) => self.check(variant, value, depth),
            None => {
                self.path.push(PathSegment::Key(shape.tag.to_string()));
                self.report(IssueCode::UnknownTag {
                    tag: shape.tag.to_string(),
                    received: tag.to_owned(),
                });
                self.path.pop();
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests;
