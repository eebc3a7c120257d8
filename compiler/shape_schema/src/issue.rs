//! Validation issues.
//!
//! Issues describe malformed *data*. They are the pass/fail-plus-diagnostics
//! result the application layer consumes and are deliberately plain: a path
//! and a code.

use std::fmt;

use serde_json::Value;

/// One step from the document root to an offending value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Location of an issue inside the checked document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(Vec<PathSegment>);

impl Path {
    pub fn root() -> Self {
        Self::default()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    pub(crate) fn push(&mut self, segment: PathSegment) {
        self.0.push(segment);
    }

    pub(crate) fn pop(&mut self) {
        self.0.pop();
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return f.write_str("(root)");
        }
        for (i, segment) in self.0.iter().enumerate() {
            match segment {
                PathSegment::Key(key) if i == 0 => f.write_str(key)?,
                PathSegment::Key(key) => write!(f, ".{key}")?,
                PathSegment::Index(idx) => write!(f, "[{idx}]")?,
            }
        }
        Ok(())
    }
}

/// What went wrong at a path.
#[derive(Debug, Clone, PartialEq)]
pub enum IssueCode {
    InvalidType {
        expected: &'static str,
        received: &'static str,
    },
    InvalidLiteral {
        expected: Value,
    },
    InvalidEnumValue {
        options: Vec<String>,
        received: String,
    },
    MissingField {
        field: String,
    },
    UnknownField {
        field: String,
    },
    NoUnionMatch {
        alternatives: usize,
    },
    UnknownTag {
        tag: String,
        received: String,
    },
    TooDeep {
        limit: usize,
    },
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IssueCode::InvalidType { expected, received } => {
                write!(f, "expected {expected}, received {received}")
            }
            IssueCode::InvalidLiteral { expected } => write!(f, "expected literal {expected}"),
            IssueCode::InvalidEnumValue { options, received } => {
                write!(f, "expected one of [{}], received '{received}'", options.join(", "))
            }
            IssueCode::MissingField { field } => write!(f, "missing required field '{field}'"),
            IssueCode::UnknownField { field } => write!(f, "unknown field '{field}'"),
            IssueCode::NoUnionMatch { alternatives } => {
                write!(f, "value matched none of {alternatives} alternatives")
            }
            IssueCode::UnknownTag { tag, received } => {
                write!(f, "unrecognized {tag} '{received}'")
            }
            IssueCode::TooDeep { limit } => write!(f, "nesting exceeds depth limit of {limit}"),
        }
    }
}

/// One validation issue.
#[derive(Debug, Clone, PartialEq)]
pub struct Issue {
    pub path: Path,
    pub code: IssueCode,
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.path, self.code)
    }
}

/// Outcome of checking one value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Report {
    issues: Vec<Issue>,
}

impl Report {
    pub(crate) fn new(issues: Vec<Issue>) -> Self {
        Self { issues }
    }

    pub fn is_valid(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn issues(&self) -> &[Issue] {
        &self.issues
    }

    /// `Ok` if valid, otherwise the issues as an error.
    pub fn into_result(self) -> Result<(), Issues> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(Issues(self.issues))
        }
    }
}

/// A non-empty set of validation issues.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("{} validation issue(s), first: {}", .0.len(), first_issue(.0))]
pub struct Issues(pub Vec<Issue>);

impl Issues {
    pub fn as_slice(&self) -> &[Issue] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

fn first_issue(issues: &[Issue]) -> String {
    issues.first().map(ToString::to_string).unwrap_or_default()
}

/// JSON type name of a value, for `InvalidType` issues.
pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
