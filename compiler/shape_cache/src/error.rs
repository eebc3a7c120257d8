//! Construction errors.
//!
//! A `BuildError` is a bug in a builder (or a use of the registry after it was
//! sealed), never a problem with data being validated. The failed entry is
//! reverted to empty, so a corrected later call can retry.

use shape_ir::InternError;

/// Result type for builders and registry operations.
pub type BuildResult<T> = Result<T, BuildError>;

#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// A builder reported that it cannot produce its shape.
    #[error("failed to construct `{shape}`: {message}")]
    Construction { shape: String, message: String },

    /// Construction was requested after the registry was sealed.
    #[error("cannot construct `{shape}`: registry is sealed")]
    Sealed { shape: String },

    /// An inner shape failed while this one was being constructed.
    #[error("while constructing `{shape}`")]
    Nested {
        shape: String,
        #[source]
        source: Box<BuildError>,
    },

    /// The shape name table overflowed.
    #[error(transparent)]
    Intern(#[from] InternError),
}

impl BuildError {
    /// Failure raised from inside a builder's thunk.
    ///
    /// The registry fills in the shape name when the error leaves the thunk.
    pub fn msg(message: impl Into<String>) -> Self {
        BuildError::Construction {
            shape: String::new(),
            message: message.into(),
        }
    }

    /// Attach the shape whose thunk returned this error.
    pub(crate) fn within(self, shape: String) -> Self {
        match self {
            BuildError::Construction {
                shape: unnamed,
                message,
            } if unnamed.is_empty() => BuildError::Construction { shape, message },
            other => BuildError::Nested {
                shape,
                source: Box::new(other),
            },
        }
    }

    /// Innermost error of a nested chain.
    pub fn root_cause(&self) -> &BuildError {
        let mut current = self;
        while let BuildError::Nested { source, .. } = current {
            current = source.as_ref();
        }
        current
    }

    /// Shapes from outermost to the one that failed.
    pub fn trace(&self) -> Vec<&str> {
        let mut shapes = Vec::new();
        let mut current = self;
        loop {
            match current {
                BuildError::Nested { shape, source } => {
                    shapes.push(shape.as_str());
                    current = source.as_ref();
                }
                BuildError::Construction { shape, .. } | BuildError::Sealed { shape } => {
                    shapes.push(shape.as_str());
                    return shapes;
                }
                BuildError::Intern(_) => return shapes,
            }
        }
    }
}

#[cfg(test)]
mod tests;
