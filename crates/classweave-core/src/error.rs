//! Error types for model operations.
//!
//! Only validation failures are errors. Expected outcomes of editing, such as
//! a duplicate name or a missing target, are reported as `false` by the
//! operations themselves.

use std::fmt;

use thiserror::Error;

use crate::identifier::IdentifierError;

/// The kind of model entity a name belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Class,
    Field,
    Method,
    Parameter,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Self::Class => "class",
            Self::Field => "field",
            Self::Method => "method",
            Self::Parameter => "parameter",
        };
        f.write_str(text)
    }
}

/// Validation failures raised by the model.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    #[error("invalid {entity} name: {source}")]
    InvalidName {
        entity: EntityKind,
        source: IdentifierError,
    },

    #[error("class `{0}` cannot have a relationship with itself")]
    SelfRelationship(String),

    #[error("unknown access modifier `{0}` (expected public, private or protected)")]
    UnknownAccess(String),

    #[error(
        "unknown relationship type `{0}` (expected aggregation, composition, generalization or realization)"
    )]
    UnknownRelationshipType(String),
}

impl ModelError {
    /// Validates `name` as the name of an `entity`.
    pub(crate) fn check_name(entity: EntityKind, name: &str) -> Result<(), Self> {
        crate::identifier::validate_identifier(name)
            .map_err(|source| Self::InvalidName { entity, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_name_message() {
        let err = ModelError::check_name(EntityKind::Field, "my field").unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid field name: name `my field` cannot contain whitespace"
        );
    }

    #[test]
    fn test_invalid_name_keeps_source() {
        use std::error::Error;

        let err = ModelError::check_name(EntityKind::Class, "").unwrap_err();
        assert!(err.source().is_some());
    }
}
