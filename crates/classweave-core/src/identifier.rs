//! Identifier rules and class identities.
//!
//! This module provides the two kinds of "names" the model deals with:
//!
//! - [`validate_identifier`] checks user-supplied names (classes, fields,
//!   methods, parameters). A valid identifier is non-empty and contains no
//!   whitespace, because names end up inside space-separated display strings
//!   and command lines.
//! - [`ClassId`] is the opaque identity of a class inside a
//!   [`Store`](crate::store::Store). Relationships refer to peers by
//!   [`ClassId`], never by name, so renaming a class is invisible to them.

use std::fmt;

use thiserror::Error;

/// Reasons a string is rejected as an identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The name is empty or made only of whitespace.
    #[error("name cannot be blank")]
    Blank,

    /// The name contains at least one whitespace character.
    #[error("name `{0}` cannot contain whitespace")]
    ContainsWhitespace(String),
}

/// Validates a user-supplied identifier.
///
/// # Errors
///
/// Returns [`IdentifierError::Blank`] for empty or all-whitespace input and
/// [`IdentifierError::ContainsWhitespace`] when any character is whitespace.
///
/// # Examples
///
/// ```
/// use classweave_core::identifier::{IdentifierError, validate_identifier};
///
/// assert!(validate_identifier("Car").is_ok());
/// assert_eq!(validate_identifier("  "), Err(IdentifierError::Blank));
/// assert!(validate_identifier("my car").is_err());
/// ```
pub fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
    if name.trim().is_empty() {
        return Err(IdentifierError::Blank);
    }
    if name.chars().any(char::is_whitespace) {
        return Err(IdentifierError::ContainsWhitespace(name.to_string()));
    }
    Ok(())
}

/// Opaque identity of a class.
///
/// Ids are allocated by the owning store and are never reused within it.
/// They carry no meaning across stores: two stores built independently may
/// assign different ids to classes with the same name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClassId(u32);

impl ClassId {
    /// Creates a class id from its raw value.
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    /// Returns the raw value of this id.
    pub fn get(self) -> u32 {
        self.0
    }

    /// Returns the id following this one.
    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for ClassId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_identifiers() {
        assert!(validate_identifier("Car").is_ok());
        assert!(validate_identifier("speed_2").is_ok());
        assert!(validate_identifier("List<String>").is_ok());
    }

    #[test]
    fn test_blank_identifiers() {
        assert_eq!(validate_identifier(""), Err(IdentifierError::Blank));
        assert_eq!(validate_identifier("   "), Err(IdentifierError::Blank));
        assert_eq!(validate_identifier("\t\n"), Err(IdentifierError::Blank));
    }

    #[test]
    fn test_embedded_whitespace() {
        assert_eq!(
            validate_identifier("my car"),
            Err(IdentifierError::ContainsWhitespace("my car".to_string()))
        );
        assert!(validate_identifier(" Car").is_err());
        assert!(validate_identifier("Car\t").is_err());
    }

    #[test]
    fn test_class_id_ordering() {
        let first = ClassId::new(0);
        let second = first.next();

        assert!(first < second);
        assert_eq!(second.get(), 1);
        assert_eq!(second.to_string(), "#1");
    }
}
