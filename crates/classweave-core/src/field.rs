//! Fields (attributes) of a class.

use std::fmt;

use crate::{
    access::Access,
    error::{EntityKind, ModelError},
};

/// An immutable field value: type, name and access modifier.
///
/// Inside a [`Class`](crate::class::Class) a field is identified by its name
/// alone. Two `Field` values are equal only when all three parts match.
/// Editing a field means building a replacement value with one of the
/// `with_*` methods; the owning class swaps it in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Field {
    ty: String,
    name: String,
    access: Access,
}

impl Field {
    /// Creates a new field.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    /// The type is free-form and never validated.
    pub fn new(
        ty: impl Into<String>,
        name: impl Into<String>,
        access: Access,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        ModelError::check_name(EntityKind::Field, &name)?;
        Ok(Self {
            ty: ty.into(),
            name,
            access,
        })
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Returns a copy of this field under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn with_name(&self, name: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(self.ty.clone(), name, self.access)
    }

    /// Returns a copy of this field with a new type.
    pub fn with_type(&self, ty: impl Into<String>) -> Self {
        Self {
            ty: ty.into(),
            ..self.clone()
        }
    }

    /// Returns a copy of this field with a new access modifier.
    pub fn with_access(&self, access: Access) -> Self {
        Self {
            access,
            ..self.clone()
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.access, self.ty, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_field() {
        let field = Field::new("int", "speed", Access::Private).unwrap();
        assert_eq!(field.ty(), "int");
        assert_eq!(field.name(), "speed");
        assert_eq!(field.access(), Access::Private);
    }

    #[test]
    fn test_rejects_invalid_names() {
        assert!(Field::new("int", "", Access::Public).is_err());
        assert!(Field::new("int", "   ", Access::Public).is_err());
        assert!(Field::new("int", "top speed", Access::Public).is_err());
    }

    #[test]
    fn test_type_is_not_validated() {
        let field = Field::new("", "anything", Access::Public).unwrap();
        assert_eq!(field.ty(), "");

        let field = Field::new("Map<String, Integer>", "lookup", Access::Public).unwrap();
        assert_eq!(field.ty(), "Map<String, Integer>");
    }

    #[test]
    fn test_equality_compares_every_part() {
        let base = Field::new("int", "speed", Access::Private).unwrap();

        assert_eq!(base, Field::new("int", "speed", Access::Private).unwrap());
        assert_ne!(base, base.with_type("long"));
        assert_ne!(base, base.with_access(Access::Public));
        assert_ne!(base, base.with_name("velocity").unwrap());
    }

    #[test]
    fn test_replacements_keep_other_parts() {
        let base = Field::new("int", "speed", Access::Private).unwrap();

        let renamed = base.with_name("velocity").unwrap();
        assert_eq!(renamed.ty(), "int");
        assert_eq!(renamed.access(), Access::Private);

        let retyped = base.with_type("double");
        assert_eq!(retyped.name(), "speed");
        assert_eq!(retyped.access(), Access::Private);
    }

    #[test]
    fn test_display() {
        let field = Field::new("int", "speed", Access::Protected).unwrap();
        assert_eq!(field.to_string(), "protected int speed");
    }
}
