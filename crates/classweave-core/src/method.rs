//! Methods, their parameters and signatures.
//!
//! A method is identified inside its class by its [`Signature`]: the method
//! name plus the ordered sequence of parameter *types*. Return type, access
//! modifier and parameter names are facets of an identified method and never
//! take part in lookups.

use std::fmt;

use crate::{
    access::Access,
    error::{EntityKind, ModelError},
};

/// An immutable method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Parameter {
    ty: String,
    name: String,
}

impl Parameter {
    /// Creates a new parameter.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn new(ty: impl Into<String>, name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        ModelError::check_name(EntityKind::Parameter, &name)?;
        Ok(Self {
            ty: ty.into(),
            name,
        })
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.ty, self.name)
    }
}

/// The uniqueness key of a method within a class.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Signature {
    name: String,
    param_types: Vec<String>,
}

impl Signature {
    /// Creates a signature from a method name and its parameter types.
    ///
    /// # Examples
    ///
    /// ```
    /// use classweave_core::method::Signature;
    ///
    /// let sig = Signature::new("drive", ["int", "bool"]);
    /// assert_eq!(sig.to_string(), "drive(int, bool)");
    /// ```
    pub fn new<I, S>(name: impl Into<String>, param_types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            param_types: param_types.into_iter().map(Into::into).collect(),
        }
    }

    /// Creates the signature a method with `name` and `params` would have.
    pub fn of(name: impl Into<String>, params: &[Parameter]) -> Self {
        Self::new(name, params.iter().map(|param| param.ty.clone()))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn param_types(&self) -> &[String] {
        &self.param_types
    }
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})", self.name, self.param_types.join(", "))
    }
}

/// A method value: return type, name, ordered parameters and access.
///
/// Like [`Field`](crate::field::Field), a `Method` is never mutated in
/// place. The `with_*` methods build the replacement value that the owning
/// class swaps in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Method {
    return_type: String,
    name: String,
    params: Vec<Parameter>,
    access: Access,
}

impl Method {
    /// Creates a new method.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn new(
        return_type: impl Into<String>,
        name: impl Into<String>,
        params: Vec<Parameter>,
        access: Access,
    ) -> Result<Self, ModelError> {
        let name = name.into();
        ModelError::check_name(EntityKind::Method, &name)?;
        Ok(Self {
            return_type: return_type.into(),
            name,
            params,
            access,
        })
    }

    pub fn return_type(&self) -> &str {
        &self.return_type
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn params(&self) -> &[Parameter] {
        &self.params
    }

    pub fn access(&self) -> Access {
        self.access
    }

    /// Returns the signature of this method.
    pub fn signature(&self) -> Signature {
        Signature::of(self.name.clone(), &self.params)
    }

    /// Returns `true` if this method already has a parameter called `name`.
    pub fn has_param_named(&self, name: &str) -> bool {
        self.params.iter().any(|param| param.name == name)
    }

    /// Returns `true` if two parameters of this method share a name.
    pub(crate) fn has_duplicate_param_names(&self) -> bool {
        self.params
            .iter()
            .enumerate()
            .any(|(idx, param)| self.params[..idx].iter().any(|p| p.name == param.name))
    }

    /// Returns a copy of this method under a new name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn with_name(&self, name: impl Into<String>) -> Result<Self, ModelError> {
        Self::new(
            self.return_type.clone(),
            name,
            self.params.clone(),
            self.access,
        )
    }

    pub fn with_return_type(&self, return_type: impl Into<String>) -> Self {
        Self {
            return_type: return_type.into(),
            ..self.clone()
        }
    }

    pub fn with_access(&self, access: Access) -> Self {
        Self {
            access,
            ..self.clone()
        }
    }

    /// Returns a copy of this method with `param` appended.
    pub fn with_param(&self, param: Parameter) -> Self {
        let mut params = self.params.clone();
        params.push(param);
        Self {
            params,
            ..self.clone()
        }
    }

    /// Returns a copy of this method without the first parameter equal to
    /// `param`, or `None` if the method has no such parameter.
    pub fn without_param(&self, param: &Parameter) -> Option<Self> {
        let idx = self.params.iter().position(|p| p == param)?;
        let mut params = self.params.clone();
        params.remove(idx);
        Some(Self {
            params,
            ..self.clone()
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}(", self.access, self.return_type, self.name)?;
        for (idx, param) in self.params.iter().enumerate() {
            if idx > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{param}")?;
        }
        f.write_str(")")
    }
}
