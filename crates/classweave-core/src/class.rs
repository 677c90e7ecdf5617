//! The class entity and its member and relationship operations.
//!
//! A [`Class`] owns its fields (unique by name), its methods (unique by
//! [`Signature`]) and two relationship maps keyed by peer [`ClassId`]:
//! relationships this class holds *to* other classes and relationships other
//! classes hold *to* this one. The two maps of a related pair always mirror
//! each other, and at most one relationship exists between any two classes
//! regardless of direction.
//!
//! Operations that can fail because of user input return `Ok(false)` or
//! `false` for expected conflicts (duplicate name, missing member) and
//! [`ModelError`] only for invalid names or self-relationships.

use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};

use crate::{
    access::Access,
    error::{EntityKind, ModelError},
    field::Field,
    identifier::ClassId,
    method::{Method, Parameter, Signature},
    relationship::RelationshipType,
};

/// A class of the diagram.
///
/// Equality compares the name, the field and method sets (ignoring order)
/// and both relationship maps. The [`ClassId`] itself is not compared, but
/// the relationship maps hold ids, so classes from different stores are best
/// compared through [`Store`](crate::store::Store) equality, which resolves
/// peers by name.
#[derive(Debug, Clone)]
pub struct Class {
    id: ClassId,
    name: String,
    fields: IndexMap<String, Field>,
    methods: IndexMap<Signature, Method>,
    relationships_to_other: IndexMap<ClassId, RelationshipType>,
    relationships_from_other: IndexMap<ClassId, RelationshipType>,
}

impl Class {
    /// Creates an empty class.
    ///
    /// Classes are normally created through
    /// [`Store::add_class`](crate::store::Store::add_class), which allocates
    /// the id and enforces name uniqueness.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn new(id: ClassId, name: impl Into<String>) -> Result<Self, ModelError> {
        let name = name.into();
        ModelError::check_name(EntityKind::Class, &name)?;
        Ok(Self {
            id,
            name,
            fields: IndexMap::new(),
            methods: IndexMap::new(),
            relationships_to_other: IndexMap::new(),
            relationships_from_other: IndexMap::new(),
        })
    }

    pub fn id(&self) -> ClassId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Changes the name of this class. Uniqueness is the store's concern.
    pub(crate) fn set_name(&mut self, name: impl Into<String>) -> Result<(), ModelError> {
        let name = name.into();
        ModelError::check_name(EntityKind::Class, &name)?;
        self.name = name;
        Ok(())
    }

    /// Returns the fields in insertion order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = &Field> {
        self.fields.values()
    }

    pub fn field(&self, name: &str) -> Option<&Field> {
        self.fields.get(name)
    }

    /// Returns the methods in insertion order.
    pub fn methods(&self) -> impl ExactSizeIterator<Item = &Method> {
        self.methods.values()
    }

    pub fn method(&self, signature: &Signature) -> Option<&Method> {
        self.methods.get(signature)
    }

    /// Relationships this class holds to other classes, keyed by peer.
    pub fn relationships_to_other(&self) -> &IndexMap<ClassId, RelationshipType> {
        &self.relationships_to_other
    }

    /// Relationships other classes hold to this class, keyed by peer.
    pub fn relationships_from_other(&self) -> &IndexMap<ClassId, RelationshipType> {
        &self.relationships_from_other
    }

    /// Returns `true` if this class holds a relationship with `peer` in
    /// either direction.
    pub fn is_related_to(&self, peer: ClassId) -> bool {
        self.relationships_to_other.contains_key(&peer)
            || self.relationships_from_other.contains_key(&peer)
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Adds a field. Returns `Ok(false)` if a field called `name` exists.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn add_field(
        &mut self,
        ty: impl Into<String>,
        name: impl Into<String>,
        access: Access,
    ) -> Result<bool, ModelError> {
        let field = Field::new(ty, name, access)?;
        if self.fields.contains_key(field.name()) {
            debug!(class = self.name.as_str(), field = field.name(); "Field already exists");
            return Ok(false);
        }
        debug!(class = self.name.as_str(), field = field.name(); "Field added");
        self.fields.insert(field.name().to_string(), field);
        Ok(true)
    }

    /// Removes the field called `name`. Returns `false` if there is none.
    pub fn delete_field(&mut self, name: &str) -> bool {
        let removed = self.fields.shift_remove(name).is_some();
        if removed {
            debug!(class = self.name.as_str(), field = name; "Field deleted");
        }
        removed
    }

    /// Renames a field, keeping its type, access and position.
    ///
    /// Returns `Ok(false)` if `new_name` is already used by a field of this
    /// class (renaming a field to its own name counts as a collision) or if
    /// `old_name` does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `new_name` is not a valid identifier.
    pub fn rename_field(&mut self, old_name: &str, new_name: &str) -> Result<bool, ModelError> {
        ModelError::check_name(EntityKind::Field, new_name)?;
        if self.fields.contains_key(new_name) {
            return Ok(false);
        }
        let Some(field) = self.fields.get(old_name) else {
            return Ok(false);
        };
        let renamed = field.with_name(new_name)?;
        if let Some((idx, _, _)) = self.fields.shift_remove_full(old_name) {
            self.fields.shift_insert(idx, new_name.to_string(), renamed);
        }
        debug!(class = self.name.as_str(), from = old_name, to = new_name; "Field renamed");
        Ok(true)
    }

    /// Changes the type of the field called `name`. Returns `false` if there
    /// is none.
    pub fn change_field_type(&mut self, name: &str, ty: impl Into<String>) -> bool {
        match self.fields.get_mut(name) {
            Some(field) => {
                *field = field.with_type(ty);
                trace!(class = self.name.as_str(), field = name; "Field type changed");
                true
            }
            None => false,
        }
    }

    /// Changes the access modifier of the field called `name`. Returns
    /// `false` if there is none.
    pub fn change_field_access(&mut self, name: &str, access: Access) -> bool {
        match self.fields.get_mut(name) {
            Some(field) => {
                *field = field.with_access(access);
                trace!(class = self.name.as_str(), field = name; "Field access changed");
                true
            }
            None => false,
        }
    }

    // =========================================================================
    // Methods
    // =========================================================================

    /// Adds a method.
    ///
    /// Returns `Ok(false)` if a method with the same signature exists, or if
    /// two of `params` share a name. Overloads (same name, different
    /// parameter types) are allowed.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn add_method(
        &mut self,
        return_type: impl Into<String>,
        name: impl Into<String>,
        params: Vec<Parameter>,
        access: Access,
    ) -> Result<bool, ModelError> {
        let method = Method::new(return_type, name, params, access)?;
        if method.has_duplicate_param_names() {
            debug!(class = self.name.as_str(), method = method.name(); "Duplicate parameter names");
            return Ok(false);
        }
        let signature = method.signature();
        if self.methods.contains_key(&signature) {
            debug!(class = self.name.as_str(), signature = signature.to_string(); "Method already exists");
            return Ok(false);
        }
        debug!(class = self.name.as_str(), signature = signature.to_string(); "Method added");
        self.methods.insert(signature, method);
        Ok(true)
    }

    /// Removes the method with `signature`. Returns `false` if there is none.
    pub fn delete_method(&mut self, signature: &Signature) -> bool {
        let removed = self.methods.shift_remove(signature).is_some();
        if removed {
            debug!(class = self.name.as_str(), signature = signature.to_string(); "Method deleted");
        }
        removed
    }

    /// Renames the method with `signature`.
    ///
    /// Returns `Ok(false)` if the method does not exist or if a method with
    /// the renamed signature already exists (including the method itself).
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `new_name` is not a valid identifier.
    pub fn rename_method(
        &mut self,
        signature: &Signature,
        new_name: &str,
    ) -> Result<bool, ModelError> {
        ModelError::check_name(EntityKind::Method, new_name)?;
        let Some(method) = self.methods.get(signature) else {
            return Ok(false);
        };
        let renamed = method.with_name(new_name)?;
        if self.methods.contains_key(&renamed.signature()) {
            return Ok(false);
        }
        self.replace_method(signature, renamed);
        debug!(class = self.name.as_str(), from = signature.to_string(), to = new_name; "Method renamed");
        Ok(true)
    }

    /// Changes the return type of the method with `signature`. Returns
    /// `false` if there is none.
    pub fn change_method_type(&mut self, signature: &Signature, ty: impl Into<String>) -> bool {
        match self.methods.get_mut(signature) {
            Some(method) => {
                *method = method.with_return_type(ty);
                true
            }
            None => false,
        }
    }

    /// Changes the access modifier of the method with `signature`. Returns
    /// `false` if there is none.
    pub fn change_method_access(&mut self, signature: &Signature, access: Access) -> bool {
        match self.methods.get_mut(signature) {
            Some(method) => {
                *method = method.with_access(access);
                true
            }
            None => false,
        }
    }

    /// Appends `param` to the method with `signature`.
    ///
    /// Returns `false` if the method does not exist, already has a parameter
    /// with the same name, or if the extended signature belongs to another
    /// method of this class.
    pub fn add_parameter(&mut self, signature: &Signature, param: Parameter) -> bool {
        let Some(method) = self.methods.get(signature) else {
            return false;
        };
        if method.has_param_named(param.name()) {
            return false;
        }
        let extended = method.with_param(param);
        if self.methods.contains_key(&extended.signature()) {
            return false;
        }
        self.replace_method(signature, extended);
        trace!(class = self.name.as_str(), signature = signature.to_string(); "Parameter added");
        true
    }

    /// Removes `param` from the method with `signature`.
    ///
    /// Returns `false` if the method does not exist, does not have `param`,
    /// or if the reduced signature belongs to another method of this class.
    pub fn delete_parameter(&mut self, signature: &Signature, param: &Parameter) -> bool {
        let Some(method) = self.methods.get(signature) else {
            return false;
        };
        let Some(reduced) = method.without_param(param) else {
            return false;
        };
        let reduced_signature = reduced.signature();
        if reduced_signature != *signature && self.methods.contains_key(&reduced_signature) {
            debug!(
                class = self.name.as_str(),
                signature = reduced_signature.to_string();
                "Removing parameter would duplicate a signature"
            );
            return false;
        }
        self.replace_method(signature, reduced);
        trace!(class = self.name.as_str(), signature = signature.to_string(); "Parameter deleted");
        true
    }

    /// Swaps the method stored under `old` for `method`, keeping its position.
    fn replace_method(&mut self, old: &Signature, method: Method) {
        if let Some((idx, _, _)) = self.methods.shift_remove_full(old) {
            self.methods.shift_insert(idx, method.signature(), method);
        }
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Creates a relationship from this class to `other`.
    ///
    /// Both sides are written: `other` records the mirrored incoming entry.
    /// Returns `Ok(false)` without touching either class if the two are
    /// already related in any direction, whatever the kind.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SelfRelationship`] if `other` is this class.
    pub fn add_relationship_to_other(
        &mut self,
        kind: RelationshipType,
        other: &mut Class,
    ) -> Result<bool, ModelError> {
        if other.id == self.id {
            return Err(ModelError::SelfRelationship(self.name.clone()));
        }
        if self.is_related_to(other.id) || other.is_related_to(self.id) {
            debug!(from = self.name.as_str(), to = other.name.as_str(); "Classes already related");
            return Ok(false);
        }
        self.relationships_to_other.insert(other.id, kind);
        other.relationships_from_other.insert(self.id, kind);
        debug!(from = self.name.as_str(), to = other.name.as_str(), kind = kind.as_str(); "Relationship added");
        Ok(true)
    }

    /// Creates a relationship from `other` to this class.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SelfRelationship`] if `other` is this class.
    pub fn add_relationship_from_other(
        &mut self,
        kind: RelationshipType,
        other: &mut Class,
    ) -> Result<bool, ModelError> {
        other.add_relationship_to_other(kind, self)
    }

    /// Deletes the relationship of `kind` from this class to `other`.
    ///
    /// Both the outgoing entry here and the incoming entry on `other` must
    /// exist with `kind`; otherwise nothing is changed and `false` is
    /// returned.
    pub fn delete_relationship_to_other(
        &mut self,
        kind: RelationshipType,
        other: &mut Class,
    ) -> bool {
        let forward = self.relationships_to_other.get(&other.id) == Some(&kind);
        let mirrored = other.relationships_from_other.get(&self.id) == Some(&kind);
        if !(forward && mirrored) {
            return false;
        }
        self.relationships_to_other.shift_remove(&other.id);
        other.relationships_from_other.shift_remove(&self.id);
        debug!(from = self.name.as_str(), to = other.name.as_str(), kind = kind.as_str(); "Relationship deleted");
        true
    }

    /// Deletes the relationship of `kind` from `other` to this class.
    pub fn delete_relationship_from_other(
        &mut self,
        kind: RelationshipType,
        other: &mut Class,
    ) -> bool {
        other.delete_relationship_to_other(kind, self)
    }

    #[cfg(test)]
    pub(crate) fn set_incoming(&mut self, peer: ClassId, kind: RelationshipType) {
        self.relationships_from_other.insert(peer, kind);
    }

    /// Drops every entry referring to `peer`, in both maps.
    pub(crate) fn forget_peer(&mut self, peer: ClassId) {
        self.relationships_to_other.shift_remove(&peer);
        self.relationships_from_other.shift_remove(&peer);
    }
}

impl PartialEq for Class {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.fields == other.fields
            && self.methods == other.methods
            && self.relationships_to_other == other.relationships_to_other
            && self.relationships_from_other == other.relationships_from_other
    }
}

impl Eq for Class {}

impl fmt::Display for Class {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}
