//! The store: owner of every class and sole mutation authority.
//!
//! The [`Store`] keeps classes in creation order together with a name index,
//! enforces global name uniqueness, allocates [`ClassId`]s, and coordinates
//! the operations that touch two classes at once: creating and deleting
//! relationships, and cascading a class deletion to every peer.
//!
//! Every class-level operation is also exposed here, addressed by class
//! name. An unknown class name is an expected outcome and yields `false`
//! (or `Ok(false)`), never an error.

use std::{
    collections::HashMap,
    fmt::{self, Write as _},
};

use indexmap::IndexMap;
use log::{debug, info, warn};

use crate::{
    access::Access,
    class::Class,
    error::{EntityKind, ModelError},
    identifier::ClassId,
    method::{Method, Parameter, Signature},
    relationship::RelationshipType,
};

/// The collection of all classes of a diagram.
///
/// # Examples
///
/// ```
/// use classweave_core::{Access, RelationshipType, Store};
///
/// let mut store = Store::new();
/// assert_eq!(store.add_class("Car"), Ok(true));
/// assert_eq!(store.add_class("Wheel"), Ok(true));
/// assert_eq!(store.add_class("Car"), Ok(false));
///
/// store.add_field("Car", "int", "speed", Access::Private).unwrap();
/// store
///     .add_relationship("Car", "Wheel", RelationshipType::Composition)
///     .unwrap();
///
/// assert!(store.delete_class("Wheel"));
/// assert!(store.relationships().is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct Store {
    classes: IndexMap<ClassId, Class>,
    names: HashMap<String, ClassId>,
    next_id: ClassId,
}

impl Default for Store {
    fn default() -> Self {
        Self {
            classes: IndexMap::new(),
            names: HashMap::new(),
            next_id: ClassId::new(0),
        }
    }
}

impl Store {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Returns the number of classes.
    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Returns the class names in creation order.
    pub fn class_names(&self) -> impl ExactSizeIterator<Item = &str> {
        self.classes.values().map(Class::name)
    }

    /// Returns the classes in creation order.
    pub fn classes(&self) -> impl ExactSizeIterator<Item = &Class> {
        self.classes.values()
    }

    /// Resolves a class name to its id.
    pub fn class_id(&self, name: &str) -> Option<ClassId> {
        self.names.get(name).copied()
    }

    /// Finds a class by name.
    pub fn class(&self, name: &str) -> Option<&Class> {
        self.class_id(name).and_then(|id| self.classes.get(&id))
    }

    pub fn class_by_id(&self, id: ClassId) -> Option<&Class> {
        self.classes.get(&id)
    }

    /// Returns the name of the class with `id`.
    pub fn name_of(&self, id: ClassId) -> Option<&str> {
        self.classes.get(&id).map(Class::name)
    }

    /// Returns the display strings of the fields of `class`.
    pub fn field_list(&self, class: &str) -> Option<Vec<String>> {
        self.class(class)
            .map(|class| class.fields().map(ToString::to_string).collect())
    }

    /// Returns the display strings of the methods of `class`.
    pub fn method_list(&self, class: &str) -> Option<Vec<String>> {
        self.class(class)
            .map(|class| class.methods().map(ToString::to_string).collect())
    }

    /// Finds a method of `class` by signature.
    pub fn find_method(&self, class: &str, signature: &Signature) -> Option<&Method> {
        self.class(class)?.method(signature)
    }

    /// Finds a method of `class` by its display string, as produced by
    /// [`method_list`](Self::method_list).
    pub fn method_by_display(&self, class: &str, display: &str) -> Option<&Method> {
        self.class(class)?
            .methods()
            .find(|method| method.to_string() == display)
    }

    /// Relationships `class` holds to other classes, with peers resolved to
    /// names.
    pub fn relationships_to_other(&self, class: &str) -> Option<Vec<(&str, RelationshipType)>> {
        let class = self.class(class)?;
        Some(self.resolve_peers(class.relationships_to_other()))
    }

    /// Relationships other classes hold to `class`, with peers resolved to
    /// names.
    pub fn relationships_from_other(&self, class: &str) -> Option<Vec<(&str, RelationshipType)>> {
        let class = self.class(class)?;
        Some(self.resolve_peers(class.relationships_from_other()))
    }

    /// Returns every relationship once, as `(from, to, kind)`.
    pub fn relationships(&self) -> Vec<(&str, &str, RelationshipType)> {
        self.classes
            .values()
            .flat_map(|class| {
                self.resolve_peers(class.relationships_to_other())
                    .into_iter()
                    .map(move |(peer, kind)| (class.name(), peer, kind))
            })
            .collect()
    }

    fn resolve_peers<'a>(
        &'a self,
        peers: &IndexMap<ClassId, RelationshipType>,
    ) -> Vec<(&'a str, RelationshipType)> {
        peers
            .iter()
            .filter_map(|(id, kind)| self.name_of(*id).map(|name| (name, *kind)))
            .collect()
    }

    /// Renders one class with its members and relationships.
    pub fn describe_class(&self, name: &str) -> Option<String> {
        let class = self.class(name)?;
        let mut out = String::new();
        // Writing into a String cannot fail.
        let _ = self.write_class(&mut out, class);
        Some(out)
    }

    fn write_class(&self, out: &mut impl fmt::Write, class: &Class) -> fmt::Result {
        writeln!(out, "Class: {}", class.name())?;
        writeln!(out, "  Fields:")?;
        for field in class.fields() {
            writeln!(out, "    {field}")?;
        }
        writeln!(out, "  Methods:")?;
        for method in class.methods() {
            writeln!(out, "    {method}")?;
        }
        writeln!(out, "  Relationships:")?;
        for (peer, kind) in self.resolve_peers(class.relationships_to_other()) {
            writeln!(out, "    {kind} -> {peer}")?;
        }
        for (peer, kind) in self.resolve_peers(class.relationships_from_other()) {
            writeln!(out, "    {kind} <- {peer}")?;
        }
        Ok(())
    }

    // =========================================================================
    // Classes
    // =========================================================================

    /// Adds an empty class. Returns `Ok(false)` if the name is taken.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn add_class(&mut self, name: &str) -> Result<bool, ModelError> {
        ModelError::check_name(EntityKind::Class, name)?;
        if self.names.contains_key(name) {
            debug!(class = name; "Class name already taken");
            return Ok(false);
        }
        let id = self.next_id;
        let class = Class::new(id, name)?;
        self.next_id = id.next();
        self.names.insert(name.to_string(), id);
        self.classes.insert(id, class);
        info!(class = name, id = id.get(); "Class added");
        Ok(true)
    }

    /// Deletes a class after removing every relationship that references it.
    /// Returns `false` if there is no such class.
    pub fn delete_class(&mut self, name: &str) -> bool {
        let Some(id) = self.class_id(name) else {
            return false;
        };
        self.remove_relationships(id);
        self.classes.shift_remove(&id);
        self.names.remove(name);
        info!(class = name; "Class deleted");
        true
    }

    /// Renames a class.
    ///
    /// Returns `Ok(false)` if `old_name` does not exist or `new_name` belongs
    /// to a different class. Renaming a class to its current name succeeds
    /// without changes. Relationships are unaffected, since peers are
    /// referenced by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `new_name` is not a valid identifier.
    pub fn rename_class(&mut self, old_name: &str, new_name: &str) -> Result<bool, ModelError> {
        ModelError::check_name(EntityKind::Class, new_name)?;
        let Some(id) = self.class_id(old_name) else {
            return Ok(false);
        };
        match self.class_id(new_name) {
            Some(owner) if owner != id => return Ok(false),
            Some(_) => return Ok(true),
            None => {}
        }
        let Some(class) = self.classes.get_mut(&id) else {
            return Ok(false);
        };
        class.set_name(new_name)?;
        self.names.remove(old_name);
        self.names.insert(new_name.to_string(), id);
        info!(from = old_name, to = new_name; "Class renamed");
        Ok(true)
    }

    /// Strips every relationship edge referencing `id` from its peers.
    fn remove_relationships(&mut self, id: ClassId) {
        let Some(class) = self.classes.get(&id) else {
            return;
        };
        let outgoing: Vec<_> = class
            .relationships_to_other()
            .iter()
            .map(|(peer, kind)| (*peer, *kind))
            .collect();
        let incoming: Vec<_> = class
            .relationships_from_other()
            .iter()
            .map(|(peer, kind)| (*peer, *kind))
            .collect();

        for (peer, kind) in outgoing {
            if let Some((class, peer_class)) = self.pair_mut(id, peer) {
                if !class.delete_relationship_to_other(kind, peer_class) {
                    warn!(from = class.name(), to = peer_class.name(); "Mismatched relationship entries, dropping both");
                    class.forget_peer(peer);
                    peer_class.forget_peer(id);
                }
            }
        }
        for (peer, kind) in incoming {
            if let Some((class, peer_class)) = self.pair_mut(id, peer) {
                if !class.delete_relationship_from_other(kind, peer_class) {
                    warn!(from = peer_class.name(), to = class.name(); "Mismatched relationship entries, dropping both");
                    class.forget_peer(peer);
                    peer_class.forget_peer(id);
                }
            }
        }
    }

    /// Borrows two distinct classes mutably at once.
    fn pair_mut(&mut self, first: ClassId, second: ClassId) -> Option<(&mut Class, &mut Class)> {
        if first == second {
            return None;
        }
        let mut a = None;
        let mut b = None;
        for class in self.classes.values_mut() {
            if class.id() == first {
                a = Some(class);
            } else if class.id() == second {
                b = Some(class);
            }
        }
        a.zip(b)
    }

    fn class_mut(&mut self, name: &str) -> Option<&mut Class> {
        let id = self.class_id(name)?;
        let class = self.classes.get_mut(&id);
        if class.is_none() {
            warn!(class = name; "Name index points at a missing class");
        }
        class
    }

    // =========================================================================
    // Relationships
    // =========================================================================

    /// Creates a relationship of `kind` from class `from` to class `to`.
    ///
    /// Returns `Ok(false)` if either class is missing or if the two classes
    /// are already related in any direction.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::SelfRelationship`] if `from` and `to` name the
    /// same class.
    pub fn add_relationship(
        &mut self,
        from: &str,
        to: &str,
        kind: RelationshipType,
    ) -> Result<bool, ModelError> {
        let (Some(from_id), Some(to_id)) = (self.class_id(from), self.class_id(to)) else {
            return Ok(false);
        };
        if from_id == to_id {
            return Err(ModelError::SelfRelationship(from.to_string()));
        }
        match self.pair_mut(from_id, to_id) {
            Some((source, target)) => source.add_relationship_to_other(kind, target),
            None => Ok(false),
        }
    }

    /// Deletes the relationship from class `from` to class `to`, whatever its
    /// kind. Returns `false` if either class is missing or no such
    /// relationship exists.
    pub fn delete_relationship(&mut self, from: &str, to: &str) -> bool {
        let (Some(from_id), Some(to_id)) = (self.class_id(from), self.class_id(to)) else {
            return false;
        };
        let Some(kind) = self
            .classes
            .get(&from_id)
            .and_then(|class| class.relationships_to_other().get(&to_id).copied())
        else {
            return false;
        };
        match self.pair_mut(from_id, to_id) {
            Some((source, target)) => source.delete_relationship_to_other(kind, target),
            None => false,
        }
    }

    // =========================================================================
    // Fields
    // =========================================================================

    /// Adds a field to `class`. See [`Class::add_field`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn add_field(
        &mut self,
        class: &str,
        ty: &str,
        name: &str,
        access: Access,
    ) -> Result<bool, ModelError> {
        match self.class_mut(class) {
            Some(class) => class.add_field(ty, name, access),
            None => Ok(false),
        }
    }

    pub fn delete_field(&mut self, class: &str, name: &str) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.delete_field(name))
    }

    /// Renames a field of `class`. See [`Class::rename_field`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `new_name` is not a valid identifier.
    pub fn rename_field(
        &mut self,
        class: &str,
        old_name: &str,
        new_name: &str,
    ) -> Result<bool, ModelError> {
        match self.class_mut(class) {
            Some(class) => class.rename_field(old_name, new_name),
            None => Ok(false),
        }
    }

    pub fn change_field_type(&mut self, class: &str, name: &str, ty: &str) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.change_field_type(name, ty))
    }

    pub fn change_field_access(&mut self, class: &str, name: &str, access: Access) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.change_field_access(name, access))
    }

    // =========================================================================
    // Methods and parameters
    // =========================================================================

    /// Adds a method to `class`. See [`Class::add_method`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `name` is not a valid identifier.
    pub fn add_method(
        &mut self,
        class: &str,
        return_type: &str,
        name: &str,
        params: Vec<Parameter>,
        access: Access,
    ) -> Result<bool, ModelError> {
        match self.class_mut(class) {
            Some(class) => class.add_method(return_type, name, params, access),
            None => Ok(false),
        }
    }

    pub fn delete_method(&mut self, class: &str, signature: &Signature) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.delete_method(signature))
    }

    /// Renames a method of `class`. See [`Class::rename_method`].
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::InvalidName`] if `new_name` is not a valid identifier.
    pub fn rename_method(
        &mut self,
        class: &str,
        signature: &Signature,
        new_name: &str,
    ) -> Result<bool, ModelError> {
        match self.class_mut(class) {
            Some(class) => class.rename_method(signature, new_name),
            None => Ok(false),
        }
    }

    pub fn change_method_type(&mut self, class: &str, signature: &Signature, ty: &str) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.change_method_type(signature, ty))
    }

    pub fn change_method_access(
        &mut self,
        class: &str,
        signature: &Signature,
        access: Access,
    ) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.change_method_access(signature, access))
    }

    pub fn add_parameter(&mut self, class: &str, signature: &Signature, param: Parameter) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.add_parameter(signature, param))
    }

    pub fn delete_parameter(
        &mut self,
        class: &str,
        signature: &Signature,
        param: &Parameter,
    ) -> bool {
        self.class_mut(class)
            .is_some_and(|class| class.delete_parameter(signature, param))
    }
}

impl PartialEq for Store {
    /// Two stores are equal when they hold equal classes under the same
    /// names, with relationship peers compared by name rather than id.
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len()
            && self.classes().all(|class| {
                other.class(class.name()).is_some_and(|theirs| {
                    class.name() == theirs.name()
                        && class.fields().len() == theirs.fields().len()
                        && class.fields().all(|f| theirs.field(f.name()) == Some(f))
                        && class.methods().len() == theirs.methods().len()
                        && class
                            .methods()
                            .all(|m| theirs.method(&m.signature()) == Some(m))
                        && same_peers(
                            self.resolve_peers(class.relationships_to_other()),
                            other.resolve_peers(theirs.relationships_to_other()),
                        )
                        && same_peers(
                            self.resolve_peers(class.relationships_from_other()),
                            other.resolve_peers(theirs.relationships_from_other()),
                        )
                })
            })
    }
}

impl Eq for Store {}

fn same_peers(mut ours: Vec<(&str, RelationshipType)>, mut theirs: Vec<(&str, RelationshipType)>) -> bool {
    ours.sort_by(|a, b| a.0.cmp(b.0));
    theirs.sort_by(|a, b| a.0.cmp(b.0));
    ours == theirs
}

impl fmt::Display for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, class) in self.classes.values().enumerate() {
            if idx > 0 {
                writeln!(f)?;
            }
            self.write_class(f, class)?;
        }
        Ok(())
    }
}
