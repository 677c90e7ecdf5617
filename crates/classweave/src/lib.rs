//! Classweave - build, edit and persist UML class diagrams.
//!
//! This crate re-exports the diagram model from `classweave-core` and adds
//! what a host application needs around it: JSON persistence
//! ([`persist`]), the application configuration ([`config`]) and a
//! lock-guarded store for concurrent hosts ([`SharedStore`]).
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use classweave::{Access, RelationshipType, Store, persist};
//!
//! let mut store = Store::new();
//! store.add_class("Car").unwrap();
//! store.add_class("Wheel").unwrap();
//! store.add_field("Car", "int", "speed", Access::Private).unwrap();
//! store
//!     .add_relationship("Car", "Wheel", RelationshipType::Composition)
//!     .unwrap();
//!
//! persist::save(&store, Path::new("car.json"), true).expect("Failed to save");
//! let loaded = persist::load(Path::new("car.json")).expect("Failed to load");
//! assert_eq!(loaded, store);
//! ```

pub mod config;
pub mod persist;

mod error;
mod shared;

pub use classweave_core::{
    Access, Class, ClassId, EntityKind, Field, IdentifierError, Method, ModelError, Parameter,
    RelationshipType, Signature, Store, access, class, field, identifier, method, relationship,
    store, validate_identifier,
};

pub use error::ClassweaveError;
pub use shared::SharedStore;
