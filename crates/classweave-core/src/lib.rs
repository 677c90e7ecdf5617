//! Classweave Core Model
//!
//! This crate provides the class diagram model and the consistency engine
//! that keeps it valid while it is edited. It includes:
//!
//! - **Identifiers**: name validation and opaque class identities ([`identifier`] module)
//! - **Members**: immutable field, parameter and method values ([`field`] and [`method`] modules)
//! - **Classes**: member sets and mirrored relationship maps ([`class::Class`])
//! - **Store**: global name uniqueness, paired relationship updates and
//!   cascading deletes ([`store::Store`])
//!
//! Everything outside the model (command interpreters, persistence) talks to
//! the [`Store`] only.

pub mod access;
pub mod class;
pub mod error;
pub mod field;
pub mod identifier;
pub mod method;
pub mod relationship;
pub mod store;

pub use access::Access;
pub use class::Class;
pub use error::{EntityKind, ModelError};
pub use field::Field;
pub use identifier::{ClassId, IdentifierError, validate_identifier};
pub use method::{Method, Parameter, Signature};
pub use relationship::RelationshipType;
pub use store::Store;
