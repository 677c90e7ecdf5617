//! JSON persistence for class diagrams.
//!
//! A saved diagram is a single JSON document listing every class with its
//! members, followed by every relationship once, peers named by class name:
//!
//! ```json
//! {
//!   "classes": [
//!     { "name": "Car",
//!       "fields": [{ "type": "int", "name": "speed", "access": "private" }],
//!       "methods": [{ "return_type": "void", "name": "drive", "access": "public",
//!                     "params": [{ "type": "int", "name": "km" }] }] }
//!   ],
//!   "relationships": [{ "from": "Car", "to": "Wheel", "kind": "composition" }]
//! }
//! ```
//!
//! Loading rebuilds the [`Store`] through its public operations only, so a
//! document that breaks a model invariant (a duplicate class, a relationship
//! to an unknown class, two relationships between the same pair) is rejected
//! as a whole.

use std::{
    fs,
    io::{self, Write as _},
    path::{Path, PathBuf},
};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use classweave_core::{Access, ModelError, Parameter, RelationshipType, Store};

/// Errors raised while saving or loading a diagram.
#[derive(Debug, Error)]
pub enum PersistError {
    #[error("I/O error on {path}: {source}")]
    Io { path: PathBuf, source: io::Error },

    #[error("malformed diagram document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("inconsistent diagram document: {0}")]
    Inconsistent(String),

    #[error("invalid diagram document: {0}")]
    Model(#[from] ModelError),
}

// =========================================================================
// Document records
// =========================================================================

#[derive(Debug, Serialize, Deserialize)]
struct DiagramRecord {
    #[serde(default)]
    classes: Vec<ClassRecord>,
    #[serde(default)]
    relationships: Vec<RelationshipRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ClassRecord {
    name: String,
    #[serde(default)]
    fields: Vec<FieldRecord>,
    #[serde(default)]
    methods: Vec<MethodRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FieldRecord {
    #[serde(rename = "type")]
    ty: String,
    name: String,
    #[serde(default)]
    access: Access,
}

#[derive(Debug, Serialize, Deserialize)]
struct MethodRecord {
    return_type: String,
    name: String,
    #[serde(default)]
    access: Access,
    #[serde(default)]
    params: Vec<ParamRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ParamRecord {
    #[serde(rename = "type")]
    ty: String,
    name: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct RelationshipRecord {
    from: String,
    to: String,
    kind: RelationshipType,
}

impl DiagramRecord {
    fn capture(store: &Store) -> Self {
        let classes = store
            .classes()
            .map(|class| ClassRecord {
                name: class.name().to_string(),
                fields: class
                    .fields()
                    .map(|field| FieldRecord {
                        ty: field.ty().to_string(),
                        name: field.name().to_string(),
                        access: field.access(),
                    })
                    .collect(),
                methods: class
                    .methods()
                    .map(|method| MethodRecord {
                        return_type: method.return_type().to_string(),
                        name: method.name().to_string(),
                        access: method.access(),
                        params: method
                            .params()
                            .iter()
                            .map(|param| ParamRecord {
                                ty: param.ty().to_string(),
                                name: param.name().to_string(),
                            })
                            .collect(),
                    })
                    .collect(),
            })
            .collect();

        let relationships = store
            .relationships()
            .into_iter()
            .map(|(from, to, kind)| RelationshipRecord {
                from: from.to_string(),
                to: to.to_string(),
                kind,
            })
            .collect();

        Self {
            classes,
            relationships,
        }
    }

    fn rebuild(self) -> Result<Store, PersistError> {
        let mut store = Store::new();

        for class in self.classes {
            if !store.add_class(&class.name)? {
                return Err(inconsistent(format!("duplicate class `{}`", class.name)));
            }
            for field in class.fields {
                if !store.add_field(&class.name, &field.ty, &field.name, field.access)? {
                    return Err(inconsistent(format!(
                        "duplicate field `{}` in class `{}`",
                        field.name, class.name
                    )));
                }
            }
            for method in class.methods {
                let params = method
                    .params
                    .into_iter()
                    .map(|param| Parameter::new(param.ty, param.name))
                    .collect::<Result<Vec<_>, _>>()?;
                if !store.add_method(
                    &class.name,
                    &method.return_type,
                    &method.name,
                    params,
                    method.access,
                )? {
                    return Err(inconsistent(format!(
                        "method `{}` in class `{}` duplicates a signature or a parameter name",
                        method.name, class.name
                    )));
                }
            }
        }

        for rel in self.relationships {
            if !store.add_relationship(&rel.from, &rel.to, rel.kind)? {
                return Err(inconsistent(format!(
                    "relationship {} -> {} names an unknown class or a pair that is already related",
                    rel.from, rel.to
                )));
            }
        }

        Ok(store)
    }
}

fn inconsistent(message: String) -> PersistError {
    PersistError::Inconsistent(message)
}

// =========================================================================
// Public API
// =========================================================================

/// Serializes `store` to a JSON document.
///
/// # Arguments
///
/// * `store` - The diagram to serialize.
/// * `pretty` - Whether to indent the output.
///
/// # Errors
///
/// Returns [`PersistError::Json`] if serialization fails.
pub fn to_json(store: &Store, pretty: bool) -> Result<String, PersistError> {
    let record = DiagramRecord::capture(store);
    let json = if pretty {
        serde_json::to_string_pretty(&record)?
    } else {
        serde_json::to_string(&record)?
    };
    Ok(json)
}

/// Builds a store from a JSON document.
///
/// # Examples
///
/// ```
/// use classweave::persist::{from_json, to_json};
/// use classweave::Store;
///
/// let mut store = Store::new();
/// store.add_class("Car").unwrap();
///
/// let json = to_json(&store, false).unwrap();
/// assert_eq!(from_json(&json).unwrap(), store);
/// ```
///
/// # Errors
///
/// Returns [`PersistError::Json`] for malformed documents,
/// [`PersistError::Model`] for invalid names or self relationships, and
/// [`PersistError::Inconsistent`] for documents that break uniqueness or
/// reference unknown classes.
pub fn from_json(json: &str) -> Result<Store, PersistError> {
    let record: DiagramRecord = serde_json::from_str(json)?;
    debug!(
        classes = record.classes.len(),
        relationships = record.relationships.len();
        "Rebuilding diagram from document"
    );
    record.rebuild()
}

/// Writes `store` to `path`.
///
/// The document is written to a temporary file next to `path` which then
/// replaces the target, so an interrupted save never leaves a truncated
/// diagram behind.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be written.
pub fn save(store: &Store, path: &Path, pretty: bool) -> Result<(), PersistError> {
    let json = to_json(store, pretty)?;
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let io_err = |source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    };

    let mut file = tempfile::NamedTempFile::new_in(dir).map_err(io_err)?;
    file.write_all(json.as_bytes()).map_err(io_err)?;
    file.as_file().sync_all().map_err(io_err)?;
    file.persist(path).map_err(|err| io_err(err.error))?;

    info!(path = path.display().to_string(), classes = store.len(); "Diagram saved");
    Ok(())
}

/// Reads a store from the JSON document at `path`.
///
/// # Errors
///
/// Returns [`PersistError::Io`] if the file cannot be read, otherwise the
/// errors of [`from_json`].
pub fn load(path: &Path) -> Result<Store, PersistError> {
    let json = fs::read_to_string(path).map_err(|source| PersistError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let store = from_json(&json)?;
    info!(path = path.display().to_string(), classes = store.len(); "Diagram loaded");
    Ok(store)
}
