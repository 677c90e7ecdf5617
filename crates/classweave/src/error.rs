//! Error types for Classweave operations.
//!
//! This module provides the main error type [`ClassweaveError`] which wraps
//! the error conditions of the model, the persistence adapter and the
//! application configuration.

use std::io;

use thiserror::Error;

use classweave_core::ModelError;

use crate::persist::PersistError;

/// The main error type for Classweave operations.
#[derive(Debug, Error)]
pub enum ClassweaveError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error(transparent)]
    Persist(#[from] PersistError),

    #[error("Configuration error: {0}")]
    Config(String),
}
