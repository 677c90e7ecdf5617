//! Configuration types for the Classweave editor.
//!
//! All types implement [`serde::Deserialize`] and every field has a default,
//! so a configuration file only needs to name the settings it changes.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level configuration combining editor and persistence settings.
//! - [`EditorConfig`] - Interactive editor behavior and member defaults.
//! - [`PersistenceConfig`] - How saved diagrams are written.
//!
//! # Example
//!
//! ```
//! # use classweave::config::AppConfig;
//! # use classweave::Access;
//! let config = AppConfig::default();
//! assert_eq!(config.editor().prompt(), "classweave> ");
//! assert_eq!(config.editor().default_field_access().unwrap(), Access::Private);
//! assert!(config.persistence().pretty());
//! ```

use serde::Deserialize;

use classweave_core::{Access, ModelError};

use crate::error::ClassweaveError;

/// Top-level application configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Editor configuration section.
    #[serde(default)]
    editor: EditorConfig,

    /// Persistence configuration section.
    #[serde(default)]
    persistence: PersistenceConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] from its sections.
    ///
    /// # Arguments
    ///
    /// * `editor` - Editor behavior and member defaults.
    /// * `persistence` - Output settings for saved diagrams.
    pub fn new(editor: EditorConfig, persistence: PersistenceConfig) -> Self {
        Self {
            editor,
            persistence,
        }
    }

    /// Returns the editor configuration.
    pub fn editor(&self) -> &EditorConfig {
        &self.editor
    }

    /// Returns the persistence configuration.
    pub fn persistence(&self) -> &PersistenceConfig {
        &self.persistence
    }

    /// Checks the settings that are only parsed on use.
    ///
    /// # Errors
    ///
    /// Returns [`ClassweaveError::Config`] naming the first invalid setting.
    pub fn validate(&self) -> Result<(), ClassweaveError> {
        self.editor
            .default_field_access()
            .map_err(|err| ClassweaveError::Config(format!("editor.default_field_access: {err}")))?;
        self.editor
            .default_method_access()
            .map_err(|err| ClassweaveError::Config(format!("editor.default_method_access: {err}")))?;
        Ok(())
    }
}

/// Interactive editor settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EditorConfig {
    /// Prompt printed before each interactive command.
    prompt: String,

    /// Whether the interactive loop greets the user.
    banner: bool,

    /// Access given to fields added without an explicit modifier.
    default_field_access: String,

    /// Access given to new methods.
    default_method_access: String,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            prompt: "classweave> ".to_string(),
            banner: true,
            default_field_access: Access::Private.to_string(),
            default_method_access: Access::Public.to_string(),
        }
    }
}

impl EditorConfig {
    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    pub fn banner(&self) -> bool {
        self.banner
    }

    /// Returns the parsed default [`Access`] for new fields.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownAccess`] if the configured string is not
    /// an access modifier.
    pub fn default_field_access(&self) -> Result<Access, ModelError> {
        self.default_field_access.parse()
    }

    /// Returns the parsed default [`Access`] for new methods.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::UnknownAccess`] if the configured string is not
    /// an access modifier.
    pub fn default_method_access(&self) -> Result<Access, ModelError> {
        self.default_method_access.parse()
    }
}

/// Settings for saved diagram documents.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PersistenceConfig {
    /// Whether saved documents are indented.
    pretty: bool,
}

impl Default for PersistenceConfig {
    fn default() -> Self {
        Self { pretty: true }
    }
}

impl PersistenceConfig {
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    pub fn pretty(&self) -> bool {
        self.pretty
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").unwrap();
        assert_eq!(config.editor().prompt(), "classweave> ");
        assert!(config.editor().banner());
        assert_eq!(config.editor().default_method_access(), Ok(Access::Public));
        assert!(config.persistence().pretty());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_sections() {
        let config: AppConfig = toml::from_str(
            r#"
            [editor]
            banner = false
            default_field_access = "protected"

            [persistence]
            pretty = false
            "#,
        )
        .unwrap();

        assert!(!config.editor().banner());
        assert_eq!(config.editor().prompt(), "classweave> ");
        assert_eq!(config.editor().default_field_access(), Ok(Access::Protected));
        assert!(!config.persistence().pretty());
    }

    #[test]
    fn test_validate_rejects_unknown_access() {
        let config: AppConfig = toml::from_str(
            r#"
            [editor]
            default_method_access = "friend"
            "#,
        )
        .unwrap();

        let err = config.validate().unwrap_err();
        assert!(matches!(err, ClassweaveError::Config(ref msg) if msg.contains("default_method_access")));
    }
}
