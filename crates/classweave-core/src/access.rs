//! Visibility modifiers shared by fields and methods.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// UML visibility of a class member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Access {
    #[default]
    Public,
    Private,
    Protected,
}

impl Access {
    /// All access modifiers, in declaration order.
    pub const ALL: [Access; 3] = [Access::Public, Access::Private, Access::Protected];

    /// Returns the lowercase keyword for this modifier.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Public => "public",
            Self::Private => "private",
            Self::Protected => "protected",
        }
    }

    /// Returns the UML symbol for this modifier (`+`, `-` or `#`).
    pub fn symbol(self) -> char {
        match self {
            Self::Public => '+',
            Self::Private => '-',
            Self::Protected => '#',
        }
    }
}

impl fmt::Display for Access {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Access {
    type Err = ModelError;

    /// Parses a keyword (case-insensitive) or a UML symbol.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "public" | "+" => Ok(Self::Public),
            "private" | "-" => Ok(Self::Private),
            "protected" | "#" => Ok(Self::Protected),
            _ => Err(ModelError::UnknownAccess(s.to_string())),
        }
    }
}
