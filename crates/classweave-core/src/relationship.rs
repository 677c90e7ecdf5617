//! Relationship kinds between classes.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// The kind of a directed relationship between two classes.
///
/// The tag carries no behavior; relationships are only compared by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RelationshipType {
    Aggregation,
    Composition,
    Generalization,
    Realization,
}

impl RelationshipType {
    pub const ALL: [RelationshipType; 4] = [
        RelationshipType::Aggregation,
        RelationshipType::Composition,
        RelationshipType::Generalization,
        RelationshipType::Realization,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aggregation => "aggregation",
            Self::Composition => "composition",
            Self::Generalization => "generalization",
            Self::Realization => "realization",
        }
    }
}

impl fmt::Display for RelationshipType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RelationshipType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ModelError::UnknownRelationshipType(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(
            "COMPOSITION".parse::<RelationshipType>(),
            Ok(RelationshipType::Composition)
        );
        assert_eq!(
            "realization".parse::<RelationshipType>(),
            Ok(RelationshipType::Realization)
        );
    }

    #[test]
    fn test_parse_rejects_unknown() {
        assert!(matches!(
            "association".parse::<RelationshipType>(),
            Err(ModelError::UnknownRelationshipType(_))
        ));
    }
}
