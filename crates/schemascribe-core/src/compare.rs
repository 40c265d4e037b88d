//! Comparison scope and matching rules

use crate::snapshot::SnapshotFilter;
use serde::{Deserialize, Serialize};

/// Rules governing how two snapshots are matched
///
/// Applied symmetrically to both sides of a comparison.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ComparisonRules {
    /// Match object names case-insensitively
    #[serde(default)]
    pub case_insensitive_names: bool,

    /// Categories to include in the comparison; empty means all captured
    #[serde(default)]
    pub include_kinds: SnapshotFilter,
}

impl ComparisonRules {
    /// Canonical form of a name under these rules
    pub fn canonical(&self, name: &str) -> String {
        if self.case_insensitive_names {
            name.to_lowercase()
        } else {
            name.to_string()
        }
    }
}

/// Schema scope plus matching rules for one comparison run
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompareControl {
    /// Reference-side schema names; must be non-empty
    pub reference_schemas: Vec<String>,

    /// Matching rules
    #[serde(default)]
    pub rules: ComparisonRules,
}

impl CompareControl {
    /// Scope a comparison to the given reference schemas with default rules
    pub fn for_schemas(schemas: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            reference_schemas: schemas.into_iter().map(Into::into).collect(),
            rules: ComparisonRules::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_names() {
        let rules = ComparisonRules::default();
        assert_eq!(rules.canonical("Users"), "Users");

        let rules = ComparisonRules {
            case_insensitive_names: true,
            ..Default::default()
        };
        assert_eq!(rules.canonical("Users"), "users");
    }

    #[test]
    fn scoped_control() {
        let control = CompareControl::for_schemas(["public", "audit"]);
        assert_eq!(control.reference_schemas, vec!["public", "audit"]);
    }
}
