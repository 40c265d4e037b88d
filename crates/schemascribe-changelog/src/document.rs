//! Changelog document model
//!
//! Wraps an ordered delta into named, authored change sets with stable
//! identifiers. Identifier derivation is deterministic: a digest of the
//! source path plus the change set's one-based ordinal, so regenerating an
//! unchanged delta reproduces identifiers byte for byte.

use schemascribe_core::{ChangeOp, QualifiedName, QuotingMode, StructuralDelta};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Authorship and traceability metadata for one generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeLogMetadata {
    /// Change-set author; absent when not supplied
    pub author: Option<String>,

    /// Change-set context; absent when not supplied
    pub context: Option<String>,

    /// Logical path of the changelog, used for traceability and
    /// identifier derivation
    pub source_path: String,

    /// Quoting mode in force while rendering identifiers
    pub quoting: QuotingMode,
}

impl ChangeLogMetadata {
    /// Metadata with no author or context
    pub fn for_path(source_path: impl Into<String>) -> Self {
        Self {
            author: None,
            context: None,
            source_path: source_path.into(),
            quoting: QuotingMode::QuoteAll,
        }
    }
}

/// A named, authored unit of one or more change operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeSet {
    /// Stable identifier, unique within the document
    pub id: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,

    /// Logical changelog path this change set belongs to
    pub source_path: String,

    /// Operations, in emission order
    pub operations: Vec<ChangeOp>,
}

/// The rendered changelog artifact
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChangeLogDocument {
    pub change_sets: Vec<ChangeSet>,
}

impl ChangeLogDocument {
    /// Group a delta into change sets
    ///
    /// A new change set starts whenever the anchor object changes, so one
    /// object's definition is never split across change sets while
    /// consecutive column operations on the same table stay together.
    pub fn from_delta(delta: &StructuralDelta, metadata: &ChangeLogMetadata) -> Self {
        let digest = path_digest(&metadata.source_path);
        let mut change_sets: Vec<ChangeSet> = Vec::new();
        let mut current_anchor: Option<QualifiedName> = None;

        for op in delta.ops() {
            let anchor = op.anchor();
            let start_new = current_anchor.as_ref() != Some(&anchor);

            if start_new {
                let ordinal = change_sets.len() + 1;
                change_sets.push(ChangeSet {
                    id: format!("{}-{}", digest, ordinal),
                    author: metadata.author.clone(),
                    context: metadata.context.clone(),
                    source_path: metadata.source_path.clone(),
                    operations: Vec::new(),
                });
                current_anchor = Some(anchor);
            }

            // start_new guarantees a last element
            if let Some(last) = change_sets.last_mut() {
                last.operations.push(op.clone());
            }
        }

        Self { change_sets }
    }

    pub fn len(&self) -> usize {
        self.change_sets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.change_sets.is_empty()
    }
}

/// Eight-hex-character digest of the source path
fn path_digest(path: &str) -> String {
    let digest = Sha256::digest(path.as_bytes());
    hex::encode(&digest[..4])
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemascribe_core::{Column, ColumnType, Index, Table};

    fn sample_delta() -> StructuralDelta {
        StructuralDelta::new(vec![
            ChangeOp::CreateTable {
                table: Table::new(
                    QualifiedName::new("public", "users"),
                    vec![Column::new("id", ColumnType::Int).not_null()],
                ),
            },
            ChangeOp::AddColumn {
                table: QualifiedName::new("public", "orders"),
                column: Column::new("total", ColumnType::Decimal {
                    precision: Some(10),
                    scale: Some(2),
                }),
            },
            ChangeOp::AddColumn {
                table: QualifiedName::new("public", "orders"),
                column: Column::new("placed_at", ColumnType::Timestamp),
            },
            ChangeOp::CreateIndex {
                index: Index {
                    name: QualifiedName::new("public", "idx_users_id"),
                    table: QualifiedName::new("public", "users"),
                    columns: vec!["id".to_string()],
                    unique: false,
                },
            },
        ])
    }

    #[test]
    fn groups_at_anchor_boundaries() {
        let metadata = ChangeLogMetadata::for_path("out.json");
        let document = ChangeLogDocument::from_delta(&sample_delta(), &metadata);

        // table, both orders columns together, index
        assert_eq!(document.len(), 3);
        assert_eq!(document.change_sets[1].operations.len(), 2);
    }

    #[test]
    fn identifiers_are_deterministic() {
        let metadata = ChangeLogMetadata::for_path("out.json");
        let first = ChangeLogDocument::from_delta(&sample_delta(), &metadata);
        let second = ChangeLogDocument::from_delta(&sample_delta(), &metadata);

        let first_ids: Vec<_> = first.change_sets.iter().map(|c| c.id.clone()).collect();
        let second_ids: Vec<_> = second.change_sets.iter().map(|c| c.id.clone()).collect();
        assert_eq!(first_ids, second_ids);
    }

    #[test]
    fn identifiers_unique_within_document() {
        let metadata = ChangeLogMetadata::for_path("out.json");
        let document = ChangeLogDocument::from_delta(&sample_delta(), &metadata);

        let mut ids: Vec<_> = document.change_sets.iter().map(|c| c.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), document.len());
    }

    #[test]
    fn identifiers_depend_on_source_path() {
        let delta = sample_delta();
        let a = ChangeLogDocument::from_delta(&delta, &ChangeLogMetadata::for_path("a.json"));
        let b = ChangeLogDocument::from_delta(&delta, &ChangeLogMetadata::for_path("b.json"));
        assert_ne!(a.change_sets[0].id, b.change_sets[0].id);
    }

    #[test]
    fn metadata_flows_into_change_sets() {
        let metadata = ChangeLogMetadata {
            author: Some("alice".to_string()),
            context: Some("init".to_string()),
            source_path: "out.json".to_string(),
            quoting: QuotingMode::QuoteAll,
        };
        let document = ChangeLogDocument::from_delta(&sample_delta(), &metadata);

        for change_set in &document.change_sets {
            assert_eq!(change_set.author.as_deref(), Some("alice"));
            assert_eq!(change_set.context.as_deref(), Some("init"));
            assert_eq!(change_set.source_path, "out.json");
        }
    }
}
