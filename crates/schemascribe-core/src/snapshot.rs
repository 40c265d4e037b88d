//! Structural snapshots and capture filtering

use crate::model::{
    ForeignKey, Index, ObjectKind, QualifiedName, Sequence, Table, UniqueConstraint, View,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Restricts which object categories a capture includes
///
/// An empty filter means "all known categories".
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SnapshotFilter {
    kinds: BTreeSet<ObjectKind>,
}

impl SnapshotFilter {
    /// Filter that includes every known category
    pub fn all() -> Self {
        Self::default()
    }

    /// Filter restricted to the given categories
    pub fn only(kinds: impl IntoIterator<Item = ObjectKind>) -> Self {
        Self {
            kinds: kinds.into_iter().collect(),
        }
    }

    /// Whether a category passes the filter
    pub fn includes(&self, kind: ObjectKind) -> bool {
        self.kinds.is_empty() || self.kinds.contains(&kind)
    }

    /// The effective category set after applying the filter
    pub fn effective_kinds(&self) -> BTreeSet<ObjectKind> {
        if self.kinds.is_empty() {
            ObjectKind::ALL.into_iter().collect()
        } else {
            self.kinds.clone()
        }
    }
}

/// The objects captured from a single named schema
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaObjects {
    pub tables: Vec<Table>,
    pub sequences: Vec<Sequence>,
    pub indexes: Vec<Index>,
    pub unique_constraints: Vec<UniqueConstraint>,
    pub foreign_keys: Vec<ForeignKey>,
    pub views: Vec<View>,
}

/// Immutable structural model of a database at a point in time
///
/// Built once by snapshot capture and never mutated afterwards. All data is
/// materialized in memory; consumers must not assume the source connection
/// is still live.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralSnapshot {
    /// Schema names in capture order
    schemas: Vec<String>,

    /// Categories the capture actually covered
    captured_kinds: BTreeSet<ObjectKind>,

    tables: Vec<Table>,
    sequences: Vec<Sequence>,
    indexes: Vec<Index>,
    unique_constraints: Vec<UniqueConstraint>,
    foreign_keys: Vec<ForeignKey>,
    views: Vec<View>,
}

impl StructuralSnapshot {
    /// An empty snapshot covering every category
    ///
    /// Comparing against this baseline turns every reference object into a
    /// creation operation.
    pub fn empty() -> Self {
        Self {
            schemas: Vec::new(),
            captured_kinds: ObjectKind::ALL.into_iter().collect(),
            tables: Vec::new(),
            sequences: Vec::new(),
            indexes: Vec::new(),
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
            views: Vec::new(),
        }
    }

    /// Assemble a snapshot from per-schema capture results
    ///
    /// Objects are sorted by qualified name so snapshot content never
    /// depends on enumeration order.
    pub fn assemble(
        schemas: Vec<String>,
        filter: &SnapshotFilter,
        per_schema: Vec<SchemaObjects>,
    ) -> Self {
        let mut snapshot = Self {
            schemas,
            captured_kinds: filter.effective_kinds(),
            tables: Vec::new(),
            sequences: Vec::new(),
            indexes: Vec::new(),
            unique_constraints: Vec::new(),
            foreign_keys: Vec::new(),
            views: Vec::new(),
        };

        for objects in per_schema {
            snapshot.tables.extend(objects.tables);
            snapshot.sequences.extend(objects.sequences);
            snapshot.indexes.extend(objects.indexes);
            snapshot
                .unique_constraints
                .extend(objects.unique_constraints);
            snapshot.foreign_keys.extend(objects.foreign_keys);
            snapshot.views.extend(objects.views);
        }

        snapshot.tables.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot.sequences.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot.indexes.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot
            .unique_constraints
            .sort_by(|a, b| a.name.cmp(&b.name));
        snapshot.foreign_keys.sort_by(|a, b| a.name.cmp(&b.name));
        snapshot.views.sort_by(|a, b| a.name.cmp(&b.name));

        snapshot
    }

    /// Schema names the snapshot covers
    pub fn schemas(&self) -> &[String] {
        &self.schemas
    }

    /// Categories the capture covered
    pub fn captured_kinds(&self) -> &BTreeSet<ObjectKind> {
        &self.captured_kinds
    }

    pub fn tables(&self) -> &[Table] {
        &self.tables
    }

    pub fn sequences(&self) -> &[Sequence] {
        &self.sequences
    }

    pub fn indexes(&self) -> &[Index] {
        &self.indexes
    }

    pub fn unique_constraints(&self) -> &[UniqueConstraint] {
        &self.unique_constraints
    }

    pub fn foreign_keys(&self) -> &[ForeignKey] {
        &self.foreign_keys
    }

    pub fn views(&self) -> &[View] {
        &self.views
    }

    /// Find a table by qualified name
    pub fn find_table(&self, name: &QualifiedName) -> Option<&Table> {
        self.tables.iter().find(|t| &t.name == name)
    }

    /// Total number of captured objects
    ///
    /// Schema names are capture scope, not objects, and are not counted.
    pub fn object_count(&self) -> usize {
        self.tables.len()
            + self.sequences.len()
            + self.indexes.len()
            + self.unique_constraints.len()
            + self.foreign_keys.len()
            + self.views.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Column, ColumnType};

    #[test]
    fn empty_filter_includes_everything() {
        let filter = SnapshotFilter::all();
        for kind in ObjectKind::ALL {
            assert!(filter.includes(kind));
        }
        assert_eq!(filter.effective_kinds().len(), ObjectKind::ALL.len());
    }

    #[test]
    fn restricted_filter() {
        let filter = SnapshotFilter::only([ObjectKind::Table, ObjectKind::Index]);
        assert!(filter.includes(ObjectKind::Table));
        assert!(filter.includes(ObjectKind::Index));
        assert!(!filter.includes(ObjectKind::View));
        assert_eq!(filter.effective_kinds().len(), 2);
    }

    #[test]
    fn assemble_sorts_objects() {
        let objects = SchemaObjects {
            tables: vec![
                Table::new(
                    QualifiedName::new("public", "zebras"),
                    vec![Column::new("id", ColumnType::Int)],
                ),
                Table::new(
                    QualifiedName::new("public", "apes"),
                    vec![Column::new("id", ColumnType::Int)],
                ),
            ],
            ..Default::default()
        };

        let snapshot = StructuralSnapshot::assemble(
            vec!["public".to_string()],
            &SnapshotFilter::all(),
            vec![objects],
        );

        assert_eq!(snapshot.tables()[0].name.name, "apes");
        assert_eq!(snapshot.tables()[1].name.name, "zebras");
        assert_eq!(snapshot.object_count(), 2);
    }

    #[test]
    fn empty_snapshot_has_no_objects() {
        let snapshot = StructuralSnapshot::empty();
        assert_eq!(snapshot.object_count(), 0);
        assert_eq!(snapshot.captured_kinds().len(), ObjectKind::ALL.len());
    }
}
