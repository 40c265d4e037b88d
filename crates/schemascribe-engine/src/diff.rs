//! Snapshot comparison
//!
//! Computes the ordered delta between two structural snapshots. Matching
//! is by canonical qualified name within each object category; ordering
//! comes from the fixed phase table on [`ChangeOp`], never from incidental
//! collection iteration order.

use schemascribe_core::{
    ChangeOp, ComparisonError, ComparisonRules, ObjectKind, StructuralDelta, StructuralSnapshot,
};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

/// Compare a reference snapshot against a comparison snapshot
///
/// Objects present only in the reference become creations, objects present
/// only in the comparison become drops, and matched objects with differing
/// attributes become alters (column-level for tables, drop-and-recreate
/// for definition-bearing objects). Comparing against
/// [`StructuralSnapshot::empty`] therefore yields a pure creation script.
pub fn compare(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
) -> Result<StructuralDelta, ComparisonError> {
    let compared = compared_kinds(reference, comparison)?;
    let compared: BTreeSet<ObjectKind> = compared
        .into_iter()
        .filter(|k| rules.include_kinds.includes(*k))
        .collect();

    let mut ops: Vec<ChangeOp> = Vec::new();

    if compared.contains(&ObjectKind::Table) {
        diff_tables(reference, comparison, rules, &mut ops);
    }
    if compared.contains(&ObjectKind::Sequence) {
        diff_sequences(reference, comparison, rules, &mut ops);
    }
    if compared.contains(&ObjectKind::Index) {
        diff_indexes(reference, comparison, rules, &mut ops);
    }
    if compared.contains(&ObjectKind::UniqueConstraint) {
        diff_unique_constraints(reference, comparison, rules, &mut ops);
    }
    if compared.contains(&ObjectKind::ForeignKey) {
        diff_foreign_keys(reference, comparison, rules, &mut ops);
    }
    if compared.contains(&ObjectKind::View) {
        diff_views(reference, comparison, rules, &mut ops);
    }

    // Stable sort: the phase table decides cross-category order, the
    // anchor name decides ties, and generation order survives within an
    // anchor (so column operations keep their column order).
    ops.sort_by(|a, b| {
        a.phase()
            .cmp(&b.phase())
            .then_with(|| a.anchor().cmp(&b.anchor()))
    });

    debug!(operations = ops.len(), "delta computed");
    Ok(StructuralDelta::new(ops))
}

/// The category set both snapshots can be compared over
///
/// Captured sets may differ when one side was filtered; that is fine as
/// long as one side covers the other. Two partial captures with disjoint
/// coverage cannot be compared meaningfully.
fn compared_kinds(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
) -> Result<BTreeSet<ObjectKind>, ComparisonError> {
    let ref_kinds = reference.captured_kinds();
    let comp_kinds = comparison.captured_kinds();

    if comp_kinds.is_superset(ref_kinds) {
        Ok(ref_kinds.clone())
    } else if ref_kinds.is_superset(comp_kinds) {
        Ok(comp_kinds.clone())
    } else {
        Err(ComparisonError::IncompatibleCategories {
            reference: ref_kinds.iter().copied().collect(),
            comparison: comp_kinds.iter().copied().collect(),
        })
    }
}

fn by_name<'a, T>(
    items: impl IntoIterator<Item = &'a T>,
    rules: &ComparisonRules,
    name_of: impl Fn(&T) -> &schemascribe_core::QualifiedName,
) -> BTreeMap<String, &'a T> {
    items
        .into_iter()
        .map(|item| {
            let name = name_of(item);
            (
                format!(
                    "{}.{}",
                    rules.canonical(&name.schema),
                    rules.canonical(&name.name)
                ),
                item,
            )
        })
        .collect()
}

fn diff_tables(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
    ops: &mut Vec<ChangeOp>,
) {
    let ref_tables = by_name(reference.tables(), rules, |t| &t.name);
    let comp_tables = by_name(comparison.tables(), rules, |t| &t.name);

    for (key, table) in &ref_tables {
        match comp_tables.get(key) {
            None => ops.push(ChangeOp::CreateTable {
                table: (*table).clone(),
            }),
            Some(other) => {
                // Matched table: diff at column level
                for column in &table.columns {
                    match other
                        .columns
                        .iter()
                        .find(|c| rules.canonical(&c.name) == rules.canonical(&column.name))
                    {
                        None => ops.push(ChangeOp::AddColumn {
                            table: table.name.clone(),
                            column: column.clone(),
                        }),
                        Some(existing) if existing != column => ops.push(ChangeOp::AlterColumn {
                            table: table.name.clone(),
                            from: existing.clone(),
                            to: column.clone(),
                        }),
                        Some(_) => {}
                    }
                }
                for column in &other.columns {
                    let gone = !table
                        .columns
                        .iter()
                        .any(|c| rules.canonical(&c.name) == rules.canonical(&column.name));
                    if gone {
                        ops.push(ChangeOp::DropColumn {
                            table: table.name.clone(),
                            column: column.name.clone(),
                        });
                    }
                }
            }
        }
    }

    for (key, table) in &comp_tables {
        if !ref_tables.contains_key(key) {
            ops.push(ChangeOp::DropTable {
                name: table.name.clone(),
            });
        }
    }
}

fn diff_sequences(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
    ops: &mut Vec<ChangeOp>,
) {
    let ref_seqs = by_name(reference.sequences(), rules, |s| &s.name);
    let comp_seqs = by_name(comparison.sequences(), rules, |s| &s.name);

    for (key, sequence) in &ref_seqs {
        match comp_seqs.get(key) {
            None => ops.push(ChangeOp::CreateSequence {
                sequence: (*sequence).clone(),
            }),
            Some(other) if other != sequence => {
                // No portable ALTER SEQUENCE shape; recreate
                ops.push(ChangeOp::DropSequence {
                    name: sequence.name.clone(),
                });
                ops.push(ChangeOp::CreateSequence {
                    sequence: (*sequence).clone(),
                });
            }
            Some(_) => {}
        }
    }
    for (key, sequence) in &comp_seqs {
        if !ref_seqs.contains_key(key) {
            ops.push(ChangeOp::DropSequence {
                name: sequence.name.clone(),
            });
        }
    }
}

fn diff_indexes(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
    ops: &mut Vec<ChangeOp>,
) {
    let ref_indexes = by_name(reference.indexes(), rules, |i| &i.name);
    let comp_indexes = by_name(comparison.indexes(), rules, |i| &i.name);

    for (key, index) in &ref_indexes {
        match comp_indexes.get(key) {
            None => ops.push(ChangeOp::CreateIndex {
                index: (*index).clone(),
            }),
            Some(other) if other != index => {
                ops.push(ChangeOp::DropIndex {
                    name: index.name.clone(),
                    table: index.table.clone(),
                });
                ops.push(ChangeOp::CreateIndex {
                    index: (*index).clone(),
                });
            }
            Some(_) => {}
        }
    }
    for (key, index) in &comp_indexes {
        if !ref_indexes.contains_key(key) {
            ops.push(ChangeOp::DropIndex {
                name: index.name.clone(),
                table: index.table.clone(),
            });
        }
    }
}

fn diff_unique_constraints(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
    ops: &mut Vec<ChangeOp>,
) {
    let ref_constraints = by_name(reference.unique_constraints(), rules, |c| &c.name);
    let comp_constraints = by_name(comparison.unique_constraints(), rules, |c| &c.name);

    for (key, constraint) in &ref_constraints {
        match comp_constraints.get(key) {
            None => ops.push(ChangeOp::AddUniqueConstraint {
                constraint: (*constraint).clone(),
            }),
            Some(other) if other != constraint => {
                ops.push(ChangeOp::DropUniqueConstraint {
                    name: constraint.name.clone(),
                    table: constraint.table.clone(),
                });
                ops.push(ChangeOp::AddUniqueConstraint {
                    constraint: (*constraint).clone(),
                });
            }
            Some(_) => {}
        }
    }
    for (key, constraint) in &comp_constraints {
        if !ref_constraints.contains_key(key) {
            ops.push(ChangeOp::DropUniqueConstraint {
                name: constraint.name.clone(),
                table: constraint.table.clone(),
            });
        }
    }
}

fn diff_foreign_keys(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
    ops: &mut Vec<ChangeOp>,
) {
    let ref_fks = by_name(reference.foreign_keys(), rules, |f| &f.name);
    let comp_fks = by_name(comparison.foreign_keys(), rules, |f| &f.name);

    for (key, foreign_key) in &ref_fks {
        match comp_fks.get(key) {
            None => ops.push(ChangeOp::AddForeignKey {
                foreign_key: (*foreign_key).clone(),
            }),
            Some(other) if other != foreign_key => {
                ops.push(ChangeOp::DropForeignKey {
                    name: foreign_key.name.clone(),
                    table: foreign_key.table.clone(),
                });
                ops.push(ChangeOp::AddForeignKey {
                    foreign_key: (*foreign_key).clone(),
                });
            }
            Some(_) => {}
        }
    }
    for (key, foreign_key) in &comp_fks {
        if !ref_fks.contains_key(key) {
            ops.push(ChangeOp::DropForeignKey {
                name: foreign_key.name.clone(),
                table: foreign_key.table.clone(),
            });
        }
    }
}

fn diff_views(
    reference: &StructuralSnapshot,
    comparison: &StructuralSnapshot,
    rules: &ComparisonRules,
    ops: &mut Vec<ChangeOp>,
) {
    let ref_views = by_name(reference.views(), rules, |v| &v.name);
    let comp_views = by_name(comparison.views(), rules, |v| &v.name);

    for (key, view) in &ref_views {
        match comp_views.get(key) {
            None => ops.push(ChangeOp::CreateView {
                view: (*view).clone(),
            }),
            Some(other) if other != view => {
                ops.push(ChangeOp::DropView {
                    name: view.name.clone(),
                });
                ops.push(ChangeOp::CreateView {
                    view: (*view).clone(),
                });
            }
            Some(_) => {}
        }
    }
    for (key, view) in &comp_views {
        if !ref_views.contains_key(key) {
            ops.push(ChangeOp::DropView {
                name: view.name.clone(),
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use schemascribe_core::{
        Column, ColumnType, ForeignKey, Index, QualifiedName, SchemaObjects, SnapshotFilter, Table,
    };

    fn snapshot_with(objects: SchemaObjects) -> StructuralSnapshot {
        StructuralSnapshot::assemble(
            vec!["public".to_string()],
            &SnapshotFilter::all(),
            vec![objects],
        )
    }

    fn reference_snapshot() -> StructuralSnapshot {
        snapshot_with(SchemaObjects {
            tables: vec![
                Table::new(
                    QualifiedName::new("public", "users"),
                    vec![
                        Column::new("id", ColumnType::Int).not_null(),
                        Column::new("email", ColumnType::Text),
                    ],
                )
                .with_primary_key(vec!["id".to_string()]),
                Table::new(
                    QualifiedName::new("public", "orders"),
                    vec![
                        Column::new("id", ColumnType::Int).not_null(),
                        Column::new("user_id", ColumnType::Int),
                    ],
                ),
            ],
            indexes: vec![Index {
                name: QualifiedName::new("public", "idx_users_email"),
                table: QualifiedName::new("public", "users"),
                columns: vec!["email".to_string()],
                unique: true,
            }],
            foreign_keys: vec![ForeignKey {
                name: QualifiedName::new("public", "fk_orders_users"),
                table: QualifiedName::new("public", "orders"),
                columns: vec!["user_id".to_string()],
                referenced_table: QualifiedName::new("public", "users"),
                referenced_columns: vec!["id".to_string()],
            }],
            ..Default::default()
        })
    }

    #[test]
    fn empty_baseline_creates_every_object() {
        let reference = reference_snapshot();
        let delta = compare(
            &reference,
            &StructuralSnapshot::empty(),
            &ComparisonRules::default(),
        )
        .unwrap();

        assert_eq!(delta.len(), reference.object_count());
        assert!(delta.ops().iter().all(ChangeOp::is_create));
    }

    #[test]
    fn referenced_objects_created_first() {
        let delta = compare(
            &reference_snapshot(),
            &StructuralSnapshot::empty(),
            &ComparisonRules::default(),
        )
        .unwrap();

        let position = |pred: &dyn Fn(&ChangeOp) -> bool| {
            delta.ops().iter().position(|op| pred(op)).unwrap()
        };

        let users = position(&|op| {
            matches!(op, ChangeOp::CreateTable { table } if table.name.name == "users")
        });
        let index = position(&|op| matches!(op, ChangeOp::CreateIndex { .. }));
        let fk = position(&|op| matches!(op, ChangeOp::AddForeignKey { .. }));

        assert!(users < index);
        assert!(index < fk);
    }

    #[test]
    fn identical_snapshots_yield_empty_delta() {
        let reference = reference_snapshot();
        let delta = compare(&reference, &reference.clone(), &ComparisonRules::default()).unwrap();
        assert!(delta.is_empty());
    }

    #[test]
    fn comparison_only_objects_become_drops() {
        let reference = snapshot_with(SchemaObjects::default());
        let comparison = reference_snapshot();

        let delta = compare(&reference, &comparison, &ComparisonRules::default()).unwrap();

        assert!(delta
            .ops()
            .iter()
            .any(|op| matches!(op, ChangeOp::DropTable { name } if name.name == "users")));
        assert!(delta
            .ops()
            .iter()
            .any(|op| matches!(op, ChangeOp::DropForeignKey { .. })));

        // drops come out in reverse dependency order
        let fk_drop = delta
            .ops()
            .iter()
            .position(|op| matches!(op, ChangeOp::DropForeignKey { .. }))
            .unwrap();
        let table_drop = delta
            .ops()
            .iter()
            .position(|op| matches!(op, ChangeOp::DropTable { name } if name.name == "users"))
            .unwrap();
        assert!(fk_drop < table_drop);
    }

    #[test]
    fn column_differences_become_alters() {
        let reference = snapshot_with(SchemaObjects {
            tables: vec![Table::new(
                QualifiedName::new("public", "users"),
                vec![
                    Column::new("id", ColumnType::BigInt).not_null(),
                    Column::new("created_at", ColumnType::Timestamp),
                ],
            )],
            ..Default::default()
        });
        let comparison = snapshot_with(SchemaObjects {
            tables: vec![Table::new(
                QualifiedName::new("public", "users"),
                vec![
                    Column::new("id", ColumnType::Int).not_null(),
                    Column::new("legacy", ColumnType::Text),
                ],
            )],
            ..Default::default()
        });

        let delta = compare(&reference, &comparison, &ComparisonRules::default()).unwrap();

        assert!(delta.ops().iter().any(|op| matches!(
            op,
            ChangeOp::AlterColumn { to, .. } if to.column_type == ColumnType::BigInt
        )));
        assert!(delta.ops().iter().any(|op| matches!(
            op,
            ChangeOp::AddColumn { column, .. } if column.name == "created_at"
        )));
        assert!(delta.ops().iter().any(|op| matches!(
            op,
            ChangeOp::DropColumn { column, .. } if column == "legacy"
        )));
    }

    #[test]
    fn case_insensitive_matching() {
        let reference = snapshot_with(SchemaObjects {
            tables: vec![Table::new(
                QualifiedName::new("public", "Users"),
                vec![Column::new("id", ColumnType::Int)],
            )],
            ..Default::default()
        });
        let comparison = snapshot_with(SchemaObjects {
            tables: vec![Table::new(
                QualifiedName::new("public", "users"),
                vec![Column::new("id", ColumnType::Int)],
            )],
            ..Default::default()
        });

        let strict = compare(&reference, &comparison, &ComparisonRules::default()).unwrap();
        assert!(!strict.is_empty());

        let lenient = compare(
            &reference,
            &comparison,
            &ComparisonRules {
                case_insensitive_names: true,
                ..Default::default()
            },
        )
        .unwrap();
        assert!(lenient.is_empty());
    }

    #[test]
    fn disjoint_category_sets_are_incompatible() {
        let reference = StructuralSnapshot::assemble(
            vec!["public".to_string()],
            &SnapshotFilter::only([ObjectKind::Table]),
            vec![SchemaObjects::default()],
        );
        let comparison = StructuralSnapshot::assemble(
            vec!["public".to_string()],
            &SnapshotFilter::only([ObjectKind::View, ObjectKind::Index]),
            vec![SchemaObjects::default()],
        );

        let err = compare(&reference, &comparison, &ComparisonRules::default()).unwrap_err();
        assert!(matches!(
            err,
            ComparisonError::IncompatibleCategories { .. }
        ));
    }

    #[test]
    fn filtered_reference_against_full_baseline_is_fine() {
        let reference = StructuralSnapshot::assemble(
            vec!["public".to_string()],
            &SnapshotFilter::only([ObjectKind::Table]),
            vec![SchemaObjects {
                tables: vec![Table::new(
                    QualifiedName::new("public", "users"),
                    vec![Column::new("id", ColumnType::Int)],
                )],
                ..Default::default()
            }],
        );

        let delta = compare(
            &reference,
            &StructuralSnapshot::empty(),
            &ComparisonRules::default(),
        )
        .unwrap();
        assert_eq!(delta.len(), 1);
    }
}
