//! Raw-script rendering
//!
//! Emits change operations as literal data-definition statements. The
//! statement shapes are generic ANSI-style DDL; dialect specialization is
//! a collaborator concern outside this pipeline. Identifier quoting
//! follows the quoting mode in force for the run.

use crate::document::ChangeLogDocument;
use schemascribe_core::{ChangeOp, Column, QualifiedName, QuotingMode};

/// Render a document as a formatted SQL changelog script
pub fn render_script(document: &ChangeLogDocument, quoting: QuotingMode) -> String {
    let mut out = String::new();
    out.push_str("-- schemascribe formatted sql\n");

    for change_set in &document.change_sets {
        out.push('\n');
        out.push_str(&format!("-- changeset id={}", change_set.id));
        if let Some(author) = &change_set.author {
            out.push_str(&format!(" author={}", author));
        }
        if let Some(context) = &change_set.context {
            out.push_str(&format!(" context={}", context));
        }
        out.push('\n');

        for op in &change_set.operations {
            for statement in statements_for(op, quoting) {
                out.push_str(&statement);
                out.push_str(";\n");
            }
        }
    }

    out
}

fn qualified(name: &QualifiedName, quoting: QuotingMode) -> String {
    format!("{}.{}", quoting.quote(&name.schema), quoting.quote(&name.name))
}

fn column_definition(column: &Column, quoting: QuotingMode) -> String {
    let mut def = format!("{} {}", quoting.quote(&column.name), column.column_type);
    if !column.nullable {
        def.push_str(" NOT NULL");
    }
    if let Some(default) = &column.default {
        def.push_str(&format!(" DEFAULT {}", default));
    }
    def
}

fn column_list(columns: &[String], quoting: QuotingMode) -> String {
    columns
        .iter()
        .map(|c| quoting.quote(c))
        .collect::<Vec<_>>()
        .join(", ")
}

/// The literal statements for one operation, in execution order
pub fn statements_for(op: &ChangeOp, quoting: QuotingMode) -> Vec<String> {
    match op {
        ChangeOp::CreateTable { table } => {
            let mut parts: Vec<String> = table
                .columns
                .iter()
                .map(|c| column_definition(c, quoting))
                .collect();
            if !table.primary_key.is_empty() {
                parts.push(format!(
                    "PRIMARY KEY ({})",
                    column_list(&table.primary_key, quoting)
                ));
            }
            vec![format!(
                "CREATE TABLE {} ({})",
                qualified(&table.name, quoting),
                parts.join(", ")
            )]
        }
        ChangeOp::CreateSequence { sequence } => {
            vec![format!(
                "CREATE SEQUENCE {} START WITH {} INCREMENT BY {}",
                qualified(&sequence.name, quoting),
                sequence.start,
                sequence.increment
            )]
        }
        ChangeOp::AddColumn { table, column } => {
            vec![format!(
                "ALTER TABLE {} ADD COLUMN {}",
                qualified(table, quoting),
                column_definition(column, quoting)
            )]
        }
        ChangeOp::AlterColumn { table, from, to } => {
            let table = qualified(table, quoting);
            let column = quoting.quote(&to.name);
            let mut statements = Vec::new();
            if from.column_type != to.column_type {
                statements.push(format!(
                    "ALTER TABLE {} ALTER COLUMN {} TYPE {}",
                    table, column, to.column_type
                ));
            }
            if from.nullable != to.nullable {
                let clause = if to.nullable { "DROP NOT NULL" } else { "SET NOT NULL" };
                statements.push(format!(
                    "ALTER TABLE {} ALTER COLUMN {} {}",
                    table, column, clause
                ));
            }
            if from.default != to.default {
                let clause = match &to.default {
                    Some(default) => format!("SET DEFAULT {}", default),
                    None => "DROP DEFAULT".to_string(),
                };
                statements.push(format!(
                    "ALTER TABLE {} ALTER COLUMN {} {}",
                    table, column, clause
                ));
            }
            statements
        }
        ChangeOp::CreateIndex { index } => {
            let unique = if index.unique { "UNIQUE " } else { "" };
            vec![format!(
                "CREATE {}INDEX {} ON {} ({})",
                unique,
                quoting.quote(&index.name.name),
                qualified(&index.table, quoting),
                column_list(&index.columns, quoting)
            )]
        }
        ChangeOp::AddUniqueConstraint { constraint } => {
            vec![format!(
                "ALTER TABLE {} ADD CONSTRAINT {} UNIQUE ({})",
                qualified(&constraint.table, quoting),
                quoting.quote(&constraint.name.name),
                column_list(&constraint.columns, quoting)
            )]
        }
        ChangeOp::AddForeignKey { foreign_key } => {
            vec![format!(
                "ALTER TABLE {} ADD CONSTRAINT {} FOREIGN KEY ({}) REFERENCES {} ({})",
                qualified(&foreign_key.table, quoting),
                quoting.quote(&foreign_key.name.name),
                column_list(&foreign_key.columns, quoting),
                qualified(&foreign_key.referenced_table, quoting),
                column_list(&foreign_key.referenced_columns, quoting)
            )]
        }
        ChangeOp::CreateView { view } => {
            vec![format!(
                "CREATE VIEW {} AS {}",
                qualified(&view.name, quoting),
                view.definition
            )]
        }
        ChangeOp::DropForeignKey { name, table } => {
            vec![format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                qualified(table, quoting),
                quoting.quote(&name.name)
            )]
        }
        ChangeOp::DropView { name } => {
            vec![format!("DROP VIEW {}", qualified(name, quoting))]
        }
        ChangeOp::DropIndex { name, .. } => {
            vec![format!("DROP INDEX {}", qualified(name, quoting))]
        }
        ChangeOp::DropUniqueConstraint { name, table } => {
            vec![format!(
                "ALTER TABLE {} DROP CONSTRAINT {}",
                qualified(table, quoting),
                quoting.quote(&name.name)
            )]
        }
        ChangeOp::DropColumn { table, column } => {
            vec![format!(
                "ALTER TABLE {} DROP COLUMN {}",
                qualified(table, quoting),
                quoting.quote(column)
            )]
        }
        ChangeOp::DropTable { name } => {
            vec![format!("DROP TABLE {}", qualified(name, quoting))]
        }
        ChangeOp::DropSequence { name } => {
            vec![format!("DROP SEQUENCE {}", qualified(name, quoting))]
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{ChangeLogDocument, ChangeLogMetadata};
    use schemascribe_core::{ColumnType, StructuralDelta, Table};

    #[test]
    fn create_table_statement_quotes_everything() {
        let op = ChangeOp::CreateTable {
            table: Table::new(
                QualifiedName::new("public", "users"),
                vec![
                    Column::new("id", ColumnType::Int).not_null(),
                    Column::new("name", ColumnType::Varchar { length: Some(255) }),
                ],
            )
            .with_primary_key(vec!["id".to_string()]),
        };

        let statements = statements_for(&op, QuotingMode::QuoteAll);
        assert_eq!(
            statements,
            vec![
                "CREATE TABLE \"public\".\"users\" (\"id\" INTEGER NOT NULL, \"name\" VARCHAR(255), PRIMARY KEY (\"id\"))"
            ]
        );
    }

    #[test]
    fn legacy_quoting_leaves_identifiers_bare() {
        let op = ChangeOp::DropTable {
            name: QualifiedName::new("public", "users"),
        };
        assert_eq!(
            statements_for(&op, QuotingMode::Legacy),
            vec!["DROP TABLE public.users"]
        );
    }

    #[test]
    fn alter_column_emits_one_statement_per_difference() {
        let op = ChangeOp::AlterColumn {
            table: QualifiedName::new("public", "users"),
            from: Column::new("age", ColumnType::Int),
            to: Column::new("age", ColumnType::BigInt).not_null(),
        };

        let statements = statements_for(&op, QuotingMode::QuoteAll);
        assert_eq!(statements.len(), 2);
        assert!(statements[0].contains("TYPE BIGINT"));
        assert!(statements[1].contains("SET NOT NULL"));
    }

    #[test]
    fn script_carries_changeset_headers() {
        let delta = StructuralDelta::new(vec![ChangeOp::CreateTable {
            table: Table::new(
                QualifiedName::new("public", "users"),
                vec![Column::new("id", ColumnType::Int)],
            ),
        }]);
        let metadata = ChangeLogMetadata {
            author: Some("alice".to_string()),
            context: Some("init".to_string()),
            source_path: "out.sql".to_string(),
            quoting: QuotingMode::QuoteAll,
        };
        let document = ChangeLogDocument::from_delta(&delta, &metadata);
        let script = render_script(&document, metadata.quoting);

        assert!(script.starts_with("-- schemascribe formatted sql\n"));
        assert!(script.contains("author=alice"));
        assert!(script.contains("context=init"));
        assert!(script.contains("CREATE TABLE \"public\".\"users\""));
        assert!(script.trim_end().ends_with(';'));
    }
}
