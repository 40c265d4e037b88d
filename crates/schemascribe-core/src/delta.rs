//! Structural delta operations

use crate::model::{
    Column, ForeignKey, Index, ObjectKind, QualifiedName, Sequence, Table, UniqueConstraint, View,
};
use serde::{Deserialize, Serialize};

/// A single typed change operation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum ChangeOp {
    DropForeignKey { name: QualifiedName, table: QualifiedName },
    DropView { name: QualifiedName },
    DropIndex { name: QualifiedName, table: QualifiedName },
    DropUniqueConstraint { name: QualifiedName, table: QualifiedName },
    DropColumn { table: QualifiedName, column: String },
    DropTable { name: QualifiedName },
    DropSequence { name: QualifiedName },
    CreateTable { table: Table },
    CreateSequence { sequence: Sequence },
    AddColumn { table: QualifiedName, column: Column },
    AlterColumn { table: QualifiedName, from: Column, to: Column },
    CreateIndex { index: Index },
    AddUniqueConstraint { constraint: UniqueConstraint },
    AddForeignKey { foreign_key: ForeignKey },
    CreateView { view: View },
}

impl ChangeOp {
    /// Dependency phase of the operation
    ///
    /// The comparison engine sorts by this value: drops run in reverse
    /// dependency order, then creations in forward dependency order, so a
    /// referenced object always exists before anything referencing it.
    pub fn phase(&self) -> u8 {
        match self {
            Self::DropForeignKey { .. } => 0,
            Self::DropView { .. } => 1,
            Self::DropIndex { .. } => 2,
            Self::DropUniqueConstraint { .. } => 3,
            Self::DropColumn { .. } => 4,
            Self::DropTable { .. } => 5,
            Self::DropSequence { .. } => 6,
            Self::CreateTable { .. } => 7,
            Self::CreateSequence { .. } => 8,
            Self::AddColumn { .. } | Self::AlterColumn { .. } => 9,
            Self::CreateIndex { .. } => 10,
            Self::AddUniqueConstraint { .. } => 11,
            Self::AddForeignKey { .. } => 12,
            Self::CreateView { .. } => 13,
        }
    }

    /// Category of the object the operation touches
    pub fn kind(&self) -> ObjectKind {
        match self {
            Self::DropForeignKey { .. } | Self::AddForeignKey { .. } => ObjectKind::ForeignKey,
            Self::DropView { .. } | Self::CreateView { .. } => ObjectKind::View,
            Self::DropIndex { .. } | Self::CreateIndex { .. } => ObjectKind::Index,
            Self::DropUniqueConstraint { .. } | Self::AddUniqueConstraint { .. } => {
                ObjectKind::UniqueConstraint
            }
            Self::DropColumn { .. }
            | Self::DropTable { .. }
            | Self::CreateTable { .. }
            | Self::AddColumn { .. }
            | Self::AlterColumn { .. } => ObjectKind::Table,
            Self::DropSequence { .. } | Self::CreateSequence { .. } => ObjectKind::Sequence,
        }
    }

    /// The top-level object the operation anchors to
    ///
    /// Column-level operations anchor to their table; this is the grouping
    /// boundary for change sets.
    pub fn anchor(&self) -> QualifiedName {
        match self {
            Self::DropForeignKey { name, .. } => name.clone(),
            Self::DropView { name } => name.clone(),
            Self::DropIndex { name, .. } => name.clone(),
            Self::DropUniqueConstraint { name, .. } => name.clone(),
            Self::DropColumn { table, .. } => table.clone(),
            Self::DropTable { name } => name.clone(),
            Self::DropSequence { name } => name.clone(),
            Self::CreateTable { table } => table.name.clone(),
            Self::CreateSequence { sequence } => sequence.name.clone(),
            Self::AddColumn { table, .. } => table.clone(),
            Self::AlterColumn { table, .. } => table.clone(),
            Self::CreateIndex { index } => index.name.clone(),
            Self::AddUniqueConstraint { constraint } => constraint.name.clone(),
            Self::AddForeignKey { foreign_key } => foreign_key.name.clone(),
            Self::CreateView { view } => view.name.clone(),
        }
    }

    /// Whether this operation creates an object (as opposed to dropping or
    /// altering one)
    pub fn is_create(&self) -> bool {
        matches!(
            self,
            Self::CreateTable { .. }
                | Self::CreateSequence { .. }
                | Self::CreateIndex { .. }
                | Self::AddUniqueConstraint { .. }
                | Self::AddForeignKey { .. }
                | Self::CreateView { .. }
        )
    }
}

/// An ordered, dependency-safe sequence of change operations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StructuralDelta {
    ops: Vec<ChangeOp>,
}

impl StructuralDelta {
    /// Wrap an already-ordered operation sequence
    pub fn new(ops: Vec<ChangeOp>) -> Self {
        Self { ops }
    }

    /// Operations in emission order
    pub fn ops(&self) -> &[ChangeOp] {
        &self.ops
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
