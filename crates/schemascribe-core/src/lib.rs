//! Schemascribe Core
//!
//! Domain model for the diff-to-changelog pipeline: the structural object
//! model, snapshots, comparison rules, quoting policy, configuration, and
//! the error taxonomy shared by every phase.

pub mod compare;
pub mod config;
pub mod delta;
pub mod error;
pub mod model;
pub mod quoting;
pub mod snapshot;

pub use compare::{CompareControl, ComparisonRules};
pub use config::{Config, ConfigError, ConnectionConfig};
pub use delta::{ChangeOp, StructuralDelta};
pub use error::{CaptureError, ComparisonError, RenderError, ValidationError};
pub use model::{
    Column, ColumnType, ForeignKey, Index, ObjectKind, QualifiedName, Sequence, Table,
    UniqueConstraint, View,
};
pub use quoting::QuotingMode;
pub use snapshot::{SchemaObjects, SnapshotFilter, StructuralSnapshot};
