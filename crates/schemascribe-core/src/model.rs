//! Structural object model
//!
//! Portable representations of database schema objects. These types are the
//! common currency between snapshot capture, comparison, and changelog
//! rendering, so they stay engine-agnostic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Categories of capturable schema objects
///
/// The declaration order here is incidental; dependency ordering between
/// categories lives in the comparison engine's priority table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ObjectKind {
    Table,
    Sequence,
    Index,
    UniqueConstraint,
    ForeignKey,
    View,
}

impl ObjectKind {
    /// All capturable categories
    pub const ALL: [ObjectKind; 6] = [
        ObjectKind::Table,
        ObjectKind::Sequence,
        ObjectKind::Index,
        ObjectKind::UniqueConstraint,
        ObjectKind::ForeignKey,
        ObjectKind::View,
    ];

    /// Stable string identifier for the category
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Table => "table",
            Self::Sequence => "sequence",
            Self::Index => "index",
            Self::UniqueConstraint => "unique_constraint",
            Self::ForeignKey => "foreign_key",
            Self::View => "view",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ObjectKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // accepts plural forms for CLI convenience
        match s.trim().to_lowercase().as_str() {
            "table" | "tables" => Ok(Self::Table),
            "sequence" | "sequences" => Ok(Self::Sequence),
            "index" | "indexes" => Ok(Self::Index),
            "unique_constraint" | "unique_constraints" => Ok(Self::UniqueConstraint),
            "foreign_key" | "foreign_keys" => Ok(Self::ForeignKey),
            "view" | "views" => Ok(Self::View),
            other => Err(format!("unknown object category: {}", other)),
        }
    }
}

/// Schema-qualified object name
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QualifiedName {
    /// Owning schema name
    pub schema: String,

    /// Object name within the schema
    pub name: String,
}

impl QualifiedName {
    /// Create a new qualified name
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.schema, self.name)
    }
}

/// Portable column type representation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ColumnType {
    Bool,
    Int,
    BigInt,
    Float,
    Decimal {
        precision: Option<u16>,
        scale: Option<u16>,
    },
    Varchar {
        length: Option<u32>,
    },
    Text,
    Date,
    Timestamp,
    Json,
    Uuid,
    /// Engine-specific type carried through verbatim
    Other {
        name: String,
    },
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool => write!(f, "BOOLEAN"),
            Self::Int => write!(f, "INTEGER"),
            Self::BigInt => write!(f, "BIGINT"),
            Self::Float => write!(f, "DOUBLE PRECISION"),
            Self::Decimal { precision, scale } => match (precision, scale) {
                (Some(p), Some(s)) => write!(f, "DECIMAL({}, {})", p, s),
                (Some(p), None) => write!(f, "DECIMAL({})", p),
                _ => write!(f, "DECIMAL"),
            },
            Self::Varchar { length } => match length {
                Some(n) => write!(f, "VARCHAR({})", n),
                None => write!(f, "VARCHAR"),
            },
            Self::Text => write!(f, "TEXT"),
            Self::Date => write!(f, "DATE"),
            Self::Timestamp => write!(f, "TIMESTAMP"),
            Self::Json => write!(f, "JSON"),
            Self::Uuid => write!(f, "UUID"),
            Self::Other { name } => write!(f, "{}", name),
        }
    }
}

/// A column in a table or view
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Column {
    /// Column name
    pub name: String,

    /// Column type
    pub column_type: ColumnType,

    /// Whether NULL values are accepted
    pub nullable: bool,

    /// Default expression, verbatim
    pub default: Option<String>,
}

impl Column {
    /// Create a nullable column with no default
    pub fn new(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type,
            nullable: true,
            default: None,
        }
    }

    /// Set nullability
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Set a default expression
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A table definition with its columns and primary key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Qualified table name
    pub name: QualifiedName,

    /// Ordered column list
    pub columns: Vec<Column>,

    /// Primary key column names, in key order
    pub primary_key: Vec<String>,
}

impl Table {
    /// Create a table with no primary key
    pub fn new(name: QualifiedName, columns: Vec<Column>) -> Self {
        Self {
            name,
            columns,
            primary_key: Vec::new(),
        }
    }

    /// Set the primary key columns
    pub fn with_primary_key(mut self, columns: Vec<String>) -> Self {
        self.primary_key = columns;
        self
    }

    /// Find a column by name
    pub fn find_column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

/// A sequence definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sequence {
    /// Qualified sequence name
    pub name: QualifiedName,

    /// Starting value
    pub start: i64,

    /// Increment step
    pub increment: i64,
}

impl Sequence {
    /// Create a sequence starting at 1 with step 1
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            start: 1,
            increment: 1,
        }
    }
}

/// An index definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Index {
    /// Qualified index name
    pub name: QualifiedName,

    /// Table the index covers
    pub table: QualifiedName,

    /// Indexed column names, in index order
    pub columns: Vec<String>,

    /// Whether the index enforces uniqueness
    pub unique: bool,
}

/// A unique constraint definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UniqueConstraint {
    /// Qualified constraint name
    pub name: QualifiedName,

    /// Table the constraint covers
    pub table: QualifiedName,

    /// Constrained column names
    pub columns: Vec<String>,
}

/// A foreign key definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignKey {
    /// Qualified constraint name
    pub name: QualifiedName,

    /// Referencing table
    pub table: QualifiedName,

    /// Referencing column names
    pub columns: Vec<String>,

    /// Referenced table
    pub referenced_table: QualifiedName,

    /// Referenced column names
    pub referenced_columns: Vec<String>,
}

/// A view definition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct View {
    /// Qualified view name
    pub name: QualifiedName,

    /// Defining query, verbatim
    pub definition: String,
}
