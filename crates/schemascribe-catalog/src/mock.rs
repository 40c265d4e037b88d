//! Mock reference connection
//!
//! Serves predefined schema objects without touching a real database.
//! Used by unit tests, the failure-injection tests in the engine crate,
//! and fixture-driven CLI runs.

use crate::connection::DatabaseConnection;
use schemascribe_core::{
    CaptureError, ObjectKind, QuotingMode, SchemaObjects, SnapshotFilter,
};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::sync::Mutex;

/// On-disk fixture format for [`MockConnection::from_fixture_json`]
#[derive(Debug, Deserialize)]
struct Fixture {
    schemas: BTreeMap<String, SchemaObjects>,
}

/// Mock connection backed by in-memory schema objects
///
/// Supports scripted capture failures so callers can exercise error paths
/// deterministically.
pub struct MockConnection {
    schemas: BTreeMap<String, SchemaObjects>,
    quoting: Mutex<QuotingMode>,
    dialect_warnings: Mutex<Vec<String>>,
    capture_failure: Option<String>,
    enumeration_failure: Option<(String, String)>,
}

impl MockConnection {
    /// Create a mock with no schemas
    pub fn new() -> Self {
        Self {
            schemas: BTreeMap::new(),
            quoting: Mutex::new(QuotingMode::Legacy),
            dialect_warnings: Mutex::new(Vec::new()),
            capture_failure: None,
            enumeration_failure: None,
        }
    }

    /// Add a schema with its objects
    pub fn with_schema(mut self, name: impl Into<String>, objects: SchemaObjects) -> Self {
        self.schemas.insert(name.into(), objects);
        self
    }

    /// Start the session with a given quoting mode
    pub fn with_quoting_mode(self, mode: QuotingMode) -> Self {
        *self.quoting.lock().unwrap() = mode;
        self
    }

    /// Record a dialect warning to be drained before capture
    pub fn with_dialect_warning(self, warning: impl Into<String>) -> Self {
        self.dialect_warnings.lock().unwrap().push(warning.into());
        self
    }

    /// Make every capture call fail with a connection error
    pub fn with_capture_failure(mut self, reason: impl Into<String>) -> Self {
        self.capture_failure = Some(reason.into());
        self
    }

    /// Make object enumeration fail for one schema only
    pub fn with_enumeration_failure(
        mut self,
        schema: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        self.enumeration_failure = Some((schema.into(), reason.into()));
        self
    }

    /// Build a mock from a JSON fixture
    ///
    /// Expected shape: `{"schemas": {"public": {"tables": [...], ...}}}`.
    pub fn from_fixture_json(json: &str) -> Result<Self, CaptureError> {
        let fixture: Fixture = serde_json::from_str(json)
            .map_err(|e| CaptureError::ConnectionFailed(format!("bad fixture: {}", e)))?;
        Ok(Self {
            schemas: fixture.schemas,
            quoting: Mutex::new(QuotingMode::Legacy),
            dialect_warnings: Mutex::new(Vec::new()),
            capture_failure: None,
            enumeration_failure: None,
        })
    }

    fn check_failure(&self) -> Result<(), CaptureError> {
        match &self.capture_failure {
            Some(reason) => Err(CaptureError::ConnectionFailed(reason.clone())),
            None => Ok(()),
        }
    }
}

impl Default for MockConnection {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl DatabaseConnection for MockConnection {
    fn name(&self) -> &'static str {
        "Mock"
    }

    fn quoting_mode(&self) -> QuotingMode {
        *self.quoting.lock().unwrap()
    }

    fn set_quoting_mode(&self, mode: QuotingMode) {
        *self.quoting.lock().unwrap() = mode;
    }

    fn drain_dialect_warnings(&self) -> Vec<String> {
        std::mem::take(&mut *self.dialect_warnings.lock().unwrap())
    }

    async fn list_schemas(&self) -> Result<Vec<String>, CaptureError> {
        self.check_failure()?;
        Ok(self.schemas.keys().cloned().collect())
    }

    async fn schema_objects(
        &self,
        schema: &str,
        filter: &SnapshotFilter,
    ) -> Result<SchemaObjects, CaptureError> {
        self.check_failure()?;

        if let Some((failing, reason)) = &self.enumeration_failure {
            if failing == schema {
                return Err(CaptureError::EnumerationFailed {
                    schema: schema.to_string(),
                    reason: reason.clone(),
                });
            }
        }

        let objects = self
            .schemas
            .get(schema)
            .ok_or_else(|| CaptureError::SchemaNotFound(schema.to_string()))?;

        let mut filtered = SchemaObjects::default();
        if filter.includes(ObjectKind::Table) {
            filtered.tables = objects.tables.clone();
        }
        if filter.includes(ObjectKind::Sequence) {
            filtered.sequences = objects.sequences.clone();
        }
        if filter.includes(ObjectKind::Index) {
            filtered.indexes = objects.indexes.clone();
        }
        if filter.includes(ObjectKind::UniqueConstraint) {
            filtered.unique_constraints = objects.unique_constraints.clone();
        }
        if filter.includes(ObjectKind::ForeignKey) {
            filtered.foreign_keys = objects.foreign_keys.clone();
        }
        if filter.includes(ObjectKind::View) {
            filtered.views = objects.views.clone();
        }
        Ok(filtered)
    }
}
