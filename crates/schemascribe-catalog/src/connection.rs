//! Reference database connection boundary

use schemascribe_core::{CaptureError, QuotingMode, SchemaObjects, SnapshotFilter};

/// Trait for connections that can enumerate structural metadata
///
/// Implementations expose read-only introspection scoped to named schemas,
/// a session-scoped quoting mode, and any dialect warnings accumulated
/// while opening the connection. Quoting accessors are synchronous session
/// state so a scope guard can restore them unconditionally.
#[async_trait::async_trait]
pub trait DatabaseConnection: Send + Sync {
    /// Connection name (e.g. "Mock", "PostgreSQL")
    fn name(&self) -> &'static str;

    /// Current identifier quoting mode
    fn quoting_mode(&self) -> QuotingMode;

    /// Change the identifier quoting mode for this session
    fn set_quoting_mode(&self, mode: QuotingMode);

    /// Take any unsupported-feature warnings for this connection's dialect
    ///
    /// Consumed once, before capture; subsequent calls return nothing.
    fn drain_dialect_warnings(&self) -> Vec<String>;

    /// Enumerate the schema names visible to this connection
    async fn list_schemas(&self) -> Result<Vec<String>, CaptureError>;

    /// Enumerate the objects of one schema, restricted by the filter
    async fn schema_objects(
        &self,
        schema: &str,
        filter: &SnapshotFilter,
    ) -> Result<SchemaObjects, CaptureError>;
}

/// Scoped override of a connection's quoting mode
///
/// Saves the current mode on construction, applies the override, and
/// restores the saved mode on drop. Restoration runs on every exit path,
/// panics included.
pub struct QuotingGuard<'a> {
    connection: &'a dyn DatabaseConnection,
    original: QuotingMode,
}

impl<'a> QuotingGuard<'a> {
    /// Apply `mode` to the connection until the guard is dropped
    pub fn override_with(connection: &'a dyn DatabaseConnection, mode: QuotingMode) -> Self {
        let original = connection.quoting_mode();
        connection.set_quoting_mode(mode);
        Self {
            connection,
            original,
        }
    }

    /// The mode in force before the override
    pub fn original(&self) -> QuotingMode {
        self.original
    }
}

impl Drop for QuotingGuard<'_> {
    fn drop(&mut self) {
        self.connection.set_quoting_mode(self.original);
    }
}
