//! Snapshot capture
//!
//! Builds a fully materialized [`StructuralSnapshot`] from a live
//! connection. Once this returns, later pipeline phases must not depend on
//! the connection still being reachable.

use crate::connection::DatabaseConnection;
use schemascribe_core::{CaptureError, SnapshotFilter, StructuralSnapshot};
use tracing::debug;

/// Capture a filtered structural snapshot of the named schemas
///
/// Every requested schema must exist on the connection; a missing schema
/// fails the whole capture rather than producing a partial snapshot.
pub async fn capture(
    connection: &dyn DatabaseConnection,
    schemas: &[String],
    filter: &SnapshotFilter,
) -> Result<StructuralSnapshot, CaptureError> {
    let known = connection.list_schemas().await?;

    for schema in schemas {
        if !known.contains(schema) {
            return Err(CaptureError::SchemaNotFound(schema.clone()));
        }
    }

    let mut per_schema = Vec::with_capacity(schemas.len());
    for schema in schemas {
        debug!(schema = %schema, "capturing schema objects");
        per_schema.push(connection.schema_objects(schema, filter).await?);
    }

    let snapshot = StructuralSnapshot::assemble(schemas.to_vec(), filter, per_schema);
    debug!(
        objects = snapshot.object_count(),
        schemas = schemas.len(),
        "snapshot captured"
    );
    Ok(snapshot)
}
