//! Delta-to-changelog rendering

use crate::document::{ChangeLogDocument, ChangeLogMetadata};
use crate::sql::render_script;
use crate::target::{ChangelogFormat, OutputTarget};
use schemascribe_core::{RenderError, StructuralDelta};
use tracing::debug;

/// Outcome of a successful render
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderResult {
    /// Format the changelog was written in
    pub format: ChangelogFormat,

    /// Number of change sets emitted
    pub change_sets: usize,

    /// Bytes written to the target
    pub bytes_written: usize,
}

/// Render a delta into the target, fully written and flushed on success
///
/// The declarative document serializes the change sets as an ordered list
/// of `{id, author, context, sourcePath, operations}` records; the script
/// format emits literal DDL under per-change-set header comments.
pub fn render(
    delta: &StructuralDelta,
    metadata: &ChangeLogMetadata,
    target: OutputTarget,
) -> Result<RenderResult, RenderError> {
    let format = target.format();
    let document = ChangeLogDocument::from_delta(delta, metadata);

    let bytes = match format {
        ChangelogFormat::Sql => render_script(&document, metadata.quoting).into_bytes(),
        ChangelogFormat::Json => {
            let mut bytes = serde_json::to_vec_pretty(&document)
                .map_err(|e| RenderError::Serialization(e.to_string()))?;
            bytes.push(b'\n');
            bytes
        }
    };

    target.write_all(&bytes)?;
    debug!(
        change_sets = document.len(),
        bytes = bytes.len(),
        "changelog rendered"
    );

    Ok(RenderResult {
        format,
        change_sets: document.len(),
        bytes_written: bytes.len(),
    })
}
