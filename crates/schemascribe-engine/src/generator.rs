//! Changelog generation orchestration
//!
//! The externally invoked entry point: validates arguments, scopes the
//! connection's quoting mode, then runs capture, comparison, and rendering
//! in order. The quoting mode is restored on every exit path through a
//! drop guard, so no failure in any phase can leak the override.

use crate::diff::compare;
use schemascribe_catalog::{capture, DatabaseConnection, QuotingGuard};
use schemascribe_changelog::{
    render, ChangeLogMetadata, ChangelogFormat, OutputTarget,
};
use schemascribe_core::{
    CaptureError, CompareControl, ComparisonError, QuotingMode, RenderError, SnapshotFilter,
    StructuralSnapshot, ValidationError,
};
use std::io::Write;
use tracing::{info, warn};

/// One-line advisory shown when generating script-format changelogs
pub const SPLIT_STATEMENTS_ADVISORY: &str = "When generating SQL-format changelogs, decide whether batched statements should be split \
     (splitStatements:true is the default behavior) or not (splitStatements:false).";

/// Arguments for one generation run
pub struct GenerateArgs<'a> {
    /// Reference database to snapshot
    pub reference: &'a dyn DatabaseConnection,

    /// Changelog file path; format inferred from its extension
    pub changelog_path: Option<String>,

    /// Explicit output stream, used when no path is given
    pub output: Option<Box<dyn Write + Send>>,

    /// Change-set author
    pub author: Option<String>,

    /// Change-set context
    pub context: Option<String>,

    /// Object categories to capture; absent means all
    pub snapshot_types: Option<SnapshotFilter>,

    /// Schema scope and comparison rules
    pub compare_control: CompareControl,

    /// User-facing sink called with each advisory as soon as it is issued,
    /// before any phase runs, so advisories survive later phase failures
    pub advisory_sink: Option<Box<dyn FnMut(&str) + Send + 'a>>,
}

/// Outcome of a successful generation run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Format the changelog was written in
    pub format: ChangelogFormat,

    /// Number of change sets emitted
    pub change_sets: usize,

    /// Advisory messages issued during the run, at most one per run
    pub advisories: Vec<String>,
}

/// Any failure surfaced by a generation run
///
/// Phase failures pass through unmodified; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum GenerateError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Capture(#[from] CaptureError),

    #[error(transparent)]
    Comparison(#[from] ComparisonError),

    #[error(transparent)]
    Render(#[from] RenderError),
}

fn trim_to_none(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

/// Generate a changelog that recreates the reference database's structure
///
/// Captures the reference snapshot, compares it against an empty baseline
/// so every object becomes a creation, and renders the result to the
/// resolved target. Falls back to standard output when neither a path nor
/// a stream is given.
pub async fn generate(args: GenerateArgs<'_>) -> Result<GenerateSummary, GenerateError> {
    // Validate
    let author = trim_to_none(args.author);
    let context = trim_to_none(args.context);
    let changelog_path = trim_to_none(args.changelog_path);

    if args.compare_control.reference_schemas.is_empty() {
        return Err(ValidationError::EmptySchemaScope.into());
    }

    let (target, source_path) = match (changelog_path, args.output) {
        (Some(path), _) => {
            let target = OutputTarget::file(&path);
            (target, path)
        }
        (None, Some(writer)) => (OutputTarget::stream(writer), String::new()),
        (None, None) => (
            OutputTarget::stream(Box::new(std::io::stdout())),
            String::new(),
        ),
    };
    let format = target.format();

    // AdviseIfNeeded
    let mut advisory_sink = args.advisory_sink;
    let mut advisories = Vec::new();
    if format == ChangelogFormat::Sql {
        info!("{}", SPLIT_STATEMENTS_ADVISORY);
        if let Some(sink) = advisory_sink.as_mut() {
            sink(SPLIT_STATEMENTS_ADVISORY);
        }
        advisories.push(SPLIT_STATEMENTS_ADVISORY.to_string());
    }

    for warning in args.reference.drain_dialect_warnings() {
        warn!(connection = args.reference.name(), "{}", warning);
    }

    // Quoting override lasts for the remaining phases; the guard restores
    // the saved mode even when a phase returns early with an error.
    let _quoting = QuotingGuard::override_with(args.reference, QuotingMode::QuoteAll);

    let filter = args.snapshot_types.unwrap_or_default();
    let snapshot = capture(
        args.reference,
        &args.compare_control.reference_schemas,
        &filter,
    )
    .await?;

    let delta = compare(
        &snapshot,
        &StructuralSnapshot::empty(),
        &args.compare_control.rules,
    )?;

    let metadata = ChangeLogMetadata {
        author,
        context,
        source_path,
        quoting: QuotingMode::QuoteAll,
    };
    let result = render(&delta, &metadata, target)?;

    info!(
        change_sets = result.change_sets,
        bytes = result.bytes_written,
        "changelog generated"
    );

    Ok(GenerateSummary {
        format: result.format,
        change_sets: result.change_sets,
        advisories,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trimming() {
        assert_eq!(trim_to_none(None), None);
        assert_eq!(trim_to_none(Some("  ".to_string())), None);
        assert_eq!(
            trim_to_none(Some(" alice ".to_string())),
            Some("alice".to_string())
        );
    }
}
