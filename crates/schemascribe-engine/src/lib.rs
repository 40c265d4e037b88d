//! Schemascribe engine - Core business logic
//!
//! This crate implements the main pipeline logic:
//! - Snapshot comparison (ordered, dependency-safe deltas)
//! - Changelog generation orchestration

pub mod diff;
pub mod generator;

pub use diff::compare;
pub use generator::{generate, GenerateArgs, GenerateError, GenerateSummary};
pub use schemascribe_changelog::ChangelogFormat;
