//! Changelog rendering
//!
//! Turns an ordered structural delta into a replayable changelog artifact:
//! change sets with deterministic identifiers, rendered either as a raw
//! SQL script or as a structured declarative document.

pub mod document;
pub mod render;
pub mod sql;
pub mod target;

pub use document::{ChangeLogDocument, ChangeLogMetadata, ChangeSet};
pub use render::{render, RenderResult};
pub use target::{ChangelogFormat, OutputTarget};
