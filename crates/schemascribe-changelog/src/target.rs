//! Output target resolution

use schemascribe_core::RenderError;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Physical changelog formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangelogFormat {
    /// Raw script of literal DDL statements
    Sql,

    /// Structured declarative document
    Json,
}

impl ChangelogFormat {
    /// Infer the format from a file path's extension
    ///
    /// Anything that is not a `.sql` path renders declaratively.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("sql") => Self::Sql,
            _ => Self::Json,
        }
    }
}

/// Where a rendered changelog goes
///
/// Exactly one target is active per generation run.
pub enum OutputTarget {
    /// Named file; format inferred from the extension
    File(PathBuf),

    /// Open writable stream with an optional format hint
    Stream {
        writer: Box<dyn Write + Send>,
        format: Option<ChangelogFormat>,
    },
}

impl OutputTarget {
    /// Target the given file path
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Self::File(path.into())
    }

    /// Target an open stream with no format hint (renders declaratively)
    pub fn stream(writer: Box<dyn Write + Send>) -> Self {
        Self::Stream {
            writer,
            format: None,
        }
    }

    /// Target an open stream with an explicit format
    pub fn stream_with_format(writer: Box<dyn Write + Send>, format: ChangelogFormat) -> Self {
        Self::Stream {
            writer,
            format: Some(format),
        }
    }

    /// The format this target renders in
    pub fn format(&self) -> ChangelogFormat {
        match self {
            Self::File(path) => ChangelogFormat::from_path(path),
            Self::Stream { format, .. } => format.unwrap_or(ChangelogFormat::Json),
        }
    }

    /// Write the rendered bytes, flushing before returning
    ///
    /// Consumes the target: a file is created, written, and closed; a
    /// stream is written through and flushed.
    pub fn write_all(self, bytes: &[u8]) -> Result<(), RenderError> {
        match self {
            Self::File(path) => {
                let mut file = std::fs::File::create(&path)?;
                file.write_all(bytes)?;
                file.flush()?;
                Ok(())
            }
            Self::Stream { mut writer, .. } => {
                writer.write_all(bytes)?;
                writer.flush()?;
                Ok(())
            }
        }
    }
}

impl std::fmt::Debug for OutputTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => f.debug_tuple("File").field(path).finish(),
            Self::Stream { format, .. } => f.debug_struct("Stream").field("format", format).finish(),
        }
    }
}
