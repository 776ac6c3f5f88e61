use std::fmt;
use std::path::PathBuf;

/// Merge error, scoped to a single file
///
/// A merge failure never aborts the surrounding batch; the offending file is
/// skipped and the remaining files keep processing.
#[derive(Debug)]
pub enum MergeError {
    /// Old file and candidate split into different section counts
    SeparatorMismatch {
        /// Sections in the previously generated file
        old: usize,
        /// Sections in the fresh candidate
        new: usize,
    },
    /// The spliced result came out shorter than the original
    ///
    /// Writing it could truncate hand-written code, so the file is refused.
    SizeRegression {
        original: usize,
        merged: usize,
    },
    /// The declaration scanner hit end-of-section with unbalanced delimiters
    ///
    /// Mis-splicing is never preferred over an abort; this usually means a
    /// delimiter inside a string or comment literal confused the heuristic.
    Unbalanced {
        /// The signature line whose block never closed
        near: String,
    },
    /// Filesystem failure while backing up or writing
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for MergeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MergeError::SeparatorMismatch { old, new } => {
                write!(
                    f,
                    "structural mismatch: old file has {old} section(s), candidate has {new}"
                )
            }
            MergeError::SizeRegression { original, merged } => {
                write!(
                    f,
                    "merged output ({merged} bytes) is shorter than the original ({original} bytes); refusing to write"
                )
            }
            MergeError::Unbalanced { near } => {
                write!(f, "unbalanced delimiters while scanning declaration near: {near}")
            }
            MergeError::Io { path, source } => {
                write!(f, "io error at {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for MergeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MergeError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
