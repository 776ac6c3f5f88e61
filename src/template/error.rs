use std::fmt;
use std::path::PathBuf;

/// Template tree error
///
/// Collisions are fatal for the whole render batch and carry the complete
/// list; lookup failures are template-tree configuration defects, not user
/// input errors.
#[derive(Debug)]
pub enum TemplateError {
    /// One or more destination paths already exist; nothing was written
    Collision {
        /// Every colliding destination path
        paths: Vec<PathBuf>,
    },
    /// A named template file resolved to zero or multiple matches
    Lookup {
        /// The requested file name
        name: String,
        /// How many files matched
        matches: usize,
    },
    /// A marker pair could not be located in a template file
    MarkerNotFound {
        /// The marker byte string that was missing
        marker: String,
        /// The template file searched
        file: String,
    },
    /// Filesystem failure while enumerating, reading or writing
    Io {
        /// The path being touched
        path: PathBuf,
        source: std::io::Error,
    },
}

impl fmt::Display for TemplateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemplateError::Collision { paths } => {
                write!(f, "render aborted, {} destination path(s) already exist:", paths.len())?;
                for p in paths {
                    write!(f, "\n  {}", p.display())?;
                }
                Ok(())
            }
            TemplateError::Lookup { name, matches } => {
                if *matches == 0 {
                    write!(f, "template file '{name}' not found in tree")
                } else {
                    write!(f, "template file '{name}' is ambiguous, {matches} matches in tree")
                }
            }
            TemplateError::MarkerNotFound { marker, file } => {
                write!(f, "marker '{marker}' not found in template file '{file}'")
            }
            TemplateError::Io { path, source } => {
                write!(f, "io error at {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for TemplateError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TemplateError::Io { source, .. } => Some(source),
            _ => None,
        }
    }
}
