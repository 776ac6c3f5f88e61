//! Template source back-ends.
//!
//! Filesystem roots and compile-time embedded bundles expose one capability
//! interface so everything downstream of [`super::TemplateTree`] is
//! backend-agnostic. The backend is chosen at construction, never by a flag
//! threaded through the render path.

use std::marker::PhantomData;
use std::path::PathBuf;

use rust_embed::RustEmbed;
use walkdir::WalkDir;

use super::error::TemplateError;

/// Capability interface over a template tree's storage.
pub trait TemplateSource {
    /// Relative paths (`/`-separated) of every file under the source root.
    /// A missing or unreadable root is an error, not an empty tree.
    fn enumerate(&self) -> Result<Vec<String>, TemplateError>;

    /// Read one file by its relative path.
    fn read(&self, rel: &str) -> Result<Vec<u8>, TemplateError>;
}

/// Filesystem-rooted template source
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        DirSource { root: root.into() }
    }
}

impl TemplateSource for DirSource {
    fn enumerate(&self) -> Result<Vec<String>, TemplateError> {
        let mut files = Vec::new();
        for entry in WalkDir::new(&self.root) {
            let entry = entry.map_err(|err| {
                let path = err
                    .path()
                    .map(|p| p.to_path_buf())
                    .unwrap_or_else(|| self.root.clone());
                TemplateError::Io {
                    path,
                    source: err.into_io_error().unwrap_or_else(|| {
                        std::io::Error::new(std::io::ErrorKind::Other, "directory walk failed")
                    }),
                }
            })?;
            if !entry.file_type().is_file() {
                continue;
            }
            if let Ok(rel) = entry.path().strip_prefix(&self.root) {
                files.push(
                    rel.components()
                        .map(|c| c.as_os_str().to_string_lossy())
                        .collect::<Vec<_>>()
                        .join("/"),
                );
            }
        }
        files.sort();
        Ok(files)
    }

    fn read(&self, rel: &str) -> Result<Vec<u8>, TemplateError> {
        let path = self.root.join(rel);
        std::fs::read(&path).map_err(|source| TemplateError::Io { path, source })
    }
}

/// Compile-time embedded template source
///
/// Generic over any `RustEmbed` bundle so the default scaffold and test
/// bundles share one implementation.
pub struct EmbeddedSource<E: RustEmbed> {
    _bundle: PhantomData<E>,
}

impl<E: RustEmbed> EmbeddedSource<E> {
    pub fn new() -> Self {
        EmbeddedSource {
            _bundle: PhantomData,
        }
    }
}

impl<E: RustEmbed> Default for EmbeddedSource<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: RustEmbed> TemplateSource for EmbeddedSource<E> {
    fn enumerate(&self) -> Result<Vec<String>, TemplateError> {
        let mut files: Vec<String> = E::iter().map(|f| f.to_string()).collect();
        files.sort();
        Ok(files)
    }

    fn read(&self, rel: &str) -> Result<Vec<u8>, TemplateError> {
        E::get(rel)
            .map(|f| f.data.into_owned())
            .ok_or_else(|| TemplateError::Io {
                path: PathBuf::from(rel),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "not in embedded bundle"),
            })
    }
}
