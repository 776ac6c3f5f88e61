//! The template tree: enumeration, include/exclude narrowing, output-root
//! selection and the all-or-nothing render pass.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::error::TemplateError;
use super::source::TemplateSource;
use super::ReplacementPlan;

/// A source tree plus the active subset that will be rendered.
pub struct TemplateTree {
    source: Box<dyn TemplateSource>,
    all: Vec<String>,
    active: Vec<String>,
    output_root: PathBuf,
}

impl std::fmt::Debug for TemplateTree {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TemplateTree")
            .field("all", &self.all)
            .field("active", &self.active)
            .field("output_root", &self.output_root)
            .finish_non_exhaustive()
    }
}

impl TemplateTree {
    /// Enumerate every file under the source; the active set starts as the
    /// full enumeration and the output root defaults to the current directory.
    /// Enumeration failures (missing or unreadable root) abort the load.
    pub fn load(source: Box<dyn TemplateSource>) -> Result<Self, TemplateError> {
        let all = source.enumerate()?;
        let active = all.clone();
        debug!(files = all.len(), "loaded template tree");
        Ok(TemplateTree {
            source,
            all,
            active,
            output_root: PathBuf::from("."),
        })
    }

    /// Narrow the active set to paths containing one of `dirs` as a directory
    /// segment or named exactly as one of `files`. Matching is structural
    /// path-segment containment, not glob patterns. Empty filters keep the
    /// active set unchanged.
    pub fn restrict_to(&mut self, dirs: &[&str], files: &[&str]) {
        if dirs.is_empty() && files.is_empty() {
            return;
        }
        self.active.retain(|p| matches_filter(p, dirs, files));
    }

    /// Remove paths containing one of `dirs` as a segment or named as one of
    /// `files` from the active set.
    pub fn exclude(&mut self, dirs: &[&str], files: &[&str]) {
        if dirs.is_empty() && files.is_empty() {
            return;
        }
        self.active.retain(|p| !matches_filter(p, dirs, files));
    }

    /// Set the destination root. An empty `path` synthesizes
    /// `<cwd>/<joined-name-parts>_<HHMMSS>` from the fallback parts.
    pub fn set_output_root(&mut self, path: Option<&Path>, fallback_parts: &[&str]) {
        self.output_root = match path {
            Some(p) if !p.as_os_str().is_empty() => p.to_path_buf(),
            _ => {
                let stamp = chrono::Local::now().format("%H%M%S");
                let name = format!("{}_{stamp}", fallback_parts.join("_"));
                std::env::current_dir()
                    .unwrap_or_else(|_| PathBuf::from("."))
                    .join(name)
            }
        };
    }

    pub fn output_root(&self) -> &Path {
        &self.output_root
    }

    /// Relative paths currently scheduled for rendering.
    pub fn active(&self) -> &[String] {
        &self.active
    }

    /// Read a uniquely-named template file for ad-hoc inspection.
    ///
    /// Looks the name up across the full enumeration (not just the active
    /// set); zero or multiple matches is a configuration defect.
    pub fn read_file(&self, name: &str) -> Result<Vec<u8>, TemplateError> {
        let matches: Vec<&String> = self
            .all
            .iter()
            .filter(|p| p.rsplit('/').next() == Some(name))
            .collect();
        if matches.len() != 1 {
            return Err(TemplateError::Lookup {
                name: name.to_string(),
                matches: matches.len(),
            });
        }
        self.source.read(matches[0])
    }

    /// Render every active file into the output root.
    ///
    /// Content passes through the plan first; the same rules then run
    /// independently over each destination path segment, so template file and
    /// directory names may themselves carry placeholder tokens. Files that
    /// are not valid UTF-8 are copied byte for byte, untouched by the plan.
    /// All destination paths are computed up front; if any already exists the
    /// whole render aborts with the complete collision list and zero writes.
    pub fn render(&self, plan: &ReplacementPlan) -> Result<Vec<PathBuf>, TemplateError> {
        let mut jobs: Vec<(&String, PathBuf)> = Vec::with_capacity(self.active.len());
        for rel in &self.active {
            let dest_rel: PathBuf = rel
                .split('/')
                .map(|segment| plan.apply(segment))
                .collect::<Vec<_>>()
                .join("/")
                .into();
            jobs.push((rel, self.output_root.join(dest_rel)));
        }

        let collisions: Vec<PathBuf> = jobs
            .iter()
            .filter(|(_, dest)| dest.exists())
            .map(|(_, dest)| dest.clone())
            .collect();
        if !collisions.is_empty() {
            return Err(TemplateError::Collision { paths: collisions });
        }

        let mut written = Vec::with_capacity(jobs.len());
        for (rel, dest) in jobs {
            let raw = self.source.read(rel)?;
            // binary template files pass through unchanged
            let content: Vec<u8> = match std::str::from_utf8(&raw) {
                Ok(text) => plan.apply(text).into_bytes(),
                Err(_) => raw,
            };
            if let Some(parent) = dest.parent() {
                std::fs::create_dir_all(parent).map_err(|source| TemplateError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
            std::fs::write(&dest, content).map_err(|source| TemplateError::Io {
                path: dest.clone(),
                source,
            })?;
            debug!(src = %rel, dest = %dest.display(), "rendered template file");
            written.push(dest);
        }
        Ok(written)
    }
}

fn matches_filter(path: &str, dirs: &[&str], files: &[&str]) -> bool {
    let mut segments = path.split('/').peekable();
    while let Some(segment) = segments.next() {
        let is_last = segments.peek().is_none();
        if is_last {
            if files.contains(&segment) {
                return true;
            }
        } else if dirs.contains(&segment) {
            return true;
        }
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_filter_segments() {
        assert!(matches_filter("model/stub.rs", &["model"], &[]));
        assert!(!matches_filter("modeling/stub.rs", &["model"], &[]));
        assert!(matches_filter("a/b/stub.rs", &[], &["stub.rs"]));
        assert!(!matches_filter("a/stub.rs/x", &[], &["stub.rs"]));
    }
}
