//! # Merge Module
//!
//! Safe re-generation. A freshly generated candidate is reconciled against a
//! previously generated (and since hand-edited) file by splicing in only the
//! declarations the candidate introduces. Hand-written edits are never
//! rewritten: merging only ever inserts into the old text, and a result that
//! would come out shorter than the original refuses to write at all.
//!
//! ## Algorithm
//!
//! 1. split old and candidate by the literal section separator; differing
//!    counts are a structural mismatch that aborts the file
//! 2. extract [`MergeUnit`]s per aligned section via the pluggable
//!    [`DeclarationExtractor`]
//! 3. candidate units absent from the old section (by key) are the additions
//! 4. splice additions after the last unit present in both sections,
//!    re-attaching each addition's explanatory comment line
//! 5. back up the old file into a timestamped directory before overwriting
//!
//! Merge errors are file-scoped: a batch keeps processing its remaining files.

pub mod error;
pub mod extract;

pub use error::MergeError;
pub use extract::{BlockExtractor, DeclarationExtractor, LineExtractor, MergeUnit};

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Separator line stamped between independently mergeable sections of a
/// generated artifact.
pub const SECTION_SEPARATOR: &str = "// ==== generated sections: keep this line ====";

/// Outcome of merging one file
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// New declarations were spliced in; the original was backed up first
    Merged {
        /// Number of declarations added
        added: usize,
        /// Backup copy of the pre-merge file
        backup: PathBuf,
    },
    /// Candidate introduced nothing new; it was deleted and the old file is
    /// untouched
    NoOp,
}

/// Merge a candidate against the old text, returning the merged content and
/// the number of added declarations, or `None` when nothing new is present.
pub fn merge_text(
    old: &str,
    candidate: &str,
    separator: &str,
    extractor: &dyn DeclarationExtractor,
) -> Result<Option<(String, usize)>, MergeError> {
    let old_sections: Vec<&str> = old.split(separator).collect();
    let new_sections: Vec<&str> = candidate.split(separator).collect();
    if old_sections.len() != new_sections.len() {
        return Err(MergeError::SeparatorMismatch {
            old: old_sections.len(),
            new: new_sections.len(),
        });
    }

    let mut merged_sections = Vec::with_capacity(old_sections.len());
    let mut added_total = 0usize;
    for (old_section, new_section) in old_sections.iter().zip(&new_sections) {
        match merge_section(old_section, new_section, extractor)? {
            Some((section, added)) => {
                added_total += added;
                merged_sections.push(section);
            }
            None => merged_sections.push((*old_section).to_string()),
        }
    }

    if added_total == 0 {
        return Ok(None);
    }
    let merged = merged_sections.join(separator);
    if merged.len() < old.len() {
        return Err(MergeError::SizeRegression {
            original: old.len(),
            merged: merged.len(),
        });
    }
    if merged.len() == old.len() {
        return Ok(None);
    }
    Ok(Some((merged, added_total)))
}

fn merge_section(
    old: &str,
    new: &str,
    extractor: &dyn DeclarationExtractor,
) -> Result<Option<(String, usize)>, MergeError> {
    let old_units = extractor.extract(old)?;
    let new_units = extractor.extract(new)?;
    let old_keys: HashSet<&str> = old_units.iter().map(|u| u.key.as_str()).collect();

    let additions: Vec<&MergeUnit> = new_units
        .iter()
        .filter(|u| !old_keys.contains(u.key.as_str()))
        .collect();
    if additions.is_empty() {
        return Ok(None);
    }

    // Anchor: last candidate unit that survives in the old section. Splice
    // right after its old-side block; with no common unit, append at the end.
    let insert_at = new_units
        .iter()
        .rev()
        .find(|u| old_keys.contains(u.key.as_str()))
        .and_then(|anchor| old_units.iter().find(|u| u.key == anchor.key))
        .map(|anchor_old| anchor_old.span.end)
        .unwrap_or_else(|| old.trim_end().len());

    let mut inserted = String::new();
    for unit in &additions {
        inserted.push_str("\n\n");
        if let Some(comment) = &unit.comment {
            inserted.push_str(comment);
            inserted.push('\n');
        }
        inserted.push_str(&unit.text);
    }

    let mut merged = String::with_capacity(old.len() + inserted.len());
    merged.push_str(&old[..insert_at]);
    merged.push_str(&inserted);
    merged.push_str(&old[insert_at..]);
    Ok(Some((merged, additions.len())))
}

/// File-level merge driver with backup-before-overwrite discipline.
pub struct MergeEngine {
    base: PathBuf,
    backup_root: PathBuf,
    separator: String,
    extractor: Box<dyn DeclarationExtractor>,
}

impl MergeEngine {
    /// A new engine for files under `base`; backups land in a timestamped
    /// directory beneath `base` mirroring each file's relative path.
    pub fn new(base: impl Into<PathBuf>, extractor: Box<dyn DeclarationExtractor>) -> Self {
        let base = base.into();
        let stamp = chrono::Local::now().format("%Y%m%d%H%M%S");
        let backup_root = base.join(".modelgen_backup").join(stamp.to_string());
        MergeEngine {
            base,
            backup_root,
            separator: SECTION_SEPARATOR.to_string(),
            extractor,
        }
    }

    /// Override the section separator (defaults to [`SECTION_SEPARATOR`]).
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Where this engine's backups are written.
    pub fn backup_root(&self) -> &Path {
        &self.backup_root
    }

    /// Merge one candidate file into `rel` under the engine's base directory.
    ///
    /// On a no-op the candidate is deleted and the old file stays untouched;
    /// on a merge the old file is first copied into the backup directory,
    /// then overwritten in place, and the candidate deleted.
    pub fn merge_file(&self, rel: &Path, candidate: &Path) -> Result<MergeOutcome, MergeError> {
        let old_path = self.base.join(rel);
        let old = read(&old_path)?;
        let new = read(candidate)?;

        let Some((merged, added)) = merge_text(&old, &new, &self.separator, self.extractor.as_ref())?
        else {
            fs::remove_file(candidate).map_err(|source| MergeError::Io {
                path: candidate.to_path_buf(),
                source,
            })?;
            debug!(file = %rel.display(), "merge no-op, candidate dropped");
            return Ok(MergeOutcome::NoOp);
        };

        let backup = self.backup_root.join(rel);
        if let Some(parent) = backup.parent() {
            fs::create_dir_all(parent).map_err(|source| MergeError::Io {
                path: parent.to_path_buf(),
                source,
            })?;
        }
        fs::copy(&old_path, &backup).map_err(|source| MergeError::Io {
            path: backup.clone(),
            source,
        })?;
        fs::write(&old_path, &merged).map_err(|source| MergeError::Io {
            path: old_path.clone(),
            source,
        })?;
        fs::remove_file(candidate).map_err(|source| MergeError::Io {
            path: candidate.to_path_buf(),
            source,
        })?;
        debug!(file = %rel.display(), added, "merged new declarations");
        Ok(MergeOutcome::Merged { added, backup })
    }

    /// Merge a batch of (relative path, candidate path) pairs.
    ///
    /// Errors are collected per file; one failing file never stops the rest.
    pub fn merge_batch(
        &self,
        pairs: &[(PathBuf, PathBuf)],
    ) -> Vec<(PathBuf, Result<MergeOutcome, MergeError>)> {
        pairs
            .iter()
            .map(|(rel, candidate)| (rel.clone(), self.merge_file(rel, candidate)))
            .collect()
    }
}

fn read(path: &Path) -> Result<String, MergeError> {
    fs::read_to_string(path).map_err(|source| MergeError::Io {
        path: path.to_path_buf(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const OLD: &str = "pub struct Order {\n    pub id: i64,\n}\n\n// hand-tuned lookup\npub fn find(id: i64) -> Order {\n    fast_path(id)\n}\n";

    #[test]
    fn test_new_declaration_spliced_after_anchor() {
        let candidate = "pub struct Order {\n    pub id: i64,\n}\n\npub fn find(id: i64) -> Order {\n    todo!()\n}\n\n// deletes one row\npub fn delete(id: i64) {\n    todo!()\n}\n";
        let (merged, added) = merge_text(OLD, candidate, SECTION_SEPARATOR, &BlockExtractor)
            .unwrap()
            .unwrap();
        assert_eq!(added, 1);
        // hand-written body survives byte-for-byte
        assert!(merged.contains("// hand-tuned lookup\npub fn find(id: i64) -> Order {\n    fast_path(id)\n}"));
        // new unit arrives with its comment, after the anchor
        let find_at = merged.find("pub fn find").unwrap();
        let delete_at = merged.find("pub fn delete").unwrap();
        assert!(delete_at > find_at);
        assert!(merged.contains("// deletes one row\npub fn delete"));
        assert!(merged.len() >= OLD.len());
    }

    #[test]
    fn test_no_additions_is_none() {
        let candidate = "pub struct Order {\n    pub id: i64,\n}\n\npub fn find(id: i64) -> Order {\n    todo!()\n}\n";
        assert!(merge_text(OLD, candidate, SECTION_SEPARATOR, &BlockExtractor)
            .unwrap()
            .is_none());
    }

    #[test]
    fn test_separator_count_mismatch_aborts() {
        let candidate = format!("part one\n{SECTION_SEPARATOR}\npart two\n");
        let err = merge_text(OLD, &candidate, SECTION_SEPARATOR, &BlockExtractor).unwrap_err();
        assert!(matches!(err, MergeError::SeparatorMismatch { old: 1, new: 2 }));
    }
}
