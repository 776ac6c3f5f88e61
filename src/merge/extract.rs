//! Declaration-boundary extraction.
//!
//! Extraction is heuristic (regex plus a delimiter scanner, not an AST), so
//! it lives behind the [`DeclarationExtractor`] strategy trait: the merge
//! algorithm never knows which scanner produced its units, and a structured
//! extractor can replace the heuristic without touching the algorithm.

use std::ops::Range;

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::MergeError;

/// One declaration block: identity key, verbatim source text, optional
/// explanatory comment line, and the byte span inside the scanned section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeUnit {
    /// Signature-derived identity (e.g. `fn find_by_id`)
    pub key: String,
    /// Verbatim source text of the block, signature through closing delimiter
    pub text: String,
    /// The `//` comment line immediately above the signature, if any
    pub comment: Option<String>,
    /// Byte span of `text` within the scanned section
    pub span: Range<usize>,
}

/// Strategy for splitting a section of source text into [`MergeUnit`]s.
pub trait DeclarationExtractor {
    fn extract(&self, section: &str) -> Result<Vec<MergeUnit>, MergeError>;
}

static SIGNATURE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?m)^\s*(?:pub(?:\(crate\))?\s+)?(?:async\s+)?(fn|struct|enum|trait|impl)\s+([A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("signature regex")
});

/// Brace-delimited declaration scanner for generated Rust artifacts.
///
/// Tracks string, char, and comment state while balancing braces; a section
/// ending with unbalanced depth aborts the file rather than guessing where
/// the block was meant to close.
pub struct BlockExtractor;

impl DeclarationExtractor for BlockExtractor {
    fn extract(&self, section: &str) -> Result<Vec<MergeUnit>, MergeError> {
        let mut units = Vec::new();
        let mut cursor = 0usize;
        while let Some(caps) = SIGNATURE_RE.captures(&section[cursor..]) {
            let m = caps.get(0).expect("whole match");
            let sig_start = cursor + m.start();
            let key = format!("{} {}", &caps[1], &caps[2]);
            let end = scan_block_end(section, cursor + m.end()).ok_or_else(|| {
                MergeError::Unbalanced {
                    near: section[sig_start..]
                        .lines()
                        .next()
                        .unwrap_or_default()
                        .trim()
                        .to_string(),
                }
            })?;
            units.push(MergeUnit {
                key,
                text: section[sig_start..end].to_string(),
                comment: preceding_comment(section, sig_start),
                span: sig_start..end,
            });
            cursor = end;
        }
        Ok(units)
    }
}

/// Line-oriented scanner for single-line declarative statements (use lines,
/// wire-contract fields, `rpc` stanzas).
pub struct LineExtractor;

static LINE_DECL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*[A-Za-z_][^;{}]*;\s*$").expect("line declaration regex"));

impl DeclarationExtractor for LineExtractor {
    fn extract(&self, section: &str) -> Result<Vec<MergeUnit>, MergeError> {
        let mut units = Vec::new();
        let mut offset = 0usize;
        for line in section.split_inclusive('\n') {
            let trimmed = line.trim();
            if LINE_DECL_RE.is_match(line) && !trimmed.starts_with("//") {
                let start = offset + (line.len() - line.trim_start().len());
                let end = offset + line.trim_end().len();
                units.push(MergeUnit {
                    key: trimmed.to_string(),
                    text: section[start..end].to_string(),
                    comment: preceding_comment(section, start),
                    span: start..end,
                });
            }
            offset += line.len();
        }
        Ok(units)
    }
}

/// Find the end of the block opened after `from`: either a terminating `;`
/// before any `{`, or the byte after the brace that balances the first `{`.
/// Quotes and comments are skipped; `None` means the block never closed.
fn scan_block_end(section: &str, from: usize) -> Option<usize> {
    let bytes = section.as_bytes();
    let mut i = from;
    let mut depth = 0usize;
    let mut opened = false;
    while i < bytes.len() {
        let c = bytes[i] as char;
        match c {
            ';' if !opened => return Some(i + 1),
            '{' => {
                opened = true;
                depth += 1;
                i += 1;
            }
            '}' => {
                depth = depth.checked_sub(1)?;
                i += 1;
                if opened && depth == 0 {
                    return Some(i);
                }
            }
            '"' => i = skip_string(bytes, i)?,
            '\'' => i = skip_char_or_lifetime(bytes, i),
            '/' if i + 1 < bytes.len() && bytes[i + 1] == b'/' => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            '/' if i + 1 < bytes.len() && bytes[i + 1] == b'*' => {
                i += 2;
                while i + 1 < bytes.len() && !(bytes[i] == b'*' && bytes[i + 1] == b'/') {
                    i += 1;
                }
                i = (i + 2).min(bytes.len());
            }
            _ => i += 1,
        }
    }
    None
}

fn skip_string(bytes: &[u8], open: usize) -> Option<usize> {
    let mut i = open + 1;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => i += 2,
            b'"' => return Some(i + 1),
            _ => i += 1,
        }
    }
    // unterminated string: let the caller report unbalanced
    None
}

/// A `'` is a char literal only if it closes within a couple of bytes;
/// otherwise it is a lifetime and consumes just itself.
fn skip_char_or_lifetime(bytes: &[u8], open: usize) -> usize {
    if open + 2 < bytes.len() && bytes[open + 1] == b'\\' {
        if let Some(close) = bytes[open + 2..].iter().take(3).position(|&b| b == b'\'') {
            return open + 3 + close;
        }
    } else if open + 2 < bytes.len() && bytes[open + 2] == b'\'' {
        return open + 3;
    }
    open + 1
}

/// The `//` comment line immediately above `at`, if the line above is one.
fn preceding_comment(section: &str, at: usize) -> Option<String> {
    let before = &section[..at];
    let mut lines = before.lines().rev();
    // `at` points at the start of the signature line; the first rev line is
    // whatever precedes it on that line (usually empty)
    let candidate = lines.find(|l| !l.trim().is_empty())?;
    let trimmed = candidate.trim();
    if trimmed.starts_with("//") {
        Some(trimmed.to_string())
    } else {
        None
    }
}
