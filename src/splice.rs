//! # Marker Splicer
//!
//! Static template files carry begin/end marker pairs around computed
//! regions. Resolving a pair against a file's content yields one
//! [`TemplateField`] that replaces the inclusive marker range with a rendered
//! fragment, or with the empty string, stripping an inapplicable variant's
//! scaffolding entirely. Each marker pair in a tree resolves independently
//! and contributes one rule to the overall [`ReplacementPlan`].

use crate::template::{ReplacementPlan, TemplateError, TemplateField, TemplateTree};

/// A begin/end marker byte-string pair identifying one splice point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerRegion {
    pub start: String,
    pub end: String,
}

impl MarkerRegion {
    pub fn new(start: impl Into<String>, end: impl Into<String>) -> Self {
        MarkerRegion {
            start: start.into(),
            end: end.into(),
        }
    }

    /// Conventional comment-style pair: `// <gen:NAME>` .. `// </gen:NAME>`.
    pub fn named(name: &str) -> Self {
        MarkerRegion {
            start: format!("// <gen:{name}>"),
            end: format!("// </gen:{name}>"),
        }
    }

    /// Locate the first start marker and the first end marker after it.
    ///
    /// Returns the inclusive byte range as a string slice of `content`.
    /// `file` is only used to label the error when a marker is missing.
    pub fn resolve<'a>(&self, content: &'a str, file: &str) -> Result<&'a str, TemplateError> {
        let start = content
            .find(&self.start)
            .ok_or_else(|| TemplateError::MarkerNotFound {
                marker: self.start.clone(),
                file: file.to_string(),
            })?;
        let end_rel = content[start + self.start.len()..]
            .find(&self.end)
            .ok_or_else(|| TemplateError::MarkerNotFound {
                marker: self.end.clone(),
                file: file.to_string(),
            })?;
        let end = start + self.start.len() + end_rel + self.end.len();
        Ok(&content[start..end])
    }

    /// Resolve the region and build the replacement rule filling it with
    /// `fragment` (empty fragment strips the region).
    pub fn splice(
        &self,
        content: &str,
        file: &str,
        fragment: &str,
    ) -> Result<TemplateField, TemplateError> {
        let region = self.resolve(content, file)?;
        Ok(TemplateField::new(region.to_string(), fragment.to_string()))
    }
}

/// Resolve a set of marker regions against named files in a template tree,
/// appending one rule per region to `plan`.
///
/// `regions` pairs each marker with the template file it lives in and the
/// fragment that fills it. Every file is looked up through
/// [`TemplateTree::read_file`], so an ambiguous or missing template name
/// surfaces as a configuration defect before rendering starts.
pub fn splice_into_plan(
    tree: &TemplateTree,
    regions: &[(MarkerRegion, &str, String)],
    plan: &mut ReplacementPlan,
) -> Result<(), TemplateError> {
    for (region, file, fragment) in regions {
        let raw = tree.read_file(file)?;
        let content = String::from_utf8_lossy(&raw);
        plan.push(region.splice(&content, file, fragment)?);
    }
    Ok(())
}
