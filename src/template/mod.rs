//! # Template Module
//!
//! The generic, schema-agnostic template tree replacer. A [`TemplateTree`]
//! clones a source tree (filesystem directory or embedded bundle) into an
//! output directory while a [`ReplacementPlan`] applies literal text
//! substitutions to file content, file names and directory names.
//!
//! Nothing in this module knows about tables or fields; schema-driven content
//! enters only as replacement literals built by the marker splicer and the
//! artifact pipeline.

pub mod error;
pub mod source;
pub mod tree;

pub use error::TemplateError;
pub use source::{DirSource, EmbeddedSource, TemplateSource};
pub use tree::TemplateTree;

/// One ordered literal replacement rule.
///
/// A case-sensitive rule whose match literal starts with a letter stands for
/// two concrete passes (one with the first letter uppered, one with it
/// lowered, the remainder untouched) so a single `stub`-to-`order` rule
/// covers both `Stub` and `stub` spellings without ever touching `STUB`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateField {
    /// Literal to search for
    pub matches: String,
    /// Literal to substitute
    pub replacement: String,
    /// Whether to expand into first-letter case variants
    pub case_sensitive: bool,
}

impl TemplateField {
    pub fn new(matches: impl Into<String>, replacement: impl Into<String>) -> Self {
        TemplateField {
            matches: matches.into(),
            replacement: replacement.into(),
            case_sensitive: false,
        }
    }

    pub fn case_sensitive(matches: impl Into<String>, replacement: impl Into<String>) -> Self {
        TemplateField {
            matches: matches.into(),
            replacement: replacement.into(),
            case_sensitive: true,
        }
    }
}

/// An ordered list of concrete replace-all passes.
///
/// Rules are applied in the order callers pushed them, each as a full literal
/// replace-all over the input; the same passes run over content and, at
/// render time, independently over destination directory and file names.
#[derive(Debug, Clone, Default)]
pub struct ReplacementPlan {
    rules: Vec<(String, String)>,
}

impl ReplacementPlan {
    pub fn new() -> Self {
        ReplacementPlan::default()
    }

    /// Append one rule, expanding case-sensitive rules into their two
    /// first-letter variants.
    pub fn push(&mut self, field: TemplateField) {
        if field.case_sensitive && field.matches.chars().next().is_some_and(|c| c.is_alphabetic()) {
            self.rules.push((
                first_upper(&field.matches),
                first_upper(&field.replacement),
            ));
            self.rules.push((
                first_lower(&field.matches),
                first_lower(&field.replacement),
            ));
        } else {
            self.rules.push((field.matches, field.replacement));
        }
    }

    /// Apply every rule, in order, as a literal replace-all pass.
    pub fn apply(&self, input: &str) -> String {
        let mut out = input.to_string();
        for (matches, replacement) in &self.rules {
            out = out.replace(matches.as_str(), replacement);
        }
        out
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Concrete (match, replacement) passes after expansion, in apply order.
    pub fn rules(&self) -> &[(String, String)] {
        &self.rules
    }
}

fn first_upper(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn first_lower(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_case_sensitive_expansion() {
        let mut plan = ReplacementPlan::new();
        plan.push(TemplateField::case_sensitive("fooBar", "userName"));
        assert_eq!(
            plan.rules(),
            &[
                ("FooBar".to_string(), "UserName".to_string()),
                ("fooBar".to_string(), "userName".to_string()),
            ]
        );
        assert_eq!(plan.apply("FooBar fooBar FOOBAR"), "UserName userName FOOBAR");
    }

    #[test]
    fn test_plain_rule_not_expanded() {
        let mut plan = ReplacementPlan::new();
        plan.push(TemplateField::new("{{TABLE}}", "orders"));
        assert_eq!(plan.rules().len(), 1);
        assert_eq!(plan.apply("x {{TABLE}} y"), "x orders y");
    }

    #[test]
    fn test_rules_apply_in_caller_order() {
        let mut plan = ReplacementPlan::new();
        plan.push(TemplateField::new("a", "b"));
        plan.push(TemplateField::new("b", "c"));
        // second pass sees the first pass's output
        assert_eq!(plan.apply("a"), "c");
    }

    #[test]
    fn test_non_letter_case_sensitive_rule_kept_single() {
        let mut plan = ReplacementPlan::new();
        plan.push(TemplateField::case_sensitive("_stub", "_order"));
        assert_eq!(plan.rules().len(), 1);
    }
}
