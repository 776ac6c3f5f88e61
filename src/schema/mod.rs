//! # Schema Module
//!
//! Schema extraction and type mapping: every supported schema source is
//! normalized into the same [`TableSchema`] model before any template runs.
//!
//! ## Back-ends
//!
//! - **[`ddl`]** - `CREATE TABLE` text, per-dialect type lookup tables
//! - **[`introspect`]** - already-fetched information-schema rows
//! - **[`document`]** - schema-less document samples (JSON)
//! - **[`idl`]** - pre-parsed IDL messages, consumed as opaque JSON
//!
//! ## Flow
//!
//! ```text
//! DDL / rows / sample / IDL → extractor → TableSchema → type mapper → artifacts
//! ```
//!
//! A `TableSchema` owns its fields in declaration order; fields never point
//! back at their table. The designated primary key is selected once at
//! extraction time and is never absent.

pub mod ddl;
pub mod document;
pub mod error;
pub mod idl;
pub mod introspect;
pub mod naming;
pub mod types;

pub use ddl::{extract_from_ddl, DdlExtraction, DdlOptions};
pub use document::{extract_from_document, table_from_document, DocumentFields};
pub use error::SchemaError;
pub use idl::extract_from_idl;
pub use introspect::{extract_from_introspection, ColumnRow};
pub use naming::{lower_camel, pluralize, NameSet};
pub use types::{document_scalar_type, host_type, idl_host_type, is_key_candidate, map_type, Dialect, Projection};

use serde::{Deserialize, Serialize};

/// How a nullable field is carried in generated code
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NullStyle {
    /// Field is `NOT NULL`; the host type is used as-is
    Required,
    /// Field is nullable; the host type is wrapped in `Option<T>`
    OptionWrapped,
    /// Field is nullable but has a column default; generated code may use the
    /// bare host type and rely on the default at insert time
    Defaulted,
}

/// One extracted field, owned by exactly one [`TableSchema`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Field {
    /// All derived name spellings
    pub name: NameSet,
    /// Host (generated-code) type, unwrapped
    pub host_type: String,
    /// Serialization tag: wire field number, 1-based declaration ordinal for
    /// relational and document sources, the declared tag for IDL sources
    pub tag: u32,
    /// Nullability style captured from constraints
    pub null_style: NullStyle,
    /// Free-form comment carried through to generated artifacts
    pub comment: String,
    /// Whether this field is the designated primary key
    pub primary_key: bool,
    /// Whether the source marked the field auto-increment / serial
    pub auto_increment: bool,
    /// Whether the source carried a unique constraint on this field alone
    pub unique: bool,
}

impl Field {
    /// Host type as it appears in a generated declaration, `Option`-wrapped
    /// for nullable fields.
    pub fn declared_type(&self) -> String {
        match self.null_style {
            NullStyle::OptionWrapped => format!("Option<{}>", self.host_type),
            NullStyle::Required | NullStyle::Defaulted => self.host_type.clone(),
        }
    }

    /// Wire/interchange type for the given contract projection.
    pub fn wire_type(&self, projection: Projection) -> &'static str {
        map_type(&self.host_type, projection)
    }
}

/// A normalized table (or message) schema produced by one extractor back-end
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableSchema {
    /// All derived name spellings of the table name
    pub name: NameSet,
    /// Fields in declaration order; order is preserved through generation
    pub fields: Vec<Field>,
    /// Index into `fields` of the designated primary key
    pub primary_key: usize,
    /// Free-form table comment
    pub comment: String,
    /// Backend-specific nested-structure text blocks (document back-end)
    pub nested_blocks: Vec<String>,
}

impl TableSchema {
    /// Assemble a schema from extracted fields, enforcing the duplicate-name
    /// invariant and running primary-key selection.
    pub fn assemble(
        name: &str,
        mut fields: Vec<Field>,
        comment: String,
        nested_blocks: Vec<String>,
    ) -> Result<Self, SchemaError> {
        let mut seen = std::collections::HashSet::new();
        for field in &fields {
            if !seen.insert(field.name.raw.clone()) {
                return Err(SchemaError::DuplicateColumn {
                    table: name.to_string(),
                    column: field.name.raw.clone(),
                });
            }
        }
        let primary_key = select_primary_key(&fields);
        for (i, field) in fields.iter_mut().enumerate() {
            field.primary_key = i == primary_key;
        }
        Ok(TableSchema {
            name: NameSet::derive(name),
            fields,
            primary_key,
            comment,
            nested_blocks,
        })
    }

    /// The designated primary-key field.
    pub fn pk(&self) -> &Field {
        &self.fields[self.primary_key]
    }
}

/// Select the designated primary key for a field sequence.
///
/// Priority, never skipped: explicit constraint > first `*_id`-suffixed
/// numeric/string field > first numeric/string field > first declared field.
/// Callers guarantee `fields` is non-empty.
pub fn select_primary_key(fields: &[Field]) -> usize {
    if let Some(i) = fields.iter().position(|f| f.primary_key) {
        return i;
    }
    if let Some(i) = fields
        .iter()
        .position(|f| f.name.snake.ends_with("_id") && is_key_candidate(&f.host_type))
    {
        return i;
    }
    if let Some(i) = fields.iter().position(|f| is_key_candidate(&f.host_type)) {
        return i;
    }
    0
}
