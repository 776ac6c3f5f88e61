//! Pre-parsed IDL message extraction.
//!
//! The external compiler plugin that turns an IDL file into JSON is an opaque
//! schema supplier here; this module only consumes its output shape: a list of
//! messages, each with typed, tagged fields.

use serde::Deserialize;
use serde_json::Value;

use super::error::SchemaError;
use super::types::idl_host_type;
use super::{Field, NameSet, NullStyle, TableSchema};

#[derive(Debug, Deserialize)]
struct IdlFile {
    #[serde(default)]
    messages: Vec<IdlMessage>,
}

#[derive(Debug, Deserialize)]
struct IdlMessage {
    name: String,
    #[serde(default)]
    comment: String,
    #[serde(default)]
    fields: Vec<IdlField>,
}

#[derive(Debug, Deserialize)]
struct IdlField {
    name: String,
    #[serde(rename = "type")]
    ty: String,
    tag: u32,
    #[serde(default)]
    repeated: bool,
    #[serde(default)]
    optional: bool,
    #[serde(default)]
    comment: String,
}

/// Extract one [`TableSchema`] per message from pre-parsed IDL JSON.
///
/// Scalar field types go through the IDL lookup table; a type starting with an
/// uppercase letter is taken as a reference to another message and kept as a
/// named type. Declared tags are preserved verbatim.
pub fn extract_from_idl(parsed: &Value) -> Result<Vec<TableSchema>, SchemaError> {
    let file: IdlFile =
        serde_json::from_value(parsed.clone()).map_err(|e| SchemaError::MalformedIdl {
            detail: e.to_string(),
        })?;
    if file.messages.is_empty() {
        return Err(SchemaError::MalformedIdl {
            detail: "no messages present".to_string(),
        });
    }
    let mut tables = Vec::new();
    for message in file.messages {
        let mut fields = Vec::new();
        for f in &message.fields {
            let base = if f.ty.chars().next().is_some_and(|c| c.is_ascii_uppercase()) {
                NameSet::derive(&f.ty).upper_camel
            } else {
                idl_host_type(&f.ty).to_string()
            };
            let host = if f.repeated { format!("Vec<{base}>") } else { base };
            fields.push(Field {
                name: NameSet::derive(&f.name),
                host_type: host,
                tag: f.tag,
                null_style: if f.optional {
                    NullStyle::OptionWrapped
                } else {
                    NullStyle::Required
                },
                comment: f.comment.clone(),
                primary_key: false,
                auto_increment: false,
                unique: false,
            });
        }
        tables.push(TableSchema::assemble(
            &message.name,
            fields,
            message.comment,
            vec![],
        )?);
    }
    Ok(tables)
}
