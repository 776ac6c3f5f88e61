//! Schema-less document sample extraction.
//!
//! A sample object is walked recursively: scalar leaves go through the
//! document type table, nested objects synthesize named sub-structures
//! (deduplicated by structural identity), and arrays take their element type
//! from the first element. Missing `create_at` / `update_at` timestamp fields
//! are synthesized so every document model carries them.

use std::collections::HashMap;

use serde_json::Value;

use super::error::SchemaError;
use super::types::document_scalar_type;
use super::{Field, NameSet, NullStyle, TableSchema};

const TIMESTAMP_TYPE: &str = "chrono::DateTime<chrono::Utc>";

/// Fields extracted from one document sample plus the synthesized
/// sub-structure text blocks the fields refer to.
#[derive(Debug, Clone)]
pub struct DocumentFields {
    pub fields: Vec<Field>,
    pub nested: Vec<String>,
}

/// Extract an ordered field sequence from a schema-less document sample.
///
/// The sample must be a JSON object; each key becomes one field. Nested
/// objects become named sub-structures; two fields with an identical shape
/// share one synthesized structure.
pub fn extract_from_document(sample: &Value) -> Result<DocumentFields, SchemaError> {
    let Value::Object(map) = sample else {
        return Err(SchemaError::MalformedSample {
            detail: format!("expected an object at the record root, got {}", kind_of(sample)),
        });
    };
    let mut synth = Synthesizer::default();
    let mut fields = Vec::new();
    for (key, value) in map {
        let host = synth.type_of(key, value)?;
        let tag = fields.len() as u32 + 1;
        fields.push(plain_field(key, &host, tag));
    }
    for stamp in ["create_at", "update_at"] {
        if !map.contains_key(stamp) {
            let tag = fields.len() as u32 + 1;
            fields.push(plain_field(stamp, TIMESTAMP_TYPE, tag));
        }
    }
    Ok(DocumentFields {
        fields,
        nested: synth.blocks,
    })
}

/// Extract a full [`TableSchema`] from a document sample.
pub fn table_from_document(name: &str, sample: &Value) -> Result<TableSchema, SchemaError> {
    let extracted = extract_from_document(sample)?;
    TableSchema::assemble(name, extracted.fields, String::new(), extracted.nested)
}

fn plain_field(name: &str, host: &str, tag: u32) -> Field {
    Field {
        name: NameSet::derive(name),
        host_type: host.to_string(),
        tag,
        null_style: NullStyle::Required,
        comment: String::new(),
        primary_key: false,
        auto_increment: false,
        unique: false,
    }
}

/// Collects synthesized sub-structures, deduplicating by structural identity.
#[derive(Default)]
struct Synthesizer {
    /// shape signature → struct name already synthesized for that shape
    by_shape: HashMap<String, String>,
    blocks: Vec<String>,
}

impl Synthesizer {
    fn type_of(&mut self, key: &str, value: &Value) -> Result<String, SchemaError> {
        Ok(match value {
            Value::Object(_) => self.synthesize(key, value)?,
            Value::Array(items) => match items.first() {
                Some(first) => format!("Vec<{}>", self.type_of(key, first)?),
                None => "Vec<serde_json::Value>".to_string(),
            },
            other => document_scalar_type(other).to_string(),
        })
    }

    fn synthesize(&mut self, key: &str, object: &Value) -> Result<String, SchemaError> {
        let Value::Object(map) = object else {
            return Err(SchemaError::MalformedSample {
                detail: format!("expected an object for '{key}'"),
            });
        };
        let mut members: Vec<(String, String)> = Vec::new();
        for (name, value) in map {
            members.push((name.clone(), self.type_of(name, value)?));
        }
        let signature = members
            .iter()
            .map(|(n, t)| format!("{n}:{t}"))
            .collect::<Vec<_>>()
            .join(",");
        if let Some(existing) = self.by_shape.get(&signature) {
            return Ok(existing.clone());
        }
        let struct_name = NameSet::derive(key).upper_camel;
        let mut block = String::new();
        block.push_str("#[derive(Debug, Clone, Serialize, Deserialize)]\n");
        block.push_str(&format!("pub struct {struct_name} {{\n"));
        for (name, ty) in &members {
            let field = NameSet::derive(name);
            if field.snake != *name {
                block.push_str(&format!("    #[serde(rename = \"{name}\")]\n"));
            }
            block.push_str(&format!("    pub {}: {},\n", field.snake, ty));
        }
        block.push_str("}\n");
        self.by_shape.insert(signature, struct_name.clone());
        self.blocks.push(block);
        Ok(struct_name)
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
