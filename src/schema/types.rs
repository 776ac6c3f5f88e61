use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use super::error::SchemaError;

/// Relational dialect a DDL statement or introspection result was written in
///
/// Each dialect carries its own fixed column-type lookup table; the document
/// and IDL back-ends have separate tables of their own.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Dialect {
    Mysql,
    Postgres,
}

/// Which interchange contract a wire type is being projected for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Projection {
    /// Request/response contract: temporal values travel as strings
    ApiContract,
    /// Remote-call contract: temporal values travel as integer epochs
    RpcContract,
}

/// Resolve a dialect column type to its host (generated-code) type.
///
/// The `unsigned` flag only affects the MySQL integer family; Postgres has no
/// unsigned integers. Returns [`SchemaError::UnsupportedType`] for anything
/// absent from the dialect's table; extraction is strict here, unlike wire
/// projection which degrades to `string`.
pub fn host_type(dialect: Dialect, column: &str, raw_type: &str, unsigned: bool) -> Result<&'static str, SchemaError> {
    let ty = raw_type.to_lowercase();
    let mapped = match dialect {
        Dialect::Mysql => match ty.as_str() {
            "bool" | "boolean" => Some("bool"),
            "tinyint" => Some(if unsigned { "u8" } else { "i8" }),
            "smallint" => Some(if unsigned { "u16" } else { "i16" }),
            "mediumint" | "int" | "integer" => Some(if unsigned { "u32" } else { "i32" }),
            "bigint" => Some(if unsigned { "u64" } else { "i64" }),
            "float" => Some("f32"),
            "double" | "decimal" | "numeric" => Some("f64"),
            "char" | "varchar" | "tinytext" | "text" | "mediumtext" | "longtext" | "enum"
            | "set" | "uuid" => Some("String"),
            "binary" | "varbinary" | "tinyblob" | "blob" | "mediumblob" | "longblob" => {
                Some("Vec<u8>")
            }
            "json" => Some("serde_json::Value"),
            "date" => Some("chrono::NaiveDate"),
            "time" => Some("chrono::NaiveTime"),
            "datetime" | "timestamp" => Some("chrono::DateTime<chrono::Utc>"),
            "year" => Some("i32"),
            _ => None,
        },
        Dialect::Postgres => match ty.as_str() {
            "bool" | "boolean" => Some("bool"),
            "smallint" | "int2" | "smallserial" => Some("i16"),
            "integer" | "int" | "int4" | "serial" => Some("i32"),
            "bigint" | "int8" | "bigserial" => Some("i64"),
            "real" | "float4" => Some("f32"),
            "double precision" | "float8" | "numeric" | "decimal" => Some("f64"),
            "char" | "character" | "varchar" | "character varying" | "text" | "citext"
            | "uuid" => Some("String"),
            "bytea" => Some("Vec<u8>"),
            "json" | "jsonb" => Some("serde_json::Value"),
            "date" => Some("chrono::NaiveDate"),
            "time" | "timetz" => Some("chrono::NaiveTime"),
            "timestamp" | "timestamptz" => Some("chrono::DateTime<chrono::Utc>"),
            _ => None,
        },
    };
    mapped.ok_or_else(|| SchemaError::UnsupportedType {
        column: column.to_string(),
        ty: raw_type.to_string(),
    })
}

/// Project a host type to its wire/interchange representation.
///
/// Width-specific integers collapse into two wire-width buckets; temporal
/// types become `string` or `int64` depending on the contract kind; byte
/// sequences become `string`. Unmapped host types default to `string` so a
/// newly added host type never aborts generation.
pub fn map_type(host: &str, projection: Projection) -> &'static str {
    match host {
        "i8" | "i16" | "i32" => "int32",
        "i64" => "int64",
        "u8" | "u16" | "u32" => "uint32",
        "u64" => "uint64",
        "f32" => "float",
        "f64" => "double",
        "bool" => "bool",
        "chrono::NaiveDate" | "chrono::NaiveTime" | "chrono::DateTime<chrono::Utc>" => {
            match projection {
                Projection::ApiContract => "string",
                Projection::RpcContract => "int64",
            }
        }
        _ => "string",
    }
}

/// Whether a host type qualifies as a primary-key candidate (numeric or string)
pub fn is_key_candidate(host: &str) -> bool {
    matches!(
        host,
        "i8" | "i16" | "i32" | "i64" | "u8" | "u16" | "u32" | "u64" | "String"
    )
}

/// Resolve a scalar document-sample leaf to a host type.
///
/// The document back-end shares the resilient posture of wire projection:
/// anything unrecognized lands on `serde_json::Value` rather than failing.
pub fn document_scalar_type(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(n) if n.is_f64() => "f64",
        serde_json::Value::Number(_) => "i64",
        serde_json::Value::String(_) => "String",
        _ => "serde_json::Value",
    }
}

/// Resolve an IDL scalar type name to a host type.
pub fn idl_host_type(ty: &str) -> &'static str {
    match ty {
        "int32" | "sint32" | "sfixed32" => "i32",
        "int64" | "sint64" | "sfixed64" => "i64",
        "uint32" | "fixed32" => "u32",
        "uint64" | "fixed64" => "u64",
        "float" => "f32",
        "double" => "f64",
        "bool" => "bool",
        "bytes" => "Vec<u8>",
        _ => "String",
    }
}
