//! Live-database introspection extraction.
//!
//! Connection management is out of scope: callers hand over already-fetched
//! information-schema rows (any driver, or a JSON dump) and this module turns
//! them into a [`TableSchema`] through the same dialect lookup tables the DDL
//! parser uses.

use serde::{Deserialize, Serialize};

use super::error::SchemaError;
use super::types::{host_type, Dialect};
use super::{Field, NameSet, NullStyle, TableSchema};

/// One information-schema column row, in the shape `information_schema.columns`
/// reports it. Serde aliases accept the upper-case spellings some drivers emit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ColumnRow {
    #[serde(alias = "COLUMN_NAME")]
    pub column_name: String,
    #[serde(alias = "DATA_TYPE")]
    pub data_type: String,
    /// `YES` / `NO` as the schema tables report it
    #[serde(alias = "IS_NULLABLE")]
    pub is_nullable: String,
    /// `PRI`, `UNI`, `MUL` or empty
    #[serde(default, alias = "COLUMN_KEY")]
    pub column_key: String,
    /// `auto_increment` or empty
    #[serde(default, alias = "EXTRA")]
    pub extra: String,
    #[serde(default, alias = "COLUMN_DEFAULT")]
    pub column_default: Option<String>,
    #[serde(default, alias = "COLUMN_COMMENT")]
    pub column_comment: String,
    /// MySQL reports signedness inside `COLUMN_TYPE` (e.g. `bigint unsigned`)
    #[serde(default, alias = "COLUMN_TYPE")]
    pub column_type: String,
}

/// Build a [`TableSchema`] from introspection rows for one table.
///
/// Rows are taken in ordinal order as supplied. An empty row set is an error:
/// either the table does not exist or the caller queried the wrong schema.
pub fn extract_from_introspection(
    rows: &[ColumnRow],
    table: &str,
    dialect: Dialect,
) -> Result<TableSchema, SchemaError> {
    if rows.is_empty() {
        return Err(SchemaError::EmptyIntrospection {
            table: table.to_string(),
        });
    }
    let mut fields = Vec::new();
    for (i, row) in rows.iter().enumerate() {
        let unsigned = row.column_type.to_lowercase().contains("unsigned");
        let host = if dialect == Dialect::Mysql
            && row.data_type.eq_ignore_ascii_case("tinyint")
            && row.column_type.to_lowercase().starts_with("tinyint(1)")
        {
            "bool"
        } else {
            host_type(dialect, &row.column_name, &row.data_type, unsigned)?
        };
        let nullable = row.is_nullable.eq_ignore_ascii_case("yes");
        let null_style = if !nullable {
            NullStyle::Required
        } else if row.column_default.is_some() {
            NullStyle::Defaulted
        } else {
            NullStyle::OptionWrapped
        };
        fields.push(Field {
            name: NameSet::derive(&row.column_name),
            host_type: host.to_string(),
            tag: i as u32 + 1,
            null_style,
            comment: row.column_comment.clone(),
            primary_key: row.column_key.eq_ignore_ascii_case("pri"),
            auto_increment: row.extra.to_lowercase().contains("auto_increment"),
            unique: row.column_key.eq_ignore_ascii_case("uni"),
        });
    }
    TableSchema::assemble(table, fields, String::new(), vec![])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(name: &str, data_type: &str, key: &str) -> ColumnRow {
        ColumnRow {
            column_name: name.to_string(),
            data_type: data_type.to_string(),
            is_nullable: "NO".to_string(),
            column_key: key.to_string(),
            extra: String::new(),
            column_default: None,
            column_comment: String::new(),
            column_type: data_type.to_string(),
        }
    }

    #[test]
    fn test_rows_to_schema() {
        let rows = vec![
            row("id", "bigint", "PRI"),
            row("email", "varchar", "UNI"),
            row("age", "int", ""),
        ];
        let t = extract_from_introspection(&rows, "users", Dialect::Mysql).unwrap();
        assert_eq!(t.pk().name.raw, "id");
        assert!(t.fields[1].unique);
        assert_eq!(t.fields[2].host_type, "i32");
    }

    #[test]
    fn test_unsigned_detected_from_column_type() {
        let mut r = row("views", "bigint", "");
        r.column_type = "bigint unsigned".to_string();
        let t = extract_from_introspection(&[r], "stats", Dialect::Mysql).unwrap();
        assert_eq!(t.fields[0].host_type, "u64");
    }

    #[test]
    fn test_empty_rows_rejected() {
        let err = extract_from_introspection(&[], "ghost", Dialect::Mysql).unwrap_err();
        assert_eq!(
            err,
            SchemaError::EmptyIntrospection {
                table: "ghost".to_string()
            }
        );
    }

    #[test]
    fn test_row_aliases_deserialize() {
        let row: ColumnRow = serde_json::from_value(serde_json::json!({
            "COLUMN_NAME": "id",
            "DATA_TYPE": "bigint",
            "IS_NULLABLE": "NO",
            "COLUMN_KEY": "PRI",
            "EXTRA": "auto_increment",
            "COLUMN_TYPE": "bigint unsigned"
        }))
        .unwrap();
        assert_eq!(row.column_name, "id");
        assert!(row.extra.contains("auto_increment"));
    }
}
