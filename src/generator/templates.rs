//! Askama fragment templates.
//!
//! Fragments render the computed regions the marker splicer fills: model
//! fields, persistence method sets, contract fields and wire-message fields.
//! Each fragment is driven by flattened view structs so templates never
//! reach into the schema model directly.

use askama::Template;

use crate::schema::{Field, Projection, TableSchema};

/// Field data flattened for template consumption
#[derive(Debug, Clone)]
pub struct FieldView {
    /// Raw source spelling (wire contracts keep it verbatim)
    pub raw: String,
    /// `snake_case` spelling used in generated Rust
    pub snake: String,
    /// Declared Rust type, `Option`-wrapped when nullable
    pub ty: String,
    /// Rust-side type for the request/response contract
    pub api_ty: String,
    /// Wire type for the remote-call contract
    pub wire: String,
    /// Wire field number
    pub tag: u32,
    /// Source comment, empty when absent
    pub comment: String,
}

/// Table data flattened for template consumption
#[derive(Debug, Clone)]
pub struct TableView {
    pub upper_camel: String,
    pub snake: String,
    pub plural_snake: String,
    pub comment: String,
}

impl FieldView {
    pub fn from_field(field: &Field) -> Self {
        FieldView {
            raw: field.name.raw.clone(),
            snake: field.name.snake.clone(),
            ty: field.declared_type(),
            api_ty: contract_rust_type(field.wire_type(Projection::ApiContract)),
            wire: field.wire_type(Projection::RpcContract).to_string(),
            tag: field.tag,
            comment: field.comment.clone(),
        }
    }
}

impl TableView {
    pub fn from_table(table: &TableSchema) -> Self {
        TableView {
            upper_camel: table.name.upper_camel.clone(),
            snake: table.name.snake.clone(),
            plural_snake: table.name.plural_snake.clone(),
            comment: table.comment.clone(),
        }
    }
}

/// Rust spelling of a wire bucket in the request/response contract.
fn contract_rust_type(wire: &str) -> String {
    match wire {
        "int32" => "i32",
        "int64" => "i64",
        "uint32" => "u32",
        "uint64" => "u64",
        "float" => "f32",
        "double" => "f64",
        "bool" => "bool",
        _ => "String",
    }
    .to_string()
}

/// Model struct field declarations
#[derive(Template)]
#[template(path = "model_fields.txt", escape = "none")]
pub struct ModelFieldsFragment {
    pub fields: Vec<FieldView>,
}

/// Base persistence function set (find by key, insert, update, delete)
#[derive(Template)]
#[template(path = "dao_methods.txt", escape = "none")]
pub struct DaoMethodsFragment {
    pub table: TableView,
    pub pk: FieldView,
}

/// Extended persistence functions (list, page, unique-key lookups)
#[derive(Template)]
#[template(path = "dao_extended.txt", escape = "none")]
pub struct DaoExtendedFragment {
    pub table: TableView,
    pub unique_fields: Vec<FieldView>,
}

/// Request/response contract field declarations
#[derive(Template)]
#[template(path = "api_fields.txt", escape = "none")]
pub struct ApiFieldsFragment {
    pub fields: Vec<FieldView>,
}

/// Wire-message field declarations for the remote-call contract
#[derive(Template)]
#[template(path = "rpc_fields.txt", escape = "none")]
pub struct RpcFieldsFragment {
    pub fields: Vec<FieldView>,
}

/// Render the model field region, skipping the audit columns when they are
/// carried by an embedded base model instead.
pub fn render_model_fields(table: &TableSchema, embed_base: bool) -> askama::Result<String> {
    let fields = table
        .fields
        .iter()
        .filter(|f| !embed_base || !matches!(f.name.raw.as_str(), "create_at" | "update_at"))
        .map(FieldView::from_field)
        .collect();
    ModelFieldsFragment { fields }.render()
}

pub fn render_dao_methods(table: &TableSchema) -> askama::Result<String> {
    DaoMethodsFragment {
        table: TableView::from_table(table),
        pk: FieldView::from_field(table.pk()),
    }
    .render()
}

pub fn render_dao_extended(table: &TableSchema) -> askama::Result<String> {
    let unique_fields = table
        .fields
        .iter()
        .filter(|f| f.unique && !f.primary_key)
        .map(FieldView::from_field)
        .collect();
    DaoExtendedFragment {
        table: TableView::from_table(table),
        unique_fields,
    }
    .render()
}

/// Request contract carries the primary key; response carries every field.
pub fn render_request_fields(table: &TableSchema) -> askama::Result<String> {
    ApiFieldsFragment {
        fields: vec![FieldView::from_field(table.pk())],
    }
    .render()
}

pub fn render_response_fields(table: &TableSchema) -> askama::Result<String> {
    ApiFieldsFragment {
        fields: table.fields.iter().map(FieldView::from_field).collect(),
    }
    .render()
}

pub fn render_rpc_fields(table: &TableSchema) -> askama::Result<String> {
    RpcFieldsFragment {
        fields: table.fields.iter().map(FieldView::from_field).collect(),
    }
    .render()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{extract_from_ddl, DdlOptions};

    fn orders() -> TableSchema {
        let ddl = "create table orders (order_id bigint not null primary key comment 'the key', email varchar(64) not null unique, note text, created_at datetime not null);";
        extract_from_ddl(ddl, &DdlOptions::default())
            .unwrap()
            .tables
            .remove(0)
    }

    #[test]
    fn test_model_fields_fragment() {
        let rendered = render_model_fields(&orders(), false).unwrap();
        assert!(rendered.contains("/// the key"));
        assert!(rendered.contains("pub order_id: i64,"));
        assert!(rendered.contains("pub note: Option<String>,"));
        assert!(rendered.contains("pub created_at: chrono::DateTime<chrono::Utc>,"));
    }

    #[test]
    fn test_dao_methods_fragment() {
        let rendered = render_dao_methods(&orders()).unwrap();
        assert!(rendered.contains("pub fn find_orders(order_id: i64) -> Option<Orders>"));
        assert!(rendered.contains("pub fn insert_orders(row: &Orders)"));
        assert!(rendered.contains("pub fn delete_orders(order_id: i64) -> bool"));
    }

    #[test]
    fn test_dao_extended_unique_lookup() {
        let rendered = render_dao_extended(&orders()).unwrap();
        assert!(rendered.contains("pub fn find_orders_by_email(email: String) -> Option<Orders>"));
        assert!(rendered.contains("pub fn list_orders()"));
    }

    #[test]
    fn test_rpc_fields_fragment() {
        let rendered = render_rpc_fields(&orders()).unwrap();
        assert!(rendered.contains("int64 order_id = 1;"));
        assert!(rendered.contains("string email = 2;"));
        // temporal fields travel as integer epochs on the rpc contract
        assert!(rendered.contains("int64 created_at = 4;"));
    }

    #[test]
    fn test_api_fields_use_contract_types() {
        let rendered = render_response_fields(&orders()).unwrap();
        // temporal fields travel as strings on the api contract
        assert!(rendered.contains("pub created_at: String,"));
    }
}
