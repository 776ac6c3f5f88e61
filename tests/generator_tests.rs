use std::fs;
use std::path::Path;

use modelgen::generator::{generate, GenOptions, NameCasing, TemplateCatalog};
use modelgen::schema::{extract_from_ddl, table_from_document, DdlOptions, TableSchema};

const ORDERS_DDL: &str = r#"
    CREATE TABLE `orders` (
        `order_id` bigint unsigned NOT NULL AUTO_INCREMENT,
        `user_id` bigint NOT NULL,
        `status` varchar(32) NOT NULL DEFAULT 'new',
        `note` text,
        PRIMARY KEY (`order_id`),
        UNIQUE KEY `uniq_user` (`user_id`)
    ) ENGINE=InnoDB COMMENT='customer orders';
"#;

fn orders() -> TableSchema {
    extract_from_ddl(ORDERS_DDL, &DdlOptions::default())
        .unwrap()
        .tables
        .remove(0)
}

fn read(root: &Path, rel: &str) -> String {
    fs::read_to_string(root.join(rel)).unwrap_or_else(|e| panic!("reading {rel}: {e}"))
}

#[test]
fn test_fresh_generation_produces_all_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");

    let batch = generate(
        &orders(),
        &TemplateCatalog::new(),
        &GenOptions::default(),
        Some(&out),
        "ddl:orders",
    )
    .unwrap();

    assert_eq!(batch.output_root, out);
    assert_eq!(batch.written.len(), 4);
    assert!(batch.merge_report.is_empty());

    let model = read(&out, "model/orders.rs");
    assert!(model.contains("/// customer orders"));
    assert!(model.contains("pub struct Orders {"));
    assert!(model.contains("pub order_id: u64,"));
    assert!(model.contains("pub note: Option<String>,"));
    assert!(!model.contains("<gen:"));

    let dao = read(&out, "dao/orders_dao.rs");
    assert!(dao.contains("use super::orders::Orders;"));
    assert!(dao.contains("pub fn find_orders(order_id: u64) -> Option<Orders>"));
    assert!(dao.contains("pub fn delete_orders(order_id: u64) -> bool"));
    // extended methods are opt-in
    assert!(!dao.contains("pub fn list_orders"));

    let api = read(&out, "api/orders_types.rs");
    assert!(api.contains("pub struct OrdersRequest {"));
    assert!(api.contains("pub struct OrdersResponse {"));
    assert!(api.contains("pub order_id: u64,"));

    let proto = read(&out, "rpc/orders.proto");
    assert!(proto.contains("package orders;"));
    assert!(proto.contains("message Orders {"));
    assert!(proto.contains("uint64 order_id = 1;"));
    assert!(proto.contains("message GetOrdersReq {"));
    assert!(proto.contains("service OrdersService {"));

    // base model is only rendered when embedding is requested
    assert!(!out.join("model/base.rs").exists());

    let sidecar = read(&out, ".modelgen.json");
    assert!(sidecar.contains("\"orders\""));
    assert!(sidecar.contains("ddl:orders"));
}

#[test]
fn test_regeneration_merges_instead_of_overwriting() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");
    let catalog = TemplateCatalog::new();

    generate(&orders(), &catalog, &GenOptions::default(), Some(&out), "ddl:orders").unwrap();

    // hand-tune a generated body
    let dao_path = out.join("dao/orders_dao.rs");
    let tuned = fs::read_to_string(&dao_path)
        .unwrap()
        .replace(
            "pub fn find_orders(order_id: u64) -> Option<Orders> {\n    todo!()\n}",
            "pub fn find_orders(order_id: u64) -> Option<Orders> {\n    cache_lookup(order_id)\n}",
        );
    assert!(tuned.contains("cache_lookup"), "replacement target must match");
    fs::write(&dao_path, tuned).unwrap();

    // second run with the extended method set switched on
    let opts = GenOptions {
        extended_api: true,
        ..GenOptions::default()
    };
    let batch = generate(&orders(), &catalog, &opts, Some(&out), "ddl:orders").unwrap();

    assert!(batch.written.is_empty());
    assert!(!batch.merge_report.is_empty());
    assert!(batch.backup_root.is_some());

    let dao = read(&out, "dao/orders_dao.rs");
    // hand edit survives
    assert!(dao.contains("cache_lookup(order_id)"));
    // new declarations arrive
    assert!(dao.contains("pub fn list_orders() -> Vec<Orders>"));
    assert!(dao.contains("pub fn page_orders(offset: u64, limit: u64) -> Vec<Orders>"));
    assert!(dao.contains("pub fn find_orders_by_user_id(user_id: i64) -> Option<Orders>"));

    // the pre-merge file was backed up
    let backup_root = batch.backup_root.unwrap();
    let backup = backup_root.join("dao/orders_dao.rs");
    assert!(backup.exists());
    assert!(fs::read_to_string(backup).unwrap().contains("cache_lookup"));

    // no candidate directory left behind
    let leftovers: Vec<_> = fs::read_dir(&out)
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().starts_with(".modelgen_candidate"))
        .collect();
    assert!(leftovers.is_empty());
}

#[test]
fn test_regeneration_without_changes_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");
    let catalog = TemplateCatalog::new();

    generate(&orders(), &catalog, &GenOptions::default(), Some(&out), "ddl:orders").unwrap();
    let before = read(&out, "dao/orders_dao.rs");

    let batch = generate(&orders(), &catalog, &GenOptions::default(), Some(&out), "ddl:orders").unwrap();
    assert!(batch.written.is_empty());
    assert!(batch.backup_root.is_none());
    assert!(batch
        .merge_report
        .iter()
        .all(|(_, message)| message == "up to date"));
    assert_eq!(read(&out, "dao/orders_dao.rs"), before);
}

#[test]
fn test_embedded_base_model() {
    let ddl = "create table audit_logs (log_id bigint not null primary key, action varchar(64) not null, create_at datetime not null, update_at datetime not null);";
    let table = extract_from_ddl(ddl, &DdlOptions::default())
        .unwrap()
        .tables
        .remove(0);

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");
    let opts = GenOptions {
        embed_base_model: true,
        ..GenOptions::default()
    };
    generate(&table, &TemplateCatalog::new(), &opts, Some(&out), "ddl:audit").unwrap();

    let base = read(&out, "model/base.rs");
    assert!(base.contains("pub struct Base {"));

    let model = read(&out, "model/audit_logs.rs");
    assert!(model.contains("#[serde(flatten)]"));
    assert!(model.contains("pub base: super::base::Base,"));
    // audit columns live on the base, not the model
    assert!(!model.contains("pub create_at:"));
    assert!(!model.contains("pub update_at:"));
    assert!(model.contains("pub action: String,"));
}

#[test]
fn test_nested_layout_with_camel_file_names() {
    let ddl = "create table order_items (item_id bigint not null primary key, qty int not null);";
    let table = extract_from_ddl(ddl, &DdlOptions::default())
        .unwrap()
        .tables
        .remove(0);

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");
    let opts = GenOptions {
        casing: NameCasing::Camel,
        nested_layout: true,
        ..GenOptions::default()
    };
    generate(&table, &TemplateCatalog::new(), &opts, Some(&out), "ddl:items").unwrap();

    // table subdirectory and file names carry the lowerCamel token;
    // type names stay UpperCamel
    let model = read(&out, "orderItems/model/orderItems.rs");
    assert!(model.contains("pub struct OrderItems {"));
    assert!(out.join("orderItems/dao/orderItems_dao.rs").exists());
    assert!(out.join("orderItems/rpc/orderItems.proto").exists());
    // sidecar stays at the output root
    assert!(out.join(".modelgen.json").exists());
}

#[test]
fn test_regeneration_keeps_the_sidecar_layout() {
    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");

    let opts = GenOptions {
        nested_layout: true,
        ..GenOptions::default()
    };
    generate(&orders(), &TemplateCatalog::new(), &opts, Some(&out), "ddl:orders").unwrap();
    assert!(out.join("orders/model/orders.rs").exists());

    // re-run with default flags: layout still comes from the sidecar
    let batch = generate(
        &orders(),
        &TemplateCatalog::new(),
        &GenOptions::default(),
        Some(&out),
        "ddl:orders",
    )
    .unwrap();

    assert!(!out.join("model/orders.rs").exists());
    assert!(batch.written.is_empty());
    assert!(batch
        .merge_report
        .iter()
        .all(|(_, message)| message == "up to date"));
}

#[test]
fn test_document_sample_pipeline() {
    let sample = serde_json::json!({
        "user_id": 7,
        "name": "alice",
        "home_address": {"city": "berlin", "zip": "10115"}
    });
    let table = table_from_document("users", &sample).unwrap();

    let tmp = tempfile::tempdir().unwrap();
    let out = tmp.path().join("gen");
    generate(
        &table,
        &TemplateCatalog::new(),
        &GenOptions::default(),
        Some(&out),
        "document:users",
    )
    .unwrap();

    let model = read(&out, "model/users.rs");
    // synthesized sub-structure lands above the model struct
    assert!(model.contains("pub struct HomeAddress {"));
    assert!(model.contains("pub home_address: HomeAddress,"));
    // timestamps synthesized by the document back-end
    assert!(model.contains("pub create_at: chrono::DateTime<chrono::Utc>,"));

    // `*_id` column wins the primary-key election
    let dao = read(&out, "dao/users_dao.rs");
    assert!(dao.contains("pub fn find_users(user_id: i64) -> Option<Users>"));
}
