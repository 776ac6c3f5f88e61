use std::fs;
use std::path::Path;

use modelgen::merge::{BlockExtractor, LineExtractor, MergeEngine, MergeError, MergeOutcome};

const OLD_DAO: &str = "\
use super::orders::Orders;

// ==== generated sections: keep this line ====

/// Fetch one orders row by primary key.
pub fn find_orders(order_id: i64) -> Option<Orders> {
    cache_lookup(order_id)
}

/// Insert one orders row.
pub fn insert_orders(row: &Orders) {
    todo!()
}
";

const NEW_DAO: &str = "\
use super::orders::Orders;

// ==== generated sections: keep this line ====

/// Fetch one orders row by primary key.
pub fn find_orders(order_id: i64) -> Option<Orders> {
    todo!()
}

/// Insert one orders row.
pub fn insert_orders(row: &Orders) {
    todo!()
}

/// Delete one orders row; returns whether a row was removed.
pub fn delete_orders(order_id: i64) -> bool {
    todo!()
}
";

fn setup(base: &Path, old: &str, new: &str) -> std::path::PathBuf {
    fs::create_dir_all(base.join("dao")).unwrap();
    fs::write(base.join("dao/orders_dao.rs"), old).unwrap();
    let candidate = base.join("candidate.rs");
    fs::write(&candidate, new).unwrap();
    candidate
}

#[test]
fn test_merge_appends_new_declaration_and_backs_up() {
    let tmp = tempfile::tempdir().unwrap();
    let candidate = setup(tmp.path(), OLD_DAO, NEW_DAO);

    let engine = MergeEngine::new(tmp.path(), Box::new(BlockExtractor));
    let outcome = engine
        .merge_file(Path::new("dao/orders_dao.rs"), &candidate)
        .unwrap();

    match outcome {
        MergeOutcome::Merged { added, backup } => {
            assert_eq!(added, 1);
            assert_eq!(fs::read_to_string(backup).unwrap(), OLD_DAO);
        }
        other => panic!("expected merge, got {other:?}"),
    }

    let merged = fs::read_to_string(tmp.path().join("dao/orders_dao.rs")).unwrap();
    // hand-edited body survives
    assert!(merged.contains("cache_lookup(order_id)"));
    // new declaration arrives with its doc comment, after the anchor
    assert!(merged.contains("/// Delete one orders row; returns whether a row was removed."));
    let insert_at = merged.find("pub fn insert_orders").unwrap();
    let delete_at = merged.find("pub fn delete_orders").unwrap();
    assert!(delete_at > insert_at);
    // candidate consumed
    assert!(!candidate.exists());
}

#[test]
fn test_identical_candidate_is_a_noop() {
    let tmp = tempfile::tempdir().unwrap();
    let candidate = setup(tmp.path(), OLD_DAO, OLD_DAO);

    let engine = MergeEngine::new(tmp.path(), Box::new(BlockExtractor));
    let outcome = engine
        .merge_file(Path::new("dao/orders_dao.rs"), &candidate)
        .unwrap();

    assert_eq!(outcome, MergeOutcome::NoOp);
    assert!(!candidate.exists());
    assert!(!engine.backup_root().exists());
    assert_eq!(
        fs::read_to_string(tmp.path().join("dao/orders_dao.rs")).unwrap(),
        OLD_DAO
    );
}

#[test]
fn test_separator_mismatch_aborts() {
    let tmp = tempfile::tempdir().unwrap();
    let stripped = OLD_DAO.replace("// ==== generated sections: keep this line ====\n", "");
    let candidate = setup(tmp.path(), &stripped, NEW_DAO);

    let engine = MergeEngine::new(tmp.path(), Box::new(BlockExtractor));
    let err = engine
        .merge_file(Path::new("dao/orders_dao.rs"), &candidate)
        .unwrap_err();
    assert!(matches!(err, MergeError::SeparatorMismatch { .. }));
    // aborted file stays untouched
    assert_eq!(
        fs::read_to_string(tmp.path().join("dao/orders_dao.rs")).unwrap(),
        stripped
    );
}

#[test]
fn test_line_extractor_merges_proto_fields() {
    let tmp = tempfile::tempdir().unwrap();
    let old = "message Orders {\n  int64 order_id = 1;\n  string status = 2;\n}\n";
    let new = "message Orders {\n  int64 order_id = 1;\n  string status = 2;\n  string note = 3;\n}\n";
    fs::create_dir_all(tmp.path().join("rpc")).unwrap();
    fs::write(tmp.path().join("rpc/orders.proto"), old).unwrap();
    let candidate = tmp.path().join("candidate.proto");
    fs::write(&candidate, new).unwrap();

    let engine = MergeEngine::new(tmp.path(), Box::new(LineExtractor));
    let outcome = engine
        .merge_file(Path::new("rpc/orders.proto"), &candidate)
        .unwrap();
    assert!(matches!(outcome, MergeOutcome::Merged { added: 1, .. }));

    let merged = fs::read_to_string(tmp.path().join("rpc/orders.proto")).unwrap();
    assert!(merged.contains("string note = 3;"));
    let status_at = merged.find("string status").unwrap();
    let note_at = merged.find("string note").unwrap();
    assert!(note_at > status_at);
}
