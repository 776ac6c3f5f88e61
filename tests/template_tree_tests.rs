use std::fs;

use modelgen::generator::{Scaffold, TemplateCatalog};
use modelgen::template::{DirSource, EmbeddedSource, ReplacementPlan, TemplateField, TemplateTree};

fn write_tree(root: &std::path::Path, files: &[(&str, &str)]) {
    for (rel, content) in files {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }
}

#[test]
fn test_render_rewrites_content_and_paths() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("tpl");
    write_tree(
        &src,
        &[(
            "svc/stub_service.rs",
            "pub struct StubService;\n\npub fn new_stub_service() -> StubService {\n    StubService\n}\n",
        )],
    );

    let mut plan = ReplacementPlan::new();
    plan.push(TemplateField::case_sensitive("stubService", "orderService"));
    plan.push(TemplateField::new("stub_service", "order_service"));

    let out = tmp.path().join("out");
    let mut tree = TemplateTree::load(Box::new(DirSource::new(src))).unwrap();
    tree.set_output_root(Some(&out), &[]);
    let written = tree.render(&plan).unwrap();

    assert_eq!(written.len(), 1);
    assert_eq!(written[0], out.join("svc/order_service.rs"));
    let content = fs::read_to_string(&written[0]).unwrap();
    assert!(content.contains("pub struct OrderService;"));
    assert!(content.contains("pub fn new_order_service() -> OrderService"));
}

#[test]
fn test_collision_aborts_before_any_write() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("tpl");
    write_tree(&src, &[("a.txt", "alpha"), ("b.txt", "beta")]);

    let out = tmp.path().join("out");
    fs::create_dir_all(&out).unwrap();
    fs::write(out.join("b.txt"), "already here").unwrap();

    let mut tree = TemplateTree::load(Box::new(DirSource::new(src))).unwrap();
    tree.set_output_root(Some(&out), &[]);
    let err = tree.render(&ReplacementPlan::new()).unwrap_err();

    let message = err.to_string();
    assert!(message.contains("b.txt"), "collision list names the path: {message}");
    // nothing else was written either
    assert!(!out.join("a.txt").exists());
    assert_eq!(fs::read_to_string(out.join("b.txt")).unwrap(), "already here");
}

#[test]
fn test_restrict_and_exclude_narrow_the_active_set() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("tpl");
    write_tree(
        &src,
        &[
            ("model/stub.rs", "m"),
            ("model/base.rs", "b"),
            ("dao/stub_dao.rs", "d"),
        ],
    );

    let mut tree = TemplateTree::load(Box::new(DirSource::new(src.clone()))).unwrap();
    tree.restrict_to(&["model"], &[]);
    assert_eq!(tree.active().len(), 2);

    let mut tree = TemplateTree::load(Box::new(DirSource::new(src))).unwrap();
    tree.exclude(&[], &["base.rs"]);
    assert_eq!(tree.active().len(), 2);
    assert!(tree.active().iter().all(|p| !p.ends_with("base.rs")));
}

#[test]
fn test_embedded_scaffold_matches_catalog() {
    let embedded = TemplateTree::load(Box::new(EmbeddedSource::<Scaffold>::new())).unwrap();
    let via_catalog = TemplateCatalog::new().open().unwrap();
    assert_eq!(embedded.active(), via_catalog.active());
    assert!(embedded
        .active()
        .iter()
        .any(|p| p == "model/stub.rs"));
    assert!(embedded.active().iter().any(|p| p == "rpc/stub.proto"));
}

#[test]
fn test_binary_files_copied_byte_for_byte() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("tpl");
    fs::create_dir_all(&src).unwrap();
    let logo: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0xFF, 0xFE, 0x00, 0x7F];
    fs::write(src.join("logo.png"), logo).unwrap();
    fs::write(src.join("stub.txt"), "stub content").unwrap();

    let mut plan = ReplacementPlan::new();
    plan.push(TemplateField::new("stub", "order"));

    let out = tmp.path().join("out");
    let mut tree = TemplateTree::load(Box::new(DirSource::new(src))).unwrap();
    tree.set_output_root(Some(&out), &[]);
    tree.render(&plan).unwrap();

    assert_eq!(fs::read(out.join("logo.png")).unwrap(), logo);
    assert_eq!(fs::read_to_string(out.join("order.txt")).unwrap(), "order content");
}

#[test]
fn test_missing_root_fails_enumeration() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("no_such_tree");

    let err = TemplateTree::load(Box::new(DirSource::new(src.clone()))).unwrap_err();
    assert!(
        err.to_string().contains("no_such_tree"),
        "error names the unreadable root: {err}"
    );
}

#[test]
fn test_unique_basename_lookup() {
    let tmp = tempfile::tempdir().unwrap();
    let src = tmp.path().join("tpl");
    write_tree(&src, &[("a/stub.rs", "one"), ("b/stub.rs", "two")]);

    let tree = TemplateTree::load(Box::new(DirSource::new(src))).unwrap();
    let err = tree.read_file("stub.rs").unwrap_err();
    assert!(err.to_string().contains("stub.rs"));
}
