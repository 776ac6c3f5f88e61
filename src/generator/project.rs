//! Artifact pipeline orchestration.
//!
//! Fresh generation stamps the scaffold tree into the output directory;
//! re-generation renders the same tree into a candidate directory and
//! reconciles every already-present artifact through the merge engine.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use walkdir::WalkDir;

use super::templates::{
    render_dao_extended, render_dao_methods, render_model_fields, render_request_fields,
    render_response_fields, render_rpc_fields, FieldView,
};
use super::{GenOptions, NameCasing, SidecarMeta, TemplateCatalog};
use crate::merge::{BlockExtractor, LineExtractor, MergeEngine, MergeOutcome};
use crate::schema::TableSchema;
use crate::splice::{splice_into_plan, MarkerRegion};
use crate::template::{ReplacementPlan, TemplateField};

/// What one generation run produced.
#[derive(Debug)]
pub struct GeneratedBatch {
    /// The concrete output root actually used
    pub output_root: PathBuf,
    /// Files written fresh
    pub written: Vec<PathBuf>,
    /// Per-file merge messages (re-generation only)
    pub merge_report: Vec<(PathBuf, String)>,
    /// Where pre-merge backups were copied (re-generation only)
    pub backup_root: Option<PathBuf>,
}

/// Generate (or re-generate) all four artifacts for one table.
///
/// With no previous generation in the output tree this is a plain render:
/// collisions abort the whole batch with the full path list. When the
/// sidecar proves the tree was generated before, artifacts are rendered into
/// a candidate directory and merged file by file; merge failures are
/// file-scoped and reported, never fatal to the batch.
pub fn generate(
    table: &TableSchema,
    catalog: &TemplateCatalog,
    opts: &GenOptions,
    output: Option<&Path>,
    source: &str,
) -> anyhow::Result<GeneratedBatch> {
    let mut tree = catalog.open()?;
    if !opts.embed_base_model {
        tree.exclude(&[], &["base.rs"]);
    }

    tree.set_output_root(output, &[&table.name.snake, "gen"]);
    let base_out = tree.output_root().to_path_buf();

    let sidecar = SidecarMeta::load(&base_out)?;

    // On a re-run the sidecar owns layout and naming, so artifacts land
    // where the first run put them regardless of the current flags.
    let mut opts = opts.clone();
    if let Some(meta) = &sidecar {
        opts.nested_layout = meta.nested_layout;
        opts.casing = meta.casing;
    }
    let opts = &opts;

    let token = match opts.casing {
        NameCasing::Snake => table.name.snake.clone(),
        NameCasing::Camel => table.name.lower_camel.clone(),
    };

    let plan = build_plan(&tree, table, opts, &token)?;
    match sidecar {
        None => {
            let render_root = table_root(&base_out, opts, &token);
            tree.set_output_root(Some(&render_root), &[]);
            let written = tree.render(&plan)?;
            for path in &written {
                println!("✅ Generated {}", path.display());
            }
            let mut meta = SidecarMeta {
                source: source.to_string(),
                tables: vec![],
                nested_layout: opts.nested_layout,
                casing: opts.casing,
                generated_at: chrono::Local::now().to_rfc3339(),
            };
            meta.record_table(&table.name.snake);
            fs::create_dir_all(&base_out)
                .with_context(|| format!("creating output root {}", base_out.display()))?;
            meta.store(&base_out)?;
            Ok(GeneratedBatch {
                output_root: base_out,
                written,
                merge_report: vec![],
                backup_root: None,
            })
        }
        Some(mut meta) => {
            let stamp = chrono::Local::now().format("%H%M%S");
            let candidate_root = base_out.join(format!(".modelgen_candidate_{stamp}"));
            let render_root = table_root(&candidate_root, opts, &token);
            tree.set_output_root(Some(&render_root), &[]);
            tree.render(&plan)?;

            let outcome = reconcile(&base_out, &candidate_root)?;
            fs::remove_dir_all(&candidate_root).ok();

            meta.record_table(&table.name.snake);
            meta.generated_at = chrono::Local::now().to_rfc3339();
            meta.store(&base_out)?;

            for (path, message) in &outcome.merge_report {
                println!("🔁 {} → {message}", path.display());
            }
            for path in &outcome.written {
                println!("✅ Generated {}", path.display());
            }
            Ok(GeneratedBatch {
                output_root: base_out,
                written: outcome.written,
                merge_report: outcome.merge_report,
                backup_root: outcome.backup_root,
            })
        }
    }
}

fn table_root(base: &Path, opts: &GenOptions, token: &str) -> PathBuf {
    if opts.nested_layout {
        base.join(token)
    } else {
        base.to_path_buf()
    }
}

/// Build the full replacement plan: one splice rule per marker region, then
/// the `Stub`/`stub` name rules. Splices come first so region match literals
/// still match the untouched template content.
fn build_plan(
    tree: &crate::template::TemplateTree,
    table: &TableSchema,
    opts: &GenOptions,
    token: &str,
) -> anyhow::Result<ReplacementPlan> {
    let nested = if table.nested_blocks.is_empty() {
        String::new()
    } else {
        table.nested_blocks.join("\n")
    };
    let table_comment = if table.comment.is_empty() {
        String::new()
    } else {
        format!("/// {}", table.comment)
    };
    let base = if opts.embed_base_model {
        "    #[serde(flatten)]\n    pub base: super::base::Base,".to_string()
    } else {
        String::new()
    };
    let dao_extended = if opts.extended_api {
        render_dao_extended(table)?
    } else {
        String::new()
    };
    let pk = FieldView::from_field(table.pk());
    let rpc_key = format!("  {} {} = 1;", pk.wire, pk.raw);

    let regions = [
        (MarkerRegion::named("nested"), "stub.rs", nested),
        (MarkerRegion::named("table_comment"), "stub.rs", table_comment),
        (MarkerRegion::named("base"), "stub.rs", base),
        (
            MarkerRegion::named("model_fields"),
            "stub.rs",
            render_model_fields(table, opts.embed_base_model)?,
        ),
        (
            MarkerRegion::named("dao_methods"),
            "stub_dao.rs",
            render_dao_methods(table)?,
        ),
        (MarkerRegion::named("dao_extended"), "stub_dao.rs", dao_extended),
        (
            MarkerRegion::named("request_fields"),
            "stub_types.rs",
            render_request_fields(table)?,
        ),
        (
            MarkerRegion::named("response_fields"),
            "stub_types.rs",
            render_response_fields(table)?,
        ),
        (
            MarkerRegion::named("rpc_fields"),
            "stub.proto",
            render_rpc_fields(table)?,
        ),
        (MarkerRegion::named("rpc_key_field"), "stub.proto", rpc_key),
    ];
    let mut plan = ReplacementPlan::new();
    splice_into_plan(tree, &regions, &mut plan)?;
    plan.push(TemplateField::new("Stub", table.name.upper_camel.clone()));
    plan.push(TemplateField::new("stub", token.to_string()));
    Ok(plan)
}

struct ReconcileOutcome {
    written: Vec<PathBuf>,
    merge_report: Vec<(PathBuf, String)>,
    backup_root: Option<PathBuf>,
}

/// Walk the candidate tree: files already present in the output tree go
/// through the merge engine, new files move into place.
fn reconcile(base_out: &Path, candidate_root: &Path) -> anyhow::Result<ReconcileOutcome> {
    let rust_engine = MergeEngine::new(base_out, Box::new(BlockExtractor));
    let line_engine = MergeEngine::new(base_out, Box::new(LineExtractor));

    let mut written = Vec::new();
    let mut merge_report = Vec::new();
    let mut backup_root = None;

    for entry in WalkDir::new(candidate_root)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
    {
        let candidate = entry.path();
        let rel = candidate
            .strip_prefix(candidate_root)
            .expect("walk stays under candidate root")
            .to_path_buf();
        let dest = base_out.join(&rel);
        if dest.exists() {
            let engine: &MergeEngine = if is_line_oriented(&rel) {
                &line_engine
            } else {
                &rust_engine
            };
            match engine.merge_file(&rel, candidate) {
                Ok(MergeOutcome::Merged { added, .. }) => {
                    backup_root = Some(engine.backup_root().to_path_buf());
                    merge_report.push((rel, format!("merged {added} new declaration(s)")));
                }
                Ok(MergeOutcome::NoOp) => {
                    merge_report.push((rel, "up to date".to_string()));
                }
                Err(err) => {
                    // file-scoped: report and keep going
                    merge_report.push((rel, format!("aborted: {err}")));
                }
            }
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)
                    .with_context(|| format!("creating {}", parent.display()))?;
            }
            fs::rename(candidate, &dest)
                .with_context(|| format!("placing new artifact {}", dest.display()))?;
            written.push(dest);
        }
    }
    Ok(ReconcileOutcome {
        written,
        merge_report,
        backup_root,
    })
}

fn is_line_oriented(rel: &Path) -> bool {
    rel.extension().is_some_and(|e| e == "proto")
}
