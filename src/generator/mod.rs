//! # Generator Module
//!
//! The artifact pipeline: one [`TableSchema`](crate::schema::TableSchema) in,
//! four coupled artifacts out (data model, persistence access, request/response
//! contracts, remote-call contract).
//!
//! ## Architecture
//!
//! ```text
//! TableSchema → fragment rendering → marker splicing → template tree render
//!                                                    → (or merge, on re-run)
//! ```
//!
//! 1. **Fragments** - Askama templates render the computed regions (fields,
//!    persistence functions, wire messages) from the schema
//! 2. **Splicing** - each marker region in the scaffold becomes one
//!    replacement rule carrying its rendered fragment
//! 3. **Rendering** - the scaffold tree is stamped into the output directory
//!    with `stub`/`Stub` placeholders rewritten to the table's names
//! 4. **Merging** - when a sidecar file proves the output tree was generated
//!    before, artifacts are reconciled through the merge engine instead of
//!    colliding
//!
//! ## Generated Structure
//!
//! ```text
//! out/
//! ├── .modelgen.json        # Sidecar metadata for later invocations
//! ├── model/
//! │   ├── order.rs          # Data model
//! │   └── base.rs           # Shared audit columns (embed-base-model only)
//! ├── dao/
//! │   └── order_dao.rs      # Persistence skeletons
//! ├── api/
//! │   └── order_types.rs    # Request/response contracts
//! └── rpc/
//!     └── order.proto       # Remote-call contract
//! ```

pub mod project;
pub mod templates;

pub use project::{generate, GeneratedBatch};
pub use templates::{FieldView, TableView};

use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::ValueEnum;
use rust_embed::RustEmbed;
use serde::{Deserialize, Serialize};

use crate::template::{DirSource, EmbeddedSource, TemplateTree};

/// The embedded default scaffold bundle.
#[derive(RustEmbed)]
#[folder = "scaffold/"]
pub struct Scaffold;

/// File-naming casing for generated artifacts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum NameCasing {
    /// `order_item_dao.rs`
    Snake,
    /// `orderItem_dao.rs`
    Camel,
}

/// Flat option set controlling artifact generation
#[derive(Debug, Clone)]
pub struct GenOptions {
    /// Embed the shared base model instead of inlining audit columns
    pub embed_base_model: bool,
    /// Casing applied to the `stub` name token in file names and module paths
    pub casing: NameCasing,
    /// Generate the extended persistence function set (list, page, unique
    /// lookups) in addition to the basic one
    pub extended_api: bool,
    /// Give each table its own subdirectory under the output root
    pub nested_layout: bool,
}

impl Default for GenOptions {
    fn default() -> Self {
        GenOptions {
            embed_base_model: false,
            casing: NameCasing::Snake,
            extended_api: false,
            nested_layout: false,
        }
    }
}

/// Per-invocation registry of template trees.
///
/// Constructed once and passed through the pipeline; there is deliberately no
/// process-wide template registry. With no custom root configured it opens
/// the embedded scaffold bundle.
#[derive(Debug, Clone, Default)]
pub struct TemplateCatalog {
    custom_root: Option<PathBuf>,
}

impl TemplateCatalog {
    pub fn new() -> Self {
        TemplateCatalog::default()
    }

    /// Use an on-disk template tree instead of the embedded bundle.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        TemplateCatalog {
            custom_root: Some(root.into()),
        }
    }

    /// Open the catalog's template tree.
    pub fn open(&self) -> Result<TemplateTree, crate::template::TemplateError> {
        match &self.custom_root {
            Some(root) => TemplateTree::load(Box::new(DirSource::new(root.clone()))),
            None => TemplateTree::load(Box::new(EmbeddedSource::<Scaffold>::new())),
        }
    }
}

/// Sidecar metadata file name, written alongside generated output.
pub const SIDECAR_FILE: &str = ".modelgen.json";

/// Small sidecar record persisted in the output root.
///
/// Later invocations that add related artifacts to the same tree read it back
/// to keep layout and naming consistent, and to know that existing files were
/// generated (and are therefore merge candidates rather than collisions).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SidecarMeta {
    /// Originating schema identifier (e.g. `ddl:orders`, `idl:Order`)
    pub source: String,
    /// Tables already generated into this tree
    pub tables: Vec<String>,
    pub nested_layout: bool,
    pub casing: NameCasing,
    /// RFC 3339 timestamp of the last generation
    pub generated_at: String,
}

impl SidecarMeta {
    /// Read the sidecar from an output root, `None` when the tree was never
    /// generated into.
    pub fn load(root: &Path) -> anyhow::Result<Option<Self>> {
        let path = root.join(SIDECAR_FILE);
        if !path.exists() {
            return Ok(None);
        }
        let raw = std::fs::read_to_string(&path)
            .with_context(|| format!("reading sidecar {}", path.display()))?;
        let meta = serde_json::from_str(&raw)
            .with_context(|| format!("parsing sidecar {}", path.display()))?;
        Ok(Some(meta))
    }

    /// Write the sidecar into an output root.
    pub fn store(&self, root: &Path) -> anyhow::Result<()> {
        let path = root.join(SIDECAR_FILE);
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(&path, raw).with_context(|| format!("writing sidecar {}", path.display()))?;
        Ok(())
    }

    /// Record one more generated table, deduplicating by name.
    pub fn record_table(&mut self, table: &str) {
        if !self.tables.iter().any(|t| t == table) {
            self.tables.push(table.to_string());
        }
    }
}
