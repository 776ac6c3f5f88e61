//! # modelgen
//!
//! **modelgen** is a schema-driven artifact generator: it extracts a table
//! schema from one of four back-ends and stamps out a coupled set of source
//! artifacts (data model, persistence layer, request/response contract, and
//! RPC contract) that stay consistent with each other and safe to
//! regenerate.
//!
//! ## Overview
//!
//! A single table description can come from raw `CREATE TABLE` DDL text,
//! exported information-schema column rows, one representative schema-less
//! document, or a pre-parsed IDL message list. Whatever the back-end, the
//! result is the same normalized [`schema::TableSchema`], and everything
//! downstream of extraction is back-end agnostic.
//!
//! ## Architecture
//!
//! The library is organized into several key modules:
//!
//! - **[`schema`]** - Back-end extractors and the normalized table model
//! - **[`template`]** - Template trees, replacement plans, and rendering
//! - **[`splice`]** - Marker-delimited regions inside template files
//! - **[`merge`]** - Declaration-level merging for safe regeneration
//! - **[`generator`]** - The artifact pipeline tying the above together
//! - **[`cli`]** - Command-line entry points
//!
//! ### Generation Flow
//!
//! ```mermaid
//! sequenceDiagram
//!     participant User
//!     participant CLI as CLI<br/>(modelgen)
//!     participant Schema as schema::extract_from_ddl
//!     participant Templates as generator::templates
//!     participant Splice as splice
//!     participant Tree as template::TemplateTree
//!     participant Merge as merge::MergeEngine
//!     participant FS as File System
//!
//!     User->>CLI: modelgen model --ddl schema.sql
//!     CLI->>Schema: extract_from_ddl(text)
//!     Schema->>Schema: Parse CREATE TABLE<br/>statements
//!     Schema->>Schema: Map column types,<br/>pick primary key
//!     Schema-->>CLI: Vec<TableSchema>
//!
//!     CLI->>Templates: render field / method fragments
//!     Templates-->>CLI: Rendered fragments
//!
//!     CLI->>Splice: resolve marker regions
//!     Splice-->>CLI: One replacement rule per region
//!
//!     CLI->>Tree: render(plan)
//!     Tree->>Tree: Apply rules to content<br/>and path segments
//!
//!     alt First generation
//!         Tree->>FS: Write artifacts + sidecar
//!     else Tree was generated before
//!         Tree->>FS: Render into candidate dir
//!         CLI->>Merge: merge_file(existing, candidate)
//!         Merge->>Merge: Extract declarations,<br/>splice additions
//!         Merge->>FS: Backup, then overwrite
//!     end
//!
//!     CLI-->>User: ✅ Generated artifacts
//! ```
//!
//! ### Key Architectural Patterns
//!
//! 1. **Schema-Driven**: every artifact derives from one normalized table schema
//! 2. **Literal Replacement**: template stamping is ordered literal substitution,
//!    applied to file content and path segments alike
//! 3. **Marker Splicing**: computed regions live between begin/end comment
//!    markers and resolve to ordinary replacement rules
//! 4. **Declaration Merging**: regeneration adds new declarations after their
//!    anchors and never touches hand-edited bodies
//! 5. **Fail-Fast Rendering**: destination collisions abort a fresh render
//!    before a single file is written
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use modelgen::generator::{generate, GenOptions, TemplateCatalog};
//! use modelgen::schema::{extract_from_ddl, DdlOptions, Dialect};
//!
//! let ddl = std::fs::read_to_string("schema.sql")?;
//! let extraction = extract_from_ddl(&ddl, &DdlOptions { dialect: Dialect::Mysql })?;
//!
//! let catalog = TemplateCatalog::new();
//! for table in &extraction.tables {
//!     generate(table, &catalog, &GenOptions::default(), None, "ddl:schema.sql")?;
//! }
//! ```
//!
//! ## Generated Layout
//!
//! ```text
//! orders_gen_142233/
//! ├── .modelgen.json          # Sidecar: what was generated, and how
//! ├── model/
//! │   ├── orders.rs           # Data model struct
//! │   └── base.rs             # Shared audit columns (with --embed-base)
//! ├── dao/
//! │   └── orders_dao.rs       # Persistence methods
//! ├── api/
//! │   └── orders_types.rs     # Request/response contract
//! └── rpc/
//!     └── orders.proto        # RPC contract
//! ```
//!
//! ## Regeneration
//!
//! Running the same command against an output tree that carries the sidecar
//! does not overwrite: artifacts are re-rendered into a candidate directory
//! and merged declaration by declaration. New methods are spliced in after
//! the last declaration both versions share; bodies you have edited by hand
//! survive untouched; a timestamped backup of every touched file lands under
//! `.modelgen_backup/` first.
//!
//! ```bash
//! # First run: fresh render
//! modelgen model --ddl schema.sql --output src/generated
//!
//! # Add a column to schema.sql, run again: merge, not overwrite
//! modelgen model --ddl schema.sql --output src/generated
//! ```

pub mod cli;
pub mod generator;
pub mod merge;
pub mod schema;
pub mod splice;
pub mod template;

pub use generator::{generate, GenOptions, NameCasing, TemplateCatalog};
pub use schema::{
    extract_from_ddl, extract_from_document, extract_from_idl, extract_from_introspection,
    Dialect, Field, TableSchema,
};
pub use template::{ReplacementPlan, TemplateField, TemplateTree};
