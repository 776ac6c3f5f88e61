use std::fs;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};

use crate::generator::{generate, GenOptions, NameCasing, TemplateCatalog};
use crate::schema::{
    extract_from_ddl, extract_from_idl, extract_from_introspection, table_from_document,
    ColumnRow, DdlOptions, Dialect, TableSchema,
};
use crate::template::{DirSource, ReplacementPlan, TemplateField, TemplateTree};

/// Command-line interface for modelgen
///
/// Provides commands for extracting table schemas from the supported
/// back-ends and stamping out the coupled artifact set.
#[derive(Parser)]
#[command(name = "modelgen")]
#[command(about = "Schema-driven artifact generator", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Generation flags shared by every schema back-end
#[derive(Args, Debug, Clone)]
pub struct GenFlags {
    /// Output directory (default: ./<table>_gen_<HHMMSS>)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Use an on-disk template tree instead of the built-in scaffold
    #[arg(long)]
    pub templates: Option<PathBuf>,

    /// Place each table's artifacts under its own subdirectory
    #[arg(long, default_value_t = false)]
    pub nested: bool,

    /// lowerCamel file names instead of snake_case
    #[arg(long, default_value_t = false)]
    pub camel: bool,

    /// Embed the shared base model instead of inlining audit columns
    #[arg(long, default_value_t = false)]
    pub embed_base: bool,

    /// Also generate the extended lookup methods (unique columns, listing)
    #[arg(long, default_value_t = false)]
    pub extended: bool,
}

impl GenFlags {
    /// Resolve the flag set into pipeline options.
    pub fn options(&self) -> GenOptions {
        GenOptions {
            embed_base_model: self.embed_base,
            casing: if self.camel {
                NameCasing::Camel
            } else {
                NameCasing::Snake
            },
            extended_api: self.extended,
            nested_layout: self.nested,
        }
    }

    /// The template catalog the flags select.
    pub fn catalog(&self) -> TemplateCatalog {
        match &self.templates {
            Some(root) => TemplateCatalog::with_root(root.clone()),
            None => TemplateCatalog::new(),
        }
    }
}

/// Available CLI commands for modelgen
#[derive(Subcommand)]
pub enum Commands {
    /// Generate artifacts from `CREATE TABLE` statements in a DDL file
    Model {
        /// Path to the DDL file
        #[arg(short, long)]
        ddl: PathBuf,

        /// SQL dialect the DDL is written in
        #[arg(long, value_enum, default_value = "mysql")]
        dialect: Dialect,

        /// Only generate the listed tables (default: every table in the file)
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        tables: Option<Vec<String>>,

        #[command(flatten)]
        gen: GenFlags,
    },
    /// Generate artifacts from exported information-schema column rows
    Introspect {
        /// Path to a JSON array of column rows
        #[arg(short, long)]
        rows: PathBuf,

        /// Table name the rows describe
        #[arg(short, long)]
        table: String,

        /// SQL dialect the rows came from
        #[arg(long, value_enum, default_value = "mysql")]
        dialect: Dialect,

        #[command(flatten)]
        gen: GenFlags,
    },
    /// Generate artifacts from a sample document (JSON record)
    Document {
        /// Path to a JSON file holding one representative record
        #[arg(short, long)]
        sample: PathBuf,

        /// Name for the synthesized table
        #[arg(short, long)]
        table: String,

        #[command(flatten)]
        gen: GenFlags,
    },
    /// Generate artifacts from a pre-parsed IDL file (JSON message list)
    Idl {
        /// Path to the parsed IDL JSON
        #[arg(short, long)]
        idl: PathBuf,

        /// Only generate the listed messages (default: every message)
        #[arg(long, num_args = 1.., value_delimiter = ',')]
        messages: Option<Vec<String>>,

        #[command(flatten)]
        gen: GenFlags,
    },
    /// Stamp an arbitrary template tree with literal `key=value` rules
    Template {
        /// Template tree root directory
        #[arg(short, long)]
        root: PathBuf,

        /// Output directory
        #[arg(short, long)]
        output: PathBuf,

        /// Replacement rules, `key=value`; prefix the key with `~` to expand
        /// into both first-letter-case variants
        #[arg(short = 'D', long = "define", num_args = 1..)]
        defines: Vec<String>,
    },
}

/// Execute the CLI command provided by the user
///
/// # Errors
///
/// Returns an error if the input file cannot be read, schema extraction
/// fails, or rendering aborts (collision, missing marker, merge failure).
pub fn run_cli() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Model {
            ddl,
            dialect,
            tables,
            gen,
        } => {
            let text = fs::read_to_string(ddl)
                .with_context(|| format!("reading DDL file {}", ddl.display()))?;
            let extraction = extract_from_ddl(&text, &DdlOptions { dialect: *dialect })?;
            if !extraction.dependencies.is_empty() {
                println!(
                    "📎 References other tables: {}",
                    extraction.dependencies.join(", ")
                );
            }
            let selected: Vec<&TableSchema> = match tables {
                Some(names) => extraction
                    .tables
                    .iter()
                    .filter(|t| names.iter().any(|n| n == &t.name.raw || n == &t.name.snake))
                    .collect(),
                None => extraction.tables.iter().collect(),
            };
            anyhow::ensure!(
                !selected.is_empty(),
                "no matching CREATE TABLE statements in {}",
                ddl.display()
            );
            generate_each(&selected, gen, &format!("ddl:{}", ddl.display()))
        }
        Commands::Introspect {
            rows,
            table,
            dialect,
            gen,
        } => {
            let text = fs::read_to_string(rows)
                .with_context(|| format!("reading column rows {}", rows.display()))?;
            let parsed: Vec<ColumnRow> = serde_json::from_str(&text)
                .with_context(|| format!("parsing column rows {}", rows.display()))?;
            let schema = extract_from_introspection(&parsed, table, *dialect)?;
            generate_each(&[&schema], gen, &format!("introspect:{table}"))
        }
        Commands::Document { sample, table, gen } => {
            let text = fs::read_to_string(sample)
                .with_context(|| format!("reading sample {}", sample.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing sample {}", sample.display()))?;
            let schema = table_from_document(table, &value)?;
            generate_each(&[&schema], gen, &format!("document:{table}"))
        }
        Commands::Idl {
            idl,
            messages,
            gen,
        } => {
            let text = fs::read_to_string(idl)
                .with_context(|| format!("reading IDL file {}", idl.display()))?;
            let value: serde_json::Value = serde_json::from_str(&text)
                .with_context(|| format!("parsing IDL file {}", idl.display()))?;
            let schemas = extract_from_idl(&value)?;
            let selected: Vec<&TableSchema> = match messages {
                Some(names) => schemas
                    .iter()
                    .filter(|t| {
                        names
                            .iter()
                            .any(|n| n == &t.name.raw || n == &t.name.upper_camel)
                    })
                    .collect(),
                None => schemas.iter().collect(),
            };
            anyhow::ensure!(
                !selected.is_empty(),
                "no matching messages in {}",
                idl.display()
            );
            generate_each(&selected, gen, &format!("idl:{}", idl.display()))
        }
        Commands::Template {
            root,
            output,
            defines,
        } => {
            let mut plan = ReplacementPlan::new();
            for define in defines {
                let (key, value) = define.split_once('=').ok_or_else(|| {
                    anyhow::anyhow!("rule `{define}` is not of the form key=value")
                })?;
                let field = match key.strip_prefix('~') {
                    Some(stripped) => TemplateField::case_sensitive(stripped, value),
                    None => TemplateField::new(key, value),
                };
                plan.push(field);
            }
            let mut tree = TemplateTree::load(Box::new(DirSource::new(root.clone())))
                .with_context(|| format!("loading template tree {}", root.display()))?;
            tree.set_output_root(Some(output), &[]);
            let written = tree.render(&plan)?;
            for path in &written {
                println!("✅ Generated {}", path.display());
            }
            Ok(())
        }
    }
}

fn generate_each(tables: &[&TableSchema], gen: &GenFlags, source: &str) -> anyhow::Result<()> {
    let catalog = gen.catalog();
    let opts = gen.options();
    for table in tables {
        let batch = generate(table, &catalog, &opts, gen.output.as_deref(), source)?;
        println!(
            "📦 {} → {} ({} file(s))",
            table.name.raw,
            batch.output_root.display(),
            batch.written.len() + batch.merge_report.len()
        );
    }
    Ok(())
}
