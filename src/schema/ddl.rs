//! `CREATE TABLE` extraction.
//!
//! The parser is deliberately line-of-sight: statements are split with a
//! quote-aware scanner, the column list is split on top-level commas, and each
//! entry is either a table-level constraint or a column definition. Type
//! resolution goes through the dialect lookup tables in [`super::types`].

use once_cell::sync::Lazy;
use regex::Regex;

use super::error::SchemaError;
use super::types::{host_type, Dialect};
use super::{Field, NameSet, NullStyle, TableSchema};

/// Options controlling DDL extraction
#[derive(Debug, Clone)]
pub struct DdlOptions {
    /// Dialect whose type lookup table is applied
    pub dialect: Dialect,
}

impl Default for DdlOptions {
    fn default() -> Self {
        DdlOptions {
            dialect: Dialect::Mysql,
        }
    }
}

/// Result of extracting one DDL text: every parsed table plus the aggregated
/// list of tables referenced by foreign keys, in first-seen order.
#[derive(Debug, Clone)]
pub struct DdlExtraction {
    pub tables: Vec<TableSchema>,
    pub dependencies: Vec<String>,
}

static CREATE_TABLE_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)^\s*create\s+table\s+(?:if\s+not\s+exists\s+)?[`"]?([A-Za-z_][A-Za-z0-9_]*)[`"]?\s*\("#)
        .expect("create-table regex")
});

static COLUMN_RE: Lazy<Regex> = Lazy::new(|| {
    // name, type (multi-word spellings listed first), optional (args), remainder
    Regex::new(
        r#"(?is)^[`"]?([A-Za-z_][A-Za-z0-9_]*)[`"]?\s+(timestamp with time zone|time with time zone|double precision|character varying|[A-Za-z][A-Za-z0-9_]*)\s*(?:\(([^)]*)\))?\s*(.*)$"#,
    )
    .expect("column regex")
});

static REFERENCES_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"(?is)references\s+[`"]?([A-Za-z_][A-Za-z0-9_]*)[`"]?"#).expect("references regex")
});

static TABLE_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)comment\s*=?\s*'([^']*)'"#).expect("table comment regex"));

static COLUMN_COMMENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)comment\s+'([^']*)'"#).expect("column comment regex"));

/// Parse every `CREATE TABLE` statement in `ddl`.
///
/// One statement yields one [`TableSchema`]; foreign-key references across all
/// statements are aggregated into [`DdlExtraction::dependencies`]. Statements
/// that are not create-table (inserts, index creation) are skipped, but a text
/// with no create-table statement at all is a [`SchemaError::MalformedDdl`].
pub fn extract_from_ddl(ddl: &str, opts: &DdlOptions) -> Result<DdlExtraction, SchemaError> {
    let mut tables = Vec::new();
    let mut dependencies: Vec<String> = Vec::new();
    for statement in split_statements(ddl) {
        if !CREATE_TABLE_RE.is_match(&statement) {
            continue;
        }
        let table = parse_create_table(&statement, opts, &mut dependencies)?;
        tables.push(table);
    }
    if tables.is_empty() {
        let fragment: String = ddl.trim().chars().take(80).collect();
        return Err(SchemaError::MalformedDdl { fragment });
    }
    Ok(DdlExtraction {
        tables,
        dependencies,
    })
}

fn parse_create_table(
    statement: &str,
    opts: &DdlOptions,
    dependencies: &mut Vec<String>,
) -> Result<TableSchema, SchemaError> {
    let caps = CREATE_TABLE_RE.captures(statement).ok_or_else(|| {
        SchemaError::MalformedDdl {
            fragment: statement.trim().chars().take(80).collect(),
        }
    })?;
    let table_name = caps.get(1).map(|m| m.as_str()).unwrap_or_default().to_string();
    let body_start = caps.get(0).map(|m| m.end()).unwrap_or(0);
    let (body, tail) = balanced_body(&statement[body_start..]).ok_or_else(|| {
        SchemaError::MalformedDdl {
            fragment: statement.trim().chars().take(80).collect(),
        }
    })?;

    let table_comment = TABLE_COMMENT_RE
        .captures(tail)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let mut fields: Vec<Field> = Vec::new();
    let mut pk_columns: Vec<String> = Vec::new();
    let mut unique_columns: Vec<String> = Vec::new();

    for entry in split_top_level(body) {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let upper = entry.to_uppercase();
        if upper.starts_with("PRIMARY KEY") {
            pk_columns = parenthesized_names(entry);
            continue;
        }
        if upper.starts_with("UNIQUE") {
            let names = parenthesized_names(entry);
            if names.len() == 1 {
                unique_columns.push(names[0].clone());
            }
            continue;
        }
        if upper.starts_with("CONSTRAINT") || upper.starts_with("FOREIGN KEY") {
            if let Some(caps) = REFERENCES_RE.captures(entry) {
                let dep = caps[1].to_string();
                if !dependencies.contains(&dep) {
                    dependencies.push(dep);
                }
            }
            continue;
        }
        if upper.starts_with("KEY") || upper.starts_with("INDEX") || upper.starts_with("CHECK") {
            continue;
        }
        let tag = fields.len() as u32 + 1;
        fields.push(parse_column(entry, &table_name, tag, opts.dialect)?);
    }

    if fields.is_empty() {
        return Err(SchemaError::MalformedDdl {
            fragment: statement.trim().chars().take(80).collect(),
        });
    }

    for field in fields.iter_mut() {
        if pk_columns.iter().any(|c| c == &field.name.raw) {
            field.primary_key = true;
            field.null_style = NullStyle::Required;
        }
        if unique_columns.iter().any(|c| c == &field.name.raw) {
            field.unique = true;
        }
    }

    TableSchema::assemble(&table_name, fields, table_comment, vec![])
}

fn parse_column(
    entry: &str,
    table: &str,
    tag: u32,
    dialect: Dialect,
) -> Result<Field, SchemaError> {
    let caps = COLUMN_RE
        .captures(entry)
        .ok_or_else(|| SchemaError::UnresolvableColumn {
            table: table.to_string(),
            definition: entry.to_string(),
        })?;
    let name = caps[1].to_string();
    let mut type_words = caps[2].trim().to_lowercase();
    let args = caps.get(3).map(|m| m.as_str().trim().to_string());
    let rest = caps.get(4).map(|m| m.as_str()).unwrap_or("");
    let rest_upper = rest.to_uppercase();

    let unsigned = rest_upper.starts_with("UNSIGNED");
    if type_words.starts_with("timestamp with time zone") {
        type_words = "timestamptz".to_string();
    } else if type_words.starts_with("timestamp") && type_words != "timestamptz" {
        type_words = "timestamp".to_string();
    } else if type_words.starts_with("time with time zone") {
        type_words = "timetz".to_string();
    }

    // MySQL's bool spelling
    let host = if dialect == Dialect::Mysql && type_words == "tinyint" && args.as_deref() == Some("1")
    {
        "bool"
    } else {
        host_type(dialect, &name, &type_words, unsigned)?
    };

    let not_null = rest_upper.contains("NOT NULL");
    let has_default = rest_upper.contains("DEFAULT");
    let auto_increment = rest_upper.contains("AUTO_INCREMENT")
        || type_words == "serial"
        || type_words == "bigserial"
        || type_words == "smallserial";
    let primary_key = rest_upper.contains("PRIMARY KEY");
    let unique = rest_upper.contains("UNIQUE");
    let comment = COLUMN_COMMENT_RE
        .captures(rest)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .unwrap_or_default();

    let null_style = if not_null || primary_key {
        NullStyle::Required
    } else if has_default {
        NullStyle::Defaulted
    } else {
        NullStyle::OptionWrapped
    };

    Ok(Field {
        name: NameSet::derive(&name),
        host_type: host.to_string(),
        tag,
        null_style,
        comment,
        primary_key,
        auto_increment,
        unique,
    })
}

/// Split a DDL text into statements on `;`, ignoring separators inside
/// single/double/backtick quotes and `--` line comments.
fn split_statements(ddl: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut quote: Option<char> = None;
    let mut chars = ddl.chars().peekable();
    while let Some(c) = chars.next() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '-' if chars.peek() == Some(&'-') => {
                    // consume to end of line
                    for n in chars.by_ref() {
                        if n == '\n' {
                            current.push('\n');
                            break;
                        }
                    }
                }
                ';' => {
                    if !current.trim().is_empty() {
                        out.push(std::mem::take(&mut current));
                    }
                }
                _ => current.push(c),
            },
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

/// Return the body inside the already-opened parenthesis and the tail after
/// its matching close, or `None` when parentheses never balance.
fn balanced_body(after_open: &str) -> Option<(&str, &str)> {
    let mut depth = 1usize;
    let mut quote: Option<char> = None;
    for (i, c) in after_open.char_indices() {
        match quote {
            Some(q) => {
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => quote = Some(c),
                '(' => depth += 1,
                ')' => {
                    depth -= 1;
                    if depth == 0 {
                        return Some((&after_open[..i], &after_open[i + 1..]));
                    }
                }
                _ => {}
            },
        }
    }
    None
}

/// Split a column-list body on commas at parenthesis depth zero.
fn split_top_level(body: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut current = String::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for c in body.chars() {
        match quote {
            Some(q) => {
                current.push(c);
                if c == q {
                    quote = None;
                }
            }
            None => match c {
                '\'' | '"' | '`' => {
                    quote = Some(c);
                    current.push(c);
                }
                '(' => {
                    depth += 1;
                    current.push(c);
                }
                ')' => {
                    depth = depth.saturating_sub(1);
                    current.push(c);
                }
                ',' if depth == 0 => out.push(std::mem::take(&mut current)),
                _ => current.push(c),
            },
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

/// Pull quoted/bare identifiers out of the first parenthesized group.
fn parenthesized_names(entry: &str) -> Vec<String> {
    let Some(open) = entry.find('(') else {
        return vec![];
    };
    let Some((inner, _)) = balanced_body(&entry[open + 1..]) else {
        return vec![];
    };
    inner
        .split(',')
        .map(|s| s.trim().trim_matches('`').trim_matches('"').to_string())
        .filter(|s| !s.is_empty())
        .collect()
}
