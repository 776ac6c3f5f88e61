use std::fmt;

/// Schema extraction error
///
/// Every variant is fatal for the invocation: extraction runs before any file
/// is written, so a schema error never leaves a partial output tree behind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SchemaError {
    /// The DDL text did not contain a parsable `CREATE TABLE` statement
    MalformedDdl {
        /// The offending fragment (trimmed for display)
        fragment: String,
    },
    /// A column definition could not be split into name and type
    UnresolvableColumn {
        /// Table the column belongs to
        table: String,
        /// The raw column definition line
        definition: String,
    },
    /// A column used a type with no entry in the dialect's lookup table
    UnsupportedType {
        /// Column name
        column: String,
        /// The unsupported source type
        ty: String,
    },
    /// Two columns in one table share a raw name
    DuplicateColumn {
        /// Table the columns belong to
        table: String,
        /// The duplicated column name
        column: String,
    },
    /// The pre-parsed IDL JSON did not match the expected message shape
    MalformedIdl {
        /// Description of what was missing or mistyped
        detail: String,
    },
    /// A document sample was not an object at the point a record was expected
    MalformedSample {
        /// Description of the offending value
        detail: String,
    },
    /// An introspection result carried no columns for the requested table
    EmptyIntrospection {
        /// The requested table name
        table: String,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SchemaError::MalformedDdl { fragment } => {
                write!(f, "malformed DDL, no parsable create-table statement near: {fragment}")
            }
            SchemaError::UnresolvableColumn { table, definition } => {
                write!(f, "table '{table}': unresolvable column definition: {definition}")
            }
            SchemaError::UnsupportedType { column, ty } => {
                write!(f, "column '{column}': unsupported type '{ty}'")
            }
            SchemaError::DuplicateColumn { table, column } => {
                write!(f, "table '{table}': duplicate column name '{column}'")
            }
            SchemaError::MalformedIdl { detail } => {
                write!(f, "malformed IDL message set: {detail}")
            }
            SchemaError::MalformedSample { detail } => {
                write!(f, "malformed document sample: {detail}")
            }
            SchemaError::EmptyIntrospection { table } => {
                write!(f, "introspection returned no columns for table '{table}'")
            }
        }
    }
}

impl std::error::Error for SchemaError {}
