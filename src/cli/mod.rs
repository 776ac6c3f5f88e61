//! # CLI Module
//!
//! Command-line entry points for the modelgen artifact generator.
//!
//! ## Commands
//!
//! ### `model`
//!
//! Generate the artifact set from `CREATE TABLE` statements:
//!
//! ```bash
//! modelgen model --ddl schema.sql --output src/generated
//! ```
//!
//! ### `introspect`
//!
//! Generate from exported information-schema column rows:
//!
//! ```bash
//! modelgen introspect --rows columns.json --table orders
//! ```
//!
//! ### `document`
//!
//! Synthesize a schema from one representative JSON record:
//!
//! ```bash
//! modelgen document --sample order.json --table orders
//! ```
//!
//! ### `idl`
//!
//! Generate from a pre-parsed IDL message list:
//!
//! ```bash
//! modelgen idl --idl messages.json
//! ```
//!
//! ### `template`
//!
//! Stamp an arbitrary template tree with literal replacement rules:
//!
//! ```bash
//! modelgen template --root skeleton/ --output my-service \
//!     -D ~stubService=orderService
//! ```

mod commands;


pub use commands::{run_cli, Cli, Commands, GenFlags};
