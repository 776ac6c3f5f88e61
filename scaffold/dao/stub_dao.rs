//! Persistence access for stub rows.
//!
//! Function bodies are skeletons; fill them in for your storage engine.
//! Re-generation only ever appends functions you do not have yet.

use super::stub::Stub;

// ==== generated sections: keep this line ====

// <gen:dao_methods>
// </gen:dao_methods>

// <gen:dao_extended>
// </gen:dao_extended>
