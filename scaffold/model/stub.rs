//! Data model for stub rows.
//!
//! Generated file. Edit freely; re-generation merges new declarations in and
//! backs the file up first, it never overwrites your changes.

use serde::{Deserialize, Serialize};

// <gen:nested>
// </gen:nested>

// <gen:table_comment>
// </gen:table_comment>
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Stub {
// <gen:base>
// </gen:base>
// <gen:model_fields>
// </gen:model_fields>
}
