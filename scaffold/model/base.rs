//! Shared audit columns embedded by generated models.

use serde::{Deserialize, Serialize};

/// Audit columns every embedded model shares.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Base {
    pub create_at: chrono::DateTime<chrono::Utc>,
    pub update_at: chrono::DateTime<chrono::Utc>,
}
