//! Request/response contracts for the stub API.

use serde::{Deserialize, Serialize};

/// Request selecting one stub row by its key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubRequest {
// <gen:request_fields>
// </gen:request_fields>
}

/// Full stub payload returned by the API.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StubResponse {
// <gen:response_fields>
// </gen:response_fields>
}
