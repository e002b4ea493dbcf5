//! HTTP API response DTOs.

use serde::{Deserialize, Serialize};

/// Current roster snapshot
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterDto {
    pub users: Vec<String>,
}
