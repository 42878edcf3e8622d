use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Body returned for every failed request that is not a form re-display.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    pub status: String,
    pub message: String,
}
