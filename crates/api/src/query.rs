//! Shared query parameter types for API handlers.

use insight_core::types::DbId;
use serde::Deserialize;

use crate::error::AppError;

/// `?userId=` scoping parameter for per-user listings.
///
/// Kept optional at the extractor level so a missing value produces the
/// API's JSON error body rather than axum's plain-text rejection.
#[derive(Debug, Deserialize)]
pub struct UserScopeParams {
    #[serde(rename = "userId")]
    pub user_id: Option<DbId>,
}

impl UserScopeParams {
    /// The requested user id, or a `400 BAD_REQUEST` when absent.
    pub fn require(&self) -> Result<DbId, AppError> {
        self.user_id
            .ok_or_else(|| AppError::BadRequest("userId query parameter is required".into()))
    }
}
