//! Revision API endpoint.

use axum::extract::State;

use super::{success, ApiResult};
use crate::models::RevisionInfo;
use crate::AppState;

/// GET /api/revision - Get the current revision info.
pub async fn get_revision(State(state): State<AppState>) -> ApiResult<RevisionInfo> {
    let info = state
        .repo
        .get_revision_info()
        .await
        .map_err(|e| e.with_revision(0))?;

    let revision_id = info.revision_id;
    success(info, revision_id)
}
