use axum::{Json, extract::{Path, State}};
use serde::Serialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{parse_oid, require_member};

#[derive(Debug, Serialize)]
pub struct ActivityResponse {
    pub id: String,
    pub message: String,
    pub created_at: String,
}

/// Latest 50 entries for the company, newest first.
pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
) -> Result<Json<Vec<ActivityResponse>>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let entries = state.fanout.recent_activity(cid).await?;

    let response = entries
        .into_iter()
        .map(|e| ActivityResponse {
            id: e.id.map(|id| id.to_hex()).unwrap_or_default(),
            message: e.message,
            created_at: e.created_at.try_to_rfc3339_string().unwrap_or_default(),
        })
        .collect();

    Ok(Json(response))
}
