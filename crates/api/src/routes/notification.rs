use axum::{Json, extract::{Path, State}};
use serde::Serialize;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{parse_oid, require_member};

#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub id: String,
    pub message: String,
    pub link: Option<String>,
    pub is_read: bool,
    pub created_at: String,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
) -> Result<Json<Vec<NotificationResponse>>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let notifications = state.fanout.user_notifications(cid, auth.user_id).await?;

    let response = notifications
        .into_iter()
        .map(|n| NotificationResponse {
            id: n.id.map(|id| id.to_hex()).unwrap_or_default(),
            message: n.message,
            link: n.link,
            is_read: n.is_read,
            created_at: n.created_at.try_to_rfc3339_string().unwrap_or_default(),
        })
        .collect();

    Ok(Json(response))
}

pub async fn mark_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, notification_id)): Path<(String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let nid = parse_oid(&notification_id, "notification_id")?;
    require_member(&state, cid, auth.user_id).await?;

    // `updated` is false both for an unknown id and for an already-read
    // notification, so absence is not distinguished here.
    let updated = state.fanout.mark_read(auth.user_id, nid).await?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}

pub async fn mark_all_read(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let updated = state.fanout.mark_all_read(cid, auth.user_id).await?;

    Ok(Json(serde_json::json!({ "updated": updated })))
}
