use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::Deserialize;
use validator::Validate;

use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid, require_member};
use super::project::{CommentResponse, comment_response};

#[derive(Debug, Deserialize, Validate)]
pub struct AddCommentRequest {
    #[validate(length(min = 1, message = "Comment text is required"))]
    pub text: String,
}

pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    Json(body): Json<AddCommentRequest>,
) -> Result<(StatusCode, Json<CommentResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    authorize(&state, cid, auth.user_id, Action::Comment).await?;
    body.validate()?;

    let project = state.projects.get(cid, pid).await?;

    let (comment, team) = state
        .projects
        .add_comment(cid, pid, auth.user_id, auth.name.clone(), body.text)
        .await?;

    state.fanout.activity(
        cid,
        format!("{} commented on '{}'", auth.name, project.title),
    );
    state.fanout.notify(
        cid,
        &team,
        auth.user_id,
        format!("{} commented on '{}'", auth.name, project.title),
        Some(format!("/projects/{}", pid.to_hex())),
    );

    Ok((StatusCode::CREATED, Json(comment_response(comment))))
}

/// Deletion is author-only; the check lives in the mutation itself, so
/// membership is the only gate here.
pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, comment_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let coid = parse_oid(&comment_id, "comment_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let project = state.projects.get(cid, pid).await?;

    state
        .projects
        .delete_comment(cid, pid, coid, auth.user_id)
        .await?;

    state.fanout.activity(
        cid,
        format!("{} deleted a comment on '{}'", auth.name, project.title),
    );

    Ok(StatusCode::NO_CONTENT)
}
