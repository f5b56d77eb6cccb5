use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid};
use super::project::{OutputResponse, output_response};

#[derive(Debug, Deserialize, Validate)]
pub struct AddOutputRequest {
    #[validate(length(min = 1, message = "Description is required"))]
    pub description: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be positive"))]
    pub quantity: f64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
    pub date: Option<DateTime<Utc>>,
}

pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    Json(body): Json<AddOutputRequest>,
) -> Result<(StatusCode, Json<OutputResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    authorize(&state, cid, auth.user_id, Action::RecordOutputs).await?;
    body.validate()?;

    let project = state.projects.get(cid, pid).await?;

    let date = body
        .date
        .map(bson::DateTime::from_chrono)
        .unwrap_or_else(bson::DateTime::now);

    let output = state
        .projects
        .add_output(cid, pid, body.description, body.quantity, body.unit, date)
        .await?;

    state.fanout.activity(
        cid,
        format!(
            "{} recorded output '{}' ({} {}) for '{}'",
            auth.name, output.description, output.quantity, output.unit, project.title
        ),
    );

    Ok((StatusCode::CREATED, Json(output_response(output))))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, output_id)): Path<(String, String, String)>,
) -> Result<Json<OutputResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let oid = parse_oid(&output_id, "output_id")?;
    authorize(&state, cid, auth.user_id, Action::RecordOutputs).await?;

    let output = state.projects.delete_output(cid, pid, oid).await?;

    state.fanout.activity(
        cid,
        format!("{} removed output '{}'", auth.name, output.description),
    );

    Ok(Json(output_response(output)))
}
