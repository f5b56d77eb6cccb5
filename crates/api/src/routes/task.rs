use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use bson::oid::ObjectId;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use validator::Validate;

use agrocoop_db::models::TaskStatus;
use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid};
use super::project::{ProjectResponse, project_response};

#[derive(Debug, Deserialize, Validate)]
pub struct AddTaskRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub status: Option<TaskStatus>,
    #[serde(default)]
    pub assigned_to: Vec<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// Patch semantics: omitted fields are left unchanged. There is no way to
/// clear a deadline through this request; send a new value to move it.
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateTaskRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub status: Option<TaskStatus>,
    pub assigned_to: Option<Vec<String>>,
    pub deadline: Option<DateTime<Utc>>,
}

fn parse_assignees(ids: &[String]) -> Result<Vec<ObjectId>, ApiError> {
    ids.iter().map(|id| parse_oid(id, "assignee id")).collect()
}

pub async fn add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    Json(body): Json<AddTaskRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    authorize(&state, cid, auth.user_id, Action::EditTasks).await?;
    body.validate()?;

    let assigned_to = parse_assignees(&body.assigned_to)?;

    let mutation = state
        .projects
        .add_task(
            cid,
            pid,
            body.title,
            body.status.unwrap_or_default(),
            assigned_to,
            body.deadline.map(bson::DateTime::from_chrono),
        )
        .await?;

    state.fanout.activity(
        cid,
        format!(
            "{} added task '{}' to '{}'",
            auth.name, mutation.task.title, mutation.project.title
        ),
    );
    state.fanout.notify(
        cid,
        &mutation.notify,
        auth.user_id,
        format!(
            "You were assigned to task '{}' in '{}'",
            mutation.task.title, mutation.project.title
        ),
        Some(format!("/projects/{}", pid.to_hex())),
    );

    Ok((StatusCode::CREATED, Json(project_response(mutation.project))))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, task_id)): Path<(String, String, String)>,
    Json(body): Json<UpdateTaskRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    authorize(&state, cid, auth.user_id, Action::EditTasks).await?;
    body.validate()?;

    let assigned_to = match &body.assigned_to {
        Some(ids) => Some(parse_assignees(ids)?),
        None => None,
    };

    let mutation = state
        .projects
        .update_task(
            cid,
            pid,
            tid,
            body.title,
            body.status,
            assigned_to,
            body.deadline.map(bson::DateTime::from_chrono),
        )
        .await?;

    state.fanout.activity(
        cid,
        format!(
            "{} updated task '{}' in '{}'",
            auth.name, mutation.task.title, mutation.project.title
        ),
    );
    state.fanout.notify(
        cid,
        &mutation.notify,
        auth.user_id,
        format!(
            "Task '{}' in '{}' was updated",
            mutation.task.title, mutation.project.title
        ),
        Some(format!("/projects/{}", pid.to_hex())),
    );

    Ok(Json(project_response(mutation.project)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, task_id)): Path<(String, String, String)>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    authorize(&state, cid, auth.user_id, Action::EditTasks).await?;

    let project = state.projects.delete_task(cid, pid, tid).await?;

    state.fanout.activity(
        cid,
        format!("{} removed a task from '{}'", auth.name, project.title),
    );

    Ok(Json(project_response(project)))
}
