use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use agrocoop_db::models::{
    AllocatedResource, Comment, FileRef, Project, ProjectOutput, ProjectStatus, Task, TaskStatus,
};
use agrocoop_services::dao::base::PaginationParams;
use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid, require_member};

#[derive(Debug, Serialize)]
pub struct ProjectResponse {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub status: ProjectStatus,
    pub progress: u32,
    pub team: Vec<String>,
    pub tasks: Vec<TaskResponse>,
    pub comments: Vec<CommentResponse>,
    pub outputs: Vec<OutputResponse>,
    pub allocated_resources: Vec<AllocationResponse>,
    pub files: Vec<FileRefResponse>,
    pub created_by: String,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Debug, Serialize)]
pub struct TaskResponse {
    pub id: String,
    pub title: String,
    pub status: TaskStatus,
    pub assigned_to: Vec<String>,
    pub deadline: Option<String>,
    pub files: Vec<FileRefResponse>,
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: String,
    pub text: String,
    pub author_id: String,
    pub author_name: String,
    pub created_at: String,
}

#[derive(Debug, Serialize)]
pub struct OutputResponse {
    pub id: String,
    pub description: String,
    pub quantity: f64,
    pub unit: String,
    pub date: String,
}

#[derive(Debug, Serialize)]
pub struct AllocationResponse {
    pub resource_id: String,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
}

#[derive(Debug, Serialize)]
pub struct FileRefResponse {
    pub id: String,
    pub name: String,
    pub content_type: String,
    pub size: u64,
    pub uploaded_by: String,
    pub uploaded_at: String,
}

fn rfc3339(dt: bson::DateTime) -> String {
    dt.try_to_rfc3339_string().unwrap_or_default()
}

pub(crate) fn file_ref_response(f: FileRef) -> FileRefResponse {
    FileRefResponse {
        id: f.id.to_hex(),
        name: f.name,
        content_type: f.content_type,
        size: f.size,
        uploaded_by: f.uploaded_by.to_hex(),
        uploaded_at: rfc3339(f.uploaded_at),
    }
}

pub(crate) fn task_response(t: Task) -> TaskResponse {
    TaskResponse {
        id: t.id.to_hex(),
        title: t.title,
        status: t.status,
        assigned_to: t.assigned_to.iter().map(|a| a.to_hex()).collect(),
        deadline: t.deadline.map(rfc3339),
        files: t.files.into_iter().map(file_ref_response).collect(),
    }
}

pub(crate) fn comment_response(c: Comment) -> CommentResponse {
    CommentResponse {
        id: c.id.to_hex(),
        text: c.text,
        author_id: c.author_id.to_hex(),
        author_name: c.author_name,
        created_at: rfc3339(c.created_at),
    }
}

pub(crate) fn output_response(o: ProjectOutput) -> OutputResponse {
    OutputResponse {
        id: o.id.to_hex(),
        description: o.description,
        quantity: o.quantity,
        unit: o.unit,
        date: rfc3339(o.date),
    }
}

pub(crate) fn allocation_response(a: AllocatedResource) -> AllocationResponse {
    AllocationResponse {
        resource_id: a.resource_id.to_hex(),
        name: a.name,
        quantity: a.quantity,
        unit: a.unit,
    }
}

pub(crate) fn project_response(p: Project) -> ProjectResponse {
    ProjectResponse {
        id: p.id.map(|id| id.to_hex()).unwrap_or_default(),
        title: p.title,
        description: p.description,
        status: p.status,
        progress: p.progress,
        team: p.team.iter().map(|m| m.to_hex()).collect(),
        tasks: p.tasks.into_iter().map(task_response).collect(),
        comments: p.comments.into_iter().map(comment_response).collect(),
        outputs: p.outputs.into_iter().map(output_response).collect(),
        allocated_resources: p
            .allocated_resources
            .into_iter()
            .map(allocation_response)
            .collect(),
        files: p.files.into_iter().map(file_ref_response).collect(),
        created_by: p.created_by.to_hex(),
        created_at: rfc3339(p.created_at),
        updated_at: rfc3339(p.updated_at),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateProjectRequest {
    #[validate(length(min = 1, message = "Title is required"))]
    pub title: String,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
    /// Required non-empty by the schema, but display-only: the stored team
    /// is derived from task assignees and starts empty.
    #[validate(length(min = 1, message = "Team must not be empty"))]
    pub team: Vec<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProjectRequest {
    #[validate(length(min = 1, message = "Title must not be empty"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<ProjectStatus>,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
    Query(params): Query<PaginationParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let result = state.projects.find_by_company(cid, &params).await?;

    let items: Vec<ProjectResponse> = result.items.into_iter().map(project_response).collect();

    Ok(Json(serde_json::json!({
        "items": items,
        "total": result.total,
        "page": result.page,
        "per_page": result.per_page,
        "total_pages": result.total_pages,
    })))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
    Json(body): Json<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    authorize(&state, cid, auth.user_id, Action::CreateProject).await?;
    body.validate()?;

    let project = state
        .projects
        .create(
            cid,
            auth.user_id,
            body.title,
            body.description,
            body.status.unwrap_or_default(),
        )
        .await?;

    state.fanout.activity(
        cid,
        format!("{} created project '{}'", auth.name, project.title),
    );

    Ok((StatusCode::CREATED, Json(project_response(project))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let project = state.projects.get(cid, pid).await?;
    Ok(Json(project_response(project)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    Json(body): Json<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    authorize(&state, cid, auth.user_id, Action::EditProject).await?;
    body.validate()?;

    let before = state.projects.get(cid, pid).await?;
    let status_changed = body.status.is_some_and(|s| s != before.status);

    state
        .projects
        .update_fields(cid, pid, body.title, body.description, body.status)
        .await?;

    let project = state.projects.get(cid, pid).await?;

    state.fanout.activity(
        cid,
        format!("{} updated project '{}'", auth.name, project.title),
    );
    if status_changed {
        state.fanout.notify(
            cid,
            &project.team,
            auth.user_id,
            format!(
                "Project '{}' status changed to {:?}",
                project.title, project.status
            ),
            Some(format!("/projects/{}", pid.to_hex())),
        );
    }

    Ok(Json(project_response(project)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    authorize(&state, cid, auth.user_id, Action::DeleteProject).await?;

    let project = state.projects.get(cid, pid).await?;
    state.projects.delete(cid, pid).await?;

    state.fanout.activity(
        cid,
        format!("{} deleted project '{}'", auth.name, project.title),
    );

    Ok(StatusCode::NO_CONTENT)
}
