use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use agrocoop_db::models::{Resource, ResourceCategory, ResourceStatus};
use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid, require_member};
use super::project::{AllocationResponse, allocation_response};

#[derive(Debug, Serialize)]
pub struct ResourceResponse {
    pub id: String,
    pub name: String,
    pub category: ResourceCategory,
    pub quantity: f64,
    pub unit: String,
    pub status: ResourceStatus,
    pub created_at: String,
    pub updated_at: String,
}

fn to_response(r: Resource) -> ResourceResponse {
    ResourceResponse {
        id: r.id.map(|id| id.to_hex()).unwrap_or_default(),
        name: r.name,
        category: r.category,
        quantity: r.quantity,
        unit: r.unit,
        status: r.status,
        created_at: r.created_at.try_to_rfc3339_string().unwrap_or_default(),
        updated_at: r.updated_at.try_to_rfc3339_string().unwrap_or_default(),
    }
}

#[derive(Debug, Deserialize, Validate)]
pub struct CreateResourceRequest {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    pub category: ResourceCategory,
    #[validate(range(min = 0.0, message = "Quantity must not be negative"))]
    pub quantity: f64,
    #[validate(length(min = 1, message = "Unit is required"))]
    pub unit: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct UpdateResourceRequest {
    #[validate(length(min = 1, message = "Name must not be empty"))]
    pub name: Option<String>,
    pub category: Option<ResourceCategory>,
    #[validate(range(min = 0.0, message = "Quantity must not be negative"))]
    pub quantity: Option<f64>,
    pub unit: Option<String>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AllocateRequest {
    pub resource_id: String,
    #[validate(range(exclusive_min = 0.0, message = "Quantity must be positive"))]
    pub quantity: f64,
}

pub async fn list(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
) -> Result<Json<Vec<ResourceResponse>>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let resources = state.resources.find_by_company(cid).await?;
    Ok(Json(resources.into_iter().map(to_response).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
    Json(body): Json<CreateResourceRequest>,
) -> Result<(StatusCode, Json<ResourceResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    authorize(&state, cid, auth.user_id, Action::ManageResources).await?;
    body.validate()?;

    let resource = state
        .resources
        .create(cid, body.name, body.category, body.quantity, body.unit)
        .await?;

    state.fanout.activity(
        cid,
        format!(
            "{} added resource '{}' ({} {})",
            auth.name, resource.name, resource.quantity, resource.unit
        ),
    );

    Ok((StatusCode::CREATED, Json(to_response(resource))))
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, resource_id)): Path<(String, String)>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let rid = parse_oid(&resource_id, "resource_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let resource = state.resources.get(cid, rid).await?;
    Ok(Json(to_response(resource)))
}

pub async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, resource_id)): Path<(String, String)>,
    Json(body): Json<UpdateResourceRequest>,
) -> Result<Json<ResourceResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let rid = parse_oid(&resource_id, "resource_id")?;
    authorize(&state, cid, auth.user_id, Action::ManageResources).await?;
    body.validate()?;

    state
        .resources
        .update(cid, rid, body.name, body.category, body.quantity, body.unit)
        .await?;

    let resource = state.resources.get(cid, rid).await?;

    state.fanout.activity(
        cid,
        format!("{} updated resource '{}'", auth.name, resource.name),
    );

    Ok(Json(to_response(resource)))
}

pub async fn delete(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, resource_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let rid = parse_oid(&resource_id, "resource_id")?;
    authorize(&state, cid, auth.user_id, Action::ManageResources).await?;

    let resource = state.resources.get(cid, rid).await?;
    state.resources.delete(cid, rid).await?;

    state.fanout.activity(
        cid,
        format!("{} removed resource '{}'", auth.name, resource.name),
    );

    Ok(StatusCode::NO_CONTENT)
}

pub async fn allocate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    Json(body): Json<AllocateRequest>,
) -> Result<(StatusCode, Json<AllocationResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let rid = parse_oid(&body.resource_id, "resource_id")?;
    authorize(&state, cid, auth.user_id, Action::AllocateResources).await?;
    body.validate()?;

    let record = state.resources.allocate(cid, pid, rid, body.quantity).await?;

    let project = state.projects.get(cid, pid).await?;
    state.fanout.activity(
        cid,
        format!(
            "{} allocated {} {} of {} to '{}'",
            auth.name, record.quantity, record.unit, record.name, project.title
        ),
    );

    Ok((StatusCode::CREATED, Json(allocation_response(record))))
}

pub async fn deallocate(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, resource_id)): Path<(String, String, String)>,
) -> Result<Json<AllocationResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let rid = parse_oid(&resource_id, "resource_id")?;
    authorize(&state, cid, auth.user_id, Action::AllocateResources).await?;

    let record = state.resources.deallocate(cid, pid, rid).await?;

    let project = state.projects.get(cid, pid).await?;
    state.fanout.activity(
        cid,
        format!(
            "{} returned {} {} of {} from '{}'",
            auth.name, record.quantity, record.unit, record.name, project.title
        ),
    );

    Ok(Json(allocation_response(record)))
}
