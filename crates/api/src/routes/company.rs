use axum::{Json, extract::{Path, State}, http::StatusCode};
use serde::{Deserialize, Serialize};
use validator::Validate;

use agrocoop_db::models::Role;
use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid, require_member};

#[derive(Debug, Serialize)]
pub struct CompanyResponse {
    pub id: String,
    pub name: String,
    pub owner_id: String,
}

#[derive(Debug, Serialize)]
pub struct MemberResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
}

#[derive(Debug, Deserialize, Validate)]
pub struct AddMemberRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Display name is required"))]
    pub display_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[serde(default)]
    pub role: Role,
}

pub async fn get(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
) -> Result<Json<CompanyResponse>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let company = state.companies.base.find_by_id(cid).await?;

    Ok(Json(CompanyResponse {
        id: cid.to_hex(),
        name: company.name,
        owner_id: company.owner_id.to_hex(),
    }))
}

pub async fn members(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
) -> Result<Json<Vec<MemberResponse>>, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    require_member(&state, cid, auth.user_id).await?;

    let members = state.companies.find_members(cid).await?;

    let response = members
        .into_iter()
        .map(|u| MemberResponse {
            id: u.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: u.email,
            display_name: u.display_name,
            role: u.role,
        })
        .collect();

    Ok(Json(response))
}

pub async fn add_member(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
    Json(body): Json<AddMemberRequest>,
) -> Result<(StatusCode, Json<MemberResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    authorize(&state, cid, auth.user_id, Action::ManageUsers).await?;
    body.validate()?;

    let password_hash = state.auth.hash_password(&body.password)?;

    let user = state
        .users
        .create(
            cid,
            body.email.clone(),
            body.display_name.clone(),
            password_hash,
            body.role,
        )
        .await?;

    state.fanout.activity(
        cid,
        format!("{} added {} to the cooperative", auth.name, user.display_name),
    );

    Ok((
        StatusCode::CREATED,
        Json(MemberResponse {
            id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
            email: user.email,
            display_name: user.display_name,
            role: user.role,
        }),
    ))
}
