pub mod activity;
pub mod auth;
pub mod comment;
pub mod company;
pub mod export;
pub mod file;
pub mod notification;
pub mod output;
pub mod project;
pub mod resource;
pub mod task;

use bson::oid::ObjectId;
use agrocoop_db::models::Role;
use agrocoop_services::policy::{self, Action};

use crate::{error::ApiError, state::AppState};

pub(crate) fn parse_oid(value: &str, what: &str) -> Result<ObjectId, ApiError> {
    ObjectId::parse_str(value).map_err(|_| ApiError::BadRequest(format!("Invalid {}", what)))
}

/// Membership check for read endpoints: any role within the company passes.
pub(crate) async fn require_member(
    state: &AppState,
    company_id: ObjectId,
    user_id: ObjectId,
) -> Result<Role, ApiError> {
    Ok(state.companies.member_role(company_id, user_id).await?)
}

/// Membership plus policy gate for mutations and reports.
pub(crate) async fn authorize(
    state: &AppState,
    company_id: ObjectId,
    user_id: ObjectId,
    action: Action,
) -> Result<Role, ApiError> {
    let role = state.companies.member_role(company_id, user_id).await?;
    if !policy::can(role, action) {
        return Err(ApiError::Forbidden("Insufficient permissions".to_string()));
    }
    Ok(role)
}
