use axum::{Json, extract::State, http::{HeaderMap, StatusCode, header}};
use bson::{doc, oid::ObjectId};
use serde::{Deserialize, Serialize};
use validator::Validate;

use agrocoop_db::models::Role;
use agrocoop_services::auth::session_cookie;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Display name is required"))]
    pub display_name: String,
    #[validate(length(min = 8, message = "Password must be at least 8 characters"))]
    pub password: String,
    #[validate(length(min = 1, message = "Company name is required"))]
    pub company_name: String,
}

#[derive(Debug, Deserialize, Validate)]
pub struct LoginRequest {
    #[validate(email(message = "Invalid email address"))]
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: u64,
    pub user: UserResponse,
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub company_id: String,
}

fn to_user_response(user: agrocoop_db::models::User) -> UserResponse {
    UserResponse {
        id: user.id.map(|id| id.to_hex()).unwrap_or_default(),
        email: user.email,
        display_name: user.display_name,
        role: user.role,
        company_id: user.company_id.to_hex(),
    }
}

fn auth_cookie(token: &str, max_age: u64) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = session_cookie(token, max_age).parse() {
        headers.insert(header::SET_COOKIE, value);
    }
    headers
}

/// Sign-up creates the company and its first (admin) user as a unit. The
/// owner's id is generated up front so the company document can reference
/// it before the user document exists.
pub async fn register(
    State(state): State<AppState>,
    Json(body): Json<RegisterRequest>,
) -> Result<(StatusCode, HeaderMap, Json<AuthResponse>), ApiError> {
    body.validate()?;

    let password_hash = state.auth.hash_password(&body.password)?;

    let owner_id = ObjectId::new();
    let company = state
        .companies
        .create(body.company_name.clone(), owner_id)
        .await?;
    let company_id = company.id.ok_or_else(|| {
        ApiError::Internal("Company created without an id".to_string())
    })?;

    let user = match state
        .users
        .create_with_id(
            owner_id,
            company_id,
            body.email.clone(),
            body.display_name.clone(),
            password_hash,
            Role::Admin,
        )
        .await
    {
        Ok(user) => user,
        Err(err) => {
            // Duplicate email must not leave the fresh company behind
            let _ = state
                .companies
                .base
                .delete_one(doc! { "_id": company_id })
                .await;
            return Err(err.into());
        }
    };

    let tokens = state
        .auth
        .generate_tokens(owner_id, &user.email, &user.display_name)?;

    let headers = auth_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(user),
    };

    Ok((StatusCode::CREATED, headers, Json(response)))
}

pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    body.validate()?;

    let user = state
        .users
        .find_by_email(&body.email)
        .await
        .map_err(|_| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    let password_hash = user
        .password_hash
        .as_ref()
        .ok_or_else(|| ApiError::Unauthorized("No password set".to_string()))?;

    let valid = state.auth.verify_password(&body.password, password_hash)?;
    if !valid {
        return Err(ApiError::Unauthorized("Invalid credentials".to_string()));
    }

    let user_id = user.id.ok_or_else(|| {
        ApiError::Internal("User stored without an id".to_string())
    })?;
    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, &user.display_name)?;

    let headers = auth_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(user),
    };

    Ok((headers, Json(response)))
}

pub async fn logout() -> Result<HeaderMap, ApiError> {
    Ok(auth_cookie("", 0))
}

pub async fn me(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<UserResponse>, ApiError> {
    let user = state.users.base.find_by_id(auth.user_id).await?;
    Ok(Json(to_user_response(user)))
}

pub async fn refresh(
    State(state): State<AppState>,
    Json(body): Json<RefreshRequest>,
) -> Result<(HeaderMap, Json<AuthResponse>), ApiError> {
    let claims = state.auth.verify_refresh_token(&body.refresh_token)?;
    let user_id = claims.user_id()?;

    let user = state.users.base.find_by_id(user_id).await?;

    let tokens = state
        .auth
        .generate_tokens(user_id, &user.email, &user.display_name)?;

    let headers = auth_cookie(&tokens.access_token, tokens.expires_in);

    let response = AuthResponse {
        access_token: tokens.access_token,
        refresh_token: tokens.refresh_token,
        expires_in: tokens.expires_in,
        user: to_user_response(user),
    };

    Ok((headers, Json(response)))
}
