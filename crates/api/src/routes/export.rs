use axum::{
    extract::{Path, Query, State},
    http::{HeaderMap, header},
};
use bson::doc;
use serde::Deserialize;

use agrocoop_services::export::{csv, pdf, reports};
use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid};

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ExportFormat {
    #[default]
    Csv,
    Pdf,
}

#[derive(Debug, Deserialize)]
pub struct ExportQuery {
    #[serde(default)]
    pub format: ExportFormat,
}

fn render(
    format: ExportFormat,
    title: &str,
    filename: &str,
    headers: &[&str],
    rows: &[Vec<String>],
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let (bytes, content_type, extension) = match format {
        ExportFormat::Csv => (
            csv::render(headers, rows).map_err(ApiError::Internal)?,
            "text/csv",
            "csv",
        ),
        ExportFormat::Pdf => (
            pdf::render(title, headers, rows).map_err(ApiError::Internal)?,
            "application/pdf",
            "pdf",
        ),
    };

    let mut response_headers = HeaderMap::new();
    if let Ok(value) = content_type.parse() {
        response_headers.insert(header::CONTENT_TYPE, value);
    }
    let disposition = format!("attachment; filename=\"{}.{}\"", filename, extension);
    if let Ok(value) = disposition.parse() {
        response_headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((response_headers, bytes))
}

pub async fn projects(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    authorize(&state, cid, auth.user_id, Action::ViewReports).await?;

    let projects = state
        .projects
        .base
        .find_many(doc! { "company_id": cid }, Some(doc! { "created_at": -1 }))
        .await?;

    let rows = reports::project_rows(&projects);
    render(
        query.format,
        "Projects Report",
        "projects",
        &reports::PROJECT_HEADERS,
        &rows,
    )
}

pub async fn resources(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(company_id): Path<String>,
    Query(query): Query<ExportQuery>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    authorize(&state, cid, auth.user_id, Action::ViewReports).await?;

    let resources = state.resources.find_by_company(cid).await?;

    let rows = reports::resource_rows(&resources);
    render(
        query.format,
        "Resources Report",
        "resources",
        &reports::RESOURCE_HEADERS,
        &rows,
    )
}

pub async fn outputs(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    Query(query): Query<ExportQuery>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    authorize(&state, cid, auth.user_id, Action::ViewReports).await?;

    let project = state.projects.get(cid, pid).await?;

    let rows = reports::output_rows(&project);
    let title = format!("Outputs Report: {}", project.title);
    render(
        query.format,
        &title,
        "outputs",
        &reports::OUTPUT_HEADERS,
        &rows,
    )
}
