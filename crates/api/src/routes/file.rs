use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::{HeaderMap, StatusCode, header},
};
use bson::oid::ObjectId;
use tracing::warn;

use agrocoop_services::BlobStore;
use agrocoop_services::policy::Action;

use crate::{error::ApiError, extractors::auth::AuthUser, state::AppState};

use super::{authorize, parse_oid, require_member};
use super::project::{FileRefResponse, file_ref_response};

/// Upload via multipart form data, single `file` field. The metadata record
/// is written first; a failed blob write rolls the record back.
async fn upload(
    state: &AppState,
    auth: &AuthUser,
    company_id: ObjectId,
    project_id: ObjectId,
    task_id: Option<ObjectId>,
    mut multipart: Multipart,
) -> Result<FileRefResponse, ApiError> {
    authorize(state, company_id, auth.user_id, Action::ManageFiles).await?;

    let mut file_data: Option<(String, String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let name = field.file_name().unwrap_or("unnamed").to_string();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("Failed to read file: {}", e)))?;
        file_data = Some((name, content_type, bytes.to_vec()));
    }

    let (name, content_type, bytes) =
        file_data.ok_or_else(|| ApiError::BadRequest("Missing 'file' field".to_string()))?;

    let file = state
        .projects
        .add_file(
            company_id,
            project_id,
            task_id,
            name,
            content_type,
            bytes.len() as u64,
            auth.user_id,
        )
        .await?;

    let key = BlobStore::file_key(project_id, task_id, file.id, &file.name);
    if let Err(e) = state.storage.put(&key, &bytes).await {
        // Blob write failed, take the metadata record back out.
        if let Err(del) = state
            .projects
            .delete_file(company_id, project_id, task_id, file.id)
            .await
        {
            warn!(error = %del, key, "Metadata rollback after failed blob write failed");
        }
        return Err(ApiError::Internal(format!("File write failed: {}", e)));
    }

    state.fanout.activity(
        company_id,
        format!("{} uploaded file '{}'", auth.name, file.name),
    );

    Ok(file_ref_response(file))
}

/// Remove metadata first, then the blob. A missing blob is fine; any other
/// storage failure is logged and swallowed since the record is already gone.
async fn remove(
    state: &AppState,
    auth: &AuthUser,
    company_id: ObjectId,
    project_id: ObjectId,
    task_id: Option<ObjectId>,
    file_id: ObjectId,
) -> Result<(), ApiError> {
    authorize(state, company_id, auth.user_id, Action::ManageFiles).await?;

    let file = state
        .projects
        .delete_file(company_id, project_id, task_id, file_id)
        .await?;

    let key = BlobStore::file_key(project_id, task_id, file.id, &file.name);
    if let Err(e) = state.storage.delete(&key).await {
        warn!(error = %e, key, "Blob delete failed (metadata already removed)");
    }

    state.fanout.activity(
        company_id,
        format!("{} deleted file '{}'", auth.name, file.name),
    );

    Ok(())
}

async fn download(
    state: &AppState,
    auth: &AuthUser,
    company_id: ObjectId,
    project_id: ObjectId,
    task_id: Option<ObjectId>,
    file_id: ObjectId,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    require_member(state, company_id, auth.user_id).await?;

    let project = state.projects.get(company_id, project_id).await?;

    let file = match task_id {
        Some(tid) => project
            .tasks
            .iter()
            .find(|t| t.id == tid)
            .ok_or_else(|| ApiError::NotFound("Task not found".to_string()))?
            .files
            .iter()
            .find(|f| f.id == file_id),
        None => project.files.iter().find(|f| f.id == file_id),
    }
    .cloned()
    .ok_or_else(|| ApiError::NotFound("File not found".to_string()))?;

    let key = BlobStore::file_key(project_id, task_id, file.id, &file.name);
    let bytes = state
        .storage
        .get(&key)
        .await
        .map_err(|_| ApiError::NotFound("File content not found".to_string()))?;

    let mut headers = HeaderMap::new();
    if let Ok(value) = file.content_type.parse() {
        headers.insert(header::CONTENT_TYPE, value);
    }
    if let Ok(value) = format!("attachment; filename=\"{}\"", file.name).parse() {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok((headers, bytes))
}

pub async fn upload_project_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id)): Path<(String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FileRefResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let file = upload(&state, &auth, cid, pid, None, multipart).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

pub async fn upload_task_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, task_id)): Path<(String, String, String)>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<FileRefResponse>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    let file = upload(&state, &auth, cid, pid, Some(tid), multipart).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

pub async fn delete_project_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, file_id)): Path<(String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let fid = parse_oid(&file_id, "file_id")?;
    remove(&state, &auth, cid, pid, None, fid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_task_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, task_id, file_id)): Path<(String, String, String, String)>,
) -> Result<StatusCode, ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    let fid = parse_oid(&file_id, "file_id")?;
    remove(&state, &auth, cid, pid, Some(tid), fid).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn download_project_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, file_id)): Path<(String, String, String)>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let fid = parse_oid(&file_id, "file_id")?;
    download(&state, &auth, cid, pid, None, fid).await
}

pub async fn download_task_file(
    State(state): State<AppState>,
    auth: AuthUser,
    Path((company_id, project_id, task_id, file_id)): Path<(String, String, String, String)>,
) -> Result<(HeaderMap, Vec<u8>), ApiError> {
    let cid = parse_oid(&company_id, "company_id")?;
    let pid = parse_oid(&project_id, "project_id")?;
    let tid = parse_oid(&task_id, "task_id")?;
    let fid = parse_oid(&file_id, "file_id")?;
    download(&state, &auth, cid, pid, Some(tid), fid).await
}
