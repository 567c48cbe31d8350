//! services/api/src/web/folders.rs
//!
//! Folder endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use reading_tracker_core::{library, validation};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::{FolderDetailResponse, FolderRequest, FolderResponse};
use crate::web::state::AppState;

/// GET /folders/ - The requester's folders
#[utoipa::path(
    get,
    path = "/folders/",
    responses(
        (status = 200, description = "Folders owned by the requester", body = Vec<FolderResponse>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_folders_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let folders = library::user_folders(state.db.as_ref(), user_id).await?;
    Ok(Json(folders.into_iter().map(Into::into).collect()))
}

/// POST /folders/create/ - Create a folder
#[utoipa::path(
    post,
    path = "/folders/create/",
    request_body = FolderRequest,
    responses(
        (status = 201, description = "Folder created", body = FolderResponse),
        (status = 400, description = "Invalid folder name"),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn create_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<FolderRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = validation::folder_draft(&req.name, req.is_public)?;
    let folder = library::create_folder(state.db.as_ref(), user_id, draft).await?;
    info!(folder_id = folder.id, %user_id, "Folder created");
    Ok((StatusCode::CREATED, Json(FolderResponse::from(folder))))
}

/// GET /folders/{folder_id}/ - A folder and its books
#[utoipa::path(
    get,
    path = "/folders/{folder_id}/",
    params(("folder_id" = i64, Path, description = "The folder to show.")),
    responses(
        (status = 200, description = "The folder and its books", body = FolderDetailResponse),
        (status = 403, description = "Private folder of another user"),
        (status = 404, description = "No such folder")
    )
)]
pub async fn folder_detail_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(folder_id): Path<i64>,
) -> Result<Json<FolderDetailResponse>, ApiError> {
    let detail = library::folder_detail(state.db.as_ref(), user_id, folder_id).await?;
    Ok(Json(detail.into()))
}

/// POST /folders/{folder_id}/edit/ - Rename a folder or change its visibility
#[utoipa::path(
    post,
    path = "/folders/{folder_id}/edit/",
    request_body = FolderRequest,
    params(("folder_id" = i64, Path, description = "The folder to edit.")),
    responses(
        (status = 200, description = "Folder updated", body = FolderResponse),
        (status = 400, description = "Invalid folder name"),
        (status = 403, description = "Folder of another user"),
        (status = 404, description = "No such folder")
    )
)]
pub async fn edit_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(folder_id): Path<i64>,
    Json(req): Json<FolderRequest>,
) -> Result<Json<FolderResponse>, ApiError> {
    let draft = validation::folder_draft(&req.name, req.is_public)?;
    let folder = library::edit_folder(state.db.as_ref(), user_id, folder_id, draft).await?;
    Ok(Json(folder.into()))
}

/// POST /folders/{folder_id}/delete/ - Delete a folder and its books
#[utoipa::path(
    post,
    path = "/folders/{folder_id}/delete/",
    params(("folder_id" = i64, Path, description = "The folder to delete.")),
    responses(
        (status = 204, description = "Folder deleted"),
        (status = 403, description = "Folder of another user"),
        (status = 404, description = "No such folder")
    )
)]
pub async fn delete_folder_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(folder_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    library::delete_folder(state.db.as_ref(), user_id, folder_id).await?;
    info!(folder_id, %user_id, "Folder deleted");
    Ok(StatusCode::NO_CONTENT)
}

/// GET /folders/public/ - Every public folder
#[utoipa::path(
    get,
    path = "/folders/public/",
    responses(
        (status = 200, description = "Public folders of all users", body = Vec<FolderResponse>)
    )
)]
pub async fn public_folders_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<FolderResponse>>, ApiError> {
    let folders = library::public_folders(state.db.as_ref()).await?;
    Ok(Json(folders.into_iter().map(Into::into).collect()))
}
