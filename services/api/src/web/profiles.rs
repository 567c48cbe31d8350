//! services/api/src/web/profiles.rs
//!
//! Dashboard and profile endpoints.

use axum::{
    extract::{Path, State},
    Extension, Json,
};
use reading_tracker_core::profiles;
use std::sync::Arc;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::{
    DashboardResponse, ProfileRequest, ProfileResponse, PublicProfileResponse, UserResponse,
};
use crate::web::state::AppState;

/// GET /dashboard/ - Overall streak plus every folder with its books
#[utoipa::path(
    get,
    path = "/dashboard/",
    responses(
        (status = 200, description = "The requester's dashboard", body = DashboardResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn dashboard_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<DashboardResponse>, ApiError> {
    let dashboard = profiles::dashboard(state.db.as_ref(), user_id).await?;
    Ok(Json(DashboardResponse {
        reading_progress: dashboard.progress.into(),
        folders: dashboard.folders.into_iter().map(Into::into).collect(),
    }))
}

/// GET /profile/ - The requester's own profile
#[utoipa::path(
    get,
    path = "/profile/",
    responses(
        (status = 200, description = "The requester's profile", body = UserResponse),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<UserResponse>, ApiError> {
    let view = profiles::user_profile(state.db.as_ref(), user_id, user_id).await?;
    Ok(Json(view.user.into()))
}

/// POST /profile/ - Update username and email
#[utoipa::path(
    post,
    path = "/profile/",
    request_body = ProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = UserResponse),
        (status = 400, description = "Invalid fields"),
        (status = 409, description = "Username or email already taken")
    )
)]
pub async fn update_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<ProfileRequest>,
) -> Result<Json<UserResponse>, ApiError> {
    let user = profiles::update_profile(state.db.as_ref(), user_id, &req.username, &req.email).await?;
    Ok(Json(user.into()))
}

/// GET /user/{user_id}/ - Another user's profile
#[utoipa::path(
    get,
    path = "/user/{user_id}/",
    params(("user_id" = Uuid, Path, description = "The user to show.")),
    responses(
        (status = 200, description = "The user's profile", body = ProfileResponse),
        (status = 404, description = "No such user")
    )
)]
pub async fn user_profile_handler(
    State(state): State<Arc<AppState>>,
    Extension(requester): Extension<Uuid>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let view = profiles::user_profile(state.db.as_ref(), requester, user_id).await?;
    let mut user = UserResponse::from(view.user);
    if !view.is_owner {
        user.email = None;
    }
    Ok(Json(ProfileResponse {
        user,
        is_owner: view.is_owner,
    }))
}

/// GET /profiles/public/ - Users sharing at least one folder
#[utoipa::path(
    get,
    path = "/profiles/public/",
    responses(
        (status = 200, description = "Public readers and their overall streaks", body = Vec<PublicProfileResponse>)
    )
)]
pub async fn public_profiles_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<PublicProfileResponse>>, ApiError> {
    let readers = profiles::public_profiles(state.db.as_ref()).await?;
    Ok(Json(readers.into_iter().map(Into::into).collect()))
}
