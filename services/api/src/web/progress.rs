//! services/api/src/web/progress.rs
//!
//! Endpoints for recording and reading a book's progress.

use axum::{
    extract::{rejection::FormRejection, Path, State},
    response::{IntoResponse, Redirect},
    Extension, Form, Json,
};
use reading_tracker_core::progress;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{info, warn};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::ProgressResponse;
use crate::web::state::AppState;

pub const DASHBOARD_PATH: &str = "/dashboard/";

#[derive(Deserialize, ToSchema)]
pub struct UpdateProgressForm {
    /// Number of pages read since the last update; anything but a
    /// non-negative integer counts as 0.
    #[serde(default)]
    pub pages_read: Option<String>,
}

/// POST /books/{book_id}/progress/update/ - Record pages read
#[utoipa::path(
    post,
    path = "/books/{book_id}/progress/update/",
    request_body(content = UpdateProgressForm, content_type = "application/x-www-form-urlencoded"),
    params(("book_id" = i64, Path, description = "The book being read.")),
    responses(
        (status = 303, description = "Progress recorded; redirects to the dashboard"),
        (status = 401, description = "Not signed in"),
        (status = 403, description = "The book belongs to another user"),
        (status = 404, description = "No such book")
    )
)]
pub async fn update_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(book_id): Path<i64>,
    form: Result<Form<UpdateProgressForm>, FormRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // 1. Read the page delta, tolerating a missing or unreadable body
    let pages_read = match form {
        Ok(Form(form)) => form.pages_read,
        Err(rejection) => {
            warn!(book_id, "Unreadable progress form: {}", rejection);
            None
        }
    };

    // 2. Apply it to the book, its folder streak and the user's streak
    let today = state.clock.today();
    let update = progress::update_reading_progress(
        state.db.as_ref(),
        user_id,
        book_id,
        pages_read.as_deref(),
        today,
    )
    .await?;

    // 3. Log and send the reader back to the dashboard
    info!(
        book_id,
        pages = update.pages_applied,
        current_page = update.book.current_page,
        folder_streak = update.folder.streak_count,
        general_streak = update.progress.streak_count,
        "Reading progress recorded"
    );
    Ok(Redirect::to(DASHBOARD_PATH))
}

/// GET /books/{book_id}/progress/ - Current page and overall streak
#[utoipa::path(
    get,
    path = "/books/{book_id}/progress/",
    params(("book_id" = i64, Path, description = "The book to report on.")),
    responses(
        (status = 200, description = "Current progress", body = ProgressResponse),
        (status = 401, description = "Not signed in"),
        (status = 404, description = "No such book, or no progress recorded yet", body = crate::web::rest::ErrorResponse)
    )
)]
pub async fn get_progress_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(book_id): Path<i64>,
) -> Result<Json<ProgressResponse>, ApiError> {
    let snapshot = progress::get_reading_progress(state.db.as_ref(), user_id, book_id).await?;
    Ok(Json(ProgressResponse {
        current_page: snapshot.current_page,
        streak_count: snapshot.streak_count,
        last_read_date: snapshot.last_read_date,
    }))
}
