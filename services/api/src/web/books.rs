//! services/api/src/web/books.rs
//!
//! Book endpoints.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use reading_tracker_core::{library, validation, BookDraft};
use std::sync::Arc;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;
use crate::web::rest::{BookRequest, BookResponse};
use crate::web::state::AppState;

fn draft_from(req: &BookRequest) -> Result<BookDraft, ApiError> {
    Ok(validation::book_draft(
        req.folder_id,
        &req.title,
        &req.author,
        req.total_pages,
        req.current_page,
    )?)
}

/// GET /books/ - Books in the requester's folders
#[utoipa::path(
    get,
    path = "/books/",
    responses(
        (status = 200, description = "Books owned by the requester", body = Vec<BookResponse>),
        (status = 401, description = "Not signed in")
    )
)]
pub async fn list_books_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
) -> Result<Json<Vec<BookResponse>>, ApiError> {
    let books = library::user_books(state.db.as_ref(), user_id).await?;
    Ok(Json(books.into_iter().map(Into::into).collect()))
}

/// POST /books/add/ - Add a book to one of the requester's folders
#[utoipa::path(
    post,
    path = "/books/add/",
    request_body = BookRequest,
    responses(
        (status = 201, description = "Book created", body = BookResponse),
        (status = 400, description = "Invalid fields, or the requester has no folders"),
        (status = 403, description = "Folder of another user"),
        (status = 404, description = "No such folder")
    )
)]
pub async fn add_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Json(req): Json<BookRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = draft_from(&req)?;
    let book = library::add_book(state.db.as_ref(), user_id, draft).await?;
    info!(book_id = book.id, folder_id = book.folder_id, "Book added");
    Ok((StatusCode::CREATED, Json(BookResponse::from(book))))
}

/// GET /books/{book_id}/ - Book detail
#[utoipa::path(
    get,
    path = "/books/{book_id}/",
    params(("book_id" = i64, Path, description = "The book to show.")),
    responses(
        (status = 200, description = "The book", body = BookResponse),
        (status = 404, description = "No such book")
    )
)]
pub async fn book_detail_handler(
    State(state): State<Arc<AppState>>,
    Path(book_id): Path<i64>,
) -> Result<Json<BookResponse>, ApiError> {
    let book = library::book_detail(state.db.as_ref(), book_id).await?;
    Ok(Json(book.into()))
}

/// POST /books/{book_id}/edit/ - Edit a book
#[utoipa::path(
    post,
    path = "/books/{book_id}/edit/",
    request_body = BookRequest,
    params(("book_id" = i64, Path, description = "The book to edit.")),
    responses(
        (status = 200, description = "Book updated", body = BookResponse),
        (status = 400, description = "Invalid fields"),
        (status = 403, description = "Book or target folder of another user"),
        (status = 404, description = "No such book or folder")
    )
)]
pub async fn edit_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(book_id): Path<i64>,
    Json(req): Json<BookRequest>,
) -> Result<Json<BookResponse>, ApiError> {
    let draft = draft_from(&req)?;
    let book = library::edit_book(state.db.as_ref(), user_id, book_id, draft).await?;
    Ok(Json(book.into()))
}

/// POST /books/{book_id}/delete/ - Delete a book
#[utoipa::path(
    post,
    path = "/books/{book_id}/delete/",
    params(("book_id" = i64, Path, description = "The book to delete.")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 403, description = "Book of another user"),
        (status = 404, description = "No such book")
    )
)]
pub async fn delete_book_handler(
    State(state): State<Arc<AppState>>,
    Extension(user_id): Extension<Uuid>,
    Path(book_id): Path<i64>,
) -> Result<StatusCode, ApiError> {
    library::delete_book(state.db.as_ref(), user_id, book_id).await?;
    info!(book_id, %user_id, "Book deleted");
    Ok(StatusCode::NO_CONTENT)
}
