//! services/api/src/web/rest.rs
//!
//! Contains the router for the REST API, the payload structs shared by the
//! handlers, and the master definition for the OpenAPI specification.

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use chrono::{DateTime, NaiveDate, Utc};
use reading_tracker_core::domain::{Book, Folder, PublicProfile, ReadingProgress, User};
use reading_tracker_core::library::FolderWithBooks;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{OpenApi, ToSchema};
use uuid::Uuid;

use crate::web::{auth, books, folders, middleware::require_auth, profiles, progress, state::AppState};

//=========================================================================================
// OpenAPI Master Definition
//=========================================================================================

#[derive(OpenApi)]
#[openapi(
    paths(
        auth::signup_handler,
        auth::login_handler,
        auth::logout_handler,
        progress::update_progress_handler,
        progress::get_progress_handler,
        folders::list_folders_handler,
        folders::create_folder_handler,
        folders::folder_detail_handler,
        folders::edit_folder_handler,
        folders::delete_folder_handler,
        folders::public_folders_handler,
        books::list_books_handler,
        books::add_book_handler,
        books::book_detail_handler,
        books::edit_book_handler,
        books::delete_book_handler,
        profiles::dashboard_handler,
        profiles::profile_handler,
        profiles::update_profile_handler,
        profiles::user_profile_handler,
        profiles::public_profiles_handler,
    ),
    components(
        schemas(
            auth::SignupRequest,
            auth::LoginRequest,
            auth::AuthResponse,
            progress::UpdateProgressForm,
            FolderRequest,
            BookRequest,
            ProfileRequest,
            FolderResponse,
            BookResponse,
            FolderDetailResponse,
            ProgressResponse,
            StreakResponse,
            DashboardResponse,
            UserResponse,
            ProfileResponse,
            PublicProfileResponse,
            ErrorResponse,
        )
    ),
    tags(
        (name = "Reading Tracker API", description = "Folders, books, reading progress and streaks.")
    )
)]
pub struct ApiDoc;

//=========================================================================================
// Router
//=========================================================================================

/// Builds every API route on top of the shared state.
pub fn router(app_state: Arc<AppState>) -> Router {
    // Public routes (no auth required)
    let public_routes = Router::new()
        .route("/auth/signup", post(auth::signup_handler))
        .route("/auth/login", post(auth::login_handler))
        .route("/auth/logout", post(auth::logout_handler))
        .route("/folders/public/", get(folders::public_folders_handler))
        .route("/profiles/public/", get(profiles::public_profiles_handler));

    // Protected routes (auth required)
    let protected_routes = Router::new()
        .route("/dashboard/", get(profiles::dashboard_handler))
        .route(
            "/profile/",
            get(profiles::profile_handler).post(profiles::update_profile_handler),
        )
        .route("/user/{user_id}/", get(profiles::user_profile_handler))
        .route("/books/", get(books::list_books_handler))
        .route("/books/add/", post(books::add_book_handler))
        .route("/books/{book_id}/", get(books::book_detail_handler))
        .route("/books/{book_id}/edit/", post(books::edit_book_handler))
        .route("/books/{book_id}/delete/", post(books::delete_book_handler))
        .route("/books/{book_id}/progress/", get(progress::get_progress_handler))
        .route(
            "/books/{book_id}/progress/update/",
            post(progress::update_progress_handler),
        )
        .route("/folders/", get(folders::list_folders_handler))
        .route("/folders/my/", get(folders::list_folders_handler))
        .route("/folders/create/", post(folders::create_folder_handler))
        .route("/folders/{folder_id}/", get(folders::folder_detail_handler))
        .route("/folders/{folder_id}/edit/", post(folders::edit_folder_handler))
        .route("/folders/{folder_id}/delete/", post(folders::delete_folder_handler))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            require_auth,
        ));

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .with_state(app_state)
}

//=========================================================================================
// API Request Payloads
//=========================================================================================

#[derive(Deserialize, ToSchema)]
pub struct FolderRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Deserialize, ToSchema)]
pub struct BookRequest {
    pub folder_id: i64,
    pub title: String,
    pub author: String,
    pub total_pages: i64,
    #[serde(default)]
    pub current_page: i64,
}

#[derive(Deserialize, ToSchema)]
pub struct ProfileRequest {
    pub username: String,
    pub email: String,
}

//=========================================================================================
// API Response Payloads
//=========================================================================================

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FolderResponse {
    pub id: i64,
    pub owner_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub streak_count: u32,
    pub last_read_date: Option<NaiveDate>,
}

impl From<Folder> for FolderResponse {
    fn from(folder: Folder) -> Self {
        Self {
            id: folder.id,
            owner_id: folder.user_id,
            name: folder.name,
            created_at: folder.created_at,
            is_public: folder.is_public,
            streak_count: folder.streak_count,
            last_read_date: folder.last_read_date,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct BookResponse {
    pub id: i64,
    pub folder_id: i64,
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    pub current_page: u32,
    pub is_read: bool,
    pub pages_left: u32,
}

impl From<Book> for BookResponse {
    fn from(book: Book) -> Self {
        Self {
            pages_left: book.pages_left(),
            id: book.id,
            folder_id: book.folder_id,
            title: book.title,
            author: book.author,
            total_pages: book.total_pages,
            current_page: book.current_page,
            is_read: book.is_read,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct FolderDetailResponse {
    pub folder: FolderResponse,
    pub books: Vec<BookResponse>,
}

impl From<FolderWithBooks> for FolderDetailResponse {
    fn from(detail: FolderWithBooks) -> Self {
        Self {
            folder: detail.folder.into(),
            books: detail.books.into_iter().map(Into::into).collect(),
        }
    }
}

/// Progress of one book alongside the requester's overall streak.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProgressResponse {
    pub current_page: u32,
    pub streak_count: u32,
    pub last_read_date: Option<NaiveDate>,
}

/// The requester's overall streak.
#[derive(Serialize, Deserialize, ToSchema)]
pub struct StreakResponse {
    pub streak_count: u32,
    pub last_read_date: Option<NaiveDate>,
}

impl From<ReadingProgress> for StreakResponse {
    fn from(progress: ReadingProgress) -> Self {
        Self {
            streak_count: progress.streak_count,
            last_read_date: progress.last_read_date,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct DashboardResponse {
    pub reading_progress: StreakResponse,
    pub folders: Vec<FolderDetailResponse>,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    pub user_id: Uuid,
    pub username: String,
    /// Only present when the requester is the user.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            username: user.username,
            email: Some(user.email),
            created_at: user.created_at,
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: UserResponse,
    pub is_owner: bool,
}

#[derive(Serialize, Deserialize, ToSchema)]
pub struct PublicProfileResponse {
    pub user_id: Uuid,
    pub username: String,
    pub general_streak: u32,
}

impl From<PublicProfile> for PublicProfileResponse {
    fn from(profile: PublicProfile) -> Self {
        Self {
            user_id: profile.user.user_id,
            username: profile.user.username,
            general_streak: profile.general_streak,
        }
    }
}
