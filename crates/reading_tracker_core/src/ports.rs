//! crates/reading_tracker_core/src/ports.rs
//!
//! Defines the service contracts (traits) for the application's core logic.
//! These traits form the boundary of the hexagonal architecture, allowing the core
//! to be independent of specific external implementations like databases or clocks.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::domain::{
    Book, BookDraft, Folder, FolderDraft, PublicProfile, ReadingProgress, User, UserCredentials,
};

//=========================================================================================
// Generic Port Error and Result Types
//=========================================================================================

/// A generic error type for all port operations.
/// This abstracts away the specific errors from external services (e.g., database, network).
#[derive(Debug, thiserror::Error)]
pub enum PortError {
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Permission denied: {0}")]
    PermissionDenied(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Invalid input: {0}")]
    Invalid(String),
    #[error("Already exists: {0}")]
    Conflict(String),
    #[error("An unexpected error occurred: {0}")]
    Unexpected(String),
}

/// A convenience type alias for `Result<T, PortError>`.
pub type PortResult<T> = Result<T, PortError>;

//=========================================================================================
// Service Ports (Traits)
//=========================================================================================

#[async_trait]
pub trait DatabaseService: Send + Sync {
    // --- User Management ---
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User>;

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User>;

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials>;

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
    ) -> PortResult<User>;

    /// Users owning at least one public folder, with their aggregate streak.
    async fn list_public_profiles(&self) -> PortResult<Vec<PublicProfile>>;

    // --- Auth Methods ---
    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()>;

    /// Returns the owner of a live session; expired sessions are `Unauthorized`.
    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid>;

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()>;

    // --- Folder Management ---
    async fn create_folder(&self, user_id: Uuid, draft: &FolderDraft) -> PortResult<Folder>;

    async fn get_folder_by_id(&self, folder_id: i64) -> PortResult<Folder>;

    async fn list_folders_by_user(&self, user_id: Uuid) -> PortResult<Vec<Folder>>;

    async fn list_public_folders(&self) -> PortResult<Vec<Folder>>;

    async fn update_folder(&self, folder: &Folder) -> PortResult<()>;

    /// Deletes a folder together with every book it contains.
    async fn delete_folder(&self, folder_id: i64) -> PortResult<()>;

    // --- Book Management ---
    async fn create_book(&self, draft: &BookDraft) -> PortResult<Book>;

    async fn get_book_by_id(&self, book_id: i64) -> PortResult<Book>;

    async fn list_books_by_folder(&self, folder_id: i64) -> PortResult<Vec<Book>>;

    async fn list_books_by_user(&self, user_id: Uuid) -> PortResult<Vec<Book>>;

    async fn update_book(&self, book: &Book) -> PortResult<()>;

    async fn delete_book(&self, book_id: i64) -> PortResult<()>;

    // --- Reading Progress ---
    async fn get_reading_progress(&self, user_id: Uuid) -> PortResult<ReadingProgress>;

    /// Inserts an empty aggregate if the user has none, then returns it.
    async fn get_or_create_reading_progress(&self, user_id: Uuid) -> PortResult<ReadingProgress>;

    /// Persists the book, its folder and the user's aggregate as one atomic write.
    async fn commit_progress_update(
        &self,
        book: &Book,
        folder: &Folder,
        progress: &ReadingProgress,
    ) -> PortResult<()>;
}

/// Source of "today" for streak bookkeeping.
pub trait Clock: Send + Sync {
    fn today(&self) -> NaiveDate;
}
