//! services/api/src/adapters/db.rs
//!
//! This module contains the database adapter, which is the concrete implementation
//! of the `DatabaseService` port from the `core` crate. It handles all interactions
//! with the PostgreSQL database using `sqlx`.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use reading_tracker_core::domain::{
    Book, BookDraft, Folder, FolderDraft, PublicProfile, ReadingProgress, User, UserCredentials,
};
use reading_tracker_core::ports::{DatabaseService, PortError, PortResult};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

const UNIQUE_VIOLATION: &str = "23505";

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// A database adapter that implements the `DatabaseService` port.
#[derive(Clone)]
pub struct DbAdapter {
    pool: PgPool,
}

impl DbAdapter {
    /// Creates a new `DbAdapter`.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await?;
        Ok(())
    }
}

/// Maps a `sqlx` failure onto the port's error vocabulary.
fn port_error(e: sqlx::Error, what: impl Into<String>) -> PortError {
    match e {
        sqlx::Error::RowNotFound => PortError::NotFound(format!("{} not found", what.into())),
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            PortError::Conflict(format!("{} already exists", what.into()))
        }
        other => PortError::Unexpected(other.to_string()),
    }
}

/// Converts a counter into its `INTEGER` column value, refusing to wrap.
fn int_column(value: u32, column: &str) -> PortResult<i32> {
    i32::try_from(value)
        .map_err(|_| PortError::Invalid(format!("{} is out of range: {}", column, value)))
}

fn expect_row(rows_affected: u64, what: impl Into<String>) -> PortResult<()> {
    if rows_affected == 0 {
        Err(PortError::NotFound(format!("{} not found", what.into())))
    } else {
        Ok(())
    }
}

//=========================================================================================
// "Impure" Database Record Structs
//=========================================================================================

#[derive(FromRow)]
struct UserRecord {
    user_id: Uuid,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}
impl UserRecord {
    fn to_domain(self) -> User {
        User {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            created_at: self.created_at,
        }
    }
}

#[derive(FromRow)]
struct CredentialsRecord {
    user_id: Uuid,
    username: String,
    email: String,
    hashed_password: String,
}
impl CredentialsRecord {
    fn to_domain(self) -> UserCredentials {
        UserCredentials {
            user_id: self.user_id,
            username: self.username,
            email: self.email,
            hashed_password: self.hashed_password,
        }
    }
}

#[derive(FromRow)]
struct PublicProfileRecord {
    user_id: Uuid,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
    general_streak: i32,
}
impl PublicProfileRecord {
    fn to_domain(self) -> PublicProfile {
        PublicProfile {
            user: User {
                user_id: self.user_id,
                username: self.username,
                email: self.email,
                created_at: self.created_at,
            },
            general_streak: self.general_streak.max(0) as u32,
        }
    }
}

#[derive(FromRow)]
struct FolderRecord {
    id: i64,
    user_id: Uuid,
    name: String,
    created_at: DateTime<Utc>,
    is_public: bool,
    streak_count: i32,
    last_read_date: Option<NaiveDate>,
}
impl FolderRecord {
    fn to_domain(self) -> Folder {
        Folder {
            id: self.id,
            user_id: self.user_id,
            name: self.name,
            created_at: self.created_at,
            is_public: self.is_public,
            streak_count: self.streak_count.max(0) as u32,
            last_read_date: self.last_read_date,
        }
    }
}

#[derive(FromRow)]
struct BookRecord {
    id: i64,
    folder_id: i64,
    title: String,
    author: String,
    total_pages: i32,
    current_page: i32,
    is_read: bool,
}
impl BookRecord {
    fn to_domain(self) -> Book {
        Book {
            id: self.id,
            folder_id: self.folder_id,
            title: self.title,
            author: self.author,
            total_pages: self.total_pages.max(0) as u32,
            current_page: self.current_page.max(0) as u32,
            is_read: self.is_read,
        }
    }
}

#[derive(FromRow)]
struct ProgressRecord {
    id: i64,
    user_id: Uuid,
    current_page: i32,
    streak_count: i32,
    last_read_date: Option<NaiveDate>,
}
impl ProgressRecord {
    fn to_domain(self) -> ReadingProgress {
        ReadingProgress {
            id: self.id,
            user_id: self.user_id,
            current_page: self.current_page.max(0) as u32,
            streak_count: self.streak_count.max(0) as u32,
            last_read_date: self.last_read_date,
        }
    }
}

const USER_COLUMNS: &str = "user_id, username, email, created_at";
const FOLDER_COLUMNS: &str = "id, user_id, name, created_at, is_public, streak_count, last_read_date";
const BOOK_COLUMNS: &str = "id, folder_id, title, author, total_pages, current_page, is_read";
const PROGRESS_COLUMNS: &str = "id, user_id, current_page, streak_count, last_read_date";

//=========================================================================================
// `DatabaseService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DatabaseService for DbAdapter {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "INSERT INTO users (user_id, username, email, hashed_password) VALUES ($1, $2, $3, $4) RETURNING {}",
            USER_COLUMNS
        ))
        .bind(Uuid::new_v4())
        .bind(username)
        .bind(email)
        .bind(hashed_password)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "A user with this username or email"))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "SELECT {} FROM users WHERE user_id = $1",
            USER_COLUMNS
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("User {}", user_id)))?;
        Ok(record.to_domain())
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let record = sqlx::query_as::<_, CredentialsRecord>(
            "SELECT user_id, username, email, hashed_password FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "User"))?;
        Ok(record.to_domain())
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
    ) -> PortResult<User> {
        let record = sqlx::query_as::<_, UserRecord>(&format!(
            "UPDATE users SET username = $2, email = $3 WHERE user_id = $1 RETURNING {}",
            USER_COLUMNS
        ))
        .bind(user_id)
        .bind(username)
        .bind(email)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => port_error(e, format!("User {}", user_id)),
            e => port_error(e, "A user with this username or email"),
        })?;
        Ok(record.to_domain())
    }

    async fn list_public_profiles(&self) -> PortResult<Vec<PublicProfile>> {
        let records = sqlx::query_as::<_, PublicProfileRecord>(
            "SELECT u.user_id, u.username, u.email, u.created_at, \
                    COALESCE(rp.streak_count, 0) AS general_streak \
             FROM users u \
             LEFT JOIN reading_progress rp ON rp.user_id = u.user_id \
             WHERE EXISTS (SELECT 1 FROM folders f WHERE f.user_id = u.user_id AND f.is_public) \
             ORDER BY u.username ASC",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        sqlx::query("INSERT INTO auth_sessions (id, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(session_id)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let user_id: Option<Uuid> = sqlx::query_scalar(
            "SELECT user_id FROM auth_sessions WHERE id = $1 AND expires_at > NOW()",
        )
        .bind(session_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        user_id.ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        sqlx::query("DELETE FROM auth_sessions WHERE id = $1")
            .bind(session_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }

    async fn create_folder(&self, user_id: Uuid, draft: &FolderDraft) -> PortResult<Folder> {
        let record = sqlx::query_as::<_, FolderRecord>(&format!(
            "INSERT INTO folders (user_id, name, is_public) VALUES ($1, $2, $3) RETURNING {}",
            FOLDER_COLUMNS
        ))
        .bind(user_id)
        .bind(&draft.name)
        .bind(draft.is_public)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn get_folder_by_id(&self, folder_id: i64) -> PortResult<Folder> {
        let record = sqlx::query_as::<_, FolderRecord>(&format!(
            "SELECT {} FROM folders WHERE id = $1",
            FOLDER_COLUMNS
        ))
        .bind(folder_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Folder {}", folder_id)))?;
        Ok(record.to_domain())
    }

    async fn list_folders_by_user(&self, user_id: Uuid) -> PortResult<Vec<Folder>> {
        let records = sqlx::query_as::<_, FolderRecord>(&format!(
            "SELECT {} FROM folders WHERE user_id = $1 ORDER BY created_at ASC, id ASC",
            FOLDER_COLUMNS
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_public_folders(&self) -> PortResult<Vec<Folder>> {
        let records = sqlx::query_as::<_, FolderRecord>(&format!(
            "SELECT {} FROM folders WHERE is_public ORDER BY created_at ASC, id ASC",
            FOLDER_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_folder(&self, folder: &Folder) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE folders SET name = $2, is_public = $3, streak_count = $4, last_read_date = $5 WHERE id = $1",
        )
        .bind(folder.id)
        .bind(&folder.name)
        .bind(folder.is_public)
        .bind(int_column(folder.streak_count, "streak_count")?)
        .bind(folder.last_read_date)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), format!("Folder {}", folder.id))
    }

    async fn delete_folder(&self, folder_id: i64) -> PortResult<()> {
        // Books go with the folder through ON DELETE CASCADE.
        let result = sqlx::query("DELETE FROM folders WHERE id = $1")
            .bind(folder_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), format!("Folder {}", folder_id))
    }

    async fn create_book(&self, draft: &BookDraft) -> PortResult<Book> {
        let record = sqlx::query_as::<_, BookRecord>(&format!(
            "INSERT INTO books (folder_id, title, author, total_pages, current_page, is_read) \
             VALUES ($1, $2, $3, $4, $5, $6) RETURNING {}",
            BOOK_COLUMNS
        ))
        .bind(draft.folder_id)
        .bind(&draft.title)
        .bind(&draft.author)
        .bind(int_column(draft.total_pages, "total_pages")?)
        .bind(int_column(draft.current_page, "current_page")?)
        .bind(draft.current_page == draft.total_pages)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(record.to_domain())
    }

    async fn get_book_by_id(&self, book_id: i64) -> PortResult<Book> {
        let record = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {} FROM books WHERE id = $1",
            BOOK_COLUMNS
        ))
        .bind(book_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, format!("Book {}", book_id)))?;
        Ok(record.to_domain())
    }

    async fn list_books_by_folder(&self, folder_id: i64) -> PortResult<Vec<Book>> {
        let records = sqlx::query_as::<_, BookRecord>(&format!(
            "SELECT {} FROM books WHERE folder_id = $1 ORDER BY id ASC",
            BOOK_COLUMNS
        ))
        .bind(folder_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn list_books_by_user(&self, user_id: Uuid) -> PortResult<Vec<Book>> {
        let records = sqlx::query_as::<_, BookRecord>(
            "SELECT b.id, b.folder_id, b.title, b.author, b.total_pages, b.current_page, b.is_read \
             FROM books b JOIN folders f ON f.id = b.folder_id \
             WHERE f.user_id = $1 ORDER BY b.id ASC",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(records.into_iter().map(|r| r.to_domain()).collect())
    }

    async fn update_book(&self, book: &Book) -> PortResult<()> {
        let result = sqlx::query(
            "UPDATE books SET folder_id = $2, title = $3, author = $4, total_pages = $5, \
             current_page = $6, is_read = $7 WHERE id = $1",
        )
        .bind(book.id)
        .bind(book.folder_id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(int_column(book.total_pages, "total_pages")?)
        .bind(int_column(book.current_page, "current_page")?)
        .bind(book.is_read)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), format!("Book {}", book.id))
    }

    async fn delete_book(&self, book_id: i64) -> PortResult<()> {
        let result = sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(book_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), format!("Book {}", book_id))
    }

    async fn get_reading_progress(&self, user_id: Uuid) -> PortResult<ReadingProgress> {
        let record = sqlx::query_as::<_, ProgressRecord>(&format!(
            "SELECT {} FROM reading_progress WHERE user_id = $1",
            PROGRESS_COLUMNS
        ))
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| port_error(e, "Progress"))?;
        Ok(record.to_domain())
    }

    async fn get_or_create_reading_progress(&self, user_id: Uuid) -> PortResult<ReadingProgress> {
        sqlx::query("INSERT INTO reading_progress (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
            .bind(user_id)
            .execute(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        self.get_reading_progress(user_id).await
    }

    async fn commit_progress_update(
        &self,
        book: &Book,
        folder: &Folder,
        progress: &ReadingProgress,
    ) -> PortResult<()> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let result = sqlx::query("UPDATE books SET current_page = $2, is_read = $3 WHERE id = $1")
            .bind(book.id)
            .bind(int_column(book.current_page, "current_page")?)
            .bind(book.is_read)
            .execute(&mut *tx)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), format!("Book {}", book.id))?;

        let result =
            sqlx::query("UPDATE folders SET streak_count = $2, last_read_date = $3 WHERE id = $1")
                .bind(folder.id)
                .bind(int_column(folder.streak_count, "streak_count")?)
                .bind(folder.last_read_date)
                .execute(&mut *tx)
                .await
                .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), format!("Folder {}", folder.id))?;

        let result = sqlx::query(
            "UPDATE reading_progress SET streak_count = $2, last_read_date = $3 WHERE user_id = $1",
        )
        .bind(progress.user_id)
        .bind(int_column(progress.streak_count, "streak_count")?)
        .bind(progress.last_read_date)
        .execute(&mut *tx)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        expect_row(result.rows_affected(), "Progress")?;

        // Dropping `tx` on any early return above rolls the whole update back.
        tx.commit()
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))
    }
}
