//! services/api/src/adapters/memory.rs
//!
//! A process-local implementation of the `DatabaseService` port. Used for
//! tests and for running the server without PostgreSQL (`DATABASE_URL=memory://`).
//! Every operation takes a single lock, so each call is atomic.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reading_tracker_core::domain::{
    AuthSession, Book, BookDraft, Folder, FolderDraft, PublicProfile, ReadingProgress, User,
    UserCredentials,
};
use reading_tracker_core::ports::{DatabaseService, PortError, PortResult};
use tokio::sync::RwLock;
use uuid::Uuid;

#[derive(Default)]
struct Tables {
    users: BTreeMap<Uuid, UserCredentials>,
    user_created_at: BTreeMap<Uuid, DateTime<Utc>>,
    sessions: BTreeMap<String, AuthSession>,
    folders: BTreeMap<i64, Folder>,
    books: BTreeMap<i64, Book>,
    progress: BTreeMap<Uuid, ReadingProgress>,
    next_folder_id: i64,
    next_book_id: i64,
    next_progress_id: i64,
}

impl Tables {
    fn user(&self, user_id: Uuid) -> PortResult<User> {
        let creds = self
            .users
            .get(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        Ok(User {
            user_id: creds.user_id,
            username: creds.username.clone(),
            email: creds.email.clone(),
            created_at: self.user_created_at.get(&user_id).copied().unwrap_or_else(Utc::now),
        })
    }

    fn ensure_unique(&self, user_id: Option<Uuid>, username: &str, email: &str) -> PortResult<()> {
        let taken = self.users.values().any(|u| {
            Some(u.user_id) != user_id && (u.username == username || u.email == email)
        });
        if taken {
            Err(PortError::Conflict(
                "A user with this username or email already exists".to_string(),
            ))
        } else {
            Ok(())
        }
    }

    fn delete_folder_cascade(&mut self, folder_id: i64) {
        self.folders.remove(&folder_id);
        self.books.retain(|_, b| b.folder_id != folder_id);
    }
}

/// An in-memory store with the same cascade and uniqueness rules as the SQL schema.
#[derive(Default)]
pub struct InMemoryDb {
    tables: RwLock<Tables>,
}

impl InMemoryDb {
    pub fn new() -> Self {
        Self::default()
    }

    /// Removes a user and everything they own.
    pub async fn delete_user(&self, user_id: Uuid) -> PortResult<()> {
        let mut t = self.tables.write().await;
        t.users
            .remove(&user_id)
            .ok_or_else(|| PortError::NotFound(format!("User {} not found", user_id)))?;
        t.user_created_at.remove(&user_id);
        t.sessions.retain(|_, s| s.user_id != user_id);
        t.progress.remove(&user_id);
        let owned: Vec<i64> = t
            .folders
            .values()
            .filter(|f| f.user_id == user_id)
            .map(|f| f.id)
            .collect();
        for folder_id in owned {
            t.delete_folder_cascade(folder_id);
        }
        Ok(())
    }
}

#[async_trait]
impl DatabaseService for InMemoryDb {
    async fn create_user(
        &self,
        username: &str,
        email: &str,
        hashed_password: &str,
    ) -> PortResult<User> {
        let mut t = self.tables.write().await;
        t.ensure_unique(None, username, email)?;
        let user_id = Uuid::new_v4();
        t.users.insert(
            user_id,
            UserCredentials {
                user_id,
                username: username.to_string(),
                email: email.to_string(),
                hashed_password: hashed_password.to_string(),
            },
        );
        t.user_created_at.insert(user_id, Utc::now());
        t.user(user_id)
    }

    async fn get_user_by_id(&self, user_id: Uuid) -> PortResult<User> {
        self.tables.read().await.user(user_id)
    }

    async fn get_user_by_email(&self, email: &str) -> PortResult<UserCredentials> {
        let t = self.tables.read().await;
        t.users
            .values()
            .find(|u| u.email == email)
            .cloned()
            .ok_or_else(|| PortError::NotFound("User not found".to_string()))
    }

    async fn update_user_profile(
        &self,
        user_id: Uuid,
        username: &str,
        email: &str,
    ) -> PortResult<User> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&user_id) {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        t.ensure_unique(Some(user_id), username, email)?;
        if let Some(creds) = t.users.get_mut(&user_id) {
            creds.username = username.to_string();
            creds.email = email.to_string();
        }
        t.user(user_id)
    }

    async fn list_public_profiles(&self) -> PortResult<Vec<PublicProfile>> {
        let t = self.tables.read().await;
        let mut profiles = Vec::new();
        for user_id in t.users.keys() {
            let has_public = t.folders.values().any(|f| f.user_id == *user_id && f.is_public);
            if !has_public {
                continue;
            }
            profiles.push(PublicProfile {
                user: t.user(*user_id)?,
                general_streak: t.progress.get(user_id).map(|p| p.streak_count).unwrap_or(0),
            });
        }
        profiles.sort_by(|a, b| a.user.username.cmp(&b.user.username));
        Ok(profiles)
    }

    async fn create_auth_session(
        &self,
        session_id: &str,
        user_id: Uuid,
        expires_at: DateTime<Utc>,
    ) -> PortResult<()> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&user_id) {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        t.sessions.insert(
            session_id.to_string(),
            AuthSession {
                id: session_id.to_string(),
                user_id,
                expires_at,
            },
        );
        Ok(())
    }

    async fn validate_auth_session(&self, session_id: &str) -> PortResult<Uuid> {
        let t = self.tables.read().await;
        t.sessions
            .get(session_id)
            .filter(|s| s.expires_at > Utc::now())
            .map(|s| s.user_id)
            .ok_or(PortError::Unauthorized)
    }

    async fn delete_auth_session(&self, session_id: &str) -> PortResult<()> {
        self.tables.write().await.sessions.remove(session_id);
        Ok(())
    }

    async fn create_folder(&self, user_id: Uuid, draft: &FolderDraft) -> PortResult<Folder> {
        let mut t = self.tables.write().await;
        if !t.users.contains_key(&user_id) {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        t.next_folder_id += 1;
        let folder = Folder {
            id: t.next_folder_id,
            user_id,
            name: draft.name.clone(),
            created_at: Utc::now(),
            is_public: draft.is_public,
            streak_count: 0,
            last_read_date: None,
        };
        t.folders.insert(folder.id, folder.clone());
        Ok(folder)
    }

    async fn get_folder_by_id(&self, folder_id: i64) -> PortResult<Folder> {
        let t = self.tables.read().await;
        t.folders
            .get(&folder_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Folder {} not found", folder_id)))
    }

    async fn list_folders_by_user(&self, user_id: Uuid) -> PortResult<Vec<Folder>> {
        let t = self.tables.read().await;
        Ok(t.folders.values().filter(|f| f.user_id == user_id).cloned().collect())
    }

    async fn list_public_folders(&self) -> PortResult<Vec<Folder>> {
        let t = self.tables.read().await;
        Ok(t.folders.values().filter(|f| f.is_public).cloned().collect())
    }

    async fn update_folder(&self, folder: &Folder) -> PortResult<()> {
        let mut t = self.tables.write().await;
        let stored = t
            .folders
            .get_mut(&folder.id)
            .ok_or_else(|| PortError::NotFound(format!("Folder {} not found", folder.id)))?;
        stored.name = folder.name.clone();
        stored.is_public = folder.is_public;
        stored.streak_count = folder.streak_count;
        stored.last_read_date = folder.last_read_date;
        Ok(())
    }

    async fn delete_folder(&self, folder_id: i64) -> PortResult<()> {
        let mut t = self.tables.write().await;
        if !t.folders.contains_key(&folder_id) {
            return Err(PortError::NotFound(format!("Folder {} not found", folder_id)));
        }
        t.delete_folder_cascade(folder_id);
        Ok(())
    }

    async fn create_book(&self, draft: &BookDraft) -> PortResult<Book> {
        let mut t = self.tables.write().await;
        if !t.folders.contains_key(&draft.folder_id) {
            return Err(PortError::NotFound(format!("Folder {} not found", draft.folder_id)));
        }
        t.next_book_id += 1;
        let book = Book {
            id: t.next_book_id,
            folder_id: draft.folder_id,
            title: draft.title.clone(),
            author: draft.author.clone(),
            total_pages: draft.total_pages,
            current_page: draft.current_page,
            is_read: draft.current_page == draft.total_pages,
        };
        t.books.insert(book.id, book.clone());
        Ok(book)
    }

    async fn get_book_by_id(&self, book_id: i64) -> PortResult<Book> {
        let t = self.tables.read().await;
        t.books
            .get(&book_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", book_id)))
    }

    async fn list_books_by_folder(&self, folder_id: i64) -> PortResult<Vec<Book>> {
        let t = self.tables.read().await;
        Ok(t.books.values().filter(|b| b.folder_id == folder_id).cloned().collect())
    }

    async fn list_books_by_user(&self, user_id: Uuid) -> PortResult<Vec<Book>> {
        let t = self.tables.read().await;
        Ok(t.books
            .values()
            .filter(|b| t.folders.get(&b.folder_id).is_some_and(|f| f.user_id == user_id))
            .cloned()
            .collect())
    }

    async fn update_book(&self, book: &Book) -> PortResult<()> {
        let mut t = self.tables.write().await;
        if !t.folders.contains_key(&book.folder_id) {
            return Err(PortError::NotFound(format!("Folder {} not found", book.folder_id)));
        }
        let stored = t
            .books
            .get_mut(&book.id)
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", book.id)))?;
        *stored = book.clone();
        Ok(())
    }

    async fn delete_book(&self, book_id: i64) -> PortResult<()> {
        let mut t = self.tables.write().await;
        t.books
            .remove(&book_id)
            .map(|_| ())
            .ok_or_else(|| PortError::NotFound(format!("Book {} not found", book_id)))
    }

    async fn get_reading_progress(&self, user_id: Uuid) -> PortResult<ReadingProgress> {
        let t = self.tables.read().await;
        t.progress
            .get(&user_id)
            .cloned()
            .ok_or_else(|| PortError::NotFound("Progress not found".to_string()))
    }

    async fn get_or_create_reading_progress(&self, user_id: Uuid) -> PortResult<ReadingProgress> {
        let mut t = self.tables.write().await;
        if let Some(progress) = t.progress.get(&user_id) {
            return Ok(progress.clone());
        }
        if !t.users.contains_key(&user_id) {
            return Err(PortError::NotFound(format!("User {} not found", user_id)));
        }
        t.next_progress_id += 1;
        let progress = ReadingProgress {
            id: t.next_progress_id,
            user_id,
            current_page: 0,
            streak_count: 0,
            last_read_date: None,
        };
        t.progress.insert(user_id, progress.clone());
        Ok(progress)
    }

    async fn commit_progress_update(
        &self,
        book: &Book,
        folder: &Folder,
        progress: &ReadingProgress,
    ) -> PortResult<()> {
        let mut t = self.tables.write().await;
        // Check every row before touching any of them.
        if !t.books.contains_key(&book.id) {
            return Err(PortError::NotFound(format!("Book {} not found", book.id)));
        }
        if !t.folders.contains_key(&folder.id) {
            return Err(PortError::NotFound(format!("Folder {} not found", folder.id)));
        }
        if !t.progress.contains_key(&progress.user_id) {
            return Err(PortError::NotFound("Progress not found".to_string()));
        }

        if let Some(stored) = t.books.get_mut(&book.id) {
            stored.current_page = book.current_page;
            stored.is_read = book.is_read;
        }
        if let Some(stored) = t.folders.get_mut(&folder.id) {
            stored.streak_count = folder.streak_count;
            stored.last_read_date = folder.last_read_date;
        }
        if let Some(stored) = t.progress.get_mut(&progress.user_id) {
            stored.streak_count = progress.streak_count;
            stored.last_read_date = progress.last_read_date;
        }
        Ok(())
    }
}
