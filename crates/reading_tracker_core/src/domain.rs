//! crates/reading_tracker_core/src/domain.rs
//!
//! Defines the pure, core data structures for the application.
//! These structs are independent of any database or serialization format.

use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use crate::streak::Streak;

// Represents a user - used throughout app
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

// Only used internally for login/signup - contains sensitive data
#[derive(Debug, Clone)]
pub struct UserCredentials {
    pub user_id: Uuid,
    pub username: String,
    pub email: String,
    pub hashed_password: String,
}

// Represents a browser login session (auth cookie)
#[derive(Debug, Clone)]
pub struct AuthSession {
    pub id: String,
    pub user_id: Uuid,
    pub expires_at: DateTime<Utc>,
}

/// A named collection of books owned by one user, with its own daily streak.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Folder {
    pub id: i64,
    pub user_id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub is_public: bool,
    pub streak_count: u32,
    pub last_read_date: Option<NaiveDate>,
}

impl Folder {
    pub fn streak(&self) -> Streak {
        Streak {
            last_read_date: self.last_read_date,
            count: self.streak_count,
        }
    }

    pub fn set_streak(&mut self, streak: Streak) {
        self.last_read_date = streak.last_read_date;
        self.streak_count = streak.count;
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }
}

/// A book tracked inside a folder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: i64,
    pub folder_id: i64,
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    pub current_page: u32,
    pub is_read: bool,
}

impl Book {
    /// Advances the current page by `pages`, never past the last page.
    pub fn advance(&mut self, pages: u32) {
        self.current_page = self
            .current_page
            .saturating_add(pages)
            .min(self.total_pages);
        self.is_read = self.current_page == self.total_pages;
    }

    pub fn pages_left(&self) -> u32 {
        self.total_pages.saturating_sub(self.current_page)
    }
}

/// The per-user aggregate of reading activity across every folder.
///
/// `current_page` is a legacy column kept for compatibility; nothing writes it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReadingProgress {
    pub id: i64,
    pub user_id: Uuid,
    pub current_page: u32,
    pub streak_count: u32,
    pub last_read_date: Option<NaiveDate>,
}

impl ReadingProgress {
    pub fn streak(&self) -> Streak {
        Streak {
            last_read_date: self.last_read_date,
            count: self.streak_count,
        }
    }

    pub fn set_streak(&mut self, streak: Streak) {
        self.last_read_date = streak.last_read_date;
        self.streak_count = streak.count;
    }
}

/// A user who owns at least one public folder, as shown on the public listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicProfile {
    pub user: User,
    pub general_streak: u32,
}

/// Fields accepted when creating or editing a folder.
#[derive(Debug, Clone)]
pub struct FolderDraft {
    pub name: String,
    pub is_public: bool,
}

/// Fields accepted when creating or editing a book.
#[derive(Debug, Clone)]
pub struct BookDraft {
    pub folder_id: i64,
    pub title: String,
    pub author: String,
    pub total_pages: u32,
    pub current_page: u32,
}
