//! crates/reading_tracker_core/src/progress.rs
//!
//! Recording pages read against a book, and the streak bookkeeping that goes
//! with it.

use chrono::NaiveDate;
use uuid::Uuid;

use crate::access;
use crate::domain::{Book, Folder, ReadingProgress};
use crate::ports::{DatabaseService, PortError, PortResult};
use crate::validation;

/// Everything written by a successful progress update.
#[derive(Debug, Clone)]
pub struct ProgressUpdate {
    pub book: Book,
    pub folder: Folder,
    pub progress: ReadingProgress,
    pub pages_applied: u32,
}

/// What the progress endpoint reports for a book.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressSnapshot {
    pub current_page: u32,
    pub streak_count: u32,
    pub last_read_date: Option<NaiveDate>,
}

/// Adds `pages_read` to a book owned by `requester` and advances both the
/// folder streak and the requester's aggregate streak for `today`.
///
/// The two streaks are computed independently and may diverge.
pub async fn update_reading_progress(
    db: &dyn DatabaseService,
    requester: Uuid,
    book_id: i64,
    pages_read: Option<&str>,
    today: NaiveDate,
) -> PortResult<ProgressUpdate> {
    let mut book = db.get_book_by_id(book_id).await?;
    let mut folder = db.get_folder_by_id(book.folder_id).await?;
    access::ensure_owner(&folder, requester).map_err(|_| {
        PortError::PermissionDenied(format!(
            "You do not have permission to update the progress of book {}",
            book_id
        ))
    })?;

    let pages = validation::pages_read(pages_read);
    book.advance(pages);
    folder.set_streak(folder.streak().record(today));

    let mut progress = db.get_or_create_reading_progress(requester).await?;
    progress.set_streak(progress.streak().record(today));

    db.commit_progress_update(&book, &folder, &progress).await?;

    Ok(ProgressUpdate {
        book,
        folder,
        progress,
        pages_applied: pages,
    })
}

/// Reports the book's current page alongside the requester's aggregate streak.
///
/// Fails with `NotFound` when the book does not exist or the requester has
/// never recorded any progress.
pub async fn get_reading_progress(
    db: &dyn DatabaseService,
    requester: Uuid,
    book_id: i64,
) -> PortResult<ProgressSnapshot> {
    let book = db.get_book_by_id(book_id).await?;
    let progress = db.get_reading_progress(requester).await?;
    Ok(ProgressSnapshot {
        current_page: book.current_page,
        streak_count: progress.streak_count,
        last_read_date: progress.last_read_date,
    })
}
