//! crates/reading_tracker_core/src/library.rs
//!
//! Folder and book management on behalf of a signed-in user.

use uuid::Uuid;

use crate::access;
use crate::domain::{Book, BookDraft, Folder, FolderDraft};
use crate::ports::{DatabaseService, PortError, PortResult};

/// A folder together with the books it holds.
#[derive(Debug, Clone)]
pub struct FolderWithBooks {
    pub folder: Folder,
    pub books: Vec<Book>,
}

//=========================================================================================
// Folders
//=========================================================================================

pub async fn create_folder(
    db: &dyn DatabaseService,
    owner: Uuid,
    draft: FolderDraft,
) -> PortResult<Folder> {
    db.create_folder(owner, &draft).await
}

pub async fn edit_folder(
    db: &dyn DatabaseService,
    requester: Uuid,
    folder_id: i64,
    draft: FolderDraft,
) -> PortResult<Folder> {
    let mut folder = db.get_folder_by_id(folder_id).await?;
    access::ensure_owner(&folder, requester)?;
    folder.name = draft.name;
    folder.is_public = draft.is_public;
    db.update_folder(&folder).await?;
    Ok(folder)
}

pub async fn delete_folder(db: &dyn DatabaseService, requester: Uuid, folder_id: i64) -> PortResult<()> {
    let folder = db.get_folder_by_id(folder_id).await?;
    access::ensure_owner(&folder, requester)?;
    db.delete_folder(folder_id).await
}

pub async fn folder_detail(
    db: &dyn DatabaseService,
    requester: Uuid,
    folder_id: i64,
) -> PortResult<FolderWithBooks> {
    let folder = db.get_folder_by_id(folder_id).await?;
    access::ensure_visible(&folder, requester)?;
    let books = db.list_books_by_folder(folder.id).await?;
    Ok(FolderWithBooks { folder, books })
}

pub async fn user_folders(db: &dyn DatabaseService, owner: Uuid) -> PortResult<Vec<Folder>> {
    db.list_folders_by_user(owner).await
}

pub async fn public_folders(db: &dyn DatabaseService) -> PortResult<Vec<Folder>> {
    db.list_public_folders().await
}

//=========================================================================================
// Books
//=========================================================================================

/// Adds a book to one of the requester's folders.
pub async fn add_book(db: &dyn DatabaseService, requester: Uuid, draft: BookDraft) -> PortResult<Book> {
    let folders = db.list_folders_by_user(requester).await?;
    if folders.is_empty() {
        return Err(PortError::Invalid(
            "You need to create a folder before adding a book".to_string(),
        ));
    }
    let folder = db.get_folder_by_id(draft.folder_id).await?;
    access::ensure_owner(&folder, requester)?;
    db.create_book(&draft).await
}

/// Rewrites a book's fields; moving it is only allowed between the
/// requester's own folders.
pub async fn edit_book(
    db: &dyn DatabaseService,
    requester: Uuid,
    book_id: i64,
    draft: BookDraft,
) -> PortResult<Book> {
    let mut book = db.get_book_by_id(book_id).await?;
    let folder = db.get_folder_by_id(book.folder_id).await?;
    access::ensure_owner(&folder, requester)?;
    if draft.folder_id != book.folder_id {
        let target = db.get_folder_by_id(draft.folder_id).await?;
        access::ensure_owner(&target, requester)?;
    }

    book.folder_id = draft.folder_id;
    book.title = draft.title;
    book.author = draft.author;
    book.total_pages = draft.total_pages;
    book.current_page = draft.current_page.min(draft.total_pages);
    book.is_read = book.current_page == book.total_pages;
    db.update_book(&book).await?;
    Ok(book)
}

pub async fn delete_book(db: &dyn DatabaseService, requester: Uuid, book_id: i64) -> PortResult<()> {
    let book = db.get_book_by_id(book_id).await?;
    let folder = db.get_folder_by_id(book.folder_id).await?;
    access::ensure_owner(&folder, requester)?;
    db.delete_book(book_id).await
}

/// Looks a book up by id alone; folder visibility is not consulted.
pub async fn book_detail(db: &dyn DatabaseService, book_id: i64) -> PortResult<Book> {
    db.get_book_by_id(book_id).await
}

pub async fn user_books(db: &dyn DatabaseService, owner: Uuid) -> PortResult<Vec<Book>> {
    db.list_books_by_user(owner).await
}
