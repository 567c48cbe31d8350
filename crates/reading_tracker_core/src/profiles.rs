//! crates/reading_tracker_core/src/profiles.rs
//!
//! The dashboard and user-facing profile views.

use uuid::Uuid;

use crate::domain::{PublicProfile, ReadingProgress, User};
use crate::library::FolderWithBooks;
use crate::ports::{DatabaseService, PortResult};
use crate::validation;

#[derive(Debug, Clone)]
pub struct Dashboard {
    pub progress: ReadingProgress,
    pub folders: Vec<FolderWithBooks>,
}

/// Another user's profile as seen by `requester`.
#[derive(Debug, Clone)]
pub struct ProfileView {
    pub user: User,
    pub is_owner: bool,
}

pub async fn dashboard(db: &dyn DatabaseService, user_id: Uuid) -> PortResult<Dashboard> {
    let progress = db.get_or_create_reading_progress(user_id).await?;
    let mut folders = Vec::new();
    for folder in db.list_folders_by_user(user_id).await? {
        let books = db.list_books_by_folder(folder.id).await?;
        folders.push(FolderWithBooks { folder, books });
    }
    Ok(Dashboard { progress, folders })
}

pub async fn user_profile(db: &dyn DatabaseService, requester: Uuid, user_id: Uuid) -> PortResult<ProfileView> {
    let user = db.get_user_by_id(user_id).await?;
    Ok(ProfileView {
        is_owner: user.user_id == requester,
        user,
    })
}

pub async fn update_profile(
    db: &dyn DatabaseService,
    user_id: Uuid,
    username: &str,
    email: &str,
) -> PortResult<User> {
    let username = validation::username(username)?;
    let email = validation::email(email)?;
    db.update_user_profile(user_id, &username, &email).await
}

pub async fn public_profiles(db: &dyn DatabaseService) -> PortResult<Vec<PublicProfile>> {
    db.list_public_profiles().await
}
