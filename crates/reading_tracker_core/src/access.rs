//! crates/reading_tracker_core/src/access.rs
//!
//! Ownership and visibility rules for folders and the books inside them.

use uuid::Uuid;

use crate::domain::Folder;
use crate::ports::{PortError, PortResult};

/// Mutation of a folder, or of any book inside it, is reserved to its owner.
pub fn ensure_owner(folder: &Folder, user_id: Uuid) -> PortResult<()> {
    if folder.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(PortError::PermissionDenied(format!(
            "You do not have permission to modify folder {}",
            folder.id
        )))
    }
}

/// A folder can be viewed by its owner, or by anyone once it is public.
pub fn ensure_visible(folder: &Folder, user_id: Uuid) -> PortResult<()> {
    if folder.is_public || folder.is_owned_by(user_id) {
        Ok(())
    } else {
        Err(PortError::PermissionDenied(format!(
            "You do not have permission to view folder {}",
            folder.id
        )))
    }
}
