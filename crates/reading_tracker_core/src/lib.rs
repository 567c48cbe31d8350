pub mod access;
pub mod domain;
pub mod library;
pub mod ports;
pub mod profiles;
pub mod progress;
pub mod streak;
pub mod validation;

pub use domain::{
    AuthSession, Book, BookDraft, Folder, FolderDraft, PublicProfile, ReadingProgress, User,
    UserCredentials,
};
pub use ports::{Clock, DatabaseService, PortError, PortResult};
pub use streak::Streak;
