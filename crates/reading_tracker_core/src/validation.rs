//! crates/reading_tracker_core/src/validation.rs
//!
//! Turns untrusted form input into checked drafts.

use tracing::warn;

use crate::domain::{BookDraft, FolderDraft};
use crate::ports::{PortError, PortResult};

pub const MAX_TEXT_LEN: usize = 255;

/// Largest page count a book may have; page columns are 32-bit signed.
pub const MAX_PAGES: u32 = i32::MAX as u32;

fn required_text(field: &str, value: &str) -> PortResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(PortError::Invalid(format!("{} is required", field)));
    }
    if value.chars().count() > MAX_TEXT_LEN {
        return Err(PortError::Invalid(format!(
            "{} must be at most {} characters",
            field, MAX_TEXT_LEN
        )));
    }
    Ok(value.to_string())
}

pub fn folder_draft(name: &str, is_public: bool) -> PortResult<FolderDraft> {
    Ok(FolderDraft {
        name: required_text("name", name)?,
        is_public,
    })
}

pub fn book_draft(
    folder_id: i64,
    title: &str,
    author: &str,
    total_pages: i64,
    current_page: i64,
) -> PortResult<BookDraft> {
    let title = required_text("title", title)?;
    let author = required_text("author", author)?;
    let total_pages = u32::try_from(total_pages)
        .ok()
        .filter(|pages| (1..=MAX_PAGES).contains(pages))
        .ok_or_else(|| {
            PortError::Invalid(format!("total_pages must be between 1 and {}", MAX_PAGES))
        })?;
    let current_page = u32::try_from(current_page)
        .ok()
        .filter(|page| *page <= total_pages)
        .ok_or_else(|| {
            PortError::Invalid(format!("current_page must be between 0 and {}", total_pages))
        })?;
    Ok(BookDraft {
        folder_id,
        title,
        author,
        total_pages,
        current_page,
    })
}

pub fn username(value: &str) -> PortResult<String> {
    required_text("username", value)
}

pub fn email(value: &str) -> PortResult<String> {
    let value = required_text("email", value)?;
    match value.split_once('@') {
        Some((local, domain)) if !local.is_empty() && !domain.is_empty() => Ok(value),
        _ => Err(PortError::Invalid("email must be a valid address".to_string())),
    }
}

/// Reads the page delta of a progress update.
///
/// Absent, malformed or negative input counts as zero pages.
pub fn pages_read(raw: Option<&str>) -> u32 {
    let Some(raw) = raw else {
        return 0;
    };
    match raw.trim().parse::<i64>() {
        Ok(pages) if pages >= 0 => u32::try_from(pages).unwrap_or(u32::MAX),
        Ok(pages) => {
            warn!(pages, "Negative pages_read coerced to 0");
            0
        }
        Err(e) => {
            warn!(input = raw, error = %e, "Malformed pages_read coerced to 0");
            0
        }
    }
}
