//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::sync::Arc;

use api_lib::{
    adapters::{FixedClock, InMemoryDb},
    config::Config,
    web::{router, state::AppState},
};
use axum::{body::Body, http::Response, Router};
use chrono::{Duration, NaiveDate, Utc};
use http_body_util::BodyExt;
use reading_tracker_core::{
    domain::{Book, BookDraft, Folder, FolderDraft},
    ports::DatabaseService,
};
use uuid::Uuid;

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn seed_user(db: &InMemoryDb, username: &str) -> Uuid {
    db.create_user(username, &format!("{}@example.com", username), "not-a-real-hash")
        .await
        .unwrap()
        .user_id
}

pub async fn seed_folder(
    db: &InMemoryDb,
    owner: Uuid,
    name: &str,
    is_public: bool,
    streak_count: u32,
    last_read_date: Option<NaiveDate>,
) -> Folder {
    let draft = FolderDraft {
        name: name.to_string(),
        is_public,
    };
    let mut folder = db.create_folder(owner, &draft).await.unwrap();
    folder.streak_count = streak_count;
    folder.last_read_date = last_read_date;
    db.update_folder(&folder).await.unwrap();
    folder
}

pub async fn seed_book(db: &InMemoryDb, folder_id: i64, total_pages: u32, current_page: u32) -> Book {
    let draft = BookDraft {
        folder_id,
        title: "The Name of the Rose".to_string(),
        author: "Umberto Eco".to_string(),
        total_pages,
        current_page,
    };
    db.create_book(&draft).await.unwrap()
}

/// Opens an auth session and returns the matching `Cookie` header value.
pub async fn session_cookie(db: &InMemoryDb, user_id: Uuid) -> String {
    let session_id = Uuid::new_v4().to_string();
    db.create_auth_session(&session_id, user_id, Utc::now() + Duration::days(1))
        .await
        .unwrap();
    format!("session={}", session_id)
}

pub fn app(db: Arc<InMemoryDb>, today: NaiveDate) -> Router {
    let config = Config::from_lookup(|name| match name {
        "DATABASE_URL" => Some("memory://".to_string()),
        _ => None,
    })
    .unwrap();
    router(Arc::new(AppState {
        db,
        clock: Arc::new(FixedClock(today)),
        config: Arc::new(config),
    }))
}

pub async fn json_body(response: Response<Body>) -> serde_json::Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}
