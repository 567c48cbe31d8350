mod common;

use std::sync::Arc;

use api_lib::adapters::InMemoryDb;
use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use chrono::{Duration, Utc};
use common::{app, date, json_body, seed_book, seed_folder, seed_user, session_cookie};
use reading_tracker_core::ports::DatabaseService;
use serde_json::json;
use tower::ServiceExt;

fn progress_form(book_id: i64, cookie: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(format!("/books/{}/progress/update/", book_id))
        .header(header::COOKIE, cookie)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get(uri: &str, cookie: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(uri);
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::empty()).unwrap()
}

fn post_json(uri: &str, cookie: Option<&str>, body: serde_json::Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(cookie) = cookie {
        builder = builder.header(header::COOKIE, cookie);
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

#[tokio::test]
async fn progress_update_redirects_to_dashboard() {
    let db = Arc::new(InMemoryDb::new());
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 5, Some(date(2024, 1, 1))).await;
    let book = seed_book(&db, folder.id, 300, 280).await;
    let cookie = session_cookie(&db, owner).await;
    let app = app(db.clone(), date(2024, 1, 2));

    let response = app
        .clone()
        .oneshot(progress_form(book.id, &cookie, "pages_read=50"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[header::LOCATION], "/dashboard/");

    let stored = db.get_book_by_id(book.id).await.unwrap();
    assert_eq!(stored.current_page, 300);
    assert!(stored.is_read);
    assert_eq!(db.get_folder_by_id(folder.id).await.unwrap().streak_count, 6);

    let response = app
        .oneshot(get(&format!("/books/{}/progress/", book.id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        json_body(response).await,
        json!({ "current_page": 300, "streak_count": 1, "last_read_date": "2024-01-02" })
    );
}

#[tokio::test]
async fn unreadable_pages_read_is_treated_as_zero() {
    let db = Arc::new(InMemoryDb::new());
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 40).await;
    let cookie = session_cookie(&db, owner).await;
    let app = app(db.clone(), date(2024, 1, 2));

    for body in ["pages_read=abc", "pages_read=-7", ""] {
        let response = app.clone().oneshot(progress_form(book.id, &cookie, body)).await.unwrap();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
    }

    // No content type at all.
    let request = Request::builder()
        .method("POST")
        .uri(format!("/books/{}/progress/update/", book.id))
        .header(header::COOKIE, &cookie)
        .body(Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    assert_eq!(db.get_book_by_id(book.id).await.unwrap().current_page, 40);
}

#[tokio::test]
async fn progress_update_rejects_strangers_and_unknown_books() {
    let db = Arc::new(InMemoryDb::new());
    let owner = seed_user(&db, "ada").await;
    let stranger = seed_user(&db, "bob").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 40).await;
    let cookie = session_cookie(&db, stranger).await;
    let app = app(db.clone(), date(2024, 1, 2));

    let response = app
        .clone()
        .oneshot(progress_form(book.id, &cookie, "pages_read=10"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert!(json_body(response).await["error"].is_string());

    let response = app.oneshot(progress_form(9999, &cookie, "pages_read=10")).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn progress_lookup_without_history_is_not_found() {
    let db = Arc::new(InMemoryDb::new());
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 40).await;
    let cookie = session_cookie(&db, owner).await;

    let response = app(db, date(2024, 1, 2))
        .oneshot(get(&format!("/books/{}/progress/", book.id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await, json!({ "error": "Progress not found" }));
}

#[tokio::test]
async fn protected_routes_need_a_live_session() {
    let db = Arc::new(InMemoryDb::new());
    let owner = seed_user(&db, "ada").await;
    db.create_auth_session("stale", owner, Utc::now() - Duration::hours(1))
        .await
        .unwrap();
    let app = app(db, date(2024, 1, 2));

    let response = app.clone().oneshot(get("/dashboard/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.clone().oneshot(get("/dashboard/", Some("session=stale"))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app.oneshot(get("/folders/public/", None)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn private_folder_is_forbidden_to_strangers() {
    let db = Arc::new(InMemoryDb::new());
    let owner = seed_user(&db, "ada").await;
    let stranger = seed_user(&db, "bob").await;
    let private = seed_folder(&db, owner, "Private", false, 0, None).await;
    let public = seed_folder(&db, owner, "Shared", true, 0, None).await;
    let cookie = session_cookie(&db, stranger).await;
    let app = app(db, date(2024, 1, 2));

    let response = app
        .clone()
        .oneshot(get(&format!("/folders/{}/", private.id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);

    let response = app
        .clone()
        .oneshot(get(&format!("/folders/{}/", public.id), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["folder"]["name"], "Shared");

    let response = app.oneshot(get("/folders/public/", None)).await.unwrap();
    let listed = json_body(response).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], public.id);
}

#[tokio::test]
async fn signup_then_build_a_library() {
    let db = Arc::new(InMemoryDb::new());
    let app = app(db.clone(), date(2024, 3, 1));

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/signup",
            None,
            json!({ "username": "ada", "email": "ada@example.com", "password": "analytical" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let set_cookie = response.headers()[header::SET_COOKIE].to_str().unwrap().to_string();
    let cookie = set_cookie.split(';').next().unwrap().to_string();
    assert!(cookie.starts_with("session="));

    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add/",
            Some(&cookie),
            json!({ "folder_id": 1, "title": "Emma", "author": "Jane Austen", "total_pages": 474 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = app
        .clone()
        .oneshot(post_json(
            "/folders/create/",
            Some(&cookie),
            json!({ "name": "Classics", "is_public": true }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let folder_id = json_body(response).await["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(post_json(
            "/books/add/",
            Some(&cookie),
            json!({ "folder_id": folder_id, "title": "Emma", "author": "Jane Austen", "total_pages": 474 }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let book = json_body(response).await;
    assert_eq!(book["pages_left"], 474);
    let book_id = book["id"].as_i64().unwrap();

    let response = app
        .clone()
        .oneshot(progress_form(book_id, &cookie, "pages_read=74"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let response = app.clone().oneshot(get("/dashboard/", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let dashboard = json_body(response).await;
    assert_eq!(dashboard["reading_progress"]["streak_count"], 1);
    assert_eq!(dashboard["folders"][0]["folder"]["streak_count"], 1);
    assert_eq!(dashboard["folders"][0]["books"][0]["current_page"], 74);

    let response = app.clone().oneshot(get("/profiles/public/", None)).await.unwrap();
    let readers = json_body(response).await;
    assert_eq!(readers, json!([{ "user_id": readers[0]["user_id"], "username": "ada", "general_streak": 1 }]));

    let response = app
        .clone()
        .oneshot(post_json("/auth/logout", Some(&cookie), json!({})))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let response = app.oneshot(get("/dashboard/", Some(&cookie))).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn login_checks_the_password() {
    let db = Arc::new(InMemoryDb::new());
    let app = app(db, date(2024, 3, 1));
    let signup = json!({ "username": "bob", "email": "bob@example.com", "password": "hunter22" });

    let response = app.clone().oneshot(post_json("/auth/signup", None, signup.clone())).await.unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.clone().oneshot(post_json("/auth/signup", None, signup)).await.unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "bob@example.com", "password": "wrong" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .clone()
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "nobody@example.com", "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = app
        .oneshot(post_json(
            "/auth/login",
            None,
            json!({ "email": "bob@example.com", "password": "hunter22" }),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key(header::SET_COOKIE));
    assert_eq!(json_body(response).await["username"], "bob");
}

#[tokio::test]
async fn foreign_profile_hides_the_email() {
    let db = Arc::new(InMemoryDb::new());
    let ada = seed_user(&db, "ada").await;
    let bob = seed_user(&db, "bob").await;
    let cookie = session_cookie(&db, ada).await;
    let app = app(db.clone(), date(2024, 1, 2));

    let response = app
        .clone()
        .oneshot(get(&format!("/user/{}/", bob), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = json_body(response).await;
    assert_eq!(profile["is_owner"], false);
    assert_eq!(profile["user"]["username"], "bob");
    assert!(profile["user"].get("email").is_none());

    let response = app
        .oneshot(get(&format!("/user/{}/", ada), Some(&cookie)))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let profile = json_body(response).await;
    assert_eq!(profile["is_owner"], true);
    let email = db.get_user_by_id(ada).await.unwrap().email;
    assert_eq!(profile["user"]["email"], email);
}
