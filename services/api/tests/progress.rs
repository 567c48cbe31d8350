mod common;

use api_lib::adapters::InMemoryDb;
use common::{date, seed_book, seed_folder, seed_user};
use reading_tracker_core::{ports::DatabaseService, progress, PortError};

#[tokio::test]
async fn finishing_a_book_clamps_and_marks_it_read() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 280).await;

    let update = progress::update_reading_progress(&db, owner, book.id, Some("50"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(update.book.current_page, 300);
    assert!(update.book.is_read);
    assert_eq!(update.pages_applied, 50);

    let stored = db.get_book_by_id(book.id).await.unwrap();
    assert_eq!(stored.current_page, 300);
    assert!(stored.is_read);
}

#[tokio::test]
async fn partial_progress_adds_pages() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 100).await;

    progress::update_reading_progress(&db, owner, book.id, Some("25"), date(2024, 1, 1))
        .await
        .unwrap();

    let stored = db.get_book_by_id(book.id).await.unwrap();
    assert_eq!(stored.current_page, 125);
    assert!(!stored.is_read);
}

#[tokio::test]
async fn next_day_update_extends_folder_streak() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 5, Some(date(2024, 1, 1))).await;
    let book = seed_book(&db, folder.id, 300, 0).await;

    progress::update_reading_progress(&db, owner, book.id, Some("10"), date(2024, 1, 2))
        .await
        .unwrap();

    let stored = db.get_folder_by_id(folder.id).await.unwrap();
    assert_eq!(stored.streak_count, 6);
    assert_eq!(stored.last_read_date, Some(date(2024, 1, 2)));
}

#[tokio::test]
async fn late_update_resets_folder_streak() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 5, Some(date(2024, 1, 1))).await;
    let book = seed_book(&db, folder.id, 300, 0).await;

    progress::update_reading_progress(&db, owner, book.id, Some("10"), date(2024, 1, 10))
        .await
        .unwrap();

    let stored = db.get_folder_by_id(folder.id).await.unwrap();
    assert_eq!(stored.streak_count, 1);
    assert_eq!(stored.last_read_date, Some(date(2024, 1, 10)));
}

#[tokio::test]
async fn same_day_zero_updates_are_idempotent() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 3, Some(date(2024, 1, 1))).await;
    let book = seed_book(&db, folder.id, 300, 40).await;
    let today = date(2024, 1, 2);

    let first = progress::update_reading_progress(&db, owner, book.id, Some("0"), today)
        .await
        .unwrap();
    let second = progress::update_reading_progress(&db, owner, book.id, Some("0"), today)
        .await
        .unwrap();

    assert_eq!(first.book.current_page, 40);
    assert_eq!(second.book.current_page, 40);
    assert_eq!(first.folder.streak_count, 4);
    assert_eq!(second.folder.streak_count, 4);
    assert_eq!(first.progress.streak_count, second.progress.streak_count);
}

#[tokio::test]
async fn malformed_or_negative_input_counts_as_zero_pages() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 40).await;

    for input in [Some("abc"), Some("-30"), Some(""), None] {
        let update = progress::update_reading_progress(&db, owner, book.id, input, date(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(update.pages_applied, 0);
        assert_eq!(update.book.current_page, 40);
    }

    // The update still counts as reading activity.
    let stored = db.get_folder_by_id(folder.id).await.unwrap();
    assert_eq!(stored.streak_count, 1);
}

#[tokio::test]
async fn non_owner_cannot_update_progress() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let stranger = seed_user(&db, "bob").await;
    let private = seed_folder(&db, owner, "Private", false, 0, None).await;
    let public = seed_folder(&db, owner, "Shared", true, 0, None).await;
    let private_book = seed_book(&db, private.id, 100, 10).await;
    let public_book = seed_book(&db, public.id, 100, 10).await;

    for book_id in [private_book.id, public_book.id] {
        let err = progress::update_reading_progress(&db, stranger, book_id, Some("5"), date(2024, 1, 1))
            .await
            .unwrap_err();
        assert!(matches!(err, PortError::PermissionDenied(_)));
        assert_eq!(db.get_book_by_id(book_id).await.unwrap().current_page, 10);
    }

    // Nothing was created for the rejected requester.
    assert!(matches!(
        db.get_reading_progress(stranger).await,
        Err(PortError::NotFound(_))
    ));
}

#[tokio::test]
async fn unknown_book_is_not_found() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;

    let err = progress::update_reading_progress(&db, owner, 999, Some("5"), date(2024, 1, 1))
        .await
        .unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}

#[tokio::test]
async fn aggregate_is_created_lazily_and_tracks_the_user() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 0).await;

    assert!(db.get_reading_progress(owner).await.is_err());

    let update = progress::update_reading_progress(&db, owner, book.id, Some("5"), date(2024, 1, 1))
        .await
        .unwrap();
    assert_eq!(update.progress.streak_count, 1);
    assert_eq!(update.progress.last_read_date, Some(date(2024, 1, 1)));

    let stored = db.get_reading_progress(owner).await.unwrap();
    assert_eq!(stored.streak_count, 1);
    assert_eq!(stored.current_page, 0);
}

#[tokio::test]
async fn folder_and_user_streaks_diverge_across_folders() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let poetry = seed_folder(&db, owner, "Poetry", false, 0, None).await;
    let essays = seed_folder(&db, owner, "Essays", false, 0, None).await;
    let poem = seed_book(&db, poetry.id, 80, 0).await;
    let essay = seed_book(&db, essays.id, 200, 0).await;

    progress::update_reading_progress(&db, owner, poem.id, Some("5"), date(2024, 1, 1)).await.unwrap();
    progress::update_reading_progress(&db, owner, essay.id, Some("5"), date(2024, 1, 2)).await.unwrap();
    let last = progress::update_reading_progress(&db, owner, poem.id, Some("5"), date(2024, 1, 3))
        .await
        .unwrap();

    assert_eq!(last.folder.streak_count, 1);
    assert_eq!(last.progress.streak_count, 3);
    assert_eq!(db.get_folder_by_id(essays.id).await.unwrap().streak_count, 1);
}

#[tokio::test]
async fn progress_snapshot_requires_an_aggregate() {
    let db = InMemoryDb::new();
    let owner = seed_user(&db, "ada").await;
    let folder = seed_folder(&db, owner, "Novels", false, 0, None).await;
    let book = seed_book(&db, folder.id, 300, 12).await;

    let err = progress::get_reading_progress(&db, owner, book.id).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));

    progress::update_reading_progress(&db, owner, book.id, Some("8"), date(2024, 5, 4))
        .await
        .unwrap();
    let snapshot = progress::get_reading_progress(&db, owner, book.id).await.unwrap();
    assert_eq!(snapshot.current_page, 20);
    assert_eq!(snapshot.streak_count, 1);
    assert_eq!(snapshot.last_read_date, Some(date(2024, 5, 4)));

    let err = progress::get_reading_progress(&db, owner, 4242).await.unwrap_err();
    assert!(matches!(err, PortError::NotFound(_)));
}
