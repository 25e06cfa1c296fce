//! Integration tests for the versioned store, exercised through recommendations.
//!
//! - Insert assigns id, version and owner
//! - Updates bump the version and reject stale versions
//! - Concurrent updates from the same version: exactly one wins
//! - Get and delete of missing ids
//! - Filtering, sorting and windowed pagination

mod common;

use assert_matches::assert_matches;
use common::{create_user, new_recommendation};
use songbook_core::pagination::Filters;
use songbook_core::recommendation::SORT_SAFELIST;
use songbook_db::models::recommendation::{RecommendationQuery, UpdateRecommendation};
use songbook_db::repositories::RecommendationRepo;
use songbook_db::store::StoreError;
use sqlx::PgPool;

fn filters(page: i64, page_size: i64, sort: &str) -> Filters {
    Filters {
        page,
        page_size,
        sort: sort.to_string(),
        ..Filters::new(&SORT_SAFELIST)
    }
}

fn everything() -> RecommendationQuery {
    RecommendationQuery {
        include_private: true,
        ..Default::default()
    }
}

// ---------------------------------------------------------------------------
// Insert / get
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn insert_assigns_id_version_and_owner(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;

    let rec = RecommendationRepo::create(&pool, alice.id, &new_recommendation("Xtal"))
        .await
        .unwrap();

    assert!(rec.id > 0);
    assert_eq!(rec.version, 1);
    assert_eq!(rec.created_by.id, alice.id);
    assert_eq!(rec.created_by.username, "alice");

    let fetched = RecommendationRepo::get(&pool, rec.id).await.unwrap();
    assert_eq!(fetched.title, "Xtal");
    assert_eq!(fetched.created_at, rec.created_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn absent_optionals_are_stored_as_null(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let mut input = new_recommendation("Xtal");
    input.comment = Some(String::new());

    let rec = RecommendationRepo::create(&pool, alice.id, &input).await.unwrap();

    let (cover_null, comment_null): (bool, bool) = sqlx::query_as(
        "SELECT cover_url IS NULL, comment IS NULL FROM recommendations WHERE id = $1",
    )
    .bind(rec.id)
    .fetch_one(&pool)
    .await
    .unwrap();
    assert!(cover_null);
    assert!(!comment_null, "explicit empty string must be kept");
    assert_eq!(rec.comment.as_deref(), Some(""));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn get_missing_ids_is_not_found(pool: PgPool) {
    for id in [0, -3, 999_999] {
        let err = RecommendationRepo::get(&pool, id).await.unwrap_err();
        assert_matches!(err, StoreError::NotFound { id: missing, .. } if missing == id);
    }
}

// ---------------------------------------------------------------------------
// Update
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_bumps_version_and_persists(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let mut rec = RecommendationRepo::create(&pool, alice.id, &new_recommendation("Xtal"))
        .await
        .unwrap();

    UpdateRecommendation {
        title: Some("Ageispolis".to_string()),
        is_public: Some(false),
        ..Default::default()
    }
    .apply_to(&mut rec);
    RecommendationRepo::update(&pool, &mut rec).await.unwrap();
    assert_eq!(rec.version, 2);

    rec.artist = "AFX".to_string();
    RecommendationRepo::update(&pool, &mut rec).await.unwrap();
    assert_eq!(rec.version, 3);

    let fetched = RecommendationRepo::get(&pool, rec.id).await.unwrap();
    assert_eq!(fetched.version, 3);
    assert_eq!(fetched.title, "Ageispolis");
    assert_eq!(fetched.artist, "AFX");
    assert!(!fetched.is_public);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn stale_version_is_an_edit_conflict(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let rec = RecommendationRepo::create(&pool, alice.id, &new_recommendation("Xtal"))
        .await
        .unwrap();

    let mut first = rec.clone();
    first.title = "First".to_string();
    RecommendationRepo::update(&pool, &mut first).await.unwrap();

    let mut stale = rec;
    stale.title = "Stale".to_string();
    let err = RecommendationRepo::update(&pool, &mut stale).await.unwrap_err();
    assert_matches!(err, StoreError::EditConflict { .. });
    assert_eq!(stale.version, 1, "version must not change on conflict");

    let fetched = RecommendationRepo::get(&pool, first.id).await.unwrap();
    assert_eq!(fetched.title, "First");
    assert_eq!(fetched.version, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_updates_have_exactly_one_winner(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let rec = RecommendationRepo::create(&pool, alice.id, &new_recommendation("Xtal"))
        .await
        .unwrap();

    let mut left = rec.clone();
    left.title = "Left".to_string();
    let mut right = rec.clone();
    right.title = "Right".to_string();

    let (left_result, right_result) = tokio::join!(
        RecommendationRepo::update(&pool, &mut left),
        RecommendationRepo::update(&pool, &mut right),
    );

    let winner = match (left_result, right_result) {
        (Ok(()), Err(StoreError::EditConflict { .. })) => "Left",
        (Err(StoreError::EditConflict { .. }), Ok(())) => "Right",
        other => panic!("expected exactly one winner, got {other:?}"),
    };

    let fetched = RecommendationRepo::get(&pool, rec.id).await.unwrap();
    assert_eq!(fetched.title, winner);
    assert_eq!(fetched.version, 2);
}

// ---------------------------------------------------------------------------
// Delete
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_then_delete_again_is_not_found(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let rec = RecommendationRepo::create(&pool, alice.id, &new_recommendation("Xtal"))
        .await
        .unwrap();

    RecommendationRepo::delete(&pool, rec.id).await.unwrap();

    assert_matches!(
        RecommendationRepo::delete(&pool, rec.id).await,
        Err(StoreError::NotFound { .. })
    );
    assert_matches!(
        RecommendationRepo::get(&pool, rec.id).await,
        Err(StoreError::NotFound { .. })
    );
    assert_matches!(
        RecommendationRepo::delete(&pool, 0).await,
        Err(StoreError::NotFound { .. })
    );
}

// ---------------------------------------------------------------------------
// List
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_by_owner_with_metadata(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let bob = create_user(&pool, "bob").await;
    for title in ["One", "Two", "Three"] {
        RecommendationRepo::create(&pool, alice.id, &new_recommendation(title))
            .await
            .unwrap();
    }
    RecommendationRepo::create(&pool, bob.id, &new_recommendation("Four"))
        .await
        .unwrap();

    let query = RecommendationQuery {
        created_by: Some("ALICE".to_string()),
        ..everything()
    };
    let (rows, metadata) = RecommendationRepo::list(&pool, query, &filters(1, 2, "title"))
        .await
        .unwrap();

    let titles: Vec<_> = rows.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["One", "Three"]);
    assert_eq!(metadata.total_records, 3);
    assert_eq!(metadata.total_pages, 2);
    assert_eq!(metadata.current_page, 1);
    assert_eq!(metadata.page_size, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_second_page_returns_next_window(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    for i in 1..=25 {
        RecommendationRepo::create(&pool, alice.id, &new_recommendation(&format!("Track {i:02}")))
            .await
            .unwrap();
    }

    let (rows, metadata) = RecommendationRepo::list(&pool, everything(), &filters(2, 10, "title"))
        .await
        .unwrap();

    let titles: Vec<_> = rows.iter().map(|r| r.title.clone()).collect();
    let expected: Vec<_> = (11..=20).map(|i| format!("Track {i:02}")).collect();
    assert_eq!(titles, expected);
    assert_eq!(metadata.total_records, 25);
    assert_eq!(metadata.total_pages, 3);
    assert_eq!(metadata.current_page, 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_descending_sort_and_id_tie_break(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let mut ids = Vec::new();
    for _ in 0..3 {
        let rec = RecommendationRepo::create(&pool, alice.id, &new_recommendation("Same"))
            .await
            .unwrap();
        ids.push(rec.id);
    }

    let (rows, _) = RecommendationRepo::list(&pool, everything(), &filters(1, 10, "-title"))
        .await
        .unwrap();

    let listed: Vec<_> = rows.iter().map(|r| r.id).collect();
    ids.reverse();
    assert_eq!(listed, ids, "equal sort keys fall back to id DESC");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_hides_private_unless_requested(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    let mut private = new_recommendation("Hidden");
    private.is_public = false;
    RecommendationRepo::create(&pool, alice.id, &private).await.unwrap();
    RecommendationRepo::create(&pool, alice.id, &new_recommendation("Shown"))
        .await
        .unwrap();

    let (public_only, metadata) = RecommendationRepo::list(
        &pool,
        RecommendationQuery::default(),
        &filters(1, 20, "title"),
    )
    .await
    .unwrap();
    assert_eq!(public_only.len(), 1);
    assert_eq!(public_only[0].title, "Shown");
    assert_eq!(metadata.total_records, 1);

    let (all, _) = RecommendationRepo::list(&pool, everything(), &filters(1, 20, "title"))
        .await
        .unwrap();
    assert_eq!(all.len(), 2);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_matches_title_words(pool: PgPool) {
    let alice = create_user(&pool, "alice").await;
    for title in ["Windowlicker", "Come to Daddy", "Flim"] {
        RecommendationRepo::create(&pool, alice.id, &new_recommendation(title))
            .await
            .unwrap();
    }

    let query = RecommendationQuery {
        title: Some("daddy".to_string()),
        ..everything()
    };
    let (rows, _) = RecommendationRepo::list(&pool, query, &filters(1, 20, "title"))
        .await
        .unwrap();

    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0].title, "Come to Daddy");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_with_no_matches_has_zero_metadata(pool: PgPool) {
    let query = RecommendationQuery {
        created_by: Some("nobody".to_string()),
        ..everything()
    };
    let (rows, metadata) = RecommendationRepo::list(&pool, query, &filters(1, 20, "title"))
        .await
        .unwrap();

    assert!(rows.is_empty());
    assert_eq!(metadata, Default::default());
}
