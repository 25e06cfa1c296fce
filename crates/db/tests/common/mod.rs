//! Shared fixtures for store integration tests.

#![allow(dead_code)]

use songbook_db::models::recommendation::CreateRecommendation;
use songbook_db::models::user::{CreateUser, User};
use songbook_db::repositories::UserRepo;
use sqlx::PgPool;

pub async fn create_user(pool: &PgPool, username: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            name: format!("{username} test"),
            username: username.to_string(),
            email: format!("{username}@example.com"),
        },
    )
    .await
    .unwrap()
}

pub fn new_recommendation(title: &str) -> CreateRecommendation {
    CreateRecommendation {
        artist: "Aphex Twin".to_string(),
        title: title.to_string(),
        cover_url: None,
        yt_link: Some("https://youtu.be/xyz".to_string()),
        spotify_link: None,
        comment: None,
        is_public: true,
    }
}
