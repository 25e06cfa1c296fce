//! User models and DTOs.

use serde::{Deserialize, Serialize};
use songbook_core::types::{DbId, Timestamp, Version};
use sqlx::FromRow;

/// A row from the `users` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct User {
    pub id: DbId,
    pub created_at: Timestamp,
    pub name: String,
    pub username: String,
    pub email: String,
    pub activated: bool,
    pub version: Version,
}

/// DTO for creating a user.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUser {
    pub name: String,
    pub username: String,
    pub email: String,
}
