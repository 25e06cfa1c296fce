//! The owning user embedded in every versioned entity.

use serde::Serialize;
use songbook_core::types::DbId;
use sqlx::FromRow;

/// Public profile of the user who created an entity.
///
/// Read from the `owner_*` aliases produced by the store's owner join and
/// serialized as the nested `created_by` object.
#[derive(Debug, Clone, PartialEq, Eq, FromRow, Serialize)]
pub struct Owner {
    #[sqlx(rename = "owner_id")]
    pub id: DbId,
    #[sqlx(rename = "owner_name")]
    pub name: String,
    #[sqlx(rename = "owner_username")]
    pub username: String,
}
