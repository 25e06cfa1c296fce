//! Repository for `permissions` and `users_permissions`.

use songbook_core::permissions::Permissions;
use songbook_core::types::DbId;
use sqlx::PgPool;

/// Reads and grants permission codes.
pub struct PermissionRepo;

impl PermissionRepo {
    /// All permission codes granted to a user.
    pub async fn codes_for_user(pool: &PgPool, user_id: DbId) -> Result<Permissions, sqlx::Error> {
        let codes: Vec<String> = sqlx::query_scalar(
            "SELECT p.code FROM permissions p \
             INNER JOIN users_permissions up ON up.permission_id = p.id \
             WHERE up.user_id = $1 \
             ORDER BY p.code",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await?;
        Ok(Permissions::new(codes))
    }

    /// Grant the given codes to a user. Codes already granted or unknown are
    /// ignored.
    pub async fn grant(pool: &PgPool, user_id: DbId, codes: &[&str]) -> Result<(), sqlx::Error> {
        let codes: Vec<String> = codes.iter().map(|c| c.to_string()).collect();
        sqlx::query(
            "INSERT INTO users_permissions (user_id, permission_id) \
             SELECT $1, p.id FROM permissions p WHERE p.code = ANY($2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(user_id)
        .bind(&codes)
        .execute(pool)
        .await?;
        Ok(())
    }
}
