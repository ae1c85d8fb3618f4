//! Repository for `permissions` and `user_permissions`.

use imgview_core::permissions::Permission;
use imgview_core::types::DbId;
use sqlx::PgPool;

use crate::models::permission::PermissionRow;

/// Permission catalogue and per-user grants.
pub struct PermissionRepo;

impl PermissionRepo {
    pub async fn list(pool: &PgPool) -> Result<Vec<PermissionRow>, sqlx::Error> {
        sqlx::query_as::<_, PermissionRow>(
            "SELECT codename, description FROM permissions ORDER BY codename",
        )
        .fetch_all(pool)
        .await
    }

    /// Codenames granted directly to a user (role-implied grants excluded).
    pub async fn codenames_for_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>(
            "SELECT codename FROM user_permissions WHERE user_id = $1 ORDER BY codename",
        )
        .bind(user_id)
        .fetch_all(pool)
        .await
    }

    /// Every `(user_id, codename)` grant, for listing many users at once.
    pub async fn list_all_grants(pool: &PgPool) -> Result<Vec<(DbId, String)>, sqlx::Error> {
        sqlx::query_as::<_, (DbId, String)>(
            "SELECT user_id, codename FROM user_permissions ORDER BY user_id, codename",
        )
        .fetch_all(pool)
        .await
    }

    /// Replace a user's grants with exactly `perms`, atomically.
    pub async fn replace_for_user(
        pool: &PgPool,
        user_id: DbId,
        perms: &[Permission],
    ) -> Result<Vec<String>, sqlx::Error> {
        let mut tx = pool.begin().await?;

        sqlx::query("DELETE FROM user_permissions WHERE user_id = $1")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;

        for perm in perms {
            sqlx::query("INSERT INTO user_permissions (user_id, codename) VALUES ($1, $2)")
                .bind(user_id)
                .bind(perm.codename())
                .execute(&mut *tx)
                .await?;
        }

        let codenames = sqlx::query_scalar::<_, String>(
            "SELECT codename FROM user_permissions WHERE user_id = $1 ORDER BY codename",
        )
        .bind(user_id)
        .fetch_all(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(codenames)
    }
}
