//! Repository for the `categories` table.

use imgview_core::types::DbId;
use sqlx::PgPool;

use crate::models::category::{Category, CategoryWithCount, CategoryWithCreator, CreateCategory};
use crate::repositories::like_pattern;

const COLUMNS: &str = "id, name, created_by, created_at, updated_at";

/// Category CRUD plus the aggregated views used by the category page and
/// admin search.
pub struct CategoryRepo;

impl CategoryRepo {
    pub async fn create(pool: &PgPool, input: &CreateCategory) -> Result<Category, sqlx::Error> {
        let query = format!(
            "INSERT INTO categories (name, created_by)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(&input.name)
            .bind(input.created_by)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE id = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    pub async fn find_by_name(pool: &PgPool, name: &str) -> Result<Option<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories WHERE name = $1");
        sqlx::query_as::<_, Category>(&query)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Every category, ordered by name (gallery filter bar).
    pub async fn list_all(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM categories ORDER BY name ASC");
        sqlx::query_as::<_, Category>(&query).fetch_all(pool).await
    }

    /// Categories with their image counts, ordered by name.
    ///
    /// `owner = Some(id)` restricts to categories created by that user.
    pub async fn list_with_counts(
        pool: &PgPool,
        owner: Option<DbId>,
    ) -> Result<Vec<CategoryWithCount>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCount>(
            "SELECT c.id, c.name, c.created_by, COUNT(i.id) AS image_count
             FROM categories c
             LEFT JOIN image_items i ON i.category_id = c.id
             WHERE ($1::BIGINT IS NULL OR c.created_by = $1)
             GROUP BY c.id
             ORDER BY c.name ASC",
        )
        .bind(owner)
        .fetch_all(pool)
        .await
    }

    /// Returns `None` if no row with the given `id` exists.
    pub async fn rename(
        pool: &PgPool,
        id: DbId,
        name: &str,
    ) -> Result<Option<Category>, sqlx::Error> {
        let query = format!(
            "UPDATE categories SET name = $2 WHERE id = $1
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Category>(&query)
            .bind(id)
            .bind(name)
            .fetch_optional(pool)
            .await
    }

    /// Images in the category survive with `category_id = NULL`.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Case-insensitive substring search on name, with creator usernames.
    pub async fn search(
        pool: &PgPool,
        term: Option<&str>,
    ) -> Result<Vec<CategoryWithCreator>, sqlx::Error> {
        sqlx::query_as::<_, CategoryWithCreator>(
            "SELECT c.id, c.name, c.created_by, u.username AS created_by_username, c.created_at
             FROM categories c
             LEFT JOIN users u ON u.id = c.created_by
             WHERE ($1::TEXT IS NULL OR c.name ILIKE $1)
             ORDER BY c.name ASC",
        )
        .bind(term.map(like_pattern))
        .fetch_all(pool)
        .await
    }
}
