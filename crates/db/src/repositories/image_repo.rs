//! Repository for the `image_items` table.
//!
//! Reads always join the category name and creator username; inserts and
//! updates go through a CTE so the returned row has the same shape.

use imgview_core::types::DbId;
use sqlx::PgPool;

use crate::models::image::{CreateImageItem, ImageItem, ImageSearchParams, UpdateImageItem};
use crate::repositories::like_pattern;

const JOINED_COLUMNS: &str = "i.id, i.title, i.created_by, u.username AS created_by_username, \
                              i.category_id, c.name AS category_name, i.image_path, \
                              i.uploaded_at, i.updated_at";

const JOINS: &str = "LEFT JOIN categories c ON c.id = i.category_id \
                     LEFT JOIN users u ON u.id = i.created_by";

/// Newest first; id breaks ties between uploads in the same instant.
const NEWEST_FIRST: &str = "ORDER BY i.uploaded_at DESC, i.id DESC";

/// Upper bound on admin search results.
const SEARCH_LIMIT: i64 = 200;

/// Image CRUD, gallery listing and slideshow queries.
pub struct ImageRepo;

impl ImageRepo {
    pub async fn create(pool: &PgPool, input: &CreateImageItem) -> Result<ImageItem, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                INSERT INTO image_items (title, created_by, category_id, image_path)
                VALUES ($1, $2, $3, $4)
                RETURNING *
             )
             SELECT {JOINED_COLUMNS} FROM i {JOINS}"
        );
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(&input.title)
            .bind(input.created_by)
            .bind(input.category_id)
            .bind(&input.image_path)
            .fetch_one(pool)
            .await
    }

    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<ImageItem>, sqlx::Error> {
        let query = format!("SELECT {JOINED_COLUMNS} FROM image_items i {JOINS} WHERE i.id = $1");
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// One gallery page, optionally restricted to a category.
    pub async fn list(
        pool: &PgPool,
        category_id: Option<DbId>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<ImageItem>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM image_items i {JOINS}
             WHERE ($1::BIGINT IS NULL OR i.category_id = $1)
             {NEWEST_FIRST}
             LIMIT $2 OFFSET $3"
        );
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(category_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(pool)
            .await
    }

    /// Total matching [`Self::list`] without pagination.
    pub async fn count(pool: &PgPool, category_id: Option<DbId>) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM image_items
             WHERE ($1::BIGINT IS NULL OR category_id = $1)",
        )
        .bind(category_id)
        .fetch_one(pool)
        .await
    }

    /// Slideshow siblings: every image in `category_id`, or every
    /// uncategorized image when `None`. Newest first.
    pub async fn list_slides(
        pool: &PgPool,
        category_id: Option<DbId>,
    ) -> Result<Vec<ImageItem>, sqlx::Error> {
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM image_items i {JOINS}
             WHERE i.category_id IS NOT DISTINCT FROM $1
             {NEWEST_FIRST}"
        );
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(category_id)
            .fetch_all(pool)
            .await
    }

    /// Replace title and category; swap the file path only when given.
    ///
    /// Returns `None` if no row with the given `id` exists.
    pub async fn update(
        pool: &PgPool,
        id: DbId,
        input: &UpdateImageItem,
    ) -> Result<Option<ImageItem>, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                UPDATE image_items SET
                    title = $2,
                    category_id = $3,
                    image_path = COALESCE($4, image_path)
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS} FROM i {JOINS}"
        );
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(input.category_id)
            .bind(&input.image_path)
            .fetch_optional(pool)
            .await
    }

    /// Move an image to another category (`None` = uncategorized).
    pub async fn set_category(
        pool: &PgPool,
        id: DbId,
        category_id: Option<DbId>,
    ) -> Result<Option<ImageItem>, sqlx::Error> {
        let query = format!(
            "WITH i AS (
                UPDATE image_items SET category_id = $2
                WHERE id = $1
                RETURNING *
             )
             SELECT {JOINED_COLUMNS} FROM i {JOINS}"
        );
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(id)
            .bind(category_id)
            .fetch_optional(pool)
            .await
    }

    /// Delete the row and return its stored file path so the caller can
    /// remove the file. `None` if no such row.
    pub async fn delete(pool: &PgPool, id: DbId) -> Result<Option<String>, sqlx::Error> {
        sqlx::query_scalar::<_, String>("DELETE FROM image_items WHERE id = $1 RETURNING image_path")
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Admin search: substring on title or creator username, optional
    /// category filter. Newest first.
    pub async fn search(
        pool: &PgPool,
        params: &ImageSearchParams,
    ) -> Result<Vec<ImageItem>, sqlx::Error> {
        let term = params
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(like_pattern);
        let query = format!(
            "SELECT {JOINED_COLUMNS} FROM image_items i {JOINS}
             WHERE ($1::TEXT IS NULL OR i.title ILIKE $1 OR u.username ILIKE $1)
               AND ($2::BIGINT IS NULL OR i.category_id = $2)
             {NEWEST_FIRST}
             LIMIT $3"
        );
        sqlx::query_as::<_, ImageItem>(&query)
            .bind(term)
            .bind(params.category)
            .bind(SEARCH_LIMIT)
            .fetch_all(pool)
            .await
    }
}
