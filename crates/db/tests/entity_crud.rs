//! Repository-level tests for categories, images and their foreign keys.
//!
//! Exercises the storage rules directly against a real database:
//! - Category name uniqueness
//! - `ON DELETE SET NULL` from categories and users onto images
//! - Slideshow sibling selection and ordering
//! - `uploaded_at` immutability

use imgview_core::permissions::Permission;
use imgview_db::models::category::CreateCategory;
use imgview_db::models::image::{CreateImageItem, ImageSearchParams, UpdateImageItem};
use imgview_db::models::user::CreateUser;
use imgview_db::repositories::{CategoryRepo, ImageRepo, PermissionRepo, UserRepo};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

async fn new_user(pool: &PgPool, username: &str) -> i64 {
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash: "not-a-real-hash".to_string(),
            role_id: 2,
            is_active: true,
        },
    )
    .await
    .expect("user insert should succeed")
    .id
}

async fn new_category(pool: &PgPool, name: &str, owner: Option<i64>) -> i64 {
    CategoryRepo::create(
        pool,
        &CreateCategory {
            name: name.to_string(),
            created_by: owner,
        },
    )
    .await
    .expect("category insert should succeed")
    .id
}

async fn new_image(pool: &PgPool, title: &str, owner: Option<i64>, category: Option<i64>) -> i64 {
    ImageRepo::create(
        pool,
        &CreateImageItem {
            title: title.to_string(),
            created_by: owner,
            category_id: category,
            image_path: format!("uploads/{title}.png"),
        },
    )
    .await
    .expect("image insert should succeed")
    .id
}

// ---------------------------------------------------------------------------
// Categories
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn duplicate_category_name_violates_unique_constraint(pool: PgPool) {
    new_category(&pool, "Landscapes", None).await;

    let err = CategoryRepo::create(
        &pool,
        &CreateCategory {
            name: "Landscapes".to_string(),
            created_by: None,
        },
    )
    .await
    .expect_err("duplicate name must fail");

    let db_err = err.as_database_error().expect("should be a database error");
    assert_eq!(db_err.code().as_deref(), Some("23505"));
    assert_eq!(db_err.constraint(), Some("uq_categories_name"));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_with_counts_scopes_by_owner(pool: PgPool) {
    let alice = new_user(&pool, "alice").await;
    let bob = new_user(&pool, "bob").await;
    let birds = new_category(&pool, "Birds", Some(alice)).await;
    new_category(&pool, "Architecture", Some(bob)).await;
    new_image(&pool, "robin", Some(alice), Some(birds)).await;
    new_image(&pool, "wren", Some(bob), Some(birds)).await;

    let all = CategoryRepo::list_with_counts(&pool, None).await.unwrap();
    let names: Vec<_> = all.iter().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["Architecture", "Birds"], "ordered by name");

    let mine = CategoryRepo::list_with_counts(&pool, Some(alice)).await.unwrap();
    assert_eq!(mine.len(), 1);
    assert_eq!(mine[0].name, "Birds");
    assert_eq!(mine[0].image_count, 2, "counts include other users' images");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_category_uncategorizes_images(pool: PgPool) {
    let cat = new_category(&pool, "Temp", None).await;
    let img = new_image(&pool, "orphan", None, Some(cat)).await;

    assert!(CategoryRepo::delete(&pool, cat).await.unwrap());

    let image = ImageRepo::find_by_id(&pool, img).await.unwrap().unwrap();
    assert_eq!(image.category_id, None);
    assert_eq!(image.category_name, None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn category_search_is_case_insensitive(pool: PgPool) {
    let carol = new_user(&pool, "carol").await;
    new_category(&pool, "Street Photography", Some(carol)).await;
    new_category(&pool, "Macro", None).await;

    let hits = CategoryRepo::search(&pool, Some("street")).await.unwrap();
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].created_by_username.as_deref(), Some("carol"));

    let everything = CategoryRepo::search(&pool, None).await.unwrap();
    assert_eq!(everything.len(), 2);
}

// ---------------------------------------------------------------------------
// Users
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn deleting_user_keeps_their_content(pool: PgPool) {
    let dave = new_user(&pool, "dave").await;
    let cat = new_category(&pool, "Dave's", Some(dave)).await;
    let img = new_image(&pool, "dave-pic", Some(dave), Some(cat)).await;

    assert!(UserRepo::delete(&pool, dave).await.unwrap());

    let category = CategoryRepo::find_by_id(&pool, cat).await.unwrap().unwrap();
    assert_eq!(category.created_by, None);
    let image = ImageRepo::find_by_id(&pool, img).await.unwrap().unwrap();
    assert_eq!(image.created_by, None);
    assert_eq!(image.category_id, Some(cat));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn permission_grants_replace_atomically(pool: PgPool) {
    let erin = new_user(&pool, "erin").await;

    let granted = PermissionRepo::replace_for_user(
        &pool,
        erin,
        &[Permission::ManageAllImages, Permission::ManageAllCategories],
    )
    .await
    .unwrap();
    assert_eq!(
        granted,
        vec!["can_manage_all_categories", "can_manage_all_images"]
    );

    let granted = PermissionRepo::replace_for_user(&pool, erin, &[]).await.unwrap();
    assert!(granted.is_empty());
    assert!(PermissionRepo::codenames_for_user(&pool, erin)
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Images
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn slides_follow_category_and_newest_first(pool: PgPool) {
    let cat = new_category(&pool, "Cats", None).await;
    let first = new_image(&pool, "first", None, Some(cat)).await;
    let second = new_image(&pool, "second", None, Some(cat)).await;
    new_image(&pool, "elsewhere", None, None).await;

    let slides = ImageRepo::list_slides(&pool, Some(cat)).await.unwrap();
    let ids: Vec<_> = slides.iter().map(|s| s.id).collect();
    assert_eq!(ids, vec![second, first]);

    let loose = ImageRepo::list_slides(&pool, None).await.unwrap();
    assert_eq!(loose.len(), 1);
    assert_eq!(loose[0].title, "elsewhere");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn list_filters_and_counts(pool: PgPool) {
    let cat = new_category(&pool, "Dogs", None).await;
    for n in 0..3 {
        new_image(&pool, &format!("dog-{n}"), None, Some(cat)).await;
    }
    new_image(&pool, "plain", None, None).await;

    assert_eq!(ImageRepo::count(&pool, None).await.unwrap(), 4);
    assert_eq!(ImageRepo::count(&pool, Some(cat)).await.unwrap(), 3);

    let page = ImageRepo::list(&pool, Some(cat), 2, 0).await.unwrap();
    assert_eq!(page.len(), 2);
    assert!(page.iter().all(|i| i.category_name.as_deref() == Some("Dogs")));

    let rest = ImageRepo::list(&pool, Some(cat), 2, 2).await.unwrap();
    assert_eq!(rest.len(), 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn update_keeps_uploaded_at_and_optional_path(pool: PgPool) {
    let img = new_image(&pool, "before", None, None).await;
    let original = ImageRepo::find_by_id(&pool, img).await.unwrap().unwrap();

    let updated = ImageRepo::update(
        &pool,
        img,
        &UpdateImageItem {
            title: "after".to_string(),
            category_id: None,
            image_path: None,
        },
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(updated.title, "after");
    assert_eq!(updated.image_path, original.image_path);
    assert_eq!(updated.uploaded_at, original.uploaded_at);

    // Even a direct write cannot move uploaded_at.
    sqlx::query("UPDATE image_items SET uploaded_at = NOW() - INTERVAL '1 day' WHERE id = $1")
        .bind(img)
        .execute(&pool)
        .await
        .unwrap();
    let again = ImageRepo::find_by_id(&pool, img).await.unwrap().unwrap();
    assert_eq!(again.uploaded_at, original.uploaded_at);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn delete_returns_stored_path(pool: PgPool) {
    let img = new_image(&pool, "gone", None, None).await;

    let path = ImageRepo::delete(&pool, img).await.unwrap();
    assert_eq!(path.as_deref(), Some("uploads/gone.png"));
    assert_eq!(ImageRepo::delete(&pool, img).await.unwrap(), None);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn image_search_matches_title_or_username(pool: PgPool) {
    let frank = new_user(&pool, "frank").await;
    new_image(&pool, "sunset", Some(frank), None).await;
    new_image(&pool, "sunrise", None, None).await;

    let by_title = ImageRepo::search(
        &pool,
        &ImageSearchParams {
            search: Some("SUN".to_string()),
            category: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(by_title.len(), 2);

    let by_user = ImageRepo::search(
        &pool,
        &ImageSearchParams {
            search: Some("frank".to_string()),
            category: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(by_user.len(), 1);
    assert_eq!(by_user[0].title, "sunset");
}
