//! HTTP-level tests for signup, login, token refresh, logout and `/me`.

mod common;

use axum::http::StatusCode;
use common::{
    body_json, create_user, get, get_auth, post_json, post_json_auth, ADMIN_ROLE_ID,
    TEST_PASSWORD, USER_ROLE_ID,
};
use imgview_core::permissions::Permission;
use imgview_db::repositories::{PermissionRepo, UserRepo};
use sqlx::PgPool;

async fn login(test: &common::TestApp, username: &str, password: &str) -> serde_json::Value {
    let body = serde_json::json!({ "username": username, "password": password });
    let response = post_json(test.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await
}

// ---------------------------------------------------------------------------
// Signup
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_creates_inactive_account(pool: PgPool) {
    let test = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "username": "newcomer",
        "password1": "correct-horse-9",
        "password2": "correct-horse-9",
    });
    let response = post_json(test.app(), "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::CREATED);

    let json = body_json(response).await;
    assert_eq!(json["data"]["pending_approval"], true);
    assert_eq!(json["data"]["user"]["username"], "newcomer");
    assert_eq!(json["data"]["user"]["is_active"], false);
    assert_eq!(json["data"]["user"]["role"], "user");

    let stored = UserRepo::find_by_username(&pool, "newcomer")
        .await
        .unwrap()
        .expect("user should exist");
    assert!(!stored.is_active);
    assert_ne!(stored.password_hash, "correct-horse-9");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_then_login_is_pending_until_activated(pool: PgPool) {
    let test = common::build_test_app(pool.clone());

    let body = serde_json::json!({
        "username": "waiting",
        "password1": "correct-horse-9",
        "password2": "correct-horse-9",
    });
    post_json(test.app(), "/api/v1/auth/signup", body).await;

    let body = serde_json::json!({ "username": "waiting", "password": "correct-horse-9" });
    let response = post_json(test.app(), "/api/v1/auth/login", body.clone()).await;
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("pending approval"));

    let user = UserRepo::find_by_username(&pool, "waiting").await.unwrap().unwrap();
    UserRepo::set_active(&pool, user.id, true).await.unwrap();

    let response = post_json(test.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_mismatched_passwords(pool: PgPool) {
    let test = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "typo",
        "password1": "correct-horse-9",
        "password2": "correct-horse-8",
    });
    let response = post_json(test.app(), "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["error"], "The two password fields didn't match.");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_rejects_weak_password_and_bad_username(pool: PgPool) {
    let test = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "numbers",
        "password1": "12345678",
        "password2": "12345678",
    });
    let response = post_json(test.app(), "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body = serde_json::json!({
        "username": "has space",
        "password1": "correct-horse-9",
        "password2": "correct-horse-9",
    });
    let response = post_json(test.app(), "/api/v1/auth/signup", body).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn signup_duplicate_username_conflicts(pool: PgPool) {
    create_user(&pool, "taken", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool);

    let body = serde_json::json!({
        "username": "taken",
        "password1": "correct-horse-9",
        "password2": "correct-horse-9",
    });
    let response = post_json(test.app(), "/api/v1/auth/signup", body).await;

    assert_eq!(response.status(), StatusCode::CONFLICT);
}

// ---------------------------------------------------------------------------
// Login
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_success_returns_tokens(pool: PgPool) {
    let user = create_user(&pool, "loginuser", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool.clone());

    let json = login(&test, "loginuser", TEST_PASSWORD).await;

    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());
    assert_eq!(json["expires_in"], 15 * 60);
    assert_eq!(json["user"]["id"], user.id);
    assert_eq!(json["user"]["role"], "user");

    let reloaded = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(reloaded.last_login_at.is_some());
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn login_wrong_password_or_unknown_user_is_401(pool: PgPool) {
    create_user(&pool, "wrongpw", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "wrongpw", "password": "not-the-password" });
    let response = post_json(test.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let body = serde_json::json!({ "username": "ghost", "password": "whatever-really" });
    let response = post_json(test.app(), "/api/v1/auth/login", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn inactive_user_with_wrong_password_gets_generic_401(pool: PgPool) {
    create_user(&pool, "sleeper", USER_ROLE_ID, false).await;
    let test = common::build_test_app(pool);

    let body = serde_json::json!({ "username": "sleeper", "password": "guessing-wrong" });
    let response = post_json(test.app(), "/api/v1/auth/login", body).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// Refresh / logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn refresh_rotates_token(pool: PgPool) {
    create_user(&pool, "refresher", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool);

    let login_json = login(&test, "refresher", TEST_PASSWORD).await;
    let refresh_token = login_json["refresh_token"].as_str().unwrap().to_string();

    let body = serde_json::json!({ "refresh_token": refresh_token });
    let response = post_json(test.app(), "/api/v1/auth/refresh", body.clone()).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_ne!(json["refresh_token"].as_str().unwrap(), refresh_token);

    // The old token was revoked by the rotation.
    let response = post_json(test.app(), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn concurrent_refresh_with_same_token_succeeds_once(pool: PgPool) {
    create_user(&pool, "racer", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool);

    let login_json = login(&test, "racer", TEST_PASSWORD).await;
    let body = serde_json::json!({ "refresh_token": login_json["refresh_token"] });

    let (first, second) = tokio::join!(
        post_json(test.app(), "/api/v1/auth/refresh", body.clone()),
        post_json(test.app(), "/api/v1/auth/refresh", body),
    );

    let mut statuses = vec![first.status(), second.status()];
    statuses.sort();
    assert_eq!(statuses, vec![StatusCode::OK, StatusCode::UNAUTHORIZED]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_revokes_refresh_tokens(pool: PgPool) {
    create_user(&pool, "leaver", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool);

    let login_json = login(&test, "leaver", TEST_PASSWORD).await;
    let access = login_json["access_token"].as_str().unwrap();
    let refresh = login_json["refresh_token"].as_str().unwrap();

    let response =
        post_json_auth(test.app(), "/api/v1/auth/logout", access, serde_json::json!({})).await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let body = serde_json::json!({ "refresh_token": refresh });
    let response = post_json(test.app(), "/api/v1/auth/refresh", body).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn logout_requires_auth(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = post_json(test.app(), "/api/v1/auth/logout", serde_json::json!({})).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

// ---------------------------------------------------------------------------
// /me
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn me_lists_effective_permissions(pool: PgPool) {
    let user = create_user(&pool, "curator", USER_ROLE_ID, true).await;
    PermissionRepo::replace_for_user(&pool, user.id, &[Permission::ManageAllImages])
        .await
        .unwrap();
    let admin = create_user(&pool, "root", ADMIN_ROLE_ID, true).await;
    let test = common::build_test_app(pool);

    let response = get_auth(test.app(), "/api/v1/auth/me", &test.token_for(&user, "user")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["permissions"],
        serde_json::json!(["can_manage_all_images"])
    );

    let response = get_auth(test.app(), "/api/v1/auth/me", &test.token_for(&admin, "admin")).await;
    let json = body_json(response).await;
    assert_eq!(
        json["data"]["permissions"],
        serde_json::json!(["can_manage_all_categories", "can_manage_all_images"])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn deactivated_user_token_stops_working(pool: PgPool) {
    let user = create_user(&pool, "revoked", USER_ROLE_ID, true).await;
    let test = common::build_test_app(pool.clone());
    let token = test.token_for(&user, "user");

    UserRepo::set_active(&pool, user.id, false).await.unwrap();

    let response = get_auth(test.app(), "/api/v1/auth/me", &token).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn malformed_bearer_is_rejected(pool: PgPool) {
    let test = common::build_test_app(pool);

    let response = get_auth(test.app(), "/api/v1/auth/me", "not.a.jwt").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = get(test.app(), "/api/v1/auth/me").await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
