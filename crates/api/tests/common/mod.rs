#![allow(dead_code)]

use std::io::Cursor;
use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use image::{DynamicImage, ImageFormat, RgbImage};
use sqlx::PgPool;
use tempfile::TempDir;
use tower::ServiceExt;

use imgview_api::auth::jwt::{generate_access_token, JwtConfig};
use imgview_api::auth::password::hash_password;
use imgview_api::config::ServerConfig;
use imgview_api::media::MediaStore;
use imgview_api::router::build_app_router;
use imgview_api::state::AppState;
use imgview_db::models::user::{CreateUser, User};
use imgview_db::repositories::UserRepo;

pub const ADMIN_ROLE_ID: i64 = 1;
pub const USER_ROLE_ID: i64 = 2;
pub const TEST_PASSWORD: &str = "gallery-pass-42";

const BOUNDARY: &str = "imgview-test-boundary";

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config(media_root: &Path) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        media_root: media_root.to_path_buf(),
        max_upload_bytes: 2 * 1024 * 1024,
        admin_bootstrap: None,
        jwt: JwtConfig {
            secret: "imgview-integration-test-secret".to_string(),
            access_token_expiry_mins: 15,
            refresh_token_expiry_days: 7,
        },
    }
}

/// A running app plus the temporary media root it writes into. Keep the
/// struct alive for the duration of the test; dropping it removes the dir.
pub struct TestApp {
    pub router: Router,
    pub config: ServerConfig,
    pub media_dir: TempDir,
}

impl TestApp {
    /// A fresh clone of the router for one `oneshot` call.
    pub fn app(&self) -> Router {
        self.router.clone()
    }

    pub fn token_for(&self, user: &User, role: &str) -> String {
        generate_access_token(user.id, &user.username, role, &self.config.jwt)
            .expect("token generation should succeed")
    }

    pub fn media_file(&self, relative: &str) -> std::path::PathBuf {
        self.media_dir.path().join(relative)
    }
}

/// Build the full application router, exactly as `main.rs` does, over a
/// temporary media root.
pub fn build_test_app(pool: PgPool) -> TestApp {
    let media_dir = tempfile::tempdir().expect("tempdir should be creatable");
    let config = test_config(media_dir.path());

    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        media: Arc::new(MediaStore::new(media_dir.path())),
    };

    TestApp {
        router: build_app_router(state, &config),
        config,
        media_dir,
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with [`TEST_PASSWORD`].
pub async fn create_user(pool: &PgPool, username: &str, role_id: i64, is_active: bool) -> User {
    let password_hash = hash_password(TEST_PASSWORD).expect("hashing should succeed");
    UserRepo::create(
        pool,
        &CreateUser {
            username: username.to_string(),
            password_hash,
            role_id,
            is_active,
        },
    )
    .await
    .expect("user creation should succeed")
}

/// A tiny but valid PNG.
pub fn png_bytes() -> Vec<u8> {
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(RgbImage::new(2, 2))
        .write_to(&mut Cursor::new(&mut buf), ImageFormat::Png)
        .expect("png encoding should succeed");
    buf
}

/// One part of a multipart form.
pub enum Part<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        file_name: &'a str,
        bytes: &'a [u8],
    },
}

/// Encode a `multipart/form-data` body with a fixed boundary.
pub fn multipart_body(parts: &[Part<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            Part::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                );
                body.extend_from_slice(value.as_bytes());
            }
            Part::File {
                name,
                file_name,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{file_name}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
            }
        }
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.expect("request should complete")
}

fn builder(method: Method, uri: &str, token: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match token {
        Some(t) => builder.header(AUTHORIZATION, format!("Bearer {t}")),
        None => builder,
    }
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = builder(Method::GET, uri, None)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = builder(Method::GET, uri, Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_json(app: Router, uri: &str, body: serde_json::Value) -> Response<Body> {
    json_request(app, Method::POST, uri, None, body).await
}

pub async fn post_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::POST, uri, Some(token), body).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    json_request(app, Method::PUT, uri, Some(token), body).await
}

pub async fn delete_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = builder(Method::DELETE, uri, Some(token))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

async fn json_request(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: serde_json::Value,
) -> Response<Body> {
    let request = builder(method, uri, token)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// Send a multipart form. `token = None` sends it anonymously.
pub async fn multipart(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    parts: &[Part<'_>],
) -> Response<Body> {
    let request = builder(method, uri, token)
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .expect("body should be readable")
        .to_bytes()
        .to_vec()
}
