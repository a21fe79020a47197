#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Arc;

use axum::body::Body;
use axum::http::header::{CONTENT_TYPE, COOKIE, LOCATION, SET_COOKIE};
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::SqlitePool;
use tower::ServiceExt;

use scriptorium_api::auth::csrf;
use scriptorium_api::auth::password::hash_password;
use scriptorium_api::auth::session::{validate_token, SessionConfig, SESSION_COOKIE};
use scriptorium_api::config::ServerConfig;
use scriptorium_api::router::build_app_router;
use scriptorium_api::state::AppState;
use scriptorium_db::models::line::CreateLine;
use scriptorium_db::models::page::CreatePage;
use scriptorium_db::models::user::{CreateUser, User};
use scriptorium_db::repositories::{LineRepo, PageRepo, UserRepo};

pub const TEST_PASSWORD: &str = "correct-horse-battery";

/// Session settings shared by the test app and the CSRF helper.
pub fn test_session_config() -> SessionConfig {
    SessionConfig {
        secret: "test-secret-that-is-long-enough-for-hmac".to_string(),
        expiry_mins: 60,
        cookie_secure: false,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: "sqlite::memory:".to_string(),
        request_timeout_secs: 30,
        image_dir: PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/tests/fixtures/images")),
        session: test_session_config(),
    }
}

/// Build the full application router, with the same middleware stack as
/// production, on top of the given pool.
pub fn build_test_app(pool: SqlitePool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri), Body::empty()).await
}

pub async fn get_with_cookie(app: Router, uri: &str, cookie: &str) -> Response<Body> {
    send(app, Request::get(uri).header(COOKIE, cookie), Body::empty()).await
}

/// POST a url-encoded form, optionally with a `Cookie` header.
pub async fn post_form(
    app: Router,
    uri: &str,
    cookie: Option<&str>,
    fields: &[(&str, &str)],
) -> Response<Body> {
    let body = fields
        .iter()
        .map(|(k, v)| format!("{}={}", urlencoding::encode(k), urlencoding::encode(v)))
        .collect::<Vec<_>>()
        .join("&");

    let mut builder = Request::post(uri).header(CONTENT_TYPE, "application/x-www-form-urlencoded");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    send(app, builder, Body::from(body)).await
}

async fn send(app: Router, builder: axum::http::request::Builder, body: Body) -> Response<Body> {
    app.oneshot(builder.body(body).unwrap()).await.unwrap()
}

// ---------------------------------------------------------------------------
// Responses
// ---------------------------------------------------------------------------

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

pub fn location(response: &Response<Body>) -> String {
    response
        .headers()
        .get(LOCATION)
        .expect("response should carry a Location header")
        .to_str()
        .unwrap()
        .to_string()
}

/// The `name=value` pair set for cookie `name`, if any.
pub fn set_cookie(response: &Response<Body>, name: &str) -> Option<String> {
    response
        .headers()
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .filter_map(|v| v.split(';').next())
        .find(|pair| pair.starts_with(&format!("{name}=")))
        .map(str::to_string)
}

/// The field called `name` in a serialized form.
pub fn form_field<'a>(form: &'a serde_json::Value, name: &str) -> &'a serde_json::Value {
    form["fields"]
        .as_array()
        .unwrap()
        .iter()
        .find(|field| field["name"] == name)
        .unwrap_or_else(|| panic!("form has no field {name}"))
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub async fn create_user(pool: &SqlitePool, username: &str) -> User {
    let input = CreateUser {
        username: username.to_string(),
        email: format!("{username}@example.org"),
        password_hash: hash_password(TEST_PASSWORD).unwrap(),
        is_admin: false,
    };
    UserRepo::create(pool, &input).await.unwrap()
}

/// Import a page whose lines are `ocr`, at positions 0, 1, ...
pub async fn import_page(pool: &SqlitePool, id: &str, ocr: &[&str]) {
    let page = CreatePage {
        id: id.to_string(),
        shelfmark: "C 104".to_string(),
        document: "12".to_string(),
        sequence: "0003".to_string(),
    };
    PageRepo::create(pool, &page).await.unwrap();

    for (position, text) in ocr.iter().enumerate() {
        let line = CreateLine {
            page_id: id.to_string(),
            position: position as i64,
            ocr: text.to_string(),
            corrected: None,
        };
        LineRepo::create(pool, &line).await.unwrap();
    }
}

/// Log in through the form and return the session cookie pair.
pub async fn login(app: Router, username: &str) -> String {
    let response = post_form(
        app,
        "/login",
        None,
        &[("username", username), ("password", TEST_PASSWORD), ("next", "")],
    )
    .await;
    set_cookie(&response, SESSION_COOKIE).expect("login should set the session cookie")
}

/// Create a user and log them in.
pub async fn logged_in(pool: &SqlitePool, app: Router, username: &str) -> (User, String) {
    let user = create_user(pool, username).await;
    let cookie = login(app, username).await;
    (user, cookie)
}

/// The CSRF token the server expects for the session in `cookie`.
pub fn csrf_token(cookie: &str) -> String {
    let token = cookie
        .strip_prefix(&format!("{SESSION_COOKIE}="))
        .expect("not a session cookie");
    let claims = validate_token(token, &test_session_config()).unwrap();
    csrf::issue(&test_session_config().secret, &claims.jti)
}
