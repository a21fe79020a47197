//! HTTP-level integration tests for logging in and out.
//!
//! Tests cover the login form's `next` handling, successful and failed
//! logins, the login redirect for protected routes, flash messages and
//! logout.

mod common;

use axum::http::header::HOST;
use axum::http::{Request, StatusCode};
use common::{
    body_json, body_text, create_user, form_field, get, get_with_cookie, location, logged_in,
    post_form, set_cookie, TEST_PASSWORD,
};
use scriptorium_api::auth::session::SESSION_COOKIE;
use scriptorium_api::flash::FLASH_COOKIE;
use scriptorium_core::workflow::Stage;
use scriptorium_db::repositories::UserRepo;
use sqlx::SqlitePool;
use tower::ServiceExt;

// ---------------------------------------------------------------------------
// Login form
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_page_prefills_next_from_query(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/login?next=%2Fview%2Fp1").await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let form = &json["data"]["form"];
    assert_eq!(form["action"], "/login");
    assert_eq!(form_field(form, "next")["value"], "/view/p1");
    assert_eq!(form_field(form, "password")["type"], "password");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_page_drops_offsite_next(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/login?next=http%3A%2F%2Fevil.example%2F").await;

    let json = body_json(response).await;
    assert_eq!(form_field(&json["data"]["form"], "next")["value"], "");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_page_falls_back_to_referrer(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let request = Request::get("/login")
        .header(HOST, "ocr.example")
        .header("referer", "http://ocr.example/view/p7")
        .body(axum::body::Body::empty())
        .unwrap();
    let response = app.oneshot(request).await.unwrap();

    let json = body_json(response).await;
    assert_eq!(
        form_field(&json["data"]["form"], "next")["value"],
        "http://ocr.example/view/p7"
    );
}

// ---------------------------------------------------------------------------
// Login submission
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_sets_session_and_redirects_home(pool: SqlitePool) {
    let user = create_user(&pool, "ada").await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/login",
        None,
        &[("username", "ada"), ("password", TEST_PASSWORD), ("next", "")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/");
    assert!(set_cookie(&response, SESSION_COOKIE).is_some());
    assert!(set_cookie(&response, FLASH_COOKIE).is_some());

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_some(), "last login must be recorded");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_success_redirects_to_next(pool: SqlitePool) {
    create_user(&pool, "ada").await;
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/login",
        None,
        &[
            ("username", "ada"),
            ("password", TEST_PASSWORD),
            ("next", "/edit/p1/stage2"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/edit/p1/stage2");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_offsite_next_is_rejected(pool: SqlitePool) {
    create_user(&pool, "ada").await;
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/login",
        None,
        &[
            ("username", "ada"),
            ("password", TEST_PASSWORD),
            ("next", "https://evil.example/phish"),
        ],
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(set_cookie(&response, SESSION_COOKIE).is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_with_control_characters_in_next_is_rejected(pool: SqlitePool) {
    let user = create_user(&pool, "ada").await;
    let app = common::build_test_app(pool.clone());

    for next in ["/view/p1\nX-Evil: 1", "/view/\u{1}p1"] {
        let response = post_form(
            app.clone(),
            "/login",
            None,
            &[("username", "ada"), ("password", TEST_PASSWORD), ("next", next)],
        )
        .await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "next = {next:?}");
        assert!(set_cookie(&response, SESSION_COOKIE).is_none());
        assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
    }

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_none(), "a refused login must not be recorded");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_wrong_password_rerenders_form(pool: SqlitePool) {
    let user = create_user(&pool, "ada").await;
    let app = common::build_test_app(pool.clone());

    let response = post_form(
        app,
        "/login",
        None,
        &[("username", "ada"), ("password", "wrong-password"), ("next", "/view/p1")],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, SESSION_COOKIE).is_none());

    let json = body_json(response).await;
    assert_eq!(json["flashes"][0]["category"], "error");
    assert_eq!(json["flashes"][0]["message"], "Incorrect username or password.");
    let form = &json["data"]["form"];
    assert_eq!(form_field(form, "username")["value"], "ada");
    assert_eq!(form_field(form, "next")["value"], "/view/p1");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert!(stored.last_login_at.is_none());
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_unknown_user_rerenders_form(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = post_form(
        app,
        "/login",
        None,
        &[("username", "nobody"), ("password", TEST_PASSWORD)],
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(set_cookie(&response, SESSION_COOKIE).is_none());
    let json = body_json(response).await;
    assert_eq!(json["flashes"][0]["message"], "Incorrect username or password.");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn login_flash_is_shown_once_on_the_index(pool: SqlitePool) {
    create_user(&pool, "ada").await;
    let app = common::build_test_app(pool);

    let login = post_form(
        app.clone(),
        "/login",
        None,
        &[("username", "ada"), ("password", TEST_PASSWORD)],
    )
    .await;
    let session = set_cookie(&login, SESSION_COOKIE).unwrap();
    let flash = set_cookie(&login, FLASH_COOKIE).unwrap();

    let response = get_with_cookie(app, "/", &format!("{session}; {flash}")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        set_cookie(&response, FLASH_COOKIE).as_deref(),
        Some("scriptorium_flash="),
        "rendering must consume pending flashes"
    );
    let json = body_json(response).await;
    assert_eq!(json["flashes"][0]["message"], "Logged in successfully.");
}

// ---------------------------------------------------------------------------
// Protected routes
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn protected_route_redirects_to_login(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/view/p1").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Fview%2Fp1");
}

#[sqlx::test(migrations = "../db/migrations")]
async fn forged_session_cookie_redirects_to_login(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get_with_cookie(app, "/", "scriptorium_session=not.a.token").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2F");
}

// ---------------------------------------------------------------------------
// Logout
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_expires_cookie_and_clears_position(pool: SqlitePool) {
    common::import_page(&pool, "p1", &["Helo"]).await;
    let app = common::build_test_app(pool.clone());
    let (user, cookie) = logged_in(&pool, app.clone(), "ada").await;
    UserRepo::set_position(&pool, user.id, "p1", Stage::Transcription)
        .await
        .unwrap();

    let response = get_with_cookie(app, "/logout", &cookie).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        set_cookie(&response, SESSION_COOKIE).as_deref(),
        Some("scriptorium_session=")
    );
    assert_eq!(body_text(response).await, "Logged out");

    let stored = UserRepo::find_by_id(&pool, user.id).await.unwrap().unwrap();
    assert_eq!(stored.position(), None);
}

#[sqlx::test(migrations = "../db/migrations")]
async fn logout_requires_login(pool: SqlitePool) {
    let app = common::build_test_app(pool);

    let response = get(app, "/logout").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(location(&response), "/login?next=%2Flogout");
}
