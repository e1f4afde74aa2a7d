use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use shared_types::{demo_token, Role};

use crate::common;

#[tokio::test]
async fn matching_role_reaches_its_portal() {
    let app = common::claims_app(false);

    for role in Role::ALL {
        let path = shared_types::dashboard_for(role);
        let reply = common::get_with_cookie(&app, path, &common::jwt_for(role)).await;
        assert_eq!(reply.status, StatusCode::OK, "{role} on {path}");
    }
}

#[tokio::test]
async fn wrong_role_is_sent_to_its_own_dashboard() {
    let app = common::claims_app(false);
    let token = common::jwt_for(Role::Student);

    let reply = common::get_with_cookie(&app, "/admin/dashboard", &token).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/student/dashboard"));
    assert!(reply.set_cookie.is_empty(), "a valid session is kept");
}

#[tokio::test]
async fn any_role_may_open_shared_signed_in_pages() {
    let app = common::claims_app(false);

    for role in Role::ALL {
        let reply = common::get_with_cookie(&app, "/profile", &common::jwt_for(role)).await;
        assert_eq!(reply.status, StatusCode::OK, "{role}");
    }
}

#[tokio::test]
async fn tampered_token_goes_to_login_and_loses_its_cookie() {
    let app = common::claims_app(false);
    let mut token = common::jwt_for(Role::Admin);
    token.push('x');

    let reply = common::get_with_cookie(&app, "/admin/dashboard", &token).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?redirect=/admin/dashboard")
    );
    assert_eq!(reply.set_cookie.len(), 2);
    assert!(reply.set_cookie[0].starts_with("jwtToken=;"));
    assert!(reply.set_cookie[1].starts_with("jwtExpiresAt=;"));
    assert!(reply.set_cookie.iter().all(|c| c.contains("Max-Age=0")));
}

#[tokio::test]
async fn token_signed_with_another_secret_is_rejected() {
    let app = common::claims_app(false);
    let token = server::auth::jwt::issue_token(
        "42",
        Role::Admin,
        chrono::Duration::minutes(5),
        "some-other-secret",
    )
    .unwrap();

    let reply = common::get_with_cookie(&app, "/admin/dashboard", &token).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert!(reply.location.unwrap().starts_with("/login?redirect="));
}

#[tokio::test]
async fn expired_token_is_rejected() {
    let app = common::claims_app(false);
    let token = server::auth::jwt::issue_token(
        "42",
        Role::Student,
        chrono::Duration::minutes(-10),
        common::TEST_SECRET,
    )
    .unwrap();

    let reply = common::get_with_cookie(&app, "/student/dashboard", &token).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.set_cookie.len(), 2);
}

#[tokio::test]
async fn demo_tokens_follow_the_demo_login_flag() {
    let token = demo_token(Role::Instructor, chrono::Utc::now());

    let enabled = common::claims_app(true);
    let reply = common::get_with_cookie(&enabled, "/instructor/dashboard", &token).await;
    assert_eq!(reply.status, StatusCode::OK);

    let reply = common::get_with_cookie(&enabled, "/student/dashboard", &token).await;
    assert_eq!(reply.location.as_deref(), Some("/instructor/dashboard"));

    let disabled = common::claims_app(false);
    let reply = common::get_with_cookie(&disabled, "/instructor/dashboard", &token).await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?redirect=/instructor/dashboard")
    );
}

#[tokio::test]
async fn public_pages_ignore_bad_tokens() {
    let app = common::claims_app(false);

    let reply = common::get_with_cookie(&app, "/courses", "garbage").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert!(reply.set_cookie.is_empty());
}
