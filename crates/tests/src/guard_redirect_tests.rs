use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn anonymous_portal_visit_redirects_to_login_with_return_path() {
    let app = common::presence_app();

    let reply = common::get_anonymous(&app, "/student/dashboard").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?redirect=/student/dashboard")
    );
    assert!(!reply.body.contains("page"), "page must not render");
}

#[tokio::test]
async fn return_path_keeps_the_query_string() {
    let app = common::presence_app();

    let reply = common::get_anonymous(&app, "/instructor/courses?tab=drafts").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(
        reply.location.as_deref(),
        Some("/login?redirect=/instructor/courses%3Ftab%3Ddrafts")
    );
}

#[tokio::test]
async fn signed_in_pages_outside_portals_also_need_a_session() {
    let app = common::presence_app();

    let reply = common::get_anonymous(&app, "/profile").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
    assert_eq!(reply.location.as_deref(), Some("/login?redirect=/profile"));
}

#[tokio::test]
async fn public_pages_render_without_a_session() {
    let app = common::presence_app();

    for path in ["/", "/login", "/register", "/forgot-password", "/courses", "/courses/data-structures"] {
        let reply = common::get_anonymous(&app, path).await;
        assert_eq!(reply.status, StatusCode::OK, "{path}");
        assert_eq!(reply.body, format!("page {path}"));
    }
}

#[tokio::test]
async fn login_page_with_redirect_query_is_public() {
    let app = common::presence_app();

    let reply = common::get_anonymous(&app, "/login?redirect=/admin/dashboard").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn server_functions_and_assets_bypass_the_guard() {
    let app = common::presence_app();

    let reply = common::get_anonymous(&app, "/api/get_client_config").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "{}");

    let reply = common::get_anonymous(&app, "/assets/portal.css").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn presence_only_admits_any_token_to_any_portal() {
    let app = common::presence_app();

    let reply = common::get_with_cookie(&app, "/admin/dashboard", "not-even-a-jwt").await;
    assert_eq!(reply.status, StatusCode::OK);
    assert_eq!(reply.body, "page /admin/dashboard");
}

#[tokio::test]
async fn bearer_header_counts_as_a_session() {
    let app = common::presence_app();

    let reply = common::get_with_bearer(&app, "/student/dashboard", "abc").await;
    assert_eq!(reply.status, StatusCode::OK);
}

#[tokio::test]
async fn empty_cookie_is_no_session() {
    let app = common::presence_app();

    let reply = common::get_with_cookie(&app, "/student/dashboard", "").await;
    assert_eq!(reply.status, StatusCode::SEE_OTHER);
}
