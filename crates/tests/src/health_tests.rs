use axum::http::StatusCode;
use pretty_assertions::assert_eq;

use crate::common;

#[tokio::test]
async fn health_is_reachable_without_a_session() {
    let app = common::presence_app();

    let reply = common::get_anonymous(&app, "/health").await;
    assert_eq!(reply.status, StatusCode::OK);
    let body = reply.json();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["guard"], "presence");
}

#[tokio::test]
async fn health_reports_role_claim_mode() {
    let app = common::claims_app(false);

    let reply = common::get_anonymous(&app, "/health").await;
    assert_eq!(reply.json()["guard"], "role-claims");
}
