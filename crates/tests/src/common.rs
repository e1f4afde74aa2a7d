use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    middleware,
    response::Html,
    routing::get,
    Router,
};
use serde_json::Value;
use server::auth::middleware::{route_guard, GuardState};
use shared_types::Role;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

/// Stand-in for the rendered pages: every page answers 200 with its path.
async fn page(req: Request<Body>) -> Html<String> {
    Html(format!("page {}", req.uri().path()))
}

/// Router shaped like the portal server: pages, a server-function tree and
/// the health endpoint, all behind the route guard.
pub fn test_app(guard: GuardState) -> Router {
    let health = Router::new()
        .route("/health", get(server::health::health_check))
        .with_state(guard.clone());

    Router::new()
        .route("/api/get_client_config", get(|| async { "{}" }))
        .fallback(page)
        .merge(health)
        .layer(middleware::from_fn_with_state(guard, route_guard))
}

/// Presence-only guard, the default.
pub fn presence_app() -> Router {
    test_app(GuardState::presence_only())
}

/// Guard that decodes role claims, with demo sessions allowed or not.
pub fn claims_app(demo_login: bool) -> Router {
    test_app(GuardState {
        verify_role_claims: true,
        jwt_secret: Some(TEST_SECRET.to_string()),
        demo_login,
    })
}

pub fn jwt_for(role: Role) -> String {
    server::auth::jwt::issue_token("42", role, chrono::Duration::minutes(30), TEST_SECRET)
        .unwrap()
}

pub struct Reply {
    pub status: StatusCode,
    pub location: Option<String>,
    pub set_cookie: Vec<String>,
    pub body: String,
}

impl Reply {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

/// GET a path with no credentials.
pub async fn get_anonymous(app: &Router, uri: &str) -> Reply {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

/// GET a path carrying the session cookie.
pub async fn get_with_cookie(app: &Router, uri: &str, token: &str) -> Reply {
    let req = Request::get(uri)
        .header(header::COOKIE, format!("theme=dark; jwtToken={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

/// GET a path carrying a Bearer header.
pub async fn get_with_bearer(app: &Router, uri: &str, token: &str) -> Reply {
    let req = Request::get(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, req).await
}

pub async fn send(app: &Router, req: Request<Body>) -> Reply {
    let response = app.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let location = response
        .headers()
        .get(header::LOCATION)
        .map(|v| v.to_str().unwrap().to_string());
    let set_cookie = response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .map(|v| v.to_str().unwrap().to_string())
        .collect();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    Reply {
        status,
        location,
        set_cookie,
        body: String::from_utf8_lossy(&bytes).into_owned(),
    }
}
