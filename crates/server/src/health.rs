use axum::extract::State;
use axum::Json;
use serde::Serialize;
use std::sync::OnceLock;
use std::time::Instant;

use crate::auth::middleware::GuardState;

static START_TIME: OnceLock<Instant> = OnceLock::new();

/// Record the application start time. Call once during startup.
pub fn record_start_time() {
    START_TIME.get_or_init(Instant::now);
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub guard: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// How the route guard treats tokens, as reported by `/health`.
pub fn guard_mode(guard: &GuardState) -> &'static str {
    match (guard.verify_role_claims, guard.jwt_secret.is_some()) {
        (true, true) => "role-claims",
        _ => "presence",
    }
}

/// Health check handler. The route guard lets `/health` through untouched.
pub async fn health_check(State(guard): State<GuardState>) -> Json<HealthResponse> {
    let uptime = START_TIME.get().map(|t| t.elapsed().as_secs()).unwrap_or(0);

    Json(HealthResponse {
        status: "ok".to_string(),
        guard: guard_mode(&guard).to_string(),
        uptime_seconds: uptime,
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_mode_needs_both_flag_and_secret() {
        assert_eq!(guard_mode(&GuardState::presence_only()), "presence");

        let half = GuardState {
            verify_role_claims: true,
            jwt_secret: None,
            demo_login: false,
        };
        assert_eq!(guard_mode(&half), "presence");

        let full = GuardState {
            verify_role_claims: true,
            jwt_secret: Some("k".into()),
            demo_login: false,
        };
        assert_eq!(guard_mode(&full), "role-claims");
    }

    #[tokio::test]
    async fn health_reports_ok() {
        record_start_time();
        let Json(body) = health_check(State(GuardState::presence_only())).await;
        assert_eq!(body.status, "ok");
        assert_eq!(body.guard, "presence");
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
    }
}
