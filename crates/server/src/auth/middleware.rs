use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::{IntoResponse, Redirect, Response};
use shared_types::{access, demo_token_role, is_demo_token, AppConfig, Credential, GuardDecision, RouteClass};

use super::{cookies, jwt};

/// How much the pre-render gate is allowed to know about a token.
#[derive(Clone, Debug, Default)]
pub struct GuardState {
    /// Decode role claims instead of only checking token presence.
    pub verify_role_claims: bool,
    /// HS256 secret shared with the backend. Without it, role verification
    /// degrades to presence checking.
    pub jwt_secret: Option<String>,
    /// Whether demo tokens are honoured when role claims are verified.
    pub demo_login: bool,
}

impl GuardState {
    pub fn from_config(config: &AppConfig, jwt_secret: Option<String>) -> Self {
        if config.guard.verify_role_claims && jwt_secret.is_none() {
            tracing::warn!("verify_role_claims is on but JWT_SECRET is unset; guard checks token presence only");
        }
        Self {
            verify_role_claims: config.guard.verify_role_claims,
            jwt_secret,
            demo_login: config.features.demo_login,
        }
    }

    /// Presence-only gate, the default trust boundary.
    pub fn presence_only() -> Self {
        Self::default()
    }

    /// Turn the raw token (if any) into what the policy needs to know.
    pub fn inspect(&self, token: Option<&str>) -> Credential {
        let Some(token) = token else {
            return Credential::Missing;
        };

        if !self.verify_role_claims {
            return Credential::Present;
        }

        if is_demo_token(token) {
            return match demo_token_role(token) {
                Some(role) if self.demo_login => Credential::Verified(role),
                _ => Credential::Rejected,
            };
        }

        match &self.jwt_secret {
            Some(secret) => jwt::verified_role(token, secret)
                .map(Credential::Verified)
                .unwrap_or(Credential::Rejected),
            None => Credential::Present,
        }
    }
}

/// Route class and decision of a guarded request, attached to the response
/// so outer layers (telemetry) can report them.
#[derive(Clone, Debug)]
pub struct GuardOutcome {
    pub class: RouteClass,
    pub decision: &'static str,
}

/// Pre-render route guard.
///
/// Runs before any page code:
/// 1. Exempt paths (server functions, assets, health) pass untouched
/// 2. Public pages pass
/// 3. Other pages need a session token (cookie or Bearer); without one the
///    visitor is redirected to `/login?redirect=<original path>`
/// 4. With role verification on, a token for the wrong portal is redirected
///    to its own dashboard and an invalid token is sent to login with the
///    cookie cleared
pub async fn route_guard(State(guard): State<GuardState>, req: Request, next: Next) -> Response {
    let path_and_query = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_string())
        .unwrap_or_else(|| req.uri().path().to_string());

    if access::is_exempt(&path_and_query) {
        return next.run(req).await;
    }

    let token = cookies::extract_session_token(req.headers());
    let credential = guard.inspect(token.as_deref());
    let class = access::classify(&path_and_query);
    let decision = access::coarse_gate(&path_and_query, &credential);

    tracing::debug!(
        path = %path_and_query,
        class = class.as_str(),
        decision = decision.as_str(),
        "route guard"
    );

    let outcome = GuardOutcome {
        class,
        decision: decision.as_str(),
    };

    let mut response = match decision {
        GuardDecision::Pass => next.run(req).await,
        GuardDecision::Login { location } => {
            let mut response = Redirect::to(&location).into_response();
            if credential == Credential::Rejected {
                cookies::clear_session_cookie(response.headers_mut());
            }
            response
        }
        GuardDecision::Dashboard { location } => {
            tracing::info!(path = %path_and_query, to = %location, "Role mismatch at route guard");
            Redirect::to(&location).into_response()
        }
    };

    response.extensions_mut().insert(outcome);
    response
}
