use dioxus::prelude::*;
use shared_types::{ClientConfig, SessionCookie};

/// Client-visible settings: backend base URL, session lifetime and whether
/// demo login is offered. Read once per hydration by the portal.
#[cfg_attr(feature = "server", tracing::instrument)]
#[server]
pub async fn get_client_config() -> Result<ClientConfig, ServerFnError> {
    Ok(crate::config::client_config())
}

/// The session token riding on this request's `jwtToken` cookie, if any,
/// with the absolute expiry from `jwtExpiresAt`.
///
/// The cookies are written by the client itself, so this exposes nothing new;
/// it lets a browser tab rebuild its session after a reload.
#[server]
pub async fn get_session_cookie() -> Result<Option<SessionCookie>, ServerFnError> {
    use crate::auth::cookies;

    let Some(ctx) = dioxus::fullstack::FullstackContext::current() else {
        return Ok(None);
    };
    let headers = ctx.parts_mut().headers.clone();
    Ok(cookies::extract_session_cookie(&headers))
}
