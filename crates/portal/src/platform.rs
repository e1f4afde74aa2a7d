//! Session plumbing per build target.
//!
//! | target             | storage         | cookie mirror        |
//! |--------------------|-----------------|----------------------|
//! | browser (wasm)     | memory          | `document.cookie`    |
//! | server rendering   | memory          | none                 |
//! | desktop / mobile   | JSON file       | HTTP client jar      |
//!
//! A browser keeps only its cookies across reloads. The token cookie travels
//! with a `jwtExpiresAt` cookie so a recovered session keeps its deadline.

use shared_types::ClientConfig;

use crate::api_client::ApiClient;
use crate::auth::AuthService;
use crate::session::SessionStore;
use crate::storage::MemoryStorage;

#[cfg(target_arch = "wasm32")]
mod browser {
    use chrono::{DateTime, Utc};

    use crate::session::{session_cookies, CookieMirror};

    pub struct DocumentCookieMirror;

    fn write(cookie: String) {
        match serde_json::to_string(&cookie) {
            Ok(literal) => {
                let _ = dioxus::document::eval(&format!("document.cookie = {literal};"));
            }
            Err(e) => tracing::warn!(error = %e, "Cannot encode session cookie"),
        }
    }

    impl CookieMirror for DocumentCookieMirror {
        fn mirror(&self, token: &str, expires_at: Option<DateTime<Utc>>) {
            session_cookies(token, expires_at, Utc::now())
                .into_iter()
                .for_each(write);
        }

        fn expire(&self) {
            let now = Utc::now();
            session_cookies("", Some(now), now).into_iter().for_each(write);
        }
    }
}

#[cfg(target_arch = "wasm32")]
pub fn auth_service(config: ClientConfig) -> AuthService {
    let api = ApiClient::new(reqwest::Client::new(), config.api_base_url.clone());
    let sessions = SessionStore::new(MemoryStorage::new(), browser::DocumentCookieMirror);
    AuthService::new(api, sessions, config)
}

#[cfg(all(not(target_arch = "wasm32"), feature = "server"))]
pub fn auth_service(config: ClientConfig) -> AuthService {
    ephemeral_auth_service(config)
}

#[cfg(all(not(target_arch = "wasm32"), not(feature = "server")))]
pub fn auth_service(config: ClientConfig) -> AuthService {
    use crate::session::{JarMirror, NoMirror};
    use crate::storage::FileStorage;
    use std::sync::Arc;

    let jar = Arc::new(reqwest::cookie::Jar::default());
    let api = match ApiClient::with_cookie_jar(config.api_base_url.clone(), jar.clone()) {
        Ok(api) => api,
        Err(e) => {
            tracing::error!(error = %e, "Falling back to a client without cookie jar");
            ApiClient::new(reqwest::Client::new(), config.api_base_url.clone())
        }
    };

    let storage = FileStorage::from_env();
    tracing::debug!(path = %storage.path().display(), "Session file");
    let sessions = match api.cookie_url() {
        Ok(url) => SessionStore::new(storage, JarMirror::new(jar, url)),
        Err(e) => {
            tracing::error!(error = %e, "Session cookie will not be mirrored");
            SessionStore::new(storage, NoMirror)
        }
    };
    AuthService::new(api, sessions, config)
}

/// In-memory session, no cookie mirror. Server-side rendering and tests.
#[cfg_attr(not(any(test, feature = "server")), allow(dead_code))]
pub fn ephemeral_auth_service(config: ClientConfig) -> AuthService {
    let api = ApiClient::new(reqwest::Client::new(), config.api_base_url.clone());
    AuthService::new(
        api,
        SessionStore::new(MemoryStorage::new(), crate::session::NoMirror),
        config,
    )
}
