//! Client-side session persistence.
//!
//! The store is the only place that knows the storage layout. Expiry is
//! lazy: nothing sweeps in the background, an expired session is dropped on
//! the next [`SessionStore::read`].

use chrono::{DateTime, Duration, TimeZone, Utc};
use shared_types::{
    demo_token_role, is_demo_token, AppError, Role, Session, EXPIRES_COOKIE, SESSION_COOKIE,
};

use crate::storage::SessionStorage;

pub const TOKEN_KEY: &str = "jwtToken";
/// Absolute expiry in unix milliseconds.
pub const EXPIRES_AT_KEY: &str = "jwtExpiresAt";
pub const ROLE_KEY: &str = "userRole";
/// Present only for demo sessions.
pub const DEMO_ROLE_KEY: &str = "demoRole";

const ALL_KEYS: [&str; 4] = [TOKEN_KEY, EXPIRES_AT_KEY, ROLE_KEY, DEMO_ROLE_KEY];

/// Keeps the session cookie in step with the stored token so the server-side
/// route guard sees what the client sees.
pub trait CookieMirror: Send + Sync {
    fn mirror(&self, token: &str, expires_at: Option<DateTime<Utc>>);
    fn expire(&self);
}

/// For contexts where nothing reads the cookie (server-side rendering).
#[derive(Debug, Default, Clone, Copy)]
pub struct NoMirror;

impl CookieMirror for NoMirror {
    fn mirror(&self, _token: &str, _expires_at: Option<DateTime<Utc>>) {}
    fn expire(&self) {}
}

fn cookie_string(
    name: &'static str,
    value: String,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> String {
    let mut builder = cookie::Cookie::build((name, value))
        .path("/")
        .same_site(cookie::SameSite::Lax);
    if let Some(expires_at) = expires_at {
        let secs = (expires_at - now).num_seconds().max(0);
        builder = builder.max_age(cookie::time::Duration::seconds(secs));
    }
    builder.build().to_string()
}

/// The `jwtToken` cookie as a `Set-Cookie` string. A `None` expiry produces a
/// session cookie; an expiry in the past deletes the cookie.
pub fn session_cookie(token: &str, expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    cookie_string(SESSION_COOKIE, token.to_string(), expires_at, now)
}

/// `Set-Cookie` strings for a session: the token, plus the absolute expiry
/// in unix millis when there is one. Passing `Some(now)` expires both.
pub fn session_cookies(
    token: &str,
    expires_at: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Vec<String> {
    let mut cookies = vec![session_cookie(token, expires_at, now)];
    if let Some(at) = expires_at {
        cookies.push(cookie_string(
            EXPIRES_COOKIE,
            at.timestamp_millis().to_string(),
            Some(at),
            now,
        ));
    }
    cookies
}

/// Mirror into the HTTP client's cookie jar, so every backend and server
/// function call carries the session cookie.
#[cfg(not(target_arch = "wasm32"))]
pub struct JarMirror {
    jar: std::sync::Arc<reqwest::cookie::Jar>,
    url: reqwest::Url,
}

#[cfg(not(target_arch = "wasm32"))]
impl JarMirror {
    pub fn new(jar: std::sync::Arc<reqwest::cookie::Jar>, url: reqwest::Url) -> Self {
        Self { jar, url }
    }
}

#[cfg(not(target_arch = "wasm32"))]
impl CookieMirror for JarMirror {
    fn mirror(&self, token: &str, expires_at: Option<DateTime<Utc>>) {
        for cookie in session_cookies(token, expires_at, Utc::now()) {
            self.jar.add_cookie_str(&cookie, &self.url);
        }
    }

    fn expire(&self) {
        let now = Utc::now();
        for cookie in session_cookies("", Some(now), now) {
            self.jar.add_cookie_str(&cookie, &self.url);
        }
    }
}

pub struct SessionStore {
    storage: Box<dyn SessionStorage>,
    mirror: Box<dyn CookieMirror>,
}

impl SessionStore {
    pub fn new(storage: impl SessionStorage + 'static, mirror: impl CookieMirror + 'static) -> Self {
        Self {
            storage: Box::new(storage),
            mirror: Box::new(mirror),
        }
    }

    /// Persist a new session, replacing whatever was there. Tokens with the
    /// demo prefix are recorded as demo sessions.
    pub fn save(&self, token: &str, role: Role, ttl: Duration) -> Result<Session, AppError> {
        self.save_at(token, role, ttl, Utc::now())
    }

    pub fn save_at(
        &self,
        token: &str,
        role: Role,
        ttl: Duration,
        now: DateTime<Utc>,
    ) -> Result<Session, AppError> {
        self.save_until(token, role, Some(now + ttl))
    }

    /// Persist a session whose absolute expiry is already known, e.g. one
    /// recovered from cookies. `None` stores a session without expiry.
    pub fn save_until(
        &self,
        token: &str,
        role: Role,
        expires_at: Option<DateTime<Utc>>,
    ) -> Result<Session, AppError> {
        let is_demo = is_demo_token(token);

        self.remove_all();
        let written = self.write(token, role, expires_at, is_demo);
        if let Err(e) = written {
            self.remove_all();
            return Err(e);
        }
        self.mirror.mirror(token, expires_at);

        tracing::debug!(role = %role, is_demo, ?expires_at, "Session saved");
        Ok(Session {
            token: token.to_string(),
            expires_at,
            role,
            is_demo,
        })
    }

    fn write(
        &self,
        token: &str,
        role: Role,
        expires_at: Option<DateTime<Utc>>,
        is_demo: bool,
    ) -> Result<(), AppError> {
        self.storage.set(TOKEN_KEY, token)?;
        if let Some(at) = expires_at {
            self.storage
                .set(EXPIRES_AT_KEY, &at.timestamp_millis().to_string())?;
        }
        self.storage.set(ROLE_KEY, role.as_str())?;
        if is_demo {
            self.storage.set(DEMO_ROLE_KEY, role.as_str())?;
        }
        Ok(())
    }

    pub fn read(&self) -> Option<Session> {
        self.read_at(Utc::now())
    }

    /// The current session, or `None` when there is none, it has expired, or
    /// what is stored cannot be understood. The last two also clear storage.
    pub fn read_at(&self, now: DateTime<Utc>) -> Option<Session> {
        let token = self.storage.get(TOKEN_KEY).filter(|t| !t.is_empty())?;

        let expires_at = match self.storage.get(EXPIRES_AT_KEY) {
            None => None,
            Some(raw) => match parse_millis(&raw) {
                Some(at) => Some(at),
                None => {
                    tracing::warn!(value = %raw, "Unreadable session expiry, clearing session");
                    self.clear();
                    return None;
                }
            },
        };

        let is_demo = is_demo_token(&token);
        let role = if is_demo {
            self.storage
                .get(DEMO_ROLE_KEY)
                .and_then(|r| Role::parse(&r))
                .or_else(|| demo_token_role(&token))
        } else {
            self.storage.get(ROLE_KEY).and_then(|r| Role::parse(&r))
        };
        let Some(role) = role else {
            tracing::warn!("Session without a readable role, clearing session");
            self.clear();
            return None;
        };

        let session = Session {
            token,
            expires_at,
            role,
            is_demo,
        };
        if session.is_expired_at(now) {
            tracing::debug!("Session expired");
            self.clear();
            return None;
        }
        Some(session)
    }

    /// Forget the session and expire the cookie. Safe to call repeatedly.
    pub fn clear(&self) {
        self.remove_all();
        self.mirror.expire();
    }

    fn remove_all(&self) {
        for key in ALL_KEYS {
            if let Err(e) = self.storage.remove(key) {
                tracing::warn!(key, error = %e, "Failed to remove session key");
            }
        }
    }
}

fn parse_millis(raw: &str) -> Option<DateTime<Utc>> {
    let millis = raw.trim().parse::<i64>().ok()?;
    Utc.timestamp_millis_opt(millis).single()
}
