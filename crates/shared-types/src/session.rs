use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::Role;

/// Cookie mirroring the session token for the server-side guard.
pub const SESSION_COOKIE: &str = "jwtToken";

/// Companion cookie holding the absolute expiry in unix milliseconds, so a
/// client that only keeps the cookie cannot stretch the session.
pub const EXPIRES_COOKIE: &str = "jwtExpiresAt";

/// Tokens minted locally for demo sessions start with this prefix.
pub const DEMO_TOKEN_PREFIX: &str = "demo-";

/// The client-held proof of authentication.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Session {
    pub token: String,
    pub expires_at: Option<DateTime<Utc>>,
    pub role: Role,
    pub is_demo: bool,
}

impl Session {
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at.is_some_and(|exp| exp <= now)
    }
}

/// Mint a demo token: `demo-<ROLE>-<unix millis>`.
pub fn demo_token(role: Role, now: DateTime<Utc>) -> String {
    format!("{DEMO_TOKEN_PREFIX}{}-{}", role.as_str(), now.timestamp_millis())
}

pub fn is_demo_token(token: &str) -> bool {
    token.starts_with(DEMO_TOKEN_PREFIX)
}

/// Recover the role embedded in a demo token, if it is one.
pub fn demo_token_role(token: &str) -> Option<Role> {
    let rest = token.strip_prefix(DEMO_TOKEN_PREFIX)?;
    let role = rest.split('-').next()?;
    Role::parse(role)
}

/// When a demo token was minted. Demo sessions last one TTL from this instant.
pub fn demo_token_minted(token: &str) -> Option<DateTime<Utc>> {
    let rest = token.strip_prefix(DEMO_TOKEN_PREFIX)?;
    let millis = rest.rsplit('-').next()?.parse::<i64>().ok()?;
    DateTime::from_timestamp_millis(millis)
}

/// What the server saw of the session cookies on the current request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionCookie {
    pub token: String,
    /// Absolute expiry from the companion cookie, when present and readable.
    pub expires_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn demo_token_embeds_role_and_time() {
        let now = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        let token = demo_token(Role::Admin, now);
        assert_eq!(token, "demo-ADMIN-1700000000123");
        assert!(is_demo_token(&token));
        assert_eq!(demo_token_role(&token), Some(Role::Admin));
        assert_eq!(demo_token_minted(&token), Some(now));
    }

    #[test]
    fn mint_time_needs_a_demo_token_with_millis() {
        assert_eq!(demo_token_minted("demo-ADMIN-soon"), None);
        assert_eq!(demo_token_minted("eyJ.e30.sig"), None);
    }

    #[test]
    fn real_tokens_are_not_demo_tokens() {
        let jwt = "eyJhbGciOiJIUzI1NiJ9.e30.sig";
        assert!(!is_demo_token(jwt));
        assert_eq!(demo_token_role(jwt), None);
        assert_eq!(demo_token_role("demo-JANITOR-1"), None);
    }

    #[test]
    fn expiry_is_inclusive_of_now() {
        let now = Utc::now();
        let mut session = Session {
            token: "t".into(),
            expires_at: Some(now),
            role: Role::Student,
            is_demo: false,
        };
        assert!(session.is_expired_at(now));
        session.expires_at = Some(now + Duration::minutes(1));
        assert!(!session.is_expired_at(now));
        session.expires_at = None;
        assert!(!session.is_expired_at(now));
    }
}
