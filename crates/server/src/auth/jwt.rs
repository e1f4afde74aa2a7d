use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared_types::Role;

/// Claims the LMS backend puts in its HS256 tokens. Only `role` matters to
/// the guard; the rest is carried for logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Parse the role claim. Spring-style `ROLE_` prefixes are accepted.
    pub fn portal_role(&self) -> Option<Role> {
        let raw = self.role.trim();
        let raw = raw.strip_prefix("ROLE_").unwrap_or(raw);
        Role::parse(raw)
    }
}

/// Mint a token the way the backend does. Used by tests and local tooling
/// that need a realistic credential.
pub fn issue_token(
    sub: &str,
    role: Role,
    ttl: Duration,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = Utc::now();
    let claims = Claims {
        sub: sub.to_string(),
        role: role.as_str().to_string(),
        iat: now.timestamp(),
        exp: (now + ttl).timestamp(),
    };
    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Validate signature and expiry, returning the claims.
pub fn validate_token(token: &str, secret: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
    let token_data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )?;
    Ok(token_data.claims)
}

/// Validate a token and extract its portal role. `None` for any failure:
/// bad signature, expired, malformed, or a role the portal doesn't know.
pub fn verified_role(token: &str, secret: &str) -> Option<Role> {
    match validate_token(token, secret) {
        Ok(claims) => {
            let role = claims.portal_role();
            if role.is_none() {
                tracing::warn!(sub = %claims.sub, role = %claims.role, "Token carries unknown role");
            }
            role
        }
        Err(e) => {
            tracing::debug!(error = %e, "Token rejected");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SECRET: &str = "test-secret-key-for-jwt-unit-tests";

    #[test]
    fn issue_and_validate_round_trip() {
        let token = issue_token("42", Role::Instructor, Duration::minutes(5), SECRET).unwrap();
        let claims = validate_token(&token, SECRET).unwrap();
        assert_eq!(claims.sub, "42");
        assert_eq!(claims.portal_role(), Some(Role::Instructor));
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn expired_token_rejected() {
        let token = issue_token("1", Role::Student, Duration::hours(-1), SECRET).unwrap();
        assert!(validate_token(&token, SECRET).is_err());
        assert_eq!(verified_role(&token, SECRET), None);
    }

    #[test]
    fn wrong_secret_rejected() {
        let token = issue_token("1", Role::Admin, Duration::minutes(5), SECRET).unwrap();
        assert_eq!(verified_role(&token, "another-secret"), None);
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(verified_role("not.a.valid.jwt", SECRET), None);
        assert_eq!(verified_role("", SECRET), None);
    }

    #[test]
    fn spring_style_role_prefix_is_accepted() {
        let claims = Claims {
            sub: "9".into(),
            role: "ROLE_ADMIN".into(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.portal_role(), Some(Role::Admin));
    }

    #[test]
    fn unknown_role_claim_yields_none() {
        let claims = Claims {
            sub: "9".into(),
            role: "JANITOR".into(),
            exp: 0,
            iat: 0,
        };
        assert_eq!(claims.portal_role(), None);
    }
}
