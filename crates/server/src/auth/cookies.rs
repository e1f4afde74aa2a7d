use axum::http::{header, HeaderMap, HeaderValue};
use cookie::Cookie;

use chrono::DateTime;
use shared_types::SessionCookie;

pub use shared_types::{EXPIRES_COOKIE, SESSION_COOKIE};

fn cookie_secure() -> bool {
    std::env::var("COOKIE_SECURE")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(false)
}

/// Extract the session token from the `jwtToken` cookie (preferred) or a
/// Bearer header (fallback). Empty values count as absent.
pub fn extract_session_token(headers: &HeaderMap) -> Option<String> {
    if let Some(token) = extract_cookie(headers, SESSION_COOKIE).filter(|t| !t.is_empty()) {
        return Some(token);
    }

    // Fallback to Bearer header for API-style clients
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
}

/// The session token together with the absolute expiry from the
/// `jwtExpiresAt` cookie. An unreadable expiry is dropped.
pub fn extract_session_cookie(headers: &HeaderMap) -> Option<SessionCookie> {
    let token = extract_session_token(headers)?;
    let expires_at = extract_cookie(headers, EXPIRES_COOKIE)
        .and_then(|raw| raw.trim().parse::<i64>().ok())
        .and_then(DateTime::from_timestamp_millis);
    Some(SessionCookie { token, expires_at })
}

/// Parse a specific cookie value from the Cookie header(s).
fn extract_cookie(headers: &HeaderMap, name: &str) -> Option<String> {
    for header_value in headers.get_all(header::COOKIE) {
        if let Ok(cookie_str) = header_value.to_str() {
            for piece in cookie_str.split(';') {
                if let Ok(c) = Cookie::parse(piece.trim().to_string()) {
                    if c.name() == name {
                        return Some(c.value().to_string());
                    }
                }
            }
        }
    }
    None
}

/// Build a Set-Cookie header value that expires the named cookie.
pub fn build_clear_cookie(name: &'static str) -> Option<HeaderValue> {
    let cookie = Cookie::build((name, ""))
        .same_site(cookie::SameSite::Lax)
        .path("/")
        .max_age(cookie::time::Duration::ZERO)
        .secure(cookie_secure())
        .build();
    HeaderValue::from_str(&cookie.to_string()).ok()
}

/// Expire the session cookie and its expiry companion on the response.
pub fn clear_session_cookie(headers: &mut HeaderMap) {
    for name in [SESSION_COOKIE, EXPIRES_COOKIE] {
        if let Some(value) = build_clear_cookie(name) {
            headers.append(header::SET_COOKIE, value);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(pairs: &[(header::HeaderName, &str)]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for (name, value) in pairs {
            map.append(name.clone(), HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn cookie_token_is_found_among_others() {
        let h = headers(&[(header::COOKIE, "theme=dark; jwtToken=abc.def.ghi; lang=en")]);
        assert_eq!(extract_session_token(&h).as_deref(), Some("abc.def.ghi"));
    }

    #[test]
    fn cookie_wins_over_bearer() {
        let h = headers(&[
            (header::COOKIE, "jwtToken=from-cookie"),
            (header::AUTHORIZATION, "Bearer from-header"),
        ]);
        assert_eq!(extract_session_token(&h).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn bearer_is_used_without_cookie() {
        let h = headers(&[(header::AUTHORIZATION, "Bearer demo-STUDENT-1")]);
        assert_eq!(extract_session_token(&h).as_deref(), Some("demo-STUDENT-1"));
    }

    #[test]
    fn empty_values_count_as_absent() {
        let h = headers(&[
            (header::COOKIE, "jwtToken="),
            (header::AUTHORIZATION, "Bearer "),
        ]);
        assert_eq!(extract_session_token(&h), None);
        assert_eq!(extract_session_token(&HeaderMap::new()), None);
    }

    #[test]
    fn non_bearer_authorization_is_ignored() {
        let h = headers(&[(header::AUTHORIZATION, "Basic dXNlcjpwYXNz")]);
        assert_eq!(extract_session_token(&h), None);
    }

    #[test]
    fn clear_cookie_expires_immediately() {
        let mut h = HeaderMap::new();
        clear_session_cookie(&mut h);
        let values: Vec<&str> = h
            .get_all(header::SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap())
            .collect();
        assert_eq!(values.len(), 2);
        assert!(values[0].starts_with("jwtToken=;"));
        assert!(values[1].starts_with("jwtExpiresAt=;"));
        for value in values {
            assert!(value.contains("Max-Age=0"));
            assert!(value.contains("Path=/"));
        }
    }

    #[test]
    fn session_cookie_carries_absolute_expiry() {
        let h = headers(&[(header::COOKIE, "jwtToken=abc; jwtExpiresAt=1700000060000")]);
        let cookie = extract_session_cookie(&h).unwrap();
        assert_eq!(cookie.token, "abc");
        assert_eq!(
            cookie.expires_at.map(|at| at.timestamp_millis()),
            Some(1_700_000_060_000)
        );

        let h = headers(&[(header::COOKIE, "jwtToken=abc; jwtExpiresAt=later")]);
        assert_eq!(extract_session_cookie(&h).unwrap().expires_at, None);
        assert_eq!(extract_session_cookie(&HeaderMap::new()), None);
    }
}
