pub mod cookies;
pub mod jwt;
pub mod middleware;

/// Secret shared with the backend for HS256 role claims, if configured.
/// Returns `None` if the env var is empty or unset.
pub fn jwt_secret() -> Option<String> {
    std::env::var("JWT_SECRET").ok().filter(|s| !s.is_empty())
}
