use serde::{Deserialize, Serialize};

/// Default session lifetime for both real and demo logins.
pub const DEFAULT_SESSION_TTL_MINUTES: i64 = 60;

/// Default base URL of the LMS REST backend.
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8080/api";

/// Feature flags controlling which optional behaviour is active.
///
/// Loaded from `config.toml` at server startup and exposed to clients
/// via a server function. Every field defaults to `false` so that a
/// missing or incomplete config file disables all optional features.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct FeatureFlags {
    /// Allow offline demo sessions for any role.
    #[serde(default)]
    pub demo_login: bool,
    #[serde(default)]
    pub telemetry: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SessionSettings {
    #[serde(default = "default_ttl_minutes")]
    pub ttl_minutes: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            ttl_minutes: DEFAULT_SESSION_TTL_MINUTES,
        }
    }
}

fn default_ttl_minutes() -> i64 {
    DEFAULT_SESSION_TTL_MINUTES
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ApiSettings {
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }
}

fn default_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

/// Server-side route guard settings.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct GuardSettings {
    /// Decode the token's role claim in the middleware instead of only
    /// checking that a token is present. Needs `JWT_SECRET`.
    #[serde(default)]
    pub verify_role_claims: bool,
}

/// Top-level config file structure matching `config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct AppConfig {
    #[serde(default)]
    pub features: FeatureFlags,
    #[serde(default)]
    pub session: SessionSettings,
    #[serde(default)]
    pub api: ApiSettings,
    #[serde(default)]
    pub guard: GuardSettings,
}

/// The subset of configuration the portal needs in the browser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientConfig {
    pub api_base_url: String,
    pub session_ttl_minutes: i64,
    pub demo_login: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig::from(&AppConfig::default())
    }
}

impl From<&AppConfig> for ClientConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            api_base_url: config.api.base_url.clone(),
            session_ttl_minutes: config.session.ttl_minutes,
            demo_login: config.features.demo_login,
        }
    }
}
