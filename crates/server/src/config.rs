use shared_types::{AppConfig, ClientConfig};
use std::sync::OnceLock;

static CONFIG: OnceLock<AppConfig> = OnceLock::new();

/// Path to the config file, relative to the project root.
const CONFIG_PATH: &str = "config.toml";

/// Read `.env` and `config.toml`, apply environment overrides, and store the
/// result in the global `OnceLock`. Safe to call multiple times; only the
/// first call has effect.
///
/// If the file is missing or unparseable, every setting takes its default.
pub fn load_config() -> &'static AppConfig {
    CONFIG.get_or_init(|| {
        let _ = dotenvy::dotenv();
        let mut config = match std::fs::read_to_string(CONFIG_PATH) {
            Ok(contents) => parse_config(&contents),
            Err(e) => {
                eprintln!("[config] {CONFIG_PATH} not found ({e}), using defaults");
                AppConfig::default()
            }
        };
        apply_env_overrides(&mut config, |key| std::env::var(key).ok());
        eprintln!(
            "[config] features: {:?}, session ttl: {}m, api: {}, verify role claims: {}",
            config.features,
            config.session.ttl_minutes,
            config.api.base_url,
            config.guard.verify_role_claims
        );
        config
    })
}

/// Parse the contents of `config.toml`, defaulting everything on error.
pub fn parse_config(contents: &str) -> AppConfig {
    toml::from_str(contents).unwrap_or_else(|e| {
        eprintln!("[config] Failed to parse {CONFIG_PATH}: {e}, using defaults");
        AppConfig::default()
    })
}

/// Environment variables win over the file. Unparseable values are ignored.
pub fn apply_env_overrides(config: &mut AppConfig, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(url) = lookup("LMS_API_BASE_URL").filter(|v| !v.is_empty()) {
        config.api.base_url = url;
    }
    if let Some(ttl) = lookup("SESSION_TTL_MINUTES").and_then(|v| v.parse::<i64>().ok()) {
        if ttl > 0 {
            config.session.ttl_minutes = ttl;
        }
    }
    if let Some(flag) = lookup("DEMO_LOGIN").and_then(|v| v.parse::<bool>().ok()) {
        config.features.demo_login = flag;
    }
    if let Some(flag) = lookup("GUARD_VERIFY_ROLE_CLAIMS").and_then(|v| v.parse::<bool>().ok()) {
        config.guard.verify_role_claims = flag;
    }
}

/// Get the loaded configuration. Returns defaults if `load_config()` hasn't
/// been called yet (safe fallback).
pub fn app_config() -> &'static AppConfig {
    static DEFAULT: OnceLock<AppConfig> = OnceLock::new();
    CONFIG
        .get()
        .unwrap_or_else(|| DEFAULT.get_or_init(AppConfig::default))
}

/// Configuration handed to the portal through `get_client_config`.
pub fn client_config() -> ClientConfig {
    ClientConfig::from(app_config())
}
