use reqwest::{Client, Method, RequestBuilder, Url};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use shared_types::{
    AppError, ChangePasswordRequest, ForgotPasswordRequest, LoginRequest, LoginResponse,
    RegisterRequest, ResetPasswordRequest, Role, UpdateProfileRequest, User,
};

/// Replies may come wrapped as `{"data": ...}` or bare.
#[derive(Deserialize)]
#[serde(untagged)]
enum Envelope<T> {
    Wrapped { data: T },
    Bare(T),
}

impl<T> Envelope<T> {
    fn into_inner(self) -> T {
        match self {
            Envelope::Wrapped { data } => data,
            Envelope::Bare(inner) => inner,
        }
    }
}

/// Login reply before the role string has been checked.
#[derive(Deserialize)]
struct RawLogin {
    jwt: String,
    role: String,
}

/// Thin typed client over the LMS REST backend.
///
/// Every non-2xx reply becomes an [`AppError`] whose kind follows the status
/// and whose message is the body's `message` field when there is one.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Client sharing `jar` so the mirrored session cookie rides along.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn with_cookie_jar(
        base_url: impl Into<String>,
        jar: std::sync::Arc<reqwest::cookie::Jar>,
    ) -> Result<Self, AppError> {
        let http = Client::builder()
            .cookie_provider(jar)
            .build()
            .map_err(|e| AppError::internal(format!("Cannot build HTTP client: {e}")))?;
        Ok(Self::new(http, base_url))
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Origin the session cookie is scoped to.
    pub fn cookie_url(&self) -> Result<Url, AppError> {
        Url::parse(&self.base_url)
            .map_err(|e| AppError::internal(format!("Invalid API base URL {}: {e}", self.base_url)))
    }

    fn request(&self, method: Method, path: &str, token: Option<&str>) -> RequestBuilder {
        let builder = self.http.request(method, format!("{}{path}", self.base_url));
        match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send_raw(&self, builder: RequestBuilder, fallback: &str) -> Result<String, AppError> {
        let response = builder
            .send()
            .await
            .map_err(|e| AppError::network(format!("Backend unreachable: {e}")))?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| AppError::network(format!("Failed to read backend reply: {e}")))?;

        if status.is_success() {
            Ok(body)
        } else {
            tracing::debug!(status = status.as_u16(), "Backend rejected request");
            Err(AppError::from_status(
                status.as_u16(),
                AppError::message_from_body(&body, fallback),
            ))
        }
    }

    async fn send_json<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
        fallback: &str,
    ) -> Result<T, AppError> {
        let body = self.send_raw(builder, fallback).await?;
        serde_json::from_str::<Envelope<T>>(&body)
            .map(Envelope::into_inner)
            .map_err(|e| AppError::network(format!("Unexpected backend reply: {e}")))
    }

    async fn post<B: Serialize>(&self, path: &str, body: &B, fallback: &str) -> Result<(), AppError> {
        let builder = self.request(Method::POST, path, None).json(body);
        self.send_raw(builder, fallback).await.map(|_| ())
    }

    #[tracing::instrument(skip(self, req), fields(email = %req.email))]
    pub async fn login(&self, req: &LoginRequest) -> Result<LoginResponse, AppError> {
        let builder = self.request(Method::POST, "/auth/login", None).json(req);
        let raw: RawLogin = self.send_json(builder, "Login failed").await?;
        let role = Role::parse(&raw.role).ok_or_else(|| {
            AppError::network(format!("Backend returned unknown role {}", raw.role))
        })?;
        Ok(LoginResponse { jwt: raw.jwt, role })
    }

    /// Self-registration. Administrators cannot register themselves.
    #[tracing::instrument(skip(self, req), fields(role = %req.role))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<(), AppError> {
        let path = match req.role {
            Role::Student => "/auth/register/student",
            Role::Instructor => "/auth/register/instructor",
            Role::Admin => {
                return Err(AppError::bad_request(
                    "Administrator accounts cannot be self-registered",
                ))
            }
        };
        self.post(path, req, "Registration failed").await
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        let req = ForgotPasswordRequest {
            email: email.to_string(),
        };
        self.post("/auth/forgot-password/request", &req, "Could not request a password reset")
            .await
    }

    pub async fn reset_password(&self, req: &ResetPasswordRequest) -> Result<(), AppError> {
        self.post("/auth/forgot-password/reset", req, "Password reset failed")
            .await
    }

    pub async fn me(&self, token: &str) -> Result<User, AppError> {
        let builder = self.request(Method::GET, "/users/me", Some(token));
        self.send_json(builder, "Could not load profile").await
    }

    pub async fn update_me(&self, token: &str, patch: &UpdateProfileRequest) -> Result<User, AppError> {
        let builder = self.request(Method::PUT, "/users/me", Some(token)).json(patch);
        self.send_json(builder, "Profile update failed").await
    }

    pub async fn change_password(
        &self,
        token: &str,
        req: &ChangePasswordRequest,
    ) -> Result<(), AppError> {
        let builder = self
            .request(Method::PUT, "/users/me/password", Some(token))
            .json(req);
        self.send_raw(builder, "Password change failed").await.map(|_| ())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared_types::AppErrorKind;

    #[test]
    fn envelope_accepts_wrapped_and_bare_replies() {
        let wrapped: Envelope<RawLogin> =
            serde_json::from_str(r#"{"data":{"jwt":"a","role":"ADMIN"}}"#).unwrap();
        let bare: Envelope<RawLogin> =
            serde_json::from_str(r#"{"jwt":"b","role":"student"}"#).unwrap();
        assert_eq!(wrapped.into_inner().jwt, "a");
        assert_eq!(bare.into_inner().role, "student");
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new(Client::new(), "http://localhost:8080/api/");
        assert_eq!(client.base_url(), "http://localhost:8080/api");
        assert_eq!(client.cookie_url().unwrap().host_str(), Some("localhost"));
    }

    #[tokio::test]
    async fn admin_registration_is_refused_locally() {
        // Port 9 is never contacted: the role check comes first.
        let client = ApiClient::new(Client::new(), "http://127.0.0.1:9/api");
        let err = client
            .register(&RegisterRequest {
                name: "Root".into(),
                email: "root@edu.test".into(),
                password: "password123".into(),
                role: Role::Admin,
                bio: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err.kind, AppErrorKind::BadRequest);
    }

    #[tokio::test]
    async fn unreachable_backend_is_a_network_error() {
        let client = ApiClient::new(Client::new(), "http://127.0.0.1:9/api");
        let err = client.me("t").await.unwrap_err();
        assert_eq!(err.kind, AppErrorKind::Network);
    }
}
