use chrono::{DateTime, Duration, Utc};
use shared_types::{
    demo_token, demo_token_minted, demo_token_role, is_demo_token, AppError,
    ChangePasswordRequest, ClientConfig, LoginRequest, RegisterRequest, ResetPasswordRequest,
    Role, Session, SessionCookie, UpdateProfileRequest, User, Viewer,
};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Mutex;
use validator::Validate;

use crate::api_client::ApiClient;
use crate::session::SessionStore;

/// Where the client is in establishing who the user is.
#[derive(Debug, Clone, PartialEq)]
pub enum AuthStatus {
    /// Rehydration has not finished yet.
    Loading,
    Anonymous,
    Authenticated(User),
}

impl AuthStatus {
    pub fn user(&self) -> Option<&User> {
        match self {
            AuthStatus::Authenticated(user) => Some(user),
            _ => None,
        }
    }

    pub fn viewer(&self) -> Viewer {
        match self {
            AuthStatus::Loading => Viewer::Resolving,
            AuthStatus::Anonymous => Viewer::Anonymous,
            AuthStatus::Authenticated(user) => Viewer::SignedIn(user.role),
        }
    }
}

fn superseded() -> AppError {
    AppError::conflict("Superseded by a newer sign-in or sign-out")
}

/// Session-backed authentication.
///
/// The only writer of the session store. Every state-changing operation
/// takes a generation number when it starts; its result is committed only if
/// no later operation has started since, so the last call always wins.
pub struct AuthService {
    api: ApiClient,
    sessions: SessionStore,
    config: ClientConfig,
    status: Mutex<AuthStatus>,
    generation: AtomicU64,
}

impl AuthService {
    pub fn new(api: ApiClient, sessions: SessionStore, config: ClientConfig) -> Self {
        Self {
            api,
            sessions,
            config,
            status: Mutex::new(AuthStatus::Loading),
            generation: AtomicU64::new(0),
        }
    }

    pub fn status(&self) -> AuthStatus {
        self.status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn session(&self) -> Option<Session> {
        self.sessions.read()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    fn ttl(&self) -> Duration {
        Duration::minutes(self.config.session_ttl_minutes)
    }

    fn begin(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }

    /// Write `status` unless a newer operation has started. Returns whether
    /// it was written.
    fn commit(&self, generation: u64, status: AuthStatus) -> bool {
        let mut current = self
            .status
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if !self.is_current(generation) {
            tracing::debug!(generation, "Dropping stale auth result");
            return false;
        }
        *current = status;
        true
    }

    /// The backend rejected `token`. Drop the session, unless it has already
    /// been replaced by a different one.
    fn expire(&self, token: &str) {
        let replaced = self
            .sessions
            .read()
            .is_some_and(|session| session.token != token);
        if replaced {
            return;
        }
        tracing::info!("Backend rejected the session token, signing out");
        let generation = self.begin();
        self.sessions.clear();
        self.commit(generation, AuthStatus::Anonymous);
    }

    fn current_session(&self) -> Result<Session, AppError> {
        self.sessions
            .read()
            .ok_or_else(|| AppError::unauthorized("Not signed in"))
    }

    /// Sign in against the backend. A rejected attempt changes nothing: an
    /// existing session stays signed in.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AppError> {
        let req = LoginRequest {
            email: email.trim().to_string(),
            password: password.to_string(),
        };
        req.validate()?;

        let generation = self.begin();
        let reply = match self.api.login(&req).await {
            Ok(reply) => reply,
            Err(e) => {
                // Only settle a status nobody has decided yet
                if self.status() == AuthStatus::Loading && self.sessions.read().is_none() {
                    self.commit(generation, AuthStatus::Anonymous);
                }
                tracing::info!(kind = %e.kind, "Login failed");
                return Err(e);
            }
        };
        if !self.is_current(generation) {
            return Err(superseded());
        }

        self.sessions.save(&reply.jwt, reply.role, self.ttl())?;

        let user = match self.api.me(&reply.jwt).await {
            Ok(user) => user,
            Err(e) if e.is_unauthorized() => {
                self.expire(&reply.jwt);
                return Err(e);
            }
            Err(e) => {
                tracing::warn!(error = %e, "Profile unavailable after login, using login reply");
                User::from_login(&req.email, reply.role)
            }
        };

        if !self.commit(generation, AuthStatus::Authenticated(user.clone())) {
            return Err(superseded());
        }
        tracing::info!(role = %reply.role, "Signed in");
        Ok(user)
    }

    /// Create an account. Does not sign in.
    #[tracing::instrument(skip(self, req), fields(role = %req.role))]
    pub async fn register(&self, req: &RegisterRequest) -> Result<(), AppError> {
        if !req.role.can_self_register() {
            return Err(AppError::bad_request(
                "Administrator accounts cannot be self-registered",
            ));
        }
        req.validate()?;
        self.api.register(req).await
    }

    pub fn logout(&self) {
        let generation = self.begin();
        self.sessions.clear();
        self.commit(generation, AuthStatus::Anonymous);
        tracing::info!("Signed out");
    }

    /// Offline session for `role`, no backend involved. Same lifetime and
    /// cookie as a real sign-in.
    pub fn demo_login(&self, role: Role) -> Result<User, AppError> {
        if !self.config.demo_login {
            return Err(AppError::forbidden("Demo login is disabled"));
        }
        let generation = self.begin();
        let token = demo_token(role, Utc::now());
        self.sessions.save(&token, role, self.ttl())?;

        let user = User::demo(role);
        self.commit(generation, AuthStatus::Authenticated(user.clone()));
        tracing::info!(role = %role, "Demo session started");
        Ok(user)
    }

    /// Rebuild the user from the persisted session. Never fails: anything
    /// unexpected ends `Anonymous` with the session cleared.
    pub async fn check_auth(&self) -> AuthStatus {
        self.rehydrate(None).await
    }

    /// Deadline of a session recovered from cookies. Never later than the
    /// one it was created with: the expiry cookie, and for demo tokens the
    /// mint time plus one TTL.
    fn adopted_expiry(&self, cookie: &SessionCookie) -> Option<DateTime<Utc>> {
        let minted = demo_token_minted(&cookie.token).map(|at| at + self.ttl());
        match (cookie.expires_at, minted) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        }
    }

    /// Like [`check_auth`](Self::check_auth), but when nothing is stored
    /// locally a token recovered from the session cookies is adopted instead,
    /// keeping its original expiry.
    pub async fn rehydrate(&self, cookie: Option<SessionCookie>) -> AuthStatus {
        let generation = self.begin();

        let (token, known_role, expires_at) = match self.sessions.read() {
            Some(session) => (session.token, Some(session.role), session.expires_at),
            None => match cookie.filter(|c| !c.token.is_empty()) {
                Some(cookie) => {
                    let expires_at = self.adopted_expiry(&cookie);
                    if expires_at.is_some_and(|at| at <= Utc::now()) {
                        tracing::info!("Recovered session has expired, clearing");
                        self.sessions.clear();
                        self.commit(generation, AuthStatus::Anonymous);
                        return self.status();
                    }
                    (cookie.token, None, expires_at)
                }
                None => {
                    self.commit(generation, AuthStatus::Anonymous);
                    return self.status();
                }
            },
        };

        if is_demo_token(&token) {
            let role = known_role.or_else(|| demo_token_role(&token));
            let status = match role {
                Some(role) if self.config.demo_login => {
                    if known_role.is_none() {
                        if let Err(e) = self.sessions.save_until(&token, role, expires_at) {
                            tracing::warn!(error = %e, "Could not persist adopted demo session");
                        }
                    }
                    AuthStatus::Authenticated(User::demo(role))
                }
                _ => {
                    tracing::info!("Demo session not accepted, clearing");
                    self.sessions.clear();
                    AuthStatus::Anonymous
                }
            };
            self.commit(generation, status);
            return self.status();
        }

        let status = match self.api.me(&token).await {
            Ok(user) => {
                if known_role.is_none() && self.is_current(generation) {
                    if let Err(e) = self.sessions.save_until(&token, user.role, expires_at) {
                        tracing::warn!(error = %e, "Could not persist adopted session");
                    }
                }
                AuthStatus::Authenticated(user)
            }
            Err(e) => {
                tracing::info!(kind = %e.kind, "Stored session not accepted, clearing");
                if self.is_current(generation) {
                    self.sessions.clear();
                }
                AuthStatus::Anonymous
            }
        };
        self.commit(generation, status);
        self.status()
    }

    /// Re-fetch the profile of a real session. Demo sessions keep their
    /// local user.
    pub async fn refresh_profile(&self) -> Result<User, AppError> {
        let session = self.current_session()?;
        let generation = self.begin();

        if session.is_demo {
            let user = self
                .status()
                .user()
                .cloned()
                .unwrap_or_else(|| User::demo(session.role));
            self.commit(generation, AuthStatus::Authenticated(user.clone()));
            return Ok(user);
        }

        match self.api.me(&session.token).await {
            Ok(user) => {
                self.commit(generation, AuthStatus::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.expire(&session.token);
                }
                Err(e)
            }
        }
    }

    /// Update the profile. The local user is replaced only with what the
    /// backend confirms; demo sessions apply the patch locally.
    pub async fn update_profile(&self, patch: &UpdateProfileRequest) -> Result<User, AppError> {
        let session = self.current_session()?;
        let generation = self.begin();

        if session.is_demo {
            let current = self
                .status()
                .user()
                .cloned()
                .unwrap_or_else(|| User::demo(session.role));
            let user = patch.apply_to(&current);
            self.commit(generation, AuthStatus::Authenticated(user.clone()));
            return Ok(user);
        }

        match self.api.update_me(&session.token, patch).await {
            Ok(user) => {
                self.commit(generation, AuthStatus::Authenticated(user.clone()));
                Ok(user)
            }
            Err(e) => {
                if e.is_unauthorized() {
                    self.expire(&session.token);
                }
                Err(e)
            }
        }
    }

    pub async fn change_password(&self, current: &str, new: &str) -> Result<(), AppError> {
        let session = self.current_session()?;
        if session.is_demo {
            return Err(AppError::bad_request("Demo accounts have no password"));
        }
        let req = ChangePasswordRequest {
            current_password: current.to_string(),
            new_password: new.to_string(),
        };
        let result = self.api.change_password(&session.token, &req).await;
        if let Err(e) = &result {
            if e.is_unauthorized() {
                self.expire(&session.token);
            }
        }
        result
    }

    pub async fn request_password_reset(&self, email: &str) -> Result<(), AppError> {
        self.api.request_password_reset(email.trim()).await
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let req = ResetPasswordRequest {
            token: token.to_string(),
            new_password: new_password.to_string(),
        };
        self.api.reset_password(&req).await
    }
}
