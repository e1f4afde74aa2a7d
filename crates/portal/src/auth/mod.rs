pub mod service;

use dioxus::prelude::*;
use shared_types::{AppError, RegisterRequest, Role, UpdateProfileRequest, User, Viewer};
use std::sync::Arc;

pub use service::{AuthService, AuthStatus};

use crate::routes::Route;

/// Global authentication state.
///
/// Wraps the [`AuthService`] and mirrors its status into a signal so pages
/// re-render when the user signs in or out.
#[derive(Clone, Copy, PartialEq)]
pub struct AuthState {
    pub status: Signal<AuthStatus>,
    service: CopyValue<Arc<AuthService>>,
}

impl AuthState {
    pub fn new(service: AuthService) -> Self {
        let status = service.status();
        Self {
            status: Signal::new(status),
            service: CopyValue::new(Arc::new(service)),
        }
    }

    pub fn service(&self) -> Arc<AuthService> {
        Arc::clone(&self.service.read())
    }

    /// Copy the service status into the signal.
    fn sync(&mut self) {
        let status = self.service().status();
        if *self.status.peek() != status {
            self.status.set(status);
        }
    }

    pub fn viewer(&self) -> Viewer {
        self.status.read().viewer()
    }

    pub fn current_user(&self) -> Option<User> {
        self.status.read().user().cloned()
    }

    pub fn is_authenticated(&self) -> bool {
        self.status.read().user().is_some()
    }

    pub fn demo_enabled(&self) -> bool {
        self.service().config().demo_login
    }

    pub async fn login(&mut self, email: String, password: String) -> Result<User, AppError> {
        let service = self.service();
        let result = service.login(&email, &password).await;
        self.sync();
        result
    }

    pub async fn register(&self, req: RegisterRequest) -> Result<(), AppError> {
        self.service().register(&req).await
    }

    pub fn demo_login(&mut self, role: Role) -> Result<User, AppError> {
        let result = self.service().demo_login(role);
        self.sync();
        result
    }

    /// Sign out and go home. The one place a sign-out navigates.
    pub fn logout(&mut self) {
        self.service().logout();
        self.sync();
        navigator().replace(Route::Home {});
    }

    /// Startup rehydration. Browsers keep no durable session store, so they
    /// recover the token and its expiry from the cookies the server saw.
    pub async fn rehydrate(&mut self) {
        let cookie = if cfg!(target_arch = "wasm32") {
            server::api::get_session_cookie().await.ok().flatten()
        } else {
            None
        };
        self.service().rehydrate(cookie).await;
        self.sync();
    }

    pub async fn update_profile(&mut self, patch: UpdateProfileRequest) -> Result<User, AppError> {
        let service = self.service();
        let result = service.update_profile(&patch).await;
        self.sync();
        result
    }

    pub async fn refresh_profile(&mut self) -> Result<User, AppError> {
        let service = self.service();
        let result = service.refresh_profile().await;
        self.sync();
        result
    }

    pub async fn change_password(&mut self, current: String, new: String) -> Result<(), AppError> {
        let service = self.service();
        let result = service.change_password(&current, &new).await;
        self.sync();
        result
    }

    pub async fn request_password_reset(&self, email: String) -> Result<(), AppError> {
        self.service().request_password_reset(&email).await
    }

    pub async fn reset_password(&self, token: String, new_password: String) -> Result<(), AppError> {
        self.service().reset_password(&token, &new_password).await
    }
}

/// Hook to access auth state.
pub fn use_auth() -> AuthState {
    use_context::<AuthState>()
}
