use dioxus::prelude::*;
use shared_types::{post_login_target, AppErrorKind, Role};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::routes::{go_to, Route};

/// Sign-in page.
///
/// `redirect` carries the page the visitor was bounced from; after signing
/// in they land there when it is a safe local path their role may open,
/// otherwise on their dashboard.
#[component]
pub fn Login(redirect: Option<String>) -> Element {
    let mut auth = use_auth();
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);

    let redirect_target = use_signal(move || redirect);

    let go_to_destination = move |role: Role| {
        let target = post_login_target(redirect_target.read().as_deref(), role);
        go_to(&target);
    };

    // Already signed in: skip the form
    use_effect(move || {
        if let Some(user) = auth.current_user() {
            go_to_destination(user.role);
        }
    });

    let handle_login = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);
        field_errors.set(HashMap::new());

        match auth.login(email(), password()).await {
            Ok(user) => go_to_destination(user.role),
            Err(e) if e.kind == AppErrorKind::ValidationError => field_errors.set(e.field_errors),
            Err(e) if e.is_unauthorized() => {
                error_msg.set(Some("Invalid email or password".to_string()))
            }
            Err(e) => error_msg.set(Some(e.message)),
        }
        loading.set(false);
    };

    let demo_enabled = auth.demo_enabled();

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { "Sign In" }
                p { class: "auth-description", "Enter your credentials to access your account" }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }

                form { onsubmit: handle_login,
                    div { class: "auth-field",
                        label { r#for: "email", "Email" }
                        input {
                            r#type: "email",
                            id: "email",
                            placeholder: "you@school.edu",
                            value: email(),
                            oninput: move |e: FormEvent| email.set(e.value()),
                        }
                        if let Some(err) = field_errors().get("email") {
                            div { class: "auth-field-error", "{err}" }
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "password", "Password" }
                        input {
                            r#type: "password",
                            id: "password",
                            placeholder: "Enter your password",
                            value: password(),
                            oninput: move |e: FormEvent| password.set(e.value()),
                        }
                        if let Some(err) = field_errors().get("password") {
                            div { class: "auth-field-error", "{err}" }
                        }
                    }
                    div { class: "auth-forgot-password",
                        Link { to: Route::ForgotPassword { token: None }, "Forgot password?" }
                    }
                    button {
                        r#type: "submit",
                        class: "auth-submit button",
                        disabled: loading(),
                        if loading() { "Signing in..." } else { "Sign In" }
                    }
                }

                if demo_enabled {
                    div { class: "auth-divider", span { "or explore a demo portal" } }
                    div { class: "auth-demo-buttons",
                        for role in Role::ALL {
                            button {
                                key: "{role}",
                                class: "button button-outline",
                                onclick: move |_| match auth.demo_login(role) {
                                    Ok(user) => go_to_destination(user.role),
                                    Err(e) => error_msg.set(Some(e.message)),
                                },
                                "Demo {role.label()}"
                            }
                        }
                    }
                }

                p { class: "auth-link",
                    "Don't have an account? "
                    Link { to: Route::Register {}, "Create one" }
                }
            }
        }
    }
}
