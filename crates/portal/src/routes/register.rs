use dioxus::prelude::*;
use shared_types::{AppErrorKind, RegisterRequest, Role};
use std::collections::HashMap;

use crate::auth::use_auth;
use crate::routes::Route;

/// Self-service sign-up for students and instructors. Admin accounts are
/// provisioned elsewhere and never offered here.
#[component]
pub fn Register() -> Element {
    let auth = use_auth();
    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut role = use_signal(|| Role::Student);
    let mut bio = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut field_errors = use_signal(HashMap::<String, String>::new);
    let mut loading = use_signal(|| false);
    let mut registered = use_signal(|| false);

    let handle_register = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);
        error_msg.set(None);
        field_errors.set(HashMap::new());

        let bio_text = bio().trim().to_string();
        let req = RegisterRequest {
            name: name().trim().to_string(),
            email: email().trim().to_string(),
            password: password(),
            role: role(),
            bio: (!bio_text.is_empty()).then_some(bio_text),
        };

        match auth.register(req).await {
            Ok(()) => registered.set(true),
            Err(e) if e.kind == AppErrorKind::ValidationError => field_errors.set(e.field_errors),
            Err(e) => error_msg.set(Some(e.message)),
        }
        loading.set(false);
    };

    if registered() {
        return rsx! {
            div { class: "auth-page",
                div { class: "auth-card",
                    h1 { "Account created" }
                    p { class: "auth-description",
                        "Your {role().label().to_lowercase()} account is ready. Sign in to continue."
                    }
                    Link { class: "button", to: Route::Login { redirect: None }, "Sign In" }
                }
            }
        };
    }

    let self_service_roles = Role::ALL.into_iter().filter(Role::can_self_register);

    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                h1 { "Create Account" }
                p { class: "auth-description", "Join as a student or an instructor" }

                if let Some(err) = error_msg() {
                    div { class: "auth-error", "{err}" }
                }

                form { onsubmit: handle_register,
                    div { class: "auth-field",
                        label { r#for: "name", "Full name" }
                        input {
                            id: "name",
                            value: name(),
                            oninput: move |e: FormEvent| name.set(e.value()),
                        }
                        if let Some(err) = field_errors().get("name") {
                            div { class: "auth-field-error", "{err}" }
                        }
                    }
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
                            placeholder: "At least 8 characters",
                            value: password(),
                            oninput: move |e: FormEvent| password.set(e.value()),
                        }
                        if let Some(err) = field_errors().get("password") {
                            div { class: "auth-field-error", "{err}" }
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "role", "I am a" }
                        select {
                            id: "role",
                            value: role().as_str(),
                            onchange: move |e: FormEvent| {
                                if let Some(r) = Role::parse(&e.value()) {
                                    role.set(r);
                                }
                            },
                            for r in self_service_roles {
                                option { key: "{r}", value: r.as_str(), "{r.label()}" }
                            }
                        }
                    }
                    div { class: "auth-field",
                        label { r#for: "bio", "About you (optional)" }
                        textarea {
                            id: "bio",
                            rows: "3",
                            value: bio(),
                            oninput: move |e: FormEvent| bio.set(e.value()),
                        }
                    }
                    button {
                        r#type: "submit",
                        class: "auth-submit button",
                        disabled: loading(),
                        if loading() { "Creating account..." } else { "Create Account" }
                    }
                }

                p { class: "auth-link",
                    "Already have an account? "
                    Link { to: Route::Login { redirect: None }, "Sign in" }
                }
            }
        }
    }
}
