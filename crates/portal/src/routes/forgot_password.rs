use dioxus::prelude::*;

use crate::auth::use_auth;
use crate::routes::Route;

const MIN_PASSWORD_LENGTH: usize = 8;

/// Password recovery. Without a token the visitor asks for a reset email;
/// the link in that email brings them back here with `?token=` to choose a
/// new password.
#[component]
pub fn ForgotPassword(token: Option<String>) -> Element {
    rsx! {
        div { class: "auth-page",
            div { class: "auth-card",
                match token.filter(|t| !t.is_empty()) {
                    Some(token) => rsx! { ResetForm { token } },
                    None => rsx! { RequestForm {} },
                }
                p { class: "auth-link",
                    Link { to: Route::Login { redirect: None }, "Back to sign in" }
                }
            }
        }
    }
}

/// Always reports success so the form cannot reveal which
/// addresses have accounts.
#[component]
fn RequestForm() -> Element {
    let auth = use_auth();
    let mut email = use_signal(String::new);
    let mut submitted = use_signal(|| false);
    let mut loading = use_signal(|| false);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        loading.set(true);

        if let Err(e) = auth.request_password_reset(email().trim().to_string()).await {
            tracing::debug!(error = %e, "Password reset request failed");
        }

        submitted.set(true);
        loading.set(false);
    };

    rsx! {
        h1 { "Reset Password" }
        p { class: "auth-description", "Enter your email to receive a password reset link" }

        if submitted() {
            div { class: "auth-success",
                "If an account with that email exists, a password reset link has been sent. Check your inbox."
            }
        } else {
            form { onsubmit: handle_submit,
                div { class: "auth-field",
                    label { r#for: "email", "Email" }
                    input {
                        r#type: "email",
                        id: "email",
                        placeholder: "you@school.edu",
                        value: email(),
                        oninput: move |e: FormEvent| email.set(e.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "auth-submit button",
                    disabled: loading(),
                    if loading() { "Sending..." } else { "Send Reset Link" }
                }
            }
        }
    }
}

#[component]
fn ResetForm(token: String) -> Element {
    let auth = use_auth();
    let mut new_password = use_signal(String::new);
    let mut confirm_password = use_signal(String::new);
    let mut error_msg = use_signal(|| Option::<String>::None);
    let mut success = use_signal(|| false);
    let mut loading = use_signal(|| false);
    let token = use_signal(move || token);

    let handle_submit = move |evt: FormEvent| async move {
        evt.prevent_default();
        error_msg.set(None);

        let pw = new_password();
        if pw.len() < MIN_PASSWORD_LENGTH {
            error_msg.set(Some(format!(
                "Password must be at least {MIN_PASSWORD_LENGTH} characters"
            )));
            return;
        }
        if pw != confirm_password() {
            error_msg.set(Some("Passwords do not match".to_string()));
            return;
        }

        loading.set(true);
        match auth.reset_password(token(), pw).await {
            Ok(()) => success.set(true),
            Err(e) => error_msg.set(Some(e.message)),
        }
        loading.set(false);
    };

    rsx! {
        h1 { "Set New Password" }
        p { class: "auth-description", "Enter your new password below" }

        if success() {
            div { class: "auth-success",
                "Password reset successfully. You can now sign in with your new password."
            }
        } else {
            if let Some(err) = error_msg() {
                div { class: "auth-error", "{err}" }
            }
            form { onsubmit: handle_submit,
                div { class: "auth-field",
                    label { r#for: "new_password", "New Password" }
                    input {
                        r#type: "password",
                        id: "new_password",
                        placeholder: "At least 8 characters",
                        value: new_password(),
                        oninput: move |e: FormEvent| new_password.set(e.value()),
                    }
                }
                div { class: "auth-field",
                    label { r#for: "confirm_password", "Confirm Password" }
                    input {
                        r#type: "password",
                        id: "confirm_password",
                        placeholder: "Re-enter your password",
                        value: confirm_password(),
                        oninput: move |e: FormEvent| confirm_password.set(e.value()),
                    }
                }
                button {
                    r#type: "submit",
                    class: "auth-submit button",
                    disabled: loading(),
                    if loading() { "Resetting..." } else { "Reset Password" }
                }
            }
        }
    }
}
