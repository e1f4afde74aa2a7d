use dioxus::prelude::*;
use shared_types::UpdateProfileRequest;

use crate::auth::use_auth;

/// Signed-in user's own profile: name and bio, plus a password change form.
/// Opening the page re-fetches the profile so edits made elsewhere show up.
#[component]
pub fn Profile() -> Element {
    let mut auth = use_auth();

    use_hook(move || {
        spawn(async move {
            if let Err(e) = auth.refresh_profile().await {
                tracing::debug!(kind = %e.kind, "Profile refresh failed");
            }
        });
    });

    let Some(user) = auth.current_user() else {
        return rsx! {};
    };

    rsx! {
        section { class: "page profile",
            h1 { "Your Profile" }
            dl { class: "profile-facts",
                dt { "Email" }
                dd { "{user.email}" }
                dt { "Role" }
                dd { "{user.role.label()}" }
            }
            ProfileForm { name: user.name.clone(), bio: user.bio.clone().unwrap_or_default() }
            if user.is_demo() {
                p { class: "dashboard-note", "Demo accounts have no password to change." }
            } else {
                PasswordForm {}
            }
        }
    }
}

#[component]
fn ProfileForm(name: String, bio: String) -> Element {
    let mut auth = use_auth();
    let mut name = use_signal(move || name);
    let mut bio = use_signal(move || bio);
    let mut status = use_signal(|| Option::<Result<(), String>>::None);
    let mut saving = use_signal(|| false);

    let handle_save = move |evt: FormEvent| async move {
        evt.prevent_default();
        saving.set(true);
        let patch = UpdateProfileRequest {
            name: Some(name().trim().to_string()),
            bio: Some(bio().trim().to_string()),
            ..Default::default()
        };
        let result = auth.update_profile(patch).await;
        status.set(Some(result.map(|_| ()).map_err(|e| e.message)));
        saving.set(false);
    };

    rsx! {
        form { class: "profile-form", onsubmit: handle_save,
            h2 { "Details" }
            match status() {
                Some(Ok(())) => rsx! { div { class: "auth-success", "Profile saved." } },
                Some(Err(msg)) => rsx! { div { class: "auth-error", "{msg}" } },
                None => rsx! {},
            }
            div { class: "auth-field",
                label { r#for: "profile-name", "Name" }
                input {
                    id: "profile-name",
                    value: name(),
                    oninput: move |e: FormEvent| name.set(e.value()),
                }
            }
            div { class: "auth-field",
                label { r#for: "profile-bio", "Bio" }
                textarea {
                    id: "profile-bio",
                    rows: "4",
                    value: bio(),
                    oninput: move |e: FormEvent| bio.set(e.value()),
                }
            }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Saving..." } else { "Save" }
            }
        }
    }
}

#[component]
fn PasswordForm() -> Element {
    let mut auth = use_auth();
    let mut current = use_signal(String::new);
    let mut next = use_signal(String::new);
    let mut status = use_signal(|| Option::<Result<(), String>>::None);
    let mut saving = use_signal(|| false);

    let handle_change = move |evt: FormEvent| async move {
        evt.prevent_default();
        saving.set(true);
        match auth.change_password(current(), next()).await {
            Ok(()) => {
                current.set(String::new());
                next.set(String::new());
                status.set(Some(Ok(())));
            }
            Err(e) => status.set(Some(Err(e.message))),
        }
        saving.set(false);
    };

    rsx! {
        form { class: "profile-form", onsubmit: handle_change,
            h2 { "Change Password" }
            match status() {
                Some(Ok(())) => rsx! { div { class: "auth-success", "Password updated." } },
                Some(Err(msg)) => rsx! { div { class: "auth-error", "{msg}" } },
                None => rsx! {},
            }
            div { class: "auth-field",
                label { r#for: "current-password", "Current password" }
                input {
                    r#type: "password",
                    id: "current-password",
                    value: current(),
                    oninput: move |e: FormEvent| current.set(e.value()),
                }
            }
            div { class: "auth-field",
                label { r#for: "new-password", "New password" }
                input {
                    r#type: "password",
                    id: "new-password",
                    value: next(),
                    oninput: move |e: FormEvent| next.set(e.value()),
                }
            }
            button { r#type: "submit", class: "button", disabled: saving(),
                if saving() { "Updating..." } else { "Update Password" }
            }
        }
    }
}
