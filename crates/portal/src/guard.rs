use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdLoader, LdLock, LdShield};
use dioxus_free_icons::Icon;
use shared_types::{
    classify, dashboard_for, describe_roles, fine_gate, GuardView, Role, HOME_PATH, LOGIN_PATH,
    REGISTER_PATH,
};

use crate::auth::use_auth;

/// In-tree authorization gate.
///
/// Renders exactly one of: a loading indicator while the session is being
/// rehydrated, the access-restricted view for anonymous visitors, the
/// permission-denied view for a signed-in user outside `allowed_roles`, or
/// `children`. A `fallback` replaces both refusal views.
///
/// Without `allowed_roles` the allow-list comes from the classification of
/// `path`; with neither, any signed-in user is admitted.
#[component]
pub fn ProtectedRoute(
    children: Element,
    allowed_roles: Option<Vec<Role>>,
    path: Option<String>,
    fallback: Option<Element>,
) -> Element {
    let auth = use_auth();

    let allowed = allowed_roles.or_else(|| {
        path.as_deref()
            .and_then(|p| classify(p).allowed_roles())
            .map(<[Role]>::to_vec)
    });

    match fine_gate(auth.viewer(), allowed.as_deref()) {
        GuardView::Loading => rsx! {
            div { class: "guard-loading", role: "status",
                Icon::<LdLoader> { icon: LdLoader, width: 24, height: 24 }
                p { "Verifying access..." }
            }
        },
        GuardView::Restricted => match fallback {
            Some(fallback) => fallback,
            None => rsx! { AccessRestricted {} },
        },
        GuardView::Denied { required, actual } => match fallback {
            Some(fallback) => fallback,
            None => rsx! { PermissionDenied { required, actual } },
        },
        GuardView::Granted => children,
    }
}

#[component]
fn AccessRestricted() -> Element {
    rsx! {
        div { class: "guard-card",
            Icon::<LdLock> { icon: LdLock, width: 40, height: 40 }
            h2 { "Access Restricted" }
            p { "You need to sign in to view this page." }
            div { class: "guard-actions",
                a { class: "button", href: LOGIN_PATH, "Sign In" }
                a { class: "button button-outline", href: REGISTER_PATH, "Create Account" }
                a { class: "guard-link", href: HOME_PATH, "Back to Home" }
            }
        }
    }
}

#[component]
fn PermissionDenied(required: Vec<Role>, actual: Role) -> Element {
    let required_label = describe_roles(&required);
    let actual_label = actual.as_str();
    let dashboard = dashboard_for(actual);

    rsx! {
        div { class: "guard-card",
            Icon::<LdShield> { icon: LdShield, width: 40, height: 40 }
            h2 { "Insufficient Permissions" }
            p { "You don't have permission to view this page." }
            p { class: "guard-roles", "Required role: {required_label}" }
            p { class: "guard-roles", "Your role: {actual_label}" }
            div { class: "guard-actions",
                a { class: "button", href: dashboard, "Go to Dashboard" }
                a { class: "guard-link", href: HOME_PATH, "Back to Home" }
            }
        }
    }
}
