use dioxus::prelude::*;
use shared_types::dashboard_for;

use crate::auth::use_auth;
use crate::routes::Route;

/// Public landing page.
#[component]
pub fn Home() -> Element {
    let auth = use_auth();

    rsx! {
        section { class: "hero",
            h1 { "Learn, teach and manage in one place" }
            p { class: "hero-lead",
                "Students follow their courses, instructors run their classes and administrators keep the school running."
            }
            div { class: "hero-actions",
                if let Some(user) = auth.current_user() {
                    a { class: "button", href: dashboard_for(user.role), "Go to your dashboard" }
                } else {
                    Link { class: "button", to: Route::Register {}, "Get started" }
                    Link { class: "button button-outline", to: Route::Courses {}, "Browse courses" }
                }
            }
        }
    }
}
