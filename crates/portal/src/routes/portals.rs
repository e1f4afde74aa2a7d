use dioxus::prelude::*;
use shared_types::User;

use crate::auth::use_auth;
use crate::routes::Route;

#[component]
fn Welcome(user: User, heading: &'static str, blurb: &'static str) -> Element {
    rsx! {
        section { class: "page dashboard",
            h1 { "{heading}" }
            p { class: "dashboard-greeting", "Welcome back, {user.name}." }
            p { "{blurb}" }
            if user.is_demo() {
                p { class: "dashboard-note", "You are exploring a demo account. Changes stay on this device." }
            }
            Link { to: Route::Profile {}, "Edit your profile" }
        }
    }
}

/// The route guard has already admitted the viewer; the user is only
/// missing if the session ended between renders.
fn signed_in_user() -> Option<User> {
    use_auth().current_user()
}

#[component]
pub fn StudentDashboard() -> Element {
    let Some(user) = signed_in_user() else {
        return rsx! {};
    };
    rsx! {
        Welcome { user, heading: "Student Dashboard", blurb: "Your enrolled courses and upcoming work appear here." }
    }
}

#[component]
pub fn InstructorDashboard() -> Element {
    let Some(user) = signed_in_user() else {
        return rsx! {};
    };
    rsx! {
        Welcome { user, heading: "Instructor Dashboard", blurb: "Manage the courses you teach and review submissions." }
    }
}

#[component]
pub fn AdminDashboard() -> Element {
    let Some(user) = signed_in_user() else {
        return rsx! {};
    };
    rsx! {
        Welcome { user, heading: "Admin Dashboard", blurb: "Oversee users, courses and platform settings." }
    }
}
