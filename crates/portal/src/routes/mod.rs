pub mod courses;
pub mod forgot_password;
pub mod home;
pub mod login;
pub mod not_found;
pub mod portals;
pub mod profile;
pub mod register;

use dioxus::prelude::*;
use dioxus_free_icons::icons::ld_icons::{LdGraduationCap, LdLogOut};
use dioxus_free_icons::Icon;
use shared_types::dashboard_for;

use crate::auth::use_auth;
use crate::guard::ProtectedRoute;

use courses::{CourseDetail, Courses};
use forgot_password::ForgotPassword;
use home::Home;
use login::Login;
use not_found::NotFound;
use portals::{AdminDashboard, InstructorDashboard, StudentDashboard};
use profile::Profile;
use register::Register;

/// Application routes.
///
/// Page access is decided by path, not by variant: [`RouteGuard`] classifies
/// the current URL with the same rules the server middleware uses.
#[derive(Clone, Routable, Debug, PartialEq)]
pub enum Route {
    #[layout(Shell)]
    #[route("/")]
    Home {},
    #[route("/login?:redirect")]
    Login { redirect: Option<String> },
    #[route("/register")]
    Register {},
    #[route("/forgot-password?:token")]
    ForgotPassword { token: Option<String> },
    #[route("/courses")]
    Courses {},
    #[route("/courses/:id")]
    CourseDetail { id: String },
    #[layout(RouteGuard)]
    #[route("/student/dashboard")]
    StudentDashboard {},
    #[route("/instructor/dashboard")]
    InstructorDashboard {},
    #[route("/admin/dashboard")]
    AdminDashboard {},
    #[route("/profile")]
    Profile {},
    #[end_layout]
    #[end_layout]
    #[route("/:..route")]
    NotFound { route: Vec<String> },
}

/// Wraps every non-public page in a [`ProtectedRoute`] whose allow-list is
/// derived from the current path.
#[component]
fn RouteGuard() -> Element {
    let route: Route = use_route();

    rsx! {
        ProtectedRoute { path: route.to_string(),
            Outlet::<Route> {}
        }
    }
}

/// Top bar and page frame shared by all pages.
#[component]
fn Shell() -> Element {
    let mut auth = use_auth();
    let user = auth.current_user();

    rsx! {
        header { class: "portal-header",
            Link { to: Route::Home {}, class: "portal-brand",
                Icon::<LdGraduationCap> { icon: LdGraduationCap, width: 22, height: 22 }
                span { "LMS Portal" }
            }
            nav { class: "portal-nav",
                Link { to: Route::Courses {}, "Courses" }
                if let Some(user) = user {
                    a { href: dashboard_for(user.role), "Dashboard" }
                    Link { to: Route::Profile {}, "{user.name}" }
                    span { class: "role-badge", "{user.role}" }
                    button {
                        class: "button button-ghost",
                        onclick: move |_| auth.logout(),
                        Icon::<LdLogOut> { icon: LdLogOut, width: 16, height: 16 }
                        "Sign Out"
                    }
                } else {
                    Link { to: Route::Login { redirect: None }, "Sign In" }
                    Link { to: Route::Register {}, class: "button", "Create Account" }
                }
            }
        }
        main { class: "portal-main",
            Outlet::<Route> {}
        }
    }
}

/// Push a local path, falling back to a full navigation for anything the
/// router does not know.
pub fn go_to(path: &str) {
    match path.parse::<Route>() {
        Ok(route) => {
            navigator().push(route);
        }
        Err(_) => {
            navigator().push(NavigationTarget::<Route>::External(path.to_string()));
        }
    }
}
