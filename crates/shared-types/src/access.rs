//! Route classification and the authorization decisions built on it.
//!
//! Both guard layers go through this module: the server middleware calls
//! [`coarse_gate`] before any page code runs, the `ProtectedRoute` component
//! calls [`fine_gate`] once the auth state is known. Path-to-role rules live
//! here and nowhere else.

use crate::Role;

/// Path of the sign-in page.
pub const LOGIN_PATH: &str = "/login";
pub const REGISTER_PATH: &str = "/register";
pub const HOME_PATH: &str = "/";

/// Pages reachable without a session, matched exactly.
const PUBLIC_PATHS: &[&str] = &["/", "/login", "/register", "/forgot-password", "/courses"];

/// Public subtrees: the prefix itself and everything under it.
const PUBLIC_TREES: &[&str] = &["/courses"];

/// Role portals.
const PORTALS: &[(&str, Role)] = &[
    ("/student", Role::Student),
    ("/instructor", Role::Instructor),
    ("/admin", Role::Admin),
];

/// Not pages at all: server functions, static assets, health checks.
const EXEMPT_TREES: &[&str] = &["/api", "/assets", "/_dioxus", "/health"];
const EXEMPT_PATHS: &[&str] = &["/favicon.ico"];

/// The class a page path falls into. Exactly one applies per path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteClass {
    Public,
    Student,
    Instructor,
    Admin,
    /// Any page outside the public set and the portals: needs a session,
    /// any role will do.
    SignedIn,
}

impl RouteClass {
    pub fn requires_session(&self) -> bool {
        !matches!(self, RouteClass::Public)
    }

    /// Roles admitted to this class. `None` means no role restriction.
    pub fn allowed_roles(&self) -> Option<&'static [Role]> {
        match self {
            RouteClass::Public | RouteClass::SignedIn => None,
            RouteClass::Student => Some(&[Role::Student]),
            RouteClass::Instructor => Some(&[Role::Instructor]),
            RouteClass::Admin => Some(&[Role::Admin]),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            RouteClass::Public => "public",
            RouteClass::Student => "student",
            RouteClass::Instructor => "instructor",
            RouteClass::Admin => "admin",
            RouteClass::SignedIn => "signed_in",
        }
    }

    fn portal(role: Role) -> Self {
        match role {
            Role::Student => RouteClass::Student,
            Role::Instructor => RouteClass::Instructor,
            Role::Admin => RouteClass::Admin,
        }
    }
}

/// Drop query string, fragment and trailing slashes.
fn normalize(path: &str) -> &str {
    let end = path.find(&['?', '#'][..]).unwrap_or(path.len());
    let trimmed = path[..end].trim_end_matches('/');
    if trimmed.is_empty() {
        "/"
    } else {
        trimmed
    }
}

/// Segment-aware prefix test: `/admin` matches `/admin` and `/admin/x`,
/// not `/administrator`.
fn under(path: &str, prefix: &str) -> bool {
    path == prefix
        || path
            .strip_prefix(prefix)
            .is_some_and(|rest| rest.starts_with('/'))
}

/// Paths the guard never looks at.
pub fn is_exempt(path: &str) -> bool {
    let path = normalize(path);
    EXEMPT_PATHS.contains(&path) || EXEMPT_TREES.iter().any(|tree| under(path, tree))
}

/// Classify a page path (query strings are ignored).
pub fn classify(path: &str) -> RouteClass {
    let path = normalize(path);

    if PUBLIC_PATHS.contains(&path) || PUBLIC_TREES.iter().any(|tree| under(path, tree)) {
        return RouteClass::Public;
    }

    PORTALS
        .iter()
        .find(|(prefix, _)| under(path, prefix))
        .map(|(_, role)| RouteClass::portal(*role))
        .unwrap_or(RouteClass::SignedIn)
}

/// Landing page of each role's portal.
pub fn dashboard_for(role: Role) -> &'static str {
    match role {
        Role::Student => "/student/dashboard",
        Role::Instructor => "/instructor/dashboard",
        Role::Admin => "/admin/dashboard",
    }
}

/// Login URL carrying the originally requested path as return target.
///
/// Slashes stay readable (`/login?redirect=/student/dashboard`); everything
/// else that could break the query string is percent-encoded.
pub fn login_redirect(path_and_query: &str) -> String {
    let target = urlencoding::encode(path_and_query).replace("%2F", "/");
    format!("{LOGIN_PATH}?redirect={target}")
}

/// A return target is only honoured when it is a local page path.
fn is_safe_return_target(target: &str) -> bool {
    target.starts_with('/')
        && !target.starts_with("//")
        && !target.contains('\\')
        && normalize(target) != HOME_PATH
        && !under(normalize(target), LOGIN_PATH)
        && !is_exempt(target)
}

/// Where to go after a successful sign-in.
///
/// The `redirect` query value wins when it is a safe local path the role may
/// actually enter; otherwise the role's dashboard.
pub fn post_login_target(redirect: Option<&str>, role: Role) -> String {
    redirect
        .filter(|target| is_safe_return_target(target))
        .filter(|target| {
            classify(target)
                .allowed_roles()
                .map_or(true, |allowed| role.is_allowed(allowed))
        })
        .map(str::to_string)
        .unwrap_or_else(|| dashboard_for(role).to_string())
}

/// What the server-side layer learned about the presented credential.
#[derive(Debug, Clone, PartialEq)]
pub enum Credential {
    /// No cookie, no bearer header.
    Missing,
    /// A token is present; its contents were not inspected.
    Present,
    /// The token was decoded and carries this role.
    Verified(Role),
    /// The token was inspected and rejected (bad signature, expired, garbage).
    Rejected,
}

/// Outcome of the server-side (pre-render) gate.
#[derive(Debug, Clone, PartialEq)]
pub enum GuardDecision {
    Pass,
    /// Send the visitor to sign in; `location` includes the return target.
    Login { location: String },
    /// Signed in, wrong portal: send them to their own dashboard.
    Dashboard { location: String },
}

impl GuardDecision {
    pub fn as_str(&self) -> &'static str {
        match self {
            GuardDecision::Pass => "pass",
            GuardDecision::Login { .. } => "login",
            GuardDecision::Dashboard { .. } => "dashboard",
        }
    }
}

/// Server-side gate. Exempt and public paths always pass; other paths need a
/// credential. Role precision only applies when the credential was decoded.
pub fn coarse_gate(path_and_query: &str, credential: &Credential) -> GuardDecision {
    if is_exempt(path_and_query) {
        return GuardDecision::Pass;
    }

    let class = classify(path_and_query);
    if !class.requires_session() {
        return GuardDecision::Pass;
    }

    match credential {
        Credential::Missing | Credential::Rejected => GuardDecision::Login {
            location: login_redirect(path_and_query),
        },
        Credential::Present => GuardDecision::Pass,
        Credential::Verified(role) => match class.allowed_roles() {
            Some(allowed) if !role.is_allowed(allowed) => GuardDecision::Dashboard {
                location: dashboard_for(*role).to_string(),
            },
            _ => GuardDecision::Pass,
        },
    }
}

/// Who is looking at the page, as far as the client layer knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Viewer {
    /// Rehydration has not finished.
    Resolving,
    Anonymous,
    SignedIn(Role),
}

/// The one view the client-side guard renders.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardView {
    Loading,
    /// No session: offer sign in / sign up.
    Restricted,
    /// Session with the wrong role.
    Denied { required: Vec<Role>, actual: Role },
    Granted,
}

/// Client-side gate. `allowed` of `None` admits any signed-in role.
pub fn fine_gate(viewer: Viewer, allowed: Option<&[Role]>) -> GuardView {
    match viewer {
        Viewer::Resolving => GuardView::Loading,
        Viewer::Anonymous => GuardView::Restricted,
        Viewer::SignedIn(role) => match allowed {
            Some(allowed) if !role.is_allowed(allowed) => GuardView::Denied {
                required: allowed.to_vec(),
                actual: role,
            },
            _ => GuardView::Granted,
        },
    }
}

/// `"STUDENT or INSTRUCTOR"`, as shown on the permission-denied view.
pub fn describe_roles(roles: &[Role]) -> String {
    roles
        .iter()
        .map(Role::as_str)
        .collect::<Vec<_>>()
        .join(" or ")
}
