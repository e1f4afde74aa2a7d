//! The server gate and the in-tree gate must never disagree about who may
//! see a page once both know the viewer's role.

use shared_types::{
    classify, coarse_gate, dashboard_for, fine_gate, Credential, GuardDecision, GuardView, Role,
    Viewer,
};

const PAGES: &[&str] = &[
    "/",
    "/courses",
    "/courses/intro-programming",
    "/profile",
    "/student/dashboard",
    "/student/grades",
    "/instructor/dashboard",
    "/instructor/courses?tab=drafts",
    "/admin/dashboard",
    "/admin/users/7",
];

#[test]
fn verified_role_decisions_agree() {
    for path in PAGES {
        let allowed = classify(path).allowed_roles();
        for role in Role::ALL {
            let server = coarse_gate(path, &Credential::Verified(role));
            let client = fine_gate(Viewer::SignedIn(role), allowed);
            let server_admits = server == GuardDecision::Pass;
            let client_admits = client == GuardView::Granted;
            assert_eq!(server_admits, client_admits, "{role} on {path}");
        }
    }
}

#[test]
fn refused_roles_are_pointed_at_their_own_dashboard() {
    for path in PAGES {
        for role in Role::ALL {
            if let GuardDecision::Dashboard { location } =
                coarse_gate(path, &Credential::Verified(role))
            {
                assert_eq!(location, dashboard_for(role));
            }
        }
    }
}

#[test]
fn anonymous_decisions_agree_on_protected_pages() {
    for path in PAGES {
        let class = classify(path);
        let server = coarse_gate(path, &Credential::Missing);
        if class.requires_session() {
            assert!(matches!(server, GuardDecision::Login { .. }), "{path}");
            assert_eq!(
                fine_gate(Viewer::Anonymous, class.allowed_roles()),
                GuardView::Restricted,
                "{path}"
            );
        } else {
            assert_eq!(server, GuardDecision::Pass, "{path}");
        }
    }
}

#[test]
fn every_dashboard_admits_its_owner_after_login() {
    for role in Role::ALL {
        let target = shared_types::post_login_target(None, role);
        assert_eq!(target, dashboard_for(role));
        assert_eq!(
            coarse_gate(&target, &Credential::Verified(role)),
            GuardDecision::Pass
        );
    }
}
