use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::AppError;

/// Portal role carried by a session.
///
/// Membership checks are exact: `Admin` is not a super-role, an allow-list of
/// `[Student]` denies an administrator just like it denies an instructor.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::Student, Role::Instructor, Role::Admin];

    /// Parse a role string as sent by the backend. Case-insensitive;
    /// unknown values yield `None` rather than a fallback role.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().as_str() {
            "STUDENT" => Some(Role::Student),
            "INSTRUCTOR" => Some(Role::Instructor),
            "ADMIN" => Some(Role::Admin),
            _ => None,
        }
    }

    /// Uppercase wire / storage form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "STUDENT",
            Role::Instructor => "INSTRUCTOR",
            Role::Admin => "ADMIN",
        }
    }

    /// Human label, e.g. for "Demo Instructor".
    pub fn label(&self) -> &'static str {
        match self {
            Role::Student => "Student",
            Role::Instructor => "Instructor",
            Role::Admin => "Admin",
        }
    }

    /// The single authorization predicate shared by both guard layers.
    pub fn is_allowed(&self, allowed: &[Role]) -> bool {
        allowed.contains(self)
    }

    /// Only students and instructors have a self-service registration endpoint.
    pub fn can_self_register(&self) -> bool {
        !matches!(self, Role::Admin)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::parse(s).ok_or_else(|| AppError::bad_request(format!("Unknown role: {s}")))
    }
}

/// Avatar used for synthesized demo users.
pub const DEMO_AVATAR: &str = "/placeholder.svg";

/// Identifier shared by every synthesized demo user.
pub const DEMO_USER_ID: &str = "demo-user-id";

/// A portal user as returned by `GET /users/me`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

impl User {
    /// Synthesize the user behind a demo session. No network involved.
    pub fn demo(role: Role) -> Self {
        Self {
            id: DEMO_USER_ID.to_string(),
            name: format!("Demo {}", role.label()),
            email: format!("demo+{}@edu.test", role.as_str().to_lowercase()),
            role,
            avatar: Some(DEMO_AVATAR.to_string()),
            bio: None,
        }
    }

    /// Minimal user when only the login reply (token + role) is known.
    pub fn from_login(email: &str, role: Role) -> Self {
        Self {
            id: String::new(),
            name: email.split('@').next().unwrap_or(email).to_string(),
            email: email.to_string(),
            role,
            avatar: None,
            bio: None,
        }
    }

    pub fn is_demo(&self) -> bool {
        self.id == DEMO_USER_ID
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_parse_is_case_insensitive() {
        assert_eq!(Role::parse("admin"), Some(Role::Admin));
        assert_eq!(Role::parse(" Instructor "), Some(Role::Instructor));
        assert_eq!(Role::parse("STUDENT"), Some(Role::Student));
    }

    #[test]
    fn role_parse_rejects_unknown_values() {
        assert_eq!(Role::parse("professor"), None);
        assert_eq!(Role::parse(""), None);
        assert!("superuser".parse::<Role>().is_err());
    }

    #[test]
    fn role_serializes_uppercase() {
        assert_eq!(serde_json::to_string(&Role::Instructor).unwrap(), r#""INSTRUCTOR""#);
        let r: Role = serde_json::from_str(r#""ADMIN""#).unwrap();
        assert_eq!(r, Role::Admin);
    }

    #[test]
    fn admin_is_not_a_super_role() {
        assert!(!Role::Admin.is_allowed(&[Role::Student]));
        assert!(Role::Admin.is_allowed(&[Role::Student, Role::Admin]));
        assert!(!Role::Student.is_allowed(&[]));
    }

    #[test]
    fn only_admin_cannot_self_register() {
        assert!(Role::Student.can_self_register());
        assert!(Role::Instructor.can_self_register());
        assert!(!Role::Admin.can_self_register());
    }

    #[test]
    fn demo_user_is_synthesized_from_role() {
        let user = User::demo(Role::Instructor);
        assert_eq!(user.id, DEMO_USER_ID);
        assert_eq!(user.name, "Demo Instructor");
        assert_eq!(user.email, "demo+instructor@edu.test");
        assert_eq!(user.avatar.as_deref(), Some(DEMO_AVATAR));
        assert!(user.is_demo());
    }

    #[test]
    fn user_deserializes_without_optional_fields() {
        let json = r#"{"id":"7","name":"Ada","email":"ada@x.com","role":"STUDENT"}"#;
        let user: User = serde_json::from_str(json).unwrap();
        assert_eq!(user.role, Role::Student);
        assert!(user.avatar.is_none());
        assert!(!user.is_demo());
    }
}
