use super::*;
use fd_core::ID;
use fd_core::Unique;

/// Access level carried by every token. The wire format duplicates this
/// under two claim names; internally there is exactly one role field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum Role {
    User,
    Admin,
}

impl Role {
    pub fn admin(self) -> bool {
        self == Self::Admin
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "User"),
            Self::Admin => write!(f, "Admin"),
        }
    }
}

/// Authenticated subject as decoded from a verified token.
/// Immutable once decoded; lives for exactly one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    id: ID<Member>,
    username: String,
    email: String,
    role: Role,
}

impl Identity {
    pub fn new(id: ID<Member>, username: String, email: String, role: Role) -> Self {
        Self {
            id,
            username,
            email,
            role,
        }
    }
    pub fn id(&self) -> ID<Member> {
        self.id
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn role(&self) -> Role {
        self.role
    }
}

impl From<&Member> for Identity {
    fn from(member: &Member) -> Self {
        Self::new(
            member.id(),
            member.username().to_string(),
            member.email().to_string(),
            member.role(),
        )
    }
}
