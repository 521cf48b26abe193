use super::*;
use fd_core::ID;
use fd_core::Unique;
use serde::Deserialize;
use serde::Serialize;

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(rename = "confirmPassword")]
    pub confirm_password: String,
}

#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(rename = "isAdmin", skip_serializing_if = "Option::is_none")]
    pub is_admin: Option<bool>,
}

impl LoginResponse {
    pub fn granted(token: String, identity: &Identity) -> Self {
        Self {
            success: true,
            token: Some(token),
            message: "login successful".to_string(),
            username: Some(identity.username().to_string()),
            is_admin: Some(identity.role().admin()),
        }
    }
    pub fn refused(message: &str) -> Self {
        Self {
            success: false,
            token: None,
            message: message.to_string(),
            username: None,
            is_admin: None,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RegisterResponse {
    pub success: bool,
    pub message: String,
}

impl RegisterResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: "registration successful".to_string(),
        }
    }
    pub fn refused(message: &str) -> Self {
        Self {
            success: false,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserInfo {
    pub id: ID<Member>,
    pub username: String,
    pub email: String,
    #[serde(rename = "isAdmin")]
    pub is_admin: bool,
    #[serde(rename = "createdAt")]
    pub created_at: i64,
}

impl From<&Member> for UserInfo {
    fn from(member: &Member) -> Self {
        Self {
            id: member.id(),
            username: member.username().to_string(),
            email: member.email().to_string(),
            is_admin: member.admin(),
            created_at: member
                .created()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs() as i64,
        }
    }
}

/// Admin roster with the dashboard's headline counts.
#[derive(Debug, Serialize)]
pub struct RosterResponse {
    #[serde(rename = "totalUsers")]
    pub total_users: usize,
    #[serde(rename = "totalAdmins")]
    pub total_admins: usize,
    #[serde(rename = "totalMembers")]
    pub total_members: usize,
    pub users: Vec<UserInfo>,
}

impl From<Vec<Member>> for RosterResponse {
    fn from(members: Vec<Member>) -> Self {
        let total_admins = members.iter().filter(|m| m.admin()).count();
        Self {
            total_users: members.len(),
            total_admins,
            total_members: members.len() - total_admins,
            users: members.iter().map(UserInfo::from).collect(),
        }
    }
}
