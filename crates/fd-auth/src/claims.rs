use super::*;
use fd_core::ID;

/// JWT payload. The role rides under both a generic `role` claim and the
/// application's legacy `UserType` claim so either claim-reading
/// convention can consume the token; `role` is authoritative on decode.
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct Claims {
    pub sub: i64,
    pub usr: String,
    pub eml: String,
    pub role: Role,
    #[serde(rename = "UserType")]
    pub kind: Role,
    pub iss: String,
    pub aud: String,
    pub iat: i64,
    pub exp: i64,
}

impl Claims {
    pub fn new(identity: &Identity, issuer: &str, audience: &str, ttl: std::time::Duration) -> Self {
        let now = epoch();
        Self {
            sub: identity.id().inner(),
            usr: identity.username().to_string(),
            eml: identity.email().to_string(),
            role: identity.role(),
            kind: identity.role(),
            iss: issuer.to_string(),
            aud: audience.to_string(),
            iat: now,
            exp: now + ttl.as_secs() as i64,
        }
    }
    /// The validity window is `[iat, exp)`, with zero clock-skew tolerance.
    pub fn expired(&self) -> bool {
        epoch() >= self.exp
    }
    pub fn premature(&self) -> bool {
        self.iat > epoch()
    }
    pub fn user(&self) -> ID<Member> {
        ID::from(self.sub)
    }
    pub fn identity(&self) -> Identity {
        Identity::new(
            self.user(),
            self.usr.clone(),
            self.eml.clone(),
            self.role,
        )
    }
}

fn epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time")
        .as_secs() as i64
}
