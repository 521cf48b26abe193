use super::*;
use fd_core::ID;
use fd_core::Unique;

/// Registered account as stored in the users table. Password material
/// lives in [`Credential`], never here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    id: ID<Self>,
    username: String,
    email: String,
    admin: bool,
    created: std::time::SystemTime,
}

impl Member {
    pub fn new(
        id: ID<Self>,
        username: String,
        email: String,
        admin: bool,
        created: std::time::SystemTime,
    ) -> Self {
        Self {
            id,
            username,
            email,
            admin,
            created,
        }
    }
    pub fn username(&self) -> &str {
        &self.username
    }
    pub fn email(&self) -> &str {
        &self.email
    }
    pub fn admin(&self) -> bool {
        self.admin
    }
    pub fn created(&self) -> std::time::SystemTime {
        self.created
    }
    pub fn role(&self) -> Role {
        if self.admin { Role::Admin } else { Role::User }
    }
}

impl Unique for Member {
    fn id(&self) -> ID<Member> {
        self.id
    }
}

#[cfg(feature = "database")]
mod schema {
    use super::*;
    use fd_pg::*;

    /// Schema implementation for Member (users table).
    /// The `LOWER(...)` unique indexes are the storage-level guard that
    /// serializes concurrent registrations for the same username/email.
    impl Schema for Member {
        fn name() -> &'static str {
            USERS
        }
        fn creates() -> &'static str {
            const_format::concatcp!(
                "CREATE TABLE IF NOT EXISTS ",
                USERS,
                " (
                    id          BIGSERIAL PRIMARY KEY,
                    username    VARCHAR(32) NOT NULL,
                    email       VARCHAR(255) NOT NULL,
                    hash        TEXT NOT NULL,
                    salt        TEXT NOT NULL,
                    admin       BOOLEAN NOT NULL DEFAULT FALSE,
                    created_at  TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );"
            )
        }
        fn indices() -> &'static str {
            const_format::concatcp!(
                "CREATE UNIQUE INDEX IF NOT EXISTS users_username_ci ON ",
                USERS,
                " (LOWER(username));
                 CREATE UNIQUE INDEX IF NOT EXISTS users_email_ci ON ",
                USERS,
                " (LOWER(email));"
            )
        }
    }
}
