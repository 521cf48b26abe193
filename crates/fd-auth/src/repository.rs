use super::*;
use fd_core::ID;
use fd_pg::USERS;
use std::sync::Arc;
use tokio_postgres::Client;

const COLUMNS: &str = "id, username, email, admin, created_at";

impl AccountStore for Arc<Client> {
    async fn has_username(&self, username: &str) -> Result<bool, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT 1 FROM ",
                USERS,
                " WHERE LOWER(username) = LOWER($1)"
            ),
            &[&username],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(outage)
    }

    async fn has_email(&self, email: &str) -> Result<bool, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT 1 FROM ", USERS, " WHERE LOWER(email) = LOWER($1)"),
            &[&email],
        )
        .await
        .map(|opt| opt.is_some())
        .map_err(outage)
    }

    async fn create(
        &self,
        username: &str,
        email: &str,
        credential: &Credential,
    ) -> Result<Member, StoreError> {
        self.query_one(
            const_format::concatcp!(
                "INSERT INTO ",
                USERS,
                " (username, email, hash, salt) VALUES ($1, $2, $3, $4) RETURNING id, created_at"
            ),
            &[&username, &email, &credential.hash, &credential.salt],
        )
        .await
        .map(|row| {
            Member::new(
                ID::from(row.get::<_, i64>(0)),
                username.to_string(),
                email.to_string(),
                false,
                row.get::<_, std::time::SystemTime>(1),
            )
        })
        .map_err(conflict)
    }

    async fn lookup(&self, username: &str) -> Result<Option<(Member, Credential)>, StoreError> {
        self.query_opt(
            const_format::concatcp!(
                "SELECT ",
                COLUMNS,
                ", hash, salt FROM ",
                USERS,
                " WHERE LOWER(username) = LOWER($1)"
            ),
            &[&username],
        )
        .await
        .map(|opt| {
            opt.map(|row| {
                (
                    member(&row),
                    Credential {
                        hash: row.get::<_, String>(5),
                        salt: row.get::<_, String>(6),
                    },
                )
            })
        })
        .map_err(outage)
    }

    async fn fetch(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
        self.query_opt(
            const_format::concatcp!("SELECT ", COLUMNS, " FROM ", USERS, " WHERE id = $1"),
            &[&id.inner()],
        )
        .await
        .map(|opt| opt.map(|row| member(&row)))
        .map_err(outage)
    }

    async fn roster(&self) -> Result<Vec<Member>, StoreError> {
        self.query(
            const_format::concatcp!(
                "SELECT ",
                COLUMNS,
                " FROM ",
                USERS,
                " ORDER BY created_at DESC"
            ),
            &[],
        )
        .await
        .map(|rows| rows.iter().map(member).collect())
        .map_err(outage)
    }
}

fn member(row: &tokio_postgres::Row) -> Member {
    Member::new(
        ID::from(row.get::<_, i64>(0)),
        row.get::<_, String>(1),
        row.get::<_, String>(2),
        row.get::<_, bool>(3),
        row.get::<_, std::time::SystemTime>(4),
    )
}

fn outage(e: tokio_postgres::Error) -> StoreError {
    StoreError::Unavailable(e.to_string())
}

/// Maps a unique-index violation to the specific conflict; the index name
/// tells username and email apart.
fn conflict(e: tokio_postgres::Error) -> StoreError {
    if e.code() != Some(&tokio_postgres::error::SqlState::UNIQUE_VIOLATION) {
        return outage(e);
    }
    match e.as_db_error().and_then(|db| db.constraint()) {
        Some(index) if index.contains("email") => StoreError::DuplicateEmail,
        _ => StoreError::DuplicateUsername,
    }
}
