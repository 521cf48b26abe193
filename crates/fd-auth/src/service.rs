use super::*;
use fd_core::ID;

/// Storage seam for account records. The production implementation lives
/// in `repository` (tokio-postgres); tests run against an in-memory
/// double. Username and email matching is case-insensitive everywhere.
#[allow(async_fn_in_trait)]
pub trait AccountStore {
    async fn has_username(&self, username: &str) -> Result<bool, StoreError>;
    async fn has_email(&self, email: &str) -> Result<bool, StoreError>;
    async fn create(
        &self,
        username: &str,
        email: &str,
        credential: &Credential,
    ) -> Result<Member, StoreError>;
    async fn lookup(&self, username: &str) -> Result<Option<(Member, Credential)>, StoreError>;
    async fn fetch(&self, id: ID<Member>) -> Result<Option<Member>, StoreError>;
    async fn roster(&self) -> Result<Vec<Member>, StoreError>;
}

/// Storage-level failures. Unique-constraint violations are split out so
/// a registration race maps back to the specific conflict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    DuplicateUsername,
    DuplicateEmail,
    Unavailable(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DuplicateUsername => write!(f, "username already stored"),
            Self::DuplicateEmail => write!(f, "email already stored"),
            Self::Unavailable(e) => write!(f, "account store unavailable: {}", e),
        }
    }
}

impl std::error::Error for StoreError {}

/// Why a registration was refused.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegisterError {
    PasswordMismatch,
    UsernameTaken,
    EmailTaken,
    Fault(String),
}

impl std::fmt::Display for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::PasswordMismatch => write!(f, "passwords do not match"),
            Self::UsernameTaken => write!(f, "username already exists"),
            Self::EmailTaken => write!(f, "email already exists"),
            Self::Fault(e) => write!(f, "registration failed: {}", e),
        }
    }
}

impl std::error::Error for RegisterError {}

/// Why a login was refused. Unknown usernames and wrong passwords are
/// deliberately indistinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginError {
    InvalidCredentials,
    Fault(String),
}

impl std::fmt::Display for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidCredentials => write!(f, "invalid username or password"),
            Self::Fault(e) => write!(f, "login failed: {}", e),
        }
    }
}

impl std::error::Error for LoginError {}

/// Registers a new account: confirm the password, check uniqueness, hash,
/// persist. The uniqueness checks here are a fast path; the store's
/// unique indexes arbitrate concurrent registrations, and a violation
/// surfacing from the insert still maps to the specific conflict.
pub async fn register<S: AccountStore>(
    store: &S,
    hasher: &Hasher,
    username: &str,
    email: &str,
    password: &str,
    confirm: &str,
) -> Result<(), RegisterError> {
    if password != confirm {
        return Err(RegisterError::PasswordMismatch);
    }
    if store
        .has_username(username)
        .await
        .map_err(|e| RegisterError::Fault(e.to_string()))?
    {
        return Err(RegisterError::UsernameTaken);
    }
    if store
        .has_email(email)
        .await
        .map_err(|e| RegisterError::Fault(e.to_string()))?
    {
        return Err(RegisterError::EmailTaken);
    }
    let credential = hasher
        .hash(password)
        .map_err(|e| RegisterError::Fault(e.to_string()))?;
    match store.create(username, email, &credential).await {
        Ok(_) => Ok(()),
        Err(StoreError::DuplicateUsername) => Err(RegisterError::UsernameTaken),
        Err(StoreError::DuplicateEmail) => Err(RegisterError::EmailTaken),
        Err(e) => Err(RegisterError::Fault(e.to_string())),
    }
}

/// Authenticates a username/password pair and issues a bearer token.
/// Lookup is case-insensitive; a missing account and a failed password
/// check produce the identical error.
pub async fn login<S: AccountStore>(
    store: &S,
    hasher: &Hasher,
    crypto: &Crypto,
    username: &str,
    password: &str,
) -> Result<(Identity, String), LoginError> {
    let (member, credential) = match store.lookup(username).await {
        Ok(Some(found)) => found,
        Ok(None) => return Err(LoginError::InvalidCredentials),
        Err(e) => return Err(LoginError::Fault(e.to_string())),
    };
    if !hasher.verify(password, &credential) {
        return Err(LoginError::InvalidCredentials);
    }
    let identity = Identity::from(&member);
    let token = crypto
        .issue(&identity)
        .map_err(|e| LoginError::Fault(e.to_string()))?;
    Ok((identity, token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_core::Unique;
    use std::sync::Mutex;

    /// In-memory account store mirroring the repository's semantics.
    #[derive(Default)]
    struct Memory {
        rows: Mutex<Vec<(Member, Credential)>>,
    }

    impl AccountStore for Memory {
        async fn has_username(&self, username: &str) -> Result<bool, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|(m, _)| m.username().eq_ignore_ascii_case(username)))
        }
        async fn has_email(&self, email: &str) -> Result<bool, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .any(|(m, _)| m.email().eq_ignore_ascii_case(email)))
        }
        async fn create(
            &self,
            username: &str,
            email: &str,
            credential: &Credential,
        ) -> Result<Member, StoreError> {
            let mut rows = self.rows.lock().unwrap();
            if rows
                .iter()
                .any(|(m, _)| m.username().eq_ignore_ascii_case(username))
            {
                return Err(StoreError::DuplicateUsername);
            }
            if rows.iter().any(|(m, _)| m.email().eq_ignore_ascii_case(email)) {
                return Err(StoreError::DuplicateEmail);
            }
            let member = Member::new(
                ID::from(rows.len() as i64 + 1),
                username.to_string(),
                email.to_string(),
                false,
                std::time::SystemTime::now(),
            );
            rows.push((member.clone(), credential.clone()));
            Ok(member)
        }
        async fn lookup(&self, username: &str) -> Result<Option<(Member, Credential)>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|(m, _)| m.username().eq_ignore_ascii_case(username))
                .cloned())
        }
        async fn fetch(&self, id: ID<Member>) -> Result<Option<Member>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .find(|(m, _)| m.id() == id)
                .map(|(m, _)| m.clone()))
        }
        async fn roster(&self) -> Result<Vec<Member>, StoreError> {
            Ok(self
                .rows
                .lock()
                .unwrap()
                .iter()
                .map(|(m, _)| m.clone())
                .collect())
        }
    }

    /// A store whose fast-path checks raced: the insert hits the unique
    /// index even though the lookups reported the name free.
    struct Raced;

    impl AccountStore for Raced {
        async fn has_username(&self, _: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn has_email(&self, _: &str) -> Result<bool, StoreError> {
            Ok(false)
        }
        async fn create(&self, _: &str, _: &str, _: &Credential) -> Result<Member, StoreError> {
            Err(StoreError::DuplicateUsername)
        }
        async fn lookup(&self, _: &str) -> Result<Option<(Member, Credential)>, StoreError> {
            unimplemented!()
        }
        async fn fetch(&self, _: ID<Member>) -> Result<Option<Member>, StoreError> {
            unimplemented!()
        }
        async fn roster(&self) -> Result<Vec<Member>, StoreError> {
            unimplemented!()
        }
    }

    fn hasher() -> Hasher {
        Hasher::new("test-pepper".to_string())
    }

    fn crypto() -> Crypto {
        Crypto::new(b"test-secret", "flashdeck".to_string(), "flashdeck-web".to_string(), 1)
    }

    #[tokio::test]
    async fn register_then_login() {
        let store = Memory::default();
        let (hasher, crypto) = (hasher(), crypto());
        register(&store, &hasher, "ada", "ada@example.com", "hunter2222", "hunter2222")
            .await
            .unwrap();
        let (identity, token) = login(&store, &hasher, &crypto, "ada", "hunter2222")
            .await
            .unwrap();
        assert_eq!(identity.username(), "ada");
        assert_eq!(identity.role(), Role::User);
        assert_eq!(crypto.decode(&token).unwrap(), identity);
    }

    #[tokio::test]
    async fn login_is_case_insensitive() {
        let store = Memory::default();
        let (hasher, crypto) = (hasher(), crypto());
        register(&store, &hasher, "Ada", "ada@example.com", "hunter2222", "hunter2222")
            .await
            .unwrap();
        let (identity, _) = login(&store, &hasher, &crypto, "ADA", "hunter2222")
            .await
            .unwrap();
        assert_eq!(identity.username(), "Ada");
    }

    #[tokio::test]
    async fn unknown_user_and_wrong_password_are_identical() {
        let store = Memory::default();
        let (hasher, crypto) = (hasher(), crypto());
        register(&store, &hasher, "real", "real@example.com", "hunter2222", "hunter2222")
            .await
            .unwrap();
        let ghost = login(&store, &hasher, &crypto, "ghost", "x")
            .await
            .unwrap_err();
        let wrong = login(&store, &hasher, &crypto, "real", "wrong_password")
            .await
            .unwrap_err();
        assert_eq!(ghost, wrong);
        assert_eq!(ghost.to_string(), wrong.to_string());
    }

    #[tokio::test]
    async fn password_mismatch_refused() {
        let store = Memory::default();
        let refused = register(&store, &hasher(), "ada", "ada@example.com", "hunter2222", "hunter3333")
            .await
            .unwrap_err();
        assert_eq!(refused, RegisterError::PasswordMismatch);
    }

    #[tokio::test]
    async fn duplicates_refused_case_insensitively() {
        let store = Memory::default();
        let hasher = hasher();
        register(&store, &hasher, "ada", "ada@example.com", "hunter2222", "hunter2222")
            .await
            .unwrap();
        let taken = register(&store, &hasher, "ADA", "other@example.com", "hunter2222", "hunter2222")
            .await
            .unwrap_err();
        assert_eq!(taken, RegisterError::UsernameTaken);
        let taken = register(&store, &hasher, "eve", "ADA@EXAMPLE.COM", "hunter2222", "hunter2222")
            .await
            .unwrap_err();
        assert_eq!(taken, RegisterError::EmailTaken);
    }

    #[tokio::test]
    async fn raced_insert_surfaces_as_taken() {
        let taken = register(&Raced, &hasher(), "ada", "ada@example.com", "hunter2222", "hunter2222")
            .await
            .unwrap_err();
        assert_eq!(taken, RegisterError::UsernameTaken);
    }
}
