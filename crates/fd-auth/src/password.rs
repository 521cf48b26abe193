//! Salted, peppered Argon2id password hashing.
//!
//! Salt defeats precomputation per-credential; the process-wide pepper
//! defeats offline cracking of a leaked credential store; the memory-hard
//! derivation defeats GPU/ASIC brute force.

use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;
use argon2::password_hash::Output;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

/// Stored password material: base64-encoded Argon2id digest and the
/// 256-bit salt it was derived with. Both are opaque to everything but
/// [`Hasher`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub hash: String,
    pub salt: String,
}

/// Derives and verifies peppered Argon2id password digests.
///
/// The pepper is loaded once at startup and never stored alongside any
/// credential; it is excluded from `Debug` output so it cannot leak into
/// logs.
pub struct Hasher {
    pepper: String,
    argon: Argon2<'static>,
}

impl Hasher {
    pub fn new(pepper: String) -> Self {
        let params = Params::new(
            fd_core::ARGON_MEMORY,
            fd_core::ARGON_PASSES,
            fd_core::ARGON_LANES,
            Some(fd_core::HASH_BYTES),
        )
        .expect("argon2 parameters");
        Self {
            pepper,
            argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        }
    }

    /// Loads the pepper from `PASSWORD_PEPPER`.
    ///
    /// # Panics
    ///
    /// Panics if the variable is unset: the process must not serve
    /// traffic without its pepper.
    pub fn from_env() -> Self {
        Self::new(std::env::var("PASSWORD_PEPPER").expect("PASSWORD_PEPPER must be set"))
    }

    /// Hashes a password under a fresh random salt.
    pub fn hash(&self, password: &str) -> Result<Credential, argon2::Error> {
        let salt = salt();
        let digest = self.derive(password, &salt)?;
        Ok(Credential {
            hash: STANDARD.encode(digest),
            salt: STANDARD.encode(salt),
        })
    }

    /// Recomputes the digest under the stored salt and compares in
    /// constant time. False on any mismatch or undecodable stored value;
    /// never fails for a wrong password.
    pub fn verify(&self, password: &str, stored: &Credential) -> bool {
        let Ok(salt) = STANDARD.decode(&stored.salt) else {
            return false;
        };
        let Ok(expected) = STANDARD.decode(&stored.hash) else {
            return false;
        };
        let Ok(digest) = self.derive(password, &salt) else {
            return false;
        };
        match (Output::new(&digest), Output::new(&expected)) {
            // Output equality is constant-time
            (Ok(ours), Ok(theirs)) => ours == theirs,
            _ => false,
        }
    }

    fn derive(&self, password: &str, salt: &[u8]) -> Result<[u8; fd_core::HASH_BYTES], argon2::Error> {
        let mut digest = [0u8; fd_core::HASH_BYTES];
        let peppered = format!("{}{}", password, self.pepper);
        self.argon
            .hash_password_into(peppered.as_bytes(), salt, &mut digest)?;
        Ok(digest)
    }
}

impl std::fmt::Debug for Hasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Hasher").finish_non_exhaustive()
    }
}

fn salt() -> [u8; fd_core::SALT_BYTES] {
    use rand::Rng;
    let mut bytes = [0u8; fd_core::SALT_BYTES];
    rand::rng().fill(&mut bytes[..]);
    bytes
}
