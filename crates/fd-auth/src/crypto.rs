use super::*;

/// Signs and verifies bearer tokens: HMAC-SHA-256 over the shared server
/// secret, with issuer, audience, and expiry checked on every decode.
///
/// Constructed once at startup; issuance and verification are pure
/// functions of the request plus this immutable state.
pub struct Crypto {
    encoding: jsonwebtoken::EncodingKey,
    decoding: jsonwebtoken::DecodingKey,
    validation: jsonwebtoken::Validation,
    issuer: String,
    audience: String,
    ttl: std::time::Duration,
}

impl Crypto {
    pub fn new(secret: &[u8], issuer: String, audience: String, days: u64) -> Self {
        let mut validation = jsonwebtoken::Validation::new(jsonwebtoken::Algorithm::HS256);
        validation.leeway = 0;
        validation.set_issuer(&[&issuer]);
        validation.set_audience(&[&audience]);
        validation.set_required_spec_claims(&["exp", "iss", "aud"]);
        Self {
            encoding: jsonwebtoken::EncodingKey::from_secret(secret),
            decoding: jsonwebtoken::DecodingKey::from_secret(secret),
            validation,
            issuer,
            audience,
            ttl: std::time::Duration::from_secs(days * 86_400),
        }
    }

    /// Loads the signing secret, issuer, audience, and TTL from the
    /// environment.
    ///
    /// # Panics
    ///
    /// Panics if any of `JWT_SECRET`, `JWT_ISSUER`, `JWT_AUDIENCE`, or
    /// `JWT_EXPIRE_DAYS` is missing or malformed: the process must not
    /// serve traffic without them.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var("JWT_SECRET")
                .expect("JWT_SECRET must be set")
                .as_bytes(),
            std::env::var("JWT_ISSUER").expect("JWT_ISSUER must be set"),
            std::env::var("JWT_AUDIENCE").expect("JWT_AUDIENCE must be set"),
            std::env::var("JWT_EXPIRE_DAYS")
                .expect("JWT_EXPIRE_DAYS must be set")
                .parse()
                .expect("JWT_EXPIRE_DAYS must be a number of days"),
        )
    }

    /// Issues a fresh token for an authenticated identity.
    pub fn issue(&self, identity: &Identity) -> Result<String, jsonwebtoken::errors::Error> {
        self.encode(&Claims::new(identity, &self.issuer, &self.audience, self.ttl))
    }

    /// Signs an explicit claims set. Public so tests can mint tokens with
    /// arbitrary windows.
    pub fn encode(&self, claims: &Claims) -> Result<String, jsonwebtoken::errors::Error> {
        jsonwebtoken::encode(&jsonwebtoken::Header::default(), claims, &self.encoding)
    }

    /// Verifies signature, issuer, audience, and validity window, then
    /// decodes the claims into an [`Identity`]. A token that fails any
    /// check is rejected whole; there is no partial trust.
    pub fn decode(&self, token: &str) -> Result<Identity, TokenError> {
        let claims = jsonwebtoken::decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(TokenError::from)?
            .claims;
        if claims.premature() {
            return Err(TokenError::Expired);
        }
        Ok(claims.identity())
    }
}

/// Why a presented token was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenError {
    Malformed,
    BadSignature,
    WrongIssuer,
    WrongAudience,
    Expired,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;
        match e.kind() {
            ErrorKind::InvalidSignature => Self::BadSignature,
            ErrorKind::InvalidIssuer => Self::WrongIssuer,
            ErrorKind::InvalidAudience => Self::WrongAudience,
            ErrorKind::ExpiredSignature => Self::Expired,
            ErrorKind::ImmatureSignature => Self::Expired,
            _ => Self::Malformed,
        }
    }
}

impl std::fmt::Display for TokenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Malformed => write!(f, "malformed token"),
            Self::BadSignature => write!(f, "invalid token signature"),
            Self::WrongIssuer => write!(f, "unrecognized token issuer"),
            Self::WrongAudience => write!(f, "unrecognized token audience"),
            Self::Expired => write!(f, "token outside its validity window"),
        }
    }
}

impl std::error::Error for TokenError {}

#[cfg(test)]
mod tests {
    use super::*;
    use fd_core::ID;

    fn crypto() -> Crypto {
        Crypto::new(b"unit-test-secret", "flashdeck".to_string(), "flashdeck-web".to_string(), 7)
    }

    fn identity() -> Identity {
        Identity::new(
            ID::from(42),
            "ada".to_string(),
            "ada@example.com".to_string(),
            Role::Admin,
        )
    }

    #[test]
    fn round_trip() {
        let crypto = crypto();
        let token = crypto.issue(&identity()).unwrap();
        let decoded = crypto.decode(&token).unwrap();
        assert_eq!(decoded, identity());
    }

    #[test]
    fn expired_token_rejected() {
        let crypto = crypto();
        let mut claims = Claims::new(
            &identity(),
            "flashdeck",
            "flashdeck-web",
            std::time::Duration::from_secs(3600),
        );
        claims.iat -= 7200;
        claims.exp -= 7200;
        let token = crypto.encode(&claims).unwrap();
        assert_eq!(crypto.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn future_iat_rejected() {
        let crypto = crypto();
        let mut claims = Claims::new(
            &identity(),
            "flashdeck",
            "flashdeck-web",
            std::time::Duration::from_secs(3600),
        );
        claims.iat += 600;
        let token = crypto.encode(&claims).unwrap();
        assert_eq!(crypto.decode(&token), Err(TokenError::Expired));
    }

    #[test]
    fn tampered_signature_rejected() {
        let crypto = crypto();
        let token = crypto.issue(&identity()).unwrap();
        // first byte of the signature segment carries six data bits
        let target = token.rfind('.').unwrap() + 1;
        let mut bytes = token.into_bytes();
        bytes[target] = if bytes[target] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();
        assert_eq!(crypto.decode(&tampered), Err(TokenError::BadSignature));
    }

    #[test]
    fn wrong_issuer_rejected() {
        let crypto = crypto();
        let other = Crypto::new(
            b"unit-test-secret",
            "someone-else".to_string(),
            "flashdeck-web".to_string(),
            7,
        );
        let token = other.issue(&identity()).unwrap();
        assert_eq!(crypto.decode(&token), Err(TokenError::WrongIssuer));
    }

    #[test]
    fn wrong_audience_rejected() {
        let crypto = crypto();
        let other = Crypto::new(
            b"unit-test-secret",
            "flashdeck".to_string(),
            "somewhere-else".to_string(),
            7,
        );
        let token = other.issue(&identity()).unwrap();
        assert_eq!(crypto.decode(&token), Err(TokenError::WrongAudience));
    }

    #[test]
    fn different_secret_rejected() {
        let crypto = crypto();
        let other = Crypto::new(
            b"another-secret",
            "flashdeck".to_string(),
            "flashdeck-web".to_string(),
            7,
        );
        let token = other.issue(&identity()).unwrap();
        assert_eq!(crypto.decode(&token), Err(TokenError::BadSignature));
    }

    #[test]
    fn garbage_rejected() {
        assert_eq!(crypto().decode("not.a.token"), Err(TokenError::Malformed));
        assert_eq!(crypto().decode(""), Err(TokenError::Malformed));
    }
}
