use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use rand_core::OsRng;
use serde::{Deserialize, Serialize};
use std::{
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};
use thiserror::Error;
use uuid::Uuid;

/// Claims
///
/// Payload of every token this service issues. `sub` is the user's id.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub exp: usize,
    pub iat: usize,
}

#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("password hashing failed: {0}")]
    Hash(String),
    #[error("token error: {0}")]
    Token(#[from] jsonwebtoken::errors::Error),
}

/// CredentialService
///
/// Password hashing/validation and token issuance. Handlers and the `AuthUser` extractor
/// go through this trait so the scheme can change without touching them.
pub trait CredentialService: Send + Sync {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError>;
    /// `Ok(false)` for a wrong password; `Err` only for a corrupt stored hash.
    fn validate_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError>;
    fn issue_token(&self, user_id: Uuid) -> Result<String, CredentialError>;
    /// Returns the user id bound to a valid, unexpired token.
    fn verify_token(&self, token: &str) -> Result<Uuid, CredentialError>;
}

pub type CredentialState = Arc<dyn CredentialService>;

/// LocalCredentials
///
/// Argon2id password hashes and HS256 JWTs signed with the configured secret.
#[derive(Clone)]
pub struct LocalCredentials {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expires_in_secs: u64,
}

impl LocalCredentials {
    pub fn new(secret: &str, expires_in_secs: u64) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            expires_in_secs,
        }
    }
}

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

impl CredentialService for LocalCredentials {
    fn hash_password(&self, password: &str) -> Result<String, CredentialError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| CredentialError::Hash(e.to_string()))
    }

    fn validate_password(&self, password: &str, hash: &str) -> Result<bool, CredentialError> {
        let parsed = PasswordHash::new(hash).map_err(|e| CredentialError::Hash(e.to_string()))?;
        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok())
    }

    fn issue_token(&self, user_id: Uuid) -> Result<String, CredentialError> {
        let now = now_secs();
        let claims = Claims {
            sub: user_id,
            iat: now as usize,
            exp: (now + self.expires_in_secs) as usize,
        };
        Ok(encode(&Header::default(), &claims, &self.encoding_key)?)
    }

    fn verify_token(&self, token: &str) -> Result<Uuid, CredentialError> {
        let mut validation = Validation::default();
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(data.claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn credentials() -> LocalCredentials {
        LocalCredentials::new("unit-test-secret", 3600)
    }

    #[test]
    fn hashed_password_validates_only_against_original() {
        let creds = credentials();
        let hash = creds.hash_password("correct horse").unwrap();

        assert_ne!(hash, "correct horse");
        assert!(creds.validate_password("correct horse", &hash).unwrap());
        assert!(!creds.validate_password("wrong horse", &hash).unwrap());
    }

    #[test]
    fn corrupt_hash_is_an_error() {
        assert!(credentials().validate_password("pw", "not-a-phc-string").is_err());
    }

    #[test]
    fn issued_token_resolves_to_user() {
        let creds = credentials();
        let user_id = Uuid::new_v4();
        let token = creds.issue_token(user_id).unwrap();
        assert_eq!(creds.verify_token(&token).unwrap(), user_id);
    }

    #[test]
    fn token_from_other_secret_is_rejected() {
        let token = LocalCredentials::new("other-secret", 3600)
            .issue_token(Uuid::new_v4())
            .unwrap();
        assert!(credentials().verify_token(&token).is_err());
    }

    #[test]
    fn expired_token_is_rejected() {
        let creds = credentials();
        let now = now_secs();
        let claims = Claims {
            sub: Uuid::new_v4(),
            iat: (now - 7200) as usize,
            exp: (now - 3600) as usize,
        };
        let token = encode(&Header::default(), &claims, &creds.encoding_key).unwrap();
        assert!(creds.verify_token(&token).is_err());
    }
}
