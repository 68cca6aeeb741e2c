use std::collections::HashMap;

use argon2::password_hash::{SaltString, rand_core};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash};

use crate::configs::Account;
use crate::errors::AuthError;

/// Decides whether a username/password pair opens a session.
pub trait CredentialCheck: Send + Sync {
    fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError>;
}

#[derive(Debug, Clone)]
pub struct Argon2Hash(Argon2<'static>);

/// Operator accounts keyed by username, holding argon2 PHC hashes.
#[derive(Clone)]
pub struct Argon2Credentials {
    hasher: Argon2Hash,
    accounts: HashMap<String, String>,
}

impl Argon2Credentials {
    pub fn new(accounts: &[Account]) -> Result<Self, AuthError> {
        let mut map = HashMap::with_capacity(accounts.len());

        for account in accounts {
            PasswordHash::new(&account.password).map_err(|e| {
                tracing::error!("password hash of account {} is not a PHC string: {}", account.username, e);
                AuthError::MalformedHash
            })?;
            map.insert(account.username.clone(), account.password.clone());
        }

        Ok(Self {
            hasher: Argon2Hash(Argon2::default()),
            accounts: map,
        })
    }

    pub fn hash(password: &str) -> Result<String, password_hash::Error> {
        let hash_salt = SaltString::generate(&mut rand_core::OsRng);
        let hash = Argon2::default().hash_password(password.as_ref(), &hash_salt)?;

        Ok(hash.to_string())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

impl CredentialCheck for Argon2Credentials {
    fn verify(&self, username: &str, password: &str) -> Result<bool, AuthError> {
        let Some(stored) = self.accounts.get(username) else {
            return Ok(false);
        };

        let parsed_hash = PasswordHash::new(stored).map_err(|_| AuthError::MalformedHash)?;

        Ok(self.hasher.0.verify_password(password.as_ref(), &parsed_hash).is_ok())
    }
}
