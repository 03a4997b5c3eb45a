//! Credential hashing.
//!
//! Secrets are stored as Argon2id PHC strings
//! (`$argon2id$v=19$m=...,t=...,p=...$<salt>$<hash>`). The registry core only
//! ever sees the encoded string.

use crate::error::{Error, Result};
use argon2::password_hash::{PasswordHasher, SaltString};
use argon2::Argon2;
use rand::rngs::OsRng;

/// Hash a secret with a fresh random salt and the default Argon2id cost.
pub fn hash_credential(secret: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::Credential(e.to_string()))
}
