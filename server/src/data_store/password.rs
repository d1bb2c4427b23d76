//! Hashing of admin passwords with PBKDF2-HMAC-SHA256
//!
//! Hashes are stored as a single string `pbkdf2-sha256$<iterations>$<salt>$<hash>`, with salt and
//! hash in standard base64 encoding.

use base64::Engine;
use ring::rand::SecureRandom;
use std::num::NonZeroU32;

const SCHEME: &str = "pbkdf2-sha256";
const ITERATIONS: u32 = 100_000;
const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = ring::digest::SHA256_OUTPUT_LEN;

static ALGORITHM: ring::pbkdf2::Algorithm = ring::pbkdf2::PBKDF2_HMAC_SHA256;

#[derive(Debug)]
pub struct PasswordHashError;

impl std::fmt::Display for PasswordHashError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Could not generate random salt for password hash")
    }
}

impl std::error::Error for PasswordHashError {}

/// Create a new salted hash of the password
pub fn hash_password(password: &str) -> Result<String, PasswordHashError> {
    let mut salt = [0u8; SALT_LENGTH];
    ring::rand::SystemRandom::new()
        .fill(&mut salt)
        .map_err(|_| PasswordHashError)?;
    Ok(hash_with_salt(password, &salt, ITERATIONS))
}

fn hash_with_salt(password: &str, salt: &[u8], iterations: u32) -> String {
    let engine = base64::engine::general_purpose::STANDARD;
    let mut hash = [0u8; HASH_LENGTH];
    let iterations_nonzero = NonZeroU32::new(iterations).unwrap_or(NonZeroU32::MIN);
    ring::pbkdf2::derive(
        ALGORITHM,
        iterations_nonzero,
        salt,
        password.as_bytes(),
        &mut hash,
    );
    format!(
        "{}${}${}${}",
        SCHEME,
        iterations_nonzero,
        engine.encode(salt),
        engine.encode(hash)
    )
}

/// Check the password against a hash created by [hash_password].
///
/// Malformed hashes never match.
pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let engine = base64::engine::general_purpose::STANDARD;
    let parts: Vec<&str> = password_hash.split('$').collect();
    let [scheme, iterations, salt, hash] = parts[..] else {
        return false;
    };
    if scheme != SCHEME {
        return false;
    }
    let Some(iterations) = iterations.parse::<u32>().ok().and_then(NonZeroU32::new) else {
        return false;
    };
    let (Ok(salt), Ok(hash)) = (engine.decode(salt), engine.decode(hash)) else {
        return false;
    };
    ring::pbkdf2::verify(ALGORITHM, iterations, &salt, password.as_bytes(), &hash).is_ok()
}
