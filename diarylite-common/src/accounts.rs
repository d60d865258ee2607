//! Account validation and password hashing
//!
//! Passwords are stored as SHA-256 over a per-user random salt followed by
//! the password, both hex encoded.

use rand::RngCore;
use serde::Deserialize;
use sha2::{Digest, Sha256};

pub const MAX_NAME_LENGTH: usize = 25;
pub const MAX_EMAIL_LENGTH: usize = 100;
pub const MIN_PASSWORD_LENGTH: usize = 8;

const SALT_BYTES: usize = 16;
const SESSION_TOKEN_BYTES: usize = 32;

/// Fields submitted on the registration form
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Registration {
    #[serde(default)]
    pub firstname: String,
    #[serde(default)]
    pub lastname: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub confirmation: String,
}

/// Salted password hash as stored in the users table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PasswordHash {
    pub hash: String,
    pub salt: String,
}

/// Validate a registration, returning the first problem found
///
/// Field lengths are checked before the password rules, matching the order
/// users see the fields on the form.
pub fn validate_registration(form: &Registration) -> Result<(), String> {
    if form.firstname.trim().is_empty() {
        return Err("Firstname is required.".to_string());
    }
    if form.firstname.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Firstname has a maximum length of {} characters.",
            MAX_NAME_LENGTH
        ));
    }
    if form.lastname.trim().is_empty() {
        return Err("Lastname is required.".to_string());
    }
    if form.lastname.chars().count() > MAX_NAME_LENGTH {
        return Err(format!(
            "Lastname has a maximum length of {} characters.",
            MAX_NAME_LENGTH
        ));
    }
    if form.email.trim().is_empty() {
        return Err("Email is required.".to_string());
    }
    if form.email.chars().count() > MAX_EMAIL_LENGTH {
        return Err(format!(
            "Email has a maximum length of {} characters.",
            MAX_EMAIL_LENGTH
        ));
    }

    validate_password(&form.password, &form.confirmation)
}

/// Password rules: length, confirmation, a digit, and mixed case
pub fn validate_password(password: &str, confirmation: &str) -> Result<(), String> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        ));
    }
    if password != confirmation {
        return Err("Passwords do not match".to_string());
    }
    if !password.chars().any(|c| c.is_numeric()) {
        return Err("Password must contain a number".to_string());
    }
    if !(password.chars().any(|c| c.is_lowercase()) && password.chars().any(|c| c.is_uppercase()))
    {
        return Err("Password must contain both uppercase and lowercase letters".to_string());
    }
    Ok(())
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str) -> PasswordHash {
    let mut salt = [0u8; SALT_BYTES];
    rand::thread_rng().fill_bytes(&mut salt);
    let salt = to_hex(&salt);
    let hash = salted_digest(&salt, password);
    PasswordHash { hash, salt }
}

/// Check a password against a stored hash and salt
pub fn verify_password(password: &str, hash: &str, salt: &str) -> bool {
    if hash.is_empty() {
        return false;
    }
    let calculated = salted_digest(salt, password);
    // Constant-time comparison
    calculated.len() == hash.len()
        && calculated
            .bytes()
            .zip(hash.bytes())
            .fold(0u8, |acc, (a, b)| acc | (a ^ b))
            == 0
}

/// Random opaque token identifying a login session
pub fn generate_session_token() -> String {
    let mut token = [0u8; SESSION_TOKEN_BYTES];
    rand::thread_rng().fill_bytes(&mut token);
    to_hex(&token)
}

fn salted_digest(salt: &str, password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(salt.as_bytes());
    hasher.update(password.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn to_hex(bytes: &[u8]) -> String {
    bytes.iter().map(|b| format!("{:02x}", b)).collect()
}
