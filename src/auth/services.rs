use argon2::{
    password_hash::{self, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use lazy_static::lazy_static;
use rand::rngs::OsRng;
use regex::Regex;
use tracing::error;

use crate::error::AppError;

pub const EMAIL_MAX_LEN: usize = 180;
pub const NAME_MIN_LEN: usize = 2;
pub const NAME_MAX_LEN: usize = 255;
pub const PASSWORD_MIN_LEN: usize = 6;
pub const PASSWORD_MAX_LEN: usize = 4096;

lazy_static! {
    static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    static ref NAME_RE: Regex = Regex::new(r"^[a-zA-Z\s\-'.]+$").unwrap();
}

pub(crate) fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Checks an already normalized email address.
pub(crate) fn validate_email(email: &str) -> Result<(), String> {
    if email.is_empty() {
        return Err("Email is required".into());
    }
    if !EMAIL_RE.is_match(email) {
        return Err("Please enter a valid email address".into());
    }
    if email.chars().count() > EMAIL_MAX_LEN {
        return Err(format!(
            "Email cannot be longer than {EMAIL_MAX_LEN} characters"
        ));
    }
    Ok(())
}

pub(crate) fn validate_name(name: &str) -> Result<(), String> {
    let len = name.trim().chars().count();
    if len == 0 {
        return Err("Name is required".into());
    }
    if len < NAME_MIN_LEN {
        return Err(format!("Name must be at least {NAME_MIN_LEN} characters"));
    }
    if len > NAME_MAX_LEN {
        return Err(format!("Name cannot be longer than {NAME_MAX_LEN} characters"));
    }
    if !NAME_RE.is_match(name) {
        return Err(
            "Name can only contain letters, spaces, hyphens, apostrophes, and periods".into(),
        );
    }
    Ok(())
}

pub(crate) fn validate_password(password: &str) -> Result<(), String> {
    if password.is_empty() {
        return Err("Password is required".into());
    }
    let len = password.chars().count();
    if len < PASSWORD_MIN_LEN {
        return Err(format!(
            "Password must be at least {PASSWORD_MIN_LEN} characters"
        ));
    }
    if len > PASSWORD_MAX_LEN {
        return Err(format!(
            "Password should not exceed {PASSWORD_MAX_LEN} characters"
        ));
    }
    Ok(())
}

fn credential_failure(e: password_hash::Error, what: &'static str) -> AppError {
    error!(error = %e, "{what}");
    AppError::Internal(anyhow::anyhow!("{what}: {e}"))
}

/// Argon2id hash with a fresh salt, in PHC string form.
pub(crate) fn hash_password(plain: &str) -> Result<String, AppError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(plain.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| credential_failure(e, "password hashing failed"))
}

/// `Ok(false)` only for a wrong password. A stored hash that cannot be parsed
/// or checked is an internal error.
pub(crate) fn verify_password(plain: &str, stored: &str) -> Result<bool, AppError> {
    let parsed = PasswordHash::new(stored)
        .map_err(|e| credential_failure(e, "stored password hash is malformed"))?;
    match Argon2::default().verify_password(plain.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(password_hash::Error::Password) => Ok(false),
        Err(e) => Err(credential_failure(e, "password verification failed")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("ada@example.com", true)]
    #[case("not-an-email", false)]
    #[case("", false)]
    #[case("a b@example.com", false)]
    fn email_validation(#[case] email: &str, #[case] ok: bool) {
        assert_eq!(validate_email(email).is_ok(), ok);
    }

    #[test]
    fn email_length_is_capped() {
        let long = format!("{}@example.com", "a".repeat(180));
        assert!(validate_email(&long).is_err());
        assert_eq!(normalize_email("  Ada@Example.COM "), "ada@example.com");
    }

    #[rstest]
    #[case("Ada Lovelace", true)]
    #[case("Mary-Jane O'Neil Jr.", true)]
    #[case("A", false)]
    #[case("R2D2", false)]
    #[case("", false)]
    fn name_validation(#[case] name: &str, #[case] ok: bool) {
        assert_eq!(validate_name(name).is_ok(), ok);
    }

    #[test]
    fn password_minimum_length() {
        assert!(validate_password("12345").is_err());
        assert!(validate_password("123456").is_ok());
    }

    #[test]
    fn hash_is_salted() {
        let a = hash_password("password123").unwrap();
        let b = hash_password("password123").unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2"));
    }

    #[test]
    fn verify_accepts_only_the_original_password() {
        let hash = hash_password("correct-horse").unwrap();
        assert!(verify_password("correct-horse", &hash).unwrap());
        assert!(!verify_password("wrong-horse", &hash).unwrap());
    }

    #[test]
    fn malformed_stored_hash_is_internal() {
        let err = verify_password("anything", "not-a-valid-hash").unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }
}
