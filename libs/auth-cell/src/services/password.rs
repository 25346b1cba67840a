use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use tracing::instrument;

pub const MIN_PASSWORD_LENGTH: usize = 6;

pub struct PasswordService;

impl PasswordService {
    #[instrument(skip(password))]
    pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let argon2 = Argon2::default();

        let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    #[instrument(skip(password, hash))]
    pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        let argon2 = Argon2::default();

        match argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Returns one message per failed rule; empty when the password is acceptable.
    pub fn policy_violations(password: &str) -> Vec<String> {
        let mut issues = Vec::new();

        if password.chars().count() < MIN_PASSWORD_LENGTH {
            issues.push(format!(
                "Passwords must be at least {} characters.",
                MIN_PASSWORD_LENGTH
            ));
        }

        if !password.chars().any(|c| c.is_ascii_digit()) {
            issues.push("Passwords must have at least one digit ('0'-'9').".to_string());
        }

        if !password.chars().any(|c| c.is_lowercase()) {
            issues.push("Passwords must have at least one lowercase ('a'-'z').".to_string());
        }

        if !password.chars().any(|c| c.is_uppercase()) {
            issues.push("Passwords must have at least one uppercase ('A'-'Z').".to_string());
        }

        if password.chars().all(|c| c.is_alphanumeric()) {
            issues.push("Passwords must have at least one non alphanumeric character.".to_string());
        }

        issues
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let hash = PasswordService::hash_password("Secret#1").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(PasswordService::verify_password("Secret#1", &hash).unwrap());
        assert!(!PasswordService::verify_password("secret#1", &hash).unwrap());
    }

    #[test]
    fn malformed_hash_is_an_error() {
        assert!(PasswordService::verify_password("Secret#1", "plain-text").is_err());
    }

    #[test]
    fn strong_password_passes_policy() {
        assert!(PasswordService::policy_violations("Clinic#2025").is_empty());
    }

    #[test]
    fn reports_every_failed_rule() {
        let issues = PasswordService::policy_violations("abc");
        assert_eq!(issues.len(), 4);
        assert!(issues[0].contains("at least 6 characters"));

        let issues = PasswordService::policy_violations("abcdefG1");
        assert_eq!(issues, vec!["Passwords must have at least one non alphanumeric character."]);
    }
}
