//! Synchronous field validation for the auth forms. The full error map is
//! recomputed on every submit attempt; a non-empty map blocks submission.

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

/// Field name → message, ordered for stable display.
pub type FieldErrors = BTreeMap<&'static str, &'static str>;

fn email_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\S+@\S+\.\S+$").expect("email pattern"))
}

pub fn validate_login(email: &str, password: &str) -> FieldErrors {
    let mut errors = FieldErrors::new();
    if !email_re().is_match(email.trim()) {
        errors.insert("email", "Valid email required");
    }
    if password.is_empty() {
        errors.insert("password", "Password is required");
    }
    errors
}

pub fn validate_signup(
    name: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> FieldErrors {
    let mut errors = FieldErrors::new();
    let name = name.trim();
    if name.is_empty() {
        errors.insert("name", "Name is required");
    } else if name.chars().count() < 2 {
        errors.insert("name", "Min 2 chars");
    }
    if !email_re().is_match(email.trim()) {
        errors.insert("email", "Valid email required");
    }
    if password.chars().count() < 8 {
        errors.insert("password", "Min 8 chars");
    }
    if password != confirm_password {
        errors.insert("confirmPassword", "Passwords must match");
    }
    errors
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_accepts_plausible_email_and_password() {
        assert!(validate_login("cook@example.com", "hunter2").is_empty());
    }

    #[test]
    fn login_rejects_bad_email_and_blank_password() {
        let errors = validate_login("not-an-email", "");
        assert_eq!(errors.get("email"), Some(&"Valid email required"));
        assert_eq!(errors.get("password"), Some(&"Password is required"));
    }

    #[test]
    fn signup_enforces_lengths_and_confirmation() {
        let errors = validate_signup("A", "a@b.c", "short", "different");
        assert_eq!(errors.get("name"), Some(&"Min 2 chars"));
        assert!(errors.get("email").is_none());
        assert_eq!(errors.get("password"), Some(&"Min 8 chars"));
        assert_eq!(errors.get("confirmPassword"), Some(&"Passwords must match"));
    }

    #[test]
    fn signup_passes_with_valid_input() {
        assert!(validate_signup("Ada", "ada@example.com", "longenough", "longenough").is_empty());
    }
}
