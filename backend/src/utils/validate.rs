use crate::constants::{
    MAX_SKILL_DESCRIPTION_LEN, MAX_SKILL_TITLE_LEN, MIN_NAME_LEN, MIN_PASSWORD_LEN,
};
use crate::error::{ApiError, FieldError};
use once_cell::sync::Lazy;
use regex::Regex;

static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"));

/// Trims and lowercases an email address for storage and lookup.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

pub fn is_valid_email(email: &str) -> bool {
    EMAIL_RE.is_match(email)
}

pub fn check_name(name: &str, errors: &mut Vec<FieldError>) {
    if name.trim().chars().count() < MIN_NAME_LEN {
        errors.push(FieldError::new(
            "name",
            format!("Name must be at least {MIN_NAME_LEN} characters"),
        ));
    }
}

pub fn check_email(email: &str, errors: &mut Vec<FieldError>) {
    if !is_valid_email(email) {
        errors.push(FieldError::new("email", "Please enter a valid email"));
    }
}

pub fn check_password(password: &str, errors: &mut Vec<FieldError>) {
    if password.chars().count() < MIN_PASSWORD_LEN {
        errors.push(FieldError::new(
            "password",
            format!("Password must be at least {MIN_PASSWORD_LEN} characters"),
        ));
    }
}

pub fn check_skill_title(title: &str, errors: &mut Vec<FieldError>) {
    let trimmed = title.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new("title", "Please add a skill title"));
    } else if trimmed.chars().count() > MAX_SKILL_TITLE_LEN {
        errors.push(FieldError::new(
            "title",
            format!("Title cannot be more than {MAX_SKILL_TITLE_LEN} characters"),
        ));
    }
}

pub fn check_skill_description(description: &str, errors: &mut Vec<FieldError>) {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        errors.push(FieldError::new("description", "Please add a description"));
    } else if trimmed.chars().count() > MAX_SKILL_DESCRIPTION_LEN {
        errors.push(FieldError::new(
            "description",
            format!("Description cannot be more than {MAX_SKILL_DESCRIPTION_LEN} characters"),
        ));
    }
}

/// Turns collected field errors into an `ApiError`, or passes if none.
pub fn finish(errors: Vec<FieldError>) -> Result<(), ApiError> {
    if errors.is_empty() {
        Ok(())
    } else {
        Err(ApiError::Validation(errors))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_regex_accepts_plain_addresses() {
        assert!(is_valid_email("ana@example.com"));
        assert!(is_valid_email("a.b+c@sub.domain.io"));
    }

    #[test]
    fn email_regex_rejects_garbage() {
        assert!(!is_valid_email("not-an-email"));
        assert!(!is_valid_email("a b@example.com"));
        assert!(!is_valid_email("hi@nodot"));
    }

    #[test]
    fn normalize_email_lowercases_and_trims() {
        assert_eq!(normalize_email("  Ana@Example.COM "), "ana@example.com");
    }

    #[test]
    fn name_and_password_rules() {
        let mut errors = Vec::new();
        check_name("A", &mut errors);
        check_password("short", &mut errors);
        assert_eq!(errors.len(), 2);
        assert!(finish(errors).is_err());

        let mut ok = Vec::new();
        check_name("Ana", &mut ok);
        check_password("secret1", &mut ok);
        assert!(finish(ok).is_ok());
    }
}
