//! Input validation and sanitizing for form submissions.

use crate::server::error::AppError;

pub const MIN_PASSWORD_LENGTH: usize = 8;
const MAX_FIELD_LENGTH: usize = 255;
const MAX_MESSAGE_LENGTH: usize = 5000;

/// Checks the `local@domain.tld` shape: no whitespace, exactly one `@`, and a dot
/// with text on both sides somewhere in the domain.
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    if local.is_empty() || domain.contains('@') {
        return false;
    }

    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Trims, lowercases and validates an email address.
pub fn normalize_email(email: &str) -> Result<String, AppError> {
    let email = email.trim().to_lowercase();

    if !is_valid_email(&email) {
        return Err(AppError::BadRequest("Invalid email address".to_string()));
    }

    Ok(email)
}

/// Trims, strips angle brackets and caps a single-line text field at 255 characters.
pub fn sanitize_text(value: &str) -> String {
    sanitize(value, MAX_FIELD_LENGTH)
}

/// Like `sanitize_text` but allows longer free-form text.
pub fn sanitize_message(value: &str) -> String {
    sanitize(value, MAX_MESSAGE_LENGTH)
}

fn sanitize(value: &str, max_chars: usize) -> String {
    value
        .trim()
        .chars()
        .filter(|c| *c != '<' && *c != '>')
        .take(max_chars)
        .collect::<String>()
        .trim_end()
        .to_string()
}

/// Sanitizes a required field, failing with `BadRequest` when nothing is left.
pub fn required_text(field: &str, value: &str) -> Result<String, AppError> {
    let value = sanitize_text(value);

    if value.is_empty() {
        return Err(AppError::BadRequest(format!("{} is required", field)));
    }

    Ok(value)
}

pub fn validate_password(password: &str) -> Result<(), AppError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(AppError::BadRequest(format!(
            "Password must be at least {} characters",
            MIN_PASSWORD_LENGTH
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_ordinary_addresses() {
        assert!(is_valid_email("info@gard018.com"));
        assert!(is_valid_email("a.b+c@mail.example.rs"));
    }

    #[test]
    fn rejects_malformed_addresses() {
        for email in [
            "",
            "plain",
            "@gard018.com",
            "info@",
            "info@gard018",
            "info@.com",
            "info@gard018.",
            "in fo@gard018.com",
            "a@b@c.com",
        ] {
            assert!(!is_valid_email(email), "accepted {email:?}");
        }
    }

    #[test]
    fn normalizes_case_and_whitespace() {
        assert_eq!(
            normalize_email("  Info@GARD018.com ").unwrap(),
            "info@gard018.com"
        );
    }

    #[test]
    fn strips_markup_characters_and_caps_length() {
        assert_eq!(sanitize_text("  <b>Ana</b> "), "bAna/b");
        assert_eq!(sanitize_text(&"x".repeat(300)).len(), 255);
    }

    #[test]
    fn required_text_rejects_blank() {
        assert!(required_text("Name", "  <> ").is_err());
        assert_eq!(required_text("Name", " Ana ").unwrap(), "Ana");
    }

    #[test]
    fn enforces_minimum_password_length() {
        assert!(validate_password("short").is_err());
        assert!(validate_password("longenough").is_ok());
    }
}
