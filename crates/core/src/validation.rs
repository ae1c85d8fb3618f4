//! Form-level input rules for categories, images and signup.
//!
//! Each validator trims surrounding whitespace and returns the cleaned value,
//! so handlers persist exactly what was checked.

use crate::error::CoreError;

/// Maximum category name length (characters).
pub const CATEGORY_NAME_MAX_LEN: usize = 50;

/// Maximum image title length (characters).
pub const IMAGE_TITLE_MAX_LEN: usize = 120;

/// Maximum username length (characters).
pub const USERNAME_MAX_LEN: usize = 150;

/// Minimum password length enforced at signup.
pub const MIN_PASSWORD_LENGTH: usize = 8;

/// Returned when a referenced category id does not exist.
pub const INVALID_CATEGORY_CHOICE: &str =
    "Select a valid choice. That choice is not one of the available choices.";

fn required_text(field: &str, value: &str, max_len: usize) -> Result<String, CoreError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CoreError::Validation(format!("{field} is required")));
    }
    let len = trimmed.chars().count();
    if len > max_len {
        return Err(CoreError::Validation(format!(
            "{field} must be at most {max_len} characters (it has {len})"
        )));
    }
    Ok(trimmed.to_string())
}

pub fn validate_category_name(name: &str) -> Result<String, CoreError> {
    required_text("Category name", name, CATEGORY_NAME_MAX_LEN)
}

pub fn validate_image_title(title: &str) -> Result<String, CoreError> {
    required_text("Title", title, IMAGE_TITLE_MAX_LEN)
}

/// Letters, digits and `@ . + - _` only.
pub fn validate_username(username: &str) -> Result<String, CoreError> {
    let username = required_text("Username", username, USERNAME_MAX_LEN)?;
    let ok = username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'));
    if !ok {
        return Err(CoreError::Validation(
            "Enter a valid username. This value may contain only letters, numbers, \
             and @/./+/-/_ characters."
                .into(),
        ));
    }
    Ok(username)
}

/// Check the password/confirmation pair submitted at signup.
pub fn validate_signup_passwords(password1: &str, password2: &str) -> Result<(), CoreError> {
    if password1 != password2 {
        return Err(CoreError::Validation(
            "The two password fields didn't match.".into(),
        ));
    }
    validate_password_strength(password1, MIN_PASSWORD_LENGTH)
}

/// Minimum length, and not made of digits alone.
pub fn validate_password_strength(password: &str, min_length: usize) -> Result<(), CoreError> {
    if password.chars().count() < min_length {
        return Err(CoreError::Validation(format!(
            "This password is too short. It must contain at least {min_length} characters."
        )));
    }
    if password.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::Validation(
            "This password is entirely numeric.".into(),
        ));
    }
    Ok(())
}

/// Parse an optional id sent as text (query string or multipart field).
///
/// Blank means "none"; anything else must be an integer.
pub fn parse_optional_id(field: &str, raw: Option<&str>) -> Result<Option<i64>, CoreError> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| CoreError::Validation(format!("{field} must be an integer id"))),
    }
}
