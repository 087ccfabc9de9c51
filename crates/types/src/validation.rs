//! Input validation for registry operations.
//!
//! Provides configurable validation for emails, names, and note content.
//! Used at the registry boundary before any write is attempted; reads are
//! never validated.

use std::fmt;

use crate::config::ValidationConfig;

/// Validation error with structured context.
///
/// Contains the specific constraint that was violated and the field name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// Description of the violated constraint.
    pub constraint: String,
}

impl ValidationError {
    fn new(field: &str, constraint: impl Into<String>) -> Self {
        Self { field: field.to_string(), constraint: constraint.into() }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

impl std::error::Error for ValidationError {}

/// Validates an email address.
///
/// Emails must:
/// - Be non-empty
/// - Not exceed `config.max_email_bytes` in UTF-8 byte length
/// - Contain exactly one `@` with a non-empty local part and domain
/// - Contain no whitespace
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first violated constraint.
pub fn validate_email(
    field: &str,
    email: &str,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if email.is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if email.len() > config.max_email_bytes {
        return Err(ValidationError::new(
            field,
            format!(
                "length {} bytes exceeds maximum {} bytes",
                email.len(),
                config.max_email_bytes
            ),
        ));
    }
    if email.chars().any(char::is_whitespace) {
        return Err(ValidationError::new(field, "must not contain whitespace"));
    }
    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::new(field, "must contain '@'"));
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return Err(ValidationError::new(field, "must have the form local@domain"));
    }
    Ok(())
}

/// Validates a short name-like field (first name, faculty, asset name, ...).
///
/// Names must be non-empty and not exceed `config.max_name_bytes`.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first violated constraint.
pub fn validate_name(
    field: &str,
    value: &str,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new(field, "must not be empty"));
    }
    if value.len() > config.max_name_bytes {
        return Err(ValidationError::new(
            field,
            format!(
                "length {} bytes exceeds maximum {} bytes",
                value.len(),
                config.max_name_bytes
            ),
        ));
    }
    Ok(())
}

/// Validates free-text note content.
///
/// Content must be non-empty and not exceed `config.max_note_bytes`.
///
/// # Errors
///
/// Returns [`ValidationError`] naming the first violated constraint.
pub fn validate_note_content(
    content: &str,
    config: &ValidationConfig,
) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::new("content", "must not be empty"));
    }
    if content.len() > config.max_note_bytes {
        return Err(ValidationError::new(
            "content",
            format!(
                "length {} bytes exceeds maximum {} bytes",
                content.len(),
                config.max_note_bytes
            ),
        ));
    }
    Ok(())
}
