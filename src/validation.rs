//! Local form validation.
//!
//! These checks run before any request is sent; a failing form never reaches
//! the backend.

use std::path::Path;

use thiserror::Error;

/// Minimum password length.
pub const MIN_PASSWORD_LENGTH: usize = 6;

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Password is too short.
    #[error("password must be at least {MIN_PASSWORD_LENGTH} characters")]
    PasswordTooShort,

    /// Password lacks an uppercase letter.
    #[error("password must contain at least one uppercase letter")]
    PasswordNoUppercase,

    /// Password lacks a lowercase letter.
    #[error("password must contain at least one lowercase letter")]
    PasswordNoLowercase,

    /// Password lacks a digit.
    #[error("password must contain at least one number")]
    PasswordNoDigit,

    /// A required form field is empty.
    #[error("please fill in every field")]
    MissingFields,

    /// New password and confirmation differ.
    #[error("the new passwords do not match")]
    PasswordMismatch,

    /// New password equals the current one.
    #[error("the new password must be different from the current one")]
    PasswordUnchanged,

    /// Folder name is blank.
    #[error("folder name is required")]
    FolderNameRequired,

    /// Upload form is incomplete.
    #[error("name, description, folder and file are all required")]
    UploadIncomplete,
}

/// Validate a password against the account password rules.
///
/// Rules are checked in order and the first failure is reported:
/// - At least 6 characters
/// - At least one uppercase letter
/// - At least one lowercase letter
/// - At least one ASCII digit
///
/// # Examples
///
/// ```
/// use docdesk::validation::validate_password;
///
/// assert!(validate_password("Secret1").is_ok());
/// assert!(validate_password("secret1").is_err()); // no uppercase
/// ```
pub fn validate_password(password: &str) -> Result<(), ValidationError> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::PasswordTooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Err(ValidationError::PasswordNoUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Err(ValidationError::PasswordNoLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Err(ValidationError::PasswordNoDigit);
    }
    Ok(())
}

/// Validate the change-password form.
pub fn validate_password_change(
    current: &str,
    new: &str,
    confirm: &str,
) -> Result<(), ValidationError> {
    if current.is_empty() || new.is_empty() || confirm.is_empty() {
        return Err(ValidationError::MissingFields);
    }
    if new != confirm {
        return Err(ValidationError::PasswordMismatch);
    }
    if current == new {
        return Err(ValidationError::PasswordUnchanged);
    }
    validate_password(new)
}

/// Validate and normalize a folder name.
pub fn validate_folder_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::FolderNameRequired);
    }
    Ok(trimmed.to_string())
}

/// Validate the upload form fields.
pub fn validate_upload(
    name: &str,
    description: &str,
    folder_id: &str,
    file: Option<&Path>,
) -> Result<(), ValidationError> {
    if name.trim().is_empty()
        || description.trim().is_empty()
        || folder_id.trim().is_empty()
        || file.is_none()
    {
        return Err(ValidationError::UploadIncomplete);
    }
    Ok(())
}

/// Lowercased extension of a file name, if any.
fn extension(file_name: &str) -> Option<String> {
    Path::new(file_name)
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
}

/// Default description for an uploaded file, derived from its extension.
pub fn auto_description(file_name: &str) -> String {
    match extension(file_name).as_deref() {
        Some("pdf") => "PDF document".to_string(),
        Some("doc" | "docx") => "Word document".to_string(),
        Some("xls" | "xlsx") => "Excel spreadsheet".to_string(),
        Some("ppt" | "pptx") => "PowerPoint presentation".to_string(),
        Some("jpg" | "jpeg" | "png") => "Image".to_string(),
        Some("txt") => "Text file".to_string(),
        Some(other) => format!("{} file", other.to_uppercase()),
        None => "Unknown file".to_string(),
    }
}

/// Default display name for an uploaded file: everything before the first dot.
pub fn stem_name(file_name: &str) -> String {
    let base = Path::new(file_name)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(file_name);
    base.split('.').next().unwrap_or(base).to_string()
}
