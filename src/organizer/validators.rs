//! Field validation and normalization shared by the record types.
//!
//! Every function here is pure: it either returns the canonical form of its
//! input or a [`OrganizerError::Validation`] describing why the input was
//! rejected. Nothing is stored on failure.
//!
//! - [`validate_phone`]: digits, `+`, `-`, `(`, `)` and whitespace only
//! - [`validate_email`]: `local@domain.tld`, optionally wrapped as `Name <addr>`
//! - [`capitalize_name`]: `"jOHN "` → `"John"`
//! - [`normalize_text`]: `"O'Brien"` → `"obrien"`, the key used for lookups and search

use crate::error::{OrganizerError, Result};
use once_cell::sync::Lazy;
use regex::Regex;

static PHONE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d+\-()\s]+$").expect("valid phone regex"));
static EMAIL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("valid email regex"));

/// Accepts a phone number made only of digits, `+`, `-`, parentheses and
/// whitespace. The value is returned unchanged.
pub fn validate_phone(phone: &str) -> Result<String> {
    if !PHONE_RE.is_match(phone) {
        return Err(OrganizerError::validation(format!(
            "Invalid phone number format: '{}'",
            phone
        )));
    }
    Ok(phone.to_string())
}

/// Extracts the address part of display strings such as
/// `"John <john@example.com>"` and checks it has a local part, an `@` and a
/// dotted domain. No DNS or mailbox checks are made.
pub fn validate_email(email: &str) -> Result<String> {
    let address = extract_address(email);
    if !EMAIL_RE.is_match(address) {
        return Err(OrganizerError::validation(format!(
            "Invalid email format: '{}'",
            email
        )));
    }
    Ok(address.to_string())
}

fn extract_address(raw: &str) -> &str {
    let trimmed = raw.trim();
    match (trimmed.rfind('<'), trimmed.ends_with('>')) {
        (Some(start), true) => trimmed[start + 1..trimmed.len() - 1].trim(),
        _ => trimmed,
    }
}

/// Trims the name and capitalizes it: first character upper case, the rest
/// lower case. Blank names are rejected.
pub fn capitalize_name(name: &str) -> Result<String> {
    let trimmed = name.trim();
    let mut chars = trimmed.chars();
    let Some(first) = chars.next() else {
        return Err(OrganizerError::validation("Name cannot be empty."));
    };

    let mut result: String = first.to_uppercase().collect();
    result.extend(chars.flat_map(char::to_lowercase));
    Ok(result)
}

/// Lowercases and drops every non-alphanumeric character.
pub fn normalize_text(text: &str) -> String {
    text.chars()
        .flat_map(char::to_lowercase)
        .filter(|c| c.is_alphanumeric())
        .collect()
}

/// Trims an optional free-text field; blank input means "unset".
pub fn trimmed_or_none(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}
