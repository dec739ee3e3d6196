//! # Identifier Sanitizer
//!
//! Normalizes free-text input (object and field names typed by a user) into
//! a machine identifier made of `[a-z0-9_]`.
//!
//! ## Rules
//!
//! 1. Trim surrounding whitespace and lowercase.
//! 2. Collapse every run of characters outside `[a-z0-9_]` into one `_`.
//!    A run at the very end of the input is dropped instead.
//! 3. Strip leading characters that are not a letter or `_`.
//! 4. Truncate to [`MAX_IDENTIFIER_LENGTH`] characters.
//! 5. Drop any character still outside `[a-z0-9_]`.
//! 6. Fail with [`ModelerError::InvalidIdentifier`] if nothing is left.

use crate::ModelerError;
use crate::primitives::MAX_IDENTIFIER_LENGTH;

fn is_allowed(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_'
}

fn is_leading_allowed(c: char) -> bool {
    c.is_ascii_lowercase() || c == '_'
}

/// Sanitize raw text into an identifier.
///
/// # Examples
///
/// ```
/// use modeler_core::sanitize_identifier;
///
/// assert_eq!(sanitize_identifier("Hello World!").unwrap(), "hello_world");
/// assert_eq!(sanitize_identifier("123abc").unwrap(), "abc");
/// assert!(sanitize_identifier("!!!").is_err());
/// ```
pub fn sanitize_identifier(raw: &str) -> Result<String, ModelerError> {
    let lowered = raw.trim().to_lowercase();

    let mut collapsed = String::with_capacity(lowered.len());
    let mut pending_separator = false;
    for c in lowered.chars() {
        if is_allowed(c) {
            if pending_separator {
                collapsed.push('_');
                pending_separator = false;
            }
            collapsed.push(c);
        } else {
            pending_separator = true;
        }
    }

    let stripped = collapsed.trim_start_matches(|c: char| !is_leading_allowed(c));

    let identifier: String = stripped
        .chars()
        .take(MAX_IDENTIFIER_LENGTH)
        .filter(|&c| is_allowed(c))
        .collect();

    if identifier.is_empty() {
        return Err(ModelerError::InvalidIdentifier {
            input: raw.to_string(),
        });
    }
    Ok(identifier)
}

/// Check whether `s` is already a valid identifier, without transforming it.
#[must_use]
pub fn is_valid_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) if is_leading_allowed(first) => {}
        _ => return false,
    }
    s.chars().count() <= MAX_IDENTIFIER_LENGTH && chars.all(is_allowed)
}

// =============================================================================
// TESTS
// =============================================================================
