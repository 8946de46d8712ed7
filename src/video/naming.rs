//! Stored-name generation for uploaded videos.
//!
//! Stored names have the form `<unix-millis>-<token>-<original>`, where the
//! token is 8 random hex characters and `<original>` is the sanitized
//! client-declared filename.

use chrono::Utc;
use uuid::Uuid;

use super::MAX_ORIGINAL_NAME_LENGTH;

/// Name used when nothing usable is left after sanitizing.
const FALLBACK_NAME: &str = "video";

/// Generate a stored name for an upload.
pub fn generate_stored_name(original_name: &str) -> String {
    let millis = Utc::now().timestamp_millis();
    let token = Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        millis,
        &token[..8],
        sanitize_original_name(original_name)
    )
}

/// Make a client-declared filename safe to use as a path component.
///
/// Keeps only the final path component, replaces anything outside
/// `[A-Za-z0-9._-]` with `_`, strips leading dots and truncates to
/// [`MAX_ORIGINAL_NAME_LENGTH`] characters.
pub fn sanitize_original_name(original_name: &str) -> String {
    let base = original_name
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or_default();

    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    let trimmed: String = cleaned
        .trim_start_matches('.')
        .chars()
        .take(MAX_ORIGINAL_NAME_LENGTH)
        .collect();

    if trimmed.is_empty() {
        FALLBACK_NAME.to_string()
    } else {
        trimmed
    }
}
