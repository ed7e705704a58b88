//! CSRF token lookup.
//!
//! The forum renders the token into a hidden `csrfmiddlewaretoken` form
//! field on pages with forms, and always sets a `csrftoken` cookie.

use askvote_core::page_keys::CSRF_COOKIE;

/// Find the `csrftoken` value in a `document.cookie` style string.
pub fn token_from_cookie(cookie: &str) -> Option<&str> {
    cookie
        .split(';')
        .map(str::trim)
        .find_map(|entry| entry.strip_prefix(CSRF_COOKIE)?.strip_prefix('='))
        .filter(|token| !token.is_empty())
}

/// Resolve the token to send with a vote.
///
/// A form field, when the page has one, is authoritative: its value is
/// used even if the cookie holds a different one, and an empty field
/// means there is no token.
pub fn resolve_token(form_field: Option<&str>, cookie: &str) -> Option<String> {
    match form_field {
        Some(value) if value.is_empty() => None,
        Some(value) => Some(value.to_string()),
        None => token_from_cookie(cookie).map(str::to_string),
    }
}
