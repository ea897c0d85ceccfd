//! The structured-callback envelope.
//!
//! Callback buttons built by this framework carry their payload inside a
//! small envelope:
//!
//! ```text
//! <sentinel><unique>|<payload>
//! ```
//!
//! The sentinel is a reserved control byte marking the payload as
//! application-generated; callback data set by other producers will not start
//! with it and is treated as opaque. The unique identifier selects a handler
//! registered under `<sentinel><unique>`; the payload is arbitrary text.
//!
//! Like the command grammar, a non-match is never an error: the callback
//! simply falls through to the generic callback category, untouched.

use lazy_regex::regex_captures;

/// Reserved byte marking a structured callback payload.
pub const CALLBACK_SENTINEL: char = '\u{000C}';

/// A decoded structured-callback envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedCallback {
    /// Endpoint identifier (word characters and dashes).
    pub unique: String,
    /// Bare payload with the envelope stripped; empty when absent.
    pub payload: String,
}

/// Decodes a structured callback, if `data` carries the envelope.
pub fn parse(data: &str) -> Option<ParsedCallback> {
    let (_, unique, payload) = regex_captures!(r"^\x0c([-\w]+)(?:\|(.+))?$", data)?;
    Some(ParsedCallback {
        unique: unique.to_string(),
        payload: payload.to_string(),
    })
}

/// The registry key for a structured-callback endpoint.
pub fn endpoint_key(unique: &str) -> String {
    format!("{CALLBACK_SENTINEL}{unique}")
}

/// Builds the wire form of a structured callback, for keyboard producers.
///
/// The inverse of [`parse`]: `parse(&encode(u, p))` yields `u` and `p` back
/// for any non-empty single-line payload.
pub fn encode(unique: &str, payload: &str) -> String {
    if payload.is_empty() {
        endpoint_key(unique)
    } else {
        format!("{CALLBACK_SENTINEL}{unique}|{payload}")
    }
}
