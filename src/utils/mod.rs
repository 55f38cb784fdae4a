// Utility functions

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::types::*;

/// Characters left as-is when encoding a URI component:
/// `A-Z a-z 0-9 - _ . ! ~ * ' ( )`
const URI_COMPONENT_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Percent-encode a value for use as a single path segment
pub fn encode_uri_component(value: &str) -> String {
    utf8_percent_encode(value, URI_COMPONENT_ENCODE_SET).to_string()
}

/// Build `{prefix}/{id}{suffix}` with the id percent-encoded
pub fn resource_path(prefix: &str, id: &str, suffix: &str) -> String {
    format!("{}/{}{}", prefix.trim_end_matches('/'), encode_uri_component(id), suffix)
}

/// Validates a value against a constraint and returns an error if it fails
pub fn validate<T, F>(
    value: T,
    constraint: F,
    error_message: impl Into<String>,
) -> RestResult<T>
where
    F: FnOnce(&T) -> bool,
{
    if constraint(&value) {
        Ok(value)
    } else {
        Err(RestError::InvalidParameter(error_message.into()))
    }
}
