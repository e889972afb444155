//! JSONP response unwrapping.
//!
//! A cross-domain fetch asks the service to wrap its JSON payload in a
//! callback invocation: `odatatable_3({...});`. The callback name was
//! generated on the query side and travels with it, so a response can be
//! rejected when it answers some other request's callback.

use crate::error::ClientError;

/// Strip the `<callback>( ... )` wrapper and return the inner JSON text.
///
/// # Errors
///
/// Returns [`ClientError::Jsonp`] when the body does not start with the
/// expected callback name or is not a single well-formed invocation.
pub fn unwrap_jsonp<'a>(body: &'a str, callback: &str) -> Result<&'a str, ClientError> {
    let body = body.trim();
    let rest = body.strip_prefix(callback).ok_or_else(|| {
        ClientError::Jsonp(format!("response does not invoke callback {callback:?}"))
    })?;
    let rest = rest
        .trim_start()
        .strip_prefix('(')
        .ok_or_else(|| ClientError::Jsonp("missing opening parenthesis".to_owned()))?;
    let rest = rest.trim_end().trim_end_matches(';').trim_end();
    let inner = rest
        .strip_suffix(')')
        .ok_or_else(|| ClientError::Jsonp("missing closing parenthesis".to_owned()))?;
    Ok(inner.trim())
}
