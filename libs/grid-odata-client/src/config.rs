//! Caller pass-through transport options.

use serde::{Deserialize, Serialize};

use grid_odata::RESERVED_PARAMS;

/// Request headers the fetch flow owns; pass-through headers never override
/// them. `Accept` fixes the negotiated format, and the cache headers keep
/// every fetch fresh — the grid re-queries on each page turn and a cached
/// page would show stale rows behind a live pager.
pub const RESERVED_HEADERS: &[&str] = &["accept", "cache-control", "pragma"];

/// Opaque caller extensions merged into each outgoing request.
///
/// Collisions with builder-owned query parameters ([`RESERVED_PARAMS`]) or
/// fetch-owned headers ([`RESERVED_HEADERS`]) lose: the colliding entry is
/// dropped with a warning rather than silently rewriting what the
/// translation produced.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AjaxOptions {
    /// Extra request headers, name/value.
    pub headers: Vec<(String, String)>,
    /// Extra query parameters, name/value.
    pub query: Vec<(String, String)>,
}

impl AjaxOptions {
    /// The caller's extra query parameters minus collisions with
    /// builder-owned names.
    pub(crate) fn query_extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.query.iter().filter_map(|(name, value)| {
            if RESERVED_PARAMS.contains(&name.as_str()) {
                tracing::warn!(param = %name, "pass-through query parameter collides with a builder-owned parameter; dropped");
                None
            } else {
                Some((name.as_str(), value.as_str()))
            }
        })
    }

    /// The caller's extra headers minus collisions with fetch-owned names.
    pub(crate) fn header_extras(&self) -> impl Iterator<Item = (&str, &str)> {
        self.headers.iter().filter_map(|(name, value)| {
            if RESERVED_HEADERS.contains(&name.to_ascii_lowercase().as_str()) {
                tracing::warn!(header = %name, "pass-through header collides with a fetch-owned header; dropped");
                None
            } else {
                Some((name.as_str(), value.as_str()))
            }
        })
    }
}
