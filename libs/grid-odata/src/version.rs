//! Protocol version tables.
//!
//! Two things vary across `OData` protocol generations: the count directive
//! (`$inlinecount=allpages` before v4, `$count=true` from v4 on) and the
//! date literal syntax in `$filter`. Each rule is a single lookup keyed by
//! the version enum, so adding a version is a compile-checked edit rather
//! than a new branch in a conditional chain.

use chrono::{DateTime, SecondsFormat, Utc};

use crate::Error;

/// `OData` protocol version of the target service.
///
/// The enum is closed: configuration carrying any other number is rejected
/// at decode with [`Error::UnsupportedVersion`]. An *absent* version behaves
/// as [`ODataVersion::V4`] wherever a rule consults it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum ODataVersion {
    V2,
    V3,
    V4,
}

/// Which count parameter a query must carry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum CountDirective {
    /// `$count=true` (v4 and unspecified).
    Count,
    /// `$inlinecount=allpages` (v2/v3).
    InlineCount,
}

impl ODataVersion {
    pub(crate) fn count_directive(version: Option<Self>) -> CountDirective {
        match version {
            Some(Self::V2 | Self::V3) => CountDirective::InlineCount,
            Some(Self::V4) | None => CountDirective::Count,
        }
    }

    /// Render a date filter bound as this version's literal form.
    ///
    /// The instant itself renders identically everywhere (ISO-8601, UTC);
    /// only the wrapper differs.
    pub(crate) fn date_literal(version: Option<Self>, instant: DateTime<Utc>) -> String {
        let iso = instant.to_rfc3339_opts(SecondsFormat::Secs, true);
        match version {
            Some(Self::V2) => format!("DateTime'{iso}'"),
            Some(Self::V3) => format!("datetimeoffset'{iso}'"),
            Some(Self::V4) | None => iso,
        }
    }
}

impl TryFrom<u8> for ODataVersion {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self, Error> {
        match value {
            2 => Ok(Self::V2),
            3 => Ok(Self::V3),
            4 => Ok(Self::V4),
            other => Err(Error::UnsupportedVersion(other)),
        }
    }
}

impl From<ODataVersion> for u8 {
    fn from(version: ODataVersion) -> u8 {
        match version {
            ODataVersion::V2 => 2,
            ODataVersion::V3 => 3,
            ODataVersion::V4 => 4,
        }
    }
}
