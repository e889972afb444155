#![cfg_attr(coverage_nightly, feature(coverage_attribute))]
//! Grid server-side processing to `OData` query translation.
//!
//! A data grid running in server-side processing mode posts its paging,
//! sorting and search state on every fetch and expects back a row page with
//! total counts. This crate translates between that contract and the `OData`
//! v2/v3/v4 query convention:
//!
//! - [`GridRequest`] decodes the grid's flat parameter sequence once, at the
//!   boundary;
//! - [`build_query`] produces the outgoing parameter set (`$select`,
//!   `$filter`, `$orderby`, `$skip`, `$top`, `$count`/`$inlinecount`);
//! - [`normalize`] folds the version-dependent response payload back into
//!   the grid's expected [`GridPage`].
//!
//! The crate is pure translation: no I/O, no state across calls. The fetch
//! side (transport, JSONP correlation) lives in `grid-odata-client`.

pub mod columns;
pub mod query;
pub mod request;
pub mod response;
pub mod settings;
pub mod version;

mod error;
mod filter;

pub use columns::{ColumnKind, ColumnMeta, DataProp};
pub use error::Error;
pub use query::{ODataQueryParams, RESERVED_PARAMS, build_query};
pub use request::{GridRequest, SortSpec};
pub use response::{GridPage, PageWindow, normalize};
pub use settings::GridSettings;
pub use version::ODataVersion;

/// Sort direction of one grid sort key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum SortDir {
    #[serde(rename = "asc")]
    Asc,
    #[serde(rename = "desc")]
    Desc,
}

impl SortDir {
    /// Parse the grid's direction parameter. Anything other than the two
    /// known tokens means the direction was left unspecified.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "asc" => Some(SortDir::Asc),
            "desc" => Some(SortDir::Desc),
            _ => None,
        }
    }
}

impl std::fmt::Display for SortDir {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SortDir::Asc => write!(f, "asc"),
            SortDir::Desc => write!(f, "desc"),
        }
    }
}
