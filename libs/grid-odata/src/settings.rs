//! Grid-side configuration consumed by the query builder.

use serde::{Deserialize, Serialize};

use crate::columns::ColumnMeta;
use crate::version::ODataVersion;

/// Init-time grid settings relevant to `OData` translation.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSettings {
    /// Column metadata, in grid column order.
    pub columns: Vec<ColumnMeta>,
    /// Whether the grid delegates paging, sorting and filtering to the
    /// service. A client-side grid fetches everything once; only `$select`
    /// and `$format` are emitted for it.
    pub server_side: bool,
    /// Protocol version of the target service; absent behaves as v4.
    pub version: Option<ODataVersion>,
    /// Fetch via JSONP for services on another origin.
    pub use_jsonp: bool,
}
