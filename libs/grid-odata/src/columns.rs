//! Column metadata and `OData` field-name resolution.

use serde::{Deserialize, Serialize};

/// Filter strategy for a column.
///
/// String-ish columns take substring predicates; date and numeric columns
/// take `low~high` range filters. Columns without a declared kind are never
/// filtered.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnKind {
    String,
    Html,
    Date,
    Numeric,
}

/// Row-data accessor for a column: a property name, or an array index when
/// the grid feeds on row arrays. Only the textual form can name an `OData`
/// field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DataProp {
    Index(u32),
    Name(String),
}

/// Grid column metadata, as supplied by the grid's initialization settings.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMeta {
    /// Explicit `OData` field name override.
    pub field_name: Option<String>,
    /// Fallback field identifier.
    pub data_prop: Option<DataProp>,
    /// Last-resort fallback label.
    pub title: Option<String>,
    pub searchable: bool,
    pub kind: Option<ColumnKind>,
}

impl Default for ColumnMeta {
    fn default() -> Self {
        Self {
            field_name: None,
            data_prop: None,
            title: None,
            searchable: true,
            kind: None,
        }
    }
}

impl ColumnMeta {
    /// Resolve the `OData` field name for this column.
    ///
    /// Candidates are tried in order: the explicit field name, the data
    /// property (when textual), the title. A candidate that is empty or
    /// whose entire string parses as a number cannot name a field and falls
    /// through to the next. A column resolving to nothing is a computed or
    /// display-only column: it is excluded from `$select` and from all
    /// filtering.
    #[must_use]
    pub fn resolve_field_name(&self) -> Option<&str> {
        let data_prop = match &self.data_prop {
            Some(DataProp::Name(name)) => Some(name.as_str()),
            Some(DataProp::Index(_)) | None => None,
        };
        [self.field_name.as_deref(), data_prop, self.title.as_deref()]
            .into_iter()
            .flatten()
            .find(|candidate| !candidate.is_empty() && !is_numeric(candidate))
    }
}

fn is_numeric(s: &str) -> bool {
    s.trim().parse::<f64>().is_ok()
}
