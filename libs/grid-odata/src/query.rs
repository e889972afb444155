//! Outgoing `OData` query assembly.

use rand::Rng;
use serde::Serialize;

use crate::Error;
use crate::columns::ColumnKind;
use crate::filter::{RangeKind, combine, range_predicates, substring_predicate};
use crate::request::GridRequest;
use crate::settings::GridSettings;
use crate::version::{CountDirective, ODataVersion};

/// Query parameter names owned by the builder. Caller-supplied pass-through
/// parameters never override these.
pub const RESERVED_PARAMS: &[&str] = &[
    "$format",
    "$select",
    "$filter",
    "$orderby",
    "$skip",
    "$top",
    "$count",
    "$inlinecount",
    "$callback",
];

/// The assembled `OData` query parameter set.
///
/// Serializes straight to the wire parameter names; unset parameters are
/// omitted entirely (an absent `$top` means "no limit", not `$top=`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ODataQueryParams {
    #[serde(rename = "$format")]
    pub format: &'static str,
    #[serde(rename = "$select", skip_serializing_if = "Option::is_none")]
    pub select: Option<String>,
    #[serde(rename = "$filter", skip_serializing_if = "Option::is_none")]
    pub filter: Option<String>,
    #[serde(rename = "$orderby", skip_serializing_if = "Option::is_none")]
    pub orderby: Option<String>,
    #[serde(rename = "$skip", skip_serializing_if = "Option::is_none")]
    pub skip: Option<u64>,
    #[serde(rename = "$top", skip_serializing_if = "Option::is_none")]
    pub top: Option<u64>,
    #[serde(rename = "$count", skip_serializing_if = "Option::is_none")]
    pub count: Option<bool>,
    #[serde(rename = "$inlinecount", skip_serializing_if = "Option::is_none")]
    pub inlinecount: Option<&'static str>,
    #[serde(rename = "$callback", skip_serializing_if = "Option::is_none")]
    pub callback: Option<String>,
}

impl Default for ODataQueryParams {
    fn default() -> Self {
        Self {
            format: "json",
            select: None,
            filter: None,
            orderby: None,
            skip: None,
            top: None,
            count: None,
            inlinecount: None,
            callback: None,
        }
    }
}

impl ODataQueryParams {
    /// The parameter set as name/value pairs, in emission order, for URL
    /// composition via `url::Url::query_pairs_mut` or similar.
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![("$format", self.format.to_owned())];
        if let Some(select) = &self.select {
            pairs.push(("$select", select.clone()));
        }
        if let Some(filter) = &self.filter {
            pairs.push(("$filter", filter.clone()));
        }
        if let Some(orderby) = &self.orderby {
            pairs.push(("$orderby", orderby.clone()));
        }
        if let Some(skip) = self.skip {
            pairs.push(("$skip", skip.to_string()));
        }
        if let Some(top) = self.top {
            pairs.push(("$top", top.to_string()));
        }
        if let Some(count) = self.count {
            pairs.push(("$count", count.to_string()));
        }
        if let Some(inlinecount) = self.inlinecount {
            pairs.push(("$inlinecount", inlinecount.to_owned()));
        }
        if let Some(callback) = &self.callback {
            pairs.push(("$callback", callback.clone()));
        }
        pairs
    }

    /// Render as a query string (`$format=json&$select=...`).
    ///
    /// # Errors
    ///
    /// Forwards `serde_urlencoded` serialization errors (none are reachable
    /// from this value shape in practice).
    pub fn to_query_string(&self) -> Result<String, serde_urlencoded::ser::Error> {
        serde_urlencoded::to_string(self)
    }
}

/// Build the outgoing `OData` query from decoded grid state.
///
/// `$format` and `$select` are always produced. Paging, count, filter and
/// sort parameters are emitted only when the grid runs with server-side
/// processing; a client-side grid fetches everything once and never asks
/// the service to page or filter.
///
/// # Errors
///
/// Returns [`Error::InvalidDateBound`] if a date column filter carries an
/// unparseable bound.
pub fn build_query(
    request: &GridRequest,
    settings: &GridSettings,
) -> Result<ODataQueryParams, Error> {
    let mut params = ODataQueryParams::default();

    if settings.use_jsonp {
        params.callback = Some(jsonp_callback_name(request, settings.server_side));
    }

    // Resolve every column once; selection and both filter passes share the
    // outcome.
    let resolved: Vec<Option<&str>> = settings
        .columns
        .iter()
        .enumerate()
        .map(|(index, column)| {
            let name = column.resolve_field_name();
            if name.is_none() {
                tracing::debug!(
                    index,
                    "column resolves to no usable field name; excluded from $select and $filter"
                );
            }
            name
        })
        .collect();

    let select: Vec<&str> = resolved.iter().copied().flatten().collect();
    if !select.is_empty() {
        params.select = Some(select.join(","));
    }

    if !settings.server_side {
        return Ok(params);
    }

    params.skip = Some(request.display_start);
    if let Ok(top) = u64::try_from(request.display_length) {
        params.top = Some(top);
    }

    match ODataVersion::count_directive(settings.version) {
        CountDirective::Count => params.count = Some(true),
        CountDirective::InlineCount => params.inlinecount = Some("allpages"),
    }

    params.filter = build_filter(request, settings, &resolved)?;
    params.orderby = build_orderby(request);

    tracing::debug!(
        filter = params.filter.as_deref(),
        orderby = params.orderby.as_deref(),
        skip = params.skip,
        top = params.top,
        "assembled OData query"
    );
    Ok(params)
}

fn build_filter(
    request: &GridRequest,
    settings: &GridSettings,
    resolved: &[Option<&str>],
) -> Result<Option<String>, Error> {
    let mut global = Vec::new();
    let mut column_predicates = Vec::new();

    for (index, (column, field)) in settings.columns.iter().zip(resolved).enumerate() {
        let Some(field) = field else { continue };
        if !column.searchable {
            continue;
        }

        let text_column = matches!(column.kind, Some(ColumnKind::String | ColumnKind::Html));
        if text_column && !request.search.is_empty() {
            global.push(substring_predicate(field, &request.search));
        }

        let Some(term) = request.column_search.get(&index) else {
            continue;
        };
        match column.kind {
            Some(ColumnKind::String | ColumnKind::Html) => {
                column_predicates.push(substring_predicate(field, term));
            }
            Some(ColumnKind::Date) => column_predicates.extend(range_predicates(
                field,
                RangeKind::Date,
                term,
                settings.version,
            )?),
            Some(ColumnKind::Numeric) => column_predicates.extend(range_predicates(
                field,
                RangeKind::Numeric,
                term,
                settings.version,
            )?),
            None => {}
        }
    }

    Ok(combine(&global, &column_predicates))
}

fn build_orderby(request: &GridRequest) -> Option<String> {
    let mut order = Vec::new();
    for key in &request.sort {
        let Some(field) = request.data_props.get(&key.column) else {
            tracing::debug!(column = key.column, "sort key has no data property; skipped");
            continue;
        };
        order.push(match key.dir {
            Some(dir) => format!("{field} {dir}"),
            None => field.clone(),
        });
    }
    (!order.is_empty()).then(|| order.join(","))
}

/// JSONP callback name for one fetch cycle.
///
/// Server-driven paging reuses the request's echo token, so a response can
/// be matched to the request that produced it. A one-shot load gets a
/// random load marker instead, keeping concurrent loads from colliding on
/// the same callback.
fn jsonp_callback_name(request: &GridRequest, server_side: bool) -> String {
    if server_side {
        format!("odatatable_{}", request.echo)
    } else {
        let marker: u32 = rand::rng().random_range(1..=1000);
        format!("odatatable_load_{marker}")
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;
    use crate::columns::{ColumnMeta, DataProp};
    use crate::request::SortSpec;

    fn text_column(name: &str) -> ColumnMeta {
        ColumnMeta {
            field_name: Some(name.to_owned()),
            kind: Some(ColumnKind::String),
            ..ColumnMeta::default()
        }
    }

    fn numeric_column(name: &str) -> ColumnMeta {
        ColumnMeta {
            field_name: Some(name.to_owned()),
            kind: Some(ColumnKind::Numeric),
            ..ColumnMeta::default()
        }
    }

    fn server_side(columns: Vec<ColumnMeta>) -> GridSettings {
        GridSettings {
            columns,
            server_side: true,
            ..GridSettings::default()
        }
    }

    #[test]
    fn test_select_joins_resolved_columns_in_order() {
        let settings = server_side(vec![
            text_column("Name"),
            ColumnMeta::default(), // unresolvable, skipped
            text_column("City"),
        ]);
        let params = build_query(&GridRequest::default(), &settings).unwrap();
        assert_eq!(params.select.as_deref(), Some("Name,City"));
    }

    #[test]
    fn test_no_resolvable_columns_omits_select() {
        let settings = server_side(vec![ColumnMeta::default()]);
        let params = build_query(&GridRequest::default(), &settings).unwrap();
        assert_eq!(params.select, None);
    }

    #[test]
    fn test_client_side_grid_emits_only_format_and_select() {
        let settings = GridSettings {
            columns: vec![text_column("Name")],
            server_side: false,
            ..GridSettings::default()
        };
        let request = GridRequest {
            display_start: 20,
            display_length: 10,
            search: "abc".to_owned(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(params.select.as_deref(), Some("Name"));
        assert_eq!(params.skip, None);
        assert_eq!(params.top, None);
        assert_eq!(params.count, None);
        assert_eq!(params.filter, None);
    }

    #[test]
    fn test_paging_parameters() {
        let request = GridRequest {
            display_start: 40,
            display_length: 20,
            ..GridRequest::default()
        };
        let params = build_query(&request, &server_side(vec![])).unwrap();
        assert_eq!(params.skip, Some(40));
        assert_eq!(params.top, Some(20));
    }

    #[test]
    fn test_fetch_all_omits_top_but_keeps_skip() {
        let request = GridRequest {
            display_start: 0,
            display_length: -1,
            ..GridRequest::default()
        };
        let params = build_query(&request, &server_side(vec![])).unwrap();
        assert_eq!(params.skip, Some(0));
        assert_eq!(params.top, None);
    }

    #[test]
    fn test_count_directive_per_version() {
        for version in [ODataVersion::V2, ODataVersion::V3] {
            let settings = GridSettings {
                version: Some(version),
                ..server_side(vec![])
            };
            let params = build_query(&GridRequest::default(), &settings).unwrap();
            assert_eq!(params.inlinecount, Some("allpages"));
            assert_eq!(params.count, None);
        }

        for version in [Some(ODataVersion::V4), None] {
            let settings = GridSettings {
                version,
                ..server_side(vec![])
            };
            let params = build_query(&GridRequest::default(), &settings).unwrap();
            assert_eq!(params.count, Some(true));
            assert_eq!(params.inlinecount, None);
        }
    }

    #[test]
    fn test_global_search_disjunction_over_text_columns() {
        let settings = server_side(vec![
            text_column("Name"),
            numeric_column("Price"), // never in the global filter
            text_column("City"),
        ]);
        let request = GridRequest {
            search: "abc".to_owned(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(
            params.filter.as_deref(),
            Some(
                "indexof(tolower(Name), 'abc') gt -1 or indexof(tolower(City), 'abc') gt -1"
            )
        );
    }

    #[test]
    fn test_global_search_skips_unsearchable_columns() {
        let mut hidden = text_column("Secret");
        hidden.searchable = false;
        let settings = server_side(vec![text_column("Name"), hidden]);
        let request = GridRequest {
            search: "abc".to_owned(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(
            params.filter.as_deref(),
            Some("indexof(tolower(Name), 'abc') gt -1")
        );
    }

    #[test]
    fn test_global_and_column_filters_combine() {
        let settings = server_side(vec![text_column("Name"), text_column("City")]);
        let request = GridRequest {
            search: "abc".to_owned(),
            column_search: [(1, "xyz".to_owned())].into(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(
            params.filter.as_deref(),
            Some(
                "( indexof(tolower(Name), 'abc') gt -1 or indexof(tolower(City), 'abc') gt -1 ) \
                 and ( indexof(tolower(City), 'xyz') gt -1 )"
            )
        );
    }

    #[test]
    fn test_numeric_column_range_filter() {
        let settings = server_side(vec![numeric_column("Price")]);
        let request = GridRequest {
            column_search: [(0, "10~20".to_owned())].into(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(
            params.filter.as_deref(),
            Some("(Price gt 10) and (Price lt 20)")
        );
    }

    #[test]
    fn test_untyped_column_contributes_no_filter() {
        let mut column = text_column("Name");
        column.kind = None;
        let settings = server_side(vec![column]);
        let request = GridRequest {
            search: "abc".to_owned(),
            column_search: [(0, "xyz".to_owned())].into(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(params.filter, None);
    }

    #[test]
    fn test_orderby_resolves_data_props_in_key_order() {
        let request = GridRequest {
            sort: vec![
                SortSpec {
                    column: 1,
                    dir: Some(crate::SortDir::Desc),
                },
                SortSpec {
                    column: 0,
                    dir: Some(crate::SortDir::Asc),
                },
            ],
            data_props: [(0, "Name".to_owned()), (1, "Price".to_owned())].into(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &server_side(vec![])).unwrap();
        assert_eq!(params.orderby.as_deref(), Some("Price desc,Name asc"));
    }

    #[test]
    fn test_orderby_unspecified_direction_renders_bare_field() {
        let request = GridRequest {
            sort: vec![SortSpec {
                column: 0,
                dir: None,
            }],
            data_props: [(0, "Name".to_owned())].into(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &server_side(vec![])).unwrap();
        assert_eq!(params.orderby.as_deref(), Some("Name"));
    }

    #[test]
    fn test_jsonp_callback_reuses_echo_when_server_side() {
        let settings = GridSettings {
            use_jsonp: true,
            ..server_side(vec![])
        };
        let request = GridRequest {
            echo: "7".to_owned(),
            ..GridRequest::default()
        };
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(params.callback.as_deref(), Some("odatatable_7"));
    }

    #[test]
    fn test_jsonp_callback_synthesizes_load_marker_otherwise() {
        let settings = GridSettings {
            use_jsonp: true,
            server_side: false,
            ..GridSettings::default()
        };
        let params = build_query(&GridRequest::default(), &settings).unwrap();
        let callback = params.callback.unwrap();
        let marker = callback.strip_prefix("odatatable_load_").unwrap();
        let marker: u32 = marker.parse().unwrap();
        assert!((1..=1000).contains(&marker));
    }

    #[test]
    fn test_query_string_rendering() {
        let request = GridRequest {
            display_start: 0,
            display_length: 10,
            ..GridRequest::default()
        };
        let settings = server_side(vec![ColumnMeta {
            field_name: None,
            data_prop: Some(DataProp::Name("Name".to_owned())),
            ..ColumnMeta::default()
        }]);
        let params = build_query(&request, &settings).unwrap();
        assert_eq!(
            params.to_query_string().unwrap(),
            "%24format=json&%24select=Name&%24skip=0&%24top=10&%24count=true"
        );
    }

    #[test]
    fn test_to_pairs_matches_set_fields() {
        let params = ODataQueryParams {
            select: Some("Name".to_owned()),
            skip: Some(0),
            inlinecount: Some("allpages"),
            ..ODataQueryParams::default()
        };
        assert_eq!(
            params.to_pairs(),
            vec![
                ("$format", "json".to_owned()),
                ("$select", "Name".to_owned()),
                ("$skip", "0".to_owned()),
                ("$inlinecount", "allpages".to_owned()),
            ]
        );
    }
}
