//! Typed decoding of the grid's request parameter sequence.
//!
//! A grid in server-side processing mode posts its state as a flat, ordered
//! list of `name=value` pairs: `sEcho`, `iDisplayStart`, `iDisplayLength`,
//! `sSearch`, plus the indexed families `sSearch_<i>`, `mDataProp_<i>`,
//! `iSortCol_<i>` and `sSortDir_<i>`. Decoding happens exactly once, here at
//! the boundary; everything downstream works with the typed [`GridRequest`].

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::{Error, SortDir};

/// One sort key: the grid column index it targets and an optional direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub dir: Option<SortDir>,
}

/// Decoded per-fetch grid request state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GridRequest {
    /// Opaque token round-tripped by the grid to correlate a response with
    /// the request that produced it.
    pub echo: String,
    /// Offset of the first row to return.
    pub display_start: u64,
    /// Page size; `-1` means all rows, no limit.
    pub display_length: i64,
    /// Global free-text search term; empty means no global filter.
    pub search: String,
    /// Per-column search terms, keyed by column index. Empty terms are not
    /// recorded.
    pub column_search: BTreeMap<usize, String>,
    /// Data property per column index; the field identifiers sort keys
    /// resolve against.
    pub data_props: BTreeMap<usize, String>,
    /// Sort keys, primary first.
    pub sort: Vec<SortSpec>,
}

impl Default for GridRequest {
    fn default() -> Self {
        Self {
            echo: String::new(),
            display_start: 0,
            display_length: -1,
            search: String::new(),
            column_search: BTreeMap::new(),
            data_props: BTreeMap::new(),
            sort: Vec::new(),
        }
    }
}

impl GridRequest {
    /// Decode the grid's parameter sequence.
    ///
    /// Absent parameters keep their defaults (the wire protocol omits what
    /// it does not use); with duplicate names the later value wins, matching
    /// the map the original protocol builds from the same list. Parameter
    /// families the translation has no use for (`bRegex_<i>`,
    /// `bSortable_<i>`, ...) are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if a numeric parameter or index
    /// suffix is present but does not parse.
    pub fn from_params<'a, I>(params: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut request = Self::default();
        let mut sorting_cols = 0usize;
        let mut sort_cols: BTreeMap<usize, usize> = BTreeMap::new();
        let mut sort_dirs: BTreeMap<usize, Option<SortDir>> = BTreeMap::new();

        for (name, value) in params {
            match name {
                "sEcho" => request.echo = value.to_owned(),
                "iDisplayStart" => request.display_start = parse_num(name, value)?,
                "iDisplayLength" => request.display_length = parse_num(name, value)?,
                "sSearch" => request.search = value.to_owned(),
                "iSortingCols" => sorting_cols = parse_num(name, value)?,
                _ => {
                    if let Some(suffix) = name.strip_prefix("sSearch_") {
                        let index: usize = parse_num(name, suffix)?;
                        if value.is_empty() {
                            request.column_search.remove(&index);
                        } else {
                            request.column_search.insert(index, value.to_owned());
                        }
                    } else if let Some(suffix) = name.strip_prefix("mDataProp_") {
                        let index: usize = parse_num(name, suffix)?;
                        request.data_props.insert(index, value.to_owned());
                    } else if let Some(suffix) = name.strip_prefix("iSortCol_") {
                        let position: usize = parse_num(name, suffix)?;
                        sort_cols.insert(position, parse_num(name, value)?);
                    } else if let Some(suffix) = name.strip_prefix("sSortDir_") {
                        let position: usize = parse_num(name, suffix)?;
                        sort_dirs.insert(position, SortDir::parse(value));
                    }
                }
            }
        }

        for position in 0..sorting_cols {
            if let Some(&column) = sort_cols.get(&position) {
                request.sort.push(SortSpec {
                    column,
                    dir: sort_dirs.get(&position).copied().flatten(),
                });
            }
        }

        Ok(request)
    }
}

fn parse_num<T: FromStr>(name: &str, value: &str) -> Result<T, Error> {
    value.trim().parse().map_err(|_| Error::InvalidParameter {
        name: name.to_owned(),
        value: value.to_owned(),
    })
}
