//! `OData` response normalization.

use serde_json::Value;

use crate::Error;
use crate::request::GridRequest;

/// The paging window a request asked for; drives the count heuristic when
/// the service omits its count.
#[derive(Clone, Copy, Debug)]
pub struct PageWindow {
    pub display_start: u64,
    pub display_length: i64,
}

impl From<&GridRequest> for PageWindow {
    fn from(request: &GridRequest) -> Self {
        Self {
            display_start: request.display_start,
            display_length: request.display_length,
        }
    }
}

/// The grid's expected paging result.
#[derive(Clone, Debug, PartialEq, serde::Serialize)]
pub struct GridPage {
    /// Row records, as returned by the service.
    pub rows: Vec<Value>,
    /// Total row count behind the applied filters.
    pub total_records: u64,
    /// Always equal to `total_records`: the service's count already reflects
    /// the applied filters, so no independent post-filter count exists.
    pub total_display_records: u64,
}

/// Normalize a raw `OData` response body into a [`GridPage`].
///
/// The row array is probed across the three protocol generations: `value`
/// (v4), `d.results` (v3 with inline count), bare `d` (v2); the first
/// present candidate wins. The total count likewise: `@odata.count`,
/// `odata.count`, top-level `__count`, `__count` under `d` — v2/v3 services
/// send it as a decimal string, v4 as a number.
///
/// A service that was never asked for a count omits it entirely. The page
/// window then estimates a total that keeps the grid's pager live: a full
/// page means at least one more row exists, a short page means this is the
/// end.
///
/// # Errors
///
/// Returns [`Error::UnrecognizedPayload`] when no candidate yields a row
/// array, and [`Error::InvalidCount`] when a count field is present but is
/// not a non-negative integer.
pub fn normalize(body: &Value, window: PageWindow) -> Result<GridPage, Error> {
    let rows = resolve_rows(body)?;
    let total_records = match resolve_count(body)? {
        Some(count) => count,
        None => estimate_total(window, rows.len() as u64),
    };

    tracing::debug!(rows = rows.len(), total_records, "normalized OData response");
    Ok(GridPage {
        rows,
        total_records,
        total_display_records: total_records,
    })
}

fn resolve_rows(body: &Value) -> Result<Vec<Value>, Error> {
    let candidate = body
        .get("value")
        .or_else(|| body.get("d").and_then(|d| d.get("results")))
        .or_else(|| body.get("d"));
    match candidate {
        Some(Value::Array(rows)) => Ok(rows.clone()),
        _ => Err(Error::UnrecognizedPayload),
    }
}

fn resolve_count(body: &Value) -> Result<Option<u64>, Error> {
    body.get("@odata.count")
        .or_else(|| body.get("odata.count"))
        .or_else(|| body.get("__count"))
        .or_else(|| body.get("d").and_then(|d| d.get("__count")))
        .map(parse_count)
        .transpose()
}

fn parse_count(value: &Value) -> Result<u64, Error> {
    match value {
        Value::Number(number) => number
            .as_u64()
            .ok_or_else(|| Error::InvalidCount(value.to_string())),
        Value::String(text) => text
            .trim()
            .parse()
            .map_err(|_| Error::InvalidCount(text.clone())),
        _ => Err(Error::InvalidCount(value.to_string())),
    }
}

fn estimate_total(window: PageWindow, returned: u64) -> u64 {
    if u64::try_from(window.display_length).ok() == Some(returned) {
        // Page came back full: there is at least one more row.
        window.display_start + returned + 1
    } else {
        window.display_start + returned
    }
}
