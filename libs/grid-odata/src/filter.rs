//! Filter predicate generation and combination.
//!
//! Predicate generation and combination policy are kept apart: the builder
//! collects two explicit lists (global-search predicates, per-column
//! predicates) and [`combine`] alone decides how they join.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};

use crate::Error;
use crate::version::ODataVersion;

/// Which range formatting a date/numeric column filter uses.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum RangeKind {
    Date,
    Numeric,
}

/// Case-insensitive substring predicate for one field.
///
/// `indexof(tolower(f), 'term') gt -1` rather than `substringof`/`contains`:
/// the function pair varies between protocol generations, `indexof` is
/// understood by all three.
pub(crate) fn substring_predicate(field: &str, term: &str) -> String {
    format!(
        "indexof(tolower({field}), '{}') gt -1",
        escape_literal(&term.to_lowercase())
    )
}

/// Render the range-bound predicates for one date/numeric column filter.
///
/// The term is `low~high`; either side may be empty (unbounded), a bare `~`
/// contributes nothing, and a term without the separator is a bare low
/// bound. Numeric bounds pass through trimmed and unchanged; date bounds
/// are parsed into a UTC instant and wrapped per the protocol version.
///
/// # Errors
///
/// Returns [`Error::InvalidDateBound`] if a date bound does not parse.
pub(crate) fn range_predicates(
    field: &str,
    kind: RangeKind,
    term: &str,
    version: Option<ODataVersion>,
) -> Result<Vec<String>, Error> {
    let (low, high) = match term.split_once('~') {
        Some((low, high)) => (low, high),
        None => (term, ""),
    };

    let mut predicates = Vec::new();
    if let Some(low) = non_empty(low) {
        predicates.push(format!("({field} gt {})", format_bound(kind, low, version)?));
    }
    if let Some(high) = non_empty(high) {
        predicates.push(format!("({field} lt {})", format_bound(kind, high, version)?));
    }
    Ok(predicates)
}

/// Combine the global-search disjunction and the per-column conjunction
/// into the final `$filter` value.
///
/// Any searchable text column may satisfy the global term (`or`); every
/// active column filter must hold (`and`). With both sides present each is
/// parenthesized so the disjunction cannot leak into the conjunction.
pub(crate) fn combine(global: &[String], column: &[String]) -> Option<String> {
    let global_clause = (!global.is_empty()).then(|| global.join(" or "));
    let column_clause = (!column.is_empty()).then(|| column.join(" and "));
    match (global_clause, column_clause) {
        (Some(global), Some(column)) => Some(format!("( {global} ) and ( {column} )")),
        (Some(clause), None) | (None, Some(clause)) => Some(clause),
        (None, None) => None,
    }
}

/// Quote-double a string literal per the `OData` literal convention.
fn escape_literal(s: &str) -> String {
    s.replace('\'', "''")
}

fn non_empty(side: &str) -> Option<&str> {
    let side = side.trim();
    (!side.is_empty()).then_some(side)
}

fn format_bound(
    kind: RangeKind,
    raw: &str,
    version: Option<ODataVersion>,
) -> Result<String, Error> {
    match kind {
        RangeKind::Numeric => Ok(raw.to_owned()),
        RangeKind::Date => {
            parse_date_bound(raw).map(|instant| ODataVersion::date_literal(version, instant))
        }
    }
}

/// Parse a date bound in the formats grids commonly post: RFC 3339, ISO
/// date-time without offset (taken as UTC), or a bare date (midnight UTC).
fn parse_date_bound(raw: &str) -> Result<DateTime<Utc>, Error> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(raw) {
        return Ok(instant.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(naive.and_utc());
        }
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y"] {
        if let Ok(date) = NaiveDate::parse_from_str(raw, format) {
            return Ok(date.and_time(NaiveTime::MIN).and_utc());
        }
    }
    Err(Error::InvalidDateBound(raw.to_owned()))
}
