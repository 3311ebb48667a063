//! Parsing and formatting of the dates sent by the dashboard.

use time::{
    Date, OffsetDateTime, UtcOffset, format_description::well_known::Rfc3339,
    macros::format_description,
};

use crate::Error;

/// Parse a calendar date from either `YYYY-MM-DD` or an RFC 3339 date-time.
///
/// The dashboard sends dates such as `2025-09-22T03:00:00.000Z`; for those the
/// UTC calendar date is kept.
///
/// # Errors
/// Returns [Error::InvalidDate] if `raw` matches neither format.
pub fn parse_date(raw: &str) -> Result<Date, Error> {
    let raw = raw.trim();

    if let Ok(date) = Date::parse(raw, format_description!("[year]-[month]-[day]")) {
        return Ok(date);
    }

    OffsetDateTime::parse(raw, &Rfc3339)
        .map(|date_time| date_time.to_offset(UtcOffset::UTC).date())
        .map_err(|_| Error::InvalidDate(raw.to_owned()))
}

/// Parse an optional date, treating a missing or blank string as absent.
pub fn parse_optional_date(raw: Option<&str>) -> Result<Option<Date>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date(raw).map(Some),
    }
}

/// Today's date in UTC.
pub fn today() -> Date {
    OffsetDateTime::now_utc().date()
}

/// Format a date the way it is written in Brazil, e.g. `22/09/2025`.
pub fn format_brazilian_date(date: Date) -> String {
    date.format(format_description!("[day]/[month]/[year]"))
        .unwrap_or_else(|_| date.to_string())
}
