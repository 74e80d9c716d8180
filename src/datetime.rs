//! Due-date codec.
//!
//! Due dates are local wall-clock times rendered as `YYYY-MM-DD hh:mm AM/PM`
//! on a 12-hour clock. Parsing is the exact inverse of formatting: every field
//! must be zero-padded and in range. Only the AM/PM marker is case-insensitive.

use chrono::{Local, NaiveDateTime, Timelike};

use crate::error::{Error, Result};

/// chrono pattern for the due-date representation
pub const DUE_DATE_FORMAT: &str = "%Y-%m-%d %I:%M %p";

/// Human-readable shape used in error messages and help text
pub const DUE_DATE_HINT: &str = "YYYY-MM-DD hh:mm AM/PM";

/// Render an instant as `YYYY-MM-DD hh:mm AM/PM`.
pub fn format(instant: &NaiveDateTime) -> String {
    instant.format(DUE_DATE_FORMAT).to_string()
}

/// Parse a `YYYY-MM-DD hh:mm AM/PM` string.
pub fn parse(input: &str) -> Result<NaiveDateTime> {
    let normalized = input.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(invalid(input, "date cannot be empty"));
    }

    let parsed = NaiveDateTime::parse_from_str(&normalized, DUE_DATE_FORMAT)
        .map_err(|err| invalid(input, &err.to_string()))?;

    // chrono tolerates missing zero-padding; the stored shape does not.
    if format(&parsed) != normalized {
        return Err(invalid(input, &format!("expected {DUE_DATE_HINT}")));
    }

    Ok(parsed)
}

/// Current local time, truncated to the minute.
pub fn now() -> NaiveDateTime {
    let now = Local::now().naive_local();
    now.with_second(0)
        .and_then(|t| t.with_nanosecond(0))
        .unwrap_or(now)
}

fn invalid(input: &str, reason: &str) -> Error {
    Error::InvalidDate {
        input: input.to_string(),
        reason: reason.to_string(),
    }
}
