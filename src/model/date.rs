//! TMX timestamps
//!
//! TMX writes dates in ISO 8601 basic format, always UTC: `20240131T235959Z`.
//! Some tools emit the extended form (`2024-01-31T23:59:59Z`), which is
//! accepted on input and normalized on output.

use chrono::{DateTime, NaiveDateTime, SubsecRound, TimeZone, Utc};

/// Basic format, the one written on output
pub const TMX_DATE_FORMAT: &str = "%Y%m%dT%H%M%SZ";

const EXTENDED_DATE_FORMAT: &str = "%Y-%m-%dT%H:%M:%SZ";

pub fn parse(value: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    let naive = match NaiveDateTime::parse_from_str(value, TMX_DATE_FORMAT) {
        Ok(naive) => naive,
        Err(basic_err) => {
            NaiveDateTime::parse_from_str(value, EXTENDED_DATE_FORMAT).map_err(|_| basic_err)?
        }
    };
    Ok(Utc.from_utc_datetime(&naive))
}

pub fn format(value: &DateTime<Utc>) -> String {
    value.format(TMX_DATE_FORMAT).to_string()
}

/// TMX dates carry whole seconds only
pub fn truncate(value: DateTime<Utc>) -> DateTime<Utc> {
    value.trunc_subsecs(0)
}
