use std::fmt::Display;

use chrono::{DateTime, TimeZone};

const DATE_FORMAT: &str = "%a %-d %b %Y";
const TIME_FORMAT: &str = "%-I:%M %p";

/// Renders epoch seconds as display strings in `tz`,
/// e.g. `("Mon 2 Jan 2006", "3:04 PM")`.
///
/// Returns `None` when the timestamp is outside the range chrono can represent.
pub fn format_epoch<Tz>(epoch_secs: i64, tz: &Tz) -> Option<(String, String)>
where
    Tz: TimeZone,
    Tz::Offset: Display,
{
    let local = DateTime::from_timestamp(epoch_secs, 0)?.with_timezone(tz);
    Some((
        local.format(DATE_FORMAT).to_string(),
        local.format(TIME_FORMAT).to_string(),
    ))
}
