//! Relative age labels for task creation times.

use time::OffsetDateTime;
use time::macros::format_description;

/// Whole days elapsed between `created_at` and `now`.
///
/// Truncates the millisecond difference rather than counting calendar days,
/// so a task created at 23:00 is still "Today" at 08:00 the next morning.
#[must_use]
pub fn elapsed_days(created_at: OffsetDateTime, now: OffsetDateTime) -> i64 {
    let millis = (now - created_at).whole_milliseconds();
    let days = millis.div_euclid(MILLIS_PER_DAY);
    i64::try_from(days).unwrap_or(if days.is_negative() { i64::MIN } else { i64::MAX })
}

const MILLIS_PER_DAY: i128 = 86_400_000;

/// Human label for a creation time: "Today", "Yesterday", "{n} days ago", or
/// the date itself once a week has passed.
///
/// The date is shown in the offset of `now`, so pass a local `now` to get a
/// local calendar day.
#[must_use]
pub fn format_age(created_at: OffsetDateTime, now: OffsetDateTime) -> String {
    match elapsed_days(created_at, now) {
        // clock skew; anything in the future counts as today
        ..=0 => "Today".to_owned(),
        1 => "Yesterday".to_owned(),
        days @ 2..=6 => format!("{days} days ago"),
        _ => format_date(created_at.to_offset(now.offset())),
    }
}

fn format_date(at: OffsetDateTime) -> String {
    let format = format_description!("[month padding:none]/[day padding:none]/[year]");
    at.format(format).unwrap_or_else(|_| at.date().to_string())
}
