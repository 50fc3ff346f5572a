//! Entity extraction. Each category is resolved independently and the first
//! match within a category wins.

pub mod dates;
pub mod duration;
pub mod keywords;
pub mod times;
pub mod weekdays;

use chrono::NaiveDateTime;
use sa_protocol::{DateRange, ExtractedEntities};

use crate::text::normalize;

pub use dates::{extract_dates, next_weekday, previous_weekday, upcoming_weekday, weekday_in_week};
pub use duration::{DEFAULT_DURATION_MINUTES, contextual_duration, extract_duration};
pub use keywords::extract_context;
pub use times::{extract_times, find_ambiguous_hour};
pub use weekdays::extract_weekday_pattern;

/// Pull every recognised entity out of `text`, resolving relative dates
/// against `now`. Never fails; unmatched categories stay `None`.
pub fn extract(text: &str, now: NaiveDateTime) -> ExtractedEntities {
    let text = normalize(text);
    let today = now.date();

    let duration = extract_duration(&text);
    let fallback_minutes = duration
        .map(|d| d.minutes)
        .unwrap_or_else(|| contextual_duration(&text));
    let weekday_pattern = extract_weekday_pattern(&text);

    // A weekday inside a recurring pattern ("every monday") is not a date.
    let dates = match weekday_pattern {
        Some(_) => dates::dated_expression(&text, today),
        None => extract_dates(&text, today),
    };

    let entities = ExtractedEntities {
        dates,
        times: extract_times(&text, fallback_minutes),
        duration,
        weekday_pattern,
        context: extract_context(&text),
    };
    tracing::trace!(
        dates = ?entities.dates.map(|d: DateRange| (d.start_date, d.end_date)),
        has_times = entities.times.is_some(),
        duration = ?entities.duration.map(|d| d.minutes),
        "entities extracted"
    );
    entities
}
