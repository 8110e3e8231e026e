//! Normalization of raw weekly schedules into [`CanonicalWeeklySchedule`].
//!
//! Three shapes have accumulated in the data and are treated as equivalent:
//!
//! 1. Korean day keys (`"월"` .. `"일"`) mapped to `"HH:MM-HH:MM"` or a
//!    closed sentinel.
//! 2. English day keys (`"mon"` .. `"sun"`) plus aggregate `"weekday"` /
//!    `"mon-fri"` and `"weekend"` keys used for any day not listed.
//! 3. Per-day arrays of disjoint session ranges.
//!
//! Unrecognized keys (notes such as `"휴관": "매월 첫째 일요일"`) are
//! ignored.

use chrono::Weekday;
use serde_json::Value;

use crate::error::ScheduleError;
use crate::parse::{parse_time_range, TimeRange};

const CLOSED_SENTINELS: &[&str] = &["closed", "휴관", "휴무", "휴관일"];

/// What is known about one day of the week.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DayHours {
    Closed,
    /// One or more sessions, sorted by start.
    Open(Vec<TimeRange>),
    /// The day had a value but it could not be parsed.
    Invalid(ScheduleError),
}

/// One entry per weekday, Monday first. `None` means nothing is known.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CanonicalWeeklySchedule {
    days: [Option<DayHours>; 7],
}

impl CanonicalWeeklySchedule {
    #[must_use]
    pub fn day(&self, weekday: Weekday) -> Option<&DayHours> {
        self.days[weekday.num_days_from_monday() as usize].as_ref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.days.iter().all(Option::is_none)
    }

    fn slot_mut(&mut self, weekday: Weekday) -> &mut Option<DayHours> {
        &mut self.days[weekday.num_days_from_monday() as usize]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DayKey {
    Day(Weekday),
    Weekdays,
    Weekend,
}

fn classify_key(key: &str) -> Option<DayKey> {
    let lower = key.trim().to_lowercase();
    let day = match lower.as_str() {
        "월" | "월요일" | "mon" | "monday" => Weekday::Mon,
        "화" | "화요일" | "tue" | "tues" | "tuesday" => Weekday::Tue,
        "수" | "수요일" | "wed" | "wednesday" => Weekday::Wed,
        "목" | "목요일" | "thu" | "thur" | "thurs" | "thursday" => Weekday::Thu,
        "금" | "금요일" | "fri" | "friday" => Weekday::Fri,
        "토" | "토요일" | "sat" | "saturday" => Weekday::Sat,
        "일" | "일요일" | "sun" | "sunday" => Weekday::Sun,
        "weekday" | "weekdays" | "mon-fri" | "평일" | "월-금" | "월~금" => {
            return Some(DayKey::Weekdays)
        }
        "weekend" | "weekends" | "sat-sun" | "주말" | "토-일" | "토~일" => {
            return Some(DayKey::Weekend)
        }
        _ => return None,
    };
    Some(DayKey::Day(day))
}

pub(crate) fn is_weekend(day: Weekday) -> bool {
    matches!(day, Weekday::Sat | Weekday::Sun)
}

fn is_closed_sentinel(s: &str) -> bool {
    let lower = s.trim().to_lowercase();
    CLOSED_SENTINELS.iter().any(|sentinel| lower == *sentinel)
}

/// Interprets one day's raw value. `None` means "absent" (null, empty
/// string, empty list) and lets aggregate keys fill the day in.
fn parse_day_value(value: &Value) -> Option<DayHours> {
    match value {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) if is_closed_sentinel(s) => Some(DayHours::Closed),
        Value::String(s) => Some(match parse_time_range(s) {
            Ok(range) => DayHours::Open(vec![range]),
            Err(e) => DayHours::Invalid(e),
        }),
        Value::Array(items) => parse_sessions(items),
        other => Some(DayHours::Invalid(ScheduleError::UnsupportedShape(format!(
            "day value must be a string or list, got {other}"
        )))),
    }
}

fn parse_sessions(items: &[Value]) -> Option<DayHours> {
    let mut ranges = Vec::with_capacity(items.len());
    for item in items {
        match item {
            Value::String(s) if s.trim().is_empty() => {}
            Value::String(s) if is_closed_sentinel(s) => return Some(DayHours::Closed),
            Value::String(s) => match parse_time_range(s) {
                Ok(range) => ranges.push(range),
                Err(e) => return Some(DayHours::Invalid(e)),
            },
            other => {
                return Some(DayHours::Invalid(ScheduleError::UnsupportedShape(format!(
                    "session entry must be a string, got {other}"
                ))))
            }
        }
    }
    if ranges.is_empty() {
        return None;
    }
    ranges.sort();
    Some(DayHours::Open(ranges))
}

/// Stores `incoming` for a day that may already hold a value from another
/// key spelling. A closed marker always wins; otherwise the first value
/// seen is kept.
fn merge_into(slot: &mut Option<DayHours>, incoming: DayHours) {
    let replace = match slot {
        None => true,
        Some(DayHours::Closed) => false,
        Some(_) => incoming == DayHours::Closed,
    };
    if replace {
        *slot = Some(incoming);
    }
}

/// Fold a raw schedule object into the canonical Monday-first form.
///
/// Resolution per day: the day's own key, then the matching aggregate key
/// (`weekday` for Mon–Fri, `weekend` for Sat/Sun). A day explicitly marked
/// closed is never overridden by an aggregate.
///
/// # Errors
///
/// Returns [`ScheduleError::UnsupportedShape`] if `raw` is not a JSON object.
/// Bad individual day values do not fail the whole schedule; they are kept
/// as [`DayHours::Invalid`].
pub fn normalize_schedule(raw: &Value) -> Result<CanonicalWeeklySchedule, ScheduleError> {
    let Value::Object(map) = raw else {
        return Err(ScheduleError::UnsupportedShape(format!(
            "schedule must be an object, got {raw}"
        )));
    };

    let mut schedule = CanonicalWeeklySchedule::default();
    let mut weekdays: Option<DayHours> = None;
    let mut weekend: Option<DayHours> = None;

    for (key, value) in map {
        let Some(day_key) = classify_key(key) else {
            tracing::trace!(key, "ignoring unrecognized schedule key");
            continue;
        };
        let Some(hours) = parse_day_value(value) else {
            continue;
        };
        match day_key {
            DayKey::Day(day) => merge_into(schedule.slot_mut(day), hours),
            DayKey::Weekdays => merge_into(&mut weekdays, hours),
            DayKey::Weekend => merge_into(&mut weekend, hours),
        }
    }

    for day in [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
        Weekday::Sat,
        Weekday::Sun,
    ] {
        let slot = schedule.slot_mut(day);
        if slot.is_none() {
            let fallback = if is_weekend(day) { &weekend } else { &weekdays };
            slot.clone_from(fallback);
        }
    }

    Ok(schedule)
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
