//! Weekly free-swim timetable rows for the detail popup.

use chrono::Weekday;
use swimmap_core::Facility;

use crate::normalize::{normalize_schedule, CanonicalWeeklySchedule, DayHours};
use crate::parse::format_clock;

const WEEK: [(Weekday, &str); 7] = [
    (Weekday::Mon, "월"),
    (Weekday::Tue, "화"),
    (Weekday::Wed, "수"),
    (Weekday::Thu, "목"),
    (Weekday::Fri, "금"),
    (Weekday::Sat, "토"),
    (Weekday::Sun, "일"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimetableRow {
    pub day: Weekday,
    pub label: &'static str,
    /// Session start times, `HH:MM`. Empty when closed or unknown.
    pub starts: Vec<String>,
    pub closed: bool,
    pub is_today: bool,
}

/// Seven Monday-first rows listing each day's session start times.
#[must_use]
pub fn week_timetable(schedule: &CanonicalWeeklySchedule, today: Weekday) -> Vec<TimetableRow> {
    WEEK.iter()
        .map(|&(day, label)| {
            let (starts, closed) = match schedule.day(day) {
                Some(DayHours::Open(sessions)) => {
                    (sessions.iter().map(|r| format_clock(r.start)).collect(), false)
                }
                Some(DayHours::Closed) => (Vec::new(), true),
                Some(DayHours::Invalid(_)) | None => (Vec::new(), false),
            };
            TimetableRow {
                day,
                label,
                starts,
                closed,
                is_today: day == today,
            }
        })
        .collect()
}

/// Timetable for a facility's free-swim sessions, or `None` when it has
/// none or they cannot be read.
#[must_use]
pub fn facility_timetable(facility: &Facility, today: Weekday) -> Option<Vec<TimetableRow>> {
    let raw = facility.free_swim_times.as_ref()?;
    let schedule = match normalize_schedule(raw) {
        Ok(schedule) => schedule,
        Err(e) => {
            tracing::debug!(facility = %facility.name, error = %e, "unreadable free-swim times");
            return None;
        }
    };
    if schedule.is_empty() {
        return None;
    }
    Some(week_timetable(&schedule, today))
}
