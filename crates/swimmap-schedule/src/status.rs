//! "Open now" resolution against a [`CanonicalWeeklySchedule`].

use chrono::{Datelike, NaiveDateTime, Timelike};
use serde::Serialize;
use serde_json::Value;
use swimmap_core::Facility;

use crate::normalize::{normalize_schedule, CanonicalWeeklySchedule, DayHours};
use crate::parse::format_clock;

/// Minutes before closing during which an open facility reports
/// [`StatusKind::ClosingSoon`].
pub const CLOSING_SOON_MINUTES: u16 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StatusKind {
    Open,
    ClosingSoon,
    Closed,
    Unknown,
}

impl StatusKind {
    /// Stable identifier, also used as the badge style suffix.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            StatusKind::Open => "open",
            StatusKind::ClosingSoon => "closing-soon",
            StatusKind::Closed => "closed",
            StatusKind::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for StatusKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OpenStatus {
    pub status: StatusKind,
    pub text: String,
}

impl OpenStatus {
    fn new(status: StatusKind, text: impl Into<String>) -> Self {
        Self {
            status,
            text: text.into(),
        }
    }

    fn hours_unavailable() -> Self {
        Self::new(StatusKind::Unknown, "hours unavailable")
    }

    fn status_unavailable() -> Self {
        Self::new(StatusKind::Unknown, "status unavailable")
    }
}

/// Whether the facility is open at `now` (local wall-clock time).
///
/// For session days the session containing `now` decides open/closing-soon;
/// between sessions the next session start is reported.
#[must_use]
pub fn is_open_now(schedule: &CanonicalWeeklySchedule, now: NaiveDateTime) -> OpenStatus {
    let Some(today) = schedule.day(now.weekday()) else {
        return OpenStatus::hours_unavailable();
    };

    let sessions = match today {
        DayHours::Closed => return OpenStatus::new(StatusKind::Closed, "closed today"),
        DayHours::Invalid(e) => {
            tracing::debug!(error = %e, "unparseable hours for today");
            return OpenStatus::status_unavailable();
        }
        DayHours::Open(sessions) => sessions,
    };

    #[allow(clippy::cast_possible_truncation)]
    let minute = (now.hour() * 60 + now.minute()) as u16;

    if let Some(current) = sessions.iter().find(|r| r.contains(minute)) {
        let remaining = current.end - minute;
        if remaining < CLOSING_SOON_MINUTES {
            return OpenStatus::new(
                StatusKind::ClosingSoon,
                format!("closes in {remaining} min"),
            );
        }
        return OpenStatus::new(StatusKind::Open, "open now");
    }

    match sessions.iter().find(|r| minute < r.start) {
        Some(next) => OpenStatus::new(
            StatusKind::Closed,
            format!("opens at {}", format_clock(next.start)),
        ),
        None => OpenStatus::new(StatusKind::Closed, "closed for today"),
    }
}

/// Normalize-then-resolve for a raw schedule value. Never fails: a
/// schedule that cannot be read degrades to an unknown status.
#[must_use]
pub fn status_from_raw(raw: Option<&Value>, now: NaiveDateTime) -> OpenStatus {
    let Some(raw) = raw.filter(|v| !v.is_null()) else {
        return OpenStatus::hours_unavailable();
    };
    match normalize_schedule(raw) {
        Ok(schedule) => is_open_now(&schedule, now),
        Err(e) => {
            tracing::debug!(error = %e, "unreadable schedule");
            OpenStatus::status_unavailable()
        }
    }
}

/// Status badge for a facility, from its operating hours.
#[must_use]
pub fn facility_status(facility: &Facility, now: NaiveDateTime) -> OpenStatus {
    status_from_raw(facility.operating_hours.as_ref(), now)
}
