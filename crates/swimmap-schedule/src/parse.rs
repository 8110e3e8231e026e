//! Clock and time-range parsing.

use crate::error::ScheduleError;

pub(crate) const MINUTES_PER_DAY: u16 = 24 * 60;

/// A half-open `[start, end)` interval in minutes since midnight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TimeRange {
    pub start: u16,
    pub end: u16,
}

impl TimeRange {
    #[must_use]
    pub fn contains(&self, minute: u16) -> bool {
        self.start <= minute && minute < self.end
    }
}

impl std::fmt::Display for TimeRange {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}-{}", format_clock(self.start), format_clock(self.end))
    }
}

/// Parses `"HH:MM-HH:MM"` (also `~` as separator, surrounding spaces ok).
///
/// `24:00` is accepted as an end of day. An end before the start is kept
/// as-is: such a range is simply never "current".
///
/// # Errors
///
/// Returns [`ScheduleError::MalformedRange`] when the separator is missing
/// or there are extra parts, and [`ScheduleError::MalformedTime`] when
/// either side is not a valid clock time.
pub fn parse_time_range(raw: &str) -> Result<TimeRange, ScheduleError> {
    let trimmed = raw.trim();
    let parts: Vec<&str> = trimmed.split(['-', '~']).collect();
    match parts.as_slice() {
        [start, end] => Ok(TimeRange {
            start: parse_clock(start)?,
            end: parse_clock(end)?,
        }),
        [_] => Err(ScheduleError::MalformedRange {
            raw: raw.to_string(),
            reason: "missing '-' separator".into(),
        }),
        _ => Err(ScheduleError::MalformedRange {
            raw: raw.to_string(),
            reason: format!("expected two times, found {}", parts.len()),
        }),
    }
}

/// Parses `"H:MM"` / `"HH:MM"` into minutes since midnight.
pub(crate) fn parse_clock(raw: &str) -> Result<u16, ScheduleError> {
    let malformed = || ScheduleError::MalformedTime(raw.trim().to_string());
    let (h, m) = raw.trim().split_once(':').ok_or_else(malformed)?;
    if h.is_empty() || h.len() > 2 || m.len() != 2 {
        return Err(malformed());
    }
    if !h.bytes().all(|b| b.is_ascii_digit()) || !m.bytes().all(|b| b.is_ascii_digit()) {
        return Err(malformed());
    }
    let hours: u16 = h.parse().map_err(|_| malformed())?;
    let minutes: u16 = m.parse().map_err(|_| malformed())?;
    if minutes > 59 || hours > 24 {
        return Err(malformed());
    }
    let total = hours * 60 + minutes;
    if total > MINUTES_PER_DAY {
        return Err(malformed());
    }
    Ok(total)
}

/// Formats minutes since midnight as zero-padded `HH:MM`.
#[must_use]
pub fn format_clock(minutes: u16) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}
