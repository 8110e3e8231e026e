//! Opening status and today's price for swimming facilities.
//!
//! Raw schedule JSON arrives in several historical shapes; [`normalize`]
//! folds them into one [`CanonicalWeeklySchedule`] and [`status`] only ever
//! reads that canonical form.

pub mod error;
pub mod normalize;
pub mod parse;
pub mod pricing;
pub mod status;
pub mod timetable;

pub use error::ScheduleError;
pub use normalize::{normalize_schedule, CanonicalWeeklySchedule, DayHours};
pub use parse::{format_clock, parse_time_range, TimeRange};
pub use pricing::{facility_price, format_price, format_won, today_price};
pub use status::{facility_status, is_open_now, status_from_raw, OpenStatus, StatusKind};
pub use timetable::{facility_timetable, week_timetable, TimetableRow};
