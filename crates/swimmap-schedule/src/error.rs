use thiserror::Error;

/// A schedule or price value that could not be interpreted.
///
/// Never escapes status resolution: callers see a degraded "unknown" status
/// instead.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    #[error("malformed time range \"{raw}\": {reason}")]
    MalformedRange { raw: String, reason: String },

    #[error("malformed clock time \"{0}\"")]
    MalformedTime(String),

    #[error("unsupported schedule shape: {0}")]
    UnsupportedShape(String),
}
