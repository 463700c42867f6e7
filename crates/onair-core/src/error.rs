use thiserror::Error;

/// Input-validation failures raised by the engine.
///
/// "No match" outcomes (dead air, unknown live DJ) are not errors; they come
/// back as `None` / `OnAirSource::None` and are normal steady-state values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScheduleError {
    /// Input matched neither the ISO-8601 pattern, a 24-hour clock string,
    /// nor the "H:MM AM/PM" pattern.
    #[error("unparseable time format: {0:?}")]
    UnparseableTimeFormat(String),

    /// Day name is not a full weekday name or 3-letter abbreviation.
    #[error("unknown day name: {0:?}")]
    UnknownDayName(String),

    /// A recurrence spec (legacy show-time slot or day/time pair) failed to
    /// normalize. Carries the underlying reason so callers can surface a
    /// user-visible notice instead of a silent no-op.
    #[error("invalid recurrence spec: {0}")]
    InvalidRecurrenceSpec(String),
}
