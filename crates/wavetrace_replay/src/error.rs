//! Replay error types.

/// Errors raised by replay queries and cursor movement.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum ReplayError {
    /// No signal with this name or path exists in the waveform.
    #[error("signal '{name}' not found")]
    SignalNotFound {
        /// The name that was looked up.
        name: String,
    },

    /// A cursor was asked to move to a time before its current one.
    #[error("cannot advance backwards from {current_ns} ns to {requested_ns} ns")]
    OutOfOrderAdvance {
        /// The time passed to `advance_to`.
        requested_ns: f64,
        /// The cursor's current time.
        current_ns: f64,
    },

    /// A NaN time was supplied.
    #[error("invalid time: {0}")]
    InvalidTime(f64),
}
