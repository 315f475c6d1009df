//! Capture timing.
//!
//! Decides how long the daemon sleeps between captures. Captures align to a
//! fixed interval grid (multiples of the interval since midnight) inside an
//! allowed time-of-day window, and pause outside it. The arithmetic is a pure
//! function of an injected wall-clock value so it can be tested without
//! sleeping.

use std::time::Duration;

use chrono::Timelike;

use crate::config::ScheduleConfig;

/// Seconds in a civil day.
pub const SECS_PER_DAY: u32 = 86_400;

/// Returns the delay until the next permitted capture.
///
/// `now_secs` is the current local time as seconds since midnight.
///
/// - Before the window opens, the delay reaches `window_start_secs`.
/// - Past the window close, the delay reaches `window_start_secs` tomorrow.
/// - Inside the window, the delay lands on the next multiple of
///   `interval_secs` since midnight, so captures sit on the same grid no
///   matter when the daemon started or how long the previous cycle took. A
///   wake already sitting on the grid fires immediately.
/// - A grid point that would land past the window close defers to tomorrow:
///   captures never fire outside the window.
pub fn next_delay(now_secs: u32, schedule: &ScheduleConfig) -> Duration {
    let interval = schedule.interval_secs.max(1);
    let start = schedule.window_start_secs;
    let end = schedule.window_end_secs;

    let delay_secs = if now_secs < start {
        start - now_secs
    } else if now_secs > end {
        start + SECS_PER_DAY - now_secs
    } else {
        let aligned = (interval - now_secs % interval) % interval;
        if now_secs + aligned > end {
            start + SECS_PER_DAY - now_secs
        } else {
            aligned
        }
    };

    Duration::from_secs(u64::from(delay_secs))
}

/// Current local time as seconds since midnight.
pub fn local_secs_since_midnight() -> u32 {
    chrono::Local::now().num_seconds_from_midnight()
}
