// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time period between two instants on the same scale.
//!
//! Periods bound a halachic day (the anchor pair a seasonal hour is taken
//! from) and the Shabbat window between candle lighting and havdalah.

use super::{Time, TimeScale};
use qtty::Days;
use std::fmt;

/// An interval `[start, end)` on time scale `S`.
///
/// # Examples
///
/// ```
/// use zmanim::{Period, Time, UT};
/// use qtty::Days;
///
/// let day = Period::new(Time::<UT>::new(2_460_932.0), Time::<UT>::new(2_460_932.5));
/// assert_eq!(day.duration(), Days::new(0.5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Period<S: TimeScale> {
    pub start: Time<S>,
    pub end: Time<S>,
}

impl<S: TimeScale> Period<S> {
    /// Creates a new period between two instants.
    pub fn new(start: Time<S>, end: Time<S>) -> Self {
        Period { start, end }
    }

    /// Length of the period; negative when `end` precedes `start`.
    pub fn duration(&self) -> Days {
        self.end - self.start
    }

    /// Whether `end` is strictly after `start`.
    pub fn is_forward(&self) -> bool {
        self.end > self.start
    }
}

impl<S: TimeScale> fmt::Display for Period<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UT;

    fn period(start: f64, end: f64) -> Period<UT> {
        Period::new(Time::<UT>::new(start), Time::<UT>::new(end))
    }

    #[test]
    fn duration_and_direction() {
        let p = period(10.0, 11.5);
        assert_eq!(p.duration(), Days::new(1.5));
        assert!(p.is_forward());
        assert!(!period(3.0, 3.0).is_forward());
        assert!(!period(4.0, 3.0).is_forward());
    }

    #[test]
    fn display_lists_both_ends() {
        let display = format!("{}", period(1.0, 2.0));
        assert!(display.contains("UT"));
        assert!(display.contains("to"));
    }
}
