// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Proportional ("seasonal") hours.
//!
//! A seasonal hour is one twelfth of a halachic day, where the day is
//! bounded by whichever anchor pair an opinion uses: sunrise/sunset for
//! the GRA, dawn/nightfall variants for the MGA, the 1.583° pair for the
//! Baal HaTanya.  Offsets "in zmaniyos minutes" scale with it.

use qtty::Days;

use crate::error::{Result, ZmanimError};
use crate::instant::{Time, TimeScale};
use crate::period::Period;

/// Hours in a halachic day.
pub const HOURS_PER_DAY: f64 = 12.0;

/// One twelfth of an anchor interval.
///
/// ```
/// use zmanim::{SeasonalHour, Time, UT};
/// use qtty::Days;
///
/// let dawn = Time::<UT>::new(2_460_932.10);
/// let dusk = Time::<UT>::new(2_460_932.70);
/// let hour = SeasonalHour::between(dawn, dusk).unwrap();
/// assert!((hour.length() - Days::new(0.05)).abs() < Days::new(1e-12));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct SeasonalHour {
    length: Days,
}

impl SeasonalHour {
    /// Seasonal hour of the day running from `start` to `end`.
    ///
    /// Fails with [`ZmanimError::InvalidInterval`] unless `end` is strictly
    /// after `start`.
    pub fn between<S: TimeScale>(start: Time<S>, end: Time<S>) -> Result<Self> {
        Self::from_period(&Period::new(start, end))
    }

    pub fn from_period<S: TimeScale>(day: &Period<S>) -> Result<Self> {
        if !day.is_forward() {
            return Err(ZmanimError::InvalidInterval {
                start: day.start.value(),
                end: day.end.value(),
            });
        }
        Ok(Self {
            length: day.duration() / HOURS_PER_DAY,
        })
    }

    /// Length of one seasonal hour.
    pub fn length(&self) -> Days {
        self.length
    }

    /// Length of one seasonal hour in clock minutes.
    pub fn minutes(&self) -> f64 {
        self.length.value() * 1440.0
    }

    /// Duration of `hours` seasonal hours (fractional allowed).
    pub fn offset(&self, hours: f64) -> Days {
        self.length * hours
    }

    /// Duration of `minutes` zmaniyos minutes, i.e. `minutes / 60` hours.
    pub fn zmaniyos_minutes(&self, minutes: f64) -> Days {
        self.offset(minutes / 60.0)
    }
}

/// `(end − start) / 12`, failing with `InvalidInterval` if `end <= start`.
pub fn seasonal_hour<S: TimeScale>(start: Time<S>, end: Time<S>) -> Result<Days> {
    SeasonalHour::between(start, end).map(|hour| hour.length())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UT;

    #[test]
    fn twelve_hours_span_the_day() {
        let a = Time::<UT>::new(2_460_932.137_5);
        let b = Time::<UT>::new(2_460_932.651_2);
        let hour = seasonal_hour(a, b).unwrap();
        assert!((hour * 12.0 - (b - a)).abs() < Days::new(1e-12));
    }

    #[test]
    fn rejects_empty_and_inverted_intervals() {
        let a = Time::<UT>::new(10.0);
        let b = Time::<UT>::new(10.5);
        assert!(matches!(
            SeasonalHour::between(b, a),
            Err(ZmanimError::InvalidInterval { .. })
        ));
        assert_eq!(
            seasonal_hour(a, a),
            Err(ZmanimError::InvalidInterval {
                start: 10.0,
                end: 10.0
            })
        );
    }

    #[test]
    fn zmaniyos_minutes_scale_with_the_day() {
        // 14-hour summer day: one seasonal hour is 70 clock minutes.
        let start = Time::<UT>::new(0.0);
        let end = start + Days::new(14.0 / 24.0);
        let hour = SeasonalHour::between(start, end).unwrap();
        assert!((hour.minutes() - 70.0).abs() < 1e-9);
        let seventy_two = hour.zmaniyos_minutes(72.0);
        assert!((seventy_two - hour.offset(1.2)).abs() < Days::new(1e-15));
        assert!((seventy_two.value() * 1440.0 - 84.0).abs() < 1e-9);
    }
}
