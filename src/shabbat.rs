// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Candle-lighting and havdalah windows for Shabbat and festivals.
//!
//! Every configured convention is computed and returned; picking "the"
//! time to display is left to the caller.  Minute conventions are offsets
//! from sunset.  The Rabbeinu Tam time is a separate depression-angle
//! derivation and is never mixed into the minute map.

use std::collections::BTreeMap;

use chrono::{DateTime, Datelike, NaiveDate, Weekday};
use chrono_tz::Tz;
use tracing::debug;

use crate::error::{Result, ZmanimError};
use crate::instant::{minutes, Time};
use crate::location::Location;
use crate::period::Period;
use crate::scales::UT;
use crate::solar::GeoCalculator;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Which conventions to compute.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ShabbatConventions {
    /// Minutes before sunset on the eve.
    pub candle_lighting_minutes: Vec<u32>,
    /// Minutes after sunset on the last day.
    pub havdalah_minutes: Vec<u32>,
    /// Depression angle for Rabbeinu Tam; `None` skips it.
    pub rabbeinu_tam_degrees: Option<f64>,
}

impl Default for ShabbatConventions {
    fn default() -> Self {
        Self {
            candle_lighting_minutes: vec![18, 40],
            havdalah_minutes: vec![42, 50, 72],
            rabbeinu_tam_degrees: Some(16.1),
        }
    }
}

/// Bounds of one Shabbat or festival.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ShabbatWindow {
    location: Location,
    eve: NaiveDate,
    end: NaiveDate,
    candle_lighting: BTreeMap<u32, Option<Time<UT>>>,
    havdalah: BTreeMap<u32, Option<Time<UT>>>,
    rabbeinu_tam: Option<Time<UT>>,
    parasha: Option<String>,
}

impl ShabbatWindow {
    /// Date candles are lit.
    pub fn eve(&self) -> NaiveDate {
        self.eve
    }

    /// Date havdalah is made.
    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Opaque label supplied by the caller (parasha or festival name).
    pub fn parasha(&self) -> Option<&str> {
        self.parasha.as_deref()
    }

    pub fn candle_lighting(&self, minutes: u32) -> Option<Time<UT>> {
        self.candle_lighting.get(&minutes).copied().flatten()
    }

    pub fn havdalah(&self, minutes: u32) -> Option<Time<UT>> {
        self.havdalah.get(&minutes).copied().flatten()
    }

    pub fn rabbeinu_tam(&self) -> Option<Time<UT>> {
        self.rabbeinu_tam
    }

    pub fn candle_lighting_local(&self, minutes: u32) -> Option<DateTime<Tz>> {
        self.candle_lighting(minutes)?.to_local(&self.location.time_zone())
    }

    pub fn havdalah_local(&self, minutes: u32) -> Option<DateTime<Tz>> {
        self.havdalah(minutes)?.to_local(&self.location.time_zone())
    }

    pub fn rabbeinu_tam_local(&self) -> Option<DateTime<Tz>> {
        self.rabbeinu_tam?.to_local(&self.location.time_zone())
    }

    /// Candle-lighting conventions, ascending by minutes.
    pub fn candle_lighting_times(&self) -> impl Iterator<Item = (u32, Option<Time<UT>>)> + '_ {
        self.candle_lighting.iter().map(|(m, t)| (*m, *t))
    }

    /// Havdalah conventions, ascending by minutes.
    pub fn havdalah_times(&self) -> impl Iterator<Item = (u32, Option<Time<UT>>)> + '_ {
        self.havdalah.iter().map(|(m, t)| (*m, *t))
    }

    /// From the earliest candle lighting to the latest havdalah, Rabbeinu
    /// Tam included; `None` if either side has no defined time.
    pub fn span(&self) -> Option<Period<UT>> {
        let start = self
            .candle_lighting
            .values()
            .flatten()
            .copied()
            .reduce(Time::min)?;
        let end = self
            .havdalah
            .values()
            .flatten()
            .copied()
            .chain(self.rabbeinu_tam)
            .reduce(Time::max)?;
        Some(Period::new(start, end))
    }
}

/// Window for the Shabbat beginning on `friday`.
///
/// Fails with [`ZmanimError::NotFriday`] for any other weekday. Times the
/// Sun never reaches (polar summer) are `None`.
pub fn compute_shabbat_window(
    location: &Location,
    friday: NaiveDate,
    conventions: &ShabbatConventions,
    parasha: Option<String>,
) -> Result<ShabbatWindow> {
    if friday.weekday() != Weekday::Fri {
        return Err(ZmanimError::NotFriday(friday));
    }
    let saturday = friday.succ_opt().ok_or(ZmanimError::InvalidDateRange {
        start: friday,
        end: friday,
    })?;
    Ok(window(location, friday, saturday, conventions, parasha))
}

/// Window for a festival lit on `eve` and ending at nightfall of `last_day`.
pub fn compute_holiday_window(
    location: &Location,
    eve: NaiveDate,
    last_day: NaiveDate,
    conventions: &ShabbatConventions,
    label: Option<String>,
) -> Result<ShabbatWindow> {
    if last_day <= eve {
        return Err(ZmanimError::InvalidDateRange {
            start: eve,
            end: last_day,
        });
    }
    Ok(window(location, eve, last_day, conventions, label))
}

fn window(
    location: &Location,
    eve: NaiveDate,
    end: NaiveDate,
    conventions: &ShabbatConventions,
    parasha: Option<String>,
) -> ShabbatWindow {
    let calculator = GeoCalculator::new(*location);
    let eve_sunset = calculator.sea_level_sunset(eve);
    let end_sunset = calculator.sunset(end);

    let candle_lighting = conventions
        .candle_lighting_minutes
        .iter()
        .map(|&m| (m, eve_sunset.map(|t| t - minutes(f64::from(m)))))
        .collect();
    let havdalah = conventions
        .havdalah_minutes
        .iter()
        .map(|&m| (m, end_sunset.map(|t| t + minutes(f64::from(m)))))
        .collect();
    let rabbeinu_tam = conventions
        .rabbeinu_tam_degrees
        .and_then(|degrees| calculator.event_at_depression_angle(end, degrees, false));

    debug!(
        %eve,
        %end,
        eve_sunset = eve_sunset.is_some(),
        end_sunset = end_sunset.is_some(),
        rabbeinu_tam = rabbeinu_tam.is_some(),
        "computed shabbat window"
    );

    ShabbatWindow {
        location: *location,
        eve,
        end,
        candle_lighting,
        havdalah,
        rabbeinu_tam,
        parasha,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Asia::Jerusalem;
    use qtty::{Second, Seconds};

    fn jerusalem() -> Location {
        Location::new(31.7650511, 35.1746302, 0.0, Jerusalem).unwrap()
    }

    fn friday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 19).unwrap()
    }

    #[test]
    fn candle_lighting_conventions_differ_by_their_minutes() {
        let w = compute_shabbat_window(
            &jerusalem(),
            friday(),
            &ShabbatConventions::default(),
            Some("Nitzavim".into()),
        )
        .unwrap();
        let gap = (w.candle_lighting(18).unwrap() - w.candle_lighting(40).unwrap()).to::<Second>();
        assert!((gap - Seconds::new(22.0 * 60.0)).abs() < Seconds::new(1e-3));
        assert_eq!(w.parasha(), Some("Nitzavim"));
        assert_eq!(w.candle_lighting_local(18).unwrap().hour(), 18);
    }

    #[test]
    fn havdalah_follows_saturday_sunset() {
        let location = jerusalem();
        let w = compute_shabbat_window(&location, friday(), &ShabbatConventions::default(), None)
            .unwrap();
        let saturday = friday().succ_opt().unwrap();
        let sunset = GeoCalculator::new(location).sunset(saturday).unwrap();

        let times: Vec<Time<UT>> = w.havdalah_times().map(|(_, t)| t.unwrap()).collect();
        assert_eq!(times.len(), 3);
        assert!(sunset < times[0] && times[0] < times[1] && times[1] < times[2]);
        let gap = (w.havdalah(72).unwrap() - sunset).to::<Second>();
        assert!((gap - Seconds::new(72.0 * 60.0)).abs() < Seconds::new(1e-3));

        let rt = w.rabbeinu_tam().unwrap();
        assert!(rt > sunset);
        assert_eq!(w.end(), saturday);
        assert!(w.havdalah_local(42).unwrap().date_naive() == saturday);
    }

    #[test]
    fn rabbeinu_tam_is_optional_and_separate() {
        let conventions = ShabbatConventions {
            rabbeinu_tam_degrees: None,
            ..ShabbatConventions::default()
        };
        let w = compute_shabbat_window(&jerusalem(), friday(), &conventions, None).unwrap();
        assert_eq!(w.rabbeinu_tam(), None);
        assert_eq!(w.havdalah_times().count(), 3);
    }

    #[test]
    fn rejects_non_fridays() {
        let thursday = NaiveDate::from_ymd_opt(2025, 9, 18).unwrap();
        assert_eq!(
            compute_shabbat_window(&jerusalem(), thursday, &ShabbatConventions::default(), None),
            Err(ZmanimError::NotFriday(thursday))
        );
    }

    #[test]
    fn holiday_window_spans_several_days() {
        let eve = NaiveDate::from_ymd_opt(2025, 9, 22).unwrap();
        let last = NaiveDate::from_ymd_opt(2025, 9, 24).unwrap();
        let w = compute_holiday_window(
            &jerusalem(),
            eve,
            last,
            &ShabbatConventions::default(),
            Some("Rosh Hashana".into()),
        )
        .unwrap();
        let span = w.span().unwrap();
        assert!(span.duration().value() > 2.0 && span.duration().value() < 2.1);
        assert!(compute_holiday_window(&jerusalem(), last, eve, &ShabbatConventions::default(), None)
            .is_err());
    }

    #[test]
    fn polar_summer_has_no_times() {
        let tromso = Location::new(69.6492, 18.9553, 0.0, chrono_tz::Europe::Oslo).unwrap();
        let midsummer_friday = NaiveDate::from_ymd_opt(2025, 6, 20).unwrap();
        let w = compute_shabbat_window(&tromso, midsummer_friday, &ShabbatConventions::default(), None)
            .unwrap();
        assert!(w.candle_lighting_times().all(|(_, t)| t.is_none()));
        assert!(w.havdalah_times().all(|(_, t)| t.is_none()));
        assert_eq!(w.rabbeinu_tam(), None);
        assert_eq!(w.span(), None);
    }
}
