// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Geo-astronomical calculator: sunrise, sunset, transit and the Sun's
//! crossing of an arbitrary depression angle.
//!
//! Solar coordinates come from the NOAA form of the Meeus low-precision
//! series (apparent longitude, obliquity, equation of time), evaluated in
//! Julian centuries of TT.  Rise/set instants are found from the hour angle
//!
//! ```text
//! cos H = (cos z − sin φ · sin δ) / (cos φ · cos δ)
//! ```
//!
//! refined by re-evaluating δ and the equation of time at each estimate.
//! When `|cos H| > 1` the Sun never reaches zenith distance `z` on that date
//! (polar day or night) and the event is `None`.
//!
//! ## Zenith conventions
//!
//! | Event | Zenith |
//! |-------|--------|
//! | visible sunrise/sunset | 90° + 0.833° (refraction + semidiameter) + dip(elevation) |
//! | sea-level sunrise/sunset | 90° + 0.833° |
//! | depression angle θ | 90° + θ (geometric, no refraction or elevation) |
//!
//! Angles are kept in degrees and converted to radians only where the
//! trigonometric functions are applied.

use chrono::{Duration, NaiveDate, NaiveTime, TimeZone, Utc};
use qtty::Days;
use tracing::trace;

use crate::instant::{minutes, Time};
use crate::location::Location;
use crate::scales::{JD, UT};

/// Refraction (34′) plus solar semidiameter (16′) at the horizon, in degrees.
pub const HORIZON_DEPRESSION_DEG: f64 = 50.0 / 60.0;

/// Earth radius used for the elevation dip, in metres.
const EARTH_RADIUS_M: f64 = 6_356_900.0;

/// Refinement steps for the meridian transit.
const TRANSIT_ITERATIONS: usize = 2;

/// Refinement steps for rise/set and depression-angle events.
const EVENT_ITERATIONS: usize = 3;

/// Apparent solar declination and equation of time at one instant.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarCoordinates {
    /// Apparent declination in degrees.
    pub declination_deg: f64,
    /// Apparent minus mean solar time, in minutes.
    pub equation_of_time_min: f64,
}

/// Evaluate the solar series at a UT instant.
pub fn solar_coordinates(instant: Time<UT>) -> SolarCoordinates {
    let t = instant.to::<JD>().julian_centuries().value();

    let mean_longitude = (280.46646 + t * (36_000.76983 + 0.0003032 * t)).rem_euclid(360.0);
    let mean_anomaly = (357.52911 + t * (35_999.05029 - 0.0001537 * t)).to_radians();
    let eccentricity = 0.016708634 - t * (0.000042037 + 0.0000001267 * t);

    let center = mean_anomaly.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
        + (2.0 * mean_anomaly).sin() * (0.019993 - 0.000101 * t)
        + (3.0 * mean_anomaly).sin() * 0.000289;
    let omega = (125.04 - 1934.136 * t).to_radians();
    let apparent_longitude = (mean_longitude + center - 0.00569 - 0.00478 * omega.sin()).to_radians();

    let mean_obliquity =
        23.0 + (26.0 + (21.448 - t * (46.815 + t * (0.00059 - 0.001813 * t))) / 60.0) / 60.0;
    let obliquity = (mean_obliquity + 0.00256 * omega.cos()).to_radians();

    let declination = (obliquity.sin() * apparent_longitude.sin()).asin();

    let y = (obliquity / 2.0).tan().powi(2);
    let l0 = mean_longitude.to_radians();
    let e = eccentricity;
    let m = mean_anomaly;
    let equation_of_time = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
        + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
        - 0.5 * y * y * (4.0 * l0).sin()
        - 1.25 * e * e * (2.0 * m).sin();

    SolarCoordinates {
        declination_deg: declination.to_degrees(),
        equation_of_time_min: 4.0 * equation_of_time.to_degrees(),
    }
}

/// Apparent solar declination in degrees at `instant`.
pub fn solar_declination(instant: Time<UT>) -> f64 {
    solar_coordinates(instant).declination_deg
}

/// Dip of the visible horizon for an observer `elevation_m` above the
/// surrounding terrain, in degrees.
pub fn elevation_dip_deg(elevation_m: f64) -> f64 {
    if elevation_m <= 0.0 {
        return 0.0;
    }
    (EARTH_RADIUS_M / (EARTH_RADIUS_M + elevation_m))
        .acos()
        .to_degrees()
}

/// Hour angle in degrees at which the Sun's centre reaches `zenith_deg`,
/// or `None` if it never does at this latitude and declination.
fn hour_angle_deg(latitude_deg: f64, declination_deg: f64, zenith_deg: f64) -> Option<f64> {
    let phi = latitude_deg.to_radians();
    let delta = declination_deg.to_radians();
    let cos_h =
        (zenith_deg.to_radians().cos() - phi.sin() * delta.sin()) / (phi.cos() * delta.cos());
    if !cos_h.is_finite() || !(-1.0..=1.0).contains(&cos_h) {
        return None;
    }
    Some(cos_h.acos().to_degrees())
}

/// Base solar events for one location and local calendar date.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarEvents {
    /// Visible sunrise, elevation-adjusted.
    pub sunrise: Option<Time<UT>>,
    /// Visible sunset, elevation-adjusted.
    pub sunset: Option<Time<UT>>,
    pub sea_level_sunrise: Option<Time<UT>>,
    pub sea_level_sunset: Option<Time<UT>>,
    /// Meridian transit (astronomical midday).
    pub solar_noon: Time<UT>,
    /// Anti-transit following `solar_noon`.
    pub solar_midnight: Time<UT>,
}

impl SolarEvents {
    /// Sunrise-to-sunset length, when both are defined.
    pub fn day_length(&self) -> Option<Days> {
        Some(self.sunset? - self.sunrise?)
    }
}

/// Solar event calculator bound to one [`Location`].
///
/// Pure and stateless apart from the location: every call recomputes from
/// the date, so a single calculator can be shared across threads.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoCalculator {
    location: Location,
}

impl GeoCalculator {
    pub fn new(location: Location) -> Self {
        Self { location }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// 00:00 UT of the UT day whose transit belongs to the local `date`.
    ///
    /// Usually `date` itself; one day earlier or later where the zone offset
    /// puts local noon on a neighbouring UT date (Apia, Kiritimati, Adak).
    fn day_base(&self, date: NaiveDate) -> Time<UT> {
        let midnight = Time::<UT>::midnight(date);
        let mean_transit = midnight + Days::new(0.5 - self.location.longitude() / 360.0);
        let Some(local_noon) = self.local_noon(date) else {
            return midnight;
        };
        let shift = (local_noon - mean_transit).value().round();
        midnight + Days::new(shift)
    }

    /// Civil 12:00 on `date` in the location's zone.
    fn local_noon(&self, date: NaiveDate) -> Option<Time<UT>> {
        let tz = self.location.time_zone();
        let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0)?);
        let local = tz
            .from_local_datetime(&noon)
            .earliest()
            .or_else(|| tz.from_local_datetime(&(noon + Duration::hours(1))).earliest())?;
        Some(Time::<UT>::from_utc(local.with_timezone(&Utc)))
    }

    /// Minutes after the day base at which the Sun transits.
    fn transit_minutes(&self, coords: &SolarCoordinates) -> f64 {
        720.0 - 4.0 * self.location.longitude() - coords.equation_of_time_min
    }

    /// Meridian transit of the Sun on `date`.
    pub fn solar_noon(&self, date: NaiveDate) -> Time<UT> {
        let midnight = self.day_base(date);
        let mut noon = midnight + Days::new(0.5 - self.location.longitude() / 360.0);
        for _ in 0..TRANSIT_ITERATIONS {
            let coords = solar_coordinates(noon);
            noon = midnight + minutes(self.transit_minutes(&coords));
        }
        noon
    }

    /// Anti-transit following the solar noon of `date`.
    pub fn solar_midnight(&self, date: NaiveDate) -> Time<UT> {
        self.solar_noon(date) + Days::new(0.5)
    }

    /// 12:00 local mean time: noon at Greenwich shifted by longitude only,
    /// ignoring the equation of time.
    pub fn fixed_local_chatzos(&self, date: NaiveDate) -> Time<UT> {
        self.day_base(date) + Days::new(0.5 - self.location.longitude() / 360.0)
    }

    /// Instant at which the Sun's centre reaches `zenith_deg`, on the
    /// rising (`before_noon`) or setting side of the transit.
    pub fn event_at_zenith(
        &self,
        date: NaiveDate,
        zenith_deg: f64,
        before_noon: bool,
    ) -> Option<Time<UT>> {
        let midnight = self.day_base(date);
        let latitude = self.location.latitude();
        let mut estimate = self.solar_noon(date);

        for _ in 0..EVENT_ITERATIONS {
            let coords = solar_coordinates(estimate);
            let Some(hour_angle) = hour_angle_deg(latitude, coords.declination_deg, zenith_deg)
            else {
                trace!(%date, zenith_deg, before_noon, latitude, "sun never reaches zenith");
                return None;
            };
            let transit = midnight + minutes(self.transit_minutes(&coords));
            let offset = minutes(4.0 * hour_angle);
            estimate = if before_noon {
                transit - offset
            } else {
                transit + offset
            };
        }
        Some(estimate)
    }

    /// Instant at which the Sun is `angle_deg` below the geometric horizon.
    ///
    /// `before_noon` selects the dawn side; otherwise the dusk side.
    /// Negative angles place the Sun above the horizon.
    ///
    /// Returns `None` when the Sun's path on `date` never reaches that
    /// depression at this latitude (e.g. 18° dawn during a high-latitude
    /// summer): the event is undefined, not approximated.
    pub fn event_at_depression_angle(
        &self,
        date: NaiveDate,
        angle_deg: f64,
        before_noon: bool,
    ) -> Option<Time<UT>> {
        self.event_at_zenith(date, 90.0 + angle_deg, before_noon)
    }

    fn visible_horizon_zenith(&self, elevation_m: f64) -> f64 {
        90.0 + HORIZON_DEPRESSION_DEG + elevation_dip_deg(elevation_m)
    }

    /// Visible sunrise, corrected for refraction and the observer's elevation.
    pub fn sunrise(&self, date: NaiveDate) -> Option<Time<UT>> {
        let zenith = self.visible_horizon_zenith(self.location.elevation_m());
        self.event_at_zenith(date, zenith, true)
    }

    /// Visible sunset, corrected for refraction and the observer's elevation.
    pub fn sunset(&self, date: NaiveDate) -> Option<Time<UT>> {
        let zenith = self.visible_horizon_zenith(self.location.elevation_m());
        self.event_at_zenith(date, zenith, false)
    }

    /// Visible sunrise with elevation ignored.
    pub fn sea_level_sunrise(&self, date: NaiveDate) -> Option<Time<UT>> {
        self.event_at_zenith(date, self.visible_horizon_zenith(0.0), true)
    }

    /// Visible sunset with elevation ignored.
    pub fn sea_level_sunset(&self, date: NaiveDate) -> Option<Time<UT>> {
        self.event_at_zenith(date, self.visible_horizon_zenith(0.0), false)
    }

    /// All base events for `date`.
    pub fn solar_events(&self, date: NaiveDate) -> SolarEvents {
        let solar_noon = self.solar_noon(date);
        SolarEvents {
            sunrise: self.sunrise(date),
            sunset: self.sunset(date),
            sea_level_sunrise: self.sea_level_sunrise(date),
            sea_level_sunset: self.sea_level_sunset(date),
            solar_noon,
            solar_midnight: solar_noon + Days::new(0.5),
        }
    }
}

/// Compute the base solar events for `location` on `date`.
pub fn compute_solar_events(location: &Location, date: NaiveDate) -> SolarEvents {
    GeoCalculator::new(*location).solar_events(date)
}
