// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Scale-parameterised instant used by every solar event and zman.
//!
//! [`Time<S>`] stores a single Julian-day quantity in [`Days`] whose meaning
//! is fixed by the compile-time marker `S: TimeScale`.  Solar events are
//! produced on the [`UT`](super::scales::UT) axis (Earth rotation), while the
//! solar-coordinate series are evaluated on the uniform TT axis
//! ([`JD`](super::scales::JD)); `.to::<JD>()` bridges the two by applying ΔT.
//!
//! Projection to civil time (`chrono::DateTime<Utc>` and then the
//! location's `chrono_tz::Tz`) happens only at the presentation boundary,
//! so offsets and proportional hours are always computed on a continuous
//! axis and never observe a DST transition twice.

use chrono::{DateTime, NaiveDate, NaiveTime, TimeZone, Utc};
use qtty::*;
use std::marker::PhantomData;
use std::ops::{Add, AddAssign, Sub, SubAssign};

#[cfg(feature = "serde")]
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// JD of the Unix epoch (1970-01-01T00:00:00Z).
pub(crate) const UNIX_EPOCH_JD: Days = Days::new(2_440_587.5);

// ═══════════════════════════════════════════════════════════════════════════
// TimeScale trait
// ═══════════════════════════════════════════════════════════════════════════

/// Marker trait for time scales.
///
/// A scale provides a display label and the pair of conversions between its
/// native Julian-day quantity and the canonical **JD(TT)**.
pub trait TimeScale: Copy + Clone + std::fmt::Debug + PartialEq + PartialOrd + 'static {
    /// Display label used by [`Time`] formatting.
    const LABEL: &'static str;

    /// Convert a quantity in this scale's native unit to an absolute JD(TT).
    fn to_jd_tt(value: Days) -> Days;

    /// Convert an absolute JD(TT) back to this scale's native quantity.
    fn from_jd_tt(jd_tt: Days) -> Days;
}

// ═══════════════════════════════════════════════════════════════════════════
// Time<S>
// ═══════════════════════════════════════════════════════════════════════════

/// A point on time scale `S`.
///
/// Layout-identical to a single `f64`; `Copy` and cheap to pass by value.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct Time<S: TimeScale> {
    quantity: Days,
    _scale: PhantomData<S>,
}

impl<S: TimeScale> Time<S> {
    /// Create from a raw Julian-day value on this scale.
    #[inline]
    pub const fn new(value: f64) -> Self {
        Self {
            quantity: Days::new(value),
            _scale: PhantomData,
        }
    }

    /// Create from a [`Days`] quantity.
    #[inline]
    pub const fn from_days(days: Days) -> Self {
        Self {
            quantity: days,
            _scale: PhantomData,
        }
    }

    /// The underlying quantity in days.
    #[inline]
    pub const fn quantity(&self) -> Days {
        self.quantity
    }

    /// The underlying scalar value in days.
    #[inline]
    pub const fn value(&self) -> f64 {
        self.quantity.value()
    }

    /// Convert this instant to another time scale, routing through JD(TT).
    #[inline]
    pub fn to<T: TimeScale>(&self) -> Time<T> {
        Time::<T>::from_days(T::from_jd_tt(S::to_jd_tt(self.quantity)))
    }

    /// Convert to a `chrono::DateTime<Utc>`.
    ///
    /// Returns `None` if the value falls outside chrono's representable range.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        use super::scales::UT;
        let jd_ut = self.to::<UT>().quantity();
        let seconds_since_epoch = (jd_ut - UNIX_EPOCH_JD).to::<Second>().value();
        let secs = seconds_since_epoch.floor() as i64;
        let nanos = ((seconds_since_epoch - secs as f64) * 1e9) as u32;
        DateTime::<Utc>::from_timestamp(secs, nanos)
    }

    /// Project this instant into a civil time zone.
    pub fn to_local<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.to_utc().map(|utc| utc.with_timezone(tz))
    }

    /// Build an instant from a `chrono::DateTime<Utc>`, read as Universal Time.
    pub fn from_utc(datetime: DateTime<Utc>) -> Self {
        use super::scales::UT;
        let seconds_since_epoch = Seconds::new(datetime.timestamp() as f64);
        let nanos = Seconds::new(datetime.timestamp_subsec_nanos() as f64 / 1e9);
        let jd_ut = UNIX_EPOCH_JD + (seconds_since_epoch + nanos).to::<Day>();
        Time::<UT>::from_days(jd_ut).to::<S>()
    }

    /// Element-wise minimum.
    #[inline]
    pub const fn min(self, other: Self) -> Self {
        Self::from_days(self.quantity.min_const(other.quantity))
    }

    /// Element-wise maximum.
    #[inline]
    pub const fn max(self, other: Self) -> Self {
        Self::from_days(self.quantity.max_const(other.quantity))
    }

    /// Midpoint between two instants on the same scale.
    #[inline]
    pub const fn mean(self, other: Self) -> Self {
        Self::from_days(self.quantity.const_add(other.quantity).const_div(2.0))
    }

    /// Instant at `fraction` of the way from `self` to `other`.
    ///
    /// `0.0` yields `self`, `1.0` yields `other`; values outside `[0, 1]`
    /// extrapolate along the same axis.
    #[inline]
    pub fn lerp(self, other: Self, fraction: f64) -> Self {
        self + (other - self) * fraction
    }
}

impl Time<super::scales::UT> {
    /// ΔT = TT − UT at this instant.
    #[inline]
    pub fn delta_t(&self) -> Seconds {
        super::delta_t::delta_t_seconds(self.quantity)
    }

    /// 00:00 Universal Time on the given calendar date.
    pub fn midnight(date: NaiveDate) -> Self {
        let seconds = date.and_time(NaiveTime::MIN).and_utc().timestamp();
        Self::from_days(UNIX_EPOCH_JD + Seconds::new(seconds as f64).to::<Day>())
    }
}

/// Minutes expressed as a [`Days`] quantity.
#[inline]
pub(crate) fn minutes(value: f64) -> Days {
    Seconds::new(value * 60.0).to::<Day>()
}

// ── Display ───────────────────────────────────────────────────────────────

impl<S: TimeScale> std::fmt::Display for Time<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", S::LABEL, self.quantity)
    }
}

// ── Serde ─────────────────────────────────────────────────────────────────

#[cfg(feature = "serde")]
impl<S: TimeScale> Serialize for Time<S> {
    fn serialize<Ser>(&self, serializer: Ser) -> Result<Ser::Ok, Ser::Error>
    where
        Ser: Serializer,
    {
        serializer.serialize_f64(self.value())
    }
}

#[cfg(feature = "serde")]
impl<'de, S: TimeScale> Deserialize<'de> for Time<S> {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let v = f64::deserialize(deserializer)?;
        Ok(Self::new(v))
    }
}

// ── Arithmetic ────────────────────────────────────────────────────────────

impl<S: TimeScale> Add<Days> for Time<S> {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity + rhs)
    }
}

impl<S: TimeScale> AddAssign<Days> for Time<S> {
    #[inline]
    fn add_assign(&mut self, rhs: Days) {
        self.quantity += rhs;
    }
}

impl<S: TimeScale> Sub<Days> for Time<S> {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Days) -> Self::Output {
        Self::from_days(self.quantity - rhs)
    }
}

impl<S: TimeScale> SubAssign<Days> for Time<S> {
    #[inline]
    fn sub_assign(&mut self, rhs: Days) {
        self.quantity -= rhs;
    }
}

impl<S: TimeScale> Sub for Time<S> {
    type Output = Days;
    #[inline]
    fn sub(self, rhs: Self) -> Self::Output {
        self.quantity - rhs.quantity
    }
}

impl<S: TimeScale> From<Time<S>> for Days {
    #[inline]
    fn from(time: Time<S>) -> Self {
        time.quantity
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Tests
// ═══════════════════════════════════════════════════════════════════════════

#[cfg(test)]
mod tests {
    use super::super::scales::{JD, UT};
    use super::*;
    use chrono::Offset;
    use chrono_tz::Asia::Jerusalem;

    #[test]
    fn midnight_is_half_day_on_julian_axis() {
        let date = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap();
        let midnight = Time::<UT>::midnight(date);
        assert_eq!(midnight.quantity(), Days::new(2_451_544.5));
    }

    #[test]
    fn utc_roundtrip_is_stable() {
        let datetime = DateTime::from_timestamp(1_757_739_600, 0).unwrap();
        let ut = Time::<UT>::from_utc(datetime);
        let back = ut.to_utc().expect("to_utc");
        let delta_ns =
            back.timestamp_nanos_opt().unwrap() - datetime.timestamp_nanos_opt().unwrap();
        assert!(delta_ns.abs() < 100_000, "roundtrip error: {} ns", delta_ns);
    }

    #[test]
    fn from_utc_on_tt_axis_applies_delta_t() {
        let datetime = DateTime::from_timestamp(946_728_000, 0).unwrap();
        let jd = Time::<JD>::from_utc(datetime);
        let delta_t = (jd.quantity() - Days::new(2_451_545.0)).to::<Second>();
        assert!(
            (delta_t - Seconds::new(63.86)).abs() < Seconds::new(1.0),
            "ΔT correction = {} s",
            delta_t
        );
    }

    #[test]
    fn local_projection_uses_zone_offset() {
        let date = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
        let noon_utc = Time::<UT>::midnight(date) + Days::new(0.5);
        let local = noon_utc.to_local(&Jerusalem).expect("in range");
        assert_eq!(local.offset().fix().local_minus_utc(), 3 * 3600);
    }

    #[test]
    fn minutes_helper_matches_day_fraction() {
        assert!((minutes(1440.0) - Days::new(1.0)).abs() < Days::new(1e-12));
        assert!((minutes(-30.0) + Days::new(30.0 / 1440.0)).abs() < Days::new(1e-12));
    }

    #[test]
    fn min_max_mean_and_lerp() {
        let a = Time::<UT>::new(10.0);
        let b = Time::<UT>::new(14.0);
        assert_eq!(a.min(b), a);
        assert_eq!(a.max(b), b);
        assert_eq!(a.mean(b).quantity(), Days::new(12.0));
        assert_eq!(a.lerp(b, 0.25).quantity(), Days::new(11.0));

        const MID: Time<UT> = Time::<UT>::new(10.0).mean(Time::<UT>::new(14.0));
        assert_eq!(MID.quantity(), Days::new(12.0));
    }

    #[test]
    fn add_assign_sub_assign() {
        let mut t = Time::<UT>::new(2_451_545.0);
        t += Days::new(1.0);
        assert_eq!(t.quantity(), Days::new(2_451_546.0));
        t -= Days::new(0.5);
        assert_eq!(t.quantity(), Days::new(2_451_545.5));
        assert_eq!(t - Time::<UT>::new(2_451_545.0), Days::new(0.5));
    }

    #[test]
    fn display_carries_scale_label() {
        let t = Time::<UT>::new(2_451_545.0);
        assert!(format!("{t}").starts_with("UT"));
    }
}
