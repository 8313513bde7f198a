// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Time-scale markers.
//!
//! | Marker | Axis | Used for |
//! |--------|------|----------|
//! | [`JD`] | Julian Date on the uniform TT axis | solar-coordinate series |
//! | [`UT`] | Julian Date on the Earth-rotation axis | every solar event and zman |
//!
//! Hour angles are measured against Earth's rotation, so rise/set times
//! land naturally on `UT`; the polynomial series for the Sun's longitude are
//! expressed in Julian centuries of TT, reached through `.to::<JD>()`.

use super::instant::TimeScale;
use qtty::Days;

/// Julian Date — the identity scale on the TT axis.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct JD;

impl TimeScale for JD {
    const LABEL: &'static str = "Julian Day:";

    #[inline(always)]
    fn to_jd_tt(value: Days) -> Days {
        value
    }

    #[inline(always)]
    fn from_jd_tt(jd_tt: Days) -> Days {
        jd_tt
    }
}

/// Universal Time — Julian Date tied to Earth's rotation.
///
/// Conversion to JD(TT) adds **ΔT**; the inverse solves
/// `ut + ΔT(ut) = tt` with a three-step fixed-point iteration.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd)]
pub struct UT;

impl TimeScale for UT {
    const LABEL: &'static str = "UT";

    #[inline]
    fn to_jd_tt(ut_value: Days) -> Days {
        let dt_secs = super::delta_t::delta_t_seconds(ut_value);
        ut_value + dt_secs.to::<qtty::Day>()
    }

    #[inline]
    fn from_jd_tt(jd_tt: Days) -> Days {
        // dΔT/dJD is of order 1e-8, so three steps are exact to f64 precision.
        let mut ut = jd_tt;
        for _ in 0..3 {
            let dt_days = super::delta_t::delta_t_seconds(ut).to::<qtty::Day>();
            ut = jd_tt - dt_days;
        }
        ut
    }
}

impl From<super::instant::Time<UT>> for super::instant::Time<JD> {
    #[inline]
    fn from(t: super::instant::Time<UT>) -> Self {
        t.to::<JD>()
    }
}

impl From<super::instant::Time<JD>> for super::instant::Time<UT> {
    #[inline]
    fn from(t: super::instant::Time<JD>) -> Self {
        t.to::<UT>()
    }
}

#[cfg(test)]
mod tests {
    use super::super::instant::Time;
    use super::*;
    use qtty::{Second, Seconds};

    #[test]
    fn ut_to_jd_applies_delta_t() {
        let ut = Time::<UT>::new(2_460_931.5);
        let jd: Time<JD> = ut.to::<JD>();
        let offset_secs = (jd.quantity() - ut.quantity()).to::<Second>();
        assert!(
            offset_secs > Seconds::new(60.0) && offset_secs < Seconds::new(80.0),
            "UT→JD offset = {} s",
            offset_secs
        );
    }

    #[test]
    fn ut_jd_roundtrip() {
        let jd = Time::<JD>::new(2_451_545.0);
        let ut: Time<UT> = jd.to::<UT>();
        let back: Time<JD> = ut.to::<JD>();
        assert!(
            (back.quantity() - jd.quantity()).abs() < Days::new(1e-12),
            "roundtrip error: {} days",
            (back.quantity() - jd.quantity()).abs()
        );
    }

    #[test]
    fn ut_from_into() {
        let ut = Time::<UT>::new(2_451_545.0);
        let jd: Time<JD> = ut.into();
        let back: Time<UT> = jd.into();
        assert!((back.quantity() - ut.quantity()).abs() < Days::new(1e-12));
    }
}
