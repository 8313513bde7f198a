// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! # ΔT (Delta T) — UT↔TT correction
//!
//! Piecewise polynomials for **ΔT = TT − UT** from Espenak & Meeus,
//! *Five Millennium Canon of Solar Eclipses* (NASA/TP-2006-214141), covering
//! 1900–2150 segment by segment and falling back to the long-term parabola
//! of Morrison & Stephenson (2004) outside that range.
//!
//! The correction is applied automatically by the [`UT`](super::UT) scale
//! whenever a solar event is evaluated on the TT axis.  Its effect on rise
//! and set times is second-order (the Sun moves ~0.04″ in longitude per
//! second), but keeping it makes the solar series consistent with their
//! published epoch.

use qtty::{Days, Seconds};

/// JD(UT) of 2000-01-01T00:00.
const JD_YEAR_2000: f64 = 2_451_544.5;

/// Mean Gregorian year in days.
const DAYS_PER_YEAR: f64 = 365.2425;

/// Decimal year for a Julian day on the UT axis.
#[inline]
fn decimal_year(jd_ut: Days) -> f64 {
    2000.0 + (jd_ut.value() - JD_YEAR_2000) / DAYS_PER_YEAR
}

/// Long-term parabola, `u` in centuries since 1820.
#[inline]
fn long_term(year: f64) -> f64 {
    let u = (year - 1820.0) / 100.0;
    -20.0 + 32.0 * u * u
}

/// Returns **ΔT** in seconds for a Julian day on the UT axis.
pub(crate) fn delta_t_seconds(jd_ut: Days) -> Seconds {
    let y = decimal_year(jd_ut);
    let seconds = match y {
        y if y < 1900.0 => long_term(y),
        y if y < 1920.0 => {
            let t = y - 1900.0;
            -2.79 + t * (1.494119 + t * (-0.0598939 + t * (0.0061966 - 0.000197 * t)))
        }
        y if y < 1941.0 => {
            let t = y - 1920.0;
            21.20 + t * (0.84493 + t * (-0.076100 + 0.0020936 * t))
        }
        y if y < 1961.0 => {
            let t = y - 1950.0;
            29.07 + 0.407 * t - t * t / 233.0 + t * t * t / 2547.0
        }
        y if y < 1986.0 => {
            let t = y - 1975.0;
            45.45 + 1.067 * t - t * t / 260.0 - t * t * t / 718.0
        }
        y if y < 2005.0 => {
            let t = y - 2000.0;
            63.86
                + t * (0.3345
                    + t * (-0.060374 + t * (0.0017275 + t * (0.000651814 + 0.00002373599 * t))))
        }
        y if y < 2050.0 => {
            let t = y - 2000.0;
            62.92 + t * (0.32217 + 0.005589 * t)
        }
        y if y < 2150.0 => long_term(y) - 0.5628 * (2150.0 - y),
        y => long_term(y),
    };
    Seconds::new(seconds)
}
