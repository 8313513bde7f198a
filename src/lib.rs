// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Halachic times and prayer schedules.
//!
//! Given a [`Location`] and a calendar date, this crate computes the solar
//! events of the day, expands them into a table of named zmanim through a
//! declarative [`Catalog`], and resolves prayer definitions and Shabbat
//! windows against that table.
//!
//! # Pipeline
//!
//! | Stage | Entry point | Output |
//! |-------|-------------|--------|
//! | solar events | [`compute_solar_events`], [`GeoCalculator`] | [`SolarEvents`] |
//! | seasonal hours | [`seasonal_hour`], [`SeasonalHour`] | a [`qtty::Days`] duration |
//! | zmanim | [`derive_all`] | [`ZmanimTable`] |
//! | prayers | [`resolve_schedule`], [`PrayerRuleResolver`] | [`ResolvedPrayerInstance`]s |
//! | Shabbat and festivals | [`compute_shabbat_window`], [`compute_holiday_window`] | [`ShabbatWindow`] |
//!
//! Every stage is a pure function of its inputs.  Instants are
//! [`Time<UT>`] values (Julian days on the Universal Time axis) until they
//! are projected into the location's time zone for presentation.
//!
//! # Unreachable times
//!
//! At high latitudes the Sun may never reach a given depression angle, or
//! may not rise or set at all.  Such times are `None` in a
//! [`ZmanimTable`], propagate to everything derived from them, and show up
//! as [`PrayerTime::Unreachable`] in a schedule.  They are never replaced by
//! a default.  Configuration problems (bad coordinates, cyclic catalogs)
//! are reported as [`ZmanimError`] when the configuration is built.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use zmanim::{derive_all, Catalog, Location};
//!
//! let jerusalem = Location::with_zone_name(31.7650511, 35.1746302, 0.0, "Asia/Jerusalem")?;
//! let date = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
//! let table = derive_all(&jerusalem, date, &Catalog::standard());
//!
//! let sunrise = table.get("sunrise").unwrap();
//! let shma = table.get("sof_zman_shma_gra").unwrap();
//! assert!(sunrise < shma);
//! # Ok::<(), zmanim::ZmanimError>(())
//! ```
//!
//! # Features
//!
//! - `serde` (default): serde derives and JSON loading of catalogs and
//!   prayer definitions.

mod delta_t;
pub mod error;
pub(crate) mod instant;
mod julian_date_ext;
pub mod location;
mod period;
pub mod prayer;
pub(crate) mod scales;
pub mod seasonal;
pub mod shabbat;
pub mod solar;
pub mod store;
pub mod zmanim;

// ── Re-exports ────────────────────────────────────────────────────────────

pub use error::{Result, ZmanimError};
pub use instant::{Time, TimeScale};
pub use location::Location;
pub use period::Period;
pub use prayer::{
    resolve_schedule, ConditionalRule, DayType, DayTypeCalendar, MonthDay, PrayerDefinition,
    PrayerRuleResolver, PrayerStatus, PrayerTime, Recurrence, ResolvedPrayerInstance, Season,
    SeasonPolicy, TimeMode, WeekdayCalendar,
};
pub use scales::{JD, UT};
pub use seasonal::{seasonal_hour, SeasonalHour};
pub use shabbat::{compute_holiday_window, compute_shabbat_window, ShabbatConventions, ShabbatWindow};
pub use solar::{compute_solar_events, GeoCalculator, SolarEvents};
pub use store::{CatalogStore, TableCache};
pub use zmanim::{
    derive_all, derive_range, Catalog, Convention, Direction, Strategy, ZmanDefinition, ZmanimTable,
};

#[cfg(feature = "serde")]
pub use prayer::load_prayer_definitions;

/// Julian Date on the TT axis.
pub type JulianDate = Time<JD>;

/// Julian Date on the Universal Time axis, the crate's instant type.
pub type UniversalTime = Time<UT>;
