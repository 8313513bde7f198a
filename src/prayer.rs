// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Prayer schedule resolution.
//!
//! A [`PrayerDefinition`] is declarative configuration: a time rule
//! ([`TimeMode`]) and a weekly [`Recurrence`].  Resolving it against a
//! [`ZmanimTable`] yields at most one [`ResolvedPrayerInstance`] per date:
//!
//! - definitions whose recurrence excludes the date are omitted;
//! - definitions whose time cannot be computed (an unreachable zman, or no
//!   conditional rule matching) are kept with [`PrayerTime::Unreachable`].
//!
//! Output is sorted by time, unreachable entries last in definition order.
//!
//! Season and day type come from outside: the season from a
//! [`SeasonPolicy`], the day type from a [`DayTypeCalendar`], which is the
//! seam a Hebrew-calendar implementation plugs into.

use std::cmp::Ordering;
use std::collections::BTreeSet;

use chrono::{DateTime, Datelike, Duration, NaiveDate, NaiveTime, TimeZone, Weekday};
use chrono_tz::{OffsetComponents, Tz};
use tracing::{debug, trace, warn};

use crate::error::{Result, ZmanimError};
use crate::instant::{minutes, Time};
use crate::location::Location;
use crate::solar::solar_declination;
use crate::zmanim::{derive_all, Catalog, ZmanimTable};
use crate::UT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

// ═══════════════════════════════════════════════════════════════════════════
// Season and day type
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Season {
    Summer,
    Winter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum DayType {
    Weekday,
    Shabbat,
    Holiday,
}

/// A calendar day without a year, compared month first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawMonthDay"))]
pub struct MonthDay {
    pub month: u32,
    pub day: u32,
}

impl MonthDay {
    /// Fails unless the pair names a day of a leap year.
    pub fn new(month: u32, day: u32) -> Result<Self> {
        if NaiveDate::from_ymd_opt(2000, month, day).is_none() {
            return Err(ZmanimError::invalid_definition(
                "season policy",
                format!("no such day {month:02}-{day:02}"),
            ));
        }
        Ok(Self { month, day })
    }

    fn of(date: NaiveDate) -> Self {
        Self {
            month: date.month(),
            day: date.day(),
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawMonthDay {
    month: u32,
    day: u32,
}

#[cfg(feature = "serde")]
impl TryFrom<RawMonthDay> for MonthDay {
    type Error = ZmanimError;

    fn try_from(raw: RawMonthDay) -> Result<Self> {
        MonthDay::new(raw.month, raw.day)
    }
}

/// How a date is classified as summer or winter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "policy", rename_all = "snake_case"))]
pub enum SeasonPolicy {
    /// Summer from `summer_start` (inclusive) to `winter_start` (exclusive),
    /// wrapping over the new year when `summer_start` is the later day.
    FixedCutover {
        summer_start: MonthDay,
        winter_start: MonthDay,
    },
    /// Summer while the Sun is over the observer's hemisphere.
    #[default]
    Equinox,
    /// Summer while the location's zone observes daylight saving time.
    DaylightSaving,
}

impl SeasonPolicy {
    pub fn season(&self, location: &Location, date: NaiveDate) -> Season {
        let summer = match self {
            SeasonPolicy::FixedCutover {
                summer_start,
                winter_start,
            } => {
                let today = MonthDay::of(date);
                if summer_start <= winter_start {
                    *summer_start <= today && today < *winter_start
                } else {
                    today >= *summer_start || today < *winter_start
                }
            }
            SeasonPolicy::Equinox => {
                let noon = Time::<UT>::midnight(date) + qtty::Days::new(0.5);
                let declination = solar_declination(noon);
                if location.latitude() >= 0.0 {
                    declination > 0.0
                } else {
                    declination < 0.0
                }
            }
            SeasonPolicy::DaylightSaving => {
                let noon = date.and_time(NaiveTime::from_hms_opt(12, 0, 0).unwrap_or(NaiveTime::MIN));
                location
                    .time_zone()
                    .from_local_datetime(&noon)
                    .earliest()
                    .map_or(false, |t| t.offset().dst_offset() != Duration::zero())
            }
        };
        if summer {
            Season::Summer
        } else {
            Season::Winter
        }
    }
}

/// Source of day types; the Hebrew calendar lives behind this trait.
pub trait DayTypeCalendar {
    fn day_type(&self, date: NaiveDate) -> DayType;
}

impl<F> DayTypeCalendar for F
where
    F: Fn(NaiveDate) -> DayType,
{
    fn day_type(&self, date: NaiveDate) -> DayType {
        self(date)
    }
}

/// Saturdays are Shabbat, listed dates are holidays, everything else is a
/// weekday.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WeekdayCalendar {
    holidays: BTreeSet<NaiveDate>,
}

impl WeekdayCalendar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_holidays(holidays: impl IntoIterator<Item = NaiveDate>) -> Self {
        Self {
            holidays: holidays.into_iter().collect(),
        }
    }
}

impl DayTypeCalendar for WeekdayCalendar {
    fn day_type(&self, date: NaiveDate) -> DayType {
        if self.holidays.contains(&date) {
            DayType::Holiday
        } else if date.weekday() == Weekday::Sat {
            DayType::Shabbat
        } else {
            DayType::Weekday
        }
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Definitions
// ═══════════════════════════════════════════════════════════════════════════

/// When a prayer takes place.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "mode", rename_all = "snake_case"))]
pub enum TimeMode {
    /// A local clock time.
    Fixed { time: NaiveTime },
    /// A table entry shifted by whole minutes (negative is earlier).
    ZmanBased {
        zman: String,
        #[cfg_attr(feature = "serde", serde(default))]
        offset_minutes: i32,
    },
    /// The first rule matching the date's season and day type.
    Conditional {
        rules: Vec<ConditionalRule>,
        #[cfg_attr(
            feature = "serde",
            serde(default, skip_serializing_if = "Option::is_none")
        )]
        fallback: Option<Box<TimeMode>>,
    },
}

/// A sub-rule of [`TimeMode::Conditional`]; absent criteria match anything.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ConditionalRule {
    #[cfg_attr(feature = "serde", serde(default))]
    pub season: Option<Season>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub day_type: Option<DayType>,
    pub time: TimeMode,
}

impl ConditionalRule {
    fn matches(&self, season: Season, day_type: DayType) -> bool {
        self.season.map_or(true, |s| s == season) && self.day_type.map_or(true, |d| d == day_type)
    }
}

impl TimeMode {
    fn zman_references<'a>(&'a self, out: &mut Vec<&'a str>) {
        match self {
            TimeMode::Fixed { .. } => {}
            TimeMode::ZmanBased { zman, .. } => out.push(zman),
            TimeMode::Conditional { rules, fallback } => {
                for rule in rules {
                    rule.time.zman_references(out);
                }
                if let Some(fallback) = fallback {
                    fallback.zman_references(out);
                }
            }
        }
    }
}

/// Weekdays (0 = Sunday … 6 = Saturday) a definition applies to, minus
/// exception dates.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Recurrence {
    #[cfg_attr(feature = "serde", serde(default = "all_weekdays"))]
    pub weekdays: BTreeSet<u8>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub exceptions: BTreeSet<NaiveDate>,
}

fn all_weekdays() -> BTreeSet<u8> {
    (0..7).collect()
}

impl Default for Recurrence {
    fn default() -> Self {
        Self::daily()
    }
}

impl Recurrence {
    pub fn daily() -> Self {
        Self {
            weekdays: all_weekdays(),
            exceptions: BTreeSet::new(),
        }
    }

    pub fn on(weekdays: impl IntoIterator<Item = u8>) -> Self {
        Self {
            weekdays: weekdays.into_iter().collect(),
            exceptions: BTreeSet::new(),
        }
    }

    pub fn except(mut self, date: NaiveDate) -> Self {
        self.exceptions.insert(date);
        self
    }

    pub fn applies_to(&self, date: NaiveDate) -> bool {
        let weekday = date.weekday().num_days_from_sunday() as u8;
        self.weekdays.contains(&weekday) && !self.exceptions.contains(&date)
    }
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrayerDefinition {
    pub id: String,
    pub name: String,
    pub time: TimeMode,
    #[cfg_attr(feature = "serde", serde(default))]
    pub recurrence: Recurrence,
}

impl PrayerDefinition {
    pub fn new(id: impl Into<String>, name: impl Into<String>, time: TimeMode) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            time,
            recurrence: Recurrence::daily(),
        }
    }

    pub fn with_recurrence(mut self, recurrence: Recurrence) -> Self {
        self.recurrence = recurrence;
        self
    }

    /// Check zman references and weekday numbers against `catalog`.
    pub fn validate_against(&self, catalog: &Catalog) -> Result<()> {
        if let Some(day) = self.recurrence.weekdays.iter().find(|&&d| d > 6) {
            return Err(ZmanimError::invalid_definition(
                &self.id,
                format!("weekday {day} outside 0..=6"),
            ));
        }
        let mut references = Vec::new();
        self.time.zman_references(&mut references);
        match references.into_iter().find(|zman| !catalog.contains(zman)) {
            Some(missing) => Err(ZmanimError::UnknownZman {
                owner: self.id.clone(),
                reference: missing.to_string(),
            }),
            None => Ok(()),
        }
    }
}

/// Parse a JSON array of prayer definitions and validate each against
/// `catalog`.
#[cfg(feature = "serde")]
pub fn load_prayer_definitions(json: &str, catalog: &Catalog) -> Result<Vec<PrayerDefinition>> {
    let definitions: Vec<PrayerDefinition> = serde_json::from_str(json)?;
    for definition in &definitions {
        definition.validate_against(catalog)?;
    }
    Ok(definitions)
}

// ═══════════════════════════════════════════════════════════════════════════
// Resolution
// ═══════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PrayerStatus {
    Scheduled,
    Unreachable,
}

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum PrayerTime {
    Scheduled(DateTime<Tz>),
    Unreachable,
}

impl PrayerTime {
    pub fn scheduled(&self) -> Option<&DateTime<Tz>> {
        match self {
            PrayerTime::Scheduled(time) => Some(time),
            PrayerTime::Unreachable => None,
        }
    }

    fn from_instant(instant: Option<Time<UT>>, tz: &Tz) -> Self {
        instant
            .and_then(|t| t.to_local(tz))
            .map_or(PrayerTime::Unreachable, PrayerTime::Scheduled)
    }
}

/// One prayer on one date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize))]
pub struct ResolvedPrayerInstance {
    pub definition_id: String,
    pub name: String,
    pub date: NaiveDate,
    pub time: PrayerTime,
}

impl ResolvedPrayerInstance {
    pub fn status(&self) -> PrayerStatus {
        match self.time {
            PrayerTime::Scheduled(_) => PrayerStatus::Scheduled,
            PrayerTime::Unreachable => PrayerStatus::Unreachable,
        }
    }
}

/// Scheduled by time, then unreachable; `sort_by` is stable so
/// unreachable entries keep definition order.
fn schedule_order(a: &ResolvedPrayerInstance, b: &ResolvedPrayerInstance) -> Ordering {
    match (&a.time, &b.time) {
        (PrayerTime::Scheduled(x), PrayerTime::Scheduled(y)) => x.cmp(y),
        (PrayerTime::Scheduled(_), PrayerTime::Unreachable) => Ordering::Less,
        (PrayerTime::Unreachable, PrayerTime::Scheduled(_)) => Ordering::Greater,
        (PrayerTime::Unreachable, PrayerTime::Unreachable) => Ordering::Equal,
    }
}

/// Local wall-clock `time` on `date`; a time skipped by a DST jump moves
/// forward by an hour, an ambiguous one takes the earlier instant.
fn local_clock_time(tz: &Tz, date: NaiveDate, time: NaiveTime) -> Option<DateTime<Tz>> {
    let naive = date.and_time(time);
    tz.from_local_datetime(&naive)
        .earliest()
        .or_else(|| tz.from_local_datetime(&(naive + Duration::hours(1))).earliest())
}

/// Resolves prayer definitions for one location.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrayerRuleResolver {
    location: Location,
    season_policy: SeasonPolicy,
}

impl PrayerRuleResolver {
    pub fn new(location: Location, season_policy: SeasonPolicy) -> Self {
        Self {
            location,
            season_policy,
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn season_policy(&self) -> SeasonPolicy {
        self.season_policy
    }

    /// Resolve `definitions` on `date` against `table`.
    ///
    /// A table derived for another date supplies no zmanim: every
    /// zman-based time is then unreachable.
    pub fn resolve(
        &self,
        date: NaiveDate,
        day_type: DayType,
        definitions: &[PrayerDefinition],
        table: &ZmanimTable,
    ) -> Vec<ResolvedPrayerInstance> {
        let season = self.season_policy.season(&self.location, date);
        let table = if table.date() == date {
            Some(table)
        } else {
            warn!(%date, table_date = %table.date(), "zmanim table is for another date");
            None
        };
        let mut instances: Vec<ResolvedPrayerInstance> = definitions
            .iter()
            .filter(|definition| {
                let applies = definition.recurrence.applies_to(date);
                if !applies {
                    trace!(id = %definition.id, %date, "excluded by recurrence");
                }
                applies
            })
            .map(|definition| ResolvedPrayerInstance {
                definition_id: definition.id.clone(),
                name: definition.name.clone(),
                date,
                time: self.resolve_time(&definition.time, date, season, day_type, table),
            })
            .collect();
        instances.sort_by(schedule_order);

        debug!(
            %date,
            ?season,
            ?day_type,
            definitions = definitions.len(),
            resolved = instances.len(),
            unreachable = instances
                .iter()
                .filter(|i| i.status() == PrayerStatus::Unreachable)
                .count(),
            "resolved prayer schedule"
        );
        instances
    }

    /// Resolve every date of `start..=end`, deriving one table per date
    /// from `catalog` and asking `calendar` for each day type.
    pub fn resolve_range(
        &self,
        start: NaiveDate,
        end: NaiveDate,
        calendar: &impl DayTypeCalendar,
        definitions: &[PrayerDefinition],
        catalog: &Catalog,
    ) -> Result<Vec<ResolvedPrayerInstance>> {
        if end < start {
            return Err(ZmanimError::InvalidDateRange { start, end });
        }
        let mut all = Vec::new();
        for date in start.iter_days().take_while(|date| *date <= end) {
            let table = derive_all(&self.location, date, catalog);
            all.extend(self.resolve(date, calendar.day_type(date), definitions, &table));
        }
        Ok(all)
    }

    fn resolve_time(
        &self,
        mode: &TimeMode,
        date: NaiveDate,
        season: Season,
        day_type: DayType,
        table: Option<&ZmanimTable>,
    ) -> PrayerTime {
        let tz = self.location.time_zone();
        match mode {
            TimeMode::Fixed { time } => local_clock_time(&tz, date, *time)
                .map_or(PrayerTime::Unreachable, PrayerTime::Scheduled),
            TimeMode::ZmanBased {
                zman,
                offset_minutes,
            } => {
                let instant = table
                    .and_then(|table| table.get(zman))
                    .map(|t| t + minutes(f64::from(*offset_minutes)));
                PrayerTime::from_instant(instant, &tz)
            }
            TimeMode::Conditional { rules, fallback } => {
                match rules.iter().find(|rule| rule.matches(season, day_type)) {
                    Some(rule) => self.resolve_time(&rule.time, date, season, day_type, table),
                    None => match fallback {
                        Some(mode) => self.resolve_time(mode, date, season, day_type, table),
                        None => PrayerTime::Unreachable,
                    },
                }
            }
        }
    }
}

/// Resolve `definitions` on `date` for the table's location, using the
/// default season policy and a plain weekday calendar.
pub fn resolve_schedule(
    date: NaiveDate,
    definitions: &[PrayerDefinition],
    table: &ZmanimTable,
) -> Vec<ResolvedPrayerInstance> {
    let resolver = PrayerRuleResolver::new(*table.location(), SeasonPolicy::default());
    resolver.resolve(date, WeekdayCalendar::new().day_type(date), definitions, table)
}
