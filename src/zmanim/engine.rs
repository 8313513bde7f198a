// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Catalog-driven derivation of a [`ZmanimTable`].

use std::collections::BTreeMap;

use chrono::NaiveDate;
use tracing::{debug, trace, warn};

use super::catalog::{
    Boundary, Catalog, Convention, Direction, Strategy, ZmanDefinition, FIXED_LOCAL_CHATZOS,
    SEA_LEVEL_SUNRISE, SEA_LEVEL_SUNSET, SOLAR_MIDNIGHT, SOLAR_NOON, SUNRISE, SUNSET,
};
use super::table::ZmanimTable;
use crate::error::{Result, ZmanimError};
use crate::instant::{minutes, Time};
use crate::location::Location;
use crate::scales::UT;
use crate::seasonal::SeasonalHour;
use crate::solar::GeoCalculator;

type Values = BTreeMap<String, Option<Time<UT>>>;

impl Direction {
    fn apply(self, base: Time<UT>, offset: qtty::Days) -> Time<UT> {
        match self {
            Direction::Before => base - offset,
            Direction::After => base + offset,
        }
    }
}

/// Derive every entry of `catalog` for `location` on the local date `date`.
///
/// Primitives come first, then definitions in the catalog's dependency
/// order. An entry whose inputs are unreachable is itself unreachable; no
/// default is ever substituted. The result depends only on the arguments.
pub fn derive_all(location: &Location, date: NaiveDate, catalog: &Catalog) -> ZmanimTable {
    let calculator = GeoCalculator::new(*location);
    let events = calculator.solar_events(date);

    let mut values = Values::new();
    values.insert(SUNRISE.into(), events.sunrise);
    values.insert(SUNSET.into(), events.sunset);
    values.insert(SEA_LEVEL_SUNRISE.into(), events.sea_level_sunrise);
    values.insert(SEA_LEVEL_SUNSET.into(), events.sea_level_sunset);
    values.insert(SOLAR_NOON.into(), Some(events.solar_noon));
    values.insert(SOLAR_MIDNIGHT.into(), Some(events.solar_midnight));
    values.insert(
        FIXED_LOCAL_CHATZOS.into(),
        Some(calculator.fixed_local_chatzos(date)),
    );

    for definition in catalog.ordered() {
        let value = evaluate(&calculator, date, definition, &values);
        if value.is_none() {
            trace!(zman = %definition.name, %date, "unreachable");
        }
        values.insert(definition.name.clone(), value);
    }

    let table = ZmanimTable::new(date, *location, catalog.version(), values);
    debug!(
        %date,
        catalog_version = catalog.version(),
        entries = table.len(),
        unreachable = table.unreachable().count(),
        "derived zmanim table"
    );
    table
}

/// One table per date in `start..=end`.
pub fn derive_range(
    location: &Location,
    start: NaiveDate,
    end: NaiveDate,
    catalog: &Catalog,
) -> Result<Vec<ZmanimTable>> {
    if end < start {
        return Err(ZmanimError::InvalidDateRange { start, end });
    }
    Ok(start
        .iter_days()
        .take_while(|date| *date <= end)
        .map(|date| derive_all(location, date, catalog))
        .collect())
}

fn evaluate(
    calculator: &GeoCalculator,
    date: NaiveDate,
    definition: &ZmanDefinition,
    values: &Values,
) -> Option<Time<UT>> {
    let lookup = |name: &str| values.get(name).copied().flatten();

    match &definition.strategy {
        Strategy::FixedMinutes {
            event,
            minutes: offset,
            direction,
        } => Some(direction.apply(lookup(event)?, minutes(*offset))),

        Strategy::DepressionAngle {
            degrees,
            before_noon,
        } => calculator.event_at_depression_angle(date, *degrees, *before_noon),

        Strategy::ProportionalHours {
            day_start,
            day_end,
            hours,
            from,
            direction,
        } => {
            let start = lookup(day_start)?;
            let end = lookup(day_end)?;
            let hour = match SeasonalHour::between(start, end) {
                Ok(hour) => hour,
                Err(err) => {
                    warn!(zman = %definition.name, %date, %err, "inverted day anchors");
                    return None;
                }
            };
            let base = match from {
                Boundary::Start => start,
                Boundary::End => end,
            };
            Some(direction.apply(base, hour.offset(*hours)))
        }

        Strategy::Composed { convention } => match convention {
            Convention::Midpoint { first, second } => Some(lookup(first)?.mean(lookup(second)?)),
            Convention::Fraction {
                start,
                end,
                fraction,
            } => Some(lookup(start)?.lerp(lookup(end)?, *fraction)),
            Convention::LaterOf { events } => events
                .iter()
                .map(|name| lookup(name))
                .collect::<Option<Vec<_>>>()?
                .into_iter()
                .reduce(Time::max),
            Convention::EarlierOf { events } => events
                .iter()
                .map(|name| lookup(name))
                .collect::<Option<Vec<_>>>()?
                .into_iter()
                .reduce(Time::min),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Jerusalem;
    use qtty::{Days, Second, Seconds};

    fn jerusalem() -> Location {
        Location::new(31.7650511, 35.1746302, 0.0, Jerusalem).unwrap()
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, 13).unwrap()
    }

    fn close(a: Time<UT>, b: Time<UT>) -> bool {
        (a - b).to::<Second>().abs() < Seconds::new(1e-3)
    }

    #[test]
    fn primitives_are_always_present() {
        let empty = Catalog::new("empty", Vec::new()).unwrap();
        let table = derive_all(&jerusalem(), date(), &empty);
        assert_eq!(table.len(), 7);
        assert!(table.get(SUNRISE).is_some());
        assert!(table.get(SOLAR_MIDNIGHT).unwrap() > table.get(SOLAR_NOON).unwrap());
    }

    #[test]
    fn fixed_minutes_offset_the_event() {
        let catalog = Catalog::new(
            "t",
            vec![ZmanDefinition::new("tzais_72", Strategy::minutes_after(SUNSET, 72.0))],
        )
        .unwrap();
        let table = derive_all(&jerusalem(), date(), &catalog);
        let delta = table.get("tzais_72").unwrap() - table.get(SUNSET).unwrap();
        assert!((delta.to::<Second>() - Seconds::new(72.0 * 60.0)).abs() < Seconds::new(1e-3));
    }

    #[test]
    fn proportional_hours_use_their_anchor_pair() {
        let catalog = Catalog::new(
            "t",
            vec![
                ZmanDefinition::new("shma", Strategy::hours_into(SUNRISE, SUNSET, 3.0)),
                ZmanDefinition::new(
                    "alos_zmanis",
                    Strategy::hours_outside(SUNRISE, SUNSET, 1.2, true),
                ),
                ZmanDefinition::new(
                    "tzais_zmanis",
                    Strategy::hours_outside(SUNRISE, SUNSET, 1.2, false),
                ),
            ],
        )
        .unwrap();
        let table = derive_all(&jerusalem(), date(), &catalog);
        let sunrise = table.get(SUNRISE).unwrap();
        let sunset = table.get(SUNSET).unwrap();
        let hour = (sunset - sunrise) / 12.0;

        assert!(close(table.get("shma").unwrap(), sunrise + hour * 3.0));
        assert!(close(table.get("alos_zmanis").unwrap(), sunrise - hour * 1.2));
        assert!(close(table.get("tzais_zmanis").unwrap(), sunset + hour * 1.2));
    }

    #[test]
    fn composed_conventions() {
        let catalog = Catalog::new(
            "t",
            vec![
                ZmanDefinition::new("mid", Strategy::midpoint(SUNRISE, SUNSET)),
                ZmanDefinition::new(
                    "quarter",
                    Strategy::Composed {
                        convention: Convention::Fraction {
                            start: SUNRISE.into(),
                            end: SUNSET.into(),
                            fraction: 0.25,
                        },
                    },
                ),
                ZmanDefinition::new("later", Strategy::later_of(&[SUNRISE, "mid", SUNSET])),
                ZmanDefinition::new("earlier", Strategy::earlier_of(&[SUNSET, "quarter"])),
            ],
        )
        .unwrap();
        let table = derive_all(&jerusalem(), date(), &catalog);
        let sunrise = table.get(SUNRISE).unwrap();
        let sunset = table.get(SUNSET).unwrap();
        assert!(close(table.get("mid").unwrap(), sunrise.mean(sunset)));
        assert!(close(table.get("quarter").unwrap(), sunrise + (sunset - sunrise) * 0.25));
        assert_eq!(table.get("later"), Some(sunset));
        assert_eq!(table.get("earlier"), table.get("quarter"));
    }

    #[test]
    fn unreachable_inputs_propagate() {
        let tromso = Location::new(69.6492, 18.9553, 0.0, chrono_tz::Europe::Oslo).unwrap();
        let midsummer = NaiveDate::from_ymd_opt(2025, 6, 21).unwrap();
        let catalog = Catalog::new(
            "t",
            vec![
                ZmanDefinition::new("alos", Strategy::dawn(16.1)),
                ZmanDefinition::new("tzais", Strategy::dusk(16.1)),
                ZmanDefinition::new("shma", Strategy::hours_into("alos", "tzais", 3.0)),
                ZmanDefinition::new("after_alos", Strategy::minutes_after("alos", 10.0)),
                ZmanDefinition::new("later", Strategy::later_of(&[SOLAR_NOON, "alos"])),
                ZmanDefinition::new("noon_plus", Strategy::minutes_after(SOLAR_NOON, 30.0)),
            ],
        )
        .unwrap();
        let table = derive_all(&tromso, midsummer, &catalog);
        for name in ["alos", "tzais", "shma", "after_alos", "later", SUNRISE] {
            assert!(table.is_unreachable(name), "{name} should be unreachable");
        }
        assert!(table.get("noon_plus").is_some());
    }

    #[test]
    fn inverted_anchor_pair_is_unreachable() {
        let catalog = Catalog::new(
            "t",
            vec![ZmanDefinition::new("backwards", Strategy::hours_into(SUNSET, SUNRISE, 3.0))],
        )
        .unwrap();
        let table = derive_all(&jerusalem(), date(), &catalog);
        assert!(table.is_unreachable("backwards"));
    }

    #[test]
    fn derivation_is_idempotent() {
        let catalog = Catalog::standard();
        let a = derive_all(&jerusalem(), date(), &catalog);
        let b = derive_all(&jerusalem(), date(), &catalog);
        assert_eq!(a, b);
    }

    #[test]
    fn standard_table_is_ordered_through_the_day() {
        let table = derive_all(&jerusalem(), date(), &Catalog::standard());
        let sequence = [
            "alos_19_8_degrees",
            "alos_16_1_degrees",
            "misheyakir_11_5_degrees",
            SUNRISE,
            "sof_zman_shma_mga",
            "sof_zman_shma_gra",
            "sof_zman_tfila_gra",
            "chatzos",
            "mincha_gedola_gra",
            "mincha_ketana_gra",
            "plag_hamincha_gra",
            SUNSET,
            "tzais_geonim_8_5_degrees",
            "tzais_72",
            "chatzos_layla",
        ];
        let times: Vec<Time<UT>> = sequence
            .iter()
            .map(|name| table.get(name).unwrap_or_else(|| panic!("{name} missing")))
            .collect();
        for (pair, names) in times.windows(2).zip(sequence.windows(2)) {
            assert!(pair[0] < pair[1], "{} !< {}", names[0], names[1]);
        }
        assert!(table.unreachable().next().is_none());
        // Chatzos as solar transit and as half-day agree within a minute.
        let transit = table.get("chatzos").unwrap();
        let half_day = table.get("chatzos_as_half_day").unwrap();
        assert!((transit - half_day).abs() < Days::new(1.0 / 1440.0));
    }

    #[test]
    fn range_covers_each_date() {
        let catalog = Catalog::new("empty", Vec::new()).unwrap();
        let start = date();
        let end = start + chrono::Days::new(6);
        let tables = derive_range(&jerusalem(), start, end, &catalog).unwrap();
        assert_eq!(tables.len(), 7);
        assert_eq!(tables[6].date(), end);
        assert!(matches!(
            derive_range(&jerusalem(), end, start, &catalog),
            Err(ZmanimError::InvalidDateRange { .. })
        ));
    }
}
