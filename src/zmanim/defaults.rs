// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! The standard catalog.
//!
//! Each family below is a parameter list expanded into independent entries.
//! Minute-based and degree-based variants of the same zman are separate
//! rows; no conversion between minutes and degrees is assumed.

use super::catalog::{
    Catalog, Strategy, ZmanDefinition, FIXED_LOCAL_CHATZOS, SOLAR_MIDNIGHT, SOLAR_NOON, SUNRISE,
    SUNSET,
};

/// Version string of [`Catalog::standard`].
pub const STANDARD_VERSION: &str = "standard-1";

const ALOS_MINUTES: [f64; 5] = [60.0, 72.0, 90.0, 96.0, 120.0];
const ALOS_ZMANIS_MINUTES: [f64; 4] = [72.0, 90.0, 96.0, 120.0];
const ALOS_DEGREES: [f64; 5] = [16.1, 18.0, 19.0, 19.8, 26.0];
const MISHEYAKIR_DEGREES: [f64; 5] = [7.65, 9.5, 10.2, 11.0, 11.5];

const TZAIS_MINUTES: [f64; 9] = [20.0, 30.0, 42.0, 50.0, 60.0, 72.0, 90.0, 96.0, 120.0];
const TZAIS_ZMANIS_MINUTES: [f64; 4] = [72.0, 90.0, 96.0, 120.0];
const TZAIS_DEGREES: [f64; 4] = [16.1, 18.0, 19.8, 26.0];
const GEONIM_DEGREES: [f64; 15] = [
    3.65, 3.676, 3.7, 3.8, 4.37, 4.61, 4.8, 5.88, 5.95, 6.45, 7.083, 7.67, 8.5, 9.3, 9.75,
];

const YEREIM_MINUTES: [f64; 3] = [18.0, 16.875, 13.5];
/// Elevations of the Sun above the horizon; negated into depressions when used.
const YEREIM_DEGREES: [f64; 3] = [3.05, 2.8, 2.1];

const BAAL_HATANYA_HORIZON_DEGREES: f64 = 1.583;
const BAAL_HATANYA_ALOS_DEGREES: f64 = 16.9;
const BAAL_HATANYA_TZAIS_DEGREES: f64 = 6.0;
const ATERET_TORAH_TZAIS_MINUTES: f64 = 40.0;

/// Named day spans: `(label, day start, day end)`.
const DAY_SPANS: [(&str, &str, &str); 15] = [
    ("gra", SUNRISE, SUNSET),
    ("mga", "alos_72", "tzais_72"),
    ("mga_72_zmanis", "alos_72_zmanis", "tzais_72_zmanis"),
    ("mga_90", "alos_90", "tzais_90"),
    ("mga_90_zmanis", "alos_90_zmanis", "tzais_90_zmanis"),
    ("mga_96", "alos_96", "tzais_96"),
    ("mga_96_zmanis", "alos_96_zmanis", "tzais_96_zmanis"),
    ("mga_120", "alos_120", "tzais_120"),
    ("mga_16_1_degrees", "alos_16_1_degrees", "tzais_16_1_degrees"),
    ("mga_18_degrees", "alos_18_degrees", "tzais_18_degrees"),
    ("mga_19_8_degrees", "alos_19_8_degrees", "tzais_19_8_degrees"),
    ("ateret_torah", "alos_72_zmanis", "tzais_ateret_torah"),
    ("baal_hatanya", "sunrise_baal_hatanya", "sunset_baal_hatanya"),
    ("alos_16_1_to_sunset", "alos_16_1_degrees", SUNSET),
    (
        "alos_16_1_to_tzais_geonim_7_083_degrees",
        "alos_16_1_degrees",
        "tzais_geonim_7_083_degrees",
    ),
];

/// Markers computed for every day span, in seasonal hours from its start.
const DAY_MARKERS: [(&str, f64); 5] = [
    ("sof_zman_shma", 3.0),
    ("sof_zman_tfila", 4.0),
    ("mincha_gedola", 6.5),
    ("mincha_ketana", 9.5),
    ("plag_hamincha", 10.75),
];

const SAMUCH_LEMINCHA_KETANA_SPANS: [&str; 3] = ["gra", "mga_16_1_degrees", "mga"];
const CHAMETZ_SPANS: [&str; 4] = ["gra", "mga", "mga_16_1_degrees", "baal_hatanya"];

/// `16.1` → `"16_1"`, `-3.05` → `"3_05"`.
fn label(value: f64) -> String {
    format!("{}", value.abs()).replace('.', "_")
}

fn add(out: &mut Vec<ZmanDefinition>, name: impl Into<String>, strategy: Strategy, note: &str) {
    out.push(ZmanDefinition::new(name, strategy).with_description(note));
}

fn dawn_entries(out: &mut Vec<ZmanDefinition>) {
    for m in ALOS_MINUTES {
        add(
            out,
            format!("alos_{}", label(m)),
            Strategy::minutes_before(SUNRISE, m),
            "fixed minutes before sunrise",
        );
    }
    for m in ALOS_ZMANIS_MINUTES {
        add(
            out,
            format!("alos_{}_zmanis", label(m)),
            Strategy::hours_outside(SUNRISE, SUNSET, m / 60.0, true),
            "zmaniyos minutes of the GRA day before sunrise",
        );
    }
    for d in ALOS_DEGREES {
        add(
            out,
            format!("alos_{}_degrees", label(d)),
            Strategy::dawn(d),
            "sun below the horizon before sunrise",
        );
    }
    add(
        out,
        "alos_hashachar",
        Strategy::minutes_before("alos_16_1_degrees", 0.0),
        "default dawn at 16.1°",
    );
    add(
        out,
        "alos_baal_hatanya",
        Strategy::dawn(BAAL_HATANYA_ALOS_DEGREES),
        "Baal HaTanya dawn",
    );
    for d in MISHEYAKIR_DEGREES {
        add(
            out,
            format!("misheyakir_{}_degrees", label(d)),
            Strategy::dawn(d),
            "earliest tallis and tefillin",
        );
    }
    add(
        out,
        "sunrise_baal_hatanya",
        Strategy::dawn(BAAL_HATANYA_HORIZON_DEGREES),
        "Baal HaTanya netz amiti",
    );
}

fn midday_entries(out: &mut Vec<ZmanDefinition>) {
    add(out, "chatzos", Strategy::minutes_after(SOLAR_NOON, 0.0), "solar transit");
    add(
        out,
        "chatzos_as_half_day",
        Strategy::midpoint(SUNRISE, SUNSET),
        "halfway between sunrise and sunset",
    );
    add(
        out,
        "chatzos_layla",
        Strategy::minutes_after(SOLAR_MIDNIGHT, 0.0),
        "solar anti-transit",
    );
}

fn nightfall_entries(out: &mut Vec<ZmanDefinition>) {
    add(
        out,
        "sunset_baal_hatanya",
        Strategy::dusk(BAAL_HATANYA_HORIZON_DEGREES),
        "Baal HaTanya shkiah amitis",
    );
    for m in TZAIS_MINUTES {
        add(
            out,
            format!("tzais_{}", label(m)),
            Strategy::minutes_after(SUNSET, m),
            "fixed minutes after sunset",
        );
    }
    for m in TZAIS_ZMANIS_MINUTES {
        add(
            out,
            format!("tzais_{}_zmanis", label(m)),
            Strategy::hours_outside(SUNRISE, SUNSET, m / 60.0, false),
            "zmaniyos minutes of the GRA day after sunset",
        );
    }
    for d in GEONIM_DEGREES {
        add(
            out,
            format!("tzais_geonim_{}_degrees", label(d)),
            Strategy::dusk(d),
            "three small stars",
        );
    }
    for d in TZAIS_DEGREES {
        add(
            out,
            format!("tzais_{}_degrees", label(d)),
            Strategy::dusk(d),
            "sun below the horizon after sunset",
        );
    }
    add(
        out,
        "tzais",
        Strategy::minutes_after("tzais_geonim_8_5_degrees", 0.0),
        "default nightfall at 8.5°",
    );
    add(
        out,
        "tzais_baal_hatanya",
        Strategy::dusk(BAAL_HATANYA_TZAIS_DEGREES),
        "Baal HaTanya nightfall",
    );
    add(
        out,
        "tzais_ateret_torah",
        Strategy::minutes_after(SUNSET, ATERET_TORAH_TZAIS_MINUTES),
        "Ateret Torah nightfall",
    );
}

fn twilight_entries(out: &mut Vec<ZmanDefinition>) {
    add(
        out,
        "bein_hashmashos_rt_13_24_degrees",
        Strategy::dusk(13.24),
        "Rabbeinu Tam",
    );
    add(
        out,
        "bein_hashmashos_rt_58_5_minutes",
        Strategy::minutes_after(SUNSET, 58.5),
        "Rabbeinu Tam",
    );
    add(
        out,
        "bein_hashmashos_rt_13_5_minutes_before_7_083_degrees",
        Strategy::minutes_before("tzais_geonim_7_083_degrees", 13.5),
        "Rabbeinu Tam",
    );
    for m in YEREIM_MINUTES {
        add(
            out,
            format!("bein_hashmashos_yereim_{}_minutes", label(m)),
            Strategy::minutes_before(SUNSET, m),
            "Yereim",
        );
    }
    for d in YEREIM_DEGREES {
        add(
            out,
            format!("bein_hashmashos_yereim_{}_degrees", label(d)),
            Strategy::dusk(-d),
            "Yereim, sun above the horizon",
        );
    }
}

fn day_span_entries(out: &mut Vec<ZmanDefinition>) {
    for (span, start, end) in DAY_SPANS {
        for (marker, hours) in DAY_MARKERS {
            add(
                out,
                format!("{marker}_{span}"),
                Strategy::hours_into(start, end, hours),
                "seasonal hours into the day",
            );
        }
    }
    let span_of = |label: &str| DAY_SPANS.iter().find(|(span, _, _)| *span == label);
    for span in SAMUCH_LEMINCHA_KETANA_SPANS {
        if let Some((_, start, end)) = span_of(span) {
            add(
                out,
                format!("samuch_lemincha_ketana_{span}"),
                Strategy::hours_into(start, end, 9.0),
                "half an hour before mincha ketana",
            );
        }
    }
    for span in CHAMETZ_SPANS {
        if let Some((_, start, end)) = span_of(span) {
            add(
                out,
                format!("sof_zman_achilas_chametz_{span}"),
                Strategy::hours_into(start, end, 4.0),
                "last time to eat chametz",
            );
            add(
                out,
                format!("sof_zman_biur_chametz_{span}"),
                Strategy::hours_into(start, end, 5.0),
                "last time to burn chametz",
            );
        }
    }
}

fn fixed_clock_entries(out: &mut Vec<ZmanDefinition>) {
    add(
        out,
        "sof_zman_shma_3_hours_before_chatzos",
        Strategy::minutes_before("chatzos", 180.0),
        "clock hours before chatzos",
    );
    add(
        out,
        "sof_zman_tfila_2_hours_before_chatzos",
        Strategy::minutes_before("chatzos", 120.0),
        "clock hours before chatzos",
    );
    add(
        out,
        "sof_zman_shma_fixed_local",
        Strategy::minutes_before(FIXED_LOCAL_CHATZOS, 180.0),
        "09:00 local mean time",
    );
    add(
        out,
        "sof_zman_tfila_fixed_local",
        Strategy::minutes_before(FIXED_LOCAL_CHATZOS, 120.0),
        "10:00 local mean time",
    );
    add(
        out,
        "mincha_gedola_30_minutes",
        Strategy::minutes_after("chatzos", 30.0),
        "half an hour after chatzos",
    );
    for span in ["gra", "baal_hatanya", "ateret_torah"] {
        let proportional = format!("mincha_gedola_{span}");
        add(
            out,
            format!("mincha_gedola_{span}_greater_than_30"),
            Strategy::later_of(&["mincha_gedola_30_minutes", proportional.as_str()]),
            "later of half a seasonal hour and 30 minutes after chatzos",
        );
    }
}

impl Catalog {
    /// The built-in catalog: dawn, midday, nightfall and twilight variants,
    /// plus the seasonal-hour markers of every common day definition.
    pub fn standard() -> Catalog {
        let mut entries = Vec::with_capacity(170);
        dawn_entries(&mut entries);
        midday_entries(&mut entries);
        nightfall_entries(&mut entries);
        twilight_entries(&mut entries);
        day_span_entries(&mut entries);
        fixed_clock_entries(&mut entries);
        Catalog::new(STANDARD_VERSION, entries).expect("standard catalog is a valid DAG")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zmanim::catalog::{Convention, Direction};

    #[test]
    fn labels_drop_sign_and_dot() {
        assert_eq!(label(16.1), "16_1");
        assert_eq!(label(72.0), "72");
        assert_eq!(label(7.083), "7_083");
        assert_eq!(label(-3.05), "3_05");
    }

    #[test]
    fn standard_catalog_is_large_and_valid() {
        let catalog = Catalog::standard();
        assert!(catalog.len() >= 150, "only {} entries", catalog.len());
        assert_eq!(catalog.version(), STANDARD_VERSION);
        for name in [
            "alos_72",
            "alos_16_1_degrees",
            "misheyakir_11_5_degrees",
            "chatzos",
            "sof_zman_shma_gra",
            "sof_zman_shma_mga",
            "sof_zman_tfila_baal_hatanya",
            "plag_hamincha_ateret_torah",
            "mincha_gedola_gra_greater_than_30",
            "tzais_geonim_7_083_degrees",
            "bein_hashmashos_yereim_16_875_minutes",
            "sof_zman_biur_chametz_mga_16_1_degrees",
        ] {
            assert!(catalog.contains(name), "missing {name}");
        }
    }

    #[test]
    fn entries_keep_their_own_strategy() {
        let catalog = Catalog::standard();
        assert_eq!(
            catalog.get("alos_72").unwrap().strategy,
            Strategy::FixedMinutes {
                event: SUNRISE.into(),
                minutes: 72.0,
                direction: Direction::Before
            }
        );
        assert_eq!(
            catalog.get("alos_16_1_degrees").unwrap().strategy,
            Strategy::dawn(16.1)
        );
        assert_eq!(
            catalog.get("bein_hashmashos_yereim_2_1_degrees").unwrap().strategy,
            Strategy::dusk(-2.1)
        );
        match &catalog.get("mincha_gedola_gra_greater_than_30").unwrap().strategy {
            Strategy::Composed {
                convention: Convention::LaterOf { events },
            } => assert_eq!(events.len(), 2),
            other => panic!("unexpected strategy {other:?}"),
        }
    }

    #[test]
    fn every_entry_is_described() {
        assert!(Catalog::standard()
            .entries()
            .iter()
            .all(|entry| entry.description.is_some()));
    }
}
