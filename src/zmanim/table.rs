// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Per-date table of derived zmanim.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate, Utc};
use chrono_tz::Tz;

use crate::instant::Time;
use crate::location::Location;
use crate::scales::UT;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Every catalog entry for one location and local calendar date.
///
/// A `None` value means the entry is geometrically undefined on that date
/// (or depends on something that is); it is still present, so
/// [`contains`](Self::contains) separates "unreachable" from "not in the
/// catalog". Nightfall entries may fall after local midnight and stay
/// labelled under the originating date.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZmanimTable {
    date: NaiveDate,
    location: Location,
    catalog_version: String,
    entries: BTreeMap<String, Option<Time<UT>>>,
}

impl ZmanimTable {
    pub(crate) fn new(
        date: NaiveDate,
        location: Location,
        catalog_version: impl Into<String>,
        entries: BTreeMap<String, Option<Time<UT>>>,
    ) -> Self {
        Self {
            date,
            location,
            catalog_version: catalog_version.into(),
            entries,
        }
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    pub fn catalog_version(&self) -> &str {
        &self.catalog_version
    }

    /// Instant of `name`, or `None` if it is unreachable or unknown.
    pub fn get(&self, name: &str) -> Option<Time<UT>> {
        self.entries.get(name).copied().flatten()
    }

    /// Raw entry: `None` if unknown, `Some(None)` if unreachable.
    pub fn entry(&self, name: &str) -> Option<Option<Time<UT>>> {
        self.entries.get(name).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    /// Whether `name` is in the table but undefined on this date.
    pub fn is_unreachable(&self, name: &str) -> bool {
        matches!(self.entries.get(name), Some(None))
    }

    pub fn utc(&self, name: &str) -> Option<DateTime<Utc>> {
        self.get(name)?.to_utc()
    }

    /// `name` projected into the location's time zone.
    pub fn local(&self, name: &str) -> Option<DateTime<Tz>> {
        self.get(name)?.to_local(&self.location.time_zone())
    }

    /// Entries in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Option<Time<UT>>)> + '_ {
        self.entries.iter().map(|(name, value)| (name.as_str(), *value))
    }

    /// Names of the unreachable entries.
    pub fn unreachable(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| name.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use chrono_tz::Asia::Jerusalem;

    fn table() -> ZmanimTable {
        let date = NaiveDate::from_ymd_opt(2025, 9, 13).unwrap();
        let location = Location::new(31.7650511, 35.1746302, 0.0, Jerusalem).unwrap();
        let noon = Time::<UT>::midnight(date) + qtty::Days::new(0.4);
        let mut entries = BTreeMap::new();
        entries.insert("noonish".to_string(), Some(noon));
        entries.insert("never".to_string(), None);
        ZmanimTable::new(date, location, "t", entries)
    }

    #[test]
    fn distinguishes_unknown_from_unreachable() {
        let t = table();
        assert!(t.get("noonish").is_some());
        assert_eq!(t.get("never"), None);
        assert_eq!(t.get("missing"), None);
        assert_eq!(t.entry("never"), Some(None));
        assert_eq!(t.entry("missing"), None);
        assert!(t.is_unreachable("never"));
        assert!(!t.is_unreachable("missing"));
        assert_eq!(t.unreachable().collect::<Vec<_>>(), ["never"]);
    }

    #[test]
    fn projects_to_local_time() {
        let t = table();
        // 0.4 d = 09:36 UT, 12:36 IDT.
        let local = t.local("noonish").unwrap();
        assert_eq!(local.hour(), 12);
        assert!(t.local("never").is_none());
        assert_eq!(t.utc("noonish").unwrap().hour(), 9);
    }
}
