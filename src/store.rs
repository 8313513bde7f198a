// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Shared catalog snapshots and per-date table memoisation.
//!
//! Neither type is needed for correctness: every computation in this crate
//! is a pure function.  They exist for long-running callers that reload
//! configuration or answer repeated queries for the same date.

use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::NaiveDate;
use parking_lot::RwLock;
use tracing::{debug, info};

use crate::location::Location;
use crate::zmanim::{derive_all, Catalog, ZmanimTable};

#[cfg(feature = "serde")]
use crate::error::Result;

/// Holds the current catalog as an immutable snapshot.
///
/// Readers take an `Arc` and keep using it for the whole request; a reload
/// swaps in a new snapshot without touching the old one, so a resolution
/// in flight never sees a half-updated catalog.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    current: Arc<RwLock<Arc<Catalog>>>,
}

impl Default for CatalogStore {
    fn default() -> Self {
        Self::new(Catalog::standard())
    }
}

impl CatalogStore {
    pub fn new(catalog: Catalog) -> Self {
        Self {
            current: Arc::new(RwLock::new(Arc::new(catalog))),
        }
    }

    /// The catalog in force right now.
    pub fn snapshot(&self) -> Arc<Catalog> {
        self.current.read().clone()
    }

    pub fn version(&self) -> String {
        self.current.read().version().to_string()
    }

    /// Install `catalog`, returning the snapshot it replaces.
    pub fn install(&self, catalog: Catalog) -> Arc<Catalog> {
        let next = Arc::new(catalog);
        let mut guard = self.current.write();
        info!(
            from = guard.version(),
            to = next.version(),
            entries = next.len(),
            "installed zmanim catalog"
        );
        std::mem::replace(&mut *guard, next)
    }

    /// Parse and validate `json`, then install it. On error the current
    /// catalog stays in force.
    #[cfg(feature = "serde")]
    pub fn reload_json(&self, json: &str) -> Result<Arc<Catalog>> {
        let catalog = Catalog::from_json(json)?;
        self.install(catalog);
        Ok(self.snapshot())
    }
}

/// Memoised tables for one location, keyed by date and catalog version.
#[derive(Debug)]
pub struct TableCache {
    location: Location,
    tables: RwLock<BTreeMap<(NaiveDate, String), Arc<ZmanimTable>>>,
}

impl TableCache {
    pub fn new(location: Location) -> Self {
        Self {
            location,
            tables: RwLock::new(BTreeMap::new()),
        }
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// The table for `date` under `catalog`, derived on first request.
    pub fn get_or_derive(&self, date: NaiveDate, catalog: &Catalog) -> Arc<ZmanimTable> {
        let key = (date, catalog.version().to_string());
        if let Some(table) = self.tables.read().get(&key) {
            return Arc::clone(table);
        }
        let table = Arc::new(derive_all(&self.location, date, catalog));
        let mut tables = self.tables.write();
        Arc::clone(tables.entry(key).or_insert(table))
    }

    /// Drop every table for a date before `today`.
    pub fn retain_from(&self, today: NaiveDate) -> usize {
        let mut tables = self.tables.write();
        let before = tables.len();
        tables.retain(|(date, _), _| *date >= today);
        let evicted = before - tables.len();
        if evicted > 0 {
            debug!(%today, evicted, "evicted cached zmanim tables");
        }
        evicted
    }

    pub fn len(&self) -> usize {
        self.tables.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.read().is_empty()
    }

    pub fn clear(&self) {
        self.tables.write().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::zmanim::{Strategy, ZmanDefinition};
    use chrono_tz::Asia::Jerusalem;
    use std::thread;

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 9, d).unwrap()
    }

    fn small(version: &str) -> Catalog {
        Catalog::new(
            version,
            vec![ZmanDefinition::new("tzais", Strategy::minutes_after("sunset", 42.0))],
        )
        .unwrap()
    }

    #[test]
    fn snapshots_survive_reload() {
        let store = CatalogStore::new(small("v1"));
        let held = store.snapshot();
        let previous = store.install(small("v2"));
        assert_eq!(previous.version(), "v1");
        assert_eq!(held.version(), "v1");
        assert_eq!(store.version(), "v2");
    }

    #[test]
    fn readers_on_other_threads_see_whole_catalogs() {
        let store = CatalogStore::new(small("v1"));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                thread::spawn(move || {
                    for _ in 0..100 {
                        let snapshot = store.snapshot();
                        assert_eq!(snapshot.len(), 1);
                    }
                })
            })
            .collect();
        for i in 0..20 {
            store.install(small(&format!("v{i}")));
        }
        for handle in handles {
            handle.join().unwrap();
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn bad_json_keeps_current_catalog() {
        let store = CatalogStore::new(small("v1"));
        assert!(store.reload_json("{not json").is_err());
        assert_eq!(store.version(), "v1");

        let json = r#"{"version": "v3", "entries": []}"#;
        assert_eq!(store.reload_json(json).unwrap().version(), "v3");
    }

    #[test]
    fn cache_memoises_and_evicts_by_date() {
        let location = Location::new(31.7650511, 35.1746302, 0.0, Jerusalem).unwrap();
        let cache = TableCache::new(location);
        let catalog = small("v1");

        let first = cache.get_or_derive(date(13), &catalog);
        let again = cache.get_or_derive(date(13), &catalog);
        assert!(Arc::ptr_eq(&first, &again));

        cache.get_or_derive(date(14), &catalog);
        cache.get_or_derive(date(14), &small("v2"));
        assert_eq!(cache.len(), 3);

        assert_eq!(cache.retain_from(date(14)), 1);
        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
    }
}
