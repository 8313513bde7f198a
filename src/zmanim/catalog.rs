// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Zman definitions and the validated catalog that orders them.
//!
//! A catalog is static configuration: a list of named definitions, each
//! carrying one derivation [`Strategy`].  Definitions may reference the
//! built-in solar primitives ([`PRIMITIVES`]) and each other.  Loading a
//! catalog checks that every reference resolves, that the reference graph is
//! acyclic, and that numeric parameters are usable; the resulting evaluation
//! order is stored so per-date derivation is a single forward pass.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::error::{Result, ZmanimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const SUNRISE: &str = "sunrise";
pub const SUNSET: &str = "sunset";
pub const SEA_LEVEL_SUNRISE: &str = "sea_level_sunrise";
pub const SEA_LEVEL_SUNSET: &str = "sea_level_sunset";
pub const SOLAR_NOON: &str = "solar_noon";
pub const SOLAR_MIDNIGHT: &str = "solar_midnight";
pub const FIXED_LOCAL_CHATZOS: &str = "fixed_local_chatzos";

/// Entries every table carries, computed directly from the solar calculator.
pub const PRIMITIVES: [&str; 7] = [
    SUNRISE,
    SUNSET,
    SEA_LEVEL_SUNRISE,
    SEA_LEVEL_SUNSET,
    SOLAR_NOON,
    SOLAR_MIDNIGHT,
    FIXED_LOCAL_CHATZOS,
];

/// Whether `name` is one of the built-in solar primitives.
pub fn is_primitive(name: &str) -> bool {
    PRIMITIVES.contains(&name)
}

// ═══════════════════════════════════════════════════════════════════════════
// Strategy
// ═══════════════════════════════════════════════════════════════════════════

/// Side of a reference instant an offset is applied on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Direction {
    Before,
    #[default]
    After,
}

/// End of a day span a proportional offset is measured from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Boundary {
    #[default]
    Start,
    End,
}

/// Composite formula over other entries of the same table.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "kind", rename_all = "snake_case"))]
pub enum Convention {
    /// Halfway between two entries.
    Midpoint { first: String, second: String },
    /// `start + fraction · (end − start)`.
    Fraction {
        start: String,
        end: String,
        fraction: f64,
    },
    /// Latest of the listed entries; unreachable if any is.
    LaterOf { events: Vec<String> },
    /// Earliest of the listed entries; unreachable if any is.
    EarlierOf { events: Vec<String> },
}

/// How one zman is derived.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(tag = "strategy", rename_all = "snake_case"))]
pub enum Strategy {
    /// Clock minutes before or after another entry.
    FixedMinutes {
        event: String,
        minutes: f64,
        direction: Direction,
    },
    /// The Sun `degrees` below the geometric horizon, dawn or dusk side.
    DepressionAngle { degrees: f64, before_noon: bool },
    /// `hours` seasonal hours of the `day_start`..`day_end` span, measured
    /// from one of its ends.
    ProportionalHours {
        day_start: String,
        day_end: String,
        hours: f64,
        #[cfg_attr(feature = "serde", serde(default))]
        from: Boundary,
        #[cfg_attr(feature = "serde", serde(default))]
        direction: Direction,
    },
    Composed { convention: Convention },
}

impl Strategy {
    pub fn minutes_before(event: &str, minutes: f64) -> Self {
        Strategy::FixedMinutes {
            event: event.to_string(),
            minutes,
            direction: Direction::Before,
        }
    }

    pub fn minutes_after(event: &str, minutes: f64) -> Self {
        Strategy::FixedMinutes {
            event: event.to_string(),
            minutes,
            direction: Direction::After,
        }
    }

    pub fn dawn(degrees: f64) -> Self {
        Strategy::DepressionAngle {
            degrees,
            before_noon: true,
        }
    }

    pub fn dusk(degrees: f64) -> Self {
        Strategy::DepressionAngle {
            degrees,
            before_noon: false,
        }
    }

    /// `hours` into the day running from `day_start` to `day_end`.
    pub fn hours_into(day_start: &str, day_end: &str, hours: f64) -> Self {
        Strategy::ProportionalHours {
            day_start: day_start.to_string(),
            day_end: day_end.to_string(),
            hours,
            from: Boundary::Start,
            direction: Direction::After,
        }
    }

    /// Proportional offset outside the day: `hours` before its start
    /// (dawn side) or after its end (dusk side).
    pub fn hours_outside(day_start: &str, day_end: &str, hours: f64, dawn_side: bool) -> Self {
        let (from, direction) = if dawn_side {
            (Boundary::Start, Direction::Before)
        } else {
            (Boundary::End, Direction::After)
        };
        Strategy::ProportionalHours {
            day_start: day_start.to_string(),
            day_end: day_end.to_string(),
            hours,
            from,
            direction,
        }
    }

    pub fn midpoint(first: &str, second: &str) -> Self {
        Strategy::Composed {
            convention: Convention::Midpoint {
                first: first.to_string(),
                second: second.to_string(),
            },
        }
    }

    pub fn later_of(events: &[&str]) -> Self {
        Strategy::Composed {
            convention: Convention::LaterOf {
                events: events.iter().map(|e| e.to_string()).collect(),
            },
        }
    }

    pub fn earlier_of(events: &[&str]) -> Self {
        Strategy::Composed {
            convention: Convention::EarlierOf {
                events: events.iter().map(|e| e.to_string()).collect(),
            },
        }
    }

    /// Names of the entries this strategy reads.
    pub fn dependencies(&self) -> Vec<&str> {
        match self {
            Strategy::FixedMinutes { event, .. } => vec![event.as_str()],
            Strategy::DepressionAngle { .. } => Vec::new(),
            Strategy::ProportionalHours {
                day_start, day_end, ..
            } => vec![day_start.as_str(), day_end.as_str()],
            Strategy::Composed { convention } => match convention {
                Convention::Midpoint { first, second } => vec![first.as_str(), second.as_str()],
                Convention::Fraction { start, end, .. } => vec![start.as_str(), end.as_str()],
                Convention::LaterOf { events } | Convention::EarlierOf { events } => {
                    events.iter().map(String::as_str).collect()
                }
            },
        }
    }

    fn validate(&self, name: &str) -> Result<()> {
        let finite = |label: &str, value: f64| {
            if value.is_finite() {
                Ok(())
            } else {
                Err(ZmanimError::invalid_definition(
                    name,
                    format!("{label} must be finite, got {value}"),
                ))
            }
        };
        match self {
            Strategy::FixedMinutes { minutes, .. } => {
                finite("minutes", *minutes)?;
                if *minutes < 0.0 {
                    return Err(ZmanimError::invalid_definition(
                        name,
                        "minutes must be non-negative; use the direction to go backwards",
                    ));
                }
            }
            Strategy::DepressionAngle { degrees, .. } => {
                finite("degrees", *degrees)?;
                if degrees.abs() >= 90.0 {
                    return Err(ZmanimError::invalid_definition(
                        name,
                        format!("depression angle {degrees}° outside (-90, 90)"),
                    ));
                }
            }
            Strategy::ProportionalHours { hours, .. } => {
                finite("hours", *hours)?;
                if *hours < 0.0 {
                    return Err(ZmanimError::invalid_definition(
                        name,
                        "hours must be non-negative; use the direction to go backwards",
                    ));
                }
            }
            Strategy::Composed { convention } => match convention {
                Convention::Fraction { fraction, .. } => finite("fraction", *fraction)?,
                Convention::LaterOf { events } | Convention::EarlierOf { events } => {
                    if events.is_empty() {
                        return Err(ZmanimError::invalid_definition(
                            name,
                            "composite needs at least one event",
                        ));
                    }
                }
                Convention::Midpoint { .. } => {}
            },
        }
        Ok(())
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// ZmanDefinition
// ═══════════════════════════════════════════════════════════════════════════

/// One named catalog entry.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ZmanDefinition {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(flatten))]
    pub strategy: Strategy,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub description: Option<String>,
}

impl ZmanDefinition {
    pub fn new(name: impl Into<String>, strategy: Strategy) -> Self {
        Self {
            name: name.into(),
            strategy,
            description: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

// ═══════════════════════════════════════════════════════════════════════════
// Catalog
// ═══════════════════════════════════════════════════════════════════════════

/// A validated, dependency-ordered set of zman definitions.
///
/// Immutable once built; hot reloading installs a new catalog rather than
/// editing this one (see [`CatalogStore`](crate::CatalogStore)).
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(
    feature = "serde",
    serde(try_from = "RawCatalog", into = "RawCatalog")
)]
pub struct Catalog {
    version: String,
    entries: Vec<ZmanDefinition>,
    order: Vec<usize>,
}

#[cfg(feature = "serde")]
#[derive(Serialize, Deserialize)]
struct RawCatalog {
    version: String,
    entries: Vec<ZmanDefinition>,
}

#[cfg(feature = "serde")]
impl TryFrom<RawCatalog> for Catalog {
    type Error = ZmanimError;

    fn try_from(raw: RawCatalog) -> Result<Self> {
        Catalog::new(raw.version, raw.entries)
    }
}

#[cfg(feature = "serde")]
impl From<Catalog> for RawCatalog {
    fn from(catalog: Catalog) -> Self {
        RawCatalog {
            version: catalog.version,
            entries: catalog.entries,
        }
    }
}

impl Catalog {
    /// Validate `entries` and compute their evaluation order.
    ///
    /// # Errors
    ///
    /// - [`ZmanimError::DuplicateZman`] for a repeated name or one that
    ///   shadows a primitive.
    /// - [`ZmanimError::InvalidDefinition`] for empty names or unusable
    ///   parameters.
    /// - [`ZmanimError::UnknownZman`] for a reference to nothing.
    /// - [`ZmanimError::DependencyCycle`] when references form a cycle.
    pub fn new(version: impl Into<String>, entries: Vec<ZmanDefinition>) -> Result<Self> {
        let mut index: HashMap<&str, usize> = HashMap::with_capacity(entries.len());
        for (i, entry) in entries.iter().enumerate() {
            if entry.name.trim().is_empty() {
                return Err(ZmanimError::invalid_definition(
                    &entry.name,
                    "name must not be empty",
                ));
            }
            if is_primitive(&entry.name) || index.insert(entry.name.as_str(), i).is_some() {
                return Err(ZmanimError::DuplicateZman(entry.name.clone()));
            }
            entry.strategy.validate(&entry.name)?;
        }

        for entry in &entries {
            for dependency in entry.strategy.dependencies() {
                if !is_primitive(dependency) && !index.contains_key(dependency) {
                    return Err(ZmanimError::UnknownZman {
                        owner: entry.name.clone(),
                        reference: dependency.to_string(),
                    });
                }
            }
        }

        let order = topological_order(&entries, &index)?;
        Ok(Self {
            version: version.into(),
            entries,
            order,
        })
    }

    /// Parse and validate a JSON catalog `{"version": …, "entries": […]}`.
    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// A new catalog with `extra` appended, re-validated as a whole.
    pub fn extended(
        &self,
        version: impl Into<String>,
        extra: impl IntoIterator<Item = ZmanDefinition>,
    ) -> Result<Self> {
        let mut entries = self.entries.clone();
        entries.extend(extra);
        Self::new(version, entries)
    }

    pub fn version(&self) -> &str {
        &self.version
    }

    /// Number of definitions, primitives excluded.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&ZmanDefinition> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Whether a table derived from this catalog carries `name`.
    pub fn contains(&self, name: &str) -> bool {
        is_primitive(name) || self.get(name).is_some()
    }

    /// Definitions in declaration order.
    pub fn entries(&self) -> &[ZmanDefinition] {
        &self.entries
    }

    /// Definitions in evaluation order: every entry follows its dependencies.
    pub fn ordered(&self) -> impl Iterator<Item = &ZmanDefinition> + '_ {
        self.order.iter().map(move |&i| &self.entries[i])
    }
}

/// Kahn ordering over the definition graph; ties keep declaration order.
fn topological_order(entries: &[ZmanDefinition], index: &HashMap<&str, usize>) -> Result<Vec<usize>> {
    let n = entries.len();
    let mut indegree = vec![0usize; n];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (i, entry) in entries.iter().enumerate() {
        for dependency in entry.strategy.dependencies() {
            if let Some(&j) = index.get(dependency) {
                indegree[i] += 1;
                dependents[j].push(i);
            }
        }
    }

    let mut ready: VecDeque<usize> = (0..n).filter(|&i| indegree[i] == 0).collect();
    let mut order = Vec::with_capacity(n);
    while let Some(i) = ready.pop_front() {
        order.push(i);
        for &k in &dependents[i] {
            indegree[k] -= 1;
            if indegree[k] == 0 {
                ready.push_back(k);
            }
        }
    }

    if order.len() == n {
        Ok(order)
    } else {
        Err(ZmanimError::DependencyCycle(find_cycle(entries, index, &indegree)))
    }
}

/// Walk unresolved dependencies until a node repeats; every node left with
/// a positive in-degree has at least one unresolved dependency.
fn find_cycle(entries: &[ZmanDefinition], index: &HashMap<&str, usize>, indegree: &[usize]) -> Vec<String> {
    let mut path: Vec<usize> = Vec::new();
    let mut seen: HashSet<usize> = HashSet::new();
    let mut current = indegree.iter().position(|&d| d > 0);

    while let Some(node) = current {
        if !seen.insert(node) {
            let start = path.iter().position(|&p| p == node).unwrap_or(0);
            let mut cycle: Vec<String> = path[start..]
                .iter()
                .map(|&i| entries[i].name.clone())
                .collect();
            cycle.push(entries[node].name.clone());
            return cycle;
        }
        path.push(node);
        current = entries[node]
            .strategy
            .dependencies()
            .into_iter()
            .filter_map(|dependency| index.get(dependency).copied())
            .find(|&j| indegree[j] > 0);
    }

    path.into_iter().map(|i| entries[i].name.clone()).collect()
}
