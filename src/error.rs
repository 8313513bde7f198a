// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Error taxonomy.
//!
//! Geometric unreachability (the Sun never reaching a depression angle) is
//! *data*, carried as `None` through tables and as
//! [`PrayerTime::Unreachable`](crate::PrayerTime::Unreachable) in schedules;
//! it never appears here.  Everything below is a configuration or input
//! error, surfaced when a location or catalog is built.

use chrono::NaiveDate;
use thiserror::Error;

/// Errors raised while validating inputs and catalogs.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ZmanimError {
    #[error("invalid location: {0}")]
    InvalidLocation(String),
    #[error("unknown time zone: {0}")]
    UnknownTimeZone(String),
    /// Seasonal-hour anchors where the day end does not follow the start.
    #[error("invalid seasonal-hour interval: end (JD {end}) is not after start (JD {start})")]
    InvalidInterval { start: f64, end: f64 },
    #[error("invalid date range: {end} precedes {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },
    /// A composed definition graph that is not a DAG; lists the cycle in order.
    #[error("dependency cycle in zmanim catalog: {}", .0.join(" -> "))]
    DependencyCycle(Vec<String>),
    #[error("{owner:?} references unknown zman {reference:?}")]
    UnknownZman { owner: String, reference: String },
    #[error("duplicate definition: {0}")]
    DuplicateZman(String),
    #[error("invalid definition {name:?}: {reason}")]
    InvalidDefinition { name: String, reason: String },
    #[error("{0} is not a Friday")]
    NotFriday(NaiveDate),
    #[cfg(feature = "serde")]
    #[error("failed to parse configuration: {0}")]
    Parse(String),
}

impl ZmanimError {
    pub(crate) fn invalid_definition(name: impl Into<String>, reason: impl Into<String>) -> Self {
        ZmanimError::InvalidDefinition {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

#[cfg(feature = "serde")]
impl From<serde_json::Error> for ZmanimError {
    fn from(err: serde_json::Error) -> Self {
        ZmanimError::Parse(err.to_string())
    }
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, ZmanimError>;
