// SPDX-License-Identifier: AGPL-3.0-or-later
// Copyright (C) 2026 Vallés Puig, Ramon

//! Observer location.

use chrono_tz::Tz;

use crate::error::{Result, ZmanimError};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Geographic location and civil time zone of an observer.
///
/// Validated on construction: latitude in `[-90, 90]`, longitude in
/// `[-180, 180]` (east positive), elevation finite and non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "RawLocation"))]
pub struct Location {
    latitude: f64,
    longitude: f64,
    elevation_m: f64,
    time_zone: Tz,
}

impl Location {
    /// Create a validated location.
    pub fn new(latitude: f64, longitude: f64, elevation_m: f64, time_zone: Tz) -> Result<Self> {
        if !latitude.is_finite() || !(-90.0..=90.0).contains(&latitude) {
            return Err(ZmanimError::InvalidLocation(format!(
                "latitude {latitude} outside [-90, 90]"
            )));
        }
        if !longitude.is_finite() || !(-180.0..=180.0).contains(&longitude) {
            return Err(ZmanimError::InvalidLocation(format!(
                "longitude {longitude} outside [-180, 180]"
            )));
        }
        if !elevation_m.is_finite() || elevation_m < 0.0 {
            return Err(ZmanimError::InvalidLocation(format!(
                "elevation {elevation_m} m must be finite and non-negative"
            )));
        }
        Ok(Self {
            latitude,
            longitude,
            elevation_m,
            time_zone,
        })
    }

    /// Create a location from an IANA zone identifier such as `"Asia/Jerusalem"`.
    pub fn with_zone_name(
        latitude: f64,
        longitude: f64,
        elevation_m: f64,
        time_zone: &str,
    ) -> Result<Self> {
        let tz: Tz = time_zone
            .parse()
            .map_err(|_| ZmanimError::UnknownTimeZone(time_zone.to_string()))?;
        Self::new(latitude, longitude, elevation_m, tz)
    }

    /// Geodetic latitude in degrees, north positive.
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in degrees, east positive.
    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    /// Elevation above sea level in metres.
    pub fn elevation_m(&self) -> f64 {
        self.elevation_m
    }

    pub fn time_zone(&self) -> Tz {
        self.time_zone
    }

    /// Same location with elevation dropped, for sea-level conventions.
    pub fn at_sea_level(&self) -> Self {
        Self {
            elevation_m: 0.0,
            ..*self
        }
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
struct RawLocation {
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    elevation_m: f64,
    time_zone: Tz,
}

#[cfg(feature = "serde")]
impl TryFrom<RawLocation> for Location {
    type Error = ZmanimError;

    fn try_from(raw: RawLocation) -> Result<Self> {
        Location::new(raw.latitude, raw.longitude, raw.elevation_m, raw.time_zone)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono_tz::Asia::Jerusalem;

    #[test]
    fn accepts_valid_coordinates() {
        let loc = Location::new(31.7650511, 35.1746302, 0.0, Jerusalem).unwrap();
        assert_eq!(loc.latitude(), 31.7650511);
        assert_eq!(loc.time_zone(), Jerusalem);
    }

    #[test]
    fn rejects_out_of_range_values() {
        assert!(matches!(
            Location::new(91.0, 0.0, 0.0, Jerusalem),
            Err(ZmanimError::InvalidLocation(_))
        ));
        assert!(matches!(
            Location::new(0.0, -180.5, 0.0, Jerusalem),
            Err(ZmanimError::InvalidLocation(_))
        ));
        assert!(matches!(
            Location::new(0.0, 0.0, -1.0, Jerusalem),
            Err(ZmanimError::InvalidLocation(_))
        ));
        assert!(Location::new(f64::NAN, 0.0, 0.0, Jerusalem).is_err());
    }

    #[test]
    fn parses_zone_names() {
        let loc = Location::with_zone_name(40.7, -74.0, 10.0, "America/New_York").unwrap();
        assert_eq!(loc.time_zone(), chrono_tz::America::New_York);
        assert_eq!(loc.at_sea_level().elevation_m(), 0.0);

        let err = Location::with_zone_name(40.7, -74.0, 0.0, "Mars/Olympus").unwrap_err();
        assert_eq!(err, ZmanimError::UnknownTimeZone("Mars/Olympus".into()));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn deserialization_validates() {
        let ok: Location = serde_json::from_str(
            r#"{"latitude": 31.77, "longitude": 35.17, "time_zone": "Asia/Jerusalem"}"#,
        )
        .unwrap();
        assert_eq!(ok.elevation_m(), 0.0);

        let bad = serde_json::from_str::<Location>(
            r#"{"latitude": 131.0, "longitude": 35.17, "time_zone": "Asia/Jerusalem"}"#,
        );
        assert!(bad.is_err());
    }
}
