//! Navigation mathematics for vehicle position tracking.
//!
//! Provides the [`Coordinate`] value type and great-circle calculations on a
//! spherical earth model.
//!
//! # Coordinate System
//!
//! - Latitude: degrees north (-90 to 90)
//! - Longitude: degrees east (-180 to 180)
//! - Heading: degrees true (0-360, 0=north, 90=east)
//! - Distance: kilometers

use std::f64::consts::PI;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Earth's mean radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Degrees to radians conversion factor.
const DEG_TO_RAD: f64 = PI / 180.0;

/// Radians to degrees conversion factor.
const RAD_TO_DEG: f64 = 180.0 / PI;

/// Errors from coordinate validation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeoError {
    /// Latitude outside the valid range
    #[error("latitude {0} outside [-90, 90]")]
    LatitudeOutOfRange(f64),

    /// Longitude outside the valid range
    #[error("longitude {0} outside [-180, 180]")]
    LongitudeOutOfRange(f64),
}

/// A validated latitude/longitude pair in decimal degrees.
///
/// Immutable value type: once constructed the coordinate cannot be mutated,
/// only replaced.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    latitude: f64,
    longitude: f64,
}

impl Coordinate {
    /// Create a coordinate, validating both axes.
    ///
    /// # Errors
    ///
    /// Returns [`GeoError`] if latitude is outside [-90, 90] or longitude is
    /// outside [-180, 180].
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        if !(-90.0..=90.0).contains(&latitude) {
            return Err(GeoError::LatitudeOutOfRange(latitude));
        }
        if !(-180.0..=180.0).contains(&longitude) {
            return Err(GeoError::LongitudeOutOfRange(longitude));
        }
        Ok(Self {
            latitude,
            longitude,
        })
    }

    /// Create a coordinate by clamping latitude and wrapping longitude.
    ///
    /// Used by position-update strategies whose perturbations may step just
    /// past a pole or the antimeridian: latitude is clamped to [-90, 90] and
    /// longitude wrapped into [-180, 180].
    pub fn clamped(latitude: f64, longitude: f64) -> Self {
        let latitude = latitude.clamp(-90.0, 90.0);
        let mut longitude = longitude;
        if longitude > 180.0 {
            longitude -= 360.0;
        } else if longitude < -180.0 {
            longitude += 360.0;
        }
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in decimal degrees.
    #[inline]
    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    /// Longitude in decimal degrees.
    #[inline]
    pub fn longitude(&self) -> f64 {
        self.longitude
    }
}

/// Calculate the great-circle distance between two coordinates.
///
/// Uses the haversine formula on a sphere of Earth's mean radius:
/// `a = sin²(Δlat/2) + cos(lat1)·cos(lat2)·sin²(Δlon/2)`,
/// `c = 2·atan2(√a, √(1−a))`, `distance = R·c`.
///
/// # Example
///
/// ```
/// use fleetpulse::geo::{haversine_km, Coordinate};
///
/// // One degree of latitude is ~111 km
/// let from = Coordinate::new(0.0, 0.0).unwrap();
/// let to = Coordinate::new(1.0, 0.0).unwrap();
/// assert!((haversine_km(from, to) - 111.19).abs() < 0.1);
/// ```
pub fn haversine_km(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lat = (to.latitude - from.latitude) * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

/// Calculate the initial bearing from one coordinate to another.
///
/// Returns the forward azimuth in degrees (0-360, 0=north, 90=east) using
/// the spherical earth model.
///
/// # Example
///
/// ```
/// use fleetpulse::geo::{bearing_between, Coordinate};
///
/// let from = Coordinate::new(0.0, 0.0).unwrap();
/// let to = Coordinate::new(0.0, 1.0).unwrap();
/// assert!((bearing_between(from, to) - 90.0).abs() < 0.1);
/// ```
pub fn bearing_between(from: Coordinate, to: Coordinate) -> f64 {
    let lat1_rad = from.latitude * DEG_TO_RAD;
    let lat2_rad = to.latitude * DEG_TO_RAD;
    let delta_lon = (to.longitude - from.longitude) * DEG_TO_RAD;

    let y = delta_lon.sin() * lat2_rad.cos();
    let x = lat1_rad.cos() * lat2_rad.sin() - lat1_rad.sin() * lat2_rad.cos() * delta_lon.cos();

    let bearing_rad = y.atan2(x);
    let mut bearing_deg = bearing_rad * RAD_TO_DEG;

    // Normalize to 0-360
    if bearing_deg < 0.0 {
        bearing_deg += 360.0;
    }

    bearing_deg
}
