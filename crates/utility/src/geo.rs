use std::f64::consts::{FRAC_PI_2, PI};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Mean earth radius in miles. All distances handled here are in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

pub const MIN_LATITUDE: f64 = -FRAC_PI_2;
pub const MAX_LATITUDE: f64 = FRAC_PI_2;
pub const MIN_LONGITUDE: f64 = -PI;
pub const MAX_LONGITUDE: f64 = PI;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum GeoError {
    #[error("latitude and longitude must be finite and within range")]
    InvalidCoordinate,
    #[error("distance must be a finite number greater than zero")]
    InvalidDistance,
    #[error("bounding box is missing a usable {0} bound")]
    InvalidBox(&'static str),
}

/// How far a latitude may stray from the equator before it is rejected.
///
/// `Legacy` accepts up to 180 degrees on both axes, which is what existing
/// callers have always been allowed to send. `Strict` limits latitude to 90.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LatitudeLimit {
    #[default]
    Legacy,
    Strict,
}

impl LatitudeLimit {
    pub fn max_abs_degrees(self) -> f64 {
        match self {
            Self::Legacy => 180.0,
            Self::Strict => 90.0,
        }
    }
}

/// How a box whose longitude range crosses the antimeridian is matched.
///
/// `Legacy` applies the inclusive range test to the reversed pair as is, so
/// nothing matches on the longitude axis. `Split` treats the box as the two
/// ranges `[min, 180]` and `[-180, max]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AntimeridianPolicy {
    #[default]
    Legacy,
    Split,
}

/// A closed interval of degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Range {
    pub min: f64,
    pub max: f64,
}

impl Range {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoundingBox {
    pub latitude: Range,
    pub longitude: Range,
}

impl BoundingBox {
    pub fn new(latitude: Range, longitude: Range) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// A normalized box around a point close to the antimeridian ends up with
    /// `longitude.min > longitude.max`.
    pub fn wraps_antimeridian(&self) -> bool {
        self.longitude.min > self.longitude.max
    }

    /// The longitude ranges covered by this box under the given policy.
    pub fn longitude_ranges(&self, policy: AntimeridianPolicy) -> Vec<Range> {
        match policy {
            AntimeridianPolicy::Split if self.wraps_antimeridian() => vec![
                Range::new(self.longitude.min, 180.0),
                Range::new(-180.0, self.longitude.max),
            ],
            _ => vec![self.longitude],
        }
    }

    pub fn contains(
        &self,
        latitude: f64,
        longitude: f64,
        policy: AntimeridianPolicy,
    ) -> bool {
        self.latitude.contains(latitude)
            && self
                .longitude_ranges(policy)
                .iter()
                .any(|range| range.contains(longitude))
    }
}

fn to_radians(degrees: f64) -> f64 {
    degrees / 180.0 * PI
}

fn to_degrees(radians: f64) -> f64 {
    radians / PI * 180.0
}

/// Converts a distance in miles into the angle it spans on the earth's
/// surface, in radians.
pub fn angular_radius(distance_miles: f64) -> Result<f64, GeoError> {
    if !distance_miles.is_finite() || distance_miles <= 0.0 {
        log::debug!("rejecting distance {}", distance_miles);
        return Err(GeoError::InvalidDistance);
    }
    Ok(miles_to_radians(distance_miles))
}

/// [`angular_radius`] for a distance that was already validated.
pub fn miles_to_radians(distance_miles: f64) -> f64 {
    distance_miles / EARTH_RADIUS_MILES
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoundingBoxCalculator {
    pub latitude_limit: LatitudeLimit,
}

impl BoundingBoxCalculator {
    pub fn new(latitude_limit: LatitudeLimit) -> Self {
        Self { latitude_limit }
    }

    pub fn validate_coordinate(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<(), GeoError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && latitude.abs() <= self.latitude_limit.max_abs_degrees()
            && longitude.abs() <= 180.0;
        if !valid {
            log::debug!("rejecting coordinate ({}, {})", latitude, longitude);
            return Err(GeoError::InvalidCoordinate);
        }
        Ok(())
    }

    /// Computes the smallest latitude/longitude box containing every point
    /// within `distance_miles` of the center.
    ///
    /// See <http://janmatuschek.de/LatitudeLongitudeBoundingCoordinates>.
    pub fn compute(
        &self,
        latitude: f64,
        longitude: f64,
        distance_miles: f64,
    ) -> Result<BoundingBox, GeoError> {
        self.validate_coordinate(latitude, longitude)?;
        let angular_radius = angular_radius(distance_miles)?;

        let lat_rad = to_radians(latitude);
        let lon_rad = to_radians(longitude);

        let mut min_lat = lat_rad - angular_radius;
        let mut max_lat = lat_rad + angular_radius;

        let (min_lon, max_lon) = if min_lat > MIN_LATITUDE && max_lat < MAX_LATITUDE {
            let delta_lon = (angular_radius.sin() / lat_rad.cos()).asin();
            let mut min_lon = lon_rad - delta_lon;
            let mut max_lon = lon_rad + delta_lon;
            if min_lon < MIN_LONGITUDE {
                min_lon += 2.0 * PI;
            }
            if max_lon > MAX_LONGITUDE {
                max_lon -= 2.0 * PI;
            }
            if min_lon > max_lon {
                log::trace!(
                    "box around ({}, {}) wraps the antimeridian",
                    latitude,
                    longitude
                );
            }
            (min_lon, max_lon)
        } else {
            // a pole lies within the distance, so every longitude does too
            log::trace!("box around ({}, {}) covers a pole", latitude, longitude);
            min_lat = min_lat.clamp(MIN_LATITUDE, MAX_LATITUDE);
            max_lat = max_lat.clamp(MIN_LATITUDE, MAX_LATITUDE);
            (MIN_LONGITUDE, MAX_LONGITUDE)
        };

        Ok(BoundingBox::new(
            Range::new(to_degrees(min_lat), to_degrees(max_lat)),
            Range::new(to_degrees(min_lon), to_degrees(max_lon)),
        ))
    }
}

/// [`BoundingBoxCalculator::compute`] with the legacy coordinate limits.
pub fn compute_bounding_box(
    latitude: f64,
    longitude: f64,
    distance_miles: f64,
) -> Result<BoundingBox, GeoError> {
    BoundingBoxCalculator::default().compute(latitude, longitude, distance_miles)
}
