use std::str::FromStr;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{self, BoundingBox, BoundingBoxCalculator, GeoError, LatitudeLimit};

/// A validated position in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(try_from = "GeoPointFields")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct GeoPointFields {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<GeoPointFields> for GeoPoint {
    type Error = GeoError;

    fn try_from(fields: GeoPointFields) -> Result<Self, Self::Error> {
        Self::new(fields.latitude, fields.longitude)
    }
}

impl GeoPoint {
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, GeoError> {
        Self::with_limit(latitude, longitude, LatitudeLimit::default())
    }

    pub fn with_limit(
        latitude: f64,
        longitude: f64,
        limit: LatitudeLimit,
    ) -> Result<Self, GeoError> {
        BoundingBoxCalculator::new(limit).validate_coordinate(latitude, longitude)?;
        Ok(Self {
            latitude,
            longitude,
        })
    }

    pub fn latitude(&self) -> f64 {
        self.latitude
    }

    pub fn longitude(&self) -> f64 {
        self.longitude
    }

    pub fn bounding_box(&self, distance: Distance) -> Result<BoundingBox, GeoError> {
        geo::compute_bounding_box(self.latitude, self.longitude, distance.miles())
    }
}

/// Parses `"<latitude>,<longitude>"`.
impl FromStr for GeoPoint {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (latitude, longitude) =
            s.split_once(',').ok_or(GeoError::InvalidCoordinate)?;
        let latitude = latitude
            .trim()
            .parse::<f64>()
            .map_err(|_| GeoError::InvalidCoordinate)?;
        let longitude = longitude
            .trim()
            .parse::<f64>()
            .map_err(|_| GeoError::InvalidCoordinate)?;
        Self::new(latitude, longitude)
    }
}

/// A search radius in miles. Always finite and greater than zero.
#[derive(
    Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize, JsonSchema,
)]
#[serde(try_from = "f64", into = "f64")]
pub struct Distance(f64);

impl Distance {
    /// Radius used when a caller asks for nearby users without naming one.
    pub const DEFAULT: Distance = Distance(50.0);

    pub fn new(miles: f64) -> Result<Self, GeoError> {
        geo::angular_radius(miles)?;
        Ok(Self(miles))
    }

    pub fn miles(self) -> f64 {
        self.0
    }

    pub fn angular_radius(self) -> f64 {
        geo::miles_to_radians(self.0)
    }
}

impl Default for Distance {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<f64> for Distance {
    type Error = GeoError;

    fn try_from(miles: f64) -> Result<Self, Self::Error> {
        Self::new(miles)
    }
}

impl From<Distance> for f64 {
    fn from(distance: Distance) -> Self {
        distance.0
    }
}

impl FromStr for Distance {
    type Err = GeoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim()
            .parse::<f64>()
            .map_err(|_| GeoError::InvalidDistance)
            .and_then(Self::new)
    }
}
