use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::geo::{BoundingBox, GeoError, Range};

/// One axis of a box as received from an untyped boundary.
#[serde_with::skip_serializing_none]
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RangeBounds {
    #[serde(default)]
    pub min: Option<f64>,
    #[serde(default)]
    pub max: Option<f64>,
}

/// A bounding box whose bounds may be missing. Use [`BoxBounds::validate`]
/// to turn it into a [`BoundingBox`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BoxBounds {
    #[serde(default)]
    pub latitude: RangeBounds,
    #[serde(default)]
    pub longitude: RangeBounds,
}

fn require(bound: Option<f64>, name: &'static str) -> Result<f64, GeoError> {
    // zero is a perfectly good bound, only absence and NaN are rejected
    match bound {
        Some(value) if !value.is_nan() => Ok(value),
        _ => Err(GeoError::InvalidBox(name)),
    }
}

impl BoxBounds {
    pub fn validate(&self) -> Result<BoundingBox, GeoError> {
        let latitude = Range::new(
            require(self.latitude.min, "latitude.min")?,
            require(self.latitude.max, "latitude.max")?,
        );
        let longitude = Range::new(
            require(self.longitude.min, "longitude.min")?,
            require(self.longitude.max, "longitude.max")?,
        );
        if latitude.min > latitude.max {
            return Err(GeoError::InvalidBox("latitude"));
        }
        Ok(BoundingBox::new(latitude, longitude))
    }
}

impl From<BoundingBox> for BoxBounds {
    fn from(bounding_box: BoundingBox) -> Self {
        Self {
            latitude: RangeBounds {
                min: Some(bounding_box.latitude.min),
                max: Some(bounding_box.latitude.max),
            },
            longitude: RangeBounds {
                min: Some(bounding_box.longitude.min),
                max: Some(bounding_box.longitude.max),
            },
        }
    }
}

/// Anything a proximity filter can be run against.
pub trait AsBoundingBox {
    fn as_bounding_box(&self) -> Result<BoundingBox, GeoError>;
}

impl AsBoundingBox for BoundingBox {
    fn as_bounding_box(&self) -> Result<BoundingBox, GeoError> {
        Ok(*self)
    }
}

impl AsBoundingBox for BoxBounds {
    fn as_bounding_box(&self) -> Result<BoundingBox, GeoError> {
        self.validate()
    }
}
