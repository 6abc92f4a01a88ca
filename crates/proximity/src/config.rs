use std::env;

use model::Distance;
use serde::{Deserialize, Serialize};
use utility::geo::{AntimeridianPolicy, BoundingBoxCalculator, LatitudeLimit};

pub const DEFAULT_DISTANCE_VAR: &str = "PROXIMITY_DEFAULT_DISTANCE";
pub const STRICT_LATITUDE_VAR: &str = "PROXIMITY_STRICT_LATITUDE";
pub const SPLIT_ANTIMERIDIAN_VAR: &str = "PROXIMITY_SPLIT_ANTIMERIDIAN";

/// Knobs for proximity searches. The default reproduces the behaviour
/// existing callers rely on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ProximityConfig {
    pub default_distance: Distance,
    pub latitude_limit: LatitudeLimit,
    pub antimeridian: AntimeridianPolicy,
}

impl ProximityConfig {
    /// Reads the configuration from the environment. Unset variables keep
    /// their defaults, unparsable ones are logged and ignored.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(DEFAULT_DISTANCE_VAR) {
            match value.parse::<Distance>() {
                Ok(distance) => config.default_distance = distance,
                Err(why) => log::warn!(
                    "ignoring {}={:?}: {}",
                    DEFAULT_DISTANCE_VAR,
                    value,
                    why
                ),
            }
        }
        if let Some(strict) = flag(&lookup, STRICT_LATITUDE_VAR) {
            config.latitude_limit = if strict {
                LatitudeLimit::Strict
            } else {
                LatitudeLimit::Legacy
            };
        }
        if let Some(split) = flag(&lookup, SPLIT_ANTIMERIDIAN_VAR) {
            config.antimeridian = if split {
                AntimeridianPolicy::Split
            } else {
                AntimeridianPolicy::Legacy
            };
        }

        config
    }

    pub fn calculator(&self) -> BoundingBoxCalculator {
        BoundingBoxCalculator::new(self.latitude_limit)
    }
}

fn flag<F>(lookup: &F, name: &str) -> Option<bool>
where
    F: Fn(&str) -> Option<String>,
{
    let value = lookup(name)?;
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => {
            log::warn!("ignoring {}={:?}: expected a boolean", name, value);
            None
        }
    }
}
