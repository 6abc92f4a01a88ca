use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use utility::id::{HasId, Id};

/// A user that may show up in a proximity search.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Candidate {
    pub id: Id<Candidate>,
    pub latitude: f64,
    pub longitude: f64,
}

impl HasId for Candidate {
    type IdType = i64;
}

impl Candidate {
    pub fn new(id: i64, latitude: f64, longitude: f64) -> Self {
        Self {
            id: Id::new(id),
            latitude,
            longitude,
        }
    }
}
